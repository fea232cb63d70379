// ==========================================
// JSON 命令层集成测试
// ==========================================
// 测试范围: AppState 装配 + 命令函数的成功 JSON 与 ErrorResponse 编码
// ==========================================

mod helpers;

use std::sync::Arc;

use college_admin::app::commands::{self, ErrorResponse};
use college_admin::app::AppState;
use helpers::stubs::{observation, RecordingMailer, StubWeatherSource};
use helpers::test_helpers::create_test_db;

fn state() -> (tempfile::NamedTempFile, AppState, Arc<RecordingMailer>) {
    let (temp_file, db_path) = create_test_db().expect("无法创建测试数据库");
    let mailer = Arc::new(RecordingMailer::default());
    let source = Arc::new(StubWeatherSource::returning(observation(
        33.0, "Haze", "haze",
    )));
    let state = AppState::with_collaborators(db_path, mailer.clone(), source)
        .expect("无法初始化AppState");
    (temp_file, state, mailer)
}

fn error_of(err: String) -> ErrorResponse {
    serde_json::from_str(&err).expect("错误应为 ErrorResponse JSON")
}

async fn add(state: &AppState, roll: &str, department: &str) -> serde_json::Value {
    let json = commands::add_student(
        state,
        roll.to_string(),
        format!("Student {}", roll),
        department.to_string(),
        None,
        "mentor@college.example.edu".to_string(),
        "clerk".to_string(),
    )
    .await
    .unwrap();
    serde_json::from_str(&json).unwrap()
}

#[tokio::test]
async fn test_empty_roster_error_code() {
    let (_tmp, state, _) = state();

    let err = commands::create_seating_arrangement(&state, "Final".to_string(), 2, 30, "admin".to_string())
        .await
        .unwrap_err();

    let resp = error_of(err);
    assert_eq!(resp.code, "EMPTY_ROSTER");
    assert!(!resp.message.is_empty());
}

#[tokio::test]
async fn test_seating_flow_through_commands() {
    let (_tmp, state, _) = state();
    add(&state, "CS001", "CS").await;
    add(&state, "EE001", "EE").await;
    add(&state, "CS002", "CS").await;

    let json = commands::create_seating_arrangement(&state, "Final".to_string(), 1, 2, "admin".to_string())
        .await
        .unwrap();
    let created: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(created["unplaced_count"], 1);
    let id = created["arrangement"]["arrangement_id"].as_str().unwrap().to_string();

    let list: serde_json::Value =
        serde_json::from_str(&commands::list_seating_arrangements(&state).await.unwrap()).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);

    let view: serde_json::Value = serde_json::from_str(
        &commands::view_seating_arrangement(&state, id.clone()).await.unwrap(),
    )
    .unwrap();
    assert_eq!(view["rooms"][0]["room_name"], "Room 1");

    let out_dir = tempfile::tempdir().unwrap();
    let exported: serde_json::Value = serde_json::from_str(
        &commands::export_seating_csv(&state, id, out_dir.path().to_string_lossy().to_string())
            .await
            .unwrap(),
    )
    .unwrap();
    let path = exported["path"].as_str().unwrap();
    assert!(std::path::Path::new(path).exists());
}

#[tokio::test]
async fn test_invalid_capacity_error_code() {
    let (_tmp, state, _) = state();
    let err = commands::create_seating_arrangement(&state, "Final".to_string(), 0, 0, "admin".to_string())
        .await
        .unwrap_err();
    assert_eq!(error_of(err).code, "INVALID_INPUT");
}

#[tokio::test]
async fn test_mark_attendance_command() {
    let (_tmp, state, mailer) = state();
    let student = add(&state, "CS001", "CS").await;
    let student_id = student["student_id"].as_str().unwrap().to_string();

    let err = commands::mark_attendance(
        &state,
        student_id.clone(),
        "2026-03-02".to_string(),
        "1".to_string(),
        "late".to_string(),
        None,
        "faculty".to_string(),
    )
    .await
    .unwrap_err();
    assert_eq!(error_of(err).code, "INVALID_INPUT");

    let json = commands::mark_attendance(
        &state,
        student_id,
        "2026-03-02".to_string(),
        "1".to_string(),
        "Absent".to_string(),
        Some("fever".to_string()),
        "faculty".to_string(),
    )
    .await
    .unwrap();
    let result: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(result["record"]["status"], "absent");
    assert_eq!(result["notification_sent"], true);
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_weather_and_dashboard_commands() {
    let (_tmp, state, _) = state();

    let current: serde_json::Value = serde_json::from_str(
        &commands::get_current_weather(&state, None).await.unwrap(),
    )
    .unwrap();
    assert_eq!(current["main_condition"], "Haze");

    let latest = commands::get_latest_weather(&state).await.unwrap();
    assert_eq!(latest, "null");

    let overview: serde_json::Value =
        serde_json::from_str(&commands::get_dashboard_overview(&state).await.unwrap()).unwrap();
    assert_eq!(overview["total_students"], 0);
}

#[tokio::test]
async fn test_duplicate_student_error_code() {
    let (_tmp, state, _) = state();
    add(&state, "CS001", "CS").await;

    let err = commands::add_student(
        &state,
        "CS001".to_string(),
        "Other".to_string(),
        "EE".to_string(),
        None,
        "mentor@college.example.edu".to_string(),
        "clerk".to_string(),
    )
    .await
    .unwrap_err();
    assert_eq!(error_of(err).code, "BUSINESS_RULE_VIOLATION");
}
