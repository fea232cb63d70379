// ==========================================
// SeatingApi 集成测试
// ==========================================
// 测试范围:
// 1. 生成编排: 持久化 / 轮转顺序 / 超额截断
// 2. 错误: 名册为空（不写入任何数据） / 容量非法
// 3. 查询: 列表（新→旧） / 按考场分组
// 4. 导出: CSV 考场排序 / PDF
// ==========================================

mod helpers;

use college_admin::api::ApiError;
use college_admin::domain::action_log::ActionType;
use college_admin::engine::{MAX_ROOMS, MAX_SEATS_PER_ROOM};
use helpers::api_test_helper::ApiTestEnv;
use helpers::test_helpers::count_rows;

// ==========================================
// 生成编排
// ==========================================

#[test]
fn test_create_arrangement_persists_and_round_trips() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.add_students(&[
        ("A1", "Arts"),
        ("A2", "Arts"),
        ("B1", "Biology"),
        ("B2", "Biology"),
        ("C1", "Chemistry"),
        ("C2", "Chemistry"),
    ]);

    let result = env
        .seating_api
        .create_arrangement("Final Exam", 2, 3, "admin")
        .expect("生成编排失败");

    assert_eq!(result.unplaced_count, 0);
    assert!(result.warning.is_none());

    // 院系按首次出现顺序轮转: A B C | A B C
    let placed: Vec<(&str, &str, u32)> = result
        .arrangement
        .records
        .iter()
        .map(|r| (r.student_roll.as_str(), r.room_name.as_str(), r.seat_number))
        .collect();
    assert_eq!(
        placed,
        vec![
            ("A1", "Room 1", 1),
            ("B1", "Room 1", 2),
            ("C1", "Room 1", 3),
            ("A2", "Room 2", 1),
            ("B2", "Room 2", 2),
            ("C2", "Room 2", 3),
        ]
    );

    // 持久化后可按 ID 取回，内容一致
    let loaded = env
        .seating_api
        .get_arrangement(&result.arrangement.arrangement_id)
        .expect("查询失败");
    assert_eq!(loaded.records, result.arrangement.records);
    assert_eq!(loaded.exam_name, "Final Exam");

    let rooms = env
        .seating_repo
        .list_rooms(&result.arrangement.arrangement_id)
        .unwrap();
    assert_eq!(rooms.len(), 2);
    assert!(rooms.iter().all(|r| r.capacity == 3));

    // 操作日志
    let logs = env
        .action_log_repo
        .find_by_target(&result.arrangement.arrangement_id)
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action_type, ActionType::SeatingCreated.as_str());
    assert_eq!(logs[0].actor, "admin");
}

#[test]
fn test_create_arrangement_overflow_reports_unplaced() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.add_students(&[
        ("S1", "CS"),
        ("S2", "CS"),
        ("S3", "EE"),
        ("S4", "EE"),
        ("S5", "ME"),
    ]);

    let result = env
        .seating_api
        .create_arrangement("Quiz", 1, 3, "admin")
        .expect("生成编排失败");

    assert_eq!(result.arrangement.records.len(), 3);
    assert_eq!(result.unplaced_count, 2);
    assert!(result.warning.is_some());

    let summaries = env.seating_api.list_arrangements().unwrap();
    assert_eq!(summaries[0].seated_count, 3);
}

// ==========================================
// 错误场景
// ==========================================

#[test]
fn test_empty_roster_persists_nothing() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let err = env
        .seating_api
        .create_arrangement("Final Exam", 2, 30, "admin")
        .unwrap_err();

    assert!(matches!(err, ApiError::EmptyRoster(_)), "unexpected: {:?}", err);
    assert_eq!(count_rows(&env.conn, "seating_arrangement"), 0);
    assert_eq!(count_rows(&env.conn, "exam_room"), 0);
    assert_eq!(count_rows(&env.conn, "action_log"), 0);
}

#[test]
fn test_invalid_capacity_rejected_before_roster() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    // 名册为空时也先报容量错误
    let err = env
        .seating_api
        .create_arrangement("Final Exam", 0, 30, "admin")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    env.add_students(&[("S1", "CS")]);
    let err = env
        .seating_api
        .create_arrangement("Final Exam", 2, -1, "admin")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(count_rows(&env.conn, "seating_arrangement"), 0);
}

#[test]
fn test_room_count_capped() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.add_students(&[("S1", "CS")]);

    let err = env
        .seating_api
        .create_arrangement("Final", 3_000_000_000, 1, "admin")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)), "unexpected: {:?}", err);
    let err = env
        .seating_api
        .create_arrangement("Final", i64::from(MAX_ROOMS) + 1, 1, "admin")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    let err = env
        .seating_api
        .create_arrangement("Final", 1, i64::from(MAX_SEATS_PER_ROOM) + 1, "admin")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(count_rows(&env.conn, "exam_room"), 0);

    // 恰好等于上限时正常生成，每个考场一行
    let created = env
        .seating_api
        .create_arrangement("Final", i64::from(MAX_ROOMS), 1, "admin")
        .unwrap();
    assert_eq!(created.arrangement.records.len(), 1);
    assert_eq!(count_rows(&env.conn, "exam_room"), i64::from(MAX_ROOMS));
    assert_eq!(count_rows(&env.conn, "action_log"), 2); // 登记学生 + 生成编排
}

#[test]
fn test_get_unknown_arrangement_not_found() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let err = env.seating_api.get_arrangement("missing").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

// ==========================================
// 查询
// ==========================================

#[test]
fn test_list_arrangements_newest_first() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.add_students(&[("S1", "CS"), ("S2", "EE")]);

    let first = env
        .seating_api
        .create_arrangement("Midterm", 1, 5, "admin")
        .unwrap();
    let second = env
        .seating_api
        .create_arrangement("Final", 1, 5, "admin")
        .unwrap();

    let ids: Vec<String> = env
        .seating_api
        .list_arrangements()
        .unwrap()
        .into_iter()
        .map(|s| s.arrangement_id)
        .collect();
    assert_eq!(
        ids,
        vec![
            second.arrangement.arrangement_id,
            first.arrangement.arrangement_id
        ]
    );
}

#[test]
fn test_view_arrangement_groups_by_room() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.add_students(&[("S1", "CS"), ("S2", "CS"), ("S3", "EE")]);

    let created = env
        .seating_api
        .create_arrangement("Final", 2, 2, "admin")
        .unwrap();
    let view = env
        .seating_api
        .view_arrangement(&created.arrangement.arrangement_id)
        .unwrap();

    let rooms: Vec<(&str, usize)> = view
        .rooms
        .iter()
        .map(|g| (g.room_name.as_str(), g.seated_count()))
        .collect();
    assert_eq!(rooms, vec![("Room 1", 2), ("Room 2", 1)]);
    assert_eq!(view.summary.seated_count, 3);

    // 重复渲染结果一致
    let again = env
        .seating_api
        .view_arrangement(&created.arrangement.arrangement_id)
        .unwrap();
    assert_eq!(again.rooms, view.rooms);
}

// ==========================================
// 导出
// ==========================================

#[test]
fn test_export_csv_rooms_sorted_by_name() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.add_students(&[("S1", "CS"), ("S2", "EE"), ("S3", "ME")]);

    let created = env
        .seating_api
        .create_arrangement("Final", 2, 2, "admin")
        .unwrap();
    let file = env
        .seating_api
        .export_csv(&created.arrangement.arrangement_id)
        .unwrap();

    assert!(file.file_name.ends_with(".csv"));
    assert_eq!(file.content_type, "text/csv");

    let text = String::from_utf8(file.bytes).unwrap();
    let rooms: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(rooms, vec!["Room 1", "Room 1", "Room 2"]);
}

#[test]
fn test_export_pdf_produces_document() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.add_students(&[("S1", "CS"), ("S2", "EE")]);

    let created = env
        .seating_api
        .create_arrangement("Final", 1, 10, "admin")
        .unwrap();
    let file = env
        .seating_api
        .export_pdf(&created.arrangement.arrangement_id)
        .unwrap();

    assert_eq!(
        file.file_name,
        format!("seating_arrangement_{}.pdf", created.arrangement.arrangement_id)
    );
    assert!(file.bytes.starts_with(b"%PDF-1.4"));
    assert!(file.bytes.ends_with(b"%%EOF\n"));
}
