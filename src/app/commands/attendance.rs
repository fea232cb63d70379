use crate::app::state::AppState;
use crate::domain::attendance::AttendanceMark;
use crate::domain::types::AttendanceStatus;

use super::common::{invalid_input, map_api_error, parse_date, to_json};

// ==========================================
// 考勤相关命令
// ==========================================

/// 标记考勤（缺勤时通知导师）
pub async fn mark_attendance(
    state: &AppState,
    student_id: String,
    date: String,
    hour: String,
    status: String,
    reason: Option<String>,
    operator: String,
) -> Result<String, String> {
    let date = parse_date(&date)?;
    let status = AttendanceStatus::parse(&status)
        .ok_or_else(|| invalid_input(format!("无效的考勤状态: {}", status)))?;

    let mark = AttendanceMark {
        student_id,
        date,
        hour,
        status,
        reason,
    };
    let result = state
        .attendance_api
        .mark_attendance(mark, &operator)
        .await
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 点名表
pub async fn get_attendance_sheet(
    state: &AppState,
    date: String,
    hour: String,
) -> Result<String, String> {
    let date = parse_date(&date)?;
    let result = state
        .attendance_api
        .attendance_sheet(date, &hour)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 最近考勤记录
pub async fn list_recent_attendance(state: &AppState, limit: u32) -> Result<String, String> {
    let result = state
        .attendance_api
        .recent(limit.clamp(1, 500))
        .map_err(map_api_error)?;
    to_json(&result)
}
