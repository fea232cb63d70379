use crate::app::state::AppState;
use crate::domain::student::NewStudent;

use super::common::{map_api_error, to_json};

// ==========================================
// 学生名册相关命令
// ==========================================

/// 登记学生
pub async fn add_student(
    state: &AppState,
    roll_number: String,
    name: String,
    department: String,
    email: Option<String>,
    mentor_email: String,
    operator: String,
) -> Result<String, String> {
    let form = NewStudent {
        roll_number,
        name,
        department,
        email,
        mentor_email,
    };
    let result = state
        .student_api
        .add_student(form, &operator)
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 查询全部学生
pub async fn list_students(state: &AppState) -> Result<String, String> {
    let result = state.student_api.list_students().map_err(map_api_error)?;
    to_json(&result)
}

/// 查询单个学生
pub async fn get_student(state: &AppState, student_id: String) -> Result<String, String> {
    let result = state
        .student_api
        .get_student(&student_id)
        .map_err(map_api_error)?;
    to_json(&result)
}
