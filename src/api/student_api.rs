// ==========================================
// 学院教务管理系统 - 学生名册 API
// ==========================================
// 职责: 学生登记、查询（座位编排与考勤的名册来源）
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::student::{NewStudent, Student};
use crate::i18n::t_with_args;
use crate::notify::validate_recipient;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::student_repo::StudentRepository;

/// 学生API
///
/// 职责：
/// 1. 学生登记（必填校验 + 学号去重）
/// 2. 名册查询
/// 3. ActionLog记录
pub struct StudentApi {
    student_repo: Arc<StudentRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl StudentApi {
    pub fn new(
        student_repo: Arc<StudentRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            student_repo,
            action_log_repo,
        }
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 登记学生
    ///
    /// # 参数
    /// - form: 新增学生表单（自动去除首尾空白）
    /// - operator: 操作人
    ///
    /// # 返回
    /// - Ok(Student): 新建的学生
    /// - Err(ApiError::InvalidInput): 必填字段为空 / 邮箱格式错误
    /// - Err(ApiError::BusinessRuleViolation): 学号已存在
    pub fn add_student(&self, form: NewStudent, operator: &str) -> ApiResult<Student> {
        let form = form.normalized();

        for (field, value) in [
            ("roll_number", &form.roll_number),
            ("name", &form.name),
            ("department", &form.department),
            ("mentor_email", &form.mentor_email),
        ] {
            if value.is_empty() {
                return Err(ApiError::InvalidInput(t_with_args(
                    "student.missing_field",
                    &[("field", field)],
                )));
            }
        }

        validate_recipient(&form.mentor_email)
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        if let Some(email) = &form.email {
            validate_recipient(email).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        }

        if self
            .student_repo
            .find_by_roll_number(&form.roll_number)?
            .is_some()
        {
            return Err(ApiError::BusinessRuleViolation(t_with_args(
                "student.duplicate_roll",
                &[("roll", form.roll_number.as_str())],
            )));
        }

        let student = Student {
            student_id: uuid::Uuid::new_v4().to_string(),
            roll_number: form.roll_number,
            name: form.name,
            department: form.department,
            email: form.email,
            mentor_email: form.mentor_email,
            created_at: chrono::Local::now().naive_local(),
        };
        self.student_repo.insert(&student)?;

        let log = ActionLog::new(ActionType::StudentAdded, operator)
            .with_target(&student.student_id)
            .with_payload(&serde_json::json!({
                "roll_number": student.roll_number,
                "department": student.department,
            }))
            .with_detail(format!("新增学生 {} ({})", student.name, student.roll_number));
        self.action_log_repo.insert(&log)?;

        info!(
            student_id = %student.student_id,
            roll_number = %student.roll_number,
            operator,
            "学生已登记"
        );
        Ok(student)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 全部学生（登记顺序）
    pub fn list_students(&self) -> ApiResult<Vec<Student>> {
        Ok(self.student_repo.list_all()?)
    }

    pub fn get_student(&self, student_id: &str) -> ApiResult<Student> {
        self.student_repo
            .find_by_id(student_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Student(id={})不存在", student_id)))
    }

    pub fn count_students(&self) -> ApiResult<i64> {
        Ok(self.student_repo.count()?)
    }
}
