// ==========================================
// 学院教务管理系统 - 考勤 API
// ==========================================
// 职责: 考勤标记（幂等更新）、点名表、统计、最近记录
// 红线: 缺勤通知投递失败只记录日志，不影响考勤写入结果
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::attendance::{
    AttendanceEntry, AttendanceMark, AttendanceRecord, AttendanceSheetRow, MAX_HOUR_LABEL_LEN,
};
use crate::domain::types::AttendanceStatus;
use crate::engine::notice::absence_notice;
use crate::notify::Mailer;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::attendance_repo::AttendanceRepository;
use crate::repository::student_repo::StudentRepository;

/// 考勤标记结果
#[derive(Debug, Clone, serde::Serialize)]
pub struct MarkAttendanceResult {
    pub record: AttendanceRecord,
    pub notification_sent: bool, // 仅缺勤时可能为 true
}

/// 考勤API
pub struct AttendanceApi {
    student_repo: Arc<StudentRepository>,
    attendance_repo: Arc<AttendanceRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    mailer: Arc<dyn Mailer>,
}

impl AttendanceApi {
    pub fn new(
        student_repo: Arc<StudentRepository>,
        attendance_repo: Arc<AttendanceRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            student_repo,
            attendance_repo,
            action_log_repo,
            mailer,
        }
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 标记考勤
    ///
    /// # 参数
    /// - mark: 学生/日期/课时/状态/原因
    /// - operator: 操作人
    ///
    /// # 返回
    /// - Ok(MarkAttendanceResult): 写入后的记录，及缺勤通知是否已投递
    /// - Err(ApiError::InvalidInput): 课时标签为空或过长
    /// - Err(ApiError::NotFound): 学生不存在
    pub async fn mark_attendance(
        &self,
        mark: AttendanceMark,
        operator: &str,
    ) -> ApiResult<MarkAttendanceResult> {
        let mark = AttendanceMark {
            hour: mark.hour.trim().to_string(),
            reason: mark
                .reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            ..mark
        };
        if mark.hour.is_empty() || mark.hour.chars().count() > MAX_HOUR_LABEL_LEN {
            return Err(ApiError::InvalidInput(format!(
                "课时标签长度必须在1~{}之间: '{}'",
                MAX_HOUR_LABEL_LEN, mark.hour
            )));
        }

        let student_repo = self.student_repo.clone();
        let attendance_repo = self.attendance_repo.clone();
        let action_log_repo = self.action_log_repo.clone();
        let operator_owned = operator.to_string();

        let (student, record) = tokio::task::spawn_blocking(move || -> ApiResult<_> {
            let student = student_repo.find_by_id(&mark.student_id)?.ok_or_else(|| {
                ApiError::NotFound(format!("Student(id={})不存在", mark.student_id))
            })?;

            let record = attendance_repo.upsert(&mark, chrono::Local::now().naive_local())?;

            let log = ActionLog::new(ActionType::AttendanceMarked, &operator_owned)
                .with_target(&record.attendance_id)
                .with_payload(&serde_json::json!({
                    "student_id": record.student_id,
                    "date": record.date,
                    "hour": record.hour,
                    "status": record.status,
                }))
                .with_detail(format!(
                    "考勤标记 {} {} 第{}节: {}",
                    student.roll_number, record.date, record.hour, record.status
                ));
            action_log_repo.insert(&log)?;
            Ok((student, record))
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("考勤写入任务异常: {}", e)))??;

        info!(
            student_id = %record.student_id,
            date = %record.date,
            hour = %record.hour,
            status = %record.status,
            operator,
            "考勤已标记"
        );

        let mut notification_sent = false;
        if record.status == AttendanceStatus::Absent {
            let mail = absence_notice(&student, &record);
            match self.mailer.send(&mail).await {
                Ok(()) => notification_sent = true,
                Err(e) => warn!(
                    student_id = %student.student_id,
                    mentor = %student.mentor_email,
                    error = %e,
                    "缺勤通知投递失败"
                ),
            }
        }

        Ok(MarkAttendanceResult {
            record,
            notification_sent,
        })
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 点名表（全部学生 + 当前状态）
    pub fn attendance_sheet(&self, date: NaiveDate, hour: &str) -> ApiResult<Vec<AttendanceSheetRow>> {
        Ok(self.attendance_repo.sheet(date, hour.trim())?)
    }

    pub fn count_for_date(&self, date: NaiveDate) -> ApiResult<i64> {
        Ok(self.attendance_repo.count_by_date(date)?)
    }

    /// 最近 N 条考勤记录
    pub fn recent(&self, limit: u32) -> ApiResult<Vec<AttendanceEntry>> {
        Ok(self.attendance_repo.recent(limit)?)
    }
}
