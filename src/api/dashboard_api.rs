// ==========================================
// 学院教务管理系统 - 驾驶舱 API
// ==========================================
// 职责: 首页概览（学生总数/今日考勤/最新天气/最近考勤）
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::error::ApiResult;
use crate::domain::attendance::AttendanceEntry;
use crate::domain::weather::WeatherLog;
use crate::repository::attendance_repo::AttendanceRepository;
use crate::repository::student_repo::StudentRepository;
use crate::repository::weather_repo::WeatherLogRepository;

/// 最近考勤条数
pub const RECENT_ATTENDANCE_LIMIT: u32 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub total_students: i64,
    pub date: NaiveDate,
    pub attendance_count: i64,
    pub latest_weather: Option<WeatherLog>,
    pub recent_attendance: Vec<AttendanceEntry>,
}

pub struct DashboardApi {
    student_repo: Arc<StudentRepository>,
    attendance_repo: Arc<AttendanceRepository>,
    weather_repo: Arc<WeatherLogRepository>,
}

impl DashboardApi {
    pub fn new(
        student_repo: Arc<StudentRepository>,
        attendance_repo: Arc<AttendanceRepository>,
        weather_repo: Arc<WeatherLogRepository>,
    ) -> Self {
        Self {
            student_repo,
            attendance_repo,
            weather_repo,
        }
    }

    /// 今日概览
    pub fn overview(&self) -> ApiResult<DashboardOverview> {
        self.overview_for(chrono::Local::now().date_naive())
    }

    /// 指定日期概览
    pub fn overview_for(&self, date: NaiveDate) -> ApiResult<DashboardOverview> {
        Ok(DashboardOverview {
            total_students: self.student_repo.count()?,
            date,
            attendance_count: self.attendance_repo.count_by_date(date)?,
            latest_weather: self.weather_repo.latest()?,
            recent_attendance: self.attendance_repo.recent(RECENT_ATTENDANCE_LIMIT)?,
        })
    }
}
