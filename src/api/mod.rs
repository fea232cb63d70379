// ==========================================
// 学院教务管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令层调用
// ==========================================

pub mod attendance_api;
pub mod config_api;
pub mod dashboard_api;
pub mod error;
pub mod seating_api;
pub mod student_api;
pub mod weather_api;

// 重导出核心类型
pub use attendance_api::{AttendanceApi, MarkAttendanceResult};
pub use config_api::ConfigApi;
pub use dashboard_api::{DashboardApi, DashboardOverview};
pub use error::{ApiError, ApiResult};
pub use seating_api::{ArrangementView, CreateArrangementResult, ExportedFile, SeatingApi};
pub use student_api::StudentApi;
pub use weather_api::WeatherApi;
