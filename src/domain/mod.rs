// ==========================================
// 学院教务管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod attendance;
pub mod mail;
pub mod seating;
pub mod student;
pub mod types;
pub mod weather;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use attendance::{AttendanceEntry, AttendanceMark, AttendanceRecord, AttendanceSheetRow};
pub use mail::OutboundMail;
pub use seating::{Arrangement, ArrangementSummary, Room, SeatAssignment, SeatRecord};
pub use student::{NewStudent, Student};
pub use types::{AttendanceStatus, MailKind};
pub use weather::{WeatherAlertKind, WeatherAssessment, WeatherLog, WeatherObservation};
