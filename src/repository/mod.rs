// ==========================================
// 学院教务管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod action_log_repo;
pub mod attendance_repo;
pub mod error;
pub mod mail_outbox_repo;
mod row_util;
pub mod seating_repo;
pub mod student_repo;
pub mod weather_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use attendance_repo::AttendanceRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use mail_outbox_repo::MailOutboxRepository;
pub use seating_repo::SeatingRepository;
pub use student_repo::StudentRepository;
pub use weather_repo::WeatherLogRepository;
