// ==========================================
// 学院教务管理系统 - JSON 命令（按域拆分）
// ==========================================
// 职责: 面向外壳（Web/桌面）的命令函数，入参为原始字符串，出参为 JSON
// 约定: Ok(String) 为结果 JSON；Err(String) 为 ErrorResponse JSON
// ==========================================

mod attendance;
mod common;
mod config;
mod dashboard;
mod seating;
mod student;
mod weather;

pub use attendance::*;
pub use common::ErrorResponse;
pub use config::*;
pub use dashboard::*;
pub use seating::*;
pub use student::*;
pub use weather::*;
