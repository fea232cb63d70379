// ==========================================
// 学院教务管理系统 - 应用层
// ==========================================
// 职责: 状态装配 + JSON 命令，连接外壳与后端
// ==========================================

pub mod commands;
pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
