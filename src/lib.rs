// ==========================================
// 学院教务管理系统 - 核心库
// ==========================================
// 功能: 学生名册 / 考勤与缺勤通知 / 天气轮询与预警 / 考场座位编排与导出
// 技术栈: Rust + SQLite + tokio
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 邮件投递
pub mod notify;

// 天气数据源与轮询
pub mod weather;

// 座位表导出（CSV/PDF）
pub mod export;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与命令
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AttendanceStatus, MailKind};

// 领域实体
pub use domain::{
    ActionLog, ActionType, Arrangement, AttendanceRecord, OutboundMail, Room, SeatRecord,
    Student, WeatherLog,
};

// 引擎
pub use engine::{AllocationError, SeatAllocator, WeatherAlertRule};

// API
pub use api::{AttendanceApi, SeatingApi, StudentApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "学院教务管理系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
