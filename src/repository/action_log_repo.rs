// ==========================================
// 学院教务管理系统 - 操作日志数据仓储
// ==========================================
// 红线: 操作员的所有写入必须记录
// ==========================================

mod core;
mod queries;


pub use core::ActionLogRepository;
pub(crate) use core::insert_on;
