// ==========================================
// 学院教务管理系统 - 引擎层
// ==========================================
// 职责: 实现业务规则（座位分配/分组展示/预警判定/通知编排）
// 红线: Engine 不拼 SQL，不做 I/O
// ==========================================

pub mod arrangement_renderer;
pub mod notice;
pub mod seat_allocator;
pub mod weather_alert;

// 重导出核心引擎
pub use arrangement_renderer::{render, render_for_export, RoomGroup};
pub use seat_allocator::{
    validate_capacity, AllocationError, DepartmentShuffler, KeepOrder, RandomShuffler,
    SeatAllocator, SeededShuffler, MAX_ROOMS, MAX_SEATS_PER_ROOM,
};
pub use weather_alert::WeatherAlertRule;
