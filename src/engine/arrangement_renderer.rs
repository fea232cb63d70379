// ==========================================
// 学院教务管理系统 - 座位编排展示引擎
// ==========================================
// 职责: 将座位记录按考场分组，组内按座位号排序
// 红线: 纯函数，不修改输入，多次调用结果一致
// ==========================================

use crate::domain::seating::SeatRecord;
use serde::Serialize;

// ==========================================
// RoomGroup - 单个考场的座位视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomGroup {
    pub room_name: String,
    pub records: Vec<SeatRecord>, // 按 seat_number 升序
}

impl RoomGroup {
    pub fn seated_count(&self) -> usize {
        self.records.len()
    }
}

/// 按考场展示名分组
///
/// 分组顺序 = 考场名首次出现顺序；组内按座位号稳定升序
pub fn render(records: &[SeatRecord]) -> Vec<RoomGroup> {
    let mut groups: Vec<RoomGroup> = Vec::new();

    for record in records {
        match groups.iter_mut().find(|g| g.room_name == record.room_name) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(RoomGroup {
                room_name: record.room_name.clone(),
                records: vec![record.clone()],
            }),
        }
    }

    for group in &mut groups {
        group.records.sort_by_key(|r| r.seat_number);
    }

    groups
}

/// 导出用分组：在 render 基础上按考场名（字节序）排序
///
/// 注意: 字节序下 "Room 10" 排在 "Room 2" 之前
pub fn render_for_export(records: &[SeatRecord]) -> Vec<RoomGroup> {
    let mut groups = render(records);
    groups.sort_by(|a, b| a.room_name.cmp(&b.room_name));
    groups
}
