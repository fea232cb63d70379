// ==========================================
// 学院教务管理系统 - 考场座位领域模型
// ==========================================
// 红线: 编排结果创建后不可修改（只在创建时整体写入）
// 红线: 座位记录冗余学生/考场展示字段，源记录变更后仍可完整展示
// ==========================================

use crate::domain::student::Student;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Room - 考场
// ==========================================
// 每次编排新建，不跨编排复用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,      // 考场ID (UUID)
    pub name: String,         // 展示名 ("Room 1"...)
    pub capacity: u32,        // 座位数 (>0)
    pub created_at: NaiveDateTime,
}

impl Room {
    /// 按编排序号（从 1 开始）生成考场展示名
    pub fn display_name(ordinal: u32) -> String {
        format!("Room {}", ordinal)
    }
}

// ==========================================
// SeatAssignment - 分配器输出（引用名册）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatAssignment<'a> {
    pub student: &'a Student,
    pub room_index: usize, // 考场下标 (0 起)
    pub seat_number: u32,  // 座位号 (1 起，考场内唯一且连续)
}

impl SeatAssignment<'_> {
    /// 冗余展开为存储记录
    pub fn to_record(&self, room: &Room) -> SeatRecord {
        SeatRecord {
            student_id: self.student.student_id.clone(),
            student_name: self.student.name.clone(),
            student_roll: self.student.roll_number.clone(),
            student_dept: self.student.department.clone(),
            room_id: room.room_id.clone(),
            room_name: room.name.clone(),
            seat_number: self.seat_number,
        }
    }
}

// ==========================================
// SeatRecord - 存储形态的座位记录
// ==========================================
// 字段顺序即序列化顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub student_id: String,
    pub student_name: String,
    pub student_roll: String,
    pub student_dept: String,
    pub room_id: String,
    pub room_name: String,
    pub seat_number: u32,
}

/// 座位记录列表编码（JSON 数组）
pub fn encode_records(records: &[SeatRecord]) -> serde_json::Result<String> {
    serde_json::to_string(records)
}

/// 座位记录列表解码
pub fn decode_records(payload: &str) -> serde_json::Result<Vec<SeatRecord>> {
    serde_json::from_str(payload)
}

// ==========================================
// Arrangement - 座位编排
// ==========================================
// 元数据（考试名/考场数/每场座位数）与座位记录分开存储
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    pub arrangement_id: String,
    pub exam_name: String,
    pub num_rooms: u32,
    pub seats_per_room: u32,
    pub records: Vec<SeatRecord>, // 按落座顺序
    pub created_at: NaiveDateTime,
}

impl Arrangement {
    /// 声明总座位数
    pub fn total_capacity(&self) -> u64 {
        u64::from(self.num_rooms) * u64::from(self.seats_per_room)
    }

    /// 列表展示用摘要
    pub fn summary(&self) -> ArrangementSummary {
        ArrangementSummary {
            arrangement_id: self.arrangement_id.clone(),
            exam_name: self.exam_name.clone(),
            num_rooms: self.num_rooms,
            seats_per_room: self.seats_per_room,
            seated_count: self.records.len(),
            created_at: self.created_at,
        }
    }
}

// ==========================================
// ArrangementSummary - 编排列表项（不含座位记录）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementSummary {
    pub arrangement_id: String,
    pub exam_name: String,
    pub num_rooms: u32,
    pub seats_per_room: u32,
    pub seated_count: usize,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_student() -> Student {
        Student {
            student_id: "S1".to_string(),
            roll_number: "CS001".to_string(),
            name: "Asha".to_string(),
            department: "CS".to_string(),
            email: None,
            mentor_email: "mentor@college.edu".to_string(),
            created_at: chrono::Local::now().naive_local(),
        }
    }

    #[test]
    fn test_to_record_denormalizes_display_fields() {
        let student = sample_student();
        let room = Room {
            room_id: "R1".to_string(),
            name: Room::display_name(1),
            capacity: 30,
            created_at: chrono::Local::now().naive_local(),
        };
        let assignment = SeatAssignment {
            student: &student,
            room_index: 0,
            seat_number: 4,
        };

        let record = assignment.to_record(&room);
        assert_eq!(record.student_roll, "CS001");
        assert_eq!(record.student_dept, "CS");
        assert_eq!(record.room_name, "Room 1");
        assert_eq!(record.seat_number, 4);
    }

    #[test]
    fn test_payload_keeps_field_order() {
        let student = sample_student();
        let room = Room {
            room_id: "R1".to_string(),
            name: "Room 1".to_string(),
            capacity: 1,
            created_at: chrono::Local::now().naive_local(),
        };
        let record = SeatAssignment {
            student: &student,
            room_index: 0,
            seat_number: 1,
        }
        .to_record(&room);

        let payload = encode_records(std::slice::from_ref(&record)).unwrap();
        assert!(payload.find("student_id").unwrap() < payload.find("seat_number").unwrap());
        assert_eq!(decode_records(&payload).unwrap(), vec![record]);
    }
}
