// ==========================================
// 学院教务管理系统 - 考勤领域模型
// ==========================================
// 唯一约束: (student_id, date, hour)
// ==========================================

use crate::domain::student::Student;
use crate::domain::types::AttendanceStatus;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 课时标签最大长度
pub const MAX_HOUR_LABEL_LEN: usize = 10;

// ==========================================
// AttendanceRecord - 考勤记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub attendance_id: String,
    pub student_id: String,
    pub date: NaiveDate,
    pub hour: String,               // 课时标签 ("1".."8" 等)
    pub status: AttendanceStatus,
    pub reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// AttendanceMark - 考勤标记请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub student_id: String,
    pub date: NaiveDate,
    pub hour: String,
    pub status: AttendanceStatus,
    pub reason: Option<String>,
}

// ==========================================
// AttendanceEntry - 考勤记录 + 学生展示字段（驾驶舱最近记录）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub record: AttendanceRecord,
    pub student_name: String,
    pub roll_number: String,
}

// ==========================================
// AttendanceSheetRow - 某日某课时点名表行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSheetRow {
    pub student: Student,
    pub status: Option<AttendanceStatus>, // None = 尚未点名
}
