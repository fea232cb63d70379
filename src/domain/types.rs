// ==========================================
// 学院教务管理系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 数据库内时间戳统一格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 数据库内日期统一格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// 考勤状态 (Attendance Status)
// ==========================================
// 序列化格式: lowercase (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present, // 出勤
    Absent,  // 缺勤
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AttendanceStatus {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }

    /// 从字符串解析（大小写不敏感，前后空白忽略）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }

    /// 展示用名称（邮件正文）
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

// ==========================================
// 外发邮件类型 (Mail Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MailKind {
    AbsenceAlert, // 缺勤通知（发给导师）
    WeatherAlert, // 天气预警（发给学院管理邮箱）
}

impl fmt::Display for MailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailKind::AbsenceAlert => write!(f, "ABSENCE_ALERT"),
            MailKind::WeatherAlert => write!(f, "WEATHER_ALERT"),
        }
    }
}

impl MailKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ABSENCE_ALERT" => Some(MailKind::AbsenceAlert),
            "WEATHER_ALERT" => Some(MailKind::WeatherAlert),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_status_parse() {
        assert_eq!(AttendanceStatus::parse("absent"), Some(AttendanceStatus::Absent));
        assert_eq!(AttendanceStatus::parse(" Present "), Some(AttendanceStatus::Present));
        assert_eq!(AttendanceStatus::parse("late"), None);
    }

    #[test]
    fn test_attendance_status_serde() {
        let json = serde_json::to_string(&AttendanceStatus::Absent).unwrap();
        assert_eq!(json, "\"absent\"");
    }

    #[test]
    fn test_mail_kind_round_trip() {
        for kind in [MailKind::AbsenceAlert, MailKind::WeatherAlert] {
            assert_eq!(MailKind::parse(&kind.to_string()), Some(kind));
        }
    }
}
