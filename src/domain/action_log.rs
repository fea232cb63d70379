// ==========================================
// 学院教务管理系统 - 操作日志领域模型
// ==========================================
// 红线: 操作员的所有写入必须记录
// 用途: 审计追踪
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
// 对齐: action_log 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,          // 日志ID (UUID)
    pub action_type: String,        // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,   // 操作时间戳
    pub actor: String,              // 操作人
    pub target_id: Option<String>,  // 操作对象ID (学生/编排/考勤)
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,     // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    StudentAdded,     // 新增学生
    AttendanceMarked, // 考勤标记
    SeatingCreated,   // 生成座位编排
    ConfigUpdated,    // 修改配置
}

impl ActionType {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::StudentAdded => "StudentAdded",
            ActionType::AttendanceMarked => "AttendanceMarked",
            ActionType::SeatingCreated => "SeatingCreated",
            ActionType::ConfigUpdated => "ConfigUpdated",
        }
    }

    /// 从字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "StudentAdded" => Some(ActionType::StudentAdded),
            "AttendanceMarked" => Some(ActionType::AttendanceMarked),
            "SeatingCreated" => Some(ActionType::SeatingCreated),
            "ConfigUpdated" => Some(ActionType::ConfigUpdated),
            _ => None,
        }
    }
}

// ==========================================
// ActionLog 辅助方法
// ==========================================
impl ActionLog {
    /// 创建新的操作日志（自动生成ID与时间戳）
    pub fn new(action_type: ActionType, actor: &str) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor: actor.to_string(),
            target_id: None,
            payload_json: None,
            detail: None,
        }
    }

    /// 设置操作对象
    pub fn with_target(mut self, target_id: &str) -> Self {
        self.target_id = Some(target_id.to_string());
        self
    }

    /// 设置操作负载 (转换为JSON)
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Self {
        self.payload_json = serde_json::to_value(payload).ok();
        self
    }

    /// 设置详细描述
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
