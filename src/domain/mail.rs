// ==========================================
// 学院教务管理系统 - 外发邮件领域模型
// ==========================================

use crate::domain::types::MailKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// OutboundMail - 待投递邮件
// ==========================================
// 对齐: mail_outbox 表；由外部中继投递
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMail {
    pub mail_id: String,
    pub kind: MailKind,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

impl OutboundMail {
    pub fn new(kind: MailKind, recipient: &str, subject: String, body: String) -> Self {
        Self {
            mail_id: uuid::Uuid::new_v4().to_string(),
            kind,
            recipient: recipient.to_string(),
            subject,
            body,
            created_at: chrono::Local::now().naive_local(),
        }
    }
}
