// ==========================================
// 学院教务管理系统 - 邮件通知
// ==========================================
// 职责: 定义邮件投递接口；默认实现写入发件箱，由外部中继投递
// 红线: 调用方只记录投递失败，不向上传播
// ==========================================

use crate::domain::mail::OutboundMail;
use crate::repository::mail_outbox_repo::MailOutboxRepository;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

// ==========================================
// MailError - 投递错误
// ==========================================
#[derive(Error, Debug)]
pub enum MailError {
    #[error("收件人地址无效: {0}")]
    InvalidRecipient(String),

    #[error("发件箱写入失败: {0}")]
    Outbox(String),

    #[error("邮件投递失败: {0}")]
    Transport(String),
}

// ==========================================
// Mailer Trait
// ==========================================
// 实现者: OutboxMailer（落库）
#[async_trait]
pub trait Mailer: Send + Sync {
    /// 投递一封邮件
    ///
    /// # 返回
    /// - Ok(()): 已交付（发件箱/中继）
    /// - Err(MailError): 投递失败
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError>;
}

/// 最基本的收件人格式检查（local@domain）
pub fn validate_recipient(recipient: &str) -> Result<(), MailError> {
    let trimmed = recipient.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !trimmed.contains(' ') => {
            Ok(())
        }
        _ => Err(MailError::InvalidRecipient(recipient.to_string())),
    }
}

// ==========================================
// OutboxMailer - 写入 mail_outbox 表
// ==========================================
pub struct OutboxMailer {
    outbox_repo: Arc<MailOutboxRepository>,
    sender: String,
}

impl OutboxMailer {
    pub fn new(outbox_repo: Arc<MailOutboxRepository>, sender: impl Into<String>) -> Self {
        Self {
            outbox_repo,
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError> {
        validate_recipient(&mail.recipient)?;

        let repo = self.outbox_repo.clone();
        let owned = mail.clone();
        tokio::task::spawn_blocking(move || repo.enqueue(&owned))
            .await
            .map_err(|e| MailError::Outbox(e.to_string()))?
            .map_err(|e| MailError::Outbox(e.to_string()))?;

        tracing::info!(
            mail_id = %mail.mail_id,
            kind = %mail.kind,
            from = %self.sender,
            to = %mail.recipient,
            "邮件已写入发件箱"
        );
        Ok(())
    }
}
