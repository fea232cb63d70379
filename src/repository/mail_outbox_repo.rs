// ==========================================
// 学院教务管理系统 - 邮件发件箱仓储
// ==========================================
// 外部中继读取 sent_at IS NULL 的行并投递
// ==========================================

use crate::domain::mail::OutboundMail;
use crate::domain::types::MailKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_util::{format_ts, parse_ts};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct MailOutboxRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MailOutboxRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn enqueue(&self, mail: &OutboundMail) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO mail_outbox (mail_id, kind, recipient, subject, body, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                mail.mail_id,
                mail.kind.to_string(),
                mail.recipient,
                mail.subject,
                mail.body,
                format_ts(&mail.created_at),
            ],
        )?;
        Ok(())
    }

    /// 待投递邮件（旧→新）
    pub fn list_pending(&self, limit: u32) -> RepositoryResult<Vec<OutboundMail>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT mail_id, kind, recipient, subject, body, created_at
            FROM mail_outbox
            WHERE sent_at IS NULL
            ORDER BY created_at ASC, rowid ASC
            LIMIT ?
            "#,
        )?;
        let mails = stmt
            .query_map(params![limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(mails)
    }

    /// 标记已投递
    ///
    /// # 返回
    /// - Err(NotFound): 邮件不存在或已标记
    pub fn mark_sent(&self, mail_id: &str, sent_at: NaiveDateTime) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE mail_outbox SET sent_at = ? WHERE mail_id = ? AND sent_at IS NULL",
            params![format_ts(&sent_at), mail_id],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "OutboundMail".to_string(),
                id: mail_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn count_pending(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM mail_outbox WHERE sent_at IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}

fn map_row(row: &Row) -> SqliteResult<OutboundMail> {
    let kind: String = row.get(1)?;
    let created_at: String = row.get(5)?;
    Ok(OutboundMail {
        mail_id: row.get(0)?,
        kind: MailKind::parse(&kind).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                Type::Text,
                format!("未知邮件类型: {}", kind).into(),
            )
        })?,
        recipient: row.get(2)?,
        subject: row.get(3)?,
        body: row.get(4)?,
        created_at: parse_ts(5, &created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_and_mark_sent() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        let repo = MailOutboxRepository::new(Arc::new(Mutex::new(conn)));

        let mail = OutboundMail::new(
            MailKind::AbsenceAlert,
            "mentor@college.edu",
            "Attendance Alert - Asha Absent".to_string(),
            "body".to_string(),
        );
        repo.enqueue(&mail).unwrap();

        let pending = repo.list_pending(10).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, MailKind::AbsenceAlert);

        let now = chrono::Local::now().naive_local();
        repo.mark_sent(&mail.mail_id, now).unwrap();
        assert_eq!(repo.count_pending().unwrap(), 0);
        assert!(repo.mark_sent(&mail.mail_id, now).is_err());
    }
}
