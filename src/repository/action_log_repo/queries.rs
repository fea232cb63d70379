use super::core::ActionLogRepository;
use crate::domain::action_log::ActionLog;
use crate::repository::error::RepositoryResult;
use crate::repository::row_util::parse_ts;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

const ACTION_LOG_COLUMNS: &str =
    "action_id, action_type, action_ts, actor, target_id, payload_json, detail";

impl ActionLogRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 action_id 查询单个日志
    pub fn find_by_id(&self, action_id: &str) -> RepositoryResult<Option<ActionLog>> {
        let conn = self.get_conn()?;
        let log = conn
            .query_row(
                &format!("SELECT {} FROM action_log WHERE action_id = ?", ACTION_LOG_COLUMNS),
                params![action_id],
                map_row,
            )
            .optional()?;
        Ok(log)
    }

    /// 查询指定对象的操作日志（新→旧）
    pub fn find_by_target(&self, target_id: &str) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM action_log WHERE target_id = ? ORDER BY action_ts DESC, rowid DESC",
            ACTION_LOG_COLUMNS
        ))?;
        let logs = stmt
            .query_map(params![target_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 查询指定操作类型的日志
    pub fn find_by_action_type(&self, action_type: &str, limit: u32) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM action_log WHERE action_type = ? ORDER BY action_ts DESC, rowid DESC LIMIT ?",
            ACTION_LOG_COLUMNS
        ))?;
        let logs = stmt
            .query_map(params![action_type, limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 查询最近的 N 条日志
    pub fn find_recent(&self, limit: u32) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM action_log ORDER BY action_ts DESC, rowid DESC LIMIT ?",
            ACTION_LOG_COLUMNS
        ))?;
        let logs = stmt
            .query_map(params![limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }
}

fn map_row(row: &Row) -> SqliteResult<ActionLog> {
    let action_ts: String = row.get(2)?;
    let payload_json: Option<String> = row.get(5)?;

    Ok(ActionLog {
        action_id: row.get(0)?,
        action_type: row.get(1)?,
        action_ts: parse_ts(2, &action_ts)?,
        actor: row.get(3)?,
        target_id: row.get(4)?,
        // 解析 JSON 字段（损坏的载荷视为空）
        payload_json: payload_json.and_then(|s| serde_json::from_str(&s).ok()),
        detail: row.get(6)?,
    })
}
