// ==========================================
// 学院教务管理系统 - 天气日志仓储
// ==========================================

use crate::domain::weather::WeatherLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_util::{format_ts, parse_ts};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct WeatherLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WeatherLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, log: &WeatherLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO weather_log (
                log_id, temperature_c, description, main_condition, city, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                log.log_id,
                log.temperature_c,
                log.description,
                log.main_condition,
                log.city,
                format_ts(&log.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn latest(&self) -> RepositoryResult<Option<WeatherLog>> {
        Ok(self.recent(1)?.into_iter().next())
    }

    /// 最近 N 条（新→旧）
    pub fn recent(&self, limit: u32) -> RepositoryResult<Vec<WeatherLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT log_id, temperature_c, description, main_condition, city, created_at
            FROM weather_log
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )?;
        let logs = stmt
            .query_map(params![limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    pub fn find_by_id(&self, log_id: &str) -> RepositoryResult<Option<WeatherLog>> {
        let conn = self.get_conn()?;
        let log = conn
            .query_row(
                r#"
                SELECT log_id, temperature_c, description, main_condition, city, created_at
                FROM weather_log WHERE log_id = ?
                "#,
                params![log_id],
                map_row,
            )
            .optional()?;
        Ok(log)
    }
}

fn map_row(row: &Row) -> SqliteResult<WeatherLog> {
    let created_at: String = row.get(5)?;
    Ok(WeatherLog {
        log_id: row.get(0)?,
        temperature_c: row.get(1)?,
        description: row.get(2)?,
        main_condition: row.get(3)?,
        city: row.get(4)?,
        created_at: parse_ts(5, &created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn log(id: &str, ts: &str, temp: f64) -> WeatherLog {
        WeatherLog {
            log_id: id.to_string(),
            temperature_c: temp,
            description: "scattered clouds".to_string(),
            main_condition: "clouds".to_string(),
            city: "Mumbai".to_string(),
            created_at: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
        }
    }

    #[test]
    fn test_latest_and_recent() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        let repo = WeatherLogRepository::new(Arc::new(Mutex::new(conn)));

        assert!(repo.latest().unwrap().is_none());
        repo.insert(&log("w1", "2024-06-01 08:00:00", 31.0)).unwrap();
        repo.insert(&log("w2", "2024-06-01 09:00:00", 33.5)).unwrap();

        let latest = repo.latest().unwrap().unwrap();
        assert_eq!(latest.log_id, "w2");
        assert_eq!(latest.temperature_c, 33.5);
        assert_eq!(repo.recent(24).unwrap().len(), 2);
        assert!(repo.find_by_id("w1").unwrap().is_some());
    }
}
