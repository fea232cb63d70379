// ==========================================
// 学院教务管理系统 - 座位编排仓储
// ==========================================
// 红线: 考场 + 编排 + 操作日志在同一事务中写入，要么全成要么全不写
// 红线: 编排无更新接口（创建后不可变）
// 存储: 座位记录整体序列化为 JSON 存入 arrangement_data 列
// ==========================================

use crate::domain::action_log::ActionLog;
use crate::domain::seating::{
    decode_records, encode_records, Arrangement, ArrangementSummary, Room,
};
use crate::repository::action_log_repo::insert_on;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_util::{format_ts, parse_ts, to_u32};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct SeatingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SeatingRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 写入一次编排（编排元数据 + 座位记录 + 本次新建的考场 + 操作日志）
    ///
    /// # 参数
    /// - `rooms`: 本次编排新建的考场（与 arrangement.num_rooms 一致）
    /// - `arrangement`: 编排（含全部座位记录）
    /// - `audit`: 与编排一同提交的操作日志
    pub fn insert_arrangement(
        &self,
        rooms: &[Room],
        arrangement: &Arrangement,
        audit: &ActionLog,
    ) -> RepositoryResult<()> {
        let payload = encode_records(&arrangement.records)?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO seating_arrangement (
                arrangement_id, exam_name, num_rooms, seats_per_room,
                seated_count, arrangement_data, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                arrangement.arrangement_id,
                arrangement.exam_name,
                arrangement.num_rooms,
                arrangement.seats_per_room,
                arrangement.records.len() as i64,
                payload,
                format_ts(&arrangement.created_at),
            ],
        )?;

        for room in rooms {
            tx.execute(
                r#"
                INSERT INTO exam_room (room_id, arrangement_id, name, capacity, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
                params![
                    room.room_id,
                    arrangement.arrangement_id,
                    room.name,
                    room.capacity,
                    format_ts(&room.created_at),
                ],
            )?;
        }

        insert_on(&tx, audit)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::debug!(
            arrangement_id = %arrangement.arrangement_id,
            rooms = rooms.len(),
            seated = arrangement.records.len(),
            "座位编排已写入"
        );
        Ok(())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 ID 读取完整编排
    pub fn find_by_id(&self, arrangement_id: &str) -> RepositoryResult<Option<Arrangement>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT arrangement_id, exam_name, num_rooms, seats_per_room,
                       arrangement_data, created_at
                FROM seating_arrangement
                WHERE arrangement_id = ?
                "#,
                params![arrangement_id],
                map_arrangement_row,
            )
            .optional()?;

        match row {
            Some((mut arrangement, payload)) => {
                arrangement.records = decode_records(&payload)?;
                Ok(Some(arrangement))
            }
            None => Ok(None),
        }
    }

    /// 编排列表（新→旧，不含座位记录）
    pub fn list_summaries(&self) -> RepositoryResult<Vec<ArrangementSummary>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT arrangement_id, exam_name, num_rooms, seats_per_room,
                   seated_count, created_at
            FROM seating_arrangement
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let summaries = stmt
            .query_map([], |row| {
                let created_at: String = row.get(5)?;
                let seated_count: i64 = row.get(4)?;
                Ok(ArrangementSummary {
                    arrangement_id: row.get(0)?,
                    exam_name: row.get(1)?,
                    num_rooms: to_u32(2, row.get(2)?)?,
                    seats_per_room: to_u32(3, row.get(3)?)?,
                    seated_count: usize::try_from(seated_count)
                        .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(4, seated_count))?,
                    created_at: parse_ts(5, &created_at)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(summaries)
    }

    /// 某次编排新建的考场（按名称序号顺序）
    pub fn list_rooms(&self, arrangement_id: &str) -> RepositoryResult<Vec<Room>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT room_id, name, capacity, created_at
            FROM exam_room
            WHERE arrangement_id = ?
            ORDER BY rowid ASC
            "#,
        )?;
        let rooms = stmt
            .query_map(params![arrangement_id], |row| {
                let created_at: String = row.get(3)?;
                Ok(Room {
                    room_id: row.get(0)?,
                    name: row.get(1)?,
                    capacity: to_u32(2, row.get(2)?)?,
                    created_at: parse_ts(3, &created_at)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rooms)
    }
}

/// 映射编排行（座位记录载荷由调用方解码）
fn map_arrangement_row(row: &Row) -> SqliteResult<(Arrangement, String)> {
    let payload: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    Ok((
        Arrangement {
            arrangement_id: row.get(0)?,
            exam_name: row.get(1)?,
            num_rooms: to_u32(2, row.get(2)?)?,
            seats_per_room: to_u32(3, row.get(3)?)?,
            records: Vec::new(),
            created_at: parse_ts(5, &created_at)?,
        },
        payload,
    ))
}
