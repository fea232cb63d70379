// ==========================================
// 学院教务管理系统 - 考勤仓储
// ==========================================
// 唯一约束: (student_id, date, hour)；重复标记走 upsert
// ==========================================

use crate::domain::attendance::{
    AttendanceEntry, AttendanceMark, AttendanceRecord, AttendanceSheetRow,
};
use crate::domain::student::Student;
use crate::domain::types::AttendanceStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_util::{format_date, format_ts, parse_date, parse_ts};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const ATTENDANCE_COLUMNS: &str =
    "a.attendance_id, a.student_id, a.date, a.hour, a.status, a.reason, a.created_at, a.updated_at";

pub struct AttendanceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AttendanceRepository {
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

    /// 标记考勤（已存在则更新状态/原因并刷新 updated_at）
    ///
    /// # 返回
    /// - Ok(AttendanceRecord): 写入后的记录
    /// - Err(ForeignKeyViolation): 学生不存在
    pub fn upsert(&self, mark: &AttendanceMark, now: NaiveDateTime) -> RepositoryResult<AttendanceRecord> {
        let conn = self.get_conn()?;
        let ts = format_ts(&now);
        let date = format_date(&mark.date);

        conn.execute(
            r#"
            INSERT INTO attendance (
                attendance_id, student_id, date, hour, status, reason, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(student_id, date, hour) DO UPDATE SET
                status = excluded.status,
                reason = excluded.reason,
                updated_at = excluded.updated_at
            "#,
            params![
                uuid::Uuid::new_v4().to_string(),
                mark.student_id,
                date,
                mark.hour,
                mark.status.as_str(),
                mark.reason,
                ts,
                ts,
            ],
        )?;

        let record = conn.query_row(
            &format!(
                "SELECT {} FROM attendance a WHERE a.student_id = ? AND a.date = ? AND a.hour = ?",
                ATTENDANCE_COLUMNS
            ),
            params![mark.student_id, date, mark.hour],
            map_record,
        )?;
        Ok(record)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find(
        &self,
        student_id: &str,
        date: NaiveDate,
        hour: &str,
    ) -> RepositoryResult<Option<AttendanceRecord>> {
        let conn = self.get_conn()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {} FROM attendance a WHERE a.student_id = ? AND a.date = ? AND a.hour = ?",
                    ATTENDANCE_COLUMNS
                ),
                params![student_id, format_date(&date), hour],
                map_record,
            )
            .optional()?;
        Ok(record)
    }

    /// 点名表：全部学生（名册顺序）+ 该日该课时的考勤状态
    pub fn sheet(&self, date: NaiveDate, hour: &str) -> RepositoryResult<Vec<AttendanceSheetRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.student_id, s.roll_number, s.name, s.department, s.email,
                   s.mentor_email, s.created_at, a.status
            FROM student s
            LEFT JOIN attendance a
              ON a.student_id = s.student_id AND a.date = ? AND a.hour = ?
            ORDER BY s.created_at ASC, s.rowid ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![format_date(&date), hour], |row| {
                let created_at: String = row.get(6)?;
                let status: Option<String> = row.get(7)?;
                Ok(AttendanceSheetRow {
                    student: Student {
                        student_id: row.get(0)?,
                        roll_number: row.get(1)?,
                        name: row.get(2)?,
                        department: row.get(3)?,
                        email: row.get(4)?,
                        mentor_email: row.get(5)?,
                        created_at: parse_ts(6, &created_at)?,
                    },
                    status: status.as_deref().map(|s| parse_status(7, s)).transpose()?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 某日考勤记录数
    pub fn count_by_date(&self, date: NaiveDate) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM attendance WHERE date = ?",
            params![format_date(&date)],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// 最近 N 条考勤（新→旧，带学生姓名/学号）
    pub fn recent(&self, limit: u32) -> RepositoryResult<Vec<AttendanceEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}, s.name, s.roll_number
            FROM attendance a
            JOIN student s ON s.student_id = a.student_id
            ORDER BY a.created_at DESC, a.rowid DESC
            LIMIT ?
            "#,
            ATTENDANCE_COLUMNS
        ))?;

        let entries = stmt
            .query_map(params![limit], |row| {
                Ok(AttendanceEntry {
                    record: map_record(row)?,
                    student_name: row.get(8)?,
                    roll_number: row.get(9)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }
}

fn parse_status(idx: usize, raw: &str) -> SqliteResult<AttendanceStatus> {
    AttendanceStatus::parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("未知考勤状态: {}", raw).into(),
        )
    })
}

fn map_record(row: &Row) -> SqliteResult<AttendanceRecord> {
    let date: String = row.get(2)?;
    let status: String = row.get(4)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(AttendanceRecord {
        attendance_id: row.get(0)?,
        student_id: row.get(1)?,
        date: parse_date(2, &date)?,
        hour: row.get(3)?,
        status: parse_status(4, &status)?,
        reason: row.get(5)?,
        created_at: parse_ts(6, &created_at)?,
        updated_at: parse_ts(7, &updated_at)?,
    })
}
