// ==========================================
// 学院教务管理系统 - 学生名册仓储
// ==========================================
// 红线: Repository 不含业务逻辑（字段校验在 API 层）
// ==========================================

use crate::domain::student::Student;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_util::{format_ts, parse_ts};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const STUDENT_COLUMNS: &str =
    "student_id, roll_number, name, department, email, mentor_email, created_at";

pub struct StudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入学生
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 学号重复
    pub fn insert(&self, student: &Student) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            &format!("INSERT INTO student ({}) VALUES (?, ?, ?, ?, ?, ?, ?)", STUDENT_COLUMNS),
            params![
                student.student_id,
                student.roll_number,
                student.name,
                student.department,
                student.email,
                student.mentor_email,
                format_ts(&student.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, student_id: &str) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let student = conn
            .query_row(
                &format!("SELECT {} FROM student WHERE student_id = ?", STUDENT_COLUMNS),
                params![student_id],
                map_row,
            )
            .optional()?;
        Ok(student)
    }

    pub fn find_by_roll_number(&self, roll_number: &str) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let student = conn
            .query_row(
                &format!("SELECT {} FROM student WHERE roll_number = ?", STUDENT_COLUMNS),
                params![roll_number],
                map_row,
            )
            .optional()?;
        Ok(student)
    }

    /// 全部学生（名册顺序 = 登记顺序）
    ///
    /// 座位编排依赖此顺序确定院系首次出现顺序与组内顺序
    pub fn list_all(&self) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM student ORDER BY created_at ASC, rowid ASC",
            STUDENT_COLUMNS
        ))?;
        let students = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(students)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM student", [], |row| row.get(0))?;
        Ok(n)
    }
}

fn map_row(row: &Row) -> SqliteResult<Student> {
    let created_at: String = row.get(6)?;
    Ok(Student {
        student_id: row.get(0)?,
        roll_number: row.get(1)?,
        name: row.get(2)?,
        department: row.get(3)?,
        email: row.get(4)?,
        mentor_email: row.get(5)?,
        created_at: parse_ts(6, &created_at)?,
    })
}
