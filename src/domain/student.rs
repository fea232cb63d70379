// ==========================================
// 学院教务管理系统 - 学生领域模型
// ==========================================
// 名册提供方: 座位编排只读取 department 作为分组键
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Student - 学生
// ==========================================
// 对齐: student 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,      // 学生ID (UUID)
    pub roll_number: String,     // 学号 (唯一展示键)
    pub name: String,            // 姓名
    pub department: String,      // 院系 (编排分组键)
    pub email: Option<String>,   // 学生邮箱
    pub mentor_email: String,    // 班导师邮箱 (缺勤通知收件人)
    pub created_at: NaiveDateTime,
}

// ==========================================
// NewStudent - 新增学生表单
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStudent {
    pub roll_number: String,
    pub name: String,
    pub department: String,
    pub email: Option<String>,
    pub mentor_email: String,
}

impl NewStudent {
    /// 去除首尾空白，空邮箱视为未填
    pub fn normalized(self) -> Self {
        Self {
            roll_number: self.roll_number.trim().to_string(),
            name: self.name.trim().to_string(),
            department: self.department.trim().to_string(),
            email: self
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            mentor_email: self.mentor_email.trim().to_string(),
        }
    }
}
