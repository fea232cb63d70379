// ==========================================
// 学院教务管理系统 - 座位表导出
// ==========================================
// 职责: 将编排转换为与格式无关的导出文档，再由 CSV/PDF 渲染
// 规则: 考场按名称（字节序）排序，考场内按座位号升序
// ==========================================

pub mod csv_export;
pub mod pdf;

use crate::domain::seating::Arrangement;
use crate::domain::types::TIMESTAMP_FORMAT;
use crate::engine::arrangement_renderer::render_for_export;
use crate::i18n::{t, t_with_args};
use serde::Serialize;

/// 表头翻译键（列顺序固定）
pub const COLUMN_KEYS: [&str; 4] = [
    "export.columns.seat",
    "export.columns.roll",
    "export.columns.name",
    "export.columns.department",
];

// ==========================================
// SeatingExport - 导出文档
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatingExport {
    pub arrangement_id: String,
    pub title: String,
    pub generated_at: String,
    pub columns: Vec<String>,
    pub sections: Vec<ExportSection>,
}

/// 单个考场的表格
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSection {
    pub room_name: String,
    pub heading: String,
    pub rows: Vec<[String; 4]>, // [座位号, 学号, 姓名, 院系]
}

impl SeatingExport {
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

/// 构建导出文档
pub fn build_seating_export(arrangement: &Arrangement) -> SeatingExport {
    let sections = render_for_export(&arrangement.records)
        .into_iter()
        .map(|group| {
            let count = group.seated_count().to_string();
            let rows = group
                .records
                .iter()
                .map(|r| {
                    [
                        r.seat_number.to_string(),
                        r.student_roll.clone(),
                        r.student_name.clone(),
                        r.student_dept.clone(),
                    ]
                })
                .collect();
            ExportSection {
                heading: t_with_args(
                    "export.room_heading",
                    &[("room", group.room_name.as_str()), ("count", count.as_str())],
                ),
                room_name: group.room_name,
                rows,
            }
        })
        .collect();

    let generated = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

    SeatingExport {
        arrangement_id: arrangement.arrangement_id.clone(),
        title: t_with_args("export.title", &[("exam", arrangement.exam_name.as_str())]),
        generated_at: t_with_args("export.generated_at", &[("ts", generated.as_str())]),
        columns: COLUMN_KEYS.iter().map(|k| t(k)).collect(),
        sections,
    }
}

/// 导出文件名（seating_arrangement_{id}.{ext}）
pub fn export_file_name(arrangement_id: &str, extension: &str) -> String {
    let safe_id: String = arrangement_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("seating_arrangement_{}.{}", safe_id, extension)
}
