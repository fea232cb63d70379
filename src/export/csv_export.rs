// ==========================================
// 学院教务管理系统 - 座位表 CSV 导出
// ==========================================
// 格式: 扁平表，首列为考场名，其余列与导出文档表头一致
// ==========================================

use crate::export::SeatingExport;
use crate::i18n::t;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvExportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV 缓冲区导出失败: {0}")]
    Buffer(String),
}

/// 渲染为 CSV 字节（UTF-8）
pub fn render_csv(export: &SeatingExport) -> Result<Vec<u8>, CsvExportError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    let mut header = vec![t("export.columns.room")];
    header.extend(export.columns.iter().cloned());
    writer.write_record(&header)?;

    for section in &export.sections {
        for row in &section.rows {
            writer.write_record(
                std::iter::once(section.room_name.as_str()).chain(row.iter().map(String::as_str)),
            )?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| CsvExportError::Buffer(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportSection;

    #[test]
    fn test_render_csv_quotes_and_orders_rows() {
        let export = SeatingExport {
            arrangement_id: "a1".to_string(),
            title: "Seating Arrangement - Final".to_string(),
            generated_at: String::new(),
            columns: vec![
                "Seat".to_string(),
                "Roll No".to_string(),
                "Name".to_string(),
                "Department".to_string(),
            ],
            sections: vec![ExportSection {
                room_name: "Room 1".to_string(),
                heading: "Room 1".to_string(),
                rows: vec![[
                    "1".to_string(),
                    "CS001".to_string(),
                    "Doe, Jane".to_string(),
                    "CS".to_string(),
                ]],
            }],
        };

        let text = String::from_utf8(render_csv(&export).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Seat,Roll No,Name,Department"));
        assert_eq!(lines[1], "Room 1,1,CS001,\"Doe, Jane\",CS");
    }
}
