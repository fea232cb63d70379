// ==========================================
// 学院教务管理系统 - 座位表 PDF 导出
// ==========================================
// 输出: PDF 1.4，A4 纵向，内置 Helvetica / Helvetica-Bold 字体
// 表格: 灰底白字粗体表头 + 米色表体 + 黑色网格线
// 分页: 表格跨页时在新页重复表头
// 编码: WinAnsiEncoding（ASCII + Latin-1 + 常用标点），其余字符输出为 '?'
// ==========================================

use crate::export::SeatingExport;
use std::fmt::Write as _;

// ===== 版面常量（单位: pt）=====
const PAGE_WIDTH: f64 = 595.28;
const PAGE_HEIGHT: f64 = 841.89;
const MARGIN: f64 = 72.0;
const COLUMN_WIDTHS: [f64; 4] = [72.0, 108.0, 144.0, 108.0];

const TITLE_SIZE: f64 = 18.0;
const SUBTITLE_SIZE: f64 = 9.0;
const HEADING_SIZE: f64 = 14.0;
const HEADER_FONT_SIZE: f64 = 12.0;
const BODY_FONT_SIZE: f64 = 10.0;

const HEADER_ROW_HEIGHT: f64 = 26.0;
const BODY_ROW_HEIGHT: f64 = 18.0;
const SECTION_GAP: f64 = 21.6; // 0.3 inch
const HEADING_GAP: f64 = 7.2; // 0.1 inch

// 颜色 (rgb 0..1)
const GREY: (f64, f64, f64) = (0.5, 0.5, 0.5);
const WHITESMOKE: (f64, f64, f64) = (0.96, 0.96, 0.96);
const BEIGE: (f64, f64, f64) = (0.96, 0.96, 0.86);

#[derive(Clone, Copy)]
enum Font {
    Regular, // /F1
    Bold,    // /F2
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    /// 近似字宽（em 比例）
    fn avg_width(self) -> f64 {
        match self {
            Font::Regular => 0.52,
            Font::Bold => 0.58,
        }
    }
}

/// 近似文本宽度
fn text_width(text: &str, font: Font, size: f64) -> f64 {
    text.chars().count() as f64 * size * font.avg_width()
}

/// WinAnsiEncoding 0x80..=0x9F 区段（0x81/0x8D/0x8F/0x90/0x9D 未定义）
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

/// 字符 → WinAnsi 字节（仅非 ASCII 部分）
fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        '\u{A0}'..='\u{FF}' => u8::try_from(u32::from(c)).ok(),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, byte)| *byte),
    }
}

/// PDF 字符串转义；WinAnsi 非 ASCII 字符写成八进制转义，编码外字符替换为 '?'
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => match win_ansi_byte(c) {
                Some(byte) => {
                    let _ = write!(out, "\\{:03o}", byte);
                }
                None => out.push('?'),
            },
        }
    }
    out
}

/// 截断到指定宽度内
fn fit_text(text: &str, font: Font, size: f64, max_width: f64) -> String {
    if text_width(text, font, size) <= max_width {
        return text.to_string();
    }
    let max_chars = (max_width / (size * font.avg_width())).floor() as usize;
    let keep = max_chars.saturating_sub(2);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str("..");
    truncated
}

// ==========================================
// PageWriter - 按页累积内容流
// ==========================================
struct PageWriter {
    pages: Vec<String>,
    current: String,
    y: f64, // 当前书写基线（自上而下递减）
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: String::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn remaining(&self) -> f64 {
        self.y - MARGIN
    }

    fn text(&mut self, x: f64, y: f64, font: Font, size: f64, color: (f64, f64, f64), text: &str) {
        let _ = writeln!(
            self.current,
            "BT /{} {:.1} Tf {:.3} {:.3} {:.3} rg {:.2} {:.2} Td ({}) Tj ET",
            font.resource(),
            size,
            color.0,
            color.1,
            color.2,
            x,
            y,
            escape_text(text)
        );
    }

    fn centered_text(&mut self, y: f64, font: Font, size: f64, text: &str) {
        let x = (PAGE_WIDTH - text_width(text, font, size)) / 2.0;
        self.text(x.max(MARGIN), y, font, size, (0.0, 0.0, 0.0), text);
    }

    fn filled_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: (f64, f64, f64)) {
        let _ = writeln!(
            self.current,
            "{:.3} {:.3} {:.3} rg {:.2} {:.2} {:.2} {:.2} re f",
            color.0, color.1, color.2, x, y, w, h
        );
    }

    fn stroked_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let _ = writeln!(
            self.current,
            "0 0 0 RG 1 w {:.2} {:.2} {:.2} {:.2} re S",
            x, y, w, h
        );
    }

    /// 绘制一行表格（y 为行顶）
    fn table_row(&mut self, cells: &[String], header: bool) {
        let (height, font, size, fill, ink) = if header {
            (HEADER_ROW_HEIGHT, Font::Bold, HEADER_FONT_SIZE, GREY, WHITESMOKE)
        } else {
            (BODY_ROW_HEIGHT, Font::Regular, BODY_FONT_SIZE, BEIGE, (0.0, 0.0, 0.0))
        };

        let table_width: f64 = COLUMN_WIDTHS.iter().sum();
        let mut x = (PAGE_WIDTH - table_width) / 2.0;
        let bottom = self.y - height;

        for (cell, width) in cells.iter().zip(COLUMN_WIDTHS.iter()) {
            self.filled_rect(x, bottom, *width, height, fill);
            self.stroked_rect(x, bottom, *width, height);

            let content = fit_text(cell, font, size, width - 6.0);
            let text_x = x + (width - text_width(&content, font, size)) / 2.0;
            let text_y = bottom + (height - size) / 2.0 + 2.0;
            self.text(text_x, text_y, font, size, ink, &content);
            x += width;
        }

        self.y = bottom;
    }

    fn finish(mut self) -> Vec<String> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}

/// 渲染为 PDF 字节
pub fn render_pdf(export: &SeatingExport) -> Vec<u8> {
    let mut writer = PageWriter::new();

    // 标题
    writer.y -= TITLE_SIZE;
    writer.centered_text(writer.y, Font::Bold, TITLE_SIZE, &export.title);
    writer.y -= SUBTITLE_SIZE + 6.0;
    writer.centered_text(writer.y, Font::Regular, SUBTITLE_SIZE, &export.generated_at);
    writer.y -= 14.4; // 0.2 inch

    for section in &export.sections {
        // 考场标题 + 表头 + 至少一行，放不下则换页
        let needed = HEADING_SIZE + HEADING_GAP + HEADER_ROW_HEIGHT + BODY_ROW_HEIGHT;
        if writer.remaining() < needed {
            writer.new_page();
        }

        writer.y -= HEADING_SIZE;
        writer.text(MARGIN, writer.y, Font::Bold, HEADING_SIZE, (0.0, 0.0, 0.0), &section.heading);
        writer.y -= HEADING_GAP;
        writer.table_row(&export.columns, true);

        for row in &section.rows {
            if writer.remaining() < BODY_ROW_HEIGHT {
                writer.new_page();
                writer.table_row(&export.columns, true);
            }
            writer.table_row(row.as_slice(), false);
        }

        writer.y -= SECTION_GAP;
    }

    assemble(&writer.finish())
}

/// 组装 PDF 对象、交叉引用表与尾部
fn assemble(page_streams: &[String]) -> Vec<u8> {
    // 对象编号: 1 Catalog, 2 Pages, 3 F1, 4 F2, 之后每页 (Page, Contents)
    let page_count = page_streams.len();
    let mut objects: Vec<String> = Vec::with_capacity(4 + page_count * 2);

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 5 + i * 2)).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    for (i, stream) in page_streams.iter().enumerate() {
        let contents_id = 6 + i * 2;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH, PAGE_HEIGHT, contents_id
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            stream.len(),
            stream
        ));
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = writeln!(xref, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportSection;

    fn export_with_rows(rows: usize) -> SeatingExport {
        SeatingExport {
            arrangement_id: "a1".to_string(),
            title: "Seating Arrangement - Final".to_string(),
            generated_at: "Generated: 2024-05-01 10:00:00".to_string(),
            columns: vec![
                "Seat".to_string(),
                "Roll No".to_string(),
                "Name".to_string(),
                "Department".to_string(),
            ],
            sections: vec![ExportSection {
                room_name: "Room 1".to_string(),
                heading: "Room 1".to_string(),
                rows: (1..=rows)
                    .map(|i| {
                        [
                            i.to_string(),
                            format!("CS{:03}", i),
                            format!("Student {}", i),
                            "CS".to_string(),
                        ]
                    })
                    .collect(),
            }],
        }
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_document_structure() {
        let text = as_text(&render_pdf(&export_with_rows(3)));

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("/BaseFont /Helvetica-Bold"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("(CS003) Tj"));
    }

    #[test]
    fn test_header_repeated_on_page_break() {
        let text = as_text(&render_pdf(&export_with_rows(80)));

        let pages = text.matches("/Type /Page ").count();
        assert!(pages >= 2);
        assert_eq!(text.matches("(Roll No) Tj").count(), pages);
        assert!(text.contains("(CS080) Tj"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = render_pdf(&export_with_rows(2));
        let text = as_text(&bytes);

        let xref_pos = text.find("\nxref\n").unwrap() + 1;
        let first_entry = text[xref_pos..].lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(bytes[offset..].starts_with(b"1 0 obj"));
    }

    #[test]
    fn test_escape_and_non_ascii() {
        assert_eq!(escape_text("a(b)\\c"), "a\\(b\\)\\\\c");
        assert_eq!(escape_text("Zoë"), "Zo\\353");
        assert_eq!(escape_text("José Muñoz"), "Jos\\351 Mu\\361oz");
        assert_eq!(escape_text("O’Brien"), "O\\222Brien");
        assert_eq!(escape_text("王"), "?");
    }

    #[test]
    fn test_latin1_names_survive_in_document() {
        let mut export = export_with_rows(1);
        export.sections[0].rows[0][2] = "José".to_string();

        let text = as_text(&render_pdf(&export));

        assert!(text.contains("(Jos\\351) Tj"));
        assert!(!text.contains("(Jos?) Tj"));
    }

    #[test]
    fn test_fit_text_truncates_long_values() {
        let long = "A very long student name that cannot fit";
        let fitted = fit_text(long, Font::Regular, BODY_FONT_SIZE, 60.0);
        assert!(fitted.ends_with(".."));
        assert!(text_width(&fitted, Font::Regular, BODY_FONT_SIZE) <= 60.0);
    }
}
