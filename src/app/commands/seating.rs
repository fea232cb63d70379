use std::path::Path;

use crate::api::ExportedFile;
use crate::app::state::AppState;

use super::common::{map_api_error, to_json};

// ==========================================
// 考试座位编排相关命令
// ==========================================

/// 生成座位编排
pub async fn create_seating_arrangement(
    state: &AppState,
    exam_name: String,
    num_rooms: i64,
    seats_per_room: i64,
    operator: String,
) -> Result<String, String> {
    let result = state
        .seating_api
        .create_arrangement(&exam_name, num_rooms, seats_per_room, &operator)
        .map_err(map_api_error)?;

    to_json(&result)
}

/// 编排列表（最新在前）
pub async fn list_seating_arrangements(state: &AppState) -> Result<String, String> {
    let result = state.seating_api.list_arrangements().map_err(map_api_error)?;
    to_json(&result)
}

/// 按考场分组查看编排
pub async fn view_seating_arrangement(
    state: &AppState,
    arrangement_id: String,
) -> Result<String, String> {
    let result = state
        .seating_api
        .view_arrangement(&arrangement_id)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 导出 CSV 到目录，返回 { path, size }
pub async fn export_seating_csv(
    state: &AppState,
    arrangement_id: String,
    output_dir: String,
) -> Result<String, String> {
    let file = state
        .seating_api
        .export_csv(&arrangement_id)
        .map_err(map_api_error)?;
    write_export(file, &output_dir).await
}

/// 导出 PDF 到目录，返回 { path, size }
pub async fn export_seating_pdf(
    state: &AppState,
    arrangement_id: String,
    output_dir: String,
) -> Result<String, String> {
    let file = state
        .seating_api
        .export_pdf(&arrangement_id)
        .map_err(map_api_error)?;
    write_export(file, &output_dir).await
}

async fn write_export(file: ExportedFile, output_dir: &str) -> Result<String, String> {
    let path = Path::new(output_dir).join(&file.file_name);
    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err(|e| format!("写入导出文件失败: {}", e))?;

    tracing::info!(path = %path.display(), size = file.bytes.len(), "导出文件已写入");
    to_json(&serde_json::json!({
        "path": path.to_string_lossy(),
        "content_type": file.content_type,
        "size": file.bytes.len(),
    }))
}
