use crate::app::state::AppState;

use super::common::{map_api_error, to_json};

// ==========================================
// 驾驶舱相关命令
// ==========================================

/// 今日概览
pub async fn get_dashboard_overview(state: &AppState) -> Result<String, String> {
    let result = state.dashboard_api.overview().map_err(map_api_error)?;
    to_json(&result)
}
