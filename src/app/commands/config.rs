use crate::app::state::AppState;

use super::common::{map_api_error, to_json};

// ==========================================
// 配置管理相关命令
// ==========================================

/// 查询所有配置
pub async fn list_configs(state: &AppState) -> Result<String, String> {
    let result = state.config_api.list_configs().map_err(map_api_error)?;
    to_json(&result)
}

/// 查询单个配置
pub async fn get_config(state: &AppState, key: String) -> Result<String, String> {
    let result = state.config_api.get_config(&key).map_err(map_api_error)?;
    to_json(&result)
}

/// 更新配置
pub async fn update_config(
    state: &AppState,
    key: String,
    value: String,
    operator: String,
    reason: String,
) -> Result<String, String> {
    state
        .config_api
        .update_config(&key, &value, &operator, &reason)
        .map_err(map_api_error)?;

    Ok("{}".to_string())
}

/// 配置快照（JSON）
pub async fn get_config_snapshot(state: &AppState) -> Result<String, String> {
    state.config_api.get_config_snapshot().map_err(map_api_error)
}
