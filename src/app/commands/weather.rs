use crate::app::state::AppState;

use super::common::{map_api_error, to_json};

// ==========================================
// 天气相关命令
// ==========================================

/// 最新天气日志
pub async fn get_latest_weather(state: &AppState) -> Result<String, String> {
    let result = state.weather_api.latest().map_err(map_api_error)?;
    to_json(&result)
}

/// 最近 24 条天气日志
pub async fn get_weather_history(state: &AppState) -> Result<String, String> {
    let result = state.weather_api.history().map_err(map_api_error)?;
    to_json(&result)
}

/// 实时天气（city 为空时使用配置的城市）
pub async fn get_current_weather(state: &AppState, city: Option<String>) -> Result<String, String> {
    let result = state
        .weather_api
        .current_weather(city.as_deref())
        .await
        .map_err(map_api_error)?;
    to_json(&result)
}
