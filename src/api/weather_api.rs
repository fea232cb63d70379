// ==========================================
// 学院教务管理系统 - 天气 API
// ==========================================
// 职责: 天气日志查询 + 实时天气（直接调用天气源，不落库）
// ==========================================

use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::domain::weather::{WeatherLog, WeatherObservation};
use crate::repository::weather_repo::WeatherLogRepository;
use crate::weather::client::WeatherSource;

/// 天气历史默认条数
pub const WEATHER_HISTORY_LIMIT: u32 = 24;

pub struct WeatherApi {
    weather_repo: Arc<WeatherLogRepository>,
    source: Arc<dyn WeatherSource>,
    city: String,
}

impl WeatherApi {
    /// # 参数
    /// - city: 实时天气查询的默认城市
    pub fn new(
        weather_repo: Arc<WeatherLogRepository>,
        source: Arc<dyn WeatherSource>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            weather_repo,
            source,
            city: city.into(),
        }
    }

    /// 最近一条天气日志
    pub fn latest(&self) -> ApiResult<Option<WeatherLog>> {
        Ok(self.weather_repo.latest()?)
    }

    /// 最近 24 条天气日志（新→旧）
    pub fn history(&self) -> ApiResult<Vec<WeatherLog>> {
        Ok(self.weather_repo.recent(WEATHER_HISTORY_LIMIT)?)
    }

    /// 实时天气
    ///
    /// # 参数
    /// - city: 为空时使用配置的城市
    pub async fn current_weather(&self, city: Option<&str>) -> ApiResult<WeatherObservation> {
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.city.as_str());
        Ok(self.source.current(city).await?)
    }
}
