// ==========================================
// 学院教务管理系统 - 天气数据源
// ==========================================
// 默认实现: OpenWeatherMap 当前天气接口 (units=metric)
// 红线: 每次请求必须带超时
// ==========================================

use crate::domain::weather::WeatherObservation;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

// ==========================================
// WeatherError - 天气源错误
// ==========================================
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("天气接口未配置 API Key")]
    MissingApiKey,

    #[error("天气接口请求失败: {0}")]
    Request(String),

    #[error("天气接口返回异常状态: {status}")]
    Status { status: u16 },

    #[error("天气接口响应无法解析: {0}")]
    Decode(String),
}

// ==========================================
// WeatherSource Trait
// ==========================================
// 实现者: OpenWeatherClient；测试注入桩实现
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// 获取城市当前天气
    async fn current(&self, city: &str) -> Result<WeatherObservation, WeatherError>;
}

// ===== OpenWeatherMap 响应结构（只取用到的字段）=====

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmCondition>,
    #[serde(default)]
    wind: Option<OwmWind>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    #[serde(default)]
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: Option<f64>,
}

impl OwmResponse {
    fn into_observation(self, city: &str) -> Result<WeatherObservation, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Decode("weather 数组为空".to_string()))?;

        Ok(WeatherObservation {
            city: city.to_string(),
            temperature_c: self.main.temp,
            description: condition.description,
            main_condition: condition.main,
            humidity_pct: self.main.humidity,
            wind_speed_ms: Some(self.wind.and_then(|w| w.speed).unwrap_or(0.0)),
        })
    }
}

/// 解析接口响应体
pub fn parse_observation(body: &str, city: &str) -> Result<WeatherObservation, WeatherError> {
    let response: OwmResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Decode(e.to_string()))?;
    response.into_observation(city)
}

// ==========================================
// OpenWeatherClient
// ==========================================
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// # 参数
    /// - base_url: 接口地址（不含查询参数）
    /// - api_key: appid
    /// - timeout: 单次请求超时
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherObservation, WeatherError> {
        if self.api_key.trim().is_empty() {
            return Err(WeatherError::MissingApiKey);
        }

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Request(e.to_string()))?;
        parse_observation(&body, city)
    }
}
