// ==========================================
// 学院教务管理系统 - 天气领域模型
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// WeatherObservation - 一次天气观测（来自外部天气源）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub city: String,
    pub temperature_c: f64,
    pub description: String,    // 原始描述 (如 "light rain")
    pub main_condition: String, // 主要天气 (如 "Rain")
    pub humidity_pct: Option<f64>,
    pub wind_speed_ms: Option<f64>,
}

// ==========================================
// WeatherLog - 天气日志
// ==========================================
// 对齐: weather_log 表；main_condition 统一小写存储
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherLog {
    pub log_id: String,
    pub temperature_c: f64,
    pub description: String,
    pub main_condition: String,
    pub city: String,
    pub created_at: NaiveDateTime,
}

// ==========================================
// WeatherAlertKind - 预警类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeatherAlertKind {
    SevereWeather,   // 恶劣天气（建议停课）
    HighTemperature, // 高温
}

// ==========================================
// WeatherAssessment - 预警判定结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAssessment {
    pub is_bad_weather: bool,
    pub is_high_temp: bool,
    pub matched_keyword: Option<String>,
}

impl WeatherAssessment {
    /// 是否需要发送预警
    pub fn should_alert(&self) -> bool {
        self.is_bad_weather || self.is_high_temp
    }

    /// 预警类型（恶劣天气优先）
    pub fn kind(&self) -> Option<WeatherAlertKind> {
        if self.is_bad_weather {
            Some(WeatherAlertKind::SevereWeather)
        } else if self.is_high_temp {
            Some(WeatherAlertKind::HighTemperature)
        } else {
            None
        }
    }
}
