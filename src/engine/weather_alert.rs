// ==========================================
// 学院教务管理系统 - 天气预警判定引擎
// ==========================================
// 规则: 温度 > 阈值 → 高温；主要天气或描述包含任一恶劣关键词 → 恶劣天气
// 关键词匹配为子串匹配（小写），"light rain" 命中 "rain"
// ==========================================

use crate::domain::weather::{WeatherAssessment, WeatherObservation};

/// 默认高温阈值 (°C)
pub const DEFAULT_HIGH_TEMP_THRESHOLD_C: f64 = 40.0;

/// 默认恶劣天气关键词
pub const DEFAULT_BAD_CONDITIONS: &[&str] =
    &["rain", "storm", "snow", "thunderstorm", "extreme", "drizzle"];

// ==========================================
// WeatherAlertRule - 预警规则
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherAlertRule {
    pub high_temp_threshold_c: f64,
    pub bad_conditions: Vec<String>, // 小写关键词
}

impl Default for WeatherAlertRule {
    fn default() -> Self {
        Self {
            high_temp_threshold_c: DEFAULT_HIGH_TEMP_THRESHOLD_C,
            bad_conditions: DEFAULT_BAD_CONDITIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WeatherAlertRule {
    /// 从逗号分隔的关键词列表构造（空项忽略）
    pub fn new(high_temp_threshold_c: f64, bad_conditions_csv: &str) -> Self {
        let bad_conditions = bad_conditions_csv
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            high_temp_threshold_c,
            bad_conditions,
        }
    }

    /// 判定一次观测
    pub fn assess(&self, observation: &WeatherObservation) -> WeatherAssessment {
        let main = observation.main_condition.to_lowercase();
        let description = observation.description.to_lowercase();

        let matched_keyword = self
            .bad_conditions
            .iter()
            .find(|kw| main.contains(kw.as_str()) || description.contains(kw.as_str()))
            .cloned();

        WeatherAssessment {
            is_bad_weather: matched_keyword.is_some(),
            is_high_temp: observation.temperature_c > self.high_temp_threshold_c,
            matched_keyword,
        }
    }
}
