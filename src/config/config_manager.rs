// ==========================================
// 学院教务管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)，当前只使用 scope_id='global'
// ==========================================

use crate::db::open_sqlite_connection;
use crate::engine::weather_alert::{WeatherAlertRule, DEFAULT_BAD_CONDITIONS};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 配置层结果类型（可跨线程传递）
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigItem - 配置项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

// ==========================================
// WeatherSettings - 天气轮询所需配置（一次性读出）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSettings {
    pub city: String,
    pub api_key: String,
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub alert_rule: WeatherAlertRule,
    pub college_email: String,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    // ==========================================
    // 读写原语
    // ==========================================

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 配置（存在则覆盖）
    pub fn set_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now', 'localtime'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 全部 global 配置（按键排序）
    pub fn list_values(&self) -> ConfigResult<Vec<ConfigItem>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt = conn.prepare(
            "SELECT key, value, updated_at FROM config_kv WHERE scope_id = ?1 ORDER BY key",
        )?;
        let items = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok(ConfigItem {
                    key: row.get(0)?,
                    value: row.get(1)?,
                    updated_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let config_map: BTreeMap<String, String> = self
            .list_values()?
            .into_iter()
            .map(|item| (item.key, item.value))
            .collect();

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析配置；格式错误时回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + Copy,
    {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!(
                        config_key = key,
                        raw_value = %raw,
                        "配置值格式错误，使用默认值"
                    );
                    Ok(default)
                }
            },
        }
    }

    // ==========================================
    // 环境变量覆写
    // ==========================================

    /// 将环境变量写入配置（启动时调用）
    ///
    /// # 返回
    /// - Ok(usize): 覆写的配置项数量
    pub fn apply_env_overrides(&self) -> ConfigResult<usize> {
        let pairs = env_overrides::ALL
            .iter()
            .filter_map(|(env, key)| std::env::var(env).ok().map(|v| (*key, v)));
        self.apply_overrides(pairs)
    }

    /// 批量覆写（空值忽略）
    pub fn apply_overrides<'a, I>(&self, pairs: I) -> ConfigResult<usize>
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut count = 0;
        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            self.set_value(key, value)?;
            tracing::info!(config_key = key, "配置已由环境变量覆写");
            count += 1;
        }
        Ok(count)
    }

    // ===== 天气配置 =====

    pub fn get_weather_city(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::WEATHER_CITY, defaults::WEATHER_CITY)
    }

    pub fn get_weather_api_key(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::WEATHER_API_KEY, "")
    }

    pub fn get_weather_api_base_url(&self) -> ConfigResult<String> {
        self.get_config_or_default(
            config_keys::WEATHER_API_BASE_URL,
            defaults::WEATHER_API_BASE_URL,
        )
    }

    /// 轮询间隔（秒，最小 1）
    pub fn get_weather_poll_interval_secs(&self) -> ConfigResult<u64> {
        let secs = self.get_parsed_or_default(
            config_keys::WEATHER_POLL_INTERVAL_SECS,
            defaults::WEATHER_POLL_INTERVAL_SECS,
        )?;
        Ok(secs.max(1))
    }

    /// 单次请求超时（秒，最小 1）
    pub fn get_weather_request_timeout_secs(&self) -> ConfigResult<u64> {
        let secs = self.get_parsed_or_default(
            config_keys::WEATHER_REQUEST_TIMEOUT_SECS,
            defaults::WEATHER_REQUEST_TIMEOUT_SECS,
        )?;
        Ok(secs.max(1))
    }

    pub fn get_weather_high_temp_threshold_c(&self) -> ConfigResult<f64> {
        self.get_parsed_or_default(
            config_keys::WEATHER_HIGH_TEMP_THRESHOLD_C,
            defaults::WEATHER_HIGH_TEMP_THRESHOLD_C,
        )
    }

    /// 恶劣天气关键词（逗号分隔，配置为空时使用默认列表）
    pub fn get_weather_alert_rule(&self) -> ConfigResult<WeatherAlertRule> {
        let threshold = self.get_weather_high_temp_threshold_c()?;
        let raw = self.get_config_or_default(
            config_keys::WEATHER_BAD_CONDITIONS,
            &DEFAULT_BAD_CONDITIONS.join(","),
        )?;

        let rule = WeatherAlertRule::new(threshold, &raw);
        if rule.bad_conditions.is_empty() {
            tracing::warn!(
                config_key = config_keys::WEATHER_BAD_CONDITIONS,
                raw_value = %raw,
                "恶劣天气关键词为空，使用默认列表"
            );
            return Ok(WeatherAlertRule {
                high_temp_threshold_c: threshold,
                ..WeatherAlertRule::default()
            });
        }
        Ok(rule)
    }

    // ===== 邮件配置 =====

    pub fn get_college_email(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::COLLEGE_EMAIL, defaults::COLLEGE_EMAIL)
    }

    /// 发件人（未配置时与学院邮箱相同）
    pub fn get_mail_sender(&self) -> ConfigResult<String> {
        match self.get_global_config_value(config_keys::MAIL_SENDER)? {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => self.get_college_email(),
        }
    }

    /// 天气轮询配置（一次读出）
    pub fn get_weather_settings(&self) -> ConfigResult<WeatherSettings> {
        Ok(WeatherSettings {
            city: self.get_weather_city()?,
            api_key: self.get_weather_api_key()?,
            api_base_url: self.get_weather_api_base_url()?,
            poll_interval: Duration::from_secs(self.get_weather_poll_interval_secs()?),
            request_timeout: Duration::from_secs(self.get_weather_request_timeout_secs()?),
            alert_rule: self.get_weather_alert_rule()?,
            college_email: self.get_college_email()?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 天气
    pub const WEATHER_CITY: &str = "weather_city";
    pub const WEATHER_API_KEY: &str = "weather_api_key";
    pub const WEATHER_API_BASE_URL: &str = "weather_api_base_url";
    pub const WEATHER_POLL_INTERVAL_SECS: &str = "weather_poll_interval_secs";
    pub const WEATHER_REQUEST_TIMEOUT_SECS: &str = "weather_request_timeout_secs";
    pub const WEATHER_HIGH_TEMP_THRESHOLD_C: &str = "weather_high_temp_threshold_c";
    pub const WEATHER_BAD_CONDITIONS: &str = "weather_bad_conditions"; // 逗号分隔

    // 邮件
    pub const COLLEGE_EMAIL: &str = "college_email";
    pub const MAIL_SENDER: &str = "mail_sender";
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const WEATHER_CITY: &str = "Mumbai";
    pub const WEATHER_API_BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
    pub const WEATHER_POLL_INTERVAL_SECS: u64 = 3600;
    pub const WEATHER_REQUEST_TIMEOUT_SECS: u64 = 10;
    pub const WEATHER_HIGH_TEMP_THRESHOLD_C: f64 = 40.0;
    pub const COLLEGE_EMAIL: &str = "college-management@example.com";
}

// ==========================================
// 环境变量 → 配置键
// ==========================================
pub mod env_overrides {
    use super::config_keys;

    pub const ALL: &[(&str, &str)] = &[
        ("WEATHER_API_KEY", config_keys::WEATHER_API_KEY),
        ("WEATHER_CITY", config_keys::WEATHER_CITY),
        ("COLLEGE_EMAIL", config_keys::COLLEGE_EMAIL),
        ("MAIL_SENDER", config_keys::MAIL_SENDER),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cm = manager();
        let settings = cm.get_weather_settings().unwrap();

        assert_eq!(settings.city, "Mumbai");
        assert_eq!(settings.poll_interval, Duration::from_secs(3600));
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.alert_rule, WeatherAlertRule::default());
        assert_eq!(settings.college_email, "college-management@example.com");
        assert_eq!(cm.get_mail_sender().unwrap(), settings.college_email);
    }

    #[test]
    fn test_set_value_overrides_and_lists() {
        let cm = manager();
        cm.set_value(config_keys::WEATHER_CITY, "Pune").unwrap();
        cm.set_value(config_keys::WEATHER_CITY, "Delhi").unwrap();
        cm.set_value(config_keys::WEATHER_POLL_INTERVAL_SECS, "600").unwrap();

        assert_eq!(cm.get_weather_city().unwrap(), "Delhi");
        assert_eq!(cm.get_weather_poll_interval_secs().unwrap(), 600);
        let keys: Vec<String> = cm.list_values().unwrap().into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["weather_city", "weather_poll_interval_secs"]);

        let snapshot: serde_json::Value =
            serde_json::from_str(&cm.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot["weather_city"], "Delhi");
    }

    #[test]
    fn test_unparsable_value_falls_back() {
        let cm = manager();
        cm.set_value(config_keys::WEATHER_HIGH_TEMP_THRESHOLD_C, "hot").unwrap();
        cm.set_value(config_keys::WEATHER_POLL_INTERVAL_SECS, "0").unwrap();

        assert_eq!(cm.get_weather_high_temp_threshold_c().unwrap(), 40.0);
        assert_eq!(cm.get_weather_poll_interval_secs().unwrap(), 1);
    }

    #[test]
    fn test_custom_bad_conditions() {
        let cm = manager();
        cm.set_value(config_keys::WEATHER_BAD_CONDITIONS, "fog, haze").unwrap();
        assert_eq!(cm.get_weather_alert_rule().unwrap().bad_conditions, vec!["fog", "haze"]);

        cm.set_value(config_keys::WEATHER_BAD_CONDITIONS, " , ").unwrap();
        assert_eq!(
            cm.get_weather_alert_rule().unwrap().bad_conditions.len(),
            DEFAULT_BAD_CONDITIONS.len()
        );
    }

    #[test]
    fn test_apply_overrides_skips_blank() {
        let cm = manager();
        let count = cm
            .apply_overrides(vec![
                (config_keys::WEATHER_API_KEY, "abc123".to_string()),
                (config_keys::MAIL_SENDER, "   ".to_string()),
            ])
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(cm.get_weather_api_key().unwrap(), "abc123");
        assert!(cm.get_global_config_value(config_keys::MAIL_SENDER).unwrap().is_none());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(manager().set_value("  ", "x").is_err());
    }
}
