// ==========================================
// 学院教务管理系统 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新、快照
// 说明: 天气轮询在启动时读取配置，修改后需重启生效
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::error::{config_err, ApiError, ApiResult};
use crate::config::config_manager::config_keys;
use crate::config::{ConfigItem, ConfigManager};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::action_log_repo::ActionLogRepository;

/// 不写入操作日志明文的配置键
const SECRET_KEYS: &[&str] = &[config_keys::WEATHER_API_KEY];

/// 配置管理API
///
/// 职责：
/// 1. 配置查询（全部、单个）
/// 2. 配置更新
/// 3. 配置快照
/// 4. ActionLog记录
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>, action_log_repo: Arc<ActionLogRepository>) -> Self {
        Self {
            config_manager,
            action_log_repo,
        }
    }

    /// 查询所有配置
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let mut items = config_err(self.config_manager.list_values())?;
        for item in items.iter_mut() {
            if SECRET_KEYS.contains(&item.key.as_str()) && !item.value.is_empty() {
                item.value = mask(&item.value);
            }
        }
        Ok(items)
    }

    /// 查询单个配置
    ///
    /// # 返回
    /// - Ok(None): 未配置（使用默认值）
    pub fn get_config(&self, key: &str) -> ApiResult<Option<String>> {
        config_err(self.config_manager.get_global_config_value(key.trim()))
    }

    /// 更新配置
    ///
    /// # 参数
    /// - key: 配置键
    /// - value: 配置值
    /// - operator: 操作人
    /// - reason: 操作原因（必填）
    pub fn update_config(&self, key: &str, value: &str, operator: &str, reason: &str) -> ApiResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::InvalidInput("配置键不能为空".to_string()));
        }
        if reason.trim().is_empty() {
            return Err(ApiError::InvalidInput("操作原因不能为空".to_string()));
        }

        config_err(self.config_manager.set_value(key, value))?;

        let logged_value = if SECRET_KEYS.contains(&key) {
            mask(value)
        } else {
            value.to_string()
        };
        let log = ActionLog::new(ActionType::ConfigUpdated, operator)
            .with_target(key)
            .with_payload(&serde_json::json!({
                "key": key,
                "value": logged_value,
                "reason": reason,
            }))
            .with_detail(format!("更新配置: {}={}", key, logged_value));
        self.action_log_repo.insert(&log)?;

        info!(key, operator, "配置已更新");
        Ok(())
    }

    /// 配置快照（JSON）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        config_err(self.config_manager.get_config_snapshot())
    }
}

fn mask(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{}****", visible)
}
