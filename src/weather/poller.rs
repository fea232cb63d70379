// ==========================================
// 学院教务管理系统 - 天气轮询任务
// ==========================================
// 职责: 启动即轮询一次，之后按固定间隔轮询；落库 + 恶劣天气预警
// 生命周期: 由进程根持有 WeatherPollerHandle，退出时 shutdown()
// 红线: 单次失败只记录日志并跳过本轮，任务不退出
// ==========================================

use crate::config::WeatherSettings;
use crate::domain::weather::{WeatherAssessment, WeatherLog, WeatherObservation};
use crate::engine::notice::weather_notice;
use crate::notify::Mailer;
use crate::repository::error::RepositoryError;
use crate::repository::weather_repo::WeatherLogRepository;
use crate::weather::client::{WeatherError, WeatherSource};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// PollError - 单轮轮询错误
// ==========================================
#[derive(Error, Debug)]
pub enum PollError {
    #[error(transparent)]
    Source(#[from] WeatherError),

    #[error("天气日志写入失败: {0}")]
    Storage(#[from] RepositoryError),

    #[error("后台任务异常: {0}")]
    Join(String),
}

/// 单轮轮询结果
#[derive(Debug, Clone)]
pub struct PollReport {
    pub log: WeatherLog,
    pub assessment: WeatherAssessment,
    pub alert_sent: bool,
}

// ==========================================
// WeatherPoller
// ==========================================
pub struct WeatherPoller {
    source: Arc<dyn WeatherSource>,
    weather_repo: Arc<WeatherLogRepository>,
    mailer: Arc<dyn Mailer>,
    settings: WeatherSettings,
}

impl WeatherPoller {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        weather_repo: Arc<WeatherLogRepository>,
        mailer: Arc<dyn Mailer>,
        settings: WeatherSettings,
    ) -> Self {
        Self {
            source,
            weather_repo,
            mailer,
            settings,
        }
    }

    /// 执行一轮：取数 → 落库 → 判定 → 预警
    ///
    /// # 返回
    /// - Ok(PollReport): 已落库（预警投递失败不影响结果，只体现在 alert_sent）
    /// - Err(PollError): 取数或落库失败
    #[instrument(skip(self), fields(city = %self.settings.city))]
    pub async fn poll_once(&self) -> Result<PollReport, PollError> {
        let observation = self.source.current(&self.settings.city).await?;
        let log = to_log(&observation);

        let repo = self.weather_repo.clone();
        let to_insert = log.clone();
        tokio::task::spawn_blocking(move || repo.insert(&to_insert))
            .await
            .map_err(|e| PollError::Join(e.to_string()))??;

        let assessment = self.settings.alert_rule.assess(&observation);
        debug!(
            temperature_c = observation.temperature_c,
            main = %log.main_condition,
            is_bad_weather = assessment.is_bad_weather,
            is_high_temp = assessment.is_high_temp,
            "天气已记录"
        );

        let mut alert_sent = false;
        if let Some(mail) = weather_notice(&observation, &assessment, &self.settings.college_email) {
            match self.mailer.send(&mail).await {
                Ok(()) => {
                    alert_sent = true;
                    info!(to = %mail.recipient, kind = ?assessment.kind(), "天气预警已发送");
                }
                Err(e) => warn!(error = %e, "天气预警发送失败"),
            }
        }

        Ok(PollReport {
            log,
            assessment,
            alert_sent,
        })
    }

    /// 启动后台轮询任务
    pub fn spawn(self) -> WeatherPollerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(self.run(shutdown_rx));
        WeatherPollerHandle { shutdown_tx, join }
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(
            city = %self.settings.city,
            interval_secs = self.settings.poll_interval.as_secs(),
            "天气轮询任务启动"
        );

        // 首个 tick 立即触发
        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        error!(error = %e, "天气轮询失败，跳过本轮");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("天气轮询任务已停止");
    }
}

/// 观测 → 日志（主要天气统一小写）
fn to_log(observation: &WeatherObservation) -> WeatherLog {
    WeatherLog {
        log_id: uuid::Uuid::new_v4().to_string(),
        temperature_c: observation.temperature_c,
        description: observation.description.clone(),
        main_condition: observation.main_condition.to_lowercase(),
        city: observation.city.clone(),
        created_at: chrono::Local::now().naive_local(),
    }
}

// ==========================================
// WeatherPollerHandle - 轮询任务句柄
// ==========================================
pub struct WeatherPollerHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl WeatherPollerHandle {
    /// 通知停止并等待任务退出
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.join.await {
            error!(error = %e, "天气轮询任务退出异常");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
