// ==========================================
// 外部协作者桩实现
// ==========================================
// RecordingMailer: 记录投递（可配置为失败）
// StubWeatherSource: 返回固定观测或固定错误
// ==========================================

use async_trait::async_trait;
use college_admin::domain::mail::OutboundMail;
use college_admin::domain::weather::WeatherObservation;
use college_admin::notify::{MailError, Mailer};
use college_admin::weather::{WeatherError, WeatherSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ==========================================
// RecordingMailer
// ==========================================
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundMail>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingMailer {
    /// 每次投递都失败（仍计数）
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MailError::Transport("stub transport down".to_string()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

// ==========================================
// StubWeatherSource
// ==========================================
pub struct StubWeatherSource {
    observation: Mutex<Option<WeatherObservation>>,
    calls: AtomicUsize,
}

impl StubWeatherSource {
    pub fn returning(observation: WeatherObservation) -> Self {
        Self {
            observation: Mutex::new(Some(observation)),
            calls: AtomicUsize::new(0),
        }
    }

    /// 每次请求都返回错误
    pub fn offline() -> Self {
        Self {
            observation: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_observation(&self, observation: WeatherObservation) {
        *self.observation.lock().unwrap() = Some(observation);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for StubWeatherSource {
    async fn current(&self, city: &str) -> Result<WeatherObservation, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.observation.lock().unwrap().clone() {
            Some(obs) => Ok(WeatherObservation {
                city: city.to_string(),
                ..obs
            }),
            None => Err(WeatherError::Request("stub offline".to_string())),
        }
    }
}

/// 构造观测
pub fn observation(temperature_c: f64, main: &str, description: &str) -> WeatherObservation {
    WeatherObservation {
        city: "Mumbai".to_string(),
        temperature_c,
        description: description.to_string(),
        main_condition: main.to_string(),
        humidity_pct: Some(70.0),
        wind_speed_ms: Some(3.5),
    }
}
