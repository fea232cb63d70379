// ==========================================
// 学院教务管理系统 - 天气模块
// ==========================================
// 职责: 外部天气源 + 定时轮询
// ==========================================

pub mod client;
pub mod poller;

pub use client::{OpenWeatherClient, WeatherError, WeatherSource};
pub use poller::{PollError, PollReport, WeatherPoller, WeatherPollerHandle};
