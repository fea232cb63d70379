// ==========================================
// 学院教务管理系统 - 服务主入口
// ==========================================
// 启动: 日志 → AppState → 天气轮询；Ctrl-C 后停止轮询并退出
// ==========================================

use anyhow::Context;
use college_admin::app::{get_default_db_path, AppState};
use college_admin::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", college_admin::APP_NAME);
    tracing::info!("系统版本: {}", college_admin::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path)
        .map_err(anyhow::Error::msg)
        .context("无法初始化AppState")?;

    let poller = match app_state.start_weather_poller() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!("天气轮询启动失败(将继续运行): {}", e);
            None
        }
    };

    tracing::info!("服务已启动，按 Ctrl-C 退出");
    let signal = tokio::signal::ctrl_c().await.context("监听退出信号失败");

    tracing::info!("正在停止...");
    if let Some(handle) = poller {
        handle.shutdown().await;
    }
    tracing::info!("已退出");
    signal
}
