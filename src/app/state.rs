// ==========================================
// 学院教务管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{
    AttendanceApi, ConfigApi, DashboardApi, SeatingApi, StudentApi, WeatherApi,
};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::notify::{Mailer, OutboxMailer};
use crate::repository::{
    ActionLogRepository, AttendanceRepository, MailOutboxRepository, SeatingRepository,
    StudentRepository, WeatherLogRepository,
};
use crate::weather::{OpenWeatherClient, WeatherPoller, WeatherPollerHandle, WeatherSource};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 学生API
    pub student_api: Arc<StudentApi>,

    /// 座位编排API
    pub seating_api: Arc<SeatingApi>,

    /// 考勤API
    pub attendance_api: Arc<AttendanceApi>,

    /// 天气API
    pub weather_api: Arc<WeatherApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,

    /// 配置管理器（启动天气轮询时读取）
    pub config_manager: Arc<ConfigManager>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,

    /// 发件箱仓储
    pub mail_outbox_repo: Arc<MailOutboxRepository>,

    weather_repo: Arc<WeatherLogRepository>,
    mailer: Arc<dyn Mailer>,
    weather_source: Arc<dyn WeatherSource>,
}

impl AppState {
    /// 创建新的AppState实例（发件箱投递 + OpenWeatherMap 天气源）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::build(db_path, None, None)
    }

    /// 注入邮件/天气协作者（测试与外部集成使用）
    pub fn with_collaborators(
        db_path: String,
        mailer: Arc<dyn Mailer>,
        weather_source: Arc<dyn WeatherSource>,
    ) -> Result<Self, String> {
        Self::build(db_path, Some(mailer), Some(weather_source))
    }

    fn build(
        db_path: String,
        mailer: Option<Arc<dyn Mailer>>,
        weather_source: Option<Arc<dyn WeatherSource>>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库结构初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        match config_manager.apply_env_overrides() {
            Ok(n) if n > 0 => tracing::info!("环境变量覆写配置 {} 项", n),
            Ok(_) => {}
            Err(e) => tracing::warn!("环境变量覆写配置失败(将继续启动): {}", e),
        }

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let student_repo = Arc::new(StudentRepository::new(conn.clone()));
        let seating_repo = Arc::new(SeatingRepository::new(conn.clone()));
        let attendance_repo = Arc::new(AttendanceRepository::new(conn.clone()));
        let weather_repo = Arc::new(WeatherLogRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));
        let mail_outbox_repo = Arc::new(MailOutboxRepository::new(conn));

        // ==========================================
        // 外部协作者
        // ==========================================
        let mailer: Arc<dyn Mailer> = match mailer {
            Some(m) => m,
            None => {
                let sender = config_manager
                    .get_mail_sender()
                    .map_err(|e| format!("读取发件人配置失败: {}", e))?;
                Arc::new(OutboxMailer::new(mail_outbox_repo.clone(), sender))
            }
        };

        let settings = config_manager
            .get_weather_settings()
            .map_err(|e| format!("读取天气配置失败: {}", e))?;
        if settings.api_key.trim().is_empty() {
            tracing::warn!("未配置天气 API Key（WEATHER_API_KEY），天气功能将不可用");
        }
        let weather_source: Arc<dyn WeatherSource> = match weather_source {
            Some(s) => s,
            None => Arc::new(
                OpenWeatherClient::new(
                    &settings.api_base_url,
                    &settings.api_key,
                    settings.request_timeout,
                )
                .map_err(|e| format!("无法创建天气客户端: {}", e))?,
            ),
        };

        // ==========================================
        // 初始化API层
        // ==========================================
        let student_api = Arc::new(StudentApi::new(student_repo.clone(), action_log_repo.clone()));

        let seating_api = Arc::new(SeatingApi::new(student_repo.clone(), seating_repo));

        let attendance_api = Arc::new(AttendanceApi::new(
            student_repo.clone(),
            attendance_repo.clone(),
            action_log_repo.clone(),
            mailer.clone(),
        ));

        let weather_api = Arc::new(WeatherApi::new(
            weather_repo.clone(),
            weather_source.clone(),
            settings.city,
        ));

        let dashboard_api = Arc::new(DashboardApi::new(
            student_repo,
            attendance_repo,
            weather_repo.clone(),
        ));

        let config_api = Arc::new(ConfigApi::new(config_manager.clone(), action_log_repo.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            student_api,
            seating_api,
            attendance_api,
            weather_api,
            dashboard_api,
            config_api,
            config_manager,
            action_log_repo,
            mail_outbox_repo,
            weather_repo,
            mailer,
            weather_source,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }

    /// 启动天气轮询（需在 tokio 运行时内调用）
    ///
    /// # 返回
    /// - Ok(WeatherPollerHandle): 由调用方持有，退出前调用 shutdown()
    pub fn start_weather_poller(&self) -> Result<WeatherPollerHandle, String> {
        let settings = self
            .config_manager
            .get_weather_settings()
            .map_err(|e| format!("读取天气配置失败: {}", e))?;

        let poller = WeatherPoller::new(
            self.weather_source.clone(),
            self.weather_repo.clone(),
            self.mailer.clone(),
            settings,
        );
        Ok(poller.spawn())
    }
}

// ==========================================
// 工具函数
// ==========================================

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "COLLEGE_ADMIN_DB_PATH";

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 COLLEGE_ADMIN_DB_PATH（非空时）
/// - 否则: 用户数据目录/college-admin/college_admin.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./college_admin.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("college-admin");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("college_admin.db");
        }
    }

    path.to_string_lossy().to_string()
}
