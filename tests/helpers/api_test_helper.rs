// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

use std::error::Error;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tempfile::NamedTempFile;

use college_admin::api::{
    AttendanceApi, ConfigApi, DashboardApi, SeatingApi, StudentApi, WeatherApi,
};
use college_admin::config::ConfigManager;
use college_admin::domain::student::Student;
use college_admin::engine::{KeepOrder, SeatAllocator};
use college_admin::repository::{
    ActionLogRepository, AttendanceRepository, MailOutboxRepository, SeatingRepository,
    StudentRepository, WeatherLogRepository,
};

use super::stubs::{observation, RecordingMailer, StubWeatherSource};
use super::test_helpers::{create_test_db, new_student, open_shared_conn};

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 座位分配使用固定院系顺序（首次出现顺序），邮件/天气使用桩实现
pub struct ApiTestEnv {
    pub db_path: String,
    pub conn: Arc<Mutex<Connection>>,

    pub student_api: Arc<StudentApi>,
    pub seating_api: Arc<SeatingApi>,
    pub attendance_api: Arc<AttendanceApi>,
    pub weather_api: Arc<WeatherApi>,
    pub dashboard_api: Arc<DashboardApi>,
    pub config_api: Arc<ConfigApi>,

    // Repository层（用于测试数据准备/断言）
    pub config_manager: Arc<ConfigManager>,
    pub student_repo: Arc<StudentRepository>,
    pub seating_repo: Arc<SeatingRepository>,
    pub attendance_repo: Arc<AttendanceRepository>,
    pub weather_repo: Arc<WeatherLogRepository>,
    pub action_log_repo: Arc<ActionLogRepository>,
    pub mail_outbox_repo: Arc<MailOutboxRepository>,

    // 协作者桩
    pub mailer: Arc<RecordingMailer>,
    pub weather_source: Arc<StubWeatherSource>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    pub fn new() -> Result<Self, Box<dyn Error + Send + Sync>> {
        Self::with_mailer(RecordingMailer::default())
    }

    /// 邮件投递总是失败的环境
    pub fn with_failing_mailer() -> Result<Self, Box<dyn Error + Send + Sync>> {
        Self::with_mailer(RecordingMailer::failing())
    }

    fn with_mailer(mailer: RecordingMailer) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let (temp_file, db_path) = create_test_db()?;
        let conn = open_shared_conn(&db_path)?;

        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone())?);

        let student_repo = Arc::new(StudentRepository::new(conn.clone()));
        let seating_repo = Arc::new(SeatingRepository::new(conn.clone()));
        let attendance_repo = Arc::new(AttendanceRepository::new(conn.clone()));
        let weather_repo = Arc::new(WeatherLogRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));
        let mail_outbox_repo = Arc::new(MailOutboxRepository::new(conn.clone()));

        let mailer = Arc::new(mailer);
        let weather_source = Arc::new(StubWeatherSource::returning(observation(
            31.0, "Clouds", "scattered clouds",
        )));

        let student_api = Arc::new(StudentApi::new(student_repo.clone(), action_log_repo.clone()));
        let seating_api = Arc::new(SeatingApi::with_allocator(
            student_repo.clone(),
            seating_repo.clone(),
            SeatAllocator::with_shuffler(Arc::new(KeepOrder)),
        ));
        let attendance_api = Arc::new(AttendanceApi::new(
            student_repo.clone(),
            attendance_repo.clone(),
            action_log_repo.clone(),
            mailer.clone(),
        ));
        let weather_api = Arc::new(WeatherApi::new(
            weather_repo.clone(),
            weather_source.clone(),
            "Mumbai",
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            student_repo.clone(),
            attendance_repo.clone(),
            weather_repo.clone(),
        ));
        let config_api = Arc::new(ConfigApi::new(config_manager.clone(), action_log_repo.clone()));

        Ok(Self {
            db_path,
            conn,
            student_api,
            seating_api,
            attendance_api,
            weather_api,
            dashboard_api,
            config_api,
            config_manager,
            student_repo,
            seating_repo,
            attendance_repo,
            weather_repo,
            action_log_repo,
            mail_outbox_repo,
            mailer,
            weather_source,
            _temp_file: temp_file,
        })
    }

    /// 按 (学号, 院系) 顺序登记学生
    pub fn add_students(&self, roster: &[(&str, &str)]) -> Vec<Student> {
        roster
            .iter()
            .map(|(roll, dept)| {
                self.student_api
                    .add_student(new_student(roll, dept), "tester")
                    .expect("登记学生失败")
            })
            .collect()
    }
}
