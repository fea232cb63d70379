// ==========================================
// 学院教务管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository/引擎错误为用户友好的错误消息
// ==========================================

use crate::config::ConfigResult;
use crate::engine::seat_allocator::{AllocationError, MAX_ROOMS, MAX_SEATS_PER_ROOM};
use crate::i18n::{t, t_with_args};
use crate::repository::error::RepositoryError;
use crate::weather::client::WeatherError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    /// 座位编排时名册为空
    #[error("{0}")]
    EmptyRoster(String),

    // ==========================================
    // 外部服务错误
    // ==========================================
    #[error("外部服务异常: {0}")]
    ExternalService(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::SerializationError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 AllocationError 转换（消息本地化）
// ==========================================
impl From<AllocationError> for ApiError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::EmptyRoster => ApiError::EmptyRoster(t("seating.empty_roster")),
            AllocationError::InvalidCapacity {
                num_rooms,
                seats_per_room,
            } => ApiError::InvalidInput(t_with_args(
                "seating.invalid_capacity",
                &[
                    ("num_rooms", num_rooms.to_string().as_str()),
                    ("seats_per_room", seats_per_room.to_string().as_str()),
                    ("max_rooms", MAX_ROOMS.to_string().as_str()),
                    ("max_seats", MAX_SEATS_PER_ROOM.to_string().as_str()),
                ],
            )),
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        ApiError::ExternalService(err.to_string())
    }
}

/// 配置层错误转换（Box<dyn Error> 无法直接实现 From）
pub(crate) fn config_err<T>(result: ConfigResult<T>) -> ApiResult<T> {
    result.map_err(|e| ApiError::ConfigError(e.to_string()))
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
