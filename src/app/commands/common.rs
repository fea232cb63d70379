use crate::api::error::ApiError;
use crate::domain::types::DATE_FORMAT;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// 公共工具：错误映射、日期解析、序列化
// ==========================================

/// 错误响应（返回给调用方）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 错误代码
pub(super) fn error_code(err: &ApiError) -> &'static str {
    match err {
        ApiError::InvalidInput(_) => "INVALID_INPUT",
        ApiError::NotFound(_) => "NOT_FOUND",
        ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
        ApiError::EmptyRoster(_) => "EMPTY_ROSTER",
        ApiError::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
        ApiError::DatabaseError(_) => "DATABASE_ERROR",
        ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
        ApiError::DatabaseTransactionError(_) => "DATABASE_TRANSACTION_ERROR",
        ApiError::ConfigError(_) => "CONFIG_ERROR",
        ApiError::InternalError(_) => "INTERNAL_ERROR",
        ApiError::Other(_) => "OTHER_ERROR",
    }
}

/// 将ApiError转换为JSON字符串
pub(super) fn map_api_error(err: ApiError) -> String {
    let error_response = ErrorResponse {
        code: error_code(&err).to_string(),
        message: err.to_string(),
        details: None,
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| err.to_string())
}

/// 入参错误（未进入 API 层）
pub(super) fn invalid_input(message: impl Into<String>) -> String {
    map_api_error(ApiError::InvalidInput(message.into()))
}

/// 解析日期字符串
pub(super) fn parse_date(date_str: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
        .map_err(|e| invalid_input(format!("日期格式错误（应为YYYY-MM-DD）: {}", e)))
}

pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("序列化失败: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_api_error_empty_roster_code() {
        let json = map_api_error(ApiError::EmptyRoster("No students".to_string()));
        let resp: ErrorResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(resp.code, "EMPTY_ROSTER");
        assert_eq!(resp.message, "No students");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
        let err = parse_date("03/01/2026").unwrap_err();
        assert!(err.contains("INVALID_INPUT"));
    }
}
