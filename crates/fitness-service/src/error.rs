//! 服务错误类型定义
//!
//! 所有 handler 统一返回 ServiceError，由 IntoResponse 映射为 HTTP 状态码和统一响应体

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// 健身记录服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("导入数据无效: {0}")]
    InvalidImport(String),

    // 资源不存在
    #[error("每日记录不存在: {0}")]
    EntryNotFound(i64),
    #[error("该日期没有记录: {0}")]
    EntryNotFoundForDate(String),
    #[error("运动记录不存在: {0}")]
    ExerciseNotFound(i64),

    // 业务冲突
    #[error("该日期已有记录: {date}")]
    EntryAlreadyExists { date: String, entry_id: i64 },

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ServiceError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidImport(_) => StatusCode::BAD_REQUEST,

            Self::EntryNotFound(_) | Self::EntryNotFoundForDate(_) | Self::ExerciseNotFound(_) => {
                StatusCode::NOT_FOUND
            }

            Self::EntryAlreadyExists { .. } => StatusCode::CONFLICT,

            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidImport(_) => "INVALID_IMPORT",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::EntryNotFoundForDate(_) => "ENTRY_NOT_FOUND_FOR_DATE",
            Self::ExerciseNotFound(_) => "EXERCISE_NOT_FOUND",
            Self::EntryAlreadyExists { .. } => "ENTRY_ALREADY_EXISTS",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 错误响应中附带的数据
    ///
    /// 日期冲突时返回已存在记录的 ID，前端据此切换为更新模式
    fn data(&self) -> serde_json::Value {
        match self {
            Self::EntryAlreadyExists { entry_id, .. } => json!({ "entryId": entry_id }),
            _ => serde_json::Value::Null,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": self.data()
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 请求体无法解析（非 JSON、字段类型错误等）
impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// 路径参数无法解析，如 ID 不是整数
impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// 从 CSV 写入错误转换
impl From<csv::Error> for ServiceError {
    fn from(err: csv::Error) -> Self {
        Self::Internal(format!("CSV 生成失败: {}", err))
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn all_error_variants() -> Vec<(ServiceError, StatusCode, &'static str)> {
        vec![
            (ServiceError::Validation("date is required".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (ServiceError::InvalidImport("not an array".into()), StatusCode::BAD_REQUEST, "INVALID_IMPORT"),
            (ServiceError::EntryNotFound(10), StatusCode::NOT_FOUND, "ENTRY_NOT_FOUND"),
            (ServiceError::EntryNotFoundForDate("2024-01-01".into()), StatusCode::NOT_FOUND, "ENTRY_NOT_FOUND_FOR_DATE"),
            (ServiceError::ExerciseNotFound(20), StatusCode::NOT_FOUND, "EXERCISE_NOT_FOUND"),
            (
                ServiceError::EntryAlreadyExists { date: "2024-01-01".into(), entry_id: 3 },
                StatusCode::CONFLICT,
                "ENTRY_ALREADY_EXISTS",
            ),
            (ServiceError::Internal("unexpected state".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ]
    }

    #[test]
    fn test_all_variants_status_code_and_error_code() {
        for (error, expected_status, expected_code) in all_error_variants() {
            assert_eq!(error.status_code(), expected_status, "状态码不匹配: {expected_code}");
            assert_eq!(error.error_code(), expected_code);
        }
    }

    #[test]
    fn test_display_contains_context() {
        assert!(ServiceError::EntryNotFound(42).to_string().contains("42"));
        assert!(ServiceError::ExerciseNotFound(7).to_string().contains("7"));
        assert!(
            ServiceError::EntryNotFoundForDate("2024-02-29".into())
                .to_string()
                .contains("2024-02-29")
        );
        assert!(ServiceError::Validation("weight".into()).to_string().contains("weight"));
    }

    #[tokio::test]
    async fn test_into_response_body_structure() {
        for (error, expected_status, expected_code) in all_error_variants() {
            let label = format!("{:?}", error);
            let response = error.into_response();
            assert_eq!(response.status(), expected_status, "响应状态码不匹配: {label}");

            let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("读取响应体失败");
            let body: serde_json::Value =
                serde_json::from_slice(&body_bytes).expect("响应体不是合法 JSON");

            assert_eq!(body["success"], json!(false), "{label}");
            assert_eq!(body["code"], json!(expected_code), "{label}");
            assert!(!body["message"].as_str().unwrap_or("").is_empty(), "{label}");
            assert!(body.get("data").is_some(), "{label}");
        }
    }

    #[tokio::test]
    async fn test_conflict_carries_existing_entry_id() {
        let response = ServiceError::EntryAlreadyExists {
            date: "2024-05-01".into(),
            entry_id: 99,
        }
        .into_response();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["data"]["entryId"], json!(99));
    }

    #[tokio::test]
    async fn test_system_errors_hide_internal_details() {
        let response = ServiceError::Internal("stack overflow at module X".into()).into_response();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        let message = body["message"].as_str().unwrap();
        assert!(!message.contains("stack overflow"));
        assert!(message.contains("服务内部错误"));
    }

    #[test]
    fn test_from_sqlx_error() {
        let err = ServiceError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ServiceError::Database(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::{ValidationError, ValidationErrors};

        let mut errors = ValidationErrors::new();
        errors.add("weight", ValidationError::new("range"));

        let err: ServiceError = errors.into();
        match &err {
            ServiceError::Validation(msg) => assert!(msg.contains("weight")),
            other => panic!("期望 Validation 变体，实际: {:?}", other),
        }
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
