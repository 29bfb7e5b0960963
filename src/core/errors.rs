//! # Application Error Handling System
//!
//! HTTP 경계의 통합 에러 타입입니다. 코어 서비스는 [`AuthError`]처럼 닫힌 에러 집합을
//! 돌려주고, 핸들러는 `?` 한 번으로 [`AppError`]로 바꿔 적절한 상태 코드의 JSON 응답을 만듭니다.
//!
//! ## HTTP 응답 매핑
//!
//! | AuthError | AppError | HTTP Status |
//! |-----------|----------|-------------|
//! | `InvalidCredentials`, `Token*` | `AuthenticationError` | 401 |
//! | `UnverifiedProviderEmail` | `AuthorizationError` | 403 |
//! | `EmailAlreadyRegistered` | `ConflictError` | 409 |
//! | `InvalidState` | `ValidationError` | 400 |
//! | `CodeExchangeFailed`, `ProfileFetchFailed` | `ExternalServiceError` | 502 |
//! | `StoreUnavailable` | `ServiceUnavailable` | 503 |
//! | 그 외 | `InternalError` | 500 |
//!
//! 5xx 응답 본문에는 내부 정보를 싣지 않습니다. 상세 내용은 서버 로그에만 남습니다.
//!
//! ```rust,ignore
//! async fn login(payload: web::Json<LocalLoginRequest>) -> Result<HttpResponse, AppError> {
//!     let user = reconciler.resolve_local(&payload.email, &payload.password).await?;
//!     Ok(HttpResponse::Ok().json(user))
//! }
//! ```

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;
use crate::errors::{AuthError, StoreError, INVALID_CREDENTIALS_MESSAGE};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict error: {0}")]
    ConflictError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 응답 본문의 `error` 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::ConflictError(_) => "conflict",
            AppError::AuthenticationError(_) => "authentication_failed",
            AppError::AuthorizationError(_) => "forbidden",
            AppError::ExternalServiceError(_) => "upstream_error",
            AppError::ServiceUnavailable(_) => "service_unavailable",
            AppError::InternalError(_) => "internal_error",
        }
    }

    /// 클라이언트에 노출해도 되는 메시지
    fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::AuthenticationError(msg)
            | AppError::AuthorizationError(msg) => msg.clone(),
            AppError::ExternalServiceError(_) => "외부 인증 프로바이더와 통신하지 못했습니다".to_string(),
            AppError::ServiceUnavailable(_) => "일시적으로 서비스를 사용할 수 없습니다".to_string(),
            AppError::InternalError(_) => "내부 서버 오류가 발생했습니다".to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("요청 처리 실패 ({}): {}", status, self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.code(),
            "message": self.public_message(),
        }))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::AuthenticationError(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            AuthError::TokenMalformed(_) | AuthError::TokenSignatureInvalid | AuthError::TokenExpired => {
                AppError::AuthenticationError(err.to_string())
            }
            AuthError::UnverifiedProviderEmail => AppError::AuthorizationError(err.to_string()),
            AuthError::EmailAlreadyRegistered => AppError::ConflictError(err.to_string()),
            AuthError::InvalidState => AppError::ValidationError(err.to_string()),
            AuthError::CodeExchangeFailed(_) | AuthError::ProfileFetchFailed(_) => {
                AppError::ExternalServiceError(err.to_string())
            }
            AuthError::StoreUnavailable(_) => AppError::ServiceUnavailable(err.to_string()),
            AuthError::HashingError(_)
            | AuthError::TokenSigningError(_)
            | AuthError::InvalidOAuthConfig(_)
            | AuthError::StateGenerationFailed(_) => AppError::InternalError(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AuthError::from(err).into()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    fn status_of(err: AuthError) -> StatusCode {
        AppError::from(err).error_response().status()
    }

    #[test]
    fn test_auth_error_status_mapping() {
        assert_eq!(status_of(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::TokenSignatureInvalid), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::TokenMalformed("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::UnverifiedProviderEmail), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AuthError::EmailAlreadyRegistered), StatusCode::CONFLICT);
        assert_eq!(status_of(AuthError::InvalidState), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AuthError::CodeExchangeFailed("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(AuthError::ProfileFetchFailed("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(AuthError::StoreUnavailable("x".into())), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of(AuthError::HashingError("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_invalid_credentials_body_is_generic() {
        let response = AppError::from(AuthError::InvalidCredentials).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "authentication_failed");
        assert_eq!(json["message"], INVALID_CREDENTIALS_MESSAGE);
    }

    #[actix_web::test]
    async fn test_server_errors_hide_details() {
        let response = AppError::InternalError("mongodb://user:pw@host".to_string()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(!text.contains("mongodb://"));
    }

    #[test]
    fn test_store_conflict_maps_to_conflict() {
        let err: AppError = StoreError::Conflict { field: "email" }.into();
        assert!(matches!(err, AppError::ConflictError(_)));
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
