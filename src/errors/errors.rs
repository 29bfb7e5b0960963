//! 인증/신원 코어의 에러 체계
//!
//! 코어가 반환할 수 있는 에러 종류는 닫힌 열거형으로 고정되어 있습니다.
//! 호출자는 문자열을 검사하지 않고 변형(variant)을 직접 매칭합니다.
//! HTTP 상태 코드로의 매핑은 [`crate::core::errors::AppError`]가 담당합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AuthError;
//!
//! match token_manager.verify(token) {
//!     Ok(identity) => println!("subject: {}", identity.subject),
//!     Err(AuthError::TokenExpired) => println!("다시 로그인하세요"),
//!     Err(other) => println!("거부됨: {}", other),
//! }
//! ```

use thiserror::Error;

/// 로그인 실패 시 외부에 노출되는 유일한 메시지
///
/// "존재하지 않는 이메일"과 "틀린 비밀번호"를 구분하지 않습니다.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

/// 인증 코어 에러
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// 이메일 또는 비밀번호 불일치 (원인 구분 없음)
    #[error("invalid email or password")]
    InvalidCredentials,

    /// 이미 사용 중인 이메일
    #[error("email already registered")]
    EmailAlreadyRegistered,

    /// 비밀번호 해싱 실패 (엔트로피/자원 고갈)
    #[error("password hashing failed: {0}")]
    HashingError(String),

    /// 토큰 서명 실패 또는 잘못된 발급 요청
    #[error("token signing failed: {0}")]
    TokenSigningError(String),

    /// 구조가 깨진 토큰
    #[error("malformed token: {0}")]
    TokenMalformed(String),

    /// 서명 불일치
    #[error("token signature invalid")]
    TokenSignatureInvalid,

    /// 만료된 토큰
    #[error("token expired")]
    TokenExpired,

    /// OAuth state 불일치 (CSRF 의심)
    #[error("invalid oauth state")]
    InvalidState,

    /// 인가 코드 → 액세스 토큰 교환 실패
    #[error("authorization code exchange failed: {0}")]
    CodeExchangeFailed(String),

    /// 프로바이더 사용자 정보 조회 실패
    #[error("provider profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    /// OAuth 설정 누락 (기동 시 치명적)
    #[error("invalid oauth configuration: {0}")]
    InvalidOAuthConfig(String),

    /// 사용자 저장소 사용 불가
    #[error("user store unavailable: {0}")]
    StoreUnavailable(String),

    /// 프로바이더가 검증하지 않은 이메일로 계정 연동/생성 시도
    #[error("provider has not verified this email address")]
    UnverifiedProviderEmail,

    /// 안전한 난수원을 사용할 수 없어 state 생성을 거부함
    #[error("secure randomness unavailable: {0}")]
    StateGenerationFailed(String),
}

impl AuthError {
    /// 로그/메트릭용 짧은 식별자
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::EmailAlreadyRegistered => "email_already_registered",
            AuthError::HashingError(_) => "hashing_error",
            AuthError::TokenSigningError(_) => "token_signing_error",
            AuthError::TokenMalformed(_) => "token_malformed",
            AuthError::TokenSignatureInvalid => "token_signature_invalid",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidState => "invalid_state",
            AuthError::CodeExchangeFailed(_) => "code_exchange_failed",
            AuthError::ProfileFetchFailed(_) => "profile_fetch_failed",
            AuthError::InvalidOAuthConfig(_) => "invalid_oauth_config",
            AuthError::StoreUnavailable(_) => "store_unavailable",
            AuthError::UnverifiedProviderEmail => "unverified_provider_email",
            AuthError::StateGenerationFailed(_) => "state_generation_failed",
        }
    }
}

/// 사용자 저장소(외부 협력자)가 돌려주는 에러
///
/// "없음"은 에러가 아니라 `Ok(None)`으로 표현합니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 유니크 제약 위반 (`email` 또는 `federated_id`)
    #[error("unique constraint violated on {field}")]
    Conflict { field: &'static str },

    /// 저장소 연결/쿼리 실패
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { field: "email" } => AuthError::EmailAlreadyRegistered,
            other => AuthError::StoreUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message_is_fixed() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn test_email_conflict_maps_to_already_registered() {
        let err: AuthError = StoreError::Conflict { field: "email" }.into();
        assert_eq!(err, AuthError::EmailAlreadyRegistered);
    }

    #[test]
    fn test_other_store_errors_map_to_unavailable() {
        let err: AuthError = StoreError::Unavailable("connection reset".to_string()).into();
        assert!(matches!(err, AuthError::StoreUnavailable(msg) if msg.contains("connection reset")));

        let err: AuthError = StoreError::Conflict { field: "federated_id" }.into();
        assert_eq!(err.kind(), "store_unavailable");
    }
}
