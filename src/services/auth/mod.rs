//! 인증 및 보안 서비스 모듈
//!
//! - [`password_hasher`] - bcrypt 비밀번호 해싱/검증
//! - [`token_service`] - HS256 무상태 토큰 발급/검증
//! - [`oauth_state`] - OAuth CSRF state 생성/비교
//! - [`google_auth_service`] - Google Authorization Code 흐름
//!
//! # Security
//!
//! - HMAC-SHA256 토큰 서명, 상수 시간 서명 비교
//! - 256비트 CSPRNG state, fail-closed 기본 정책
//! - 비밀값/토큰/코드는 로그에 남기지 않음
//!
//! # Examples
//!
//! ```rust,ignore
//! use identity_service_backend::services::auth::TokenManager;
//!
//! let manager = TokenManager::new(&config.jwt);
//! let issued = manager.issue_session(&user.id, Role::User)?;
//! let identity = manager.verify(&issued.token)?;
//! ```

pub mod password_hasher;
pub mod token_service;
pub mod oauth_state;
pub mod google_auth_service;

pub use password_hasher::PasswordHasher;
pub use token_service::{Clock, SystemClock, TokenManager};
#[cfg(test)]
pub use token_service::FixedClock;
pub use oauth_state::CsrfStateGenerator;
pub use google_auth_service::{
    AuthorizationRedirect, CallbackParams, FederatedIdentityExchanger, GoogleProviderClient,
    IdentityProviderClient,
};
