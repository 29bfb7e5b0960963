//! # Configuration Module
//!
//! 백엔드 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값을 기동 시점에 한 번 읽어 불변 [`AppConfig`]로 묶고,
//! 각 서비스 생성자에 명시적으로 전달합니다. 전역 접근자는 없습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 서버, 저장소, Rate Limit, 비밀번호 해싱, 실행 환경
//! - [`auth_config`] - JWT, Google OAuth, OAuth state 정책
//!
//! ## 실패 정책
//!
//! 설정 오류는 기동 시 치명적입니다. 반쯤 구성된 상태로 트래픽을 받지 않도록
//! `main`은 [`ConfigError`]를 받으면 소켓을 바인딩하기 전에 종료합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use identity_service_backend::config::AppConfig;
//!
//! let config = AppConfig::from_env()?;
//! println!("Server will bind to {}", config.server.bind_address());
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;

use thiserror::Error;
use crate::errors::AuthError;

/// 기동 시 설정 에러
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    OAuth(#[from] AuthError),
}

/// 애플리케이션 전체 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
    pub database: DatabaseConfig,
    pub password: PasswordConfig,
    pub jwt: JwtConfig,
    pub google: GoogleOAuthConfig,
    pub oauth: OAuthConfig,
    pub service_name: String,
    pub service_version: String,
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정을 읽습니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(lookup);

        Ok(Self {
            environment,
            server: ServerConfig::from_lookup(lookup)?,
            rate_limit: RateLimitConfig::from_lookup(lookup),
            database: DatabaseConfig::from_lookup(lookup)?,
            password: PasswordConfig::from_lookup(lookup, environment),
            jwt: JwtConfig::from_lookup(lookup, environment)?,
            google: GoogleOAuthConfig::from_lookup(lookup)?,
            oauth: OAuthConfig::from_lookup(lookup, environment)?,
            service_name: lookup("SERVICE_NAME")
                .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
            service_version: lookup("SERVICE_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_full_config_loads() {
        let lookup = lookup_from(&[
            ("ENVIRONMENT", "test"),
            ("GOOGLE_CLIENT_ID", "client"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
            ("GOOGLE_REDIRECT_URI", "http://localhost:8080/api/v1/auth/google/callback"),
            ("STORE_BACKEND", "memory"),
        ]);

        let config = AppConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.password.bcrypt_cost, 4);
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.service_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_missing_oauth_config_is_fatal() {
        let lookup = lookup_from(&[("ENVIRONMENT", "test")]);
        let err = AppConfig::from_lookup(&lookup).unwrap_err();
        assert!(matches!(err, ConfigError::OAuth(AuthError::InvalidOAuthConfig(_))));
    }
}
