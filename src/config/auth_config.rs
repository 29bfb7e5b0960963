//! 인증, OAuth, JWT 관련 설정
//!
//! 서명 비밀키와 OAuth 클라이언트 자격 증명은 기동 시 한 번 로드되어
//! 프로세스 수명 동안 바뀌지 않습니다. 비밀키 교체에는 재시작이 필요합니다.
//!
//! ```bash
//! export JWT_SECRET="your-super-secret-key"
//! export JWT_DURATION_HOURS="168"
//! export GOOGLE_CLIENT_ID="your-client-id"
//! export GOOGLE_CLIENT_SECRET="your-client-secret"
//! export GOOGLE_REDIRECT_URI="https://yourdomain.com/api/v1/auth/google/callback"
//! ```

use std::fmt;
use std::time::Duration as StdDuration;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use crate::errors::AuthError;
use super::data_config::{parse_bool_or, parse_in_range};
use super::{ConfigError, Environment};

/// 인증 프로바이더
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// 이메일/비밀번호
    Local,
    /// 외부 ID 프로바이더 (Google)
    Federated,
}

/// JWT 서명/수명 설정
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    /// 로그인 시 발급하는 토큰 수명
    pub token_duration: Duration,
    /// 만료 판정 시 허용하는 시계 오차 (기본 0)
    pub leeway: Duration,
}

impl JwtConfig {
    const DEFAULT_DURATION_HOURS: i64 = 168;
    /// 1년 (윤년 기준)
    const MAX_DURATION_HOURS: i64 = 8784;
    const MAX_LEEWAY_SECONDS: i64 = 3600;

    pub fn new(secret: impl Into<String>, token_duration: Duration, leeway: Duration) -> Self {
        Self {
            secret: secret.into(),
            token_duration,
            leeway,
        }
    }

    /// `JWT_SECRET`, `JWT_DURATION_HOURS`, `JWT_LEEWAY_SECONDS`를 읽습니다.
    ///
    /// 형식이 잘못된 기간 값은 기본값으로 대체하지 않고 기동을 중단시킵니다.
    pub fn from_lookup<F>(lookup: &F, environment: Environment) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None if environment.is_local() => {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                "local-development-secret-change-me".to_string()
            }
            None => return Err(ConfigError::MissingVar("JWT_SECRET")),
        };

        if secret.len() < 32 {
            log::warn!("JWT_SECRET가 32바이트보다 짧습니다. 운영 환경에서는 더 긴 비밀키를 사용하세요");
        }

        let hours: i64 = parse_in_range(
            lookup,
            "JWT_DURATION_HOURS",
            Self::DEFAULT_DURATION_HOURS,
            1..=Self::MAX_DURATION_HOURS,
        )?;
        let token_duration = checked_duration("JWT_DURATION_HOURS", hours, Duration::try_hours(hours))?;

        let leeway_secs: i64 = parse_in_range(lookup, "JWT_LEEWAY_SECONDS", 0, 0..=Self::MAX_LEEWAY_SECONDS)?;
        let leeway = checked_duration("JWT_LEEWAY_SECONDS", leeway_secs, Duration::try_seconds(leeway_secs))?;

        Ok(Self::new(secret, token_duration, leeway))
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_duration", &self.token_duration)
            .field("leeway", &self.leeway)
            .finish()
    }
}

/// Google OAuth 2.0 클라이언트 설정
#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub userinfo_uri: String,
    pub scopes: String,
    /// 프로바이더 호출 1회당 최대 대기 시간
    pub http_timeout: StdDuration,
}

impl GoogleOAuthConfig {
    pub const DEFAULT_AUTH_URI: &'static str = "https://accounts.google.com/o/oauth2/v2/auth";
    pub const DEFAULT_TOKEN_URI: &'static str = "https://oauth2.googleapis.com/token";
    pub const DEFAULT_USERINFO_URI: &'static str = "https://www.googleapis.com/oauth2/v2/userinfo";
    const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
    const MAX_HTTP_TIMEOUT_SECS: u64 = 120;

    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            auth_uri: Self::DEFAULT_AUTH_URI.to_string(),
            token_uri: Self::DEFAULT_TOKEN_URI.to_string(),
            userinfo_uri: Self::DEFAULT_USERINFO_URI.to_string(),
            scopes: "openid email profile".to_string(),
            http_timeout: StdDuration::from_secs(Self::DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            lookup("GOOGLE_CLIENT_ID").unwrap_or_default(),
            lookup("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            lookup("GOOGLE_REDIRECT_URI").unwrap_or_default(),
        );

        if let Some(uri) = lookup("GOOGLE_AUTH_URI") {
            config.auth_uri = uri;
        }
        if let Some(uri) = lookup("GOOGLE_TOKEN_URI") {
            config.token_uri = uri;
        }
        if let Some(uri) = lookup("GOOGLE_USERINFO_URI") {
            config.userinfo_uri = uri;
        }
        if let Some(scopes) = lookup("GOOGLE_SCOPES") {
            config.scopes = scopes;
        }
        config.http_timeout = StdDuration::from_secs(parse_in_range(
            lookup,
            "OAUTH_HTTP_TIMEOUT_SECONDS",
            Self::DEFAULT_HTTP_TIMEOUT_SECS,
            1..=Self::MAX_HTTP_TIMEOUT_SECS,
        )?);

        config.validate()?;
        Ok(config)
    }

    /// 필수 값 세 가지 중 하나라도 비어 있으면 실패합니다.
    pub fn validate(&self) -> Result<(), AuthError> {
        let required = [
            ("GOOGLE_CLIENT_ID", &self.client_id),
            ("GOOGLE_CLIENT_SECRET", &self.client_secret),
            ("GOOGLE_REDIRECT_URI", &self.redirect_uri),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::InvalidOAuthConfig(format!("{} must be set", missing.join(", "))))
        }
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .field("userinfo_uri", &self.userinfo_uri)
            .field("scopes", &self.scopes)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// OAuth 리다이렉트 흐름 정책
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// CSRF state를 왕복시키는 쿠키 이름
    pub state_cookie_name: String,
    /// state 쿠키 수명
    pub state_ttl: Duration,
    pub state_cookie_secure: bool,
    /// 안전한 난수원이 없을 때 시간 기반 값으로 대체하지 않고 실패
    pub state_fail_closed: bool,
    /// 프로바이더가 검증한 이메일만 계정 생성/연동에 사용
    pub require_verified_email: bool,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            state_cookie_name: "oauth_state".to_string(),
            state_ttl: Duration::hours(1),
            state_cookie_secure: true,
            state_fail_closed: true,
            require_verified_email: true,
        }
    }
}

impl OAuthConfig {
    /// 하루
    const MAX_STATE_TTL_SECONDS: i64 = 86_400;

    pub fn from_lookup<F>(lookup: &F, environment: Environment) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let ttl_secs: i64 = parse_in_range(
            lookup,
            "OAUTH_STATE_TTL_SECONDS",
            defaults.state_ttl.num_seconds(),
            1..=Self::MAX_STATE_TTL_SECONDS,
        )?;
        let state_ttl = checked_duration("OAUTH_STATE_TTL_SECONDS", ttl_secs, Duration::try_seconds(ttl_secs))?;

        let config = Self {
            state_cookie_name: lookup("OAUTH_STATE_COOKIE_NAME").unwrap_or(defaults.state_cookie_name),
            state_ttl,
            state_cookie_secure: parse_bool_or(
                lookup,
                "OAUTH_STATE_COOKIE_SECURE",
                environment != Environment::Development,
            )?,
            state_fail_closed: parse_bool_or(lookup, "OAUTH_STATE_FAIL_CLOSED", true)?,
            require_verified_email: parse_bool_or(lookup, "OAUTH_REQUIRE_VERIFIED_EMAIL", true)?,
        };

        if !config.state_fail_closed {
            log::warn!("⚠️ OAUTH_STATE_FAIL_CLOSED=false: 난수원 장애 시 시간 기반 state로 대체됩니다");
        }
        if !config.require_verified_email {
            log::warn!("⚠️ OAUTH_REQUIRE_VERIFIED_EMAIL=false: 미검증 이메일로 로컬 계정 연동이 허용됩니다");
        }

        Ok(config)
    }
}

/// chrono가 표현하지 못하는 기간은 설정 에러로 돌립니다.
fn checked_duration(key: &'static str, raw: i64, duration: Option<Duration>) -> Result<Duration, ConfigError> {
    duration.ok_or_else(|| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: "duration out of range".to_string(),
    })
}
