//! JWT 토큰 관리 서비스 구현
//!
//! 무상태 서명 토큰(HS256)을 발급하고 검증합니다.
//! 서명 비밀키는 기동 시 [`JwtConfig`]로 한 번 주입되며 프로세스 수명 동안 바뀌지 않습니다.
//! 키 교체는 재시작으로만 가능합니다.
//!
//! 검증 순서:
//! 1. 마지막 `.` 기준으로 서명 분리 → `.`이 없으면 `TokenMalformed`
//! 2. 서명 앞부분 전체에 대한 서명을 상수 시간으로 비교 → 실패 시 `TokenSignatureInvalid`
//! 3. 세 부분 구조 확인과 클레임 역직렬화 → 실패 시 `TokenMalformed`
//! 4. `now < expires_at + leeway` 확인 → 실패 시 `TokenExpired`

use std::sync::Arc;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{crypto, decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use crate::config::JwtConfig;
use crate::domain::models::token::{IssuedToken, Role, TokenClaims, VerifiedIdentity};
use crate::errors::AuthError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// 현재 시각 공급자
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 시스템 시계
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 테스트용 고정 시계
#[cfg(test)]
#[derive(Debug)]
pub struct FixedClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: std::sync::Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        match self.now.lock() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set(next);
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_duration: Duration,
    leeway: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    pub fn new(config: &JwtConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            token_duration: config.token_duration,
            leeway: config.leeway,
            clock,
        }
    }

    /// 로그인 토큰의 기본 유효 기간
    pub fn token_duration(&self) -> Duration {
        self.token_duration
    }

    /// 토큰 발급
    ///
    /// `issued_at`은 초 단위로 절삭되며 `duration`은 최소 1초여야 합니다.
    pub fn issue(&self, subject: &str, role: Role, duration: Duration) -> Result<IssuedToken, AuthError> {
        if subject.is_empty() {
            return Err(AuthError::TokenSigningError("subject must not be empty".to_string()));
        }

        let seconds = duration.num_seconds();
        if seconds < 1 {
            return Err(AuthError::TokenSigningError(format!(
                "token duration must be at least one second, got {}ms",
                duration.num_milliseconds()
            )));
        }

        let iat = self.clock.now().timestamp();
        let exp = iat
            .checked_add(seconds)
            .ok_or_else(|| AuthError::TokenSigningError("token duration overflows".to_string()))?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            role,
            iat,
            exp,
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenSigningError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            issued_at: timestamp_to_datetime(iat)?,
            expires_at: timestamp_to_datetime(exp)?,
        })
    }

    /// 설정된 기본 유효 기간으로 로그인 토큰 발급
    pub fn issue_session(&self, subject: &str, role: Role) -> Result<IssuedToken, AuthError> {
        self.issue(subject, role, self.token_duration)
    }

    /// 토큰 검증
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let (message, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| AuthError::TokenMalformed("missing signature segment".to_string()))?;

        // crypto::verify는 내부적으로 상수 시간 비교를 사용합니다
        match crypto::verify(signature, message.as_bytes(), &self.decoding_key, ALGORITHM) {
            Ok(true) => {}
            Ok(false) | Err(_) => return Err(AuthError::TokenSignatureInvalid),
        }

        // 서명이 맞은 뒤에만 구조를 검사
        if message.split('.').count() != 2 {
            return Err(AuthError::TokenMalformed("expected three dot-separated segments".to_string()));
        }

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &claims_only_validation())
            .map_err(|e| AuthError::TokenMalformed(e.to_string()))?
            .claims;

        if claims.sub.is_empty() {
            return Err(AuthError::TokenMalformed("empty subject".to_string()));
        }
        if claims.exp <= claims.iat {
            return Err(AuthError::TokenMalformed("expires_at is not after issued_at".to_string()));
        }

        // [iat, exp) 구간: exp와 같은 시각은 만료
        let now_ms = self.clock.now().timestamp_millis();
        let deadline_ms = claims
            .exp
            .saturating_mul(1000)
            .saturating_add(self.leeway.num_milliseconds());
        if now_ms >= deadline_ms {
            debug!("만료된 토큰: sub={}, exp={}", claims.sub, claims.exp);
            return Err(AuthError::TokenExpired);
        }

        Ok(VerifiedIdentity {
            subject: claims.sub,
            role: claims.role,
        })
    }

    /// `Authorization` 헤더에서 Bearer 토큰 추출
    pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// 서명은 이미 확인했으므로 클레임 구조만 검사
fn claims_only_validation() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

fn timestamp_to_datetime(seconds: i64) -> Result<DateTime<Utc>, AuthError> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| AuthError::TokenSigningError(format!("timestamp out of range: {}", seconds)))
}
