//! 서명 토큰 모델
//!
//! 토큰은 저장되지 않는 자기완결 서명 아티팩트입니다. 서버는 세션 상태를 보관하지 않습니다.

use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 토큰이 주장하는 역할
///
/// 단일 역할 모델이므로 변형은 하나뿐입니다. 알 수 없는 역할 문자열은 역직렬화에 실패합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT 클레임
///
/// `iat`/`exp`는 JWT NumericDate(초 단위 UNIX 시간)입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ID
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// 검증을 통과한 토큰이 주장하는 신원
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub role: Role,
}

/// 발급된 토큰과 유효 구간 `[issued_at, expires_at)`
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
