//! 요청 단위 인증 컨텍스트
//!
//! 인증 미들웨어가 토큰을 검증한 뒤 Request Extensions에 넣어 두면
//! 핸들러는 추출자로 꺼내 씁니다.
//!
//! ```rust,ignore
//! #[get("/me")]
//! async fn me(user: AuthenticatedUser) -> HttpResponse {
//!     HttpResponse::Ok().body(user.user_id)
//! }
//! ```

use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use crate::domain::models::token::{Role, VerifiedIdentity};

/// 검증된 토큰의 주체
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,

    pub role: Role,
}

impl From<VerifiedIdentity> for AuthenticatedUser {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            user_id: identity.subject,
            role: identity.role,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "인증되지 않은 요청입니다"
            ))),
        }
    }
}
