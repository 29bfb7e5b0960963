//! 인증 미들웨어
//!
//! 보호된 스코프에 감싸 두면 모든 요청의 `Authorization: Bearer <token>`을
//! [`TokenManager::verify`](crate::services::auth::TokenManager::verify)로 검증하고,
//! 성공 시 [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser)를
//! Request Extensions에 넣습니다. 실패하면 핸들러를 호출하지 않고 401을 돌려줍니다.
//!
//! ```rust,ignore
//! web::scope("/me")
//!     .wrap(AuthMiddleware::required())
//!     .route("", web::get().to(get_me))
//! ```

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};
use crate::middlewares::auth_inner::AuthMiddlewareService;

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// 유효한 토큰이 없으면 거부
    pub fn required() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}
