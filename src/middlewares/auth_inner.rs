use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AuthError;
use crate::services::auth::TokenManager;

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
}

/// 토큰 추출/검증 실패 사유
enum Rejection {
    MissingToken,
    Invalid(AuthError),
    NotConfigured,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            match authenticate(&req) {
                Ok(user) => {
                    log::debug!("인증 성공: 사용자 ID {}", user.user_id);
                    // 사용자 정보를 Request Extensions에 저장
                    req.extensions_mut().insert(user);
                }
                Err(rejection) => {
                    let response = rejection_response(rejection);
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
            }

            // 다음 서비스로 요청 전달
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, Rejection> {
    let manager = req
        .app_data::<web::Data<TokenManager>>()
        .ok_or(Rejection::NotConfigured)?;

    let token = req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(TokenManager::extract_bearer_token)
        .ok_or(Rejection::MissingToken)?;

    manager
        .verify(token)
        .map(AuthenticatedUser::from)
        .map_err(Rejection::Invalid)
}

fn rejection_response(rejection: Rejection) -> HttpResponse {
    match rejection {
        Rejection::MissingToken => {
            log::debug!("Authorization 헤더 없음");
            unauthorized("authentication_required", "유효한 인증 토큰이 필요합니다")
        }
        Rejection::Invalid(err) => {
            log::warn!("토큰 거부: {}", err.kind());
            unauthorized(err.kind(), "유효하지 않거나 만료된 토큰입니다")
        }
        Rejection::NotConfigured => {
            log::error!("TokenManager가 app_data에 등록되지 않았습니다");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal_error",
                "message": "내부 서버 오류가 발생했습니다"
            }))
        }
    }
}

fn unauthorized(code: &str, message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
        .json(serde_json::json!({
            "error": code,
            "message": message
        }))
}
