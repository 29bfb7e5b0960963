//! API 라우트 설정 모듈
//!
//! | 스코프 | 인증 | 핸들러 |
//! |--------|------|--------|
//! | `/health`, `/metadata` | – | 상태/서비스 정보 |
//! | `/api/v1/auth` | – | 가입, 로그인, Google OAuth, 토큰 검증 |
//! | `/api/v1/me` | [`AuthMiddleware`] | 프로필 조회/수정/탈퇴 |
//!
//! 핸들러가 쓰는 서비스는 [`ServiceRegistry::configure`](crate::core::registry::ServiceRegistry::configure)로
//! 먼저 등록되어 있어야 합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::App;
//!
//! App::new()
//!     .configure(|cfg| registry.configure(cfg))
//!     .configure(configure_all_routes);
//! ```

use crate::core::registry::ServiceMetadata;
use crate::domain::dto::users::response::MetadataResponse;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::{get, web, HttpResponse};
use serde_json::json;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(metadata);

    configure_auth_routes(cfg);
    configure_user_routes(cfg);
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            // 로컬 인증
            .service(handlers::auth::register)
            .service(handlers::auth::local_login)
            .service(handlers::auth::verify_token)
            // Google OAuth
            .service(handlers::auth::google_login)
            .service(handlers::auth::google_oauth_callback)
    );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/me")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::get_me)
            .service(handlers::users::update_me)
            .service(handlers::users::delete_me)
    );
}

#[get("/health")]
async fn health_check(meta: web::Data<ServiceMetadata>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": meta.name,
        "version": meta.version,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[get("/metadata")]
async fn metadata(meta: web::Data<ServiceMetadata>) -> HttpResponse {
    HttpResponse::Ok().json(MetadataResponse {
        service: meta.name.clone(),
        version: meta.version.clone(),
        environment: meta.environment.as_str().to_string(),
        server_time: chrono::Utc::now(),
    })
}
