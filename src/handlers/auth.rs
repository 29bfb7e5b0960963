//! Authentication HTTP Handlers
//!
//! 사용자 인증과 관련된 HTTP 엔드포인트를 처리하는 핸들러 함수들입니다.
//!
//! # Auth Providers
//!
//! - **로컬 인증**: 이메일/패스워드 (`POST /auth/register`, `POST /auth/login`)
//! - **OAuth 2.0**: Google (`GET /auth/google/login`, `GET /auth/google/callback`)
//! - **토큰 검증**: (`POST /auth/verify`)
//!
//! 로컬/Google 로그인은 같은 [`LoginResponse`] 구조로 응답합니다.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse, ResponseError};
use validator::Validate;
use crate::config::OAuthConfig;
use crate::core::errors::AppError;
use crate::domain::dto::users::request::{LocalLoginRequest, OAuthCallbackQuery, RegisterRequest};
use crate::domain::dto::users::response::{CreateUserResponse, LoginResponse, TokenVerificationResponse};
use crate::domain::models::token::Role;
use crate::services::auth::{CallbackParams, FederatedIdentityExchanger, TokenManager};
use crate::services::users::IdentityReconciler;
use crate::utils::string_utils::mask_email;

/// state 쿠키 경로. 콜백에서만 브라우저가 쿠키를 보냅니다.
const STATE_COOKIE_PATH: &str = "/api/v1/auth/google";

#[post("/register")]
pub async fn register(
    payload: web::Json<RegisterRequest>,
    reconciler: web::Data<IdentityReconciler>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = reconciler
        .register_local(&payload.email, &payload.password, &payload.name)
        .await?;

    Ok(HttpResponse::Created().json(CreateUserResponse {
        user: user.into(),
        message: "사용자가 성공적으로 생성되었습니다".to_string(),
    }))
}

#[post("/login")]
pub async fn local_login(
    payload: web::Json<LocalLoginRequest>,
    reconciler: web::Data<IdentityReconciler>,
    tokens: web::Data<TokenManager>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = reconciler
        .resolve_local(&payload.email, &payload.password)
        .await?;

    let issued = tokens.issue_session(&user.id, Role::User)?;

    log::info!("로컬 로그인 - 사용자: {}, ID: {}", mask_email(&user.email), user.id);
    Ok(HttpResponse::Ok().json(LoginResponse::new(issued, user)))
}

/// Google 인가 페이지로 리다이렉트하고 state를 HttpOnly 쿠키로 내려보냅니다.
#[get("/google/login")]
pub async fn google_login(
    exchanger: web::Data<FederatedIdentityExchanger>,
    oauth: web::Data<OAuthConfig>,
) -> Result<HttpResponse, AppError> {
    let redirect = exchanger.initiate()?;

    let cookie = Cookie::build(oauth.state_cookie_name.clone(), redirect.state)
        .path(STATE_COOKIE_PATH)
        .http_only(true)
        .secure(oauth.state_cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(oauth.state_ttl.num_seconds()))
        .finish();

    Ok(HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, redirect.url))
        .cookie(cookie)
        .finish())
}

/// Google 콜백
///
/// 성공/실패와 무관하게 state 쿠키는 한 번 비교한 뒤 삭제합니다.
#[get("/google/callback")]
pub async fn google_oauth_callback(
    req: HttpRequest,
    query: web::Query<OAuthCallbackQuery>,
    exchanger: web::Data<FederatedIdentityExchanger>,
    reconciler: web::Data<IdentityReconciler>,
    tokens: web::Data<TokenManager>,
    oauth: web::Data<OAuthConfig>,
) -> HttpResponse {
    let stored_state = req.cookie(&oauth.state_cookie_name);

    let outcome = complete_google_login(
        &query,
        stored_state.as_ref().map(|c| c.value()),
        &exchanger,
        &reconciler,
        &tokens,
    )
    .await;

    let mut response = match outcome {
        Ok(login) => HttpResponse::Ok().json(login),
        Err(e) => e.error_response(),
    };

    let removal = Cookie::build(oauth.state_cookie_name.clone(), "")
        .path(STATE_COOKIE_PATH)
        .finish();
    if let Err(e) = response.add_removal_cookie(&removal) {
        log::error!("state 쿠키 삭제 헤더 생성 실패: {}", e);
    }

    response
}

async fn complete_google_login(
    query: &OAuthCallbackQuery,
    stored_state: Option<&str>,
    exchanger: &FederatedIdentityExchanger,
    reconciler: &IdentityReconciler,
    tokens: &TokenManager,
) -> Result<LoginResponse, AppError> {
    // 사용자가 거부했거나 프로바이더 에러
    if let Some(error) = &query.error {
        let error_msg = query.error_description
            .as_deref()
            .unwrap_or("OAuth 인증이 취소되었거나 실패했습니다");
        log::warn!("Google OAuth 에러: {} - {}", error, error_msg);
        return Err(AppError::AuthenticationError(error_msg.to_string()));
    }

    let params = CallbackParams {
        stored_state,
        received_state: query.state.as_deref(),
        code: query.code.as_deref(),
    };

    let profile = exchanger.handle_callback(params, None).await?;
    let user = reconciler.resolve_or_create_federated(&profile).await?;
    let issued = tokens.issue_session(&user.id, Role::User)?;

    log::info!("Google OAuth 로그인 성공: {}", mask_email(&user.email));
    Ok(LoginResponse::new(issued, user))
}

#[post("/verify")]
pub async fn verify_token(
    req: HttpRequest,
    tokens: web::Data<TokenManager>,
) -> Result<HttpResponse, AppError> {
    let token = req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(TokenManager::extract_bearer_token)
        .ok_or_else(|| AppError::AuthenticationError("Authorization 헤더가 없습니다".to_string()))?;

    let identity = tokens.verify(token)?;

    Ok(HttpResponse::Ok().json(TokenVerificationResponse {
        valid: true,
        user_id: identity.subject,
        role: identity.role.to_string(),
    }))
}
