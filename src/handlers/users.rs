//! # 내 계정 HTTP Handlers
//!
//! 인증 미들웨어 뒤에서 토큰 주체의 프로필을 다룹니다.
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `GET` | `/api/v1/me` | 프로필 조회 | 200 OK |
//! | `PUT` | `/api/v1/me` | 이름/비밀번호 수정 | 200 OK |
//! | `DELETE` | `/api/v1/me` | 계정 탈퇴(논리 삭제) | 204 No Content |

use actix_web::{delete, get, put, web, HttpResponse};
use validator::Validate;
use crate::core::errors::AppError;
use crate::domain::dto::users::request::UpdateProfileRequest;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::users::UserService;

#[get("")]
pub async fn get_me(
    user: AuthenticatedUser,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let profile = users.get_profile(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("")]
pub async fn update_me(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let profile = users.update_profile(&user.user_id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[delete("")]
pub async fn delete_me(
    user: AuthenticatedUser,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    users.delete_account(&user.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
