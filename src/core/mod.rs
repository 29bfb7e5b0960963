//! # Core Framework Module
//!
//! - [`registry`] - 기동 시 서비스 조립과 `web::Data` 주입
//! - [`errors`] - HTTP 경계 에러 타입 [`AppError`](errors::AppError)

pub mod errors;
pub mod registry;
