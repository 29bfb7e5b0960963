//! HTTP 미들웨어
//!
//! - [`AuthMiddleware`] - Bearer 토큰 검증 게이트

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
