//! HTTP 핸들러
//!
//! - [`auth`] - 가입, 로그인, Google OAuth, 토큰 검증
//! - [`users`] - 인증된 사용자의 프로필 관리

pub mod users;
pub mod auth;
