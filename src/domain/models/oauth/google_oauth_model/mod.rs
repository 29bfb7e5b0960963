//! Google OAuth 연동 모델
//!
//! - [`google_user`] - UserInfo 원본 응답과 정규화
//! - [`oauth_provider`] - 프로바이더 중립 프로필, 토큰 엔드포인트 응답

pub mod google_user;
pub mod oauth_provider;

pub use google_user::GoogleUserInfo;
pub use oauth_provider::{ProviderProfile, ProviderTokenResponse};
