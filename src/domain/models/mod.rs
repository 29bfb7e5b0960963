//! # Domain Models Module
//!
//! 영속되지 않는 도메인 모델과 값 객체를 정의합니다.
//!
//! - [`token`] - 서명 토큰 클레임과 검증 결과
//! - [`oauth`] - 프로바이더 프로필
//! - [`auth`] - 요청 단위 인증 컨텍스트

pub mod auth;
pub mod oauth;
pub mod token;
