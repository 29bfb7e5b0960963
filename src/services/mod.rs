//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 모든 서비스는 기동 시 설정값과 저장소를 받아 명시적으로 생성되고
//! [`ServiceRegistry`](crate::core::registry::ServiceRegistry)를 통해 핸들러에 주입됩니다.
//!
//! # Features
//!
//! - 비밀번호 해싱과 무상태 토큰 발급/검증
//! - OAuth 2.0 소셜 로그인 (Google)
//! - 로컬/프로바이더 계정 조정과 프로필 관리

pub mod users;
pub mod auth;
