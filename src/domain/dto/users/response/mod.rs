//! # 사용자 관련 응답 DTO 모듈
//!
//! 비즈니스 로직 처리 결과를 클라이언트에게 일관된 JSON 형태로 전달합니다.
//! 민감한 정보(비밀번호 해시, 프로바이더 측 ID)는 응답에서 제외합니다.
//!
//! - [`UserResponse`] - 표준 사용자 정보 응답
//! - [`CreateUserResponse`] - 회원가입 결과
//! - [`LoginResponse`] - 토큰 발급 결과
//! - [`TokenVerificationResponse`] - 토큰 검증 결과

pub mod user_response;

pub use user_response::*;
