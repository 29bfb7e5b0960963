//! 공통 유틸리티 함수 모듈
//!
//! - [`string_utils`] - 문자열 정리, 이메일 마스킹, 상수 시간 비교
//! - [`display_terminal`] - 기동 배너 출력
//!
//! ```rust,ignore
//! use crate::utils::string_utils::mask_email;
//!
//! log::warn!("로그인 실패: {}", mask_email(&email));
//! ```

pub mod string_utils;
pub mod display_terminal;
