//! # OAuth Models
//!
//! 외부 ID 프로바이더와 주고받는 데이터 모델입니다.
//! 프로바이더별 원본 응답은 하위 모듈에 두고, 코어는 정규화된
//! [`ProviderProfile`](google_oauth_model::ProviderProfile)만 다룹니다.

pub mod google_oauth_model;

pub use google_oauth_model::*;
