//! # Domain Layer Module
//!
//! 도메인 계층을 구성하는 핵심 모듈로, 엔티티와 전송 객체, 외부 연동 모델을 담습니다.
//!
//! ## 아키텍처 개요
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - 영속 레코드 (User)
//! ├── dto       - HTTP 요청/응답 계약
//! └── models    - 토큰 클레임, 프로바이더 프로필, 인증 컨텍스트
//!      │
//!      ▼
//! Application Layer (services)
//!      │
//!      ▼
//! Infrastructure Layer (repositories, db)
//! ```

pub mod entities;
pub mod dto;
pub mod models;
