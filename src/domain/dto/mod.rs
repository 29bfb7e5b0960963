//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 데이터를 전송하기 위한 객체들을 정의하는 모듈입니다.
//!
//! | 역할 | 도구 |
//! |------|------|
//! | HTTP 요청 본문 매핑 | `request` 모듈, `serde::Deserialize` |
//! | HTTP 응답 본문 매핑 | `response` 모듈, `serde::Serialize` |
//! | 입력값 유효성 검증 | `validator` crate |
//!
//! 엔티티를 그대로 노출하지 않고 항상 DTO를 거쳐 응답합니다.

pub mod users;
