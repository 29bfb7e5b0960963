//! 사용자 신원 서비스 백엔드
//!
//! 로컬 자격 증명(이메일/비밀번호), 상태 없는 서명 토큰, Google OAuth 2.0
//! 로그인을 하나의 사용자 레코드로 통합하는 인증 서비스입니다.
//!
//! # Features
//!
//! - **자격 증명 해싱**: bcrypt, 존재하지 않는 계정도 같은 비용으로 검증
//! - **서명 토큰**: HS256, 서버 측 세션 저장 없음
//! - **CSRF state**: OAuth 리다이렉트마다 일회용 난수 state
//! - **계정 통합**: 같은 이메일의 로컬/Google 계정을 하나로 연결
//! - **저장소**: MongoDB 또는 메모리 (테스트/로컬 개발)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← Hasher, TokenManager, Exchanger, Reconciler
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   UserStore     │ ← MongoDB / Memory
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use identity_service_backend::config::AppConfig;
//! use identity_service_backend::core::registry::ServiceRegistry;
//! use identity_service_backend::repositories::users::MemoryUserStore;
//!
//! let config = AppConfig::from_env()?;
//! let registry = ServiceRegistry::build(&config, Arc::new(MemoryUserStore::new()))?;
//!
//! let user = registry.reconciler.resolve_local("a@x.com", "secret123").await?;
//! let token = registry.token_manager.issue_session(&user.id, Role::User)?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
