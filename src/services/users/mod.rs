//! 사용자 관리 서비스 모듈
//!
//! - [`identity_reconciler`] - 로그인/가입 자격 증명을 하나의 사용자 레코드로 조정
//! - [`user_service`] - 프로필 조회/수정, 계정 탈퇴
//!
//! # Security
//!
//! - 로그인 실패 사유(이메일 없음/비밀번호 불일치)를 구분하지 않음
//! - 없는 이메일에도 더미 해시 검증으로 응답 시간 균등화
//! - 프로바이더 계정 병합은 검증된 이메일에 한해 수행
//!
//! # Examples
//!
//! ```rust,ignore
//! use identity_service_backend::services::users::IdentityReconciler;
//!
//! let user = reconciler.register_local("a@x.com", "secret123", "A").await?;
//! let same = reconciler.resolve_local("a@x.com", "secret123").await?;
//! ```

pub mod identity_reconciler;
pub mod user_service;

pub use identity_reconciler::IdentityReconciler;
pub use user_service::UserService;
