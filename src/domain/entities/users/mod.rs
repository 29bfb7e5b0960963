//! Users Entity Module
//!
//! 사용자 도메인의 정규 레코드([`User`](user::User))를 정의합니다.
//! 로컬 계정과 프로바이더 계정은 같은 레코드 타입을 공유하며,
//! 같은 이메일로 두 방식을 모두 쓰는 사용자는 하나의 레코드로 연동됩니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::entities::users::user::User;
//!
//! // 로컬 사용자 생성
//! let user = User::new_local(
//!     "user@example.com".to_string(),
//!     "Display Name".to_string(),
//!     hashed_password,
//! );
//!
//! // 프로바이더 사용자 생성
//! let federated = User::new_federated(
//!     "user@gmail.com".to_string(),
//!     "Federated User".to_string(),
//!     "google_user_id_123".to_string(),
//! );
//! ```

pub mod user;

pub use user::User;
