//! # 사용자 관련 요청 DTO 모듈
//!
//! 클라이언트로부터 받은 JSON/쿼리 데이터를 구조화된 타입으로 변환하고
//! `validator`로 입력 규칙을 검증합니다.
//!
//! ```rust,ignore
//! #[actix_web::post("/register")]
//! async fn register(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
//!     payload.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;
//!     // ...
//! }
//! ```

pub mod auth_request;

pub use auth_request::*;
