//! # User Data Transfer Objects Module
//!
//! 사용자 관련 API의 요청/응답 데이터 구조를 정의하는 모듈입니다.
//!
//! | 요청 | 응답 | 엔드포인트 |
//! |------|------|-----------|
//! | `RegisterRequest` | `CreateUserResponse` | `POST /api/v1/auth/register` |
//! | `LocalLoginRequest` | `LoginResponse` | `POST /api/v1/auth/login` |
//! | `OAuthCallbackQuery` | `LoginResponse` | `GET /api/v1/auth/google/callback` |
//! | `UpdateProfileRequest` | `UserResponse` | `PUT /api/v1/me` |

pub mod request;
pub mod response;
