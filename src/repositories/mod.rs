//! # 데이터 액세스 계층
//!
//! 사용자 레코드 저장소 계약([`users::UserStore`])과 구현체를 제공합니다.
//! 서비스 계층은 트레이트에만 의존하므로 MongoDB와 메모리 저장소를 설정으로 바꿔 끼울 수 있습니다.

pub mod users;
