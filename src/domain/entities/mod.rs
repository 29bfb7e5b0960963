//! # Domain Entities Module
//!
//! 영속되는 도메인 엔티티를 정의합니다. 현재는 사용자 레코드 하나뿐입니다.

pub mod users;
