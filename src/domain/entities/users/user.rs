//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 로컬 인증과 외부 프로바이더(Google) 인증을 하나의 레코드로 표현합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::config::AuthProvider;

/// 사용자 엔티티
///
/// 시스템의 모든 사용자를 표현하는 정규(canonical) 레코드입니다.
///
/// 불변 조건:
/// - `email`은 프로바이더와 무관하게 전체에서 유일
/// - `auth_provider == Federated`이면 `email_verified == true`
/// - `auth_provider == Local`이면 `password_hash`가 비어 있지 않음
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// UUID v4 문자열, 생성 후 불변
    #[serde(rename = "_id")]
    pub id: String,
    /// 표시 이름
    pub name: String,
    /// 사용자 이메일 (unique, 저장된 대소문자 그대로 비교)
    pub email: String,
    /// bcrypt 다이제스트 (프로바이더 전용 계정은 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// 인증 프로바이더
    pub auth_provider: AuthProvider,
    /// 프로바이더 측 사용자 ID (unique when present)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub federated_id: Option<String>,
    /// 이메일 인증 여부
    pub email_verified: bool,
    /// 생성 시간
    pub created_at: DateTime<Utc>,
    /// 수정 시간
    pub updated_at: DateTime<Utc>,
    /// 논리 삭제 시간 (감사 목적으로 레코드는 남음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// 새 로컬 사용자 생성 (이메일/패스워드)
    pub fn new_local(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash: Some(password_hash),
            auth_provider: AuthProvider::Local,
            federated_id: None,
            email_verified: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// 새 프로바이더 사용자 생성
    ///
    /// 프로바이더가 이메일을 확인했으므로 인증된 상태로 시작합니다.
    pub fn new_federated(email: String, name: String, federated_id: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            password_hash: None,
            auth_provider: AuthProvider::Federated,
            federated_id: Some(federated_id),
            email_verified: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// 기존 계정에 프로바이더 ID를 연결합니다.
    ///
    /// `auth_provider`는 바꾸지 않습니다. 로컬 계정은 연동 후에도 비밀번호로 로그인할 수 있습니다.
    pub fn link_federated_identity(&mut self, federated_id: String) {
        self.federated_id = Some(federated_id);
        self.email_verified = true;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn mark_deleted(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// 비밀번호 인증이 가능한 사용자인지 확인
    pub fn can_authenticate_with_password(&self) -> bool {
        !self.is_deleted() && self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    pub fn is_federated(&self) -> bool {
        matches!(self.auth_provider, AuthProvider::Federated)
    }
}
