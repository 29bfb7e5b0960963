//! 사용자 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! [`UserStore`]는 사용자 레코드 저장소의 계약입니다. 부재는 에러가 아니라 `Ok(None)`이며,
//! 유일성(`email`, `federated_id`)은 저장소가 원자적으로 보장해야 합니다.
//! 동시에 같은 이메일로 가입해도 하나만 성공하고 나머지는 [`StoreError::Conflict`]를 받습니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use identity_service_backend::repositories::users::{MemoryUserStore, UserStore};
//!
//! let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
//! let user = store.find_by_email("user@example.com").await?;
//! ```

pub mod user_repo;
pub mod memory_user_repo;

pub use user_repo::MongoUserStore;
pub use memory_user_repo::MemoryUserStore;

use async_trait::async_trait;
use crate::domain::entities::users::User;
use crate::errors::StoreError;

/// 프로필 수정 시 바꿀 필드 (None이면 유지)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password_hash.is_none()
    }
}

/// 사용자 저장소 계약
///
/// - `find_by_email`, `find_by_federated_id`: 논리 삭제된 사용자는 제외
/// - `find_by_id`: 감사 목적으로 삭제된 사용자도 반환
/// - `exists_by_email`: 삭제된 사용자의 이메일도 점유된 것으로 간주
/// - 쓰기 연산은 레코드 전체를 덮어쓰지 않고 지정한 필드만 바꾸며,
///   논리 삭제된 사용자는 대상에서 제외합니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 인덱스 생성 등 기동 시 준비 작업
    async fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_federated_id(&self, federated_id: &str) -> Result<Option<User>, StoreError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;

    /// 새 사용자 저장. 중복이면 `Conflict`
    async fn create(&self, user: User) -> Result<User, StoreError>;

    /// 이름/비밀번호 해시만 변경. 없거나 삭제된 ID면 `Ok(None)`
    async fn update_profile(&self, id: &str, changes: ProfileChanges) -> Result<Option<User>, StoreError>;

    /// 아직 프로바이더 ID가 없는 활성 사용자에 연결하고 이메일을 인증 처리합니다.
    ///
    /// 대상이 없거나, 삭제됐거나, 이미 연결돼 있으면 `Ok(None)`.
    /// 다른 사용자가 같은 `federated_id`를 가지고 있으면 `Conflict`.
    async fn link_federated_id(&self, id: &str, federated_id: &str) -> Result<Option<User>, StoreError>;

    /// 논리 삭제. 대상이 없거나 이미 삭제됐으면 `false`
    async fn soft_delete(&self, id: &str) -> Result<bool, StoreError>;
}
