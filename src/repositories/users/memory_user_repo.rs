//! 메모리 사용자 저장소
//!
//! 로컬 개발(`STORE_BACKEND=memory`)과 테스트용 구현입니다.
//! 조회-검사-삽입을 하나의 락 안에서 수행해 유일성을 원자적으로 보장합니다.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use async_trait::async_trait;
use crate::domain::entities::users::User;
use crate::errors::StoreError;
use super::{ProfileChanges, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, User>>, StoreError> {
        self.users
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// 전체 레코드 수 (삭제된 사용자 포함)
    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `candidate`가 다른 레코드의 유니크 필드와 겹치는지 검사
fn check_unique(users: &HashMap<String, User>, candidate: &User) -> Result<(), StoreError> {
    for existing in users.values().filter(|u| u.id != candidate.id) {
        if existing.email == candidate.email {
            return Err(StoreError::Conflict { field: "email" });
        }
        if candidate.federated_id.is_some() && existing.federated_id == candidate.federated_id {
            return Err(StoreError::Conflict { field: "federated_id" });
        }
    }
    Ok(())
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?
            .values()
            .find(|u| u.email == email && !u.is_deleted())
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn find_by_federated_id(&self, federated_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?
            .values()
            .find(|u| u.federated_id.as_deref() == Some(federated_id) && !u.is_deleted())
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.values().any(|u| u.email == email))
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.lock()?;

        if users.contains_key(&user.id) {
            return Err(StoreError::Conflict { field: "id" });
        }
        check_unique(&users, &user)?;

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: &str, changes: ProfileChanges) -> Result<Option<User>, StoreError> {
        let mut users = self.lock()?;

        let Some(user) = users.get_mut(id).filter(|u| !u.is_deleted()) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = Some(password_hash);
        }
        user.touch();

        Ok(Some(user.clone()))
    }

    async fn link_federated_id(&self, id: &str, federated_id: &str) -> Result<Option<User>, StoreError> {
        let mut users = self.lock()?;

        if users
            .values()
            .any(|u| u.id != id && u.federated_id.as_deref() == Some(federated_id))
        {
            return Err(StoreError::Conflict { field: "federated_id" });
        }

        let Some(user) = users
            .get_mut(id)
            .filter(|u| !u.is_deleted() && u.federated_id.is_none())
        else {
            return Ok(None);
        };

        user.link_federated_identity(federated_id.to_string());
        Ok(Some(user.clone()))
    }

    async fn soft_delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut users = self.lock()?;

        match users.get_mut(id) {
            Some(user) if !user.is_deleted() => {
                user.mark_deleted();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use super::*;

    fn local(email: &str) -> User {
        User::new_local(email.into(), "A".into(), "$2b$04$hash".into())
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryUserStore::new();
        let user = store.create(local("a@x.com")).await.unwrap();

        assert_eq!(store.find_by_email("a@x.com").await.unwrap(), Some(user.clone()));
        assert_eq!(store.find_by_id(&user.id).await.unwrap(), Some(user));
        assert!(store.find_by_email("A@x.com").await.unwrap().is_none());
        assert!(store.find_by_email("missing@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(local("a@x.com")).await.unwrap();

        let err = store.create(local("a@x.com")).await.unwrap_err();
        assert_eq!(err, StoreError::Conflict { field: "email" });
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_federated_id_conflicts() {
        let store = MemoryUserStore::new();
        store.create(User::new_federated("a@x.com".into(), "A".into(), "g-1".into())).await.unwrap();

        let err = store
            .create(User::new_federated("b@x.com".into(), "B".into(), "g-1".into()))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Conflict { field: "federated_id" });
    }

    #[tokio::test]
    async fn test_concurrent_registration_single_winner() {
        let store = Arc::new(MemoryUserStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(local("race@x.com")).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_soft_delete_semantics() {
        let store = MemoryUserStore::new();
        let user = store.create(local("a@x.com")).await.unwrap();

        assert!(store.soft_delete(&user.id).await.unwrap());
        assert!(!store.soft_delete(&user.id).await.unwrap());

        // 이메일 조회에서는 사라지지만 ID로는 감사 조회 가능
        assert!(store.find_by_email("a@x.com").await.unwrap().is_none());
        let retired = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(retired.is_deleted());

        // 이메일은 계속 점유 상태
        assert!(store.exists_by_email("a@x.com").await.unwrap());
        assert!(store.create(local("a@x.com")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_profile_changes_only_given_fields() {
        let store = MemoryUserStore::new();
        let user = store.create(local("a@x.com")).await.unwrap();

        let changes = ProfileChanges { name: Some("Renamed".into()), password_hash: None };
        let updated = store.update_profile(&user.id, changes).await.unwrap().unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.password_hash, user.password_hash);
        assert!(store.update_profile("missing", ProfileChanges::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_writes_after_soft_delete_do_not_reactivate() {
        let store = MemoryUserStore::new();
        let user = store.create(local("a@x.com")).await.unwrap();
        let stale = store.find_by_id(&user.id).await.unwrap().unwrap();

        assert!(store.soft_delete(&user.id).await.unwrap());

        let changes = ProfileChanges {
            name: Some(stale.name.clone()),
            password_hash: stale.password_hash.clone(),
        };
        assert!(store.update_profile(&stale.id, changes).await.unwrap().is_none());
        assert!(store.link_federated_id(&stale.id, "g-1").await.unwrap().is_none());

        assert!(store.find_by_email("a@x.com").await.unwrap().is_none());
        assert!(store.find_by_id(&user.id).await.unwrap().unwrap().is_deleted());
    }

    #[tokio::test]
    async fn test_link_keeps_concurrent_password_change() {
        let store = MemoryUserStore::new();
        let user = store.create(local("a@x.com")).await.unwrap();

        let changes = ProfileChanges { name: None, password_hash: Some("$2b$04$newhash".into()) };
        store.update_profile(&user.id, changes).await.unwrap();

        let linked = store.link_federated_id(&user.id, "g-1").await.unwrap().unwrap();
        assert_eq!(linked.federated_id.as_deref(), Some("g-1"));
        assert!(linked.email_verified);
        assert_eq!(linked.password_hash.as_deref(), Some("$2b$04$newhash"));
    }

    #[tokio::test]
    async fn test_link_refuses_already_linked_and_taken_ids() {
        let store = MemoryUserStore::new();
        let first = store.create(local("a@x.com")).await.unwrap();
        let second = store.create(local("b@x.com")).await.unwrap();

        store.link_federated_id(&first.id, "g-1").await.unwrap().unwrap();

        assert!(store.link_federated_id(&first.id, "g-2").await.unwrap().is_none());
        assert_eq!(
            store.link_federated_id(&second.id, "g-1").await.unwrap_err(),
            StoreError::Conflict { field: "federated_id" }
        );
    }
}
