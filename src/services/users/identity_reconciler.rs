//! 신원 조정(Identity Reconciliation)
//!
//! 새로 확인된 자격 증명을 정확히 하나의 사용자 레코드에 대응시킵니다.
//!
//! ## 프로바이더 로그인 병합 정책
//!
//! 1. `federated_id`가 일치하는 사용자가 있으면 그 사용자
//! 2. 같은 이메일의 사용자가 있으면 그 레코드에 프로바이더 ID를 연결 (중복 생성 없음)
//! 3. 없으면 `federated` 사용자 생성
//!
//! 2번은 프로바이더 계정의 이메일을 장악한 공격자가 로컬 계정을 가져갈 수 있는
//! 보안 트레이드오프입니다. `require_verified_email`이 켜져 있으면 프로바이더가
//! 이메일 소유를 확인한 경우에만 연결/생성하며, 모든 연결은 `warn`으로 기록됩니다.

use std::sync::Arc;
use log::{info, warn};
use crate::domain::entities::users::User;
use crate::domain::models::oauth::ProviderProfile;
use crate::errors::{AuthError, StoreError};
use crate::repositories::users::UserStore;
use crate::services::auth::PasswordHasher;
use crate::utils::string_utils::mask_email;

pub struct IdentityReconciler {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    require_verified_email: bool,
}

impl IdentityReconciler {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, require_verified_email: bool) -> Self {
        Self { store, hasher, require_verified_email }
    }

    /// 이메일/비밀번호 로그인
    ///
    /// 이메일이 없을 때와 비밀번호가 틀렸을 때 같은 에러를 돌려주며,
    /// 없는 이메일에도 더미 해시 검증을 수행해 응답 시간을 맞춥니다.
    pub async fn resolve_local(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self.store.find_by_email(email).await?;

        match user {
            Some(user) if user.can_authenticate_with_password() => {
                let digest = user.password_hash.as_deref().unwrap_or_default();
                if self.hasher.verify(password, digest).await {
                    info!("로컬 로그인 성공: {}", user.id);
                    return Ok(user);
                }
            }
            _ => self.hasher.verify_dummy(password).await,
        }

        warn!("로컬 로그인 실패: {}", mask_email(email));
        Err(AuthError::InvalidCredentials)
    }

    /// 로컬 회원가입
    ///
    /// 사전 중복 확인은 빠른 실패용이고, 동시 가입 경쟁은 저장소의 유니크 제약이 최종 판정합니다.
    pub async fn register_local(&self, email: &str, password: &str, name: &str) -> Result<User, AuthError> {
        if self.store.exists_by_email(email).await? {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let password_hash = self.hasher.hash(password).await?;
        let user = User::new_local(email.to_string(), name.to_string(), password_hash);

        let created = self.store.create(user).await?;
        info!("로컬 사용자 등록: {} ({})", created.id, mask_email(&created.email));
        Ok(created)
    }

    /// 프로바이더 프로필을 사용자 레코드로 조정
    pub async fn resolve_or_create_federated(&self, profile: &ProviderProfile) -> Result<User, AuthError> {
        if let Some(user) = self.store.find_by_federated_id(&profile.provider_id).await? {
            return Ok(user);
        }

        if self.require_verified_email && !profile.email_verified {
            warn!("프로바이더가 확인하지 않은 이메일로 로그인 시도: {}", mask_email(&profile.email));
            return Err(AuthError::UnverifiedProviderEmail);
        }

        if let Some(existing) = self.store.find_by_email(&profile.email).await? {
            return self.link(existing, profile).await;
        }

        // 논리 삭제된 계정이 이메일을 점유하고 있음
        if self.store.exists_by_email(&profile.email).await? {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let user = User::new_federated(
            profile.email.clone(),
            profile.name.clone(),
            profile.provider_id.clone(),
        );

        match self.store.create(user).await {
            Ok(created) => {
                info!("프로바이더 사용자 생성: {} ({})", created.id, mask_email(&created.email));
                Ok(created)
            }
            Err(StoreError::Conflict { field }) => self.recover_from_conflict(profile, field).await,
            Err(e) => Err(e.into()),
        }
    }

    async fn link(&self, existing: User, profile: &ProviderProfile) -> Result<User, AuthError> {
        if existing.federated_id.is_some() {
            warn!(
                "이미 다른 프로바이더 ID가 연결된 계정입니다: {} ({})",
                existing.id,
                mask_email(&existing.email)
            );
            return Err(AuthError::EmailAlreadyRegistered);
        }

        match self.store.link_federated_id(&existing.id, &profile.provider_id).await {
            Ok(Some(linked)) => {
                warn!(
                    "🔗 기존 계정에 프로바이더 ID 연결: user={} email={} provider_email_verified={}",
                    linked.id,
                    mask_email(&linked.email),
                    profile.email_verified
                );
                Ok(linked)
            }
            // 조회 이후 삭제됐거나 다른 요청이 먼저 연결함
            Ok(None) => match self.store.find_by_federated_id(&profile.provider_id).await? {
                Some(user) => Ok(user),
                None => {
                    warn!("연결 대상 계정의 상태가 바뀌었습니다: {}", existing.id);
                    Err(AuthError::EmailAlreadyRegistered)
                }
            },
            Err(StoreError::Conflict { field }) => self.recover_from_conflict(profile, field).await,
            Err(e) => Err(e.into()),
        }
    }

    /// 같은 프로필의 동시 요청이 먼저 레코드를 만든 경우 그 레코드를 돌려줍니다.
    async fn recover_from_conflict(&self, profile: &ProviderProfile, field: &'static str) -> Result<User, AuthError> {
        match self.store.find_by_federated_id(&profile.provider_id).await? {
            Some(user) => Ok(user),
            None => Err(StoreError::Conflict { field }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthProvider;
    use crate::repositories::users::{MemoryUserStore, ProfileChanges};

    fn reconciler_with(store: Arc<MemoryUserStore>, require_verified_email: bool) -> IdentityReconciler {
        IdentityReconciler::new(store, PasswordHasher::new(4).unwrap(), require_verified_email)
    }

    fn setup() -> (IdentityReconciler, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        (reconciler_with(store.clone(), true), store)
    }

    fn profile(id: &str, email: &str, verified: bool) -> ProviderProfile {
        ProviderProfile {
            provider_id: id.into(),
            email: email.into(),
            name: "Provider Name".into(),
            email_verified: verified,
        }
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let (reconciler, store) = setup();

        let user = reconciler.register_local("a@x.com", "secret123", "A").await.unwrap();
        assert!(!user.id.is_empty());
        assert_eq!(user.auth_provider, AuthProvider::Local);
        assert_ne!(user.password_hash.as_deref(), Some("secret123"));

        let again = reconciler.register_local("a@x.com", "other-pass", "B").await;
        assert_eq!(again.unwrap_err(), AuthError::EmailAlreadyRegistered);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_single_winner() {
        let (reconciler, store) = setup();
        let reconciler = Arc::new(reconciler);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reconciler = reconciler.clone();
                tokio::spawn(async move { reconciler.register_local("race@x.com", "secret123", "R").await })
            })
            .collect();

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }

        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == AuthError::EmailAlreadyRegistered));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_local_success() {
        let (reconciler, _) = setup();
        let registered = reconciler.register_local("a@x.com", "secret123", "A").await.unwrap();

        let user = reconciler.resolve_local("a@x.com", "secret123").await.unwrap();
        assert_eq!(user.id, registered.id);
    }

    #[tokio::test]
    async fn test_resolve_local_failures_are_indistinguishable() {
        let (reconciler, _) = setup();
        reconciler.register_local("a@x.com", "secret123", "A").await.unwrap();

        let wrong_password = reconciler.resolve_local("a@x.com", "wrong").await.unwrap_err();
        let unknown_email = reconciler.resolve_local("missing@x.com", "anything").await.unwrap_err();

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_resolve_local_rejects_federated_only_account() {
        let (reconciler, _) = setup();
        reconciler
            .resolve_or_create_federated(&profile("g-1", "b@x.com", true))
            .await
            .unwrap();

        let err = reconciler.resolve_local("b@x.com", "anything").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_resolve_local_rejects_deleted_account() {
        let (reconciler, store) = setup();
        let user = reconciler.register_local("a@x.com", "secret123", "A").await.unwrap();
        store.soft_delete(&user.id).await.unwrap();

        let err = reconciler.resolve_local("a@x.com", "secret123").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_federated_creation_is_idempotent() {
        let (reconciler, store) = setup();
        let p = profile("g-1", "new@x.com", true);

        let first = reconciler.resolve_or_create_federated(&p).await.unwrap();
        let second = reconciler.resolve_or_create_federated(&p).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.auth_provider, AuthProvider::Federated);
        assert!(first.email_verified);
        assert!(first.password_hash.is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_federated_logins_converge() {
        let (reconciler, store) = setup();
        let reconciler = Arc::new(reconciler);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reconciler = reconciler.clone();
                tokio::spawn(async move {
                    reconciler
                        .resolve_or_create_federated(&profile("g-9", "same@x.com", true))
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_federated_login_links_existing_local_account() {
        let (reconciler, store) = setup();
        let local = reconciler.register_local("a@x.com", "secret123", "A").await.unwrap();
        assert!(!local.email_verified);

        let linked = reconciler
            .resolve_or_create_federated(&profile("g-1", "a@x.com", true))
            .await
            .unwrap();

        assert_eq!(linked.id, local.id);
        assert_eq!(linked.federated_id.as_deref(), Some("g-1"));
        assert!(linked.email_verified);
        assert_eq!(linked.auth_provider, AuthProvider::Local);
        assert_eq!(store.len(), 1);

        // 연결 후에도 비밀번호 로그인 가능
        assert!(reconciler.resolve_local("a@x.com", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn test_unverified_provider_email_refused() {
        let (reconciler, store) = setup();
        reconciler.register_local("a@x.com", "secret123", "A").await.unwrap();

        let err = reconciler
            .resolve_or_create_federated(&profile("g-1", "a@x.com", false))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::UnverifiedProviderEmail);

        let err = reconciler
            .resolve_or_create_federated(&profile("g-2", "fresh@x.com", false))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::UnverifiedProviderEmail);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unverified_email_allowed_when_policy_disabled() {
        let store = Arc::new(MemoryUserStore::new());
        let reconciler = reconciler_with(store.clone(), false);
        reconciler.register_local("a@x.com", "secret123", "A").await.unwrap();

        let linked = reconciler
            .resolve_or_create_federated(&profile("g-1", "a@x.com", false))
            .await
            .unwrap();
        assert!(linked.email_verified);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_email_held_by_other_federated_identity() {
        let (reconciler, store) = setup();
        reconciler
            .resolve_or_create_federated(&profile("g-1", "a@x.com", true))
            .await
            .unwrap();

        let err = reconciler
            .resolve_or_create_federated(&profile("g-2", "a@x.com", true))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailAlreadyRegistered);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_account_email_stays_reserved() {
        let (reconciler, store) = setup();
        let user = reconciler.register_local("a@x.com", "secret123", "A").await.unwrap();
        store.soft_delete(&user.id).await.unwrap();

        let err = reconciler
            .resolve_or_create_federated(&profile("g-1", "a@x.com", true))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailAlreadyRegistered);

        let err = reconciler.register_local("a@x.com", "secret123", "A").await.unwrap_err();
        assert_eq!(err, AuthError::EmailAlreadyRegistered);
    }

    #[tokio::test]
    async fn test_link_of_stale_record_does_not_revive_deleted_account() {
        let (reconciler, store) = setup();
        let user = reconciler.register_local("a@x.com", "secret123", "A").await.unwrap();
        let stale = store.find_by_email("a@x.com").await.unwrap().unwrap();
        store.soft_delete(&user.id).await.unwrap();

        let err = reconciler.link(stale, &profile("g-1", "a@x.com", true)).await.unwrap_err();
        assert_eq!(err, AuthError::EmailAlreadyRegistered);

        assert!(store.find_by_id(&user.id).await.unwrap().unwrap().is_deleted());
        assert_eq!(
            reconciler.resolve_local("a@x.com", "secret123").await.unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn test_link_keeps_password_changed_after_lookup() {
        let (reconciler, store) = setup();
        reconciler.register_local("a@x.com", "secret123", "A").await.unwrap();
        let stale = store.find_by_email("a@x.com").await.unwrap().unwrap();

        let new_hash = PasswordHasher::new(4).unwrap().hash("changed-pass").await.unwrap();
        let changes = ProfileChanges { name: None, password_hash: Some(new_hash.clone()) };
        store.update_profile(&stale.id, changes).await.unwrap().unwrap();

        let linked = reconciler.link(stale, &profile("g-1", "a@x.com", true)).await.unwrap();
        assert_eq!(linked.federated_id.as_deref(), Some("g-1"));
        assert_eq!(linked.password_hash.as_deref(), Some(new_hash.as_str()));
        assert!(reconciler.resolve_local("a@x.com", "changed-pass").await.is_ok());
    }
}
