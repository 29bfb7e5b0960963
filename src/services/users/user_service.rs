//! # 사용자 프로필 서비스
//!
//! 인증된 사용자의 프로필 조회/수정과 계정 탈퇴(논리 삭제)를 담당합니다.
//!
//! ## 보안 특징
//!
//! - **비밀번호 재해싱**: 변경된 비밀번호는 [`PasswordHasher`]로 다시 해싱
//! - **로컬 계정 한정**: 프로바이더 전용 계정에는 비밀번호를 설정할 수 없음
//! - **논리 삭제**: 감사 목적으로 레코드를 남기고 로그인만 막음

use std::sync::Arc;
use log::info;
use crate::core::errors::AppError;
use crate::domain::dto::users::request::UpdateProfileRequest;
use crate::domain::dto::users::response::UserResponse;
use crate::domain::entities::users::User;
use crate::repositories::users::{ProfileChanges, UserStore};
use crate::services::auth::PasswordHasher;

pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    async fn find_active(&self, id: &str) -> Result<User, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .filter(|user| !user.is_deleted())
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))
    }

    pub async fn get_profile(&self, id: &str) -> Result<UserResponse, AppError> {
        Ok(self.find_active(id).await?.into())
    }

    /// 이름/비밀번호 수정. 둘 다 비어 있으면 변경 없이 현재 프로필을 돌려줍니다.
    ///
    /// 해싱이 끝난 뒤 바뀐 필드만 기록하므로, 그 사이 탈퇴한 계정은 되살아나지 않고 `NotFound`가 됩니다.
    pub async fn update_profile(&self, id: &str, request: UpdateProfileRequest) -> Result<UserResponse, AppError> {
        let user = self.find_active(id).await?;

        if request.name.is_none() && request.password.is_none() {
            return Ok(user.into());
        }

        let password_hash = match request.password {
            Some(_) if user.is_federated() => {
                return Err(AppError::ValidationError(
                    "프로바이더 계정은 비밀번호를 설정할 수 없습니다".to_string(),
                ));
            }
            Some(password) => Some(self.hasher.hash(&password).await?),
            None => None,
        };

        let changes = ProfileChanges { name: request.name, password_hash };
        let updated = self.store
            .update_profile(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        info!("프로필 수정: {}", updated.id);
        Ok(updated.into())
    }

    pub async fn delete_account(&self, id: &str) -> Result<(), AppError> {
        if !self.store.soft_delete(id).await? {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        info!("계정 탈퇴(논리 삭제): {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::users::MemoryUserStore;

    async fn setup() -> (UserService, Arc<MemoryUserStore>, PasswordHasher, User) {
        let store = Arc::new(MemoryUserStore::new());
        let hasher = PasswordHasher::new(4).unwrap();
        let digest = hasher.hash("secret123").await.unwrap();
        let user = store
            .create(User::new_local("a@x.com".into(), "A".into(), digest))
            .await
            .unwrap();

        (UserService::new(store.clone(), hasher.clone()), store, hasher, user)
    }

    #[tokio::test]
    async fn test_get_profile() {
        let (service, _, _, user) = setup().await;
        let profile = service.get_profile(&user.id).await.unwrap();
        assert_eq!(profile.email, "a@x.com");

        assert!(matches!(service.get_profile("missing").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_name_and_password() {
        let (service, store, hasher, user) = setup().await;
        let request = UpdateProfileRequest {
            name: Some("New Name".into()),
            password: Some("new-secret-1".into()),
        };

        let profile = service.update_profile(&user.id, request).await.unwrap();
        assert_eq!(profile.name, "New Name");

        let stored = store.find_by_id(&user.id).await.unwrap().unwrap();
        let digest = stored.password_hash.unwrap();
        assert!(hasher.verify("new-secret-1", &digest).await);
        assert!(!hasher.verify("secret123", &digest).await);
    }

    #[tokio::test]
    async fn test_federated_account_cannot_set_password() {
        let (service, store, _, _) = setup().await;
        let federated = store
            .create(User::new_federated("g@x.com".into(), "G".into(), "g-1".into()))
            .await
            .unwrap();

        let request = UpdateProfileRequest { name: None, password: Some("new-secret-1".into()) };
        let result = service.update_profile(&federated.id, request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_account_is_soft() {
        let (service, store, _, user) = setup().await;

        service.delete_account(&user.id).await.unwrap();
        assert!(matches!(service.get_profile(&user.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete_account(&user.id).await, Err(AppError::NotFound(_))));

        // 감사용 레코드는 남아 있음
        assert!(store.find_by_id(&user.id).await.unwrap().unwrap().is_deleted());
    }

    #[tokio::test]
    async fn test_update_after_delete_does_not_revive_account() {
        let (service, store, _, user) = setup().await;
        let before = service.get_profile(&user.id).await.unwrap();
        assert_eq!(before.id, user.id);

        // 해싱 도중 탈퇴한 상황: 조회 이후 삭제, 그 다음 쓰기
        store.soft_delete(&user.id).await.unwrap();
        let changes = ProfileChanges { name: Some("Ghost".into()), password_hash: None };
        assert!(store.update_profile(&user.id, changes).await.unwrap().is_none());

        let request = UpdateProfileRequest { name: Some("Ghost".into()), password: Some("new-secret-1".into()) };
        assert!(matches!(service.update_profile(&user.id, request).await, Err(AppError::NotFound(_))));

        let stored = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(stored.is_deleted());
        assert_eq!(stored.name, "A");
    }
}
