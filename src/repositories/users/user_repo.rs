//! # 사용자 리포지토리 구현 (MongoDB)
//!
//! `users` 컬렉션 하나에 모든 사용자를 저장합니다.
//!
//! ## 특징
//!
//! - **데이터 무결성**: `email` 유니크 인덱스, `federated_id` 부분 유니크 인덱스
//! - **논리 삭제**: `deleted_at`을 기록하고 레코드는 보존
//! - **충돌 매핑**: duplicate key(11000)를 [`StoreError::Conflict`]로 변환

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use crate::db::Database;
use crate::domain::entities::users::User;
use crate::errors::StoreError;
use super::{ProfileChanges, UserStore};

const COLLECTION_NAME: &str = "users";
const DUPLICATE_KEY: i32 = 11000;

/// 논리 삭제되지 않은 문서만 매칭 (`null`은 필드 부재도 포함)
fn active(mut filter: Document) -> Document {
    filter.insert("deleted_at", Bson::Null);
    filter
}

fn unavailable(err: MongoError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn now_bson() -> Result<Bson, StoreError> {
    to_bson(&Utc::now()).map_err(|e| StoreError::Unavailable(e.to_string()))
}

/// 쓰기 에러를 저장소 에러로 변환
///
/// 인덱스 이름으로 어떤 유니크 제약이 깨졌는지 판별합니다.
/// `insert_one`은 WriteError로, `find_one_and_update`는 CommandError로 중복 키를 알립니다.
fn map_write_error(err: MongoError) -> StoreError {
    let duplicate_message = match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == DUPLICATE_KEY => {
            Some(write_error.message.as_str())
        }
        ErrorKind::Command(ref command_error) if command_error.code == DUPLICATE_KEY => {
            Some(command_error.message.as_str())
        }
        _ => None,
    };
    let conflict_field = duplicate_message.map(|message| {
        if message.contains("federated_id") { "federated_id" } else { "email" }
    });

    match conflict_field {
        Some(field) => StoreError::Conflict { field },
        None => unavailable(err),
    }
}

/// 프로필 변경을 `$set` 문서로 변환
fn profile_update(changes: ProfileChanges) -> Result<Document, StoreError> {
    let now = now_bson()?;
    let mut set = doc! { "updated_at": now };
    if let Some(name) = changes.name {
        set.insert("name", name);
    }
    if let Some(password_hash) = changes.password_hash {
        set.insert("password_hash", password_hash);
    }
    Ok(doc! { "$set": set })
}

pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_database().collection::<User>(COLLECTION_NAME),
        }
    }

    async fn create_indexes(&self) -> Result<(), StoreError> {
        // 이메일 유니크 인덱스 (삭제된 사용자 포함)
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        // 프로바이더 ID는 있을 때만 유니크
        let federated_index = IndexModel::builder()
            .keys(doc! { "federated_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .partial_filter_expression(doc! { "federated_id": { "$type": "string" } })
                .name("federated_id_unique".to_string())
                .build())
            .build();

        // 생성일 인덱스
        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        self.collection
            .create_indexes([email_index, federated_index, created_at_index])
            .await
            .map_err(unavailable)?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn init(&self) -> Result<(), StoreError> {
        self.create_indexes().await?;
        info!("✅ users 컬렉션 인덱스 준비 완료");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one(active(doc! { "email": email }))
            .await
            .map_err(unavailable)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(unavailable)
    }

    async fn find_by_federated_id(&self, federated_id: &str) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one(active(doc! { "federated_id": federated_id }))
            .await
            .map_err(unavailable)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let count = self.collection
            .count_documents(doc! { "email": email })
            .await
            .map_err(unavailable)?;

        Ok(count > 0)
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        self.collection
            .insert_one(&user)
            .await
            .map_err(map_write_error)?;

        debug!("사용자 문서 생성: {}", user.id);
        Ok(user)
    }

    async fn update_profile(&self, id: &str, changes: ProfileChanges) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one_and_update(active(doc! { "_id": id }), profile_update(changes)?)
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_write_error)
    }

    async fn link_federated_id(&self, id: &str, federated_id: &str) -> Result<Option<User>, StoreError> {
        let now = now_bson()?;
        let filter = active(doc! { "_id": id, "federated_id": Bson::Null });
        let update = doc! {
            "$set": {
                "federated_id": federated_id,
                "email_verified": true,
                "updated_at": now,
            }
        };

        self.collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_write_error)
    }

    async fn soft_delete(&self, id: &str) -> Result<bool, StoreError> {
        let now = now_bson()?;

        let result = self.collection
            .update_one(
                active(doc! { "_id": id }),
                doc! { "$set": { "deleted_at": now.clone(), "updated_at": now } },
            )
            .await
            .map_err(unavailable)?;

        Ok(result.modified_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_filter_excludes_deleted() {
        let filter = active(doc! { "email": "a@x.com" });
        assert_eq!(filter.get("email"), Some(&Bson::String("a@x.com".into())));
        assert_eq!(filter.get("deleted_at"), Some(&Bson::Null));
    }

    #[test]
    fn test_profile_update_sets_only_given_fields() {
        let changes = ProfileChanges { name: Some("Renamed".into()), password_hash: None };
        let update = profile_update(changes).unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("name").unwrap(), "Renamed");
        assert!(set.contains_key("updated_at"));
        assert!(!set.contains_key("password_hash"));
        assert!(!set.contains_key("deleted_at"));
    }

    #[test]
    fn test_user_document_shape() {
        let user = User::new_local("a@x.com".into(), "A".into(), "$2b$04$hash".into());
        let document = mongodb::bson::to_document(&user).unwrap();

        assert_eq!(document.get_str("_id").unwrap(), user.id);
        assert!(!document.contains_key("federated_id"));
        assert!(!document.contains_key("deleted_at"));
    }
}
