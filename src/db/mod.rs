//! MongoDB 연결 관리
//!
//! 기동 시 한 번 연결하고 `ping`으로 접속을 확인합니다.
//! 연결 정보는 [`DatabaseConfig`]로 명시적으로 전달받습니다.

use log::info;
use mongodb::{Client, options::ClientOptions};
use crate::config::DatabaseConfig;
use crate::errors::StoreError;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let mut client_options = ClientOptions::parse(&config.mongodb_uri)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        client_options.app_name = Some("identity_service".to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        client
            .database(&config.database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!("✅ MongoDB 연결 성공: {}", config.database_name);

        Ok(Self {
            client,
            database_name: config.database_name.clone(),
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
