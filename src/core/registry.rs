//! # Service Registry
//!
//! 기동 시 설정값으로 모든 서비스를 한 번 생성하고, actix-web `web::Data`로 핸들러에 주입합니다.
//! 전역 접근자나 지연 초기화 싱글톤은 없습니다. 테스트는 같은 생성 경로에
//! 메모리 저장소와 가짜 프로바이더 클라이언트를 넣어 조립합니다.
//!
//! ```text
//! AppConfig ─┬─ PasswordHasher ─┬─ IdentityReconciler
//!            │                  └─ UserService
//!            ├─ TokenManager
//!            └─ GoogleProviderClient ─ FederatedIdentityExchanger
//! Arc<dyn UserStore> ──────────────────┘
//! ```
//!
//! ```rust,ignore
//! let registry = ServiceRegistry::build(&config, store)?;
//! HttpServer::new(move || {
//!     App::new()
//!         .configure(|cfg| registry.configure(cfg))
//!         .configure(configure_all_routes)
//! })
//! ```

use std::sync::Arc;
use actix_web::web;
use crate::config::{AppConfig, Environment, OAuthConfig};
use crate::core::errors::{AppResult, ErrorContext};
use crate::repositories::users::UserStore;
use crate::services::auth::{
    CsrfStateGenerator, FederatedIdentityExchanger, GoogleProviderClient, IdentityProviderClient,
    PasswordHasher, TokenManager,
};
use crate::services::users::{IdentityReconciler, UserService};

/// `/health`, `/metadata` 응답에 쓰이는 서비스 정보
#[derive(Debug, Clone)]
pub struct ServiceMetadata {
    pub name: String,
    pub version: String,
    pub environment: Environment,
}

/// 기동 시 조립된 서비스 묶음
#[derive(Clone)]
pub struct ServiceRegistry {
    pub token_manager: Arc<TokenManager>,
    pub reconciler: Arc<IdentityReconciler>,
    pub exchanger: Arc<FederatedIdentityExchanger>,
    pub user_service: Arc<UserService>,
    pub oauth: Arc<OAuthConfig>,
    pub metadata: Arc<ServiceMetadata>,
}

impl ServiceRegistry {
    /// 운영 구성: Google 클라이언트를 설정으로 생성합니다.
    pub fn build(config: &AppConfig, store: Arc<dyn UserStore>) -> AppResult<Self> {
        let provider = GoogleProviderClient::new(config.google.clone())
            .context("Google OAuth 클라이언트 생성 실패")?;

        Self::build_with_provider(config, store, Arc::new(provider))
    }

    pub fn build_with_provider(
        config: &AppConfig,
        store: Arc<dyn UserStore>,
        provider: Arc<dyn IdentityProviderClient>,
    ) -> AppResult<Self> {
        let hasher = PasswordHasher::from_config(&config.password)
            .with_context(|| format!("bcrypt cost {} 초기화 실패", config.password.bcrypt_cost))?;

        let exchanger = FederatedIdentityExchanger::new(
            provider,
            CsrfStateGenerator::new(config.oauth.state_fail_closed),
            config.google.http_timeout,
        );

        Ok(Self {
            token_manager: Arc::new(TokenManager::new(&config.jwt)),
            reconciler: Arc::new(IdentityReconciler::new(
                store.clone(),
                hasher.clone(),
                config.oauth.require_verified_email,
            )),
            exchanger: Arc::new(exchanger),
            user_service: Arc::new(UserService::new(store, hasher)),
            oauth: Arc::new(config.oauth.clone()),
            metadata: Arc::new(ServiceMetadata {
                name: config.service_name.clone(),
                version: config.service_version.clone(),
                environment: config.environment,
            }),
        })
    }

    /// 각 서비스를 `web::Data`로 등록
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.token_manager.clone()))
            .app_data(web::Data::from(self.reconciler.clone()))
            .app_data(web::Data::from(self.exchanger.clone()))
            .app_data(web::Data::from(self.user_service.clone()))
            .app_data(web::Data::from(self.oauth.clone()))
            .app_data(web::Data::from(self.metadata.clone()));
    }
}
