//! # Google OAuth 2.0 인증 서비스
//!
//! Authorization Code Grant(RFC 6749)로 외부 프로바이더 신원을 확인합니다.
//!
//! ```text
//! 클라이언트            우리 서버                          Google
//!    │ GET /google/login    │                                  │
//!    ├─────────────────────►│ state 생성, 인증 URL 구성          │
//!    │ 307 + state 쿠키      │                                  │
//!    │◄─────────────────────┤                                  │
//!    │ 사용자 인증 ─────────────────────────────────────────────►│
//!    │◄──────────────────────────────── code, state 리다이렉트   │
//!    │ GET /google/callback │                                  │
//!    ├─────────────────────►│ 1. 쿠키 state == 쿼리 state 확인  │
//!    │                      │ 2. code → access_token ─────────►│
//!    │                      │ 3. userinfo 조회 ───────────────►│
//!    │                      │ 4. 프로필 정규화                   │
//! ```
//!
//! state가 다르면 토큰 엔드포인트를 호출하지 않고 즉시 `InvalidState`로 끝납니다.
//! 프로바이더 호출 실패는 재시도하지 않고 호출자에게 그대로 돌려줍니다.
//! 두 호출은 하나의 데드라인을 공유하며, 넘기면 각각 `CodeExchangeFailed`,
//! `ProfileFetchFailed`로 깔끔하게 중단됩니다.

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use log::{info, warn};
use tokio::time::{timeout_at, Instant};
use crate::config::GoogleOAuthConfig;
use crate::domain::models::oauth::{GoogleUserInfo, ProviderProfile, ProviderTokenResponse};
use crate::errors::AuthError;
use super::oauth_state::CsrfStateGenerator;

/// 외부 신원 프로바이더와의 통신 계약
#[async_trait]
pub trait IdentityProviderClient: Send + Sync {
    /// state를 포함한 인가 URL
    fn authorization_url(&self, state: &str) -> String;

    /// Authorization code를 액세스 토큰으로 교환
    async fn exchange_code(&self, code: &str) -> Result<ProviderTokenResponse, AuthError>;

    /// 액세스 토큰으로 정규화된 프로필 조회
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, AuthError>;
}

/// reqwest 기반 Google 클라이언트
pub struct GoogleProviderClient {
    http: reqwest::Client,
    config: GoogleOAuthConfig,
}

impl GoogleProviderClient {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, AuthError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::InvalidOAuthConfig(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl IdentityProviderClient for GoogleProviderClient {
    fn authorization_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", self.config.scopes.as_str()),
            ("state", state),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.config.auth_uri, query_string)
    }

    async fn exchange_code(&self, code: &str) -> Result<ProviderTokenResponse, AuthError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.http
            .post(&self.config.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::CodeExchangeFailed(format!("Google 토큰 요청 실패: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::CodeExchangeFailed(format!(
                "Google 토큰 교환 실패 ({}): {}", status, error_text
            )));
        }

        let token = response
            .json::<ProviderTokenResponse>()
            .await
            .map_err(|e| AuthError::CodeExchangeFailed(format!("Google 토큰 응답 파싱 실패: {}", e)))?;

        if token.access_token.is_empty() {
            return Err(AuthError::CodeExchangeFailed("빈 access_token".to_string()));
        }
        Ok(token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, AuthError> {
        let response = self.http
            .get(&self.config.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::ProfileFetchFailed(format!("Google 사용자 정보 요청 실패: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::ProfileFetchFailed(format!(
                "Google 사용자 정보 조회 실패 ({})", status
            )));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| AuthError::ProfileFetchFailed(format!("Google 사용자 정보 파싱 실패: {}", e)))?
            .normalize()
            .map_err(AuthError::ProfileFetchFailed)
    }
}

/// 리다이렉트 시작 결과
#[derive(Debug, Clone)]
pub struct AuthorizationRedirect {
    pub url: String,
    /// 쿠키로 내려보낼 state
    pub state: String,
}

/// 콜백 입력
///
/// `stored_state`는 쿠키에서, 나머지는 콜백 쿼리에서 옵니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct CallbackParams<'a> {
    pub stored_state: Option<&'a str>,
    pub received_state: Option<&'a str>,
    pub code: Option<&'a str>,
}

pub struct FederatedIdentityExchanger {
    client: Arc<dyn IdentityProviderClient>,
    states: CsrfStateGenerator,
    call_timeout: Duration,
}

impl FederatedIdentityExchanger {
    pub fn new(client: Arc<dyn IdentityProviderClient>, states: CsrfStateGenerator, call_timeout: Duration) -> Self {
        Self { client, states, call_timeout }
    }

    pub fn initiate(&self) -> Result<AuthorizationRedirect, AuthError> {
        let state = self.states.generate()?;
        let url = self.client.authorization_url(&state);

        Ok(AuthorizationRedirect { url, state })
    }

    /// 콜백 처리
    ///
    /// `deadline`이 없으면 지금부터 설정된 호출 제한 시간까지 기다립니다.
    pub async fn handle_callback(
        &self,
        params: CallbackParams<'_>,
        deadline: Option<Instant>,
    ) -> Result<ProviderProfile, AuthError> {
        CsrfStateGenerator::verify(params.stored_state, params.received_state)?;

        let code = params
            .code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AuthError::CodeExchangeFailed("authorization code 누락".to_string()))?;

        let deadline = match deadline {
            Some(deadline) => deadline,
            None => Instant::now()
                .checked_add(self.call_timeout)
                .ok_or_else(|| AuthError::CodeExchangeFailed("call timeout out of range".to_string()))?,
        };

        let token = timeout_at(deadline, self.client.exchange_code(code))
            .await
            .map_err(|_| {
                warn!("Authorization code 교환이 제한 시간을 넘었습니다");
                AuthError::CodeExchangeFailed("deadline exceeded".to_string())
            })??;

        let profile = timeout_at(deadline, self.client.fetch_profile(&token.access_token))
            .await
            .map_err(|_| {
                warn!("프로필 조회가 제한 시간을 넘었습니다");
                AuthError::ProfileFetchFailed("deadline exceeded".to_string())
            })??;

        info!("프로바이더 신원 확인 완료: provider_id={}", profile.provider_id);
        Ok(profile)
    }
}
