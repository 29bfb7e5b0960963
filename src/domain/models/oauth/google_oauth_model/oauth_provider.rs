use serde::{Deserialize, Serialize};

/// 프로바이더 중립 사용자 프로필
///
/// 외부 프로바이더가 확인해 준 신원을 Identity Reconciler에 전달하는 형태입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// 프로바이더 측 사용자 ID (`User::federated_id`로 저장)
    pub provider_id: String,
    pub email: String,
    pub name: String,
    /// 프로바이더가 이메일 소유를 확인했는지 여부
    pub email_verified: bool,
}

/// 토큰 엔드포인트 응답 (authorization_code grant)
#[derive(Debug, Deserialize)]
pub struct ProviderTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}
