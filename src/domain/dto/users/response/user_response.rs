use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::config::AuthProvider;
use crate::domain::entities::users::User;
use crate::domain::models::token::IssuedToken;

/// 사용자 응답 DTO
///
/// 비밀번호 해시와 프로바이더 ID는 응답에 포함하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,

    /// 인증 프로바이더 (local, federated)
    pub auth_provider: AuthProvider,

    pub email_verified: bool,

    /// 외부 계정이 연결되어 있는지 여부
    pub federated_linked: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            federated_linked: user.federated_id.is_some(),
            id: user.id,
            email: user.email,
            name: user.name,
            auth_provider: user.auth_provider,
            email_verified: user.email_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 회원가입 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user: UserResponse,
    pub message: String,
}

/// 로그인 응답 (로컬/Google 공통)
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl LoginResponse {
    pub fn new(token: IssuedToken, user: User) -> Self {
        Self {
            token: token.token,
            token_type: "Bearer".to_string(),
            expires_at: token.expires_at,
            user: user.into(),
        }
    }
}

/// 토큰 검증 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenVerificationResponse {
    pub valid: bool,
    pub user_id: String,
    pub role: String,
}

/// 서비스 메타데이터 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub service: String,
    pub version: String,
    pub environment: String,
    pub server_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_secrets() {
        let mut user = User::new_local("a@x.com".into(), "A".into(), "$2b$04$hash".into());
        user.link_federated_identity("google-1".into());

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("federated_id").is_none());
        assert_eq!(json["federated_linked"], true);
        assert_eq!(json["auth_provider"], "local");
    }

    #[test]
    fn test_login_response_is_bearer() {
        let user = User::new_federated("b@x.com".into(), "B".into(), "g".into());
        let now = Utc::now();
        let token = IssuedToken { token: "a.b.c".into(), issued_at: now, expires_at: now };

        let response = LoginResponse::new(token, user);
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.token, "a.b.c");
    }
}
