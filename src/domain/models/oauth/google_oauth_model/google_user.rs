//! # Google OAuth 사용자 정보 모델
//!
//! Google UserInfo 엔드포인트가 반환하는 원본 프로필을 역직렬화하고
//! 프로바이더 중립적인 [`ProviderProfile`]로 정규화합니다.
//!
//! v2 엔드포인트(`id`, `verified_email`)와 OpenID Connect 형식(`sub`, `email_verified`)을
//! 모두 받아들입니다.

use serde::Deserialize;
use super::oauth_provider::ProviderProfile;

/// Google OAuth 2.0 사용자 정보 응답 구조체
///
/// | 필드 | 필수 스코프 |
/// |------|-------------|
/// | `id`, `email` | `openid email` |
/// | `name`, `given_name`, `family_name`, `picture` | `profile` |
/// | `verified_email` | `email` |
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    /// Google 고유 사용자 ID
    #[serde(alias = "sub")]
    pub id: String,

    pub email: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub given_name: Option<String>,

    #[serde(default)]
    pub family_name: Option<String>,

    #[serde(default)]
    pub picture: Option<String>,

    /// 누락 시 검증되지 않은 것으로 간주
    #[serde(default, alias = "email_verified")]
    pub verified_email: bool,
}

impl GoogleUserInfo {
    /// 프로바이더 중립 프로필로 변환
    ///
    /// 필수 식별자가 비어 있으면 `Err`를 돌려줍니다.
    pub fn normalize(self) -> Result<ProviderProfile, String> {
        if self.id.trim().is_empty() {
            return Err("provider profile has an empty id".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("provider profile has an empty email".to_string());
        }

        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                let parts: Vec<String> = [self.given_name, self.family_name]
                    .into_iter()
                    .flatten()
                    .filter(|p| !p.trim().is_empty())
                    .collect();
                (!parts.is_empty()).then(|| parts.join(" "))
            })
            .unwrap_or_else(|| {
                self.email
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });

        Ok(ProviderProfile {
            provider_id: self.id,
            email: self.email,
            name,
            email_verified: self.verified_email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v2_payload_normalizes() {
        let info: GoogleUserInfo = serde_json::from_str(
            r#"{"id":"1234","email":"a@x.com","verified_email":true,"name":"Alice A","picture":"http://p"}"#,
        )
        .unwrap();

        let profile = info.normalize().unwrap();
        assert_eq!(profile.provider_id, "1234");
        assert_eq!(profile.email, "a@x.com");
        assert_eq!(profile.name, "Alice A");
        assert!(profile.email_verified);
    }

    #[test]
    fn test_oidc_payload_normalizes() {
        let info: GoogleUserInfo = serde_json::from_str(
            r#"{"sub":"abc","email":"b@x.com","email_verified":false,"given_name":"Bob","family_name":"B"}"#,
        )
        .unwrap();

        let profile = info.normalize().unwrap();
        assert_eq!(profile.provider_id, "abc");
        assert_eq!(profile.name, "Bob B");
        assert!(!profile.email_verified);
    }

    #[test]
    fn test_missing_name_falls_back_to_local_part() {
        let info: GoogleUserInfo =
            serde_json::from_str(r#"{"id":"1","email":"carol@x.com"}"#).unwrap();
        let profile = info.normalize().unwrap();
        assert_eq!(profile.name, "carol");
        assert!(!profile.email_verified);
    }

    #[test]
    fn test_empty_email_rejected() {
        let info: GoogleUserInfo = serde_json::from_str(r#"{"id":"1","email":""}"#).unwrap();
        assert!(info.normalize().is_err());
    }
}
