//! OAuth CSRF state 생성 및 비교
//!
//! state 값은 서버에 저장하지 않습니다. 리다이렉트 시작 시 HttpOnly 쿠키로 내려보내고
//! 콜백에서 프로바이더가 돌려준 `state` 쿼리와 한 번 비교한 뒤 버립니다.
//!
//! 기본 정책은 fail-closed입니다. OS 난수원을 쓸 수 없으면 `StateGenerationFailed`로
//! 리다이렉트를 거부합니다. `OAUTH_STATE_FAIL_CLOSED=false`일 때만 시간 기반 대체값을
//! 쓰며, 이는 예측 가능성이 높아지는 보안 약화이므로 매번 에러 로그를 남깁니다.

use std::sync::atomic::{AtomicU64, Ordering};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use log::{error, warn};
use sha2::{Digest, Sha256};
use crate::errors::AuthError;
use crate::utils::string_utils::constant_time_eq;

/// 256비트 엔트로피
pub const STATE_BYTES: usize = 32;

type RandomSource = fn(&mut [u8]) -> Result<(), getrandom::Error>;

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Clone)]
pub struct CsrfStateGenerator {
    fail_closed: bool,
    source: RandomSource,
}

impl CsrfStateGenerator {
    pub fn new(fail_closed: bool) -> Self {
        Self::with_source(fail_closed, getrandom::fill)
    }

    pub fn with_source(fail_closed: bool, source: RandomSource) -> Self {
        Self { fail_closed, source }
    }

    /// URL-safe state 문자열 생성 (43자)
    pub fn generate(&self) -> Result<String, AuthError> {
        let mut bytes = [0u8; STATE_BYTES];

        match (self.source)(&mut bytes) {
            Ok(()) => Ok(URL_SAFE_NO_PAD.encode(bytes)),
            Err(e) if self.fail_closed => {
                error!("보안 난수원을 사용할 수 없어 OAuth state 생성을 거부합니다: {}", e);
                Err(AuthError::StateGenerationFailed(e.to_string()))
            }
            Err(e) => {
                error!(
                    "⚠️ 보안 난수원 사용 불가({}): 시간 기반 OAuth state로 대체합니다. CSRF 방어가 약화됩니다",
                    e
                );
                Ok(URL_SAFE_NO_PAD.encode(time_seeded_bytes()))
            }
        }
    }

    /// 쿠키에 보관된 state와 콜백의 state를 바이트 단위로 비교
    ///
    /// 둘 중 하나라도 없거나 다르면 `InvalidState`입니다.
    pub fn verify(stored: Option<&str>, received: Option<&str>) -> Result<(), AuthError> {
        match (stored, received) {
            (Some(stored), Some(received))
                if !stored.is_empty() && constant_time_eq(stored.as_bytes(), received.as_bytes()) =>
            {
                Ok(())
            }
            (None, _) => {
                warn!("OAuth state 쿠키가 없습니다");
                Err(AuthError::InvalidState)
            }
            _ => {
                warn!("OAuth state 불일치");
                Err(AuthError::InvalidState)
            }
        }
    }
}

/// 고해상도 시각과 프로세스 카운터를 해시한 대체값
fn time_seeded_bytes() -> [u8; STATE_BYTES] {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut hasher = Sha256::new();
    hasher.update(nanos.to_le_bytes());
    hasher.update(counter.to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    hasher.finalize().into()
}
