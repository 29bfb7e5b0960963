//! 비밀번호 해싱 서비스
//!
//! bcrypt(솔트 내장, 적응형 cost)로 비밀번호를 해싱하고 검증합니다.
//! bcrypt 연산은 CPU를 오래 점유하므로 `spawn_blocking`에서 실행해
//! actix 워커 스레드를 막지 않습니다.

use std::sync::Arc;
use std::time::Instant;
use log::{debug, error, warn};
use crate::config::PasswordConfig;
use crate::errors::AuthError;

/// 존재하지 않는 이메일에 대해 검증 시간을 맞추기 위한 더미 평문
const DUMMY_PASSWORD: &str = "timing-equalization-dummy-password";

#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// 같은 cost로 미리 계산한 더미 다이제스트
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// 주어진 cost로 해셔를 만듭니다. 더미 다이제스트를 한 번 계산합니다.
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(Self {
            cost,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    pub fn from_config(config: &PasswordConfig) -> Result<Self, AuthError> {
        Self::new(config.bcrypt_cost)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// 평문을 bcrypt 다이제스트로 변환
    pub async fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let start = Instant::now();

        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| AuthError::HashingError(e.to_string()))?
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        debug!("Password hashing took: {:?}", start.elapsed());
        Ok(digest)
    }

    /// 평문이 다이제스트와 일치하는지 검증
    ///
    /// 불일치는 정상 결과(`false`)입니다. 다이제스트 형식이 깨진 경우에도
    /// 로그만 남기고 `false`를 돌려줍니다.
    pub async fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();
        let start = Instant::now();

        let result = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest)).await;
        debug!("Password verification took: {:?}", start.elapsed());

        match result {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                warn!("저장된 비밀번호 다이제스트를 해석할 수 없습니다: {}", e);
                false
            }
            Err(e) => {
                error!("비밀번호 검증 작업 실패: {}", e);
                false
            }
        }
    }

    /// 결과를 버리는 검증. 사용자가 없을 때도 같은 비용을 치르게 합니다.
    pub async fn verify_dummy(&self, plaintext: &str) {
        let dummy = self.dummy_hash.to_string();
        let _ = self.verify(plaintext, &dummy).await;
    }
}
