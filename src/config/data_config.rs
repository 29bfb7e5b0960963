//! 서버, 저장소, 환경 관련 설정
//!
//! 모든 설정값은 기동 시 한 번 읽혀 불변 구조체로 보관됩니다.
//! 테스트에서는 `from_lookup`에 클로저를 넘겨 환경 변수 없이 설정을 구성합니다.

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;
use super::ConfigError;

/// 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// `ENVIRONMENT` 값으로부터 환경을 결정합니다. 알 수 없는 값은 운영 환경으로 취급합니다.
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("ENVIRONMENT")
            .map(|value| Self::from_name(&value))
            .unwrap_or(Environment::Production)
    }

    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// 개발/테스트 환경 여부 (안전하지 않은 기본값 허용 범위)
    pub fn is_local(&self) -> bool {
        matches!(self, Environment::Development | Environment::Test)
    }
}

/// HTTP 서버 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                    "http://localhost:8080".to_string(),
                    "http://127.0.0.1:8080".to_string(),
                ]
            });

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(lookup, "PORT", 8080)?,
            workers: parse_or(lookup, "WORKERS", 4)?,
            allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Rate Limiting 설정 (actix-governor)
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// 파싱 실패 시 기본값으로 대체하고 에러 로그를 남깁니다.
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let per_second = lookup("RATE_LIMIT_PER_SECOND")
            .map(|raw| {
                raw.parse::<u64>().unwrap_or_else(|e| {
                    log::error!("RATE_LIMIT_PER_SECOND 파싱 실패: {}. 기본값 100 사용", e);
                    100
                })
            })
            .unwrap_or(100);

        let burst_size = lookup("RATE_LIMIT_BURST_SIZE")
            .map(|raw| {
                raw.parse::<u32>().unwrap_or_else(|e| {
                    log::error!("RATE_LIMIT_BURST_SIZE 파싱 실패: {}. 기본값 200 사용", e);
                    200
                })
            })
            .unwrap_or(200);

        Self { per_second, burst_size }
    }
}

/// 사용자 저장소 백엔드 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

/// 데이터베이스 설정
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub mongodb_uri: String,
    pub database_name: String,
}

impl DatabaseConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("mongodb") | Some("mongo") => StoreBackend::MongoDb,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "STORE_BACKEND",
                    value: other.to_string(),
                    reason: "expected `mongodb` or `memory`".to_string(),
                });
            }
        };

        Ok(Self {
            backend,
            mongodb_uri: lookup("MONGODB_URI")
                .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            database_name: lookup("DATABASE_NAME")
                .unwrap_or_else(|| "identity_service_dev".to_string()),
        })
    }
}

/// 비밀번호 해싱 설정
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
}

impl PasswordConfig {
    pub fn from_lookup<F>(lookup: &F, environment: Environment) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let configured = lookup("BCRYPT_COST").and_then(|raw| match raw.parse::<u32>() {
            Ok(cost) if (4..=15).contains(&cost) => Some(cost),
            _ => {
                log::warn!("BCRYPT_COST 값이 유효하지 않습니다 ({}). 환경 기본값 사용", raw);
                None
            }
        });

        Self {
            bcrypt_cost: configured.unwrap_or_else(|| Self::bcrypt_cost_for_env(environment)),
        }
    }

    pub fn bcrypt_cost_for_env(env: Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// 값이 없으면 기본값, 있는데 파싱할 수 없으면 에러
pub(crate) fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// [`parse_or`]에 더해 허용 범위를 벗어난 값도 에러 (기본값은 범위 안이어야 함)
pub(crate) fn parse_in_range<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Display,
    T::Err: Display,
{
    let value = parse_or(lookup, key, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: format!("must be between {} and {}", range.start(), range.end()),
        })
    }
}

/// `true/false`, `1/0`, `yes/no`, `on/off`
pub(crate) fn parse_bool_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key,
                value: raw,
                reason: "expected a boolean".to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_name("development"), Environment::Development);
        assert_eq!(Environment::from_name("test"), Environment::Test);
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("unknown"), Environment::Production);
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(Environment::Production), 12);
    }

    #[test]
    fn test_bcrypt_cost_out_of_range_falls_back() {
        let lookup = lookup_from(&[("BCRYPT_COST", "40")]);
        let config = PasswordConfig::from_lookup(&lookup, Environment::Staging);
        assert_eq!(config.bcrypt_cost, 10);

        let lookup = lookup_from(&[("BCRYPT_COST", "6")]);
        let config = PasswordConfig::from_lookup(&lookup, Environment::Production);
        assert_eq!(config.bcrypt_cost, 6);
    }

    #[test]
    fn test_server_config_defaults() {
        let lookup = lookup_from(&[]);
        let config = ServerConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.allowed_origins.len(), 4);
    }

    #[test]
    fn test_server_config_rejects_bad_port() {
        let lookup = lookup_from(&[("PORT", "eighty")]);
        let err = ServerConfig::from_lookup(&lookup).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_rate_limit_falls_back_on_garbage() {
        let lookup = lookup_from(&[("RATE_LIMIT_PER_SECOND", "fast"), ("RATE_LIMIT_BURST_SIZE", "40")]);
        let config = RateLimitConfig::from_lookup(&lookup);
        assert_eq!(config.per_second, 100);
        assert_eq!(config.burst_size, 40);
    }

    #[test]
    fn test_store_backend_selection() {
        let lookup = lookup_from(&[("STORE_BACKEND", "memory")]);
        assert_eq!(DatabaseConfig::from_lookup(&lookup).unwrap().backend, StoreBackend::Memory);

        let lookup = lookup_from(&[]);
        assert_eq!(DatabaseConfig::from_lookup(&lookup).unwrap().backend, StoreBackend::MongoDb);

        let lookup = lookup_from(&[("STORE_BACKEND", "postgres")]);
        assert!(DatabaseConfig::from_lookup(&lookup).is_err());
    }

    #[test]
    fn test_parse_bool_or() {
        let lookup = lookup_from(&[("A", "yes"), ("B", "0"), ("C", "maybe")]);
        assert!(parse_bool_or(&lookup, "A", false).unwrap());
        assert!(!parse_bool_or(&lookup, "B", true).unwrap());
        assert!(parse_bool_or(&lookup, "C", true).is_err());
        assert!(parse_bool_or(&lookup, "D", true).unwrap());
    }
}
