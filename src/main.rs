//! 사용자 신원 서비스 메인 애플리케이션
//!
//! 설정을 읽고 저장소와 서비스를 조립한 뒤 Actix-web HTTP 서버를 구동합니다.
//! 설정이나 저장소 초기화가 실패하면 소켓을 바인딩하기 전에 종료합니다.

use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use identity_service_backend::config::{AppConfig, ServerConfig, StoreBackend};
use identity_service_backend::core::registry::ServiceRegistry;
use identity_service_backend::db::Database;
use identity_service_backend::repositories::users::{MemoryUserStore, MongoUserStore, UserStore};
use identity_service_backend::routes::configure_all_routes;
use identity_service_backend::utils::display_terminal::{
    print_boxed_title, print_final_summary, print_step_complete, print_step_start, print_sub_task,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    print_boxed_title("🚀 사용자 신원 서비스 시작");

    print_step_start(1, "설정 로드");
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("설정 로드 실패: {}", e);
            std::process::exit(1);
        }
    };
    print_sub_task("environment", config.environment.as_str());
    print_step_complete(1, "설정 로드");

    print_step_start(2, "사용자 저장소 초기화");
    let store = match initialize_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("사용자 저장소 초기화 실패: {}", e);
            std::process::exit(1);
        }
    };
    print_step_complete(2, "사용자 저장소 초기화");

    print_step_start(3, "서비스 조립");
    let registry = match ServiceRegistry::build(&config, store) {
        Ok(registry) => registry,
        Err(e) => {
            error!("서비스 초기화 실패: {}", e);
            std::process::exit(1);
        }
    };
    print_step_complete(3, "서비스 조립");

    let backend = match config.database.backend {
        StoreBackend::MongoDb => "mongodb",
        StoreBackend::Memory => "memory",
    };
    print_final_summary(backend, &registry.metadata);

    start_http_server(config, registry).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(config: AppConfig, registry: ServiceRegistry) -> std::io::Result<()> {
    let bind_address = config.server.bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 API: http://{}/api/v1", bind_address);

    let Some(governor_conf) = GovernorConfigBuilder::default()
        .requests_per_second(config.rate_limit.per_second)
        .burst_size(config.rate_limit.burst_size)
        .use_headers()
        .finish()
    else {
        error!("Rate Limiting 설정이 유효하지 않습니다: {:?}", config.rate_limit);
        std::process::exit(1);
    };

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        config.rate_limit.per_second,
        config.rate_limit.burst_size
    );

    let server = config.server.clone();

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&server))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(|cfg| registry.configure(cfg))
            .configure(configure_all_routes)
    })
        .bind(&bind_address)?
        .workers(config.server.workers)
        .run()
        .await
}

/// 설정된 백엔드의 사용자 저장소를 만들고 인덱스를 준비합니다.
async fn initialize_store(config: &AppConfig) -> Result<Arc<dyn UserStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn UserStore> = match config.database.backend {
        StoreBackend::MongoDb => {
            info!("📡 데이터베이스 연결 중...");
            let database = Database::connect(&config.database).await?;
            print_sub_task("mongodb", database.database_name());
            Arc::new(MongoUserStore::new(&database))
        }
        StoreBackend::Memory => {
            log::warn!("메모리 저장소 사용 중. 재시작하면 모든 사용자가 사라집니다");
            print_sub_task("memory", "in-process");
            Arc::new(MemoryUserStore::new())
        }
    };

    store.init().await?;
    Ok(store)
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// `RUST_LOG` 기반 로깅 초기화 (기본값: "info,actix_web=debug")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// CORS 설정
///
/// `CORS_ALLOWED_ORIGINS`에 나열된 Origin만 허용합니다. state 쿠키 때문에 자격 증명을 지원합니다.
fn configure_cors(server: &ServerConfig) -> Cors {
    let cors = server
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
