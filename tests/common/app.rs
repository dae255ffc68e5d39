use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;
use tokio::sync::broadcast;

use vision_backend::config::{Config, MediaConfig, RateLimitConfig};
use vision_backend::routes::build_router;
use vision_backend::state::AppState;
use vision_backend::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

fn test_config(sled_path: String, api_limit: u64, media: MediaConfig) -> Config {
    // Built directly; set_var would race between parallel tests
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path,
        cors_origin: "http://localhost:3001".to_string(),
        trust_proxy: false,
        rate_limit: RateLimitConfig {
            window_secs: 60,
            max_requests: api_limit,
        },
        media,
    }
}

async fn spawn_with(api_limit: u64, media: MediaConfig) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("vision-test.sled");
    let config = test_config(sled_path.to_string_lossy().to_string(), api_limit, media);

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(store, &config, shutdown_tx);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_server() -> TestApp {
    spawn_with(1000, MediaConfig::default()).await
}

pub async fn spawn_test_server_with_limits(api_limit: u64) -> TestApp {
    spawn_with(api_limit, MediaConfig::default()).await
}

/// Small chunks so modest payloads span several chunks.
pub async fn spawn_test_server_with_media(media: MediaConfig) -> TestApp {
    spawn_with(1000, media).await
}
