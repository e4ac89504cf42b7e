#![forbid(unsafe_code)]

use qscore_server::{
    build_router, validate_startup_config, ApiConfig, AppState, MemoryStore, SqliteStore,
    SubmissionStore,
};
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("QSCORE_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("QSCORE_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let api = ApiConfig {
        max_body_bytes: env_usize("QSCORE_MAX_BODY_BYTES", 10 * 1024 * 1024),
        expose_error_detail: env_bool("QSCORE_DEV_MODE", false),
        ..ApiConfig::default()
    };
    validate_startup_config(&api)?;

    let store: Arc<dyn SubmissionStore> = match env::var("QSCORE_STORE").as_deref() {
        Ok("memory") => Arc::new(MemoryStore::default()),
        _ => {
            let path = env::var("QSCORE_STORE_PATH")
                .unwrap_or_else(|_| "artifacts/qscore/responses.sqlite".to_string());
            Arc::new(
                SqliteStore::open(path)
                    .await
                    .map_err(|e| format!("failed to open sqlite store: {e}"))?,
            )
        }
    };

    let state = AppState::with_config(store, api);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind failed for {bind_addr}: {e}"))?;
    info!("qscore-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
