#![forbid(unsafe_code)]

use crm_db::{DbManager, run_migrations};
use crm_server::{AppState, LogFormat, ServerConfig, build_router};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,crm_server=info,crm_db=info,crm_auth=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn run() -> Result<(), String> {
    let config = ServerConfig::from_env().map_err(|e| e.to_string())?;

    let manager = DbManager::connect(&config.db)
        .await
        .map_err(|e| format!("database connection failed: {e}"))?;
    run_migrations(manager.client())
        .await
        .map_err(|e| e.to_string())?;

    let state = AppState::new(manager.client().clone(), config.auth);
    let app = build_router(state, &config.http);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| format!("bind {} failed: {e}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "crm-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))?;

    info!("crm-server stopped");
    Ok(())
}

#[tokio::main]
async fn main() {
    let format = match LogFormat::from_env() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    init_tracing(format);

    if let Err(e) = run().await {
        error!(error = %e, "crm-server failed to start");
        std::process::exit(1);
    }
}
