mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use adlink_api::{AppState, AppStateInner};
use adlink_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "adlink=debug,adlink_api=debug,adlink_bot=info,adlink_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Database::open(&config.store_path)?;
    if config.seed_sample_data {
        db.seed_sample_data()?;
    }

    let state: AppState = Arc::new(AppStateInner { db });

    let mut app = adlink_api::router(state);
    if let Some(dir) = &config.webapp_dir {
        info!("Serving mini app from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let bot = if config.bot_enabled() {
        let token = config.token.clone();
        let webapp_url = config.base_url.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = adlink_bot::run_polling(token, webapp_url).await {
                error!("Bot stopped: {:#}", e);
            }
        }))
    } else {
        warn!("ADLINK_BOT_TOKEN is not set; running the HTTP API without the bot");
        None
    };

    let addr = config.listen_addr()?;
    info!("adlink listening on {}", addr);
    info!("Mini app URL: {}", config.base_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(bot) = bot {
        bot.abort();
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
