pub mod balance;
pub mod channels;
pub mod error;
pub mod offers;
pub mod withdrawals;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tracing::error;

use adlink_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// All `/api` routes plus `/health`. Transport layers (CORS, tracing, static
/// files) are added by the server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/channels", post(channels::create_channel))
        .route("/api/channels/{user_id}", get(channels::list_channels))
        .route("/api/offers/accept", post(offers::accept_offer))
        .route("/api/offers/reject", post(offers::reject_offer))
        .route("/api/offers/{channel_id}", get(offers::list_offers))
        .route("/api/balance/{user_id}", get(balance::get_balance))
        .route("/api/withdrawal", post(withdrawals::create_withdrawal))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn health() -> &'static str {
    "ok"
}

/// Run a store operation off the async runtime.
pub(crate) async fn run_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> adlink_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?;
    Ok(result?)
}
