use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    response::IntoResponse,
};

use crate::error::ApiError;
use crate::{AppState, run_db};

/// GET /api/balance/{user_id}. Users without a balance row read as zero.
pub async fn get_balance(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(user_id) = path?;
    let balance = run_db(&state, move |db| db.get_balance(user_id)).await?;
    Ok(Json(balance))
}
