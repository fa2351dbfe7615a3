use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use adlink_db::NewWithdrawal;
use adlink_types::PaymentMethod;
use adlink_types::api::{CreateWithdrawalRequest, CreateWithdrawalResponse};

use crate::error::ApiError;
use crate::{AppState, run_db};

/// POST /api/withdrawal. Queues a request for manual payout; the balance is
/// not checked or debited here.
pub async fn create_withdrawal(
    State(state): State<AppState>,
    payload: Result<Json<CreateWithdrawalRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let payment_method: PaymentMethod = req.payment_method.parse()?;

    let new = NewWithdrawal {
        user_id: req.user_id,
        amount: req.amount,
        payment_method,
        payment_details: req.payment_details,
    };
    let request_id = run_db(&state, move |db| db.create_withdrawal(&new)).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateWithdrawalResponse {
            success: true,
            request_id,
        }),
    ))
}
