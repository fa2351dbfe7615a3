use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};

use adlink_types::OfferDecision;
use adlink_types::api::{AckResponse, AcceptOfferRequest, OffersResponse, RejectOfferRequest};

use crate::error::ApiError;
use crate::{AppState, run_db};

/// GET /api/offers/{channel_id}
pub async fn list_offers(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(channel_id) = path?;
    let offers = run_db(&state, move |db| db.list_offers_by_channel(channel_id)).await?;
    Ok(Json(OffersResponse { offers }))
}

/// POST /api/offers/accept
pub async fn accept_offer(
    State(state): State<AppState>,
    payload: Result<Json<AcceptOfferRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let decision = OfferDecision::Accept {
        placement_date: req.placement_date,
    };
    decide(&state, req.offer_id, decision).await
}

/// POST /api/offers/reject
pub async fn reject_offer(
    State(state): State<AppState>,
    payload: Result<Json<RejectOfferRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let decision = OfferDecision::Reject {
        reason: req.rejection_reason,
    };
    decide(&state, req.offer_id, decision).await
}

async fn decide(
    state: &AppState,
    offer_id: i64,
    decision: OfferDecision,
) -> Result<Json<AckResponse>, ApiError> {
    run_db(state, move |db| db.update_offer_status(offer_id, &decision)).await?;
    Ok(Json(AckResponse::ok()))
}
