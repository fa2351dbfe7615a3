use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};

use adlink_db::NewChannel;
use adlink_types::Category;
use adlink_types::api::{ChannelsResponse, CreateChannelRequest, CreateChannelResponse};

use crate::error::ApiError;
use crate::{AppState, run_db};

/// GET /api/channels/{user_id}
pub async fn list_channels(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(user_id) = path?;
    let channels = run_db(&state, move |db| db.list_channels_by_user(user_id)).await?;
    Ok(Json(ChannelsResponse { channels }))
}

/// POST /api/channels. A taken handle answers 409 with `success: false`.
pub async fn create_channel(
    State(state): State<AppState>,
    payload: Result<Json<CreateChannelRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let category: Category = req.category.parse()?;

    let new = NewChannel {
        user_id: req.user_id,
        name: req.channel_name,
        handle: req.channel_username,
        subscribers_count: req.subscribers_count,
        category,
        description: req.description,
    };
    let channel_id = run_db(&state, move |db| db.create_channel(&new)).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateChannelResponse {
            success: true,
            channel_id,
        }),
    ))
}
