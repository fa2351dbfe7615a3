use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Channel, Offer};

// -- Channels --

/// Tags arrive as plain strings so unknown values surface as a validation
/// error from the store instead of a body rejection.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateChannelRequest {
    pub user_id: i64,
    pub channel_name: String,
    pub channel_username: String,
    pub subscribers_count: i64,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateChannelResponse {
    pub success: bool,
    pub channel_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelsResponse {
    pub channels: Vec<Channel>,
}

// -- Offers --

#[derive(Debug, Serialize, Deserialize)]
pub struct OffersResponse {
    pub offers: Vec<Offer>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcceptOfferRequest {
    pub offer_id: i64,
    pub placement_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RejectOfferRequest {
    pub offer_id: i64,
    pub rejection_reason: String,
}

// -- Withdrawals --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateWithdrawalRequest {
    pub user_id: i64,
    pub amount: f64,
    pub payment_method: String,
    pub payment_details: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWithdrawalResponse {
    pub success: bool,
    pub request_id: i64,
}

// -- Generic --

#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
