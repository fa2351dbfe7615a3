//! Row types map directly to SQLite rows; the `New*` types are validated
//! write inputs. Both convert to and from the shared `adlink-types` records.

use adlink_types::{
    Category, Channel, Offer, OfferStatus, PaymentMethod, WithdrawalRequest,
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::{Result, StoreError};

pub const MAX_NAME_LEN: usize = 128;
pub const MAX_HANDLE_LEN: usize = 32;
pub const MAX_TEXT_LEN: usize = 2000;
pub const MAX_REASON_LEN: usize = 500;

pub struct ChannelRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub handle: String,
    pub subscribers_count: i64,
    pub category: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ChannelRow> for Channel {
    type Error = StoreError;

    fn try_from(row: ChannelRow) -> Result<Self> {
        let category = row
            .category
            .parse::<Category>()
            .map_err(|e| StoreError::CorruptRow(format!("channel {}: {}", row.id, e)))?;

        Ok(Channel {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            handle: row.handle,
            subscribers_count: row.subscribers_count,
            category,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

pub struct OfferRow {
    pub id: i64,
    pub channel_id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub advertiser_name: String,
    pub status: String,
    pub placement_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OfferRow> for Offer {
    type Error = StoreError;

    fn try_from(row: OfferRow) -> Result<Self> {
        let status = match (row.status.as_str(), row.placement_date, row.rejection_reason) {
            ("pending", None, None) => OfferStatus::Pending,
            ("accepted", Some(placement_date), None) => OfferStatus::Accepted { placement_date },
            ("rejected", None, Some(reason)) => OfferStatus::Rejected { reason },
            (status, _, _) => {
                return Err(StoreError::CorruptRow(format!(
                    "offer {} has status '{}' with mismatched placement/rejection fields",
                    row.id, status
                )));
            }
        };

        Ok(Offer {
            id: row.id,
            channel_id: row.channel_id,
            title: row.title,
            description: row.description,
            price: row.price,
            advertiser_name: row.advertiser_name,
            status,
            created_at: row.created_at,
        })
    }
}

pub struct WithdrawalRow {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub payment_method: String,
    pub payment_details: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<WithdrawalRow> for WithdrawalRequest {
    type Error = StoreError;

    fn try_from(row: WithdrawalRow) -> Result<Self> {
        let payment_method = row
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|e| StoreError::CorruptRow(format!("withdrawal {}: {}", row.id, e)))?;

        Ok(WithdrawalRequest {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            payment_method,
            payment_details: row.payment_details,
            status: row.status,
            created_at: row.created_at,
        })
    }
}

// -- Write inputs --

#[derive(Debug, Clone)]
pub struct NewChannel {
    pub user_id: i64,
    pub name: String,
    pub handle: String,
    pub subscribers_count: i64,
    pub category: Category,
    pub description: String,
}

impl NewChannel {
    /// Checks bounds and returns a copy with trimmed text and the handle's
    /// leading `@` removed.
    pub fn normalized(&self) -> Result<Self> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("channel name must not be empty"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(StoreError::validation(format!(
                "channel name is longer than {} characters",
                MAX_NAME_LEN
            )));
        }

        let handle = self.handle.trim().trim_start_matches('@');
        if handle.is_empty() {
            return Err(StoreError::validation("channel handle must not be empty"));
        }
        if handle.len() > MAX_HANDLE_LEN
            || !handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(StoreError::validation(format!(
                "channel handle '{}' must be up to {} letters, digits or underscores",
                handle, MAX_HANDLE_LEN
            )));
        }

        if self.subscribers_count < 0 {
            return Err(StoreError::validation("subscriber count must not be negative"));
        }

        let description = self.description.trim();
        if description.chars().count() > MAX_TEXT_LEN {
            return Err(StoreError::validation(format!(
                "description is longer than {} characters",
                MAX_TEXT_LEN
            )));
        }

        Ok(Self {
            user_id: self.user_id,
            name: name.to_string(),
            handle: handle.to_string(),
            subscribers_count: self.subscribers_count,
            category: self.category,
            description: description.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewOffer {
    pub channel_id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub advertiser_name: String,
    pub status: OfferStatus,
}

impl NewOffer {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(StoreError::validation("offer title must not be empty"));
        }
        if self.advertiser_name.trim().is_empty() {
            return Err(StoreError::validation("advertiser name must not be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(StoreError::validation("offer price must be a non-negative amount"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub user_id: i64,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_details: String,
}

impl NewWithdrawal {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(StoreError::validation("withdrawal amount must be positive"));
        }
        let details = self.payment_details.trim();
        if details.is_empty() {
            return Err(StoreError::validation("payment details must not be empty"));
        }
        if details.chars().count() > MAX_REASON_LEN {
            return Err(StoreError::validation(format!(
                "payment details are longer than {} characters",
                MAX_REASON_LEN
            )));
        }
        Ok(())
    }
}
