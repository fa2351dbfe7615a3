use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A string that did not name any known variant of a tag enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

/// Topic a channel is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tech,
    Business,
    Entertainment,
    Education,
    Lifestyle,
    News,
    Crypto,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Tech,
        Self::Business,
        Self::Entertainment,
        Self::Education,
        Self::Lifestyle,
        Self::News,
        Self::Crypto,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::Education => "education",
            Self::Lifestyle => "lifestyle",
            Self::News => "news",
            Self::Crypto => "crypto",
            Self::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownTag {
                kind: "category",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a user wants a withdrawal paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Qiwi,
    Yoomoney,
    Crypto,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [Self::Card, Self::Qiwi, Self::Yoomoney, Self::Crypto];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Qiwi => "qiwi",
            Self::Yoomoney => "yoomoney",
            Self::Crypto => "crypto",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownTag {
                kind: "payment method",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "channel_name")]
    pub name: String,
    #[serde(rename = "channel_username")]
    pub handle: String,
    pub subscribers_count: i64,
    pub category: Category,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of an offer. Each decided state carries exactly the field that
/// belongs to it, so an accepted offer always has a placement date and never
/// a rejection reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted {
        placement_date: NaiveDate,
    },
    Rejected {
        #[serde(rename = "rejection_reason")]
        reason: String,
    },
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted { .. } => "accepted",
            Self::Rejected { .. } => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn placement_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Accepted { placement_date } => Some(*placement_date),
            _ => None,
        }
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Self::Rejected { reason } => Some(reason),
            _ => None,
        }
    }
}

/// A channel owner's answer to a pending offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferDecision {
    Accept { placement_date: NaiveDate },
    Reject { reason: String },
}

impl From<OfferDecision> for OfferStatus {
    fn from(decision: OfferDecision) -> Self {
        match decision {
            OfferDecision::Accept { placement_date } => Self::Accepted { placement_date },
            OfferDecision::Reject { reason } => Self::Rejected { reason },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    pub channel_id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub advertiser_name: String,
    #[serde(flatten)]
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Balance {
    pub balance: f64,
    pub total_earned: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_details: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_parses_known_tags_only() {
        assert_eq!("tech".parse::<Category>().unwrap(), Category::Tech);
        assert_eq!("other".parse::<Category>().unwrap(), Category::Other);

        let err = "sports".parse::<Category>().unwrap_err();
        assert_eq!(err.kind, "category");
        assert_eq!(err.to_string(), "unknown category: 'sports'");
    }

    #[test]
    fn payment_method_round_trips_through_str() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
        assert!("paypal".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn offer_serializes_flat_with_only_the_matching_field() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut offer = Offer {
            id: 7,
            channel_id: 1,
            title: "Promo".into(),
            description: String::new(),
            price: 8000.0,
            advertiser_name: "TradingApp Inc".into(),
            status: OfferStatus::Pending,
            created_at,
        };

        let value = serde_json::to_value(&offer).unwrap();
        assert_eq!(value["status"], "pending");
        assert!(value.get("placement_date").is_none());
        assert!(value.get("rejection_reason").is_none());

        offer.status = OfferStatus::Accepted {
            placement_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        let value = serde_json::to_value(&offer).unwrap();
        assert_eq!(value["status"], "accepted");
        assert_eq!(value["placement_date"], "2024-06-01");
        assert!(value.get("rejection_reason").is_none());

        offer.status = OfferStatus::Rejected {
            reason: "low_price".into(),
        };
        let value = serde_json::to_value(&offer).unwrap();
        assert_eq!(value["status"], "rejected");
        assert_eq!(value["rejection_reason"], "low_price");
        assert!(value.get("placement_date").is_none());
    }

    #[test]
    fn channel_uses_mini_app_field_names() {
        let value = json!({
            "id": 1,
            "user_id": 12345,
            "channel_name": "Tech News",
            "channel_username": "technews",
            "subscribers_count": 5000,
            "category": "tech",
            "description": "",
            "created_at": "2024-05-01T10:00:00Z"
        });
        let channel: Channel = serde_json::from_value(value).unwrap();
        assert_eq!(channel.name, "Tech News");
        assert_eq!(channel.handle, "technews");
        assert_eq!(channel.category, Category::Tech);
    }

    #[test]
    fn decision_maps_onto_terminal_status() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let status: OfferStatus = OfferDecision::Accept { placement_date: date }.into();
        assert_eq!(status.placement_date(), Some(date));
        assert_eq!(status.rejection_reason(), None);

        let status: OfferStatus = OfferDecision::Reject {
            reason: "busy_schedule".into(),
        }
        .into();
        assert_eq!(status.as_str(), "rejected");
        assert_eq!(status.rejection_reason(), Some("busy_schedule"));
        assert!(!status.is_pending());
    }
}
