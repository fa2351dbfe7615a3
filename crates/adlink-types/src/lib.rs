pub mod api;
pub mod models;

pub use models::{
    Balance, Category, Channel, Offer, OfferDecision, OfferStatus, PaymentMethod,
    UnknownTag, WithdrawalRequest,
};
