use adlink_types::{Balance, Channel, Offer, OfferDecision, WithdrawalRequest};
use rusqlite::{Connection, OptionalExtension, Row, ffi, params};
use tracing::{debug, info, warn};

use crate::error::constraint_code;
use crate::models::{
    ChannelRow, MAX_REASON_LEN, NewChannel, NewOffer, NewWithdrawal, OfferRow, WithdrawalRow,
};
use crate::{Database, Result, StoreError};

const CHANNEL_COLUMNS: &str =
    "id, user_id, name, handle, subscribers_count, category, description, created_at";
const OFFER_COLUMNS: &str = "id, channel_id, title, description, price, advertiser_name, status, \
     placement_date, rejection_reason, created_at";

impl Database {
    // -- Channels --

    /// All channels owned by `user_id`, oldest first.
    pub fn list_channels_by_user(&self, user_id: i64) -> Result<Vec<Channel>> {
        self.with_conn(|conn| query_channels_by_user(conn, user_id))
    }

    /// Register a channel and return its id. A handle that is already taken
    /// (case-insensitively) yields `DuplicateHandle` and writes nothing.
    pub fn create_channel(&self, new: &NewChannel) -> Result<i64> {
        let channel = new.normalized()?;

        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO channels (user_id, name, handle, subscribers_count, category, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    channel.user_id,
                    channel.name,
                    channel.handle,
                    channel.subscribers_count,
                    channel.category.as_str(),
                    channel.description,
                ],
            );

            match inserted {
                Ok(_) => {
                    let id = conn.last_insert_rowid();
                    info!(
                        "Channel {} (@{}) created for user {}",
                        id, channel.handle, channel.user_id
                    );
                    Ok(id)
                }
                Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                    warn!("Duplicate channel handle @{}", channel.handle);
                    Err(StoreError::DuplicateHandle(channel.handle.clone()))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    // -- Offers --

    /// Offers are not created through the API; seeding and tests add them.
    pub fn insert_offer(&self, new: &NewOffer) -> Result<i64> {
        self.with_conn_mut(|conn| insert_offer_on(conn, new))
    }

    pub fn get_offer(&self, offer_id: i64) -> Result<Option<Offer>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {OFFER_COLUMNS} FROM offers WHERE id = ?1");
            conn.query_row(&sql, [offer_id], offer_row)
                .optional()?
                .map(Offer::try_from)
                .transpose()
        })
    }

    /// Offers targeting `channel_id`. An unknown channel simply has none.
    pub fn list_offers_by_channel(&self, channel_id: i64) -> Result<Vec<Offer>> {
        self.with_conn(|conn| query_offers_by_channel(conn, channel_id))
    }

    /// Move a pending offer to accepted or rejected.
    ///
    /// The update only matches rows still in `pending`, so two callers racing
    /// on the same offer cannot both succeed. A miss is then classified as
    /// `OfferNotFound` or `OfferAlreadyDecided`.
    pub fn update_offer_status(&self, offer_id: i64, decision: &OfferDecision) -> Result<()> {
        let (status, placement_date, rejection_reason) = match decision {
            OfferDecision::Accept { placement_date } => ("accepted", Some(*placement_date), None),
            OfferDecision::Reject { reason } => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return Err(StoreError::validation("rejection reason must not be empty"));
                }
                if reason.chars().count() > MAX_REASON_LEN {
                    return Err(StoreError::validation(format!(
                        "rejection reason is longer than {} characters",
                        MAX_REASON_LEN
                    )));
                }
                ("rejected", None, Some(reason))
            }
        };

        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE offers SET status = ?1, placement_date = ?2, rejection_reason = ?3
                 WHERE id = ?4 AND status = 'pending'",
                params![status, placement_date, rejection_reason, offer_id],
            )?;

            if changed == 1 {
                info!("Offer {} {}", offer_id, status);
                return Ok(());
            }

            let current: Option<String> = conn
                .query_row("SELECT status FROM offers WHERE id = ?1", [offer_id], |row| {
                    row.get(0)
                })
                .optional()?;

            match current {
                None => Err(StoreError::OfferNotFound(offer_id)),
                Some(current) => {
                    debug!("Offer {} is already {}, not marking {}", offer_id, current, status);
                    Err(StoreError::OfferAlreadyDecided {
                        id: offer_id,
                        status: current,
                    })
                }
            }
        })
    }

    // -- Balances --

    /// Stored balance, or zero if the user has none yet. The zero default is
    /// not written back.
    pub fn get_balance(&self, user_id: i64) -> Result<Balance> {
        self.with_conn(|conn| {
            let balance = conn
                .query_row(
                    "SELECT balance, total_earned FROM balances WHERE user_id = ?1",
                    [user_id],
                    |row| {
                        Ok(Balance {
                            balance: row.get(0)?,
                            total_earned: row.get(1)?,
                        })
                    },
                )
                .optional()?;

            Ok(balance.unwrap_or_default())
        })
    }

    /// Overwrite a user's balance. No API operation credits or debits; this
    /// backs sample-data seeding.
    pub fn set_balance(&self, user_id: i64, balance: &Balance) -> Result<()> {
        self.with_conn_mut(|conn| upsert_balance_on(conn, user_id, balance))
    }

    // -- Withdrawals --

    /// Record a pending withdrawal request. The balance is neither checked nor
    /// debited; requests are settled by hand outside this service.
    pub fn create_withdrawal(&self, new: &NewWithdrawal) -> Result<i64> {
        new.validate()?;

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO withdrawal_requests (user_id, amount, payment_method, payment_details)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    new.user_id,
                    new.amount,
                    new.payment_method.as_str(),
                    new.payment_details.trim(),
                ],
            )?;
            let id = conn.last_insert_rowid();
            info!(
                "Withdrawal request {} for user {}: {} via {}",
                id, new.user_id, new.amount, new.payment_method
            );
            Ok(id)
        })
    }

    pub fn list_withdrawals_by_user(&self, user_id: i64) -> Result<Vec<WithdrawalRequest>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, amount, payment_method, payment_details, status, created_at
                 FROM withdrawal_requests WHERE user_id = ?1 ORDER BY id",
            )?;

            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(WithdrawalRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        amount: row.get(2)?,
                        payment_method: row.get(3)?,
                        payment_details: row.get(4)?,
                        status: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(WithdrawalRequest::try_from).collect()
        })
    }
}

/// Validate and insert an offer on an already acquired connection, so the
/// same checks apply inside a seeding transaction.
pub(crate) fn insert_offer_on(conn: &Connection, new: &NewOffer) -> Result<i64> {
    new.validate()?;

    let inserted = conn.execute(
        "INSERT INTO offers (channel_id, title, description, price, advertiser_name,
                             status, placement_date, rejection_reason)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            new.channel_id,
            new.title,
            new.description,
            new.price,
            new.advertiser_name,
            new.status.as_str(),
            new.status.placement_date(),
            new.status.rejection_reason(),
        ],
    );

    match inserted {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            debug!("Offer {} added to channel {}", id, new.channel_id);
            Ok(id)
        }
        Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Err(
            StoreError::validation(format!("channel {} does not exist", new.channel_id)),
        ),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn upsert_balance_on(conn: &Connection, user_id: i64, balance: &Balance) -> Result<()> {
    for (field, value) in [("balance", balance.balance), ("total_earned", balance.total_earned)] {
        if !value.is_finite() || value < 0.0 {
            return Err(StoreError::validation(format!("{field} must be non-negative")));
        }
    }

    conn.execute(
        "INSERT INTO balances (user_id, balance, total_earned) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id) DO UPDATE SET
             balance = excluded.balance,
             total_earned = excluded.total_earned",
        params![user_id, balance.balance, balance.total_earned],
    )?;
    Ok(())
}

fn query_channels_by_user(conn: &Connection, user_id: i64) -> Result<Vec<Channel>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CHANNEL_COLUMNS} FROM channels WHERE user_id = ?1 ORDER BY id"
    ))?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(ChannelRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                handle: row.get(3)?,
                subscribers_count: row.get(4)?,
                category: row.get(5)?,
                description: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(keep_valid(rows, Channel::try_from))
}

fn query_offers_by_channel(conn: &Connection, channel_id: i64) -> Result<Vec<Offer>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {OFFER_COLUMNS} FROM offers WHERE channel_id = ?1 ORDER BY id"
    ))?;

    let rows = stmt
        .query_map([channel_id], offer_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(keep_valid(rows, Offer::try_from))
}

fn offer_row(row: &Row<'_>) -> rusqlite::Result<OfferRow> {
    Ok(OfferRow {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        price: row.get(4)?,
        advertiser_name: row.get(5)?,
        status: row.get(6)?,
        placement_date: row.get(7)?,
        rejection_reason: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Convert rows, logging and dropping any that fail validation so one bad
/// row does not hide the rest of a listing.
fn keep_valid<R, T>(rows: Vec<R>, convert: impl Fn(R) -> Result<T>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match convert(row) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping row: {}", e);
                None
            }
        })
        .collect()
}
