use adlink_types::{Balance, Category, OfferStatus};
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, params};
use tracing::{info, warn};

use crate::models::{NewChannel, NewOffer};
use crate::queries::{insert_offer_on, upsert_balance_on};
use crate::{Database, Result, StoreError};

pub const SAMPLE_USER_ID: i64 = 12345;
pub const SAMPLE_CHANNEL_HANDLE: &str = "test_channel";

impl Database {
    /// Insert a demo channel with a few offers and a balance for
    /// [`SAMPLE_USER_ID`]. Safe to run on every start: existing sample rows
    /// are left alone and the balance is reset to the demo values.
    pub fn seed_sample_data(&self) -> Result<()> {
        let channel = NewChannel {
            user_id: SAMPLE_USER_ID,
            name: "Test channel".into(),
            handle: SAMPLE_CHANNEL_HANDLE.into(),
            subscribers_count: 5000,
            category: Category::Tech,
            description: "A channel about technology".into(),
        }
        .normalized()?;

        let placement_date = NaiveDate::from_ymd_opt(2024, 12, 1)
            .ok_or_else(|| StoreError::validation("invalid sample placement date"))?;
        let offers = [
            (
                "Crypto exchange ad",
                "A post about a new crypto exchange",
                15000.0,
                "CryptoExchange Ltd",
                OfferStatus::Pending,
            ),
            (
                "Mobile app promo",
                "A review post for a mobile trading app",
                8000.0,
                "TradingApp Inc",
                OfferStatus::Pending,
            ),
            (
                "Online courses ad",
                "A post about programming courses",
                12000.0,
                "EduTech",
                OfferStatus::Accepted { placement_date },
            ),
        ];

        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;

            tx.execute(
                "INSERT OR IGNORE INTO channels (user_id, name, handle, subscribers_count, category, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    channel.user_id,
                    channel.name,
                    channel.handle,
                    channel.subscribers_count,
                    channel.category.as_str(),
                    channel.description,
                ],
            )?;

            let owner: Option<(i64, i64)> = tx
                .query_row(
                    "SELECT id, user_id FROM channels WHERE handle = ?1",
                    [&channel.handle],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            let (channel_id, owner_id) = owner.ok_or_else(|| {
                StoreError::CorruptRow(format!("sample channel @{} missing", channel.handle))
            })?;

            if owner_id != SAMPLE_USER_ID {
                warn!(
                    "Handle @{} belongs to user {}, not adding sample offers",
                    channel.handle, owner_id
                );
            } else {
                let existing: i64 = tx.query_row(
                    "SELECT COUNT(*) FROM offers WHERE channel_id = ?1",
                    [channel_id],
                    |row| row.get(0),
                )?;
                if existing == 0 {
                    for (title, description, price, advertiser, status) in &offers {
                        insert_offer_on(
                            &tx,
                            &NewOffer {
                                channel_id,
                                title: (*title).into(),
                                description: (*description).into(),
                                price: *price,
                                advertiser_name: (*advertiser).into(),
                                status: status.clone(),
                            },
                        )?;
                    }
                }
            }

            let balance = Balance {
                balance: 25000.0,
                total_earned: 45000.0,
            };
            upsert_balance_on(&tx, SAMPLE_USER_ID, &balance)?;

            tx.commit()?;
            info!("Sample data seeded for user {}", SAMPLE_USER_ID);
            Ok(())
        })
    }
}
