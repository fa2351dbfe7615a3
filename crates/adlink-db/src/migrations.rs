use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE channels (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id             INTEGER NOT NULL,
                name                TEXT NOT NULL,
                handle              TEXT NOT NULL UNIQUE COLLATE NOCASE,
                subscribers_count   INTEGER NOT NULL DEFAULT 0 CHECK (subscribers_count >= 0),
                category            TEXT NOT NULL,
                description         TEXT NOT NULL DEFAULT '',
                created_at          TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_channels_user ON channels(user_id);

            -- placement_date only on accepted offers, rejection_reason only on rejected ones
            CREATE TABLE offers (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                channel_id          INTEGER NOT NULL REFERENCES channels(id),
                title               TEXT NOT NULL,
                description         TEXT NOT NULL DEFAULT '',
                price               REAL NOT NULL CHECK (price >= 0),
                advertiser_name     TEXT NOT NULL,
                status              TEXT NOT NULL DEFAULT 'pending'
                                    CHECK (status IN ('pending', 'accepted', 'rejected')),
                placement_date      TEXT,
                rejection_reason    TEXT,
                created_at          TEXT NOT NULL DEFAULT (datetime('now')),
                CHECK ((status = 'accepted') = (placement_date IS NOT NULL)),
                CHECK ((status = 'rejected') = (rejection_reason IS NOT NULL))
            );

            CREATE INDEX idx_offers_channel ON offers(channel_id);

            CREATE TABLE balances (
                user_id             INTEGER PRIMARY KEY,
                balance             REAL NOT NULL DEFAULT 0 CHECK (balance >= 0),
                total_earned        REAL NOT NULL DEFAULT 0 CHECK (total_earned >= 0)
            );

            CREATE TABLE withdrawal_requests (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id             INTEGER NOT NULL,
                amount              REAL NOT NULL,
                payment_method      TEXT NOT NULL,
                payment_details     TEXT NOT NULL,
                status              TEXT NOT NULL DEFAULT 'pending',
                created_at          TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_withdrawals_user ON withdrawal_requests(user_id);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_twice_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn offer_columns_must_match_status() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        conn.execute(
            "INSERT INTO channels (user_id, name, handle, category) VALUES (1, 'c', 'c', 'tech')",
            [],
        )
        .unwrap();

        let accepted_without_date = conn.execute(
            "INSERT INTO offers (channel_id, title, price, advertiser_name, status)
             VALUES (1, 't', 1.0, 'a', 'accepted')",
            [],
        );
        assert!(accepted_without_date.is_err());

        let pending_with_reason = conn.execute(
            "INSERT INTO offers (channel_id, title, price, advertiser_name, rejection_reason)
             VALUES (1, 't', 1.0, 'a', 'low_price')",
            [],
        );
        assert!(pending_with_reason.is_err());
    }
}
