use rusqlite::ErrorCode;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a channel with handle '{0}' already exists")]
    DuplicateHandle(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("offer {0} not found")]
    OfferNotFound(i64),

    #[error("offer {id} is already {status}")]
    OfferAlreadyDecided { id: i64, status: String },

    #[error("corrupt row: {0}")]
    CorruptRow(String),

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Extended SQLite constraint code, if `err` is a constraint violation.
pub(crate) fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}
