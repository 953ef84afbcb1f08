use thiserror::Error;

/// Failures surfaced by the store. `NotFound` maps to a 404 at the request
/// boundary; everything else is an unrecoverable storage fault (500, no retry).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("query error: {0}")]
    Query(diesel::result::Error),
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => StoreError::NotFound,
            other => StoreError::Query(other),
        }
    }
}
