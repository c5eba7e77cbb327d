use sea_orm::DbErr;
use thiserror::Error;

/// Business and storage failures surfaced by the services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    /// Whether this is a storage failure rather than a business rule violation
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
