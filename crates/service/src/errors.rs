use thiserror::Error;

/// Failures the core reports to the boundary. Nothing here is retried.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing input field.
    #[error("{0}")]
    InvalidArgument(String),
    /// A restaurant with the same (name, city) already exists.
    #[error("{0}")]
    DuplicateEntity(String),
    #[error("{0}")]
    NotFound(String),
    /// Operation rejected by policy.
    #[error("{0}")]
    NotSupported(String),
    /// Catch-all for unexpected persistence failures.
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound(format!("Entity with id '{}' can't be found.", id))
    }

    pub fn missing_field(field: &str) -> Self {
        Self::InvalidArgument(format!("Required field [{}] missed", field))
    }

    pub fn duplicate(name: &str, city: &str) -> Self {
        Self::DuplicateEntity(format!("Restaurant already exist with name {} and city {}", name, city))
    }

    /// Short stable label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidArgument(_) => "invalid_argument",
            ServiceError::DuplicateEntity(_) => "duplicate_entity",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::NotSupported(_) => "not_supported",
            ServiceError::Db(_) => "internal",
        }
    }
}
