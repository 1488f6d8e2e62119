use thiserror::Error;

/// Broad classes of [`GuardError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised while configuring or installing a guard. Fatal, the guard is not installed.
    Configuration,
    /// An administrative call named something that was never configured.
    Lookup,
    /// The raw cookie store refused a write.
    Store,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GuardError {
    // Configuration Errors
    #[error("No cookie categories configured")]
    NoCategories,
    #[error("Cookie category configured twice: {0}")]
    DuplicateCategory(String),
    #[error("Invalid pattern for cookie category {category}: {reason}")]
    InvalidPattern { category: String, reason: String },
    #[error("Invalid guard configuration: {0}")]
    InvalidConfig(String),
    #[error("Environment does not support document.cookie")]
    CookiesUnsupported,
    #[error("Environment does not support or is blocking cookies from being set")]
    CookiesDisabled,
    #[error("Cannot redefine non-configurable cookie surface")]
    SurfaceLocked,
    #[error("Cookie guard is not installed on this surface")]
    NotInstalled,

    // Lookup Errors
    #[error("Cookie category not configured: {0}")]
    CategoryNotConfigured(String),

    // Store Errors
    #[error("Invalid cookie string: {0}")]
    InvalidCookie(String),
    #[error("Cookie {name} is {size} bytes, limit is {limit}")]
    CookieTooLarge {
        name: String,
        size: usize,
        limit: usize,
    },
    #[error("Cookie store rejected write for {name}: {reason}")]
    RawStoreWrite { name: String, reason: String },
    #[error("Transfer for category {category} left cookies in place: {failed:?}")]
    TransferIncomplete {
        category: String,
        failed: Vec<String>,
    },
}

impl GuardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GuardError::NoCategories
            | GuardError::DuplicateCategory(_)
            | GuardError::InvalidPattern { .. }
            | GuardError::InvalidConfig(_)
            | GuardError::CookiesUnsupported
            | GuardError::CookiesDisabled
            | GuardError::SurfaceLocked
            | GuardError::NotInstalled => ErrorKind::Configuration,
            GuardError::CategoryNotConfigured(_) => ErrorKind::Lookup,
            GuardError::InvalidCookie(_)
            | GuardError::CookieTooLarge { .. }
            | GuardError::RawStoreWrite { .. }
            | GuardError::TransferIncomplete { .. } => ErrorKind::Store,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    pub fn is_lookup_error(&self) -> bool {
        self.kind() == ErrorKind::Lookup
    }

    /// Create a category not configured error.
    pub fn category_not_configured(name: impl Into<String>) -> Self {
        GuardError::CategoryNotConfigured(name.into())
    }

    /// Create a raw store write error.
    pub fn raw_store_write(name: impl Into<String>, reason: impl Into<String>) -> Self {
        GuardError::RawStoreWrite {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
