use thiserror::Error;

/// Failures while turning a decimal amount string into minor units.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount is not a decimal number")]
    InvalidNumeric,
    #[error("amount must not be negative")]
    Negative,
    #[error("amount does not fit in 64-bit minor units")]
    Overflow,
}

/// User-supplied payment URI text that cannot be accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("unsupported uri scheme '{scheme}'")]
    InvalidScheme { scheme: String },

    #[error("duplicate query parameter '{key}'")]
    DuplicateParameter { key: String },

    #[error("invalid amount '{value}': {source}")]
    InvalidAmount {
        value: String,
        #[source]
        source: AmountError,
    },

    #[error("invalid address '{address}'")]
    InvalidAddress { address: String },
}

impl UriError {
    /// Stable identifier the presentation layer maps to a user message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidScheme { .. } => "E_URI_SCHEME",
            Self::DuplicateParameter { .. } => "E_URI_DUPLICATE_KEY",
            Self::InvalidAmount { .. } => "E_URI_AMOUNT",
            Self::InvalidAddress { .. } => "E_URI_ADDRESS",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The caller handed over a value of a shape the operation never accepts.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Uri(#[from] UriError),
}

impl CoreError {
    pub(crate) fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
