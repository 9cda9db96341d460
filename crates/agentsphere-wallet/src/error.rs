//! Wallet session error types
//!
//! Provider failures never escape the session as panics or unhandled errors:
//! they are translated into a `WalletError` after the state has been reverted.

use crate::provider::ProviderError;
use thiserror::Error;

/// Why a connect attempt did not produce a connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No injected wallet and not in demo mode
    #[error("No wallet provider found")]
    ProviderUnavailable,

    /// The user declined the connect request in their wallet
    #[error("Connect request rejected: {reason}")]
    ConnectRejected { reason: String },

    /// Account or network query failed
    #[error("Wallet provider query failed: {reason}")]
    ProviderQueryFailure { reason: String },

    /// The provider granted access but returned no accounts
    #[error("Wallet returned no accounts")]
    NoAccounts,
}

impl WalletError {
    /// Translate a failed account request
    pub fn from_request(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected { .. } | ProviderError::Unauthorized => Self::ConnectRejected {
                reason: err.to_string(),
            },
            other => Self::query(other),
        }
    }

    /// Translate a failed account-list or network query
    pub fn query(err: ProviderError) -> Self {
        Self::ProviderQueryFailure {
            reason: err.to_string(),
        }
    }

    /// Get an error code for display and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            Self::ConnectRejected { .. } => "CONNECT_REJECTED",
            Self::ProviderQueryFailure { .. } => "PROVIDER_QUERY_FAILURE",
            Self::NoAccounts => "NO_ACCOUNTS",
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File or environment source failed to load
    #[error("configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    /// A value failed validation
    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    /// Create an invalid-value error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_translation() {
        let rejected = WalletError::from_request(ProviderError::user_rejected());
        assert_eq!(rejected.error_code(), "CONNECT_REJECTED");

        let transport = WalletError::from_request(ProviderError::Request("timeout".into()));
        assert_eq!(transport.error_code(), "PROVIDER_QUERY_FAILURE");

        let unauthorized = WalletError::from_request(ProviderError::Unauthorized);
        assert!(matches!(unauthorized, WalletError::ConnectRejected { .. }));
    }
}
