//! Error types for AgentSphere

use thiserror::Error;

/// Result type for AgentSphere operations
pub type Result<T> = std::result::Result<T, AgentSphereError>;

/// AgentSphere error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentSphereError {
    // ========================================================================
    // Identity Errors
    // ========================================================================

    /// Account string is not a 20-byte hex address
    #[error("Invalid address {value}: {reason}")]
    InvalidAddress { value: String, reason: String },

    /// Chain id is neither decimal nor 0x-hex
    #[error("Invalid chain id {value}: {reason}")]
    InvalidChainId { value: String, reason: String },

    // ========================================================================
    // Amount Errors
    // ========================================================================

    /// Amount could not be parsed or is out of range
    #[error("Invalid amount {value}: {reason}")]
    InvalidAmount { value: String, reason: String },

    // ========================================================================
    // Marketplace Errors
    // ========================================================================

    /// Listing not found
    #[error("Listing {listing_id} not found")]
    ListingNotFound { listing_id: String },

    // ========================================================================
    // General Errors
    // ========================================================================

    /// Invalid input
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },
}

impl AgentSphereError {
    /// Create an invalid address error
    pub fn invalid_address(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Get an error code for display and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAddress { .. } => "INVALID_ADDRESS",
            Self::InvalidChainId { .. } => "INVALID_CHAIN_ID",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::ListingNotFound { .. } => "LISTING_NOT_FOUND",
            Self::InvalidInput { .. } => "INVALID_INPUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AgentSphereError::ListingNotFound {
            listing_id: "42".to_string(),
        };
        assert_eq!(err.error_code(), "LISTING_NOT_FOUND");
        assert_eq!(err.to_string(), "Listing 42 not found");
    }
}
