//! Session events
//!
//! Every transition is broadcast to subscribers (wallet button, settings
//! panel, CLI log) in the order the transitions happen.

use agentsphere_types::{Address, ChainId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message shown when a live connect is attempted without an injected wallet
pub const INSTALL_WALLET_PROMPT: &str =
    "Please install MetaMask or another Ethereum wallet to connect.";

/// Why the session left the connected state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisconnectReason {
    /// `disconnect_wallet()` was called
    User,
    /// The provider reported an empty account list
    ProviderRevoked,
    /// A live connection was dropped to make room for the demo identity
    DemoModeEnabled,
    /// The demo identity was removed
    DemoModeDisabled,
}

/// Wallet session events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A connect attempt began
    ConnectStarted {
        demo: bool,
        timestamp: DateTime<Utc>,
    },

    /// An account is now active
    Connected {
        account: Address,
        chain_id: ChainId,
        demo: bool,
        /// Picked up from a previously granted session at startup
        restored: bool,
        timestamp: DateTime<Utc>,
    },

    /// A connect attempt ended without a connection
    ConnectFailed {
        code: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// The active account was cleared
    Disconnected {
        reason: DisconnectReason,
        timestamp: DateTime<Utc>,
    },

    /// The provider switched accounts in place
    AccountChanged {
        account: Address,
        timestamp: DateTime<Utc>,
    },

    /// The provider switched networks in place
    ChainChanged {
        chain_id: ChainId,
        timestamp: DateTime<Utc>,
    },

    /// Demo mode flipped
    DemoModeChanged {
        enabled: bool,
        timestamp: DateTime<Utc>,
    },

    /// Live connect attempted with no injected wallet
    WalletMissing {
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl SessionEvent {
    /// Event name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectStarted { .. } => "connect_started",
            Self::Connected { .. } => "connected",
            Self::ConnectFailed { .. } => "connect_failed",
            Self::Disconnected { .. } => "disconnected",
            Self::AccountChanged { .. } => "account_changed",
            Self::ChainChanged { .. } => "chain_changed",
            Self::DemoModeChanged { .. } => "demo_mode_changed",
            Self::WalletMissing { .. } => "wallet_missing",
        }
    }

    /// Whether this event flips `is_connected` to true
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Whether this event flips `is_connected` to false
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = SessionEvent::Disconnected {
            reason: DisconnectReason::ProviderRevoked,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Disconnected");
        assert_eq!(json["reason"], "ProviderRevoked");
        assert_eq!(event.kind(), "disconnected");
        assert!(event.is_disconnect());
    }
}
