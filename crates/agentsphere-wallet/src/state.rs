//! Connection state snapshot

use agentsphere_types::{Address, ChainId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// What consuming UI reads from the session
///
/// Snapshots are values: mutating a clone has no effect on the session.
/// `account` and `chain_id` are always both present or both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionState {
    account: Option<Address>,
    chain_id: Option<ChainId>,
    is_connecting: bool,
    is_demo_mode: bool,
}

impl ConnectionState {
    /// Active account
    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    /// Active chain
    pub fn chain_id(&self) -> Option<ChainId> {
        self.chain_id
    }

    /// True iff an account is present
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// True only while a connect attempt is in flight
    pub fn is_connecting(&self) -> bool {
        self.is_connecting
    }

    /// Whether the simulated wallet is selected
    pub fn is_demo_mode(&self) -> bool {
        self.is_demo_mode
    }

    /// Connected through a real provider
    pub fn is_live_connected(&self) -> bool {
        self.is_connected() && !self.is_demo_mode
    }

    pub fn status(&self) -> ConnectionStatus {
        if self.is_connected() {
            ConnectionStatus::Connected
        } else if self.is_connecting {
            ConnectionStatus::Connecting
        } else {
            ConnectionStatus::Disconnected
        }
    }

    /// Label for the wallet button
    pub fn button_label(&self) -> String {
        match (&self.account, self.is_connecting) {
            (Some(account), _) => account.short(),
            (None, true) => "Connecting...".to_string(),
            (None, false) => "Connect Wallet".to_string(),
        }
    }

    pub(crate) fn install(&mut self, account: Address, chain_id: ChainId) {
        self.account = Some(account);
        self.chain_id = Some(chain_id);
        self.is_connecting = false;
    }

    pub(crate) fn clear(&mut self) {
        self.account = None;
        self.chain_id = None;
        self.is_connecting = false;
    }

    pub(crate) fn set_connecting(&mut self, connecting: bool) {
        self.is_connecting = connecting;
    }

    pub(crate) fn set_demo_mode(&mut self, enabled: bool) {
        self.is_demo_mode = enabled;
    }

    pub(crate) fn set_account(&mut self, account: Address) {
        if self.account.is_some() {
            self.account = Some(account);
        }
    }

    pub(crate) fn set_chain_id(&mut self, chain_id: ChainId) {
        if self.chain_id.is_some() {
            self.chain_id = Some(chain_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentsphere_types::DEMO_WALLET_ADDRESS;

    fn demo_address() -> Address {
        Address::parse(DEMO_WALLET_ADDRESS).unwrap()
    }

    #[test]
    fn test_default_is_disconnected() {
        let state = ConnectionState::default();
        assert_eq!(state.status(), ConnectionStatus::Disconnected);
        assert!(!state.is_connected());
        assert_eq!(state.chain_id(), None);
        assert_eq!(state.button_label(), "Connect Wallet");
    }

    #[test]
    fn test_install_and_clear() {
        let mut state = ConnectionState::default();
        state.set_connecting(true);
        assert_eq!(state.status(), ConnectionStatus::Connecting);
        assert_eq!(state.button_label(), "Connecting...");

        state.install(demo_address(), ChainId::MAINNET);
        assert_eq!(state.status(), ConnectionStatus::Connected);
        assert!(!state.is_connecting());
        assert_eq!(state.button_label(), "0x71C7...976F");

        state.clear();
        assert_eq!(state, ConnectionState::default());
    }

    #[test]
    fn test_in_place_updates_require_connection() {
        let mut state = ConnectionState::default();
        state.set_account(demo_address());
        state.set_chain_id(ChainId(137));
        assert!(!state.is_connected());
        assert_eq!(state.chain_id(), None);
    }
}
