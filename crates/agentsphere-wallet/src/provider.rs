//! Injected wallet provider seam
//!
//! A browser wallet (MetaMask and friends) exposes an EIP-1193 surface: an
//! account request that may prompt the user, an account query that never
//! prompts, a network query, and `accountsChanged` / `chainChanged` events.
//! The session only ever talks to that surface through [`WalletProvider`].

use agentsphere_types::{Address, ChainId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

/// Errors reported by a provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// User rejected the request (EIP-1193 code 4001)
    #[error("request rejected (code {code}): {message}")]
    Rejected { code: i64, message: String },

    /// Requested method or account not authorized (code 4100)
    #[error("provider has not authorized the request")]
    Unauthorized,

    /// Transport or RPC failure
    #[error("provider request failed: {0}")]
    Request(String),

    /// Provider lost its connection to every chain (codes 4900/4901)
    #[error("provider is disconnected")]
    Disconnected,

    /// Event payload could not be decoded
    #[error("malformed {event} event: {reason}")]
    MalformedEvent { event: String, reason: String },
}

impl ProviderError {
    /// EIP-1193 user rejection code
    pub const USER_REJECTED: i64 = 4001;
    /// EIP-1193 unauthorized code
    pub const UNAUTHORIZED: i64 = 4100;

    /// The error a wallet returns when the user dismisses the prompt
    pub fn user_rejected() -> Self {
        Self::Rejected {
            code: Self::USER_REJECTED,
            message: "User rejected the request.".to_string(),
        }
    }

    /// Map an EIP-1193 RPC error
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            Self::USER_REJECTED => Self::Rejected { code, message },
            Self::UNAUTHORIZED => Self::Unauthorized,
            4900 | 4901 => Self::Disconnected,
            _ => Self::Request(format!("{} (code {})", message, code)),
        }
    }
}

/// Event pushed by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ProviderEvent {
    /// Account list changed; empty means the user disconnected in the wallet UI
    AccountsChanged(Vec<Address>),
    /// Active network changed
    ChainChanged(ChainId),
}

impl ProviderEvent {
    /// Decode a raw EIP-1193 event
    ///
    /// Returns `Ok(None)` for events the session does not track
    /// (`connect`, `disconnect`, `message`).
    pub fn from_eip1193(
        event: &str,
        payload: serde_json::Value,
    ) -> Result<Option<Self>, ProviderError> {
        let malformed = |reason: String| ProviderError::MalformedEvent {
            event: event.to_string(),
            reason,
        };

        match event {
            "accountsChanged" => {
                let raw: Vec<String> =
                    serde_json::from_value(payload).map_err(|e| malformed(e.to_string()))?;
                let accounts = raw
                    .iter()
                    .map(|a| Address::parse(a))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| malformed(e.to_string()))?;
                Ok(Some(Self::AccountsChanged(accounts)))
            }
            "chainChanged" => {
                let chain_id = match payload {
                    serde_json::Value::String(s) => ChainId::parse(&s),
                    serde_json::Value::Number(n) => n
                        .as_u64()
                        .map(ChainId)
                        .ok_or_else(|| agentsphere_types::AgentSphereError::InvalidChainId {
                            value: n.to_string(),
                            reason: "not an unsigned integer".to_string(),
                        }),
                    other => {
                        return Err(malformed(format!("unexpected payload {}", other)));
                    }
                }
                .map_err(|e| malformed(e.to_string()))?;
                Ok(Some(Self::ChainChanged(chain_id)))
            }
            _ => Ok(None),
        }
    }
}

/// Listener registration on a provider
///
/// Dropping the subscription removes the listener.
pub struct ProviderSubscription {
    receiver: broadcast::Receiver<ProviderEvent>,
}

impl ProviderSubscription {
    /// Wrap a broadcast receiver
    pub fn new(receiver: broadcast::Receiver<ProviderEvent>) -> Self {
        Self { receiver }
    }

    /// Next event in emission order, or `None` once the provider is gone
    pub async fn recv(&mut self) -> Option<ProviderEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "provider subscription lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// An injected wallet
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Wallet name for logs and prompts
    fn name(&self) -> &str;

    /// Ask the user for account access (`eth_requestAccounts`)
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Accounts already granted to this site, without prompting (`eth_accounts`)
    async fn list_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Active network (`eth_chainId`)
    async fn chain_id(&self) -> Result<ChainId, ProviderError>;

    /// Register for `accountsChanged` / `chainChanged`
    fn subscribe(&self) -> ProviderSubscription;
}
