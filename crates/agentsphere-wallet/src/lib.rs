//! AgentSphere Wallet - Wallet session for the NFA marketplace
//!
//! This crate owns the wallet connection lifecycle:
//! - `WalletSession`: the connect / disconnect / demo-mode state machine
//! - `WalletProvider`: the seam to an injected browser wallet
//! - `ActionGate`: deferring buy/offer actions until a wallet is connected
//! - `SessionEvent`: ordered transition notifications
//!
//! # Example
//!
//! ```no_run
//! use agentsphere_wallet::{SessionConfig, WalletSession};
//!
//! # async fn run() -> Result<(), agentsphere_wallet::ConfigError> {
//! let session = WalletSession::new(SessionConfig::default(), None).await?;
//! session.toggle_demo_mode();
//! assert!(session.is_connected());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod mock;
pub mod pending;
pub mod provider;
pub mod session;
pub mod state;

pub use config::{ReconnectPolicy, SessionConfig};
pub use error::{ConfigError, WalletError};
pub use events::{DisconnectReason, SessionEvent, INSTALL_WALLET_PROMPT};
pub use mock::MockWalletProvider;
pub use pending::{ActionGate, GateOutcome, PendingAction};
pub use provider::{ProviderError, ProviderEvent, ProviderSubscription, WalletProvider};
pub use session::{ConnectOutcome, WalletSession};
pub use state::{ConnectionState, ConnectionStatus};
