//! AgentSphere Types - Canonical domain types for the NFA agent marketplace
//!
//! This crate contains the foundational types shared by the wallet session,
//! the marketplace catalog and the CLI, with zero dependencies on other
//! agentsphere crates:
//!
//! - Identity types (`Address`, `ChainId`, `ListingId`)
//! - ETH-denominated prices (`EthAmount`)
//! - Listing, review and category types for the catalog
//! - Wallet-gated action kinds (buy / offer)
//!
//! # Demo identity
//!
//! The simulated wallet used in demo mode is fixed:
//!
//! ```text
//! account  = 0x71C7656EC7ab88b098defB751B7401B5f6d8976F
//! chain id = 1 (Ethereum mainnet)
//! ```

pub mod identity;
pub mod amount;
pub mod marketplace;
pub mod error;

pub use identity::*;
pub use amount::*;
pub use marketplace::*;
pub use error::*;

/// Version of the AgentSphere types schema
pub const TYPES_VERSION: &str = "0.1.0";

/// Account installed by the simulated demo wallet
pub const DEMO_WALLET_ADDRESS: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";

/// Chain reported by the simulated demo wallet (Ethereum mainnet)
pub const DEMO_CHAIN_ID: ChainId = ChainId::MAINNET;
