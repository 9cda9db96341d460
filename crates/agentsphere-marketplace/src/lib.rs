//! AgentSphere Marketplace - Browsing and checkout for NFA listings
//!
//! - Catalog: the built-in featured / trending agents and category tiles
//! - Registry: lookup, text search, filters, and related listings
//! - Checkout: simulated buy / offer gated behind a wallet connection

pub use agentsphere_types::{
    ActionKind, AgentListing, Category, CategoryIcon, CategoryKind, EthAmount, ListingDetails,
    ListingId, Review,
};

pub mod catalog;
pub mod checkout;
pub mod registry;

pub use catalog::*;
pub use checkout::*;
pub use registry::*;
