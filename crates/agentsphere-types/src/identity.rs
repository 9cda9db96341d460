//! Identity types for AgentSphere
//!
//! Wallet accounts and chains arrive from the injected provider as loosely
//! typed strings; everything past the provider boundary uses these wrappers.

use crate::{AgentSphereError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of an account in bytes
pub const ADDRESS_BYTES: usize = 20;

/// An externally-owned account (`0x` + 40 hex characters)
///
/// The original spelling (checksummed or not) is preserved for display;
/// equality and hashing ignore case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and validate an account string
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AgentSphereError::invalid_address(s, "missing 0x prefix"))?;

        let bytes = hex::decode(digits)
            .map_err(|e| AgentSphereError::invalid_address(s, e.to_string()))?;
        if bytes.len() != ADDRESS_BYTES {
            return Err(AgentSphereError::invalid_address(
                s,
                format!("expected {} bytes, got {}", ADDRESS_BYTES, bytes.len()),
            ));
        }

        Ok(Self(format!("0x{}", digits)))
    }

    /// Get the address as provided
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-case canonical form
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Shortened form for buttons and menus: `0x71C7...976F`
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl std::hash::Hash for Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_lowercase().hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = AgentSphereError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AgentSphereError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// Numeric chain identifier of the provider's active network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Ethereum mainnet
    pub const MAINNET: ChainId = ChainId(1);

    /// Parse a chain id from either a decimal (`"137"`) or a hex (`"0x89"`) string
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex_digits) => u64::from_str_radix(hex_digits, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(ChainId)
            .map_err(|e| AgentSphereError::InvalidChainId {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Get the numeric value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Hex form as emitted by providers (`0x1`)
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }

    /// Human name for well-known networks
    pub fn network_name(&self) -> &'static str {
        match self.0 {
            1 => "Ethereum Mainnet",
            5 => "Goerli",
            10 => "Optimism",
            56 => "BNB Smart Chain",
            137 => "Polygon",
            8453 => "Base",
            42161 => "Arbitrum One",
            11155111 => "Sepolia",
            _ => "Unknown Network",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = AgentSphereError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Identifier of a marketplace listing
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl ListingId {
    /// Create a listing id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ListingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
