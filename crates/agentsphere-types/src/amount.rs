//! ETH-denominated amounts
//!
//! Listing prices are quoted in ETH as decimal strings ("0.25"). Amounts are
//! held as `rust_decimal::Decimal` so prices and offers never pass through
//! floating point.

use crate::{AgentSphereError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places carried by ETH (wei precision)
pub const ETH_DECIMALS: u32 = 18;

/// Mock ETH/USD rate used for the price estimate shown next to a listing
pub const MOCK_ETH_USD_RATE: u32 = 1800;

/// An amount of ETH
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct EthAmount(Decimal);

impl EthAmount {
    /// Zero ETH
    pub const ZERO: EthAmount = EthAmount(Decimal::ZERO);

    /// Wrap a decimal value
    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AgentSphereError::InvalidAmount {
                value: value.to_string(),
                reason: "amount cannot be negative".to_string(),
            });
        }
        if value.scale() > ETH_DECIMALS {
            return Err(AgentSphereError::InvalidAmount {
                value: value.to_string(),
                reason: format!("more than {} decimal places", ETH_DECIMALS),
            });
        }
        Ok(Self(value))
    }

    /// Parse a human value such as `"0.25"`
    pub fn parse(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim()).map_err(|e| AgentSphereError::InvalidAmount {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(value)
    }

    /// Get the decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// USD estimate at the given rate, rounded to cents
    ///
    /// Fails when the product does not fit in a `Decimal`.
    pub fn to_usd(&self, rate: Decimal) -> Result<Decimal> {
        self.0
            .checked_mul(rate)
            .map(|usd| usd.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
            .ok_or_else(|| AgentSphereError::InvalidAmount {
                value: self.0.to_string(),
                reason: "too large to convert to USD".to_string(),
            })
    }

    /// USD estimate at the mock marketplace rate
    pub fn to_usd_estimate(&self) -> Result<Decimal> {
        self.to_usd(Decimal::from(MOCK_ETH_USD_RATE))
    }
}

impl Default for EthAmount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for EthAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", self.0.normalize())
    }
}

impl TryFrom<Decimal> for EthAmount {
    type Error = AgentSphereError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<EthAmount> for Decimal {
    fn from(amount: EthAmount) -> Self {
        amount.0
    }
}

impl FromStr for EthAmount {
    type Err = AgentSphereError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
