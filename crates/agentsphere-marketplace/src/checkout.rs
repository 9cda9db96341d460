//! Simulated buy / offer checkout
//!
//! Buying and making offers require a connected wallet. When none is active
//! the action is parked in an [`ActionGate`], a connect is started, and the
//! action completes if the connect succeeds. Nothing is signed or sent: the
//! result is an [`Acknowledgement`] echoing what would have been submitted.

use crate::registry::ListingRegistry;
use agentsphere_types::{
    ActionKind, Address, AgentListing, AgentSphereError, ChainId, EthAmount, ListingId,
};
use agentsphere_wallet::{ActionGate, ConnectOutcome, GateOutcome, PendingAction, WalletSession};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Checkout errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Listing lookup failed
    #[error(transparent)]
    Listing(#[from] AgentSphereError),

    /// Offer amount is not acceptable
    #[error("Invalid offer of {amount}: {reason}")]
    InvalidOffer { amount: EthAmount, reason: String },

    /// No wallet could be connected; the action was discarded
    #[error("Wallet not connected: {outcome:?}")]
    NotConnected { outcome: ConnectOutcome },
}

impl CheckoutError {
    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Listing(e) => e.error_code(),
            Self::InvalidOffer { .. } => "INVALID_OFFER",
            Self::NotConnected { .. } => "WALLET_NOT_CONNECTED",
        }
    }
}

/// What the user would have submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub listing_id: ListingId,
    pub listing_name: String,
    pub kind: ActionKind,
    /// Account that would sign
    pub account: Address,
    pub chain_id: ChainId,
    /// Listing price for a buy, the offered amount for an offer
    pub amount: EthAmount,
    /// `amount` at the mock ETH/USD rate
    pub usd_estimate: Decimal,
    /// Whether the account is the simulated demo wallet
    pub demo: bool,
    /// Whether the action waited for a wallet connection
    pub resumed: bool,
    pub acknowledged_at: DateTime<Utc>,
}

impl Acknowledgement {
    /// User-facing confirmation line
    pub fn message(&self) -> String {
        match self.kind {
            ActionKind::Buy => format!(
                "Purchase of {} for {} (~${}) simulated from {}",
                self.listing_name,
                self.amount,
                self.usd_estimate,
                self.account.short()
            ),
            ActionKind::Offer => format!(
                "Offer of {} (~${}) on {} simulated from {}",
                self.amount,
                self.usd_estimate,
                self.listing_name,
                self.account.short()
            ),
        }
    }
}

/// Wallet-gated checkout for one detail page
pub struct Checkout<'a> {
    session: &'a WalletSession,
    registry: &'a dyn ListingRegistry,
    gate: ActionGate,
}

impl<'a> Checkout<'a> {
    pub fn new(session: &'a WalletSession, registry: &'a dyn ListingRegistry) -> Self {
        Self {
            session,
            registry,
            gate: ActionGate::new(session),
        }
    }

    /// The action waiting for a connection, if any
    pub fn pending(&self) -> Option<&PendingAction> {
        self.gate.pending()
    }

    /// Buy `listing_id` at its listed price
    pub async fn buy(&mut self, listing_id: &ListingId) -> Result<Acknowledgement, CheckoutError> {
        let listing = self.registry.get_listing(listing_id).await?;
        let price = listing.price;
        let usd_estimate = price.to_usd_estimate()?;
        self.submit(listing, PendingAction::buy(listing_id.clone()), price, usd_estimate)
            .await
    }

    /// Offer `amount` for `listing_id`
    pub async fn offer(
        &mut self,
        listing_id: &ListingId,
        amount: EthAmount,
    ) -> Result<Acknowledgement, CheckoutError> {
        if !amount.is_positive() {
            return Err(CheckoutError::InvalidOffer {
                amount,
                reason: "must be greater than zero".to_string(),
            });
        }
        let usd_estimate = amount
            .to_usd_estimate()
            .map_err(|_| CheckoutError::InvalidOffer {
                amount,
                reason: "too large to price".to_string(),
            })?;
        let listing = self.registry.get_listing(listing_id).await?;
        self.submit(
            listing,
            PendingAction::offer(listing_id.clone()),
            amount,
            usd_estimate,
        )
        .await
    }

    async fn submit(
        &mut self,
        listing: AgentListing,
        action: PendingAction,
        amount: EthAmount,
        usd_estimate: Decimal,
    ) -> Result<Acknowledgement, CheckoutError> {
        let (action, resumed) = match self.gate.request(self.session, action).await {
            GateOutcome::Ready(action) => (action, false),
            GateOutcome::Resumed(action) => (action, true),
            GateOutcome::Discarded { action, outcome } => {
                warn!(
                    kind = %action.kind,
                    listing = %action.listing_id,
                    ?outcome,
                    "checkout abandoned without a wallet"
                );
                return Err(CheckoutError::NotConnected { outcome });
            }
        };

        let state = self.session.state();
        let (Some(account), Some(chain_id)) = (state.account().cloned(), state.chain_id()) else {
            // Disconnected between the gate firing and this read
            return Err(CheckoutError::NotConnected {
                outcome: ConnectOutcome::Superseded,
            });
        };

        let ack = Acknowledgement {
            listing_id: listing.id,
            listing_name: listing.name,
            kind: action.kind,
            account,
            chain_id,
            amount,
            usd_estimate,
            demo: state.is_demo_mode(),
            resumed,
            acknowledged_at: Utc::now(),
        };
        info!(
            kind = %ack.kind,
            listing = %ack.listing_id,
            account = %ack.account,
            amount = %ack.amount,
            resumed,
            "checkout acknowledged"
        );
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;
    use agentsphere_wallet::SessionConfig;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_buy_when_connected_is_immediate() {
        let registry = InMemoryRegistry::builtin().await.unwrap();
        let session = WalletSession::new(SessionConfig::default(), None).await.unwrap();
        session.toggle_demo_mode();

        let mut checkout = Checkout::new(&session, &registry);
        let ack = checkout.buy(&"1".into()).await.unwrap();
        assert_eq!(ack.kind, ActionKind::Buy);
        assert_eq!(ack.amount.value(), dec!(0.25));
        assert_eq!(ack.usd_estimate, dec!(450.00));
        assert!(ack.demo);
        assert!(!ack.resumed);
        assert!(ack.message().contains("CodeAssist Pro"));
    }

    #[tokio::test]
    async fn test_offer_must_be_positive() {
        let registry = InMemoryRegistry::builtin().await.unwrap();
        let session = WalletSession::new(SessionConfig::default(), None).await.unwrap();
        let mut checkout = Checkout::new(&session, &registry);

        let err = checkout.offer(&"1".into(), EthAmount::ZERO).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_OFFER");
        assert!(checkout.pending().is_none());
    }

    #[tokio::test]
    async fn test_offer_too_large_to_price_is_rejected() {
        let registry = InMemoryRegistry::builtin().await.unwrap();
        let session = WalletSession::new(SessionConfig::default(), None).await.unwrap();
        session.toggle_demo_mode();
        let mut checkout = Checkout::new(&session, &registry);

        let huge = EthAmount::parse("79228162514264337593543950335").unwrap();
        let err = checkout.offer(&"1".into(), huge).await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidOffer { .. }));
        assert_eq!(err.error_code(), "INVALID_OFFER");
    }

    #[tokio::test]
    async fn test_unknown_listing() {
        let registry = InMemoryRegistry::builtin().await.unwrap();
        let session = WalletSession::new(SessionConfig::default(), None).await.unwrap();
        let mut checkout = Checkout::new(&session, &registry);

        let err = checkout.buy(&"404".into()).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Listing(AgentSphereError::ListingNotFound { .. })
        ));
    }
}
