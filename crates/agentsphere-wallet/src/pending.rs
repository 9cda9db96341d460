//! Pending-action gating
//!
//! A buy or offer pressed while disconnected is recorded, a connect is
//! started, and the action fires once the session reports a connection.
//! The gate owns at most one pending action and hands it out at most once.

use crate::session::{ConnectOutcome, WalletSession};
use crate::state::ConnectionState;
use agentsphere_types::{ActionKind, ListingId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

/// A deferred wallet-gated intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    /// Buy or offer
    pub kind: ActionKind,
    /// Listing the action targets
    pub listing_id: ListingId,
    /// When the user pressed the button
    pub created_at: DateTime<Utc>,
}

impl PendingAction {
    pub fn new(kind: ActionKind, listing_id: ListingId) -> Self {
        Self {
            kind,
            listing_id,
            created_at: Utc::now(),
        }
    }

    pub fn buy(listing_id: ListingId) -> Self {
        Self::new(ActionKind::Buy, listing_id)
    }

    pub fn offer(listing_id: ListingId) -> Self {
        Self::new(ActionKind::Offer, listing_id)
    }
}

/// What happened to a gated action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Wallet was already connected; run the action now
    Ready(PendingAction),
    /// The action was deferred and the connect succeeded; run it now
    Resumed(PendingAction),
    /// The connect did not succeed; the action was dropped
    Discarded {
        action: PendingAction,
        outcome: ConnectOutcome,
    },
}

impl GateOutcome {
    /// The action to run, if any
    pub fn into_action(self) -> Option<PendingAction> {
        match self {
            Self::Ready(action) | Self::Resumed(action) => Some(action),
            Self::Discarded { .. } => None,
        }
    }
}

/// Holds the pending action for one page
pub struct ActionGate {
    state: watch::Receiver<ConnectionState>,
    pending: Option<PendingAction>,
}

impl ActionGate {
    /// Create a gate observing `session`
    pub fn new(session: &WalletSession) -> Self {
        Self {
            state: session.watch(),
            pending: None,
        }
    }

    /// The recorded action, if any
    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Record an action to resume after connect; returns the one it replaced
    ///
    /// Only connection changes after this call decide the action's fate.
    pub fn record(&mut self, action: PendingAction) -> Option<PendingAction> {
        debug!(kind = %action.kind, listing = %action.listing_id, "recording pending action");
        self.state.borrow_and_update();
        self.pending.replace(action)
    }

    /// Drop the pending action (the user dismissed the connect prompt)
    pub fn cancel(&mut self) -> Option<PendingAction> {
        let cancelled = self.pending.take();
        if let Some(action) = &cancelled {
            debug!(kind = %action.kind, listing = %action.listing_id, "pending action cancelled");
        }
        cancelled
    }

    /// Read the connection signal; yields the pending action once when connected
    pub fn poll(&mut self) -> Option<PendingAction> {
        if self.state.borrow_and_update().is_connected() {
            self.pending.take()
        } else {
            None
        }
    }

    /// Wait until the pending action can fire
    ///
    /// Returns `None` when nothing is pending or when the session goes away.
    /// A connect that settles without an account (rejected, failed, or
    /// abandoned) discards the action, so it cannot fire on a later connect.
    pub async fn resumed(&mut self) -> Option<PendingAction> {
        let mut settled = self.state.has_changed().unwrap_or(false);
        loop {
            self.pending.as_ref()?;
            let (connected, connecting) = {
                let state = self.state.borrow_and_update();
                (state.is_connected(), state.is_connecting())
            };
            if connected {
                return self.pending.take();
            }
            if settled && !connecting {
                if let Some(action) = self.pending.take() {
                    debug!(
                        kind = %action.kind,
                        listing = %action.listing_id,
                        "connect settled without an account; pending action discarded"
                    );
                }
                return None;
            }
            if self.state.changed().await.is_err() {
                return None;
            }
            settled = true;
        }
    }

    /// Gate `action` behind a wallet connection
    ///
    /// Connected: the action is returned immediately. Disconnected: it is
    /// recorded, a connect is started and the action is resumed or discarded
    /// depending on how the connect resolves.
    pub async fn request(&mut self, session: &WalletSession, action: PendingAction) -> GateOutcome {
        if session.is_connected() {
            return GateOutcome::Ready(action);
        }

        let deferred = action.clone();
        self.record(action);

        let outcome = session.connect_wallet().await;
        if outcome == ConnectOutcome::AlreadyConnecting {
            // Someone else's attempt is in flight; let it settle
            let _ = self.state.wait_for(|state| !state.is_connecting()).await;
        }

        match self.poll() {
            Some(action) => {
                info!(kind = %action.kind, listing = %action.listing_id, "resuming pending action");
                GateOutcome::Resumed(action)
            }
            None => {
                self.pending = None;
                debug!(?outcome, "connect did not succeed; pending action discarded");
                GateOutcome::Discarded {
                    action: deferred,
                    outcome,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionConfig;

    fn config() -> SessionConfig {
        SessionConfig {
            demo_latency_ms: 10,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_poll_fires_once() {
        let session = WalletSession::new(config(), None).await.unwrap();
        let mut gate = ActionGate::new(&session);
        gate.record(PendingAction::buy("1".into()));
        assert_eq!(gate.poll(), None);

        session.toggle_demo_mode();
        let fired = gate.poll();
        assert_eq!(fired.map(|a| a.kind), Some(ActionKind::Buy));
        assert_eq!(gate.poll(), None);
        assert_eq!(gate.poll(), None);
    }

    #[tokio::test]
    async fn test_record_replaces_and_cancel_discards() {
        let session = WalletSession::new(config(), None).await.unwrap();
        let mut gate = ActionGate::new(&session);
        assert_eq!(gate.record(PendingAction::buy("1".into())), None);
        let replaced = gate.record(PendingAction::offer("2".into()));
        assert_eq!(replaced.map(|a| a.kind), Some(ActionKind::Buy));

        assert!(gate.cancel().is_some());
        session.toggle_demo_mode();
        assert_eq!(gate.poll(), None);
        assert_eq!(gate.resumed().await, None);
    }

    #[tokio::test]
    async fn test_request_when_connected_is_ready() {
        let session = WalletSession::new(config(), None).await.unwrap();
        session.toggle_demo_mode();
        let mut gate = ActionGate::new(&session);

        let outcome = gate.request(&session, PendingAction::offer("3".into())).await;
        assert!(matches!(outcome, GateOutcome::Ready(_)));
        assert!(gate.pending().is_none());
    }
}
