//! Wallet session state machine
//!
//! ```text
//!                connect_wallet()             success
//! Disconnected ──────────────────▶ Connecting ─────────▶ Connected
//!      ▲                              │ failure              │
//!      └──────────────────────────────┘                      │
//!      ▲        disconnect_wallet() / empty accountsChanged   │
//!      └─────────────────────────────────────────────────────┘
//! ```
//!
//! Demo mode is an orthogonal flag. Turning it on drops any live identity and
//! installs the fixed demo account without a connecting phase.
//!
//! Every mutation happens inside one `watch::Sender::send_if_modified`
//! closure, so transitions are serialized and the matching `SessionEvent` is
//! broadcast in transition order. Each connect attempt captures an epoch;
//! `disconnect_wallet()` and `toggle_demo_mode()` advance it, and a connect
//! result carrying a stale epoch is dropped. Provider events that arrive
//! while a live attempt is in flight are held and applied to its result.

use crate::config::{ReconnectPolicy, SessionConfig};
use crate::events::{DisconnectReason, SessionEvent, INSTALL_WALLET_PROMPT};
use crate::provider::{ProviderEvent, ProviderSubscription, WalletProvider};
use crate::state::ConnectionState;
use crate::{ConfigError, WalletError};
use agentsphere_types::{Address, ChainId};
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Result of `connect_wallet()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// The attempt installed this account
    Connected(Address),
    /// Another attempt is in flight; nothing was started
    AlreadyConnecting,
    /// An account is already active; nothing was started
    AlreadyConnected(Address),
    /// A disconnect or demo toggle happened mid-attempt; the result was dropped
    Superseded,
    /// The attempt failed and the session is disconnected
    Failed(WalletError),
}

impl ConnectOutcome {
    /// Whether the session ended up connected because of (or despite) this call
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_) | Self::AlreadyConnected(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct Attempt {
    epoch: u64,
    demo: bool,
}

/// Latest provider events seen during one connect attempt
#[derive(Debug, Default)]
struct DeferredEvents {
    epoch: u64,
    accounts: Option<Vec<Address>>,
    chain_id: Option<ChainId>,
}

impl DeferredEvents {
    fn record(&mut self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => self.accounts = Some(accounts),
            ProviderEvent::ChainChanged(chain_id) => self.chain_id = Some(chain_id),
        }
    }

    /// Overlay the held events on a successful attempt; a revoked grant fails it
    fn apply(
        self,
        result: Result<(Address, ChainId), WalletError>,
    ) -> Result<(Address, ChainId), WalletError> {
        let (mut account, mut chain_id) = result?;
        if let Some(accounts) = self.accounts {
            account = accounts.into_iter().next().ok_or(WalletError::NoAccounts)?;
        }
        if let Some(changed) = self.chain_id {
            chain_id = changed;
        }
        Ok((account, chain_id))
    }
}

struct SessionCore {
    config: SessionConfig,
    demo_account: Address,
    demo_chain_id: ChainId,
    provider: Option<Arc<dyn WalletProvider>>,
    state: watch::Sender<ConnectionState>,
    events: broadcast::Sender<SessionEvent>,
    epoch: AtomicU64,
    deferred: Mutex<DeferredEvents>,
}

impl SessionCore {
    fn emit(&self, event: SessionEvent) {
        // Ignore send errors (no receivers)
        let _ = self.events.send(event);
    }

    fn advance_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn begin_connect(&self) -> Result<Attempt, ConnectOutcome> {
        let mut result = Err(ConnectOutcome::AlreadyConnecting);
        self.state.send_if_modified(|state| {
            if state.is_connecting() {
                return false;
            }
            if let Some(account) = state.account() {
                result = Err(ConnectOutcome::AlreadyConnected(account.clone()));
                return false;
            }
            let demo = state.is_demo_mode();
            if !demo && self.provider.is_none() {
                warn!("connect requested but no wallet provider is installed");
                self.emit(SessionEvent::WalletMissing {
                    message: INSTALL_WALLET_PROMPT.to_string(),
                    timestamp: Utc::now(),
                });
                result = Err(ConnectOutcome::Failed(WalletError::ProviderUnavailable));
                return false;
            }

            let epoch = self.advance_epoch();
            *self.deferred.lock() = DeferredEvents {
                epoch,
                ..Default::default()
            };
            state.set_connecting(true);
            debug!(attempt = epoch, demo, "wallet connect started");
            self.emit(SessionEvent::ConnectStarted {
                demo,
                timestamp: Utc::now(),
            });
            result = Ok(Attempt { epoch, demo });
            true
        });
        result
    }

    async fn resolve_live(&self) -> Result<(Address, ChainId), WalletError> {
        let provider = self.provider.as_ref().ok_or(WalletError::ProviderUnavailable)?;

        let accounts = match self.config.reconnect_policy {
            ReconnectPolicy::RequestPermission => provider
                .request_accounts()
                .await
                .map_err(WalletError::from_request)?,
            ReconnectPolicy::ReuseGranted => {
                let granted = provider.list_accounts().await.map_err(WalletError::query)?;
                if granted.is_empty() {
                    provider
                        .request_accounts()
                        .await
                        .map_err(WalletError::from_request)?
                } else {
                    debug!(provider = provider.name(), "reusing previously granted accounts");
                    granted
                }
            }
        };

        let account = accounts.into_iter().next().ok_or(WalletError::NoAccounts)?;
        let chain_id = provider.chain_id().await.map_err(WalletError::query)?;
        Ok((account, chain_id))
    }

    fn finish_connect(
        &self,
        attempt: Attempt,
        result: Result<(Address, ChainId), WalletError>,
    ) -> ConnectOutcome {
        let mut outcome = ConnectOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if self.epoch.load(Ordering::SeqCst) != attempt.epoch {
                return false;
            }
            let deferred = std::mem::take(&mut *self.deferred.lock());
            let result = if deferred.epoch == attempt.epoch {
                deferred.apply(result)
            } else {
                result
            };
            match result {
                Ok((account, chain_id)) => {
                    state.install(account.clone(), chain_id);
                    info!(
                        account = %account,
                        chain_id = chain_id.value(),
                        demo = attempt.demo,
                        "wallet connected"
                    );
                    self.emit(SessionEvent::Connected {
                        account: account.clone(),
                        chain_id,
                        demo: attempt.demo,
                        restored: false,
                        timestamp: Utc::now(),
                    });
                    outcome = ConnectOutcome::Connected(account);
                }
                Err(err) => {
                    state.set_connecting(false);
                    warn!(error = %err, code = err.error_code(), "error connecting to wallet");
                    self.emit(SessionEvent::ConnectFailed {
                        code: err.error_code().to_string(),
                        reason: err.to_string(),
                        timestamp: Utc::now(),
                    });
                    outcome = ConnectOutcome::Failed(err);
                }
            }
            true
        });

        if outcome == ConnectOutcome::Superseded {
            debug!(attempt = attempt.epoch, "discarding connect result from a superseded attempt");
        }
        outcome
    }

    fn disconnect(&self, reason: DisconnectReason) -> bool {
        self.state.send_if_modified(|state| {
            if !state.is_connected() && !state.is_connecting() {
                return false;
            }
            self.advance_epoch();
            state.clear();
            info!(?reason, "wallet disconnected");
            self.emit(SessionEvent::Disconnected {
                reason,
                timestamp: Utc::now(),
            });
            true
        })
    }

    fn toggle_demo_mode(&self) -> bool {
        let mut enabled = false;
        self.state.send_modify(|state| {
            self.advance_epoch();
            let had_identity = state.is_connected() || state.is_connecting();

            if state.is_demo_mode() {
                state.clear();
                state.set_demo_mode(false);
                if had_identity {
                    self.emit(SessionEvent::Disconnected {
                        reason: DisconnectReason::DemoModeDisabled,
                        timestamp: Utc::now(),
                    });
                }
                self.emit(SessionEvent::DemoModeChanged {
                    enabled: false,
                    timestamp: Utc::now(),
                });
            } else {
                if had_identity {
                    state.clear();
                    self.emit(SessionEvent::Disconnected {
                        reason: DisconnectReason::DemoModeEnabled,
                        timestamp: Utc::now(),
                    });
                }
                state.set_demo_mode(true);
                self.emit(SessionEvent::DemoModeChanged {
                    enabled: true,
                    timestamp: Utc::now(),
                });
                state.install(self.demo_account.clone(), self.demo_chain_id);
                self.emit(SessionEvent::Connected {
                    account: self.demo_account.clone(),
                    chain_id: self.demo_chain_id,
                    demo: true,
                    restored: false,
                    timestamp: Utc::now(),
                });
            }
            enabled = state.is_demo_mode();
        });
        info!(enabled, "demo mode toggled");
        enabled
    }

    async fn restore(&self) {
        let Some(provider) = self.provider.clone() else {
            return;
        };
        let epoch = self.epoch.load(Ordering::SeqCst);

        let accounts = match provider.list_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!(error = %err, "failed to query granted accounts");
                return;
            }
        };
        let Some(account) = accounts.into_iter().next() else {
            debug!(provider = provider.name(), "no previously granted accounts");
            return;
        };
        let chain_id = match provider.chain_id().await {
            Ok(chain_id) => chain_id,
            Err(err) => {
                warn!(error = %err, "failed to query network");
                return;
            }
        };

        self.state.send_if_modified(|state| {
            if self.epoch.load(Ordering::SeqCst) != epoch
                || state.is_connected()
                || state.is_connecting()
                || state.is_demo_mode()
            {
                return false;
            }
            state.install(account.clone(), chain_id);
            info!(account = %account, chain_id = chain_id.value(), "restored wallet connection");
            self.emit(SessionEvent::Connected {
                account,
                chain_id,
                demo: false,
                restored: true,
                timestamp: Utc::now(),
            });
            true
        });
    }

    fn apply_provider_event(&self, event: ProviderEvent) {
        self.state.send_if_modified(|state| {
            if state.is_demo_mode() {
                debug!(?event, "ignoring provider event in demo mode");
                return false;
            }
            if state.is_connecting() {
                debug!(?event, "holding provider event until the connect resolves");
                self.deferred.lock().record(event);
                return false;
            }
            if !state.is_connected() {
                debug!(?event, "ignoring provider event while not connected");
                return false;
            }

            match event {
                ProviderEvent::AccountsChanged(accounts) => match accounts.into_iter().next() {
                    None => {
                        self.advance_epoch();
                        state.clear();
                        info!("wallet disconnected from provider");
                        self.emit(SessionEvent::Disconnected {
                            reason: DisconnectReason::ProviderRevoked,
                            timestamp: Utc::now(),
                        });
                        true
                    }
                    Some(account) if state.account() == Some(&account) => false,
                    Some(account) => {
                        state.set_account(account.clone());
                        info!(account = %account, "wallet account changed");
                        self.emit(SessionEvent::AccountChanged {
                            account,
                            timestamp: Utc::now(),
                        });
                        true
                    }
                },
                ProviderEvent::ChainChanged(chain_id) => {
                    if state.chain_id() == Some(chain_id) {
                        return false;
                    }
                    state.set_chain_id(chain_id);
                    info!(chain_id = chain_id.value(), "wallet chain changed");
                    self.emit(SessionEvent::ChainChanged {
                        chain_id,
                        timestamp: Utc::now(),
                    });
                    true
                }
            }
        });
    }
}

async fn run_listener(core: Arc<SessionCore>, mut subscription: ProviderSubscription) {
    while let Some(event) = subscription.recv().await {
        core.apply_provider_event(event);
    }
    debug!("provider event stream closed");
}

/// Single source of truth for wallet connection status
///
/// Construct one per application and hand references to the components that
/// need it. Dropping the session (or calling [`shutdown`](Self::shutdown))
/// removes its provider listener.
pub struct WalletSession {
    core: Arc<SessionCore>,
    listener: Option<JoinHandle<()>>,
}

impl WalletSession {
    /// Create a session over an optional injected provider
    ///
    /// Must be called inside a tokio runtime: the provider listener is spawned here.
    pub async fn new(
        config: SessionConfig,
        provider: Option<Arc<dyn WalletProvider>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (demo_account, demo_chain_id) = config.demo_identity()?;
        let (state, _) = watch::channel(ConnectionState::default());
        let (events, _) = broadcast::channel(config.event_capacity);

        let core = Arc::new(SessionCore {
            config,
            demo_account,
            demo_chain_id,
            provider,
            state,
            events,
            epoch: AtomicU64::new(0),
            deferred: Mutex::new(DeferredEvents::default()),
        });

        let listener = core.provider.as_ref().map(|provider| {
            debug!(provider = provider.name(), "subscribing to provider events");
            tokio::spawn(run_listener(core.clone(), provider.subscribe()))
        });

        if core.config.start_in_demo_mode {
            core.toggle_demo_mode();
        } else if core.config.restore_on_start {
            core.restore().await;
        }

        Ok(Self { core, listener })
    }

    /// Begin a connect attempt and wait for it to resolve
    ///
    /// Never fails loudly: provider errors revert the session to disconnected
    /// and come back as [`ConnectOutcome::Failed`]. The attempt runs on its
    /// own task, so dropping the returned future does not strand the session
    /// in `Connecting`.
    pub async fn connect_wallet(&self) -> ConnectOutcome {
        let attempt = match self.core.begin_connect() {
            Ok(attempt) => attempt,
            Err(outcome) => return outcome,
        };

        let core = self.core.clone();
        let task = tokio::spawn(async move {
            let result = if attempt.demo {
                tokio::time::sleep(core.config.demo_latency()).await;
                Ok((core.demo_account.clone(), core.demo_chain_id))
            } else {
                core.resolve_live().await
            };
            core.finish_connect(attempt, result)
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, attempt = attempt.epoch, "connect task did not complete");
                ConnectOutcome::Superseded
            }
        }
    }

    /// Clear the active account
    ///
    /// Idempotent. An in-flight connect is abandoned: its result will be dropped.
    /// Returns whether anything changed.
    pub fn disconnect_wallet(&self) -> bool {
        self.core.disconnect(DisconnectReason::User)
    }

    /// Flip demo mode; returns the new flag
    pub fn toggle_demo_mode(&self) -> bool {
        self.core.toggle_demo_mode()
    }

    /// Current snapshot
    pub fn state(&self) -> ConnectionState {
        self.core.state.borrow().clone()
    }

    pub fn account(&self) -> Option<Address> {
        self.core.state.borrow().account().cloned()
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        self.core.state.borrow().chain_id()
    }

    pub fn is_connected(&self) -> bool {
        self.core.state.borrow().is_connected()
    }

    pub fn is_connecting(&self) -> bool {
        self.core.state.borrow().is_connecting()
    }

    pub fn is_demo_mode(&self) -> bool {
        self.core.state.borrow().is_demo_mode()
    }

    /// Reactive view of the state
    pub fn watch(&self) -> watch::Receiver<ConnectionState> {
        self.core.state.subscribe()
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.core.events.subscribe()
    }

    /// Name of the injected wallet, if any
    pub fn provider_name(&self) -> Option<&str> {
        self.core.provider.as_deref().map(|p| p.name())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.core.config
    }

    /// Remove the provider listener and wait for it to stop
    pub async fn shutdown(mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            let _ = listener.await;
        }
        debug!("wallet session shut down");
    }
}

impl Drop for WalletSession {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}
