//! In-memory wallet provider
//!
//! Behaves like an injected browser wallet: accounts must be granted through
//! `request_accounts` before `list_accounts` reveals them, the user can reject
//! the prompt, and the wallet UI can push `accountsChanged` / `chainChanged`.

use crate::provider::{ProviderError, ProviderEvent, ProviderSubscription, WalletProvider};
use agentsphere_types::{Address, ChainId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
struct MockWallet {
    accounts: Vec<Address>,
    chain_id: ChainId,
    authorized: bool,
    reject_requests: bool,
    fail_chain_query: bool,
}

/// Scriptable wallet provider
pub struct MockWalletProvider {
    name: String,
    wallet: RwLock<MockWallet>,
    latency: Duration,
    chain_latency: Duration,
    events: broadcast::Sender<ProviderEvent>,
    request_calls: AtomicUsize,
    list_calls: AtomicUsize,
    chain_calls: AtomicUsize,
}

impl MockWalletProvider {
    /// Create a wallet holding `accounts` on mainnet, not yet authorized
    pub fn new(name: impl Into<String>, accounts: Vec<Address>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            name: name.into(),
            wallet: RwLock::new(MockWallet {
                accounts,
                chain_id: ChainId::MAINNET,
                authorized: false,
                reject_requests: false,
                fail_chain_query: false,
            }),
            latency: Duration::ZERO,
            chain_latency: Duration::ZERO,
            events,
            request_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            chain_calls: AtomicUsize::new(0),
        }
    }

    /// Report `chain_id` as the active network
    pub fn with_chain(self, chain_id: ChainId) -> Self {
        self.wallet.write().chain_id = chain_id;
        self
    }

    /// Treat the site as already granted (a previous session approved it)
    pub fn authorized(self) -> Self {
        self.wallet.write().authorized = true;
        self
    }

    /// Delay every account request by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delay every network query by `latency`
    pub fn with_chain_latency(mut self, latency: Duration) -> Self {
        self.chain_latency = latency;
        self
    }

    /// Make the user reject (or accept) future prompts
    pub fn set_reject_requests(&self, reject: bool) {
        self.wallet.write().reject_requests = reject;
    }

    /// Make the network query fail
    pub fn set_fail_chain_query(&self, fail: bool) {
        self.wallet.write().fail_chain_query = fail;
    }

    /// Push an event as the wallet UI would; returns the number of listeners reached
    pub fn emit(&self, event: ProviderEvent) -> usize {
        {
            let mut wallet = self.wallet.write();
            match &event {
                ProviderEvent::AccountsChanged(accounts) => {
                    wallet.authorized = !accounts.is_empty();
                    if !accounts.is_empty() {
                        wallet.accounts = accounts.clone();
                    }
                }
                ProviderEvent::ChainChanged(chain_id) => wallet.chain_id = *chain_id,
            }
        }
        self.events.send(event).unwrap_or(0)
    }

    /// Live listeners
    pub fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Number of `request_accounts` calls
    pub fn request_calls(&self) -> usize {
        self.request_calls.load(Ordering::Relaxed)
    }

    /// Number of `list_accounts` calls
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }

    /// Number of `chain_id` calls
    pub fn chain_calls(&self) -> usize {
        self.chain_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.request_calls.fetch_add(1, Ordering::Relaxed);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut wallet = self.wallet.write();
        if wallet.reject_requests {
            return Err(ProviderError::user_rejected());
        }
        wallet.authorized = true;
        Ok(wallet.accounts.clone())
    }

    async fn list_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        let wallet = self.wallet.read();
        if wallet.authorized {
            Ok(wallet.accounts.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        self.chain_calls.fetch_add(1, Ordering::Relaxed);
        if !self.chain_latency.is_zero() {
            tokio::time::sleep(self.chain_latency).await;
        }

        let wallet = self.wallet.read();
        if wallet.fail_chain_query {
            return Err(ProviderError::Request("eth_chainId timed out".to_string()));
        }
        Ok(wallet.chain_id)
    }

    fn subscribe(&self) -> ProviderSubscription {
        ProviderSubscription::new(self.events.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> Address {
        Address::parse(&format!("0x{}", hex_byte(n).repeat(20))).unwrap()
    }

    fn hex_byte(n: u8) -> String {
        format!("{:02x}", n)
    }

    #[tokio::test]
    async fn test_accounts_hidden_until_granted() {
        let provider = MockWalletProvider::new("MetaMask", vec![account(0xaa)]);
        assert!(provider.list_accounts().await.unwrap().is_empty());

        let granted = provider.request_accounts().await.unwrap();
        assert_eq!(granted, vec![account(0xaa)]);
        assert_eq!(provider.list_accounts().await.unwrap(), vec![account(0xaa)]);
        assert_eq!(provider.request_calls(), 1);
        assert_eq!(provider.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_rejection_and_chain_failure() {
        let provider = MockWalletProvider::new("MetaMask", vec![account(0xaa)]);
        provider.set_reject_requests(true);
        assert_eq!(
            provider.request_accounts().await,
            Err(ProviderError::user_rejected())
        );

        provider.set_fail_chain_query(true);
        assert!(provider.chain_id().await.is_err());
    }

    #[tokio::test]
    async fn test_emit_reaches_subscribers() {
        let provider = MockWalletProvider::new("MetaMask", vec![account(0xaa)]).authorized();
        assert_eq!(provider.emit(ProviderEvent::ChainChanged(ChainId(5))), 0);

        let mut sub = provider.subscribe();
        assert_eq!(provider.listener_count(), 1);
        provider.emit(ProviderEvent::AccountsChanged(vec![]));
        assert_eq!(sub.recv().await, Some(ProviderEvent::AccountsChanged(vec![])));
        assert!(provider.list_accounts().await.unwrap().is_empty());

        drop(sub);
        assert_eq!(provider.listener_count(), 0);
    }
}
