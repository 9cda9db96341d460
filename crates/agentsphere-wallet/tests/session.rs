use std::sync::Arc;
use std::time::Duration;

use agentsphere_types::{Address, ChainId, DEMO_WALLET_ADDRESS};
use agentsphere_wallet::{
    ActionGate, ConnectOutcome, DisconnectReason, GateOutcome, MockWalletProvider, PendingAction,
    ProviderEvent, ReconnectPolicy, SessionConfig, SessionEvent, WalletError, WalletProvider,
    WalletSession,
};
use tokio::sync::broadcast;

fn account_aaa() -> Address {
    Address::parse("0xAAAaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap()
}

fn account_bbb() -> Address {
    Address::parse("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb").unwrap()
}

fn demo_account() -> Address {
    Address::parse(DEMO_WALLET_ADDRESS).unwrap()
}

fn config() -> SessionConfig {
    SessionConfig {
        demo_latency_ms: 25,
        ..Default::default()
    }
}

async fn live_session(provider: &Arc<MockWalletProvider>) -> WalletSession {
    WalletSession::new(config(), Some(provider.clone())).await.unwrap()
}

async fn connected_live_session() -> (Arc<MockWalletProvider>, WalletSession) {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![account_aaa()]));
    let session = live_session(&provider).await;
    assert_eq!(
        session.connect_wallet().await,
        ConnectOutcome::Connected(account_aaa())
    );
    (provider, session)
}

fn drain(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Give the provider listener a chance to run
async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_connect_without_provider_stays_disconnected() {
    let session = WalletSession::new(config(), None).await.unwrap();
    let mut events = session.subscribe();

    let outcome = session.connect_wallet().await;

    assert_eq!(outcome, ConnectOutcome::Failed(WalletError::ProviderUnavailable));
    assert!(!session.is_connected());
    assert!(!session.is_connecting());
    let events = drain(&mut events);
    assert_eq!(events.len(), 1);
    match &events[0] {
        SessionEvent::WalletMissing { message, .. } => {
            assert!(message.contains("install MetaMask"));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_demo_connect_installs_demo_identity() {
    let session = WalletSession::new(SessionConfig::default(), None).await.unwrap();
    session.toggle_demo_mode();
    session.disconnect_wallet();

    let connecting = session.connect_wallet();
    tokio::pin!(connecting);
    // First poll starts the attempt and parks on the simulated delay
    assert!(futures_poll_once(connecting.as_mut()).await.is_none());
    assert!(session.is_connecting());
    assert!(!session.is_connected());

    let outcome = connecting.await;
    assert_eq!(outcome, ConnectOutcome::Connected(demo_account()));
    assert!(session.is_connected());
    assert!(!session.is_connecting());
    assert_eq!(session.account(), Some(demo_account()));
    assert_eq!(session.chain_id(), Some(ChainId(1)));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_connect_future_still_resolves() {
    let session = WalletSession::new(SessionConfig::default(), None).await.unwrap();
    session.toggle_demo_mode();
    session.disconnect_wallet();
    let mut state = session.watch();

    {
        let connecting = session.connect_wallet();
        tokio::pin!(connecting);
        assert!(futures_poll_once(connecting.as_mut()).await.is_none());
    }
    assert!(session.is_connecting());

    state.wait_for(|s| s.is_connected()).await.unwrap();
    assert!(!session.is_connecting());
    assert_eq!(session.account(), Some(demo_account()));
}

#[tokio::test]
async fn test_provider_empty_accounts_disconnects() {
    let (provider, session) = connected_live_session().await;
    let mut state = session.watch();
    state.borrow_and_update();

    provider.emit(ProviderEvent::AccountsChanged(vec![]));
    state.changed().await.unwrap();

    assert!(!session.is_connected());
    assert_eq!(session.account(), None);
    assert_eq!(session.chain_id(), None);
}

#[tokio::test]
async fn test_toggle_demo_while_live_skips_requery() {
    let (provider, session) = connected_live_session().await;
    let requests = provider.request_calls();
    let lists = provider.list_calls();
    let chains = provider.chain_calls();

    assert!(session.toggle_demo_mode());

    assert!(session.is_demo_mode());
    assert_eq!(session.account(), Some(demo_account()));
    assert_eq!(session.chain_id(), Some(ChainId::MAINNET));
    assert!(!session.is_connecting());
    assert_eq!(provider.request_calls(), requests);
    assert_eq!(provider.list_calls(), lists);
    assert_eq!(provider.chain_calls(), chains);
}

// ============================================================================
// Properties
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_demo_connected_iff_last_op_was_resolved_connect() {
    let session = WalletSession::new(SessionConfig::default(), None).await.unwrap();
    session.toggle_demo_mode();
    session.disconnect_wallet();

    let script = [true, false, false, true, true, false, true];
    for connect in script {
        if connect {
            session.connect_wallet().await;
        } else {
            session.disconnect_wallet();
        }
        assert_eq!(session.is_connected(), connect);
    }
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let (_provider, session) = connected_live_session().await;
    let mut events = session.subscribe();

    assert!(session.disconnect_wallet());
    let once = session.state();
    assert!(!session.disconnect_wallet());
    assert_eq!(session.state(), once);

    let events = drain(&mut events);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        SessionEvent::Disconnected {
            reason: DisconnectReason::User,
            ..
        }
    ));
}

#[tokio::test]
async fn test_pending_action_fires_exactly_once() {
    let provider = Arc::new(
        MockWalletProvider::new("MetaMask", vec![account_aaa()])
            .with_latency(Duration::from_millis(10)),
    );
    let session = live_session(&provider).await;
    let mut gate = ActionGate::new(&session);

    gate.record(PendingAction::buy("1".into()));
    let (outcome, fired) = tokio::join!(session.connect_wallet(), gate.resumed());

    assert!(outcome.is_connected());
    assert_eq!(fired.map(|a| a.listing_id), Some("1".into()));
    for _ in 0..3 {
        assert!(session.is_connected());
        assert_eq!(gate.poll(), None);
    }
}

#[tokio::test]
async fn test_gate_request_resumes_after_connect() {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![account_aaa()]));
    let session = live_session(&provider).await;
    let mut gate = ActionGate::new(&session);

    let outcome = gate.request(&session, PendingAction::offer("2".into())).await;
    match outcome {
        GateOutcome::Resumed(action) => assert_eq!(action.listing_id.as_str(), "2"),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(gate.pending().is_none());
}

#[tokio::test]
async fn test_gate_request_discarded_on_rejection() {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![account_aaa()]));
    provider.set_reject_requests(true);
    let session = live_session(&provider).await;
    let mut gate = ActionGate::new(&session);

    let outcome = gate.request(&session, PendingAction::buy("3".into())).await;
    match outcome {
        GateOutcome::Discarded { action, outcome } => {
            assert_eq!(action.listing_id.as_str(), "3");
            assert!(matches!(
                outcome,
                ConnectOutcome::Failed(WalletError::ConnectRejected { .. })
            ));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(gate.pending().is_none());

    // A later connect must not resurrect the discarded action
    provider.set_reject_requests(false);
    assert!(session.connect_wallet().await.is_connected());
    assert_eq!(gate.poll(), None);
}

#[tokio::test]
async fn test_resumed_discards_action_when_connect_rejected() {
    let provider = Arc::new(
        MockWalletProvider::new("MetaMask", vec![account_aaa()])
            .with_latency(Duration::from_millis(10)),
    );
    provider.set_reject_requests(true);
    let session = live_session(&provider).await;
    let mut gate = ActionGate::new(&session);

    gate.record(PendingAction::buy("1".into()));
    let (outcome, fired) = tokio::join!(
        session.connect_wallet(),
        tokio::time::timeout(Duration::from_secs(5), gate.resumed())
    );

    assert!(matches!(
        outcome,
        ConnectOutcome::Failed(WalletError::ConnectRejected { .. })
    ));
    assert_eq!(fired, Ok(None));
    assert!(gate.pending().is_none());

    provider.set_reject_requests(false);
    assert!(session.connect_wallet().await.is_connected());
    assert_eq!(gate.poll(), None);
}

#[tokio::test]
async fn test_resumed_after_failed_connect_returns_immediately() {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![account_aaa()]));
    provider.set_fail_chain_query(true);
    let session = live_session(&provider).await;
    let mut gate = ActionGate::new(&session);

    gate.record(PendingAction::offer("4".into()));
    assert!(matches!(
        session.connect_wallet().await,
        ConnectOutcome::Failed(WalletError::ProviderQueryFailure { .. })
    ));

    let fired = tokio::time::timeout(Duration::from_secs(5), gate.resumed()).await;
    assert_eq!(fired, Ok(None));
    assert!(gate.pending().is_none());
}

#[tokio::test]
async fn test_demo_identity_ignores_provider_events() {
    let (provider, session) = connected_live_session().await;
    session.toggle_demo_mode();

    provider.emit(ProviderEvent::AccountsChanged(vec![account_bbb()]));
    provider.emit(ProviderEvent::ChainChanged(ChainId(137)));
    provider.emit(ProviderEvent::AccountsChanged(vec![]));
    settle().await;

    assert_eq!(session.account(), Some(demo_account()));
    assert_eq!(session.chain_id(), Some(ChainId::MAINNET));
    assert!(session.is_connected());
}

#[tokio::test]
async fn test_toggle_demo_passes_through_disconnected() {
    let (_provider, session) = connected_live_session().await;
    let mut events = session.subscribe();

    session.toggle_demo_mode();

    let kinds: Vec<_> = drain(&mut events).iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["disconnected", "demo_mode_changed", "connected"]);
}

// ============================================================================
// Live provider behaviour
// ============================================================================

#[tokio::test]
async fn test_live_connect_sets_account_and_chain() {
    let provider = Arc::new(
        MockWalletProvider::new("MetaMask", vec![account_aaa(), account_bbb()])
            .with_chain(ChainId(137)),
    );
    let session = live_session(&provider).await;
    let mut events = session.subscribe();

    let outcome = session.connect_wallet().await;

    assert_eq!(outcome, ConnectOutcome::Connected(account_aaa()));
    assert_eq!(session.chain_id(), Some(ChainId(137)));
    let kinds: Vec<_> = drain(&mut events).iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["connect_started", "connected"]);
}

#[tokio::test]
async fn test_rejected_connect_reverts() {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![account_aaa()]));
    provider.set_reject_requests(true);
    let session = live_session(&provider).await;

    let outcome = session.connect_wallet().await;

    assert!(matches!(
        outcome,
        ConnectOutcome::Failed(WalletError::ConnectRejected { .. })
    ));
    assert!(!session.is_connected());
    assert!(!session.is_connecting());

    // No automatic retry; a new gesture succeeds
    provider.set_reject_requests(false);
    assert!(session.connect_wallet().await.is_connected());
    assert_eq!(provider.request_calls(), 2);
}

#[tokio::test]
async fn test_chain_query_failure_reverts() {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![account_aaa()]));
    provider.set_fail_chain_query(true);
    let session = live_session(&provider).await;

    let outcome = session.connect_wallet().await;

    assert!(matches!(
        outcome,
        ConnectOutcome::Failed(WalletError::ProviderQueryFailure { .. })
    ));
    assert_eq!(session.account(), None);
    assert_eq!(session.chain_id(), None);
}

#[tokio::test]
async fn test_empty_grant_is_no_accounts() {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![]));
    let session = live_session(&provider).await;

    assert_eq!(
        session.connect_wallet().await,
        ConnectOutcome::Failed(WalletError::NoAccounts)
    );
    assert!(!session.is_connected());
}

#[tokio::test]
async fn test_disconnect_during_connect_discards_result() {
    let provider = Arc::new(
        MockWalletProvider::new("MetaMask", vec![account_aaa()])
            .with_latency(Duration::from_millis(50)),
    );
    let session = live_session(&provider).await;
    let mut events = session.subscribe();

    let (outcome, _) = tokio::join!(session.connect_wallet(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(session.is_connecting());
        session.disconnect_wallet();
    });

    assert_eq!(outcome, ConnectOutcome::Superseded);
    assert!(!session.is_connected());
    assert!(!session.is_connecting());
    let kinds: Vec<_> = drain(&mut events).iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["connect_started", "disconnected"]);
}

#[tokio::test]
async fn test_toggle_demo_during_live_connect_wins() {
    let provider = Arc::new(
        MockWalletProvider::new("MetaMask", vec![account_aaa()])
            .with_latency(Duration::from_millis(50)),
    );
    let session = live_session(&provider).await;

    let (outcome, _) = tokio::join!(session.connect_wallet(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.toggle_demo_mode();
    });

    assert_eq!(outcome, ConnectOutcome::Superseded);
    assert_eq!(session.account(), Some(demo_account()));
}

#[tokio::test]
async fn test_account_and_chain_swapped_in_place() {
    let (provider, session) = connected_live_session().await;
    let mut state = session.watch();
    state.borrow_and_update();

    provider.emit(ProviderEvent::AccountsChanged(vec![account_bbb()]));
    state.changed().await.unwrap();
    assert_eq!(session.account(), Some(account_bbb()));

    provider.emit(ProviderEvent::ChainChanged(ChainId(10)));
    state.changed().await.unwrap();
    assert_eq!(session.chain_id(), Some(ChainId(10)));
    assert!(session.is_connected());
}

#[tokio::test]
async fn test_provider_events_while_disconnected_are_ignored() {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![account_aaa()]));
    let session = live_session(&provider).await;

    provider.emit(ProviderEvent::AccountsChanged(vec![account_aaa()]));
    provider.emit(ProviderEvent::ChainChanged(ChainId(5)));
    settle().await;

    assert!(!session.is_connected());
    assert_eq!(session.chain_id(), None);
}

fn slow_chain_provider() -> Arc<MockWalletProvider> {
    Arc::new(
        MockWalletProvider::new("MetaMask", vec![account_aaa()])
            .with_chain_latency(Duration::from_millis(50)),
    )
}

#[tokio::test(start_paused = true)]
async fn test_account_switch_during_connect_is_applied() {
    let provider = slow_chain_provider();
    let session = live_session(&provider).await;

    let (outcome, _) = tokio::join!(session.connect_wallet(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        provider.emit(ProviderEvent::AccountsChanged(vec![account_bbb()]));
        provider.emit(ProviderEvent::ChainChanged(ChainId(137)));
    });

    assert_eq!(outcome, ConnectOutcome::Connected(account_bbb()));
    assert_eq!(session.account(), Some(account_bbb()));
    assert_eq!(session.chain_id(), Some(ChainId(137)));
    assert_eq!(provider.list_accounts().await.unwrap(), vec![account_bbb()]);
}

#[tokio::test(start_paused = true)]
async fn test_revoke_during_connect_reverts() {
    let provider = slow_chain_provider();
    let session = live_session(&provider).await;
    let mut events = session.subscribe();

    let (outcome, _) = tokio::join!(session.connect_wallet(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        provider.emit(ProviderEvent::AccountsChanged(vec![]));
    });

    assert_eq!(outcome, ConnectOutcome::Failed(WalletError::NoAccounts));
    assert!(!session.is_connected());
    assert!(!session.is_connecting());
    let kinds: Vec<_> = drain(&mut events).iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["connect_started", "connect_failed"]);
}

#[tokio::test(start_paused = true)]
async fn test_events_from_an_abandoned_connect_do_not_leak() {
    let provider = slow_chain_provider();
    let session = live_session(&provider).await;

    let (outcome, _) = tokio::join!(session.connect_wallet(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        provider.emit(ProviderEvent::ChainChanged(ChainId(10)));
        settle().await;
        session.disconnect_wallet();
    });
    assert_eq!(outcome, ConnectOutcome::Superseded);

    // Wallet moves back to mainnet while the site is disconnected
    provider.emit(ProviderEvent::ChainChanged(ChainId(1)));
    settle().await;

    assert!(session.connect_wallet().await.is_connected());
    assert_eq!(session.chain_id(), Some(ChainId(1)));
    assert_eq!(session.account(), Some(account_aaa()));
}

#[tokio::test]
async fn test_restore_on_start_uses_granted_accounts() {
    let provider = Arc::new(
        MockWalletProvider::new("MetaMask", vec![account_aaa()])
            .authorized()
            .with_chain(ChainId(8453)),
    );
    let session = live_session(&provider).await;

    assert_eq!(session.account(), Some(account_aaa()));
    assert_eq!(session.chain_id(), Some(ChainId(8453)));
    assert_eq!(provider.request_calls(), 0);
}

#[tokio::test]
async fn test_restore_disabled_starts_disconnected() {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![account_aaa()]).authorized());
    let session = WalletSession::new(
        SessionConfig {
            restore_on_start: false,
            ..config()
        },
        Some(provider.clone()),
    )
    .await
    .unwrap();

    assert!(!session.is_connected());
    assert_eq!(provider.list_calls(), 0);
}

#[tokio::test]
async fn test_reuse_granted_policy_skips_prompt() {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![account_aaa()]).authorized());
    let session = WalletSession::new(
        SessionConfig {
            restore_on_start: false,
            reconnect_policy: ReconnectPolicy::ReuseGranted,
            ..config()
        },
        Some(provider.clone()),
    )
    .await
    .unwrap();

    assert!(session.connect_wallet().await.is_connected());
    assert_eq!(provider.request_calls(), 0);

    // Default policy always prompts
    let prompting = WalletSession::new(
        SessionConfig {
            restore_on_start: false,
            ..config()
        },
        Some(provider.clone()),
    )
    .await
    .unwrap();
    assert!(prompting.connect_wallet().await.is_connected());
    assert_eq!(provider.request_calls(), 1);
}

#[tokio::test]
async fn test_start_in_demo_mode() {
    let provider = Arc::new(MockWalletProvider::new("MetaMask", vec![account_aaa()]).authorized());
    let session = WalletSession::new(
        SessionConfig {
            start_in_demo_mode: true,
            ..config()
        },
        Some(provider.clone()),
    )
    .await
    .unwrap();

    assert!(session.is_demo_mode());
    assert_eq!(session.account(), Some(demo_account()));
    assert_eq!(provider.list_calls(), 0);
}

#[tokio::test]
async fn test_toggle_demo_off_clears_identity() {
    let session = WalletSession::new(config(), None).await.unwrap();
    session.toggle_demo_mode();
    let mut events = session.subscribe();

    assert!(!session.toggle_demo_mode());

    assert!(!session.is_demo_mode());
    assert!(!session.is_connected());
    let events = drain(&mut events);
    assert!(matches!(
        events[0],
        SessionEvent::Disconnected {
            reason: DisconnectReason::DemoModeDisabled,
            ..
        }
    ));
    assert!(matches!(
        events[1],
        SessionEvent::DemoModeChanged { enabled: false, .. }
    ));
}

/// Poll a future once without blocking
async fn futures_poll_once<F: std::future::Future + Unpin>(fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        out = fut => Some(out),
        _ = std::future::ready(()) => None,
    }
}
