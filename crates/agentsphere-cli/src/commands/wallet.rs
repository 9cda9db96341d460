//! Wallet commands - connect, inspect and exercise the wallet session

use crate::display;
use agentsphere_types::{Address, ChainId};
use agentsphere_wallet::{
    ConnectOutcome, MockWalletProvider, ProviderEvent, SessionConfig, SessionEvent,
    WalletProvider, WalletSession,
};
use clap::{Args, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Which injected wallet the terminal pretends to have
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WalletKind {
    /// No browser wallet installed
    None,
    /// An in-memory wallet that approves or rejects prompts as told
    Mock,
}

/// Options describing the simulated injected wallet
#[derive(Debug, Clone, Args)]
pub struct WalletOpts {
    /// Injected wallet to simulate
    #[arg(long = "wallet", global = true, value_enum, default_value = "mock")]
    pub wallet_kind: WalletKind,

    /// Account held by the simulated wallet
    #[arg(
        long,
        global = true,
        default_value = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B"
    )]
    pub account: String,

    /// Chain the simulated wallet is on (decimal or 0x-hex)
    #[arg(long, global = true, default_value = "1")]
    pub chain: String,

    /// The simulated wallet has already granted this site access
    #[arg(long, global = true)]
    pub authorized: bool,

    /// The user rejects the connect prompt
    #[arg(long, global = true)]
    pub reject: bool,

    /// Delay before the simulated wallet answers a prompt (ms)
    #[arg(long, global = true, default_value = "400")]
    pub latency_ms: u64,
}

/// Build the injected provider described by `opts`
pub fn build_provider(opts: &WalletOpts) -> anyhow::Result<Option<Arc<MockWalletProvider>>> {
    if opts.wallet_kind == WalletKind::None {
        return Ok(None);
    }
    let account = Address::parse(&opts.account)?;
    let chain_id = ChainId::parse(&opts.chain)?;
    let mut provider = MockWalletProvider::new("MockWallet", vec![account])
        .with_chain(chain_id)
        .with_latency(Duration::from_millis(opts.latency_ms));
    if opts.authorized {
        provider = provider.authorized();
    }
    provider.set_reject_requests(opts.reject);
    Ok(Some(Arc::new(provider)))
}

/// Open a session over the provider described by `opts`
pub async fn open_session(
    config: &SessionConfig,
    opts: &WalletOpts,
) -> anyhow::Result<(WalletSession, Option<Arc<MockWalletProvider>>)> {
    let provider = build_provider(opts)?;
    let injected = provider
        .clone()
        .map(|p| p as Arc<dyn WalletProvider>);
    let session = WalletSession::new(config.clone(), injected).await?;
    Ok((session, provider))
}

/// Print every event received so far
pub fn drain_events(events: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        display::event(&event);
    }
}

/// Run `connect_wallet()` behind a spinner
pub async fn connect_with_spinner(session: &WalletSession) -> anyhow::Result<ConnectOutcome> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("  {spinner:.green} {msg}")?);
    spinner.set_message("Connecting...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let outcome = session.connect_wallet().await;
    spinner.finish_and_clear();
    Ok(outcome)
}

/// Report a connect outcome
pub fn report_outcome(outcome: &ConnectOutcome) {
    match outcome {
        ConnectOutcome::Connected(account) => {
            display::success(&format!("Connected {}", account.short()))
        }
        ConnectOutcome::AlreadyConnected(account) => {
            display::info(&format!("Already connected as {}", account.short()))
        }
        ConnectOutcome::AlreadyConnecting => display::info("A connect is already in progress"),
        ConnectOutcome::Superseded => display::warning("Connect was cancelled"),
        ConnectOutcome::Failed(err) => display::error(&err.to_string()),
    }
}

/// Connect the wallet and show the resulting state
pub async fn connect(config: &SessionConfig, opts: &WalletOpts) -> anyhow::Result<()> {
    display::section("Connect Wallet");
    let (session, _provider) = open_session(config, opts).await?;
    let mut events = session.subscribe();

    let outcome = connect_with_spinner(&session).await?;
    drain_events(&mut events);
    println!();
    report_outcome(&outcome);
    display::wallet_status(&session.state());

    session.shutdown().await;
    Ok(())
}

/// Show the state a fresh session starts in
pub async fn status(config: &SessionConfig, opts: &WalletOpts) -> anyhow::Result<()> {
    display::section("Wallet Status");
    let (session, _provider) = open_session(config, opts).await?;

    display::labeled(
        "Provider",
        session.provider_name().unwrap_or("not installed"),
    );
    display::labeled(
        "Reconnect policy",
        &format!("{:?}", session.config().reconnect_policy),
    );
    display::wallet_status(&session.state());

    session.shutdown().await;
    Ok(())
}

/// Walk the session through a scripted sequence of user and wallet actions
pub async fn walkthrough(config: &SessionConfig, opts: &WalletOpts) -> anyhow::Result<()> {
    display::section("Wallet Session Walkthrough");
    let config = SessionConfig {
        start_in_demo_mode: false,
        ..config.clone()
    };
    let (session, provider) = open_session(&config, opts).await?;
    let Some(provider) = provider else {
        display::warning("Walkthrough needs a simulated wallet; drop --wallet none");
        return Ok(());
    };
    let mut events = session.subscribe();
    let mut state = session.watch();

    println!("{}", "1. Connect the injected wallet".bright_white());
    let outcome = connect_with_spinner(&session).await?;
    drain_events(&mut events);
    report_outcome(&outcome);
    if !outcome.is_connected() {
        session.shutdown().await;
        return Ok(());
    }

    println!("{}", "2. Switch account in the wallet".bright_white());
    state.borrow_and_update();
    let mut other = Address::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")?;
    if session.account().as_ref() == Some(&other) {
        other = Address::parse("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359")?;
    }
    provider.emit(ProviderEvent::AccountsChanged(vec![other]));
    state.changed().await?;
    drain_events(&mut events);

    println!("{}", "3. Switch network in the wallet".bright_white());
    let next = if session.chain_id() == Some(ChainId(137)) {
        ChainId(10)
    } else {
        ChainId(137)
    };
    provider.emit(ProviderEvent::ChainChanged(next));
    state.changed().await?;
    drain_events(&mut events);

    println!("{}", "4. Turn demo mode on".bright_white());
    session.toggle_demo_mode();
    drain_events(&mut events);

    println!("{}", "5. Wallet events are ignored in demo mode".bright_white());
    provider.emit(ProviderEvent::ChainChanged(ChainId(10)));
    tokio::time::sleep(Duration::from_millis(50)).await;
    drain_events(&mut events);
    display::wallet_status(&session.state());

    println!("{}", "6. Turn demo mode off".bright_white());
    session.toggle_demo_mode();
    drain_events(&mut events);

    println!("{}", "7. Reconnect, then revoke access from the wallet".bright_white());
    let outcome = connect_with_spinner(&session).await?;
    report_outcome(&outcome);
    if !outcome.is_connected() {
        drain_events(&mut events);
        session.shutdown().await;
        return Ok(());
    }
    state.borrow_and_update();
    provider.emit(ProviderEvent::AccountsChanged(vec![]));
    state.changed().await?;
    drain_events(&mut events);

    println!();
    display::wallet_status(&session.state());
    session.shutdown().await;
    Ok(())
}
