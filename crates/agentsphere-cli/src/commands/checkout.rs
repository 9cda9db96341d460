//! Checkout commands - simulated buy and offer

use crate::commands::wallet::{drain_events, open_session, WalletOpts};
use crate::display;
use agentsphere_marketplace::{
    Acknowledgement, Checkout, CheckoutError, EthAmount, InMemoryRegistry, ListingId,
};
use agentsphere_wallet::SessionConfig;

/// Buy a listing at its price
pub async fn buy(
    registry: &InMemoryRegistry,
    config: &SessionConfig,
    opts: &WalletOpts,
    id: &str,
) -> anyhow::Result<()> {
    display::section("Buy Now");
    run(registry, config, opts, &ListingId::new(id), None).await
}

/// Make an offer on a listing
pub async fn offer(
    registry: &InMemoryRegistry,
    config: &SessionConfig,
    opts: &WalletOpts,
    id: &str,
    amount: &str,
) -> anyhow::Result<()> {
    display::section("Make Offer");
    let amount = EthAmount::parse(amount)?;
    run(registry, config, opts, &ListingId::new(id), Some(amount)).await
}

async fn run(
    registry: &InMemoryRegistry,
    config: &SessionConfig,
    opts: &WalletOpts,
    id: &ListingId,
    offer: Option<EthAmount>,
) -> anyhow::Result<()> {
    let (session, _provider) = open_session(config, opts).await?;
    let mut events = session.subscribe();

    if !session.is_connected() {
        display::info("Wallet not connected; connecting before continuing");
    }

    let result = {
        let mut checkout = Checkout::new(&session, registry);
        match offer {
            Some(amount) => checkout.offer(id, amount).await,
            None => checkout.buy(id).await,
        }
    };
    drain_events(&mut events);
    session.shutdown().await;

    match result {
        Ok(ack) => report(&ack),
        Err(CheckoutError::NotConnected { .. }) => {
            display::error("No wallet connected; nothing was submitted");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn report(ack: &Acknowledgement) {
    println!();
    display::success(&ack.message());
    display::kv("Listing", &format!("{} ({})", ack.listing_name, ack.listing_id));
    display::kv("Action", &ack.kind.to_string());
    display::kv("Account", ack.account.as_str());
    display::kv("Chain", &ack.chain_id.to_string());
    display::kv("Amount", &ack.amount.to_string());
    display::kv("Estimate", &format!("${} USD", ack.usd_estimate));
    if ack.demo {
        display::warning("Demo wallet: no transaction was sent");
    } else {
        display::info("Simulated only: no transaction was sent");
    }
}
