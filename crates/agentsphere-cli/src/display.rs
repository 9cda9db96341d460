//! Display utilities for the CLI

use agentsphere_marketplace::{AgentListing, Category};
use agentsphere_wallet::{ConnectionState, ConnectionStatus, SessionEvent};
use colored::*;

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

/// Print a success message
pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    println!("  {} {}", "✗".bright_red(), message.bright_red());
}

/// Print an info message
pub fn info(message: &str) {
    println!("  {} {}", "→".bright_blue(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message.yellow());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("      {}: {}", key, value.bright_cyan());
}

/// Print a labeled value
pub fn labeled(label: &str, value: &str) {
    println!("  {}: {}", label.bright_white(), value.bright_cyan());
}

/// One-line listing summary
pub fn listing_row(listing: &AgentListing) {
    println!(
        "  {:>3}  {:<16} {:<22} {:>10}  {} {}",
        listing.id.as_str().bright_black(),
        listing.name.bright_white().bold(),
        listing.creator,
        listing.price.to_string().bright_cyan(),
        "♥".bright_red(),
        listing.likes
    );
}

/// Category tile
pub fn category_row(category: &Category) {
    println!(
        "  {:<4} {:<14} {:>4} agents  {}",
        category.kind.icon().glyph().bright_magenta(),
        category.kind.display_name().bright_white().bold(),
        category.count,
        category.description.bright_black()
    );
}

/// The navigation-bar wallet button plus the demo flag
pub fn wallet_status(state: &ConnectionState) {
    let label = state.button_label();
    let badge = match state.status() {
        ConnectionStatus::Connected => label.bright_green(),
        ConnectionStatus::Connecting => label.yellow(),
        ConnectionStatus::Disconnected => label.bright_black(),
    };
    let demo = if state.is_demo_mode() {
        " [demo]".bright_magenta()
    } else {
        "".normal()
    };
    println!("  {} {}{}", "◆".bright_blue(), badge, demo);
    if let (Some(account), Some(chain_id)) = (state.account(), state.chain_id()) {
        kv("Account", account.as_str());
        kv("Network", &format!("{} ({})", chain_id.network_name(), chain_id));
    }
}

/// Session event line
pub fn event(event: &SessionEvent) {
    let detail = match event {
        SessionEvent::ConnectStarted { demo, .. } => {
            format!("connecting{}", if *demo { " (demo)" } else { "" })
        }
        SessionEvent::Connected {
            account,
            chain_id,
            restored,
            ..
        } => format!(
            "connected {} on chain {}{}",
            account.short(),
            chain_id,
            if *restored { " (restored)" } else { "" }
        ),
        SessionEvent::ConnectFailed { code, reason, .. } => format!("{}: {}", code, reason),
        SessionEvent::Disconnected { reason, .. } => format!("disconnected ({:?})", reason),
        SessionEvent::AccountChanged { account, .. } => format!("account -> {}", account.short()),
        SessionEvent::ChainChanged { chain_id, .. } => format!("chain -> {}", chain_id),
        SessionEvent::DemoModeChanged { enabled, .. } => {
            format!("demo mode {}", if *enabled { "on" } else { "off" })
        }
        SessionEvent::WalletMissing { message, .. } => message.clone(),
    };
    println!(
        "  {} {:<18} {}",
        "•".bright_black(),
        event.kind().bright_yellow(),
        detail
    );
}
