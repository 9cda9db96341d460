//! Catalog commands - browse, search and inspect listings

use crate::display;
use agentsphere_marketplace::{
    CategoryKind, EthAmount, InMemoryRegistry, ListingId, ListingQuery, ListingRegistry, Shelf,
    SortBy,
};
use colored::*;

/// List a home-page shelf, or both
pub async fn browse(registry: &InMemoryRegistry, shelf: Option<Shelf>) -> anyhow::Result<()> {
    let shelves = match shelf {
        Some(shelf) => vec![shelf],
        None => vec![Shelf::Featured, Shelf::Trending],
    };
    for shelf in shelves {
        display::section(&format!("{:?} Agents", shelf));
        for listing in registry.shelf(shelf).await? {
            display::listing_row(&listing);
        }
    }
    Ok(())
}

/// List category tiles
pub async fn categories(registry: &InMemoryRegistry) -> anyhow::Result<()> {
    display::section("Categories");
    for category in registry.categories().await? {
        display::category_row(&category);
    }
    Ok(())
}

/// Search listings
pub async fn search(
    registry: &InMemoryRegistry,
    text: Option<String>,
    category: Option<String>,
    min: Option<String>,
    max: Option<String>,
    sort_by: SortBy,
) -> anyhow::Result<()> {
    let category = match category {
        Some(slug) => Some(
            CategoryKind::from_slug(&slug)
                .ok_or_else(|| anyhow::anyhow!("Unknown category: {}", slug))?,
        ),
        None => None,
    };
    let query = ListingQuery {
        text,
        category,
        price_min: min.as_deref().map(EthAmount::parse).transpose()?,
        price_max: max.as_deref().map(EthAmount::parse).transpose()?,
        sort_by,
    };

    let results = registry.search(&query).await?;
    display::section(&format!("Search Results ({})", results.len()));
    if results.is_empty() {
        display::info("No agents match those filters");
    }
    for listing in &results {
        display::listing_row(listing);
    }
    Ok(())
}

/// Show a listing's detail page
pub async fn show(registry: &InMemoryRegistry, id: &str) -> anyhow::Result<()> {
    let id = ListingId::new(id);
    let listing = registry.get_listing(&id).await?;

    display::section(&listing.name);
    println!("  {}", listing.description);
    println!();
    display::labeled("Creator", &listing.creator);
    display::labeled(
        "Category",
        &format!(
            "{} {}",
            listing.category.icon().glyph(),
            listing.category.display_name()
        ),
    );
    let price = match listing.price.to_usd_estimate() {
        Ok(usd) => format!("{} (~${} USD)", listing.price, usd),
        Err(_) => listing.price.to_string(),
    };
    display::labeled("Price", &price);
    display::labeled("Likes", &listing.likes.to_string());
    display::labeled("Purchases", &listing.estimated_purchases().to_string());
    display::labeled("Capabilities", &listing.capabilities.join(", "));
    display::labeled("Tags", &listing.tags.join(", "));

    if let Some(details) = &listing.details {
        if let Some(long) = &details.long_description {
            println!();
            println!("  {}", long.bright_black());
        }
        if !details.use_cases.is_empty() {
            println!();
            println!("  {}", "Use cases".bright_white().bold());
            for use_case in &details.use_cases {
                display::kv("•", use_case);
            }
        }
        if !details.requirements.is_empty() {
            println!("  {}", "Requirements".bright_white().bold());
            for requirement in &details.requirements {
                display::kv("•", requirement);
            }
        }
        if let Some(version) = &details.version {
            display::labeled("Version", version);
        }
    }

    if !listing.reviews.is_empty() {
        println!();
        println!(
            "  {} ({})",
            "Reviews".bright_white().bold(),
            listing.review_count
        );
        for review in &listing.reviews {
            println!(
                "    {} {} {}",
                review.user.bright_cyan(),
                review.date.format("%Y-%m-%d").to_string().bright_black(),
                review.comment
            );
        }
    }

    let related = registry.related(&id).await?;
    if !related.is_empty() {
        println!();
        println!("  {}", "Related".bright_white().bold());
        for other in &related {
            display::listing_row(other);
        }
    }
    Ok(())
}
