//! Listing registry

use crate::catalog::{Catalog, Shelf};
use agentsphere_types::{
    AgentListing, AgentSphereError, Category, CategoryKind, EthAmount, ListingId, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Maximum number of related listings shown on a detail page
pub const RELATED_LIMIT: usize = 4;

/// Search result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Most reviewed first
    #[default]
    Popular,
    /// Cheapest first
    Price,
    /// Most recently listed first
    Newest,
    /// Most liked first
    MostLiked,
}

/// Listing search filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Free text matched against name, description, creator and tags
    pub text: Option<String>,
    /// Restrict to one category
    pub category: Option<CategoryKind>,
    /// Inclusive lower price bound
    pub price_min: Option<EthAmount>,
    /// Inclusive upper price bound
    pub price_max: Option<EthAmount>,
    /// Ordering
    #[serde(default)]
    pub sort_by: SortBy,
}

impl ListingQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn category(category: CategoryKind) -> Self {
        Self {
            category: Some(category),
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Whether `listing` passes every filter
    pub fn matches(&self, listing: &AgentListing) -> bool {
        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            let needle = text.to_lowercase();
            let hit = listing.name.to_lowercase().contains(&needle)
                || listing.description.to_lowercase().contains(&needle)
                || listing.creator.to_lowercase().contains(&needle)
                || listing.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != listing.category) {
            return false;
        }
        if self.price_min.is_some_and(|min| listing.price < min) {
            return false;
        }
        if self.price_max.is_some_and(|max| listing.price > max) {
            return false;
        }
        true
    }

    fn sort(&self, listings: &mut [AgentListing]) {
        match self.sort_by {
            SortBy::Popular => listings.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
            SortBy::Price => listings.sort_by(|a, b| a.price.cmp(&b.price)),
            SortBy::Newest => listings.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortBy::MostLiked => listings.sort_by(|a, b| b.likes.cmp(&a.likes)),
        }
    }
}

/// Listing registry trait
#[async_trait::async_trait]
pub trait ListingRegistry: Send + Sync {
    /// Get a listing
    async fn get_listing(&self, id: &ListingId) -> Result<AgentListing>;

    /// Search listings
    async fn search(&self, query: &ListingQuery) -> Result<Vec<AgentListing>>;

    /// Listings on a home-page shelf
    async fn shelf(&self, shelf: Shelf) -> Result<Vec<AgentListing>>;

    /// Category tiles
    async fn categories(&self) -> Result<Vec<Category>>;

    /// Other listings in the same category
    async fn related(&self, id: &ListingId) -> Result<Vec<AgentListing>> {
        let listing = self.get_listing(id).await?;
        let mut related = self.search(&ListingQuery::category(listing.category)).await?;
        related.retain(|l| l.id != listing.id);
        related.truncate(RELATED_LIMIT);
        Ok(related)
    }
}

/// In-memory listing registry
pub struct InMemoryRegistry {
    listings: Arc<RwLock<HashMap<ListingId, AgentListing>>>,
    /// Insertion order, featured first
    order: Arc<RwLock<Vec<(ListingId, Shelf)>>>,
    categories: Vec<Category>,
}

impl InMemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            listings: Arc::new(RwLock::new(HashMap::new())),
            order: Arc::new(RwLock::new(Vec::new())),
            categories: Vec::new(),
        }
    }

    /// Create a registry holding `catalog`
    pub async fn from_catalog(catalog: Catalog) -> Self {
        let registry = Self {
            categories: catalog.categories,
            ..Self::new()
        };
        for listing in catalog.featured {
            registry.insert(listing, Shelf::Featured).await;
        }
        for listing in catalog.trending {
            registry.insert(listing, Shelf::Trending).await;
        }
        registry
    }

    /// Create a registry holding the built-in catalog
    pub async fn builtin() -> Result<Self> {
        Ok(Self::from_catalog(Catalog::builtin()?).await)
    }

    /// Add or replace a listing
    pub async fn insert(&self, listing: AgentListing, shelf: Shelf) {
        let id = listing.id.clone();
        let replaced = self.listings.write().await.insert(id.clone(), listing);
        let mut order = self.order.write().await;
        if replaced.is_some() {
            order.retain(|(existing, _)| existing != &id);
        }
        debug!(listing = %id, ?shelf, "listing registered");
        order.push((id, shelf));
    }

    /// Number of listings
    pub async fn len(&self) -> usize {
        self.listings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn collect(&self, keep: impl Fn(&AgentListing, Shelf) -> bool) -> Vec<AgentListing> {
        let listings = self.listings.read().await;
        let order = self.order.read().await;
        order
            .iter()
            .filter_map(|(id, shelf)| listings.get(id).map(|l| (l, *shelf)))
            .filter(|(listing, shelf)| keep(listing, *shelf))
            .map(|(listing, _)| listing.clone())
            .collect()
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ListingRegistry for InMemoryRegistry {
    async fn get_listing(&self, id: &ListingId) -> Result<AgentListing> {
        self.listings
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AgentSphereError::ListingNotFound {
                listing_id: id.to_string(),
            })
    }

    async fn search(&self, query: &ListingQuery) -> Result<Vec<AgentListing>> {
        if let (Some(min), Some(max)) = (query.price_min, query.price_max) {
            if min > max {
                return Err(AgentSphereError::invalid_input(
                    "price_min",
                    format!("{} is above price_max {}", min, max),
                ));
            }
        }
        let mut results = self.collect(|listing, _| query.matches(listing)).await;
        query.sort(&mut results);
        Ok(results)
    }

    async fn shelf(&self, shelf: Shelf) -> Result<Vec<AgentListing>> {
        Ok(self.collect(|_, s| s == shelf).await)
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }
}
