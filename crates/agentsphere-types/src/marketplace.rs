//! Marketplace types for AgentSphere
//!
//! Listings are NFA (non-fungible agent) offers: an AI agent with a price in
//! ETH, a creator, capability tags and community likes.

use crate::{EthAmount, ListingId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of agent
///
/// Each variant maps to exactly one icon; there is no lookup by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    Development,
    Design,
    Content,
    Analytics,
    Finance,
    Education,
    Health,
    Legal,
    Media,
    Travel,
    Music,
    Gaming,
}

impl CategoryKind {
    /// All categories in display order
    pub const ALL: [CategoryKind; 12] = [
        Self::Development,
        Self::Design,
        Self::Content,
        Self::Analytics,
        Self::Finance,
        Self::Education,
        Self::Health,
        Self::Legal,
        Self::Media,
        Self::Travel,
        Self::Music,
        Self::Gaming,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Design => "Design",
            Self::Content => "Content",
            Self::Analytics => "Analytics",
            Self::Finance => "Finance",
            Self::Education => "Education",
            Self::Health => "Health",
            Self::Legal => "Legal",
            Self::Media => "Media",
            Self::Travel => "Travel",
            Self::Music => "Music",
            Self::Gaming => "Gaming",
        }
    }

    /// URL slug (`/category/<slug>`)
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Design => "design",
            Self::Content => "content",
            Self::Analytics => "analytics",
            Self::Finance => "finance",
            Self::Education => "education",
            Self::Health => "health",
            Self::Legal => "legal",
            Self::Media => "media",
            Self::Travel => "travel",
            Self::Music => "music",
            Self::Gaming => "gaming",
        }
    }

    /// Icon rendered for the category
    pub fn icon(&self) -> CategoryIcon {
        match self {
            Self::Development => CategoryIcon::Code,
            Self::Design => CategoryIcon::Palette,
            Self::Content => CategoryIcon::FileText,
            Self::Analytics => CategoryIcon::BarChart,
            Self::Finance => CategoryIcon::DollarSign,
            Self::Education => CategoryIcon::GraduationCap,
            Self::Health => CategoryIcon::Heart,
            Self::Legal => CategoryIcon::Scale,
            Self::Media => CategoryIcon::Film,
            Self::Travel => CategoryIcon::Plane,
            Self::Music => CategoryIcon::Note,
            Self::Gaming => CategoryIcon::Gamepad,
        }
    }

    /// Resolve a slug
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.slug().eq_ignore_ascii_case(slug))
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Icon set used by category tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryIcon {
    Code,
    Palette,
    FileText,
    BarChart,
    DollarSign,
    GraduationCap,
    Heart,
    Scale,
    Film,
    Plane,
    Note,
    Gamepad,
}

impl CategoryIcon {
    /// Terminal glyph for the icon
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Code => "</>",
            Self::Palette => "◐",
            Self::FileText => "≣",
            Self::BarChart => "▥",
            Self::DollarSign => "$",
            Self::GraduationCap => "▲",
            Self::Heart => "♥",
            Self::Scale => "⚖",
            Self::Film => "▶",
            Self::Plane => "✈",
            Self::Note => "♪",
            Self::Gamepad => "◎",
        }
    }
}

/// A category tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Kind
    pub kind: CategoryKind,
    /// Short description
    pub description: String,
    /// Number of agents listed
    pub count: u32,
}

/// Extended listing details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetails {
    /// Long description
    pub long_description: Option<String>,
    /// Use cases
    pub use_cases: Vec<String>,
    /// Requirements
    pub requirements: Vec<String>,
    /// Version
    pub version: Option<String>,
}

/// A community review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Review id
    pub id: String,
    /// Reviewer handle
    pub user: String,
    /// Whether the reviewer liked the agent
    pub liked: bool,
    /// Date posted
    pub date: DateTime<Utc>,
    /// Comment
    pub comment: String,
}

/// An NFA agent listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentListing {
    /// Listing id
    pub id: ListingId,
    /// Agent name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Creator name
    pub creator: String,
    /// Category
    pub category: CategoryKind,
    /// Price
    pub price: EthAmount,
    /// Community likes
    pub likes: u32,
    /// Number of reviews
    pub review_count: u32,
    /// Capabilities
    pub capabilities: Vec<String>,
    /// Tags
    pub tags: Vec<String>,
    /// When listed
    pub created_at: DateTime<Utc>,
    /// When last updated
    pub updated_at: DateTime<Utc>,
    /// Reviews
    pub reviews: Vec<Review>,
    /// Extended details
    pub details: Option<ListingDetails>,
}

impl AgentListing {
    /// Estimated purchases shown on the detail page
    pub fn estimated_purchases(&self) -> u32 {
        self.review_count.saturating_mul(3)
    }
}

/// A wallet-gated user intent on a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Buy at the listed price
    Buy,
    /// Make an offer
    Offer,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Offer => write!(f, "offer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_slug_roundtrip() {
        for kind in CategoryKind::ALL {
            assert_eq!(CategoryKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(CategoryKind::from_slug("Finance"), Some(CategoryKind::Finance));
        assert_eq!(CategoryKind::from_slug("Gaming"), Some(CategoryKind::Gaming));
        assert_eq!(CategoryKind::from_slug("marketing"), None);
    }

    #[test]
    fn test_category_icons_are_distinct() {
        let icons: std::collections::HashSet<_> =
            CategoryKind::ALL.iter().map(|c| c.icon()).collect();
        assert_eq!(icons.len(), CategoryKind::ALL.len());
    }

    #[test]
    fn test_action_kind_serde() {
        assert_eq!(serde_json::to_string(&ActionKind::Offer).unwrap(), "\"offer\"");
    }
}
