//! Built-in listing catalog
//!
//! The marketplace ships with a fixed set of featured and trending agents and
//! the category tiles shown on the home page.

use agentsphere_types::{
    AgentListing, Category, CategoryKind, EthAmount, ListingDetails, ListingId, Result, Review,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Which home-page shelf a listing belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shelf {
    Featured,
    Trending,
}

/// The full catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub featured: Vec<AgentListing>,
    pub trending: Vec<AgentListing>,
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Build the built-in catalog
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self {
            categories: builtin_categories(),
            ..Default::default()
        };
        for seed in SEEDS {
            let listing = seed.to_listing()?;
            match seed.shelf {
                Shelf::Featured => catalog.featured.push(listing),
                Shelf::Trending => catalog.trending.push(listing),
            }
        }
        Ok(catalog)
    }

    /// Featured listings followed by trending ones
    pub fn all(&self) -> impl Iterator<Item = &AgentListing> {
        self.featured.iter().chain(self.trending.iter())
    }

    /// Number of listings across both shelves
    pub fn len(&self) -> usize {
        self.featured.len() + self.trending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Seed {
    id: &'static str,
    shelf: Shelf,
    name: &'static str,
    description: &'static str,
    creator: &'static str,
    price: &'static str,
    likes: u32,
    category: CategoryKind,
    capabilities: &'static [&'static str],
    tags: &'static [&'static str],
    created_at: &'static str,
    updated_at: &'static str,
    long_description: &'static str,
    use_cases: &'static [&'static str],
    requirements: &'static [&'static str],
    version: &'static str,
}

const SAMPLE_REVIEWS: [&str; 3] = [
    "This agent is incredible! It helped me solve complex problems in minutes that would have taken hours manually. The outputs are clean and ready to use.",
    "Very useful for my daily tasks. I've been using it for a few weeks and it has saved me so much time. Highly recommended!",
    "Good agent overall, but sometimes the responses could be more detailed. Still, it's worth the price for what it offers.",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    value
        .parse::<DateTime<Utc>>()
        .map_err(|e| agentsphere_types::AgentSphereError::invalid_input(field, e.to_string()))
}

impl Seed {
    fn to_listing(&self) -> Result<AgentListing> {
        let updated_at = timestamp("updated_at", self.updated_at)?;
        let reviews = SAMPLE_REVIEWS
            .iter()
            .enumerate()
            .map(|(i, comment)| Review {
                id: format!("{}-r{}", self.id, i + 1),
                user: format!("User{}", i + 1),
                liked: true,
                date: updated_at - Duration::days(i as i64),
                comment: comment.to_string(),
            })
            .collect();

        Ok(AgentListing {
            id: ListingId::new(self.id),
            name: self.name.to_string(),
            description: self.description.to_string(),
            creator: self.creator.to_string(),
            category: self.category,
            price: EthAmount::parse(self.price)?,
            likes: self.likes,
            review_count: self.likes,
            capabilities: owned(self.capabilities),
            tags: owned(self.tags),
            created_at: timestamp("created_at", self.created_at)?,
            updated_at,
            reviews,
            details: Some(ListingDetails {
                long_description: Some(self.long_description.to_string()),
                use_cases: owned(self.use_cases),
                requirements: owned(self.requirements),
                version: Some(self.version.to_string()),
            }),
        })
    }
}

fn builtin_categories() -> Vec<Category> {
    [
        (CategoryKind::Development, "Coding and development assistants to help build software faster and better.", 156),
        (CategoryKind::Design, "Design assistants for UI/UX, graphic design, and creative work.", 124),
        (CategoryKind::Content, "Content creation assistants for writing, editing, and marketing.", 98),
        (CategoryKind::Analytics, "Data analysis and business intelligence assistants.", 87),
        (CategoryKind::Finance, "Financial analysis and investment assistants.", 76),
        (CategoryKind::Education, "Educational and tutoring assistants for learning.", 112),
        (CategoryKind::Health, "Health and wellness assistants for personal wellbeing.", 94),
        (CategoryKind::Legal, "Legal assistants for document review and compliance.", 68),
    ]
    .into_iter()
    .map(|(kind, description, count)| Category {
        kind,
        description: description.to_string(),
        count,
    })
    .collect()
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "1",
        shelf: Shelf::Featured,
        name: "CodeAssist Pro",
        description: "Advanced coding assistant with real-time pair programming capabilities.",
        creator: "ChatAndBuild Labs",
        price: "0.25",
        likes: 342,
        category: CategoryKind::Development,
        capabilities: &["Code completion", "Bug detection", "Refactoring", "Documentation"],
        tags: &["coding", "development", "programming"],
        created_at: "2023-09-15T10:00:00Z",
        updated_at: "2023-10-20T14:30:00Z",
        long_description: "CodeAssist Pro is an advanced AI coding assistant that helps developers write better code faster. It provides real-time suggestions, identifies potential bugs, and offers refactoring options to improve code quality. With its pair programming capabilities, it's like having an expert developer by your side at all times.",
        use_cases: &[
            "Real-time code completion and suggestions",
            "Automated bug detection and fixes",
            "Code refactoring and optimization",
            "Documentation generation",
            "Learning new programming languages",
        ],
        requirements: &[
            "Compatible with VS Code, JetBrains IDEs, and web-based editors",
            "Supports JavaScript, TypeScript, Python, Java, and more",
            "Internet connection required for real-time suggestions",
        ],
        version: "2.3.0",
    },
    Seed {
        id: "2",
        shelf: Shelf::Featured,
        name: "DesignGenius",
        description: "UI/UX design assistant that helps create beautiful interfaces with wireframing and color palette suggestions.",
        creator: "PixelPerfect Studios",
        price: "0.35",
        likes: 256,
        category: CategoryKind::Design,
        capabilities: &["Wireframing", "Color palette", "Components", "Responsive design"],
        tags: &["design", "ui", "ux"],
        created_at: "2023-08-22T09:15:00Z",
        updated_at: "2023-10-18T11:45:00Z",
        long_description: "DesignGenius is your AI design partner that helps create beautiful and functional user interfaces. From wireframing to color palette selection, it assists designers in making informed decisions and creating cohesive designs. It can generate component suggestions based on your design system and ensure responsive layouts across all devices.",
        use_cases: &[
            "Wireframe generation from text descriptions",
            "Color palette suggestions based on brand guidelines",
            "Component library recommendations",
            "Responsive design checking",
            "Design system consistency validation",
        ],
        requirements: &[
            "Works with Figma, Adobe XD, and Sketch",
            "Supports web and mobile app design",
            "Exports to various formats including SVG and PNG",
        ],
        version: "1.8.5",
    },
    Seed {
        id: "3",
        shelf: Shelf::Featured,
        name: "DataWizard",
        description: "Data analysis and visualization assistant for business intelligence with powerful insights extraction.",
        creator: "AnalyticsPro",
        price: "0.45",
        likes: 189,
        category: CategoryKind::Analytics,
        capabilities: &["Data cleaning", "Analysis", "Visualization", "Reporting"],
        tags: &["data", "analytics", "business intelligence"],
        created_at: "2023-07-10T14:20:00Z",
        updated_at: "2023-10-15T16:30:00Z",
        long_description: "DataWizard transforms raw data into actionable insights through advanced analysis and beautiful visualizations. It automates data cleaning processes, identifies patterns and trends, and generates comprehensive reports. With natural language querying, you can ask questions about your data and receive instant answers with supporting visualizations.",
        use_cases: &[
            "Automated data cleaning and preparation",
            "Pattern and anomaly detection",
            "Interactive dashboard creation",
            "Natural language data querying",
            "Predictive analytics and forecasting",
        ],
        requirements: &[
            "Supports CSV, Excel, SQL databases, and API connections",
            "Works with Tableau, Power BI, and custom web dashboards",
            "Handles datasets up to 100GB in size",
        ],
        version: "3.2.1",
    },
    Seed {
        id: "4",
        shelf: Shelf::Featured,
        name: "ContentCraft",
        description: "Content creation assistant that helps generate engaging blog posts, social media content, and marketing copy.",
        creator: "WordSmith AI",
        price: "0.30",
        likes: 215,
        category: CategoryKind::Content,
        capabilities: &["Blog writing", "Social media", "Email campaigns", "SEO optimization"],
        tags: &["content", "writing", "marketing"],
        created_at: "2023-09-05T11:30:00Z",
        updated_at: "2023-10-22T09:15:00Z",
        long_description: "ContentCraft is an AI-powered content creation assistant that helps marketers, bloggers, and businesses generate engaging written content. From blog posts to social media updates, it can create content that resonates with your target audience while maintaining your brand voice. It also provides SEO optimization suggestions to improve content visibility.",
        use_cases: &[
            "Blog post generation and optimization",
            "Social media content calendar creation",
            "Email marketing campaign development",
            "Product description writing",
            "SEO-focused content strategy",
        ],
        requirements: &[
            "Integrates with WordPress, Medium, and major CMS platforms",
            "Supports multiple languages including English, Spanish, and French",
            "Connects with social media management tools",
        ],
        version: "2.1.3",
    },
    Seed {
        id: "5",
        shelf: Shelf::Featured,
        name: "FinanceGPT",
        description: "Financial analysis and investment assistant with market insights and portfolio management capabilities.",
        creator: "QuantEdge",
        price: "0.55",
        likes: 176,
        category: CategoryKind::Finance,
        capabilities: &["Market analysis", "Portfolio management", "Risk assessment", "Financial planning"],
        tags: &["finance", "investing", "trading"],
        created_at: "2023-08-15T08:45:00Z",
        updated_at: "2023-10-19T13:20:00Z",
        long_description: "FinanceGPT is your AI financial advisor, providing market analysis, investment recommendations, and portfolio management assistance. It tracks market trends, analyzes company fundamentals, and helps you make informed investment decisions. With risk assessment tools and financial planning capabilities, it's a comprehensive solution for individual investors and financial professionals.",
        use_cases: &[
            "Real-time market analysis and insights",
            "Portfolio diversification recommendations",
            "Risk assessment and mitigation strategies",
            "Retirement and financial goal planning",
            "Tax optimization suggestions",
        ],
        requirements: &[
            "Connects to major brokerages and financial data providers",
            "Supports stocks, bonds, ETFs, cryptocurrencies, and more",
            "Requires account linking for personalized recommendations",
        ],
        version: "2.4.7",
    },
    Seed {
        id: "6",
        shelf: Shelf::Featured,
        name: "LegalAssist",
        description: "Legal document analysis and contract review assistant with compliance checking and risk identification.",
        creator: "LawTech Solutions",
        price: "0.50",
        likes: 142,
        category: CategoryKind::Legal,
        capabilities: &["Contract review", "Compliance checking", "Risk identification", "Document drafting"],
        tags: &["legal", "contracts", "compliance"],
        created_at: "2023-07-25T15:10:00Z",
        updated_at: "2023-10-17T10:45:00Z",
        long_description: "LegalAssist is an AI-powered legal assistant that helps lawyers and businesses analyze legal documents, review contracts, and ensure compliance with relevant regulations. It can identify potential risks in agreements, suggest alternative clauses, and even assist in drafting new documents based on templates and requirements.",
        use_cases: &[
            "Contract review and risk identification",
            "Compliance checking against multiple jurisdictions",
            "Legal document drafting assistance",
            "Case law research and citation",
            "Due diligence process automation",
        ],
        requirements: &[
            "Supports PDF, Word, and plain text document formats",
            "Knowledge base covers US, EU, and UK legal frameworks",
            "Integrates with major legal document management systems",
        ],
        version: "1.9.2",
    },
    Seed {
        id: "7",
        shelf: Shelf::Trending,
        name: "VideoGenius",
        description: "Video editing and production assistant with scene suggestions, transitions, and effects recommendations.",
        creator: "MediaLabs",
        price: "0.40",
        likes: 198,
        category: CategoryKind::Media,
        capabilities: &["Video editing", "Scene suggestions", "Transitions", "Effects"],
        tags: &["video", "editing", "production"],
        created_at: "2023-09-20T13:15:00Z",
        updated_at: "2023-10-21T15:30:00Z",
        long_description: "VideoGenius is an AI video production assistant that helps creators edit and enhance their videos. It can suggest scene arrangements, recommend transitions and effects, and even generate B-roll footage suggestions. With its intelligent editing capabilities, it streamlines the video production process while maintaining creative control.",
        use_cases: &[
            "Automated video editing suggestions",
            "Scene arrangement optimization",
            "Transition and effect recommendations",
            "Color grading assistance",
            "Audio enhancement and synchronization",
        ],
        requirements: &[
            "Works with Adobe Premiere Pro, Final Cut Pro, and DaVinci Resolve",
            "Supports common video formats including MP4, MOV, and AVI",
            "Requires minimum 8GB RAM for optimal performance",
        ],
        version: "1.5.3",
    },
    Seed {
        id: "8",
        shelf: Shelf::Trending,
        name: "HealthCoach",
        description: "Personal health and wellness assistant with nutrition planning, workout routines, and health tracking.",
        creator: "WellnessAI",
        price: "0.35",
        likes: 267,
        category: CategoryKind::Health,
        capabilities: &["Nutrition planning", "Workout routines", "Health tracking", "Habit formation"],
        tags: &["health", "fitness", "wellness"],
        created_at: "2023-08-10T09:30:00Z",
        updated_at: "2023-10-16T14:15:00Z",
        long_description: "HealthCoach is your personal AI wellness assistant, providing customized nutrition plans, workout routines, and health tracking capabilities. It adapts to your goals, preferences, and progress, offering personalized recommendations to improve your overall wellbeing. With habit formation strategies and motivational support, it helps you maintain a healthy lifestyle long-term.",
        use_cases: &[
            "Personalized meal planning and nutrition advice",
            "Custom workout routines based on goals and equipment",
            "Health metrics tracking and progress visualization",
            "Sleep quality improvement suggestions",
            "Stress management and mindfulness practices",
        ],
        requirements: &[
            "Integrates with fitness trackers and smartwatches",
            "Connects with nutrition and workout apps",
            "Available on iOS and Android devices",
        ],
        version: "2.2.4",
    },
    Seed {
        id: "9",
        shelf: Shelf::Trending,
        name: "TravelPlanner",
        description: "Travel itinerary and booking assistant with personalized recommendations and local insights.",
        creator: "WanderWise",
        price: "0.30",
        likes: 221,
        category: CategoryKind::Travel,
        capabilities: &["Itinerary planning", "Booking assistance", "Local recommendations", "Budget management"],
        tags: &["travel", "vacation", "planning"],
        created_at: "2023-09-12T10:45:00Z",
        updated_at: "2023-10-20T11:30:00Z",
        long_description: "TravelPlanner is an AI travel assistant that helps you plan and book your perfect trip. It creates personalized itineraries based on your interests, budget, and travel style, while providing local insights and hidden gems. From flight and accommodation recommendations to daily activity scheduling, it handles all aspects of your travel planning.",
        use_cases: &[
            "Personalized travel itinerary creation",
            "Flight and accommodation booking assistance",
            "Local attraction and restaurant recommendations",
            "Budget tracking and optimization",
            "Real-time travel updates and adjustments",
        ],
        requirements: &[
            "Covers destinations worldwide with detailed information",
            "Integrates with major booking platforms and travel services",
            "Works offline with downloadable itineraries and maps",
        ],
        version: "1.7.2",
    },
    Seed {
        id: "10",
        shelf: Shelf::Trending,
        name: "MusicMuse",
        description: "Music composition and production assistant with melody generation, chord progression, and arrangement suggestions.",
        creator: "SonicLabs",
        price: "0.45",
        likes: 178,
        category: CategoryKind::Music,
        capabilities: &["Melody generation", "Chord progressions", "Arrangement", "Mixing assistance"],
        tags: &["music", "production", "composition"],
        created_at: "2023-08-05T16:20:00Z",
        updated_at: "2023-10-18T09:45:00Z",
        long_description: "MusicMuse is an AI music composition and production assistant that helps musicians create original music. It can generate melodies, suggest chord progressions, and provide arrangement ideas across various genres and styles. With its mixing and mastering assistance, it helps you achieve professional-quality sound in your productions.",
        use_cases: &[
            "Melody and chord progression generation",
            "Arrangement suggestions and structure optimization",
            "Instrument selection and sound design",
            "Mixing and mastering assistance",
            "Writer's block solutions with creative prompts",
        ],
        requirements: &[
            "Integrates with major DAWs including Ableton, Logic Pro, and FL Studio",
            "Supports MIDI and audio file import/export",
            "Works with VST plugins and virtual instruments",
        ],
        version: "2.0.1",
    },
    Seed {
        id: "11",
        shelf: Shelf::Trending,
        name: "EduTutor",
        description: "Educational tutoring assistant with personalized learning paths, interactive lessons, and progress tracking.",
        creator: "LearnSmart",
        price: "0.35",
        likes: 312,
        category: CategoryKind::Education,
        capabilities: &["Personalized tutoring", "Interactive lessons", "Progress tracking", "Adaptive learning"],
        tags: &["education", "tutoring", "learning"],
        created_at: "2023-07-15T11:30:00Z",
        updated_at: "2023-10-19T16:45:00Z",
        long_description: "EduTutor is an AI educational assistant that provides personalized tutoring across various subjects and grade levels. It creates customized learning paths based on individual needs and learning styles, offering interactive lessons and exercises. With its adaptive learning capabilities, it adjusts difficulty and focus areas based on student progress.",
        use_cases: &[
            "One-on-one tutoring in multiple subjects",
            "Personalized learning path creation",
            "Interactive problem-solving assistance",
            "Progress tracking and performance analysis",
            "Exam preparation and practice tests",
        ],
        requirements: &[
            "Covers K-12 curriculum and introductory college courses",
            "Supports multiple languages for global education",
            "Works on desktop and mobile devices with internet connection",
        ],
        version: "3.1.5",
    },
    Seed {
        id: "12",
        shelf: Shelf::Trending,
        name: "GameDesigner",
        description: "Game design and development assistant with level design, character creation, and gameplay mechanics suggestions.",
        creator: "PixelForge",
        price: "0.50",
        likes: 156,
        category: CategoryKind::Gaming,
        capabilities: &["Level design", "Character creation", "Gameplay mechanics", "Narrative development"],
        tags: &["game design", "development", "gaming"],
        created_at: "2023-09-08T14:15:00Z",
        updated_at: "2023-10-22T12:30:00Z",
        long_description: "GameDesigner is an AI game development assistant that helps creators design and build engaging games. From level design and character creation to gameplay mechanics and narrative development, it provides suggestions and solutions throughout the game development process. It can generate assets, balance gameplay elements, and even help with debugging.",
        use_cases: &[
            "Level design and environment creation",
            "Character design and balancing",
            "Gameplay mechanics development",
            "Narrative and quest design",
            "Asset generation and optimization",
        ],
        requirements: &[
            "Integrates with Unity, Unreal Engine, and Godot",
            "Supports 2D and 3D game development",
            "Compatible with major asset creation tools",
        ],
        version: "1.4.8",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.featured.len(), 6);
        assert_eq!(catalog.trending.len(), 6);
        assert_eq!(catalog.categories.len(), 8);

        let first = &catalog.featured[0];
        assert_eq!(first.name, "CodeAssist Pro");
        assert_eq!(first.price.value(), dec!(0.25));
        assert_eq!(first.estimated_purchases(), 1026);
        assert_eq!(first.reviews.len(), 3);
    }

    #[test]
    fn test_listing_ids_unique() {
        let catalog = Catalog::builtin().unwrap();
        let ids: std::collections::HashSet<_> = catalog.all().map(|l| l.id.clone()).collect();
        assert_eq!(ids.len(), catalog.len());
    }
}
