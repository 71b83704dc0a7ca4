//! Static catalog data: plantable trees, offered services, and the
//! service-request variants.
//!
//! Everything here is hard-coded page content; nothing is fetched or stored.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::types::{ItemId, Price};

/// Category label that matches every tree.
pub const ALL_CATEGORIES: &str = "All";

/// A tree offered for plantation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree {
    pub id: ItemId,
    pub name: &'static str,
    pub scientific_name: &'static str,
    pub description: &'static str,
    pub price: Price,
    pub image: &'static str,
    pub benefits: &'static [&'static str],
    pub category: &'static str,
    pub growth_time: &'static str,
    pub height: &'static str,
}

impl Tree {
    /// A single-quantity cart line for this tree, using its cart thumbnail.
    #[must_use]
    pub fn to_cart_line(&self) -> CartLine {
        CartLine::new(self.id, self.name, self.price, 1, thumbnail(self.image))
    }
}

/// Cart thumbnails use the same photo at 200x150 instead of 400x300.
fn thumbnail(image: &str) -> String {
    image.replace("w=400&h=300", "w=200&h=150")
}

/// The tree plantation catalog.
#[derive(Debug, Clone)]
pub struct TreeCatalog {
    trees: Vec<Tree>,
}

impl TreeCatalog {
    #[must_use]
    pub fn new(trees: Vec<Tree>) -> Self {
        Self { trees }
    }

    /// The six native trees shown on the catalog page.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Tree {
                id: ItemId::new(1),
                name: "Neem Tree",
                scientific_name: "Azadirachta indica",
                description: "Natural pesticide and medicinal tree. Excellent for air purification and traditional medicine.",
                price: Price::rupees(150),
                image: "https://images.unsplash.com/photo-1509316975850-ff9c5deb0cd9?auto=format&fit=crop&w=400&h=300",
                benefits: &["Air Purification", "Medicinal Uses", "Natural Pesticide"],
                category: "Medicinal",
                growth_time: "2-3 years",
                height: "15-20 meters",
            },
            Tree {
                id: ItemId::new(2),
                name: "Banyan Tree",
                scientific_name: "Ficus benghalensis",
                description: "Sacred tree providing excellent shade and oxygen. Perfect for community gathering spaces.",
                price: Price::rupees(200),
                image: "https://images.unsplash.com/photo-1513836279014-a89f7a76ae86?auto=format&fit=crop&w=400&h=300",
                benefits: &["Shade Provider", "Oxygen Production", "Cultural Significance"],
                category: "Shade",
                growth_time: "3-5 years",
                height: "20-25 meters",
            },
            Tree {
                id: ItemId::new(3),
                name: "Mango Tree",
                scientific_name: "Mangifera indica",
                description: "Fruit-bearing tree providing delicious mangoes and good shade for rural families.",
                price: Price::rupees(180),
                image: "https://images.unsplash.com/photo-1518495973542-4542c06a5843?auto=format&fit=crop&w=400&h=300",
                benefits: &["Fruit Production", "Shade", "Economic Value"],
                category: "Fruit",
                growth_time: "3-4 years",
                height: "10-15 meters",
            },
            Tree {
                id: ItemId::new(4),
                name: "Peepal Tree",
                scientific_name: "Ficus religiosa",
                description: "Sacred tree known for releasing oxygen even at night. Highly revered in Indian culture.",
                price: Price::rupees(160),
                image: "https://images.unsplash.com/photo-1469474968028-56623f02e42e?auto=format&fit=crop&w=400&h=300",
                benefits: &["24/7 Oxygen", "Sacred Tree", "Air Purification"],
                category: "Sacred",
                growth_time: "2-3 years",
                height: "20-30 meters",
            },
            Tree {
                id: ItemId::new(5),
                name: "Teak Tree",
                scientific_name: "Tectona grandis",
                description: "High-quality timber tree with excellent economic value. Drought resistant and long-lasting.",
                price: Price::rupees(250),
                image: "https://images.unsplash.com/photo-1472396961693-142e6e269027?auto=format&fit=crop&w=400&h=300",
                benefits: &["Timber Value", "Drought Resistant", "Long Lifespan"],
                category: "Timber",
                growth_time: "5-7 years",
                height: "25-40 meters",
            },
            Tree {
                id: ItemId::new(6),
                name: "Jamun Tree",
                scientific_name: "Syzygium cumini",
                description: "Medicinal fruit tree, excellent for diabetic patients. Purple fruits with health benefits.",
                price: Price::rupees(170),
                image: "https://images.unsplash.com/photo-1465146344425-f00d5f5c8f07?auto=format&fit=crop&w=400&h=300",
                benefits: &["Diabetic Friendly", "Medicinal Fruit", "Air Purification"],
                category: "Medicinal",
                growth_time: "3-4 years",
                height: "10-15 meters",
            },
        ])
    }

    #[must_use]
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Tree> {
        self.trees.iter().find(|tree| tree.id == id)
    }

    /// `All` followed by each distinct category in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];
        for tree in &self.trees {
            if !categories.contains(&tree.category) {
                categories.push(tree.category);
            }
        }
        categories
    }

    /// Trees in `category`; `All` returns every tree.
    pub fn filter<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Tree> + 'a {
        self.trees
            .iter()
            .filter(move |tree| category == ALL_CATEGORIES || tree.category == category)
    }
}

impl Default for TreeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// A service listed on the services page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub title: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub link: &'static str,
    pub price_label: &'static str,
}

/// Services offered, in display order.
pub const SERVICES: &[Service] = &[
    Service {
        title: "Tree Plantation",
        description: "Comprehensive tree plantation services with native species selection, planting guidance, and after-care support.",
        features: &[
            "Native Species Selection",
            "Professional Planting",
            "After-care Support",
            "Growth Monitoring",
        ],
        link: "/trees",
        price_label: "Starting from ₹150/tree",
    },
    Service {
        title: "Waste-Scrap Management",
        description: "Efficient waste collection, segregation, and recycling services for rural communities.",
        features: &[
            "Door-to-door Collection",
            "Waste Segregation",
            "Recycling Services",
            "Compost Production",
        ],
        link: "/services/waste-management",
        price_label: "Starting from ₹500/month",
    },
    Service {
        title: "Conservation Guidance",
        description: "Expert consultation on environmental conservation practices and sustainable living.",
        features: &[
            "Water Conservation",
            "Soil Health Management",
            "Biodiversity Protection",
            "Sustainable Farming",
        ],
        link: "/services/conservation",
        price_label: "Starting from ₹1000/consultation",
    },
    Service {
        title: "Eco-Events Registration",
        description: "Join environmental awareness programs, tree planting drives, and community conservation events.",
        features: &[
            "Awareness Programs",
            "Community Events",
            "Workshops",
            "Volunteer Opportunities",
        ],
        link: "/services/events",
        price_label: "Free participation",
    },
];

/// Service that a service request is filed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    WasteManagement,
    Conservation,
    Events,
}

/// Header content for a service-request page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Shown when the route names no known service.
pub const GENERIC_SERVICE: ServiceInfo = ServiceInfo {
    title: "Service Request",
    description: "Submit your service request",
    icon: "🌱",
};

impl ServiceType {
    pub const ALL: [Self; 3] = [Self::WasteManagement, Self::Conservation, Self::Events];

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::WasteManagement => "waste-management",
            Self::Conservation => "conservation",
            Self::Events => "events",
        }
    }

    #[must_use]
    pub const fn info(self) -> ServiceInfo {
        match self {
            Self::WasteManagement => ServiceInfo {
                title: "Waste-Scrap Management",
                description: "Professional waste collection and recycling services",
                icon: "♻️",
            },
            Self::Conservation => ServiceInfo {
                title: "Conservation Guidance",
                description: "Expert environmental conservation consultation",
                icon: "📚",
            },
            Self::Events => ServiceInfo {
                title: "Eco-Events Registration",
                description: "Join environmental awareness and community events",
                icon: "📅",
            },
        }
    }

    /// Page header for a route slug, falling back to [`GENERIC_SERVICE`].
    #[must_use]
    pub fn info_for_slug(slug: &str) -> ServiceInfo {
        slug.parse::<Self>().map_or(GENERIC_SERVICE, Self::info)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.slug() == s)
            .ok_or_else(|| format!("invalid service type: {s}"))
    }
}

/// How soon a service request should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Urgent,
}

impl Urgency {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low - Within a week",
            Self::Medium => "Medium - Within 3 days",
            Self::High => "High - Within 24 hours",
            Self::Urgent => "Urgent - Immediate",
        }
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|urgency| urgency.as_str() == s)
            .ok_or_else(|| format!("invalid urgency: {s}"))
    }
}
