use serde::{Deserialize, Serialize};

pub mod query;
pub mod schema;

pub use query::{QueryDefaults, RecommendationQuery};
pub use schema::FeatureSchema;

/// Cluster label assigned by the clustering model
pub type ClusterId = u32;

/// A restaurant record with its cluster assignment.
///
/// In the catalog's record set `cuisine` is the normalized, comma-joined list.
/// In the exploded view it holds exactly one cuisine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    /// Stable key from the source data, when present
    pub id: Option<String>,
    pub name: String,
    pub city: String,
    pub cuisine: String,
    pub rating: f64,
    pub rating_count: u32,
    pub cost: f64,
    pub cluster: ClusterId,
}

/// A recommended restaurant as rendered on the page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantCard {
    pub name: String,
    pub city: String,
    pub cuisine: String,
    pub rating: f64,
    pub cost: f64,
}

impl From<&Restaurant> for RestaurantCard {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            name: restaurant.name.clone(),
            city: restaurant.city.clone(),
            cuisine: restaurant.cuisine.clone(),
            rating: restaurant.rating,
            cost: restaurant.cost,
        }
    }
}

/// Result of one recommendation query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationResponse {
    /// Cluster predicted for the query
    pub cluster: ClusterId,
    /// `rating_count` value placed in the feature row
    pub rating_count: u32,
    /// Whether the model knows the selected city
    pub city_indicator: bool,
    /// Whether the model knows the selected cuisine
    pub cuisine_indicator: bool,
    /// Ranked results, empty when nothing matched
    pub results: Vec<RestaurantCard>,
}

/// Values for populating the page controls
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OptionsResponse {
    pub cities: Vec<String>,
    pub cuisines: Vec<String>,
    pub defaults: QueryDefaults,
}

/// Summary of the loaded dataset and model
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogSummary {
    pub restaurants: usize,
    pub exploded_rows: usize,
    pub cuisines: usize,
    pub cities: usize,
    pub clusters: usize,
    pub feature_count: usize,
    pub schema_version: u32,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}
