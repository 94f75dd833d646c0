use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;
pub const MIN_COST: u32 = 50;
pub const MAX_COST: u32 = 1000;
pub const COST_STEP: u32 = 50;
pub const MIN_TOP_N: usize = 1;
pub const MAX_TOP_N: usize = 10;

/// User selections for one recommendation query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationQuery {
    /// City to match (substring of the record's city)
    pub city: String,
    /// Cuisine to match (case-insensitive). Empty selects records without a cuisine.
    pub cuisine: String,
    /// Minimum rating slider value
    pub rating: f64,
    /// Budget in currency units
    pub cost: u32,
    /// Number of results to return
    pub top_n: usize,
    /// Overrides the configured `rating_count` for the feature row
    #[serde(default)]
    pub rating_count: Option<u32>,
}

impl RecommendationQuery {
    /// Creates a query without a `rating_count` override
    pub fn new(
        city: impl Into<String>,
        cuisine: impl Into<String>,
        rating: f64,
        cost: u32,
        top_n: usize,
    ) -> Self {
        Self {
            city: city.into(),
            cuisine: cuisine.into(),
            rating,
            cost,
            top_n,
            rating_count: None,
        }
    }

    /// Checks every control against its allowed range
    pub fn validate(&self) -> AppResult<()> {
        if self.city.trim().is_empty() {
            return Err(AppError::InvalidInput("city must not be empty".to_string()));
        }
        if !self.rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(AppError::InvalidInput(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}, got {}",
                self.rating
            )));
        }
        if !(MIN_COST..=MAX_COST).contains(&self.cost) || self.cost % COST_STEP != 0 {
            return Err(AppError::InvalidInput(format!(
                "cost must be a multiple of {COST_STEP} between {MIN_COST} and {MAX_COST}, got {}",
                self.cost
            )));
        }
        if !(MIN_TOP_N..=MAX_TOP_N).contains(&self.top_n) {
            return Err(AppError::InvalidInput(format!(
                "top_n must be between {MIN_TOP_N} and {MAX_TOP_N}, got {}",
                self.top_n
            )));
        }
        Ok(())
    }

    /// The `rating_count` to place in the feature row
    pub fn rating_count_or(&self, default: u32) -> u32 {
        self.rating_count.unwrap_or(default)
    }
}

/// Initial control values for the page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryDefaults {
    pub rating: f64,
    pub cost: u32,
    pub top_n: usize,
    pub rating_count: u32,
}

impl QueryDefaults {
    pub fn with_rating_count(rating_count: u32) -> Self {
        Self {
            rating: 4.0,
            cost: 300,
            top_n: 5,
            rating_count,
        }
    }
}
