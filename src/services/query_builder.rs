use crate::models::{FeatureSchema, RecommendationQuery};

pub const RATING_COLUMN: &str = "rating";
pub const RATING_COUNT_COLUMN: &str = "rating_count";
pub const COST_COLUMN: &str = "cost";

/// One observation laid out in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub values: Vec<f64>,
    /// Whether `city_<city>` exists in the schema and was set
    pub city_indicator: bool,
    /// Whether `cuisine_<cuisine>` exists in the schema and was set
    pub cuisine_indicator: bool,
}

/// Builds the feature row for a query.
///
/// Every column starts at zero. The numeric columns are set when the schema
/// has them, and the city and cuisine indicators are set to one when the model
/// was trained on those values. A value the model never saw leaves its
/// indicators at zero.
pub fn build_feature_row(
    schema: &FeatureSchema,
    query: &RecommendationQuery,
    rating_count: u32,
) -> FeatureRow {
    let mut values = vec![0.0; schema.len()];

    let mut set = |column: &str, value: f64| {
        if let Some(idx) = schema.position(column) {
            values[idx] = value;
        }
    };
    set(RATING_COLUMN, query.rating);
    set(RATING_COUNT_COLUMN, f64::from(rating_count));
    set(COST_COLUMN, f64::from(query.cost));

    let city_idx = schema.city_indicator(&query.city);
    if let Some(idx) = city_idx {
        values[idx] = 1.0;
    } else {
        tracing::debug!(city = %query.city, "City not in feature schema, indicator left unset");
    }

    let cuisine_idx = schema.cuisine_indicator(&query.cuisine);
    if let Some(idx) = cuisine_idx {
        values[idx] = 1.0;
    } else {
        tracing::debug!(cuisine = %query.cuisine, "Cuisine not in feature schema, indicator left unset");
    }

    FeatureRow {
        values,
        city_indicator: city_idx.is_some(),
        cuisine_indicator: cuisine_idx.is_some(),
    }
}
