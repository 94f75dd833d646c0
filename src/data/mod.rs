//! Restaurant dataset: cleaned records with cluster labels and the per-cuisine view.

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    error::AppResult,
    models::{ClusterId, Restaurant},
};

pub mod cuisine;
pub mod source;

/// Loaded dataset, immutable after construction
#[derive(Debug, Clone)]
pub struct Catalog {
    restaurants: Vec<Restaurant>,
    exploded: Vec<Restaurant>,
    cuisines: Vec<String>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Builds the catalog from records carrying raw cuisine lists.
    ///
    /// Normalizes each record's cuisine field and derives the exploded view,
    /// keeping record order.
    pub fn from_records(records: Vec<Restaurant>) -> Self {
        let restaurants: Vec<Restaurant> = records
            .into_iter()
            .map(|mut restaurant| {
                restaurant.cuisine = cuisine::normalize(&restaurant.cuisine);
                restaurant
            })
            .collect();

        let exploded: Vec<Restaurant> = restaurants
            .iter()
            .flat_map(|restaurant| {
                cuisine::explode(&restaurant.cuisine).map(move |single| Restaurant {
                    cuisine: single.to_string(),
                    ..restaurant.clone()
                })
            })
            .collect();

        let cuisines: Vec<String> = exploded
            .iter()
            .map(|row| row.cuisine.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            restaurants,
            exploded,
            cuisines,
            loaded_at: Utc::now(),
        }
    }

    /// Records with normalized cuisine lists
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// One row per (restaurant, cuisine) pair
    pub fn exploded(&self) -> &[Restaurant] {
        &self.exploded
    }

    /// Distinct cuisines of the exploded view, sorted
    pub fn cuisines(&self) -> &[String] {
        &self.cuisines
    }

    /// Distinct cluster labels present in the dataset
    pub fn clusters(&self) -> BTreeSet<ClusterId> {
        self.restaurants.iter().map(|r| r.cluster).collect()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Reads the cleaned and clustered tables and builds the catalog
pub fn load_catalog(config: &Config) -> AppResult<Catalog> {
    let start = Instant::now();

    let cleaned = source::read_cleaned(&config.cleaned_data_path, &config.join_key)?;
    let clusters = source::read_clusters(&config.clustered_data_path, &config.join_key)?;
    let labels = source::attach_clusters(&cleaned, &clusters)?;

    let records: Vec<Restaurant> = cleaned
        .rows
        .into_iter()
        .zip(labels)
        .map(|(row, cluster)| Restaurant {
            id: row.id,
            name: row.name,
            city: row.city,
            cuisine: row.cuisine.unwrap_or_default(),
            rating: row.rating,
            rating_count: row.rating_count,
            cost: row.cost,
            cluster,
        })
        .collect();

    let catalog = Catalog::from_records(records);

    tracing::info!(
        restaurants = catalog.restaurants().len(),
        exploded_rows = catalog.exploded().len(),
        cuisines = catalog.cuisines().len(),
        clusters = catalog.clusters().len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Dataset loaded"
    );

    Ok(catalog)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::Restaurant;

    pub fn restaurant(name: &str, city: &str, cuisine: &str, rating: f64, cluster: u32) -> Restaurant {
        Restaurant {
            id: None,
            name: name.to_string(),
            city: city.to_string(),
            cuisine: cuisine.to_string(),
            rating,
            rating_count: 100,
            cost: 300.0,
            cluster,
        }
    }
}
