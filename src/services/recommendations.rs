use std::collections::HashSet;

use crate::{
    data::Catalog,
    error::AppResult,
    ml::ModelBundle,
    models::{ClusterId, RecommendationQuery, RecommendationResponse, Restaurant, RestaurantCard},
};

use super::{predictor::predict_cluster, query_builder::build_feature_row};

/// Selects the top restaurants of a cluster for a city and cuisine.
///
/// A row matches when it is in `cluster`, its cuisine equals `cuisine` ignoring
/// case, and its city contains `city`. Names are deduplicated in dataset order
/// before the stable sort by rating, so the first listed row wins for a name.
pub fn filter_rank<'a>(
    rows: &'a [Restaurant],
    cluster: ClusterId,
    city: &str,
    cuisine: &str,
    top_n: usize,
) -> Vec<&'a Restaurant> {
    let cuisine = cuisine.to_lowercase();
    let mut seen = HashSet::new();

    let mut matches: Vec<&Restaurant> = rows
        .iter()
        .filter(|row| {
            row.cluster == cluster
                && row.cuisine.to_lowercase() == cuisine
                && row.city.contains(city)
        })
        .filter(|&row| seen.insert(row.name.as_str()))
        .collect();

    matches.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    matches.truncate(top_n);
    matches
}

/// Runs the full query: feature row, cluster prediction, filter and rank
pub fn recommend(
    catalog: &Catalog,
    models: &ModelBundle,
    query: &RecommendationQuery,
    default_rating_count: u32,
) -> AppResult<RecommendationResponse> {
    query.validate()?;

    let rating_count = query.rating_count_or(default_rating_count);
    let row = build_feature_row(&models.schema, query, rating_count);
    let cluster = predict_cluster(models.scaler.as_ref(), models.model.as_ref(), &row)?;

    let results: Vec<RestaurantCard> = filter_rank(
        catalog.exploded(),
        cluster,
        &query.city,
        &query.cuisine,
        query.top_n,
    )
    .into_iter()
    .map(RestaurantCard::from)
    .collect();

    tracing::info!(
        city = %query.city,
        cuisine = %query.cuisine,
        cluster,
        city_indicator = row.city_indicator,
        cuisine_indicator = row.cuisine_indicator,
        result_count = results.len(),
        "Recommendation computed"
    );

    Ok(RecommendationResponse {
        cluster,
        rating_count,
        city_indicator: row.city_indicator,
        cuisine_indicator: row.cuisine_indicator,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::restaurant;
    use crate::error::AppError;
    use crate::ml::artifacts::{ClusterModelArtifact, EncoderArtifact, ScalerArtifact};

    fn rows() -> Vec<Restaurant> {
        vec![
            restaurant("Wok Express", "Mumbai", "Chinese", 4.1, 1),
            restaurant("Dragon Bowl", "Andheri, Mumbai", "chinese", 4.6, 1),
            restaurant("Wok Express", "Bandra, Mumbai", "Chinese", 4.9, 1),
            restaurant("Pune Noodles", "Pune", "Chinese", 4.8, 1),
            restaurant("Far Cluster", "Mumbai", "Chinese", 5.0, 2),
            restaurant("Curry House", "Mumbai", "Indian", 4.7, 1),
            restaurant("Golden Dragon", "Mumbai", "Chinese", 3.2, 1),
        ]
    }

    #[test]
    fn test_filter_predicate() {
        let rows = rows();
        let result = filter_rank(&rows, 1, "Mumbai", "CHINESE", 10);
        let names: Vec<&str> = result.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Dragon Bowl", "Wok Express", "Golden Dragon"]);
    }

    #[test]
    fn test_dedup_keeps_first_listed_row() {
        let rows = rows();
        let result = filter_rank(&rows, 1, "Mumbai", "Chinese", 10);
        let wok = result.iter().find(|r| r.name == "Wok Express").unwrap();
        // the later, higher-rated Bandra row is dropped
        assert_eq!(wok.city, "Mumbai");
        assert_eq!(wok.rating, 4.1);
    }

    #[test]
    fn test_top_n_truncates() {
        let rows = rows();
        let result = filter_rank(&rows, 1, "Mumbai", "Chinese", 2);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Dragon Bowl");
    }

    #[test]
    fn test_city_is_substring_and_case_sensitive() {
        let rows = rows();
        assert_eq!(filter_rank(&rows, 1, "Andheri", "Chinese", 10).len(), 1);
        assert!(filter_rank(&rows, 1, "mumbai", "Chinese", 10).is_empty());
    }

    #[test]
    fn test_no_matches_is_empty() {
        let rows = rows();
        assert!(filter_rank(&rows, 9, "Mumbai", "Chinese", 5).is_empty());
    }

    #[test]
    fn test_results_sorted_and_unique() {
        let rows = rows();
        let result = filter_rank(&rows, 1, "", "chinese", 10);
        assert!(result.windows(2).all(|w| w[0].rating >= w[1].rating));
        let names: HashSet<&str> = result.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), result.len());
    }

    fn bundle() -> ModelBundle {
        // cluster 0 sits on Mumbai/Chinese, cluster 1 on Pune/Indian
        let features = [
            "rating",
            "rating_count",
            "cost",
            "city_Mumbai",
            "city_Pune",
            "cuisine_Chinese",
            "cuisine_Indian",
        ];
        ModelBundle::from_artifacts(
            EncoderArtifact {
                columns: vec!["city_Mumbai".to_string(), "city_Pune".to_string()],
            },
            ScalerArtifact {
                schema_version: 1,
                feature_names: features.iter().map(|s| s.to_string()).collect(),
                mean: vec![4.0, 100.0, 300.0, 0.0, 0.0, 0.0, 0.0],
                scale: vec![1.0, 100.0, 100.0, 1.0, 1.0, 1.0, 1.0],
            },
            ClusterModelArtifact {
                schema_version: 1,
                cluster_centers: vec![
                    vec![0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0],
                    vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0],
                ],
                feature_names: None,
            },
        )
        .unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            restaurant("Wok Express", "Mumbai", "Chinese, Indian", 4.1, 0),
            restaurant("Dragon Bowl", "Andheri, Mumbai", "Chinese", 4.6, 0),
            restaurant("Spice Route", "Pune", "Indian", 4.4, 1),
        ])
    }

    #[test]
    fn test_recommend_end_to_end() {
        let query = RecommendationQuery::new("Mumbai", "Chinese", 4.0, 300, 5);
        let response = recommend(&catalog(), &bundle(), &query, 100).unwrap();

        assert_eq!(response.cluster, 0);
        assert_eq!(response.rating_count, 100);
        assert!(response.city_indicator && response.cuisine_indicator);
        assert!(response.results.len() <= 5);
        let names: Vec<&str> = response.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Dragon Bowl", "Wok Express"]);
        for card in &response.results {
            assert_eq!(card.cuisine.to_lowercase(), "chinese");
            assert!(card.city.contains("Mumbai"));
        }
    }

    #[test]
    fn test_recommend_other_cluster() {
        let query = RecommendationQuery::new("Pune", "Indian", 4.0, 300, 5);
        let response = recommend(&catalog(), &bundle(), &query, 100).unwrap();
        assert_eq!(response.cluster, 1);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].name, "Spice Route");
    }

    #[test]
    fn test_recommend_unknown_city_does_not_fail() {
        let query = RecommendationQuery::new("Atlantis", "Chinese", 4.0, 300, 5);
        let response = recommend(&catalog(), &bundle(), &query, 100).unwrap();
        assert!(!response.city_indicator);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_recommend_blank_cuisine_matches_uncategorized_rows() {
        let catalog = Catalog::from_records(vec![
            restaurant("Wok Express", "Mumbai", "Chinese", 4.1, 0),
            restaurant("Corner Stall", "Mumbai", "", 3.8, 0),
        ]);
        let query = RecommendationQuery::new("Mumbai", "", 4.0, 300, 5);
        let response = recommend(&catalog, &bundle(), &query, 100).unwrap();

        assert_eq!(response.cluster, 0);
        assert!(!response.cuisine_indicator);
        let names: Vec<&str> = response.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Corner Stall"]);
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let catalog = catalog();
        let bundle = bundle();
        let query = RecommendationQuery::new("Mumbai", "Chinese", 4.0, 300, 5);
        let first = recommend(&catalog, &bundle, &query, 100).unwrap();
        let second = recommend(&catalog, &bundle, &query, 100).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_recommend_uses_rating_count_override() {
        let mut query = RecommendationQuery::new("Mumbai", "Chinese", 4.0, 300, 5);
        query.rating_count = Some(40);
        let response = recommend(&catalog(), &bundle(), &query, 100).unwrap();
        assert_eq!(response.rating_count, 40);
    }

    #[test]
    fn test_recommend_rejects_invalid_query() {
        let query = RecommendationQuery::new("Mumbai", "Chinese", 4.0, 300, 0);
        let result = recommend(&catalog(), &bundle(), &query, 100);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
