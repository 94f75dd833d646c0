//! Readers for the flat tabular inputs.

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Deserializer};

use crate::{
    error::{AppError, AppResult},
    models::ClusterId,
};

/// Name of the cluster column in the clustered table
pub const CLUSTER_COLUMN: &str = "cluster";

/// One row of the cleaned restaurant table.
///
/// `id` comes from the join-key column when the file has one, otherwise from
/// an `id` column if present.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CleanedRow {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub city: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    pub rating: f64,
    #[serde(deserialize_with = "count_from_text")]
    pub rating_count: u32,
    pub cost: f64,
}

/// Cleaned table plus the join-key column, when the file has one
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub rows: Vec<CleanedRow>,
    pub keys: Option<Vec<String>>,
}

/// Cluster labels in file order plus the join-key column, when the file has one
#[derive(Debug, Clone)]
pub struct ClusterTable {
    pub labels: Vec<ClusterId>,
    pub keys: Option<Vec<String>>,
}

/// Parses an integer count written either as `"120"` or `"120.0"`
pub fn parse_count(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Ok(value) = text.parse::<u32>() {
        return Some(value);
    }
    let value = text.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

fn count_from_text<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_count(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid count '{text}'")))
}

fn open(path: &Path) -> AppResult<csv::Reader<std::fs::File>> {
    csv::Reader::from_path(path).map_err(|e| csv_error(path, e))
}

fn csv_error(path: &Path, source: csv::Error) -> AppError {
    AppError::Csv {
        path: path.display().to_string(),
        source,
    }
}

fn headers(path: &Path, reader: &mut csv::Reader<std::fs::File>) -> AppResult<StringRecord> {
    reader
        .headers()
        .map(Clone::clone)
        .map_err(|e| csv_error(path, e))
}

/// Reads only the header row of a CSV file
pub fn read_header(path: &Path) -> AppResult<Vec<String>> {
    let mut reader = open(path)?;
    let headers = headers(path, &mut reader)?;
    Ok(headers.iter().map(str::to_string).collect())
}

/// Reads the cleaned restaurant table
pub fn read_cleaned(path: &Path, join_key: &str) -> AppResult<CleanedTable> {
    let mut reader = open(path)?;
    let headers = headers(path, &mut reader)?;
    let key_idx = headers.iter().position(|h| h == join_key);

    let mut rows = Vec::new();
    let mut keys = key_idx.map(|_| Vec::new());

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let mut row: CleanedRow = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(path, e))?;

        if let (Some(idx), Some(keys)) = (key_idx, keys.as_mut()) {
            let key = record.get(idx).unwrap_or_default().trim().to_string();
            row.id = Some(key.clone());
            keys.push(key);
        }
        rows.push(row);
    }

    tracing::debug!(
        path = %path.display(),
        rows = rows.len(),
        keyed = keys.is_some(),
        "Cleaned table read"
    );

    Ok(CleanedTable { rows, keys })
}

/// Reads the cluster column of the clustered table
pub fn read_clusters(path: &Path, join_key: &str) -> AppResult<ClusterTable> {
    let mut reader = open(path)?;
    let headers = headers(path, &mut reader)?;

    let cluster_idx = headers
        .iter()
        .position(|h| h == CLUSTER_COLUMN)
        .ok_or_else(|| {
            AppError::Dataset(format!(
                "{} has no '{CLUSTER_COLUMN}' column (columns: {:?})",
                path.display(),
                headers.iter().collect::<Vec<_>>()
            ))
        })?;
    let key_idx = headers.iter().position(|h| h == join_key);

    let mut labels = Vec::new();
    let mut keys = key_idx.map(|_| Vec::new());

    // Line 1 is the header
    for (line, result) in (2..).zip(reader.records()) {
        let record = result.map_err(|e| csv_error(path, e))?;
        let raw = record.get(cluster_idx).unwrap_or_default();
        let label = parse_count(raw).ok_or_else(|| {
            AppError::Dataset(format!(
                "{} line {line}: invalid cluster label '{raw}'",
                path.display()
            ))
        })?;
        labels.push(label);

        if let (Some(idx), Some(keys)) = (key_idx, keys.as_mut()) {
            keys.push(record.get(idx).unwrap_or_default().trim().to_string());
        }
    }

    Ok(ClusterTable { labels, keys })
}

/// Assigns a cluster label to every cleaned row.
///
/// Joins on the key column when both tables carry it. Otherwise rows are
/// aligned by position, which requires equal row counts.
pub fn attach_clusters(cleaned: &CleanedTable, clusters: &ClusterTable) -> AppResult<Vec<ClusterId>> {
    match (&cleaned.keys, &clusters.keys) {
        (Some(cleaned_keys), Some(cluster_keys)) => {
            let mut by_key: HashMap<&str, ClusterId> = HashMap::with_capacity(cluster_keys.len());
            for (key, label) in cluster_keys.iter().zip(&clusters.labels) {
                if by_key.insert(key.as_str(), *label).is_some() {
                    return Err(AppError::Dataset(format!(
                        "duplicate key '{key}' in cluster assignments"
                    )));
                }
            }

            cleaned_keys
                .iter()
                .map(|key| {
                    by_key.get(key.as_str()).copied().ok_or_else(|| {
                        AppError::Dataset(format!("no cluster assignment for key '{key}'"))
                    })
                })
                .collect()
        }
        _ => {
            if cleaned.rows.len() != clusters.labels.len() {
                return Err(AppError::Dataset(format!(
                    "positional cluster merge needs equal row counts: cleaned has {}, clustered has {}",
                    cleaned.rows.len(),
                    clusters.labels.len()
                )));
            }
            tracing::warn!(
                rows = cleaned.rows.len(),
                "No shared join key, attaching clusters by row position"
            );
            Ok(clusters.labels.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        for line in lines {
            writeln!(file, "{line}").expect("write line");
        }
        file
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("120"), Some(120));
        assert_eq!(parse_count(" 120.0 "), Some(120));
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("many"), None);
    }

    #[test]
    fn test_read_cleaned_with_key_and_extra_columns() {
        let file = csv_file(&[
            "id,name,city,rating,rating_count,cost,cuisine,link",
            "7,AB Cafe,Mumbai,4.2,100,300.0,\"Chinese,Indian\",http://x",
            "8,Spice Hub,Pune,3.9,50.0,250,,http://y",
        ]);

        let table = read_cleaned(file.path(), "id").expect("read cleaned");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.keys, Some(vec!["7".to_string(), "8".to_string()]));
        assert_eq!(table.rows[0].cuisine.as_deref(), Some("Chinese,Indian"));
        assert_eq!(table.rows[1].cuisine, None);
        assert_eq!(table.rows[1].rating_count, 50);
    }

    #[test]
    fn test_read_cleaned_without_key() {
        let file = csv_file(&[
            "name,city,cuisine,rating,rating_count,cost",
            "AB Cafe,Mumbai,Chinese,4.2,100,300",
        ]);

        let table = read_cleaned(file.path(), "id").expect("read cleaned");
        assert!(table.keys.is_none());
        assert_eq!(table.rows[0].id, None);
    }

    #[test]
    fn test_read_cleaned_id_follows_custom_join_key() {
        let file = csv_file(&[
            "restaurant_id,name,city,rating,rating_count,cost,cuisine",
            " r-17 ,AB Cafe,Mumbai,4.2,100,300,Chinese",
        ]);

        let table = read_cleaned(file.path(), "restaurant_id").expect("read cleaned");
        assert_eq!(table.keys, Some(vec!["r-17".to_string()]));
        assert_eq!(table.rows[0].id.as_deref(), Some("r-17"));
    }

    #[test]
    fn test_read_cleaned_bad_number_fails() {
        let file = csv_file(&[
            "name,city,cuisine,rating,rating_count,cost",
            "AB Cafe,Mumbai,Chinese,--,100,300",
        ]);

        let result = read_cleaned(file.path(), "id");
        assert!(matches!(result, Err(AppError::Csv { .. })));
    }

    #[test]
    fn test_read_clusters_requires_cluster_column() {
        let file = csv_file(&["id,label", "1,0"]);
        let result = read_clusters(file.path(), "id");
        assert!(matches!(result, Err(AppError::Dataset(_))));
    }

    #[test]
    fn test_read_clusters_rejects_bad_label() {
        let file = csv_file(&["cluster", "1", "x"]);
        let err = read_clusters(file.path(), "id").unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_read_header() {
        let file = csv_file(&["rating,cost,city_Mumbai,cuisine_Chinese", "1,2,0,1"]);
        let header = read_header(file.path()).expect("header");
        assert_eq!(header, vec!["rating", "cost", "city_Mumbai", "cuisine_Chinese"]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = read_header(Path::new("/nonexistent/encoded.csv"));
        assert!(result.is_err());
    }

    fn cleaned(keys: Option<Vec<&str>>, rows: usize) -> CleanedTable {
        let row = CleanedRow {
            id: None,
            name: "X".to_string(),
            city: "Y".to_string(),
            cuisine: None,
            rating: 4.0,
            rating_count: 1,
            cost: 100.0,
        };
        CleanedTable {
            rows: vec![row; rows],
            keys: keys.map(|k| k.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn test_attach_keyed_ignores_row_order() {
        let table = cleaned(Some(vec!["a", "b", "c"]), 3);
        let clusters = ClusterTable {
            labels: vec![2, 0, 1],
            keys: Some(vec!["c".to_string(), "a".to_string(), "b".to_string()]),
        };

        let labels = attach_clusters(&table, &clusters).expect("keyed join");
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn test_attach_keyed_missing_key_fails() {
        let table = cleaned(Some(vec!["a", "z"]), 2);
        let clusters = ClusterTable {
            labels: vec![0, 1],
            keys: Some(vec!["a".to_string(), "b".to_string()]),
        };

        let err = attach_clusters(&table, &clusters).unwrap_err();
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn test_attach_keyed_duplicate_key_fails() {
        let table = cleaned(Some(vec!["a"]), 1);
        let clusters = ClusterTable {
            labels: vec![0, 1],
            keys: Some(vec!["a".to_string(), "a".to_string()]),
        };

        assert!(attach_clusters(&table, &clusters).is_err());
    }

    #[test]
    fn test_attach_positional() {
        let table = cleaned(None, 2);
        let clusters = ClusterTable {
            labels: vec![4, 1],
            keys: Some(vec!["a".to_string(), "b".to_string()]),
        };

        assert_eq!(attach_clusters(&table, &clusters).unwrap(), vec![4, 1]);
    }

    #[test]
    fn test_attach_positional_length_mismatch_fails() {
        let table = cleaned(None, 3);
        let clusters = ClusterTable {
            labels: vec![0, 1],
            keys: None,
        };

        let err = attach_clusters(&table, &clusters).unwrap_err();
        assert!(matches!(err, AppError::Dataset(_)));
        assert!(err.to_string().contains("cleaned has 3, clustered has 2"));
    }
}
