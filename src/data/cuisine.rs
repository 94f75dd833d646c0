use std::collections::BTreeSet;

/// Normalizes a comma-separated cuisine list.
///
/// Tokens are stripped, deduplicated (case-sensitive) and sorted, then joined
/// with `", "`. An empty input stays empty.
pub fn normalize(raw: &str) -> String {
    let tokens: BTreeSet<&str> = raw.split(',').map(str::trim).collect();
    tokens.into_iter().collect::<Vec<_>>().join(", ")
}

/// Splits a normalized cuisine list into its individual cuisines.
///
/// Always yields at least one item: an empty list explodes to a single empty cuisine.
pub fn explode(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(',').map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sorts_and_dedups() {
        assert_eq!(normalize("Pizzas, Italian, Pizzas"), "Italian, Pizzas");
    }

    #[test]
    fn test_normalize_is_case_sensitive() {
        assert_eq!(normalize("Indian, Chinese, indian"), "Chinese, Indian, indian");
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(normalize("  South Indian ,Chinese"), "Chinese, South Indian");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_keeps_empty_token() {
        // "A,,B" carries an empty token that sorts first
        assert_eq!(normalize("Thai,,Chinese"), ", Chinese, Thai");
    }

    #[test]
    fn test_explode_two_cuisines() {
        let parts: Vec<&str> = explode("Chinese, Indian").collect();
        assert_eq!(parts, vec!["Chinese", "Indian"]);
    }

    #[test]
    fn test_explode_empty_yields_single_blank() {
        let parts: Vec<&str> = explode("").collect();
        assert_eq!(parts, vec![""]);
    }

    #[test]
    fn test_normalized_output_is_sorted_and_unique() {
        let normalized = normalize("Kebabs, Biryani, Desserts, Biryani, Beverages");
        let parts: Vec<&str> = explode(&normalized).collect();
        let mut sorted = parts.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(parts, sorted);
    }
}
