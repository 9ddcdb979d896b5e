use std::cmp::Ordering;

use crate::{
    error::LookupError,
    models::Movie,
    services::catalog::{Catalog, SimilarityMatrix},
};

/// Number of similar movies returned for a selection
pub const RECOMMENDATION_COUNT: usize = 5;

/// Finds the movies most similar to `title`.
///
/// Candidates are every other catalog entry, scored by the selected movie's
/// row in the similarity matrix. Scores are sorted descending with a stable
/// sort, so equal scores keep catalog order. The selected movie itself is
/// never part of the result.
pub fn recommend(
    catalog: &Catalog,
    matrix: &SimilarityMatrix,
    title: &str,
) -> Result<Vec<Movie>, LookupError> {
    let selected = catalog
        .find_by_title(title)
        .ok_or_else(|| LookupError::NotFound(title.to_string()))?;

    // Only reachable with a snapshot that bypassed validation
    let row = matrix
        .row(selected.row_index)
        .ok_or_else(|| LookupError::NotFound(title.to_string()))?;

    let mut candidates: Vec<(&Movie, f32)> = catalog
        .movies()
        .iter()
        .filter(|movie| movie.row_index != selected.row_index)
        .map(|movie| (movie, row.get(movie.row_index).copied().unwrap_or(f32::NAN)))
        .collect();

    candidates.sort_by(|a, b| compare_scores(b.1, a.1));

    let recommendations: Vec<Movie> = candidates
        .into_iter()
        .take(RECOMMENDATION_COUNT)
        .map(|(movie, _)| movie.clone())
        .collect();

    tracing::debug!(
        title = %title,
        results = recommendations.len(),
        "Recommendations computed"
    );

    Ok(recommendations)
}

/// Total order on scores where NaN sorts below every real number
fn compare_scores(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.total_cmp(&b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieRecord;

    fn catalog(titles: &[&str]) -> Catalog {
        Catalog::from_records(
            titles
                .iter()
                .enumerate()
                .map(|(i, title)| MovieRecord {
                    id: i as i64 + 1,
                    title: title.to_string(),
                    row_index: None,
                })
                .collect(),
        )
    }

    fn titles(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn test_recommend_three_movie_example() {
        let catalog = catalog(&["A", "B", "C"]);
        let matrix = SimilarityMatrix::new(vec![
            vec![1.0, 0.9, 0.2],
            vec![0.9, 1.0, 0.3],
            vec![0.2, 0.3, 1.0],
        ]);

        let result = recommend(&catalog, &matrix, "A").unwrap();
        assert_eq!(titles(&result), vec!["B", "C"]);
    }

    #[test]
    fn test_recommend_unknown_title_is_not_found() {
        let catalog = catalog(&["A", "B"]);
        let matrix = SimilarityMatrix::new(vec![vec![1.0, 0.5], vec![0.5, 1.0]]);

        let result = recommend(&catalog, &matrix, "Z");
        assert_eq!(result, Err(LookupError::NotFound("Z".to_string())));
    }

    #[test]
    fn test_recommend_returns_at_most_five() {
        let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let catalog = catalog(&names);
        let rows = (0..names.len())
            .map(|i| {
                (0..names.len())
                    .map(|j| if i == j { 1.0 } else { 1.0 / (1.0 + j as f32) })
                    .collect()
            })
            .collect();
        let matrix = SimilarityMatrix::new(rows);

        let result = recommend(&catalog, &matrix, "C").unwrap();
        assert_eq!(result.len(), RECOMMENDATION_COUNT);
        assert_eq!(titles(&result), vec!["A", "B", "D", "E", "F"]);
    }

    #[test]
    fn test_recommend_never_includes_selection() {
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        let catalog = catalog(&names);
        // Self score is deliberately not the maximum
        let rows = (0..names.len())
            .map(|i| {
                (0..names.len())
                    .map(|j| if i == j { 0.0 } else { 0.5 })
                    .collect()
            })
            .collect();
        let matrix = SimilarityMatrix::new(rows);

        for name in names {
            let result = recommend(&catalog, &matrix, name).unwrap();
            assert!(result.iter().all(|m| m.title != name));
            assert_eq!(result.len(), 5);
        }
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = catalog(&["A", "B", "C", "D"]);
        let matrix = SimilarityMatrix::new(vec![
            vec![1.0, 0.4, 0.7, 0.4],
            vec![0.4, 1.0, 0.0, 0.0],
            vec![0.7, 0.0, 1.0, 0.0],
            vec![0.4, 0.0, 0.0, 1.0],
        ]);

        let result = recommend(&catalog, &matrix, "A").unwrap();
        assert_eq!(titles(&result), vec!["C", "B", "D"]);
    }

    #[test]
    fn test_ties_use_catalog_position_not_row_index() {
        let catalog = Catalog::from_records(vec![
            MovieRecord { id: 1, title: "A".to_string(), row_index: Some(2) },
            MovieRecord { id: 2, title: "B".to_string(), row_index: Some(1) },
            MovieRecord { id: 3, title: "C".to_string(), row_index: Some(0) },
        ]);
        let matrix = SimilarityMatrix::new(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.5, 0.5, 1.0],
        ]);

        let result = recommend(&catalog, &matrix, "A").unwrap();
        assert_eq!(titles(&result), vec!["B", "C"]);
    }

    #[test]
    fn test_nan_scores_rank_last() {
        let catalog = catalog(&["A", "B", "C"]);
        let matrix = SimilarityMatrix::new(vec![
            vec![1.0, f32::NAN, 0.1],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ]);

        let result = recommend(&catalog, &matrix, "A").unwrap();
        assert_eq!(titles(&result), vec!["C", "B"]);
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let catalog = catalog(&["A", "B", "C", "D", "E", "F", "G"]);
        let matrix = SimilarityMatrix::new(vec![vec![0.3; 7]; 7]);

        let first = recommend(&catalog, &matrix, "D").unwrap();
        for _ in 0..10 {
            assert_eq!(recommend(&catalog, &matrix, "D").unwrap(), first);
        }
        assert_eq!(titles(&first), vec!["A", "B", "C", "E", "F"]);
    }

    #[test]
    fn test_single_movie_catalog_returns_empty() {
        let catalog = catalog(&["A"]);
        let matrix = SimilarityMatrix::new(vec![vec![1.0]]);

        assert!(recommend(&catalog, &matrix, "A").unwrap().is_empty());
    }
}
