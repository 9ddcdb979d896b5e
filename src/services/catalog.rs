use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{
    error::DataError,
    models::{Movie, MovieId, MovieRecord},
};

/// The full set of known movies, in table order
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Builds a catalog, assigning positional row indexes to records that lack one
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        let movies = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| Movie {
                id: MovieId(record.id),
                title: record.title,
                row_index: record.row_index.unwrap_or(position),
            })
            .collect();

        Self { movies }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Exact, case-sensitive title lookup
    pub fn find_by_title(&self, title: &str) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.title == title)
    }

    /// Case-insensitive substring search in catalog order.
    ///
    /// An empty query matches every title.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Movie> {
        let needle = query.trim().to_lowercase();
        self.movies
            .iter()
            .filter(|movie| needle.is_empty() || movie.title.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|movie| movie.title.as_str())
    }
}

/// Square matrix of pairwise similarity scores
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f32>>,
}

impl SimilarityMatrix {
    pub fn new(rows: Vec<Vec<f32>>) -> Self {
        Self { rows }
    }

    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}

/// A catalog and its similarity matrix, loaded together and validated as a unit
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub catalog: Catalog,
    pub matrix: SimilarityMatrix,
}

impl CatalogSnapshot {
    /// Pairs a catalog with a matrix, rejecting any combination that is not consistent
    pub fn new(catalog: Catalog, matrix: SimilarityMatrix) -> Result<Self, DataError> {
        validate(&catalog, &matrix)?;
        Ok(Self { catalog, matrix })
    }
}

/// Loads the movie table and similarity matrix from disk.
///
/// Both files are read and validated before anything is returned, so callers
/// never observe a half-loaded catalog.
pub fn load(
    movies_path: impl AsRef<Path>,
    similarity_path: impl AsRef<Path>,
) -> Result<CatalogSnapshot, DataError> {
    let records: Vec<MovieRecord> = read_json(movies_path.as_ref())?;
    let rows: Vec<Vec<f32>> = read_json(similarity_path.as_ref())?;

    let snapshot = CatalogSnapshot::new(Catalog::from_records(records), SimilarityMatrix::new(rows))?;

    tracing::info!(
        movies = snapshot.catalog.len(),
        movies_path = %movies_path.as_ref().display(),
        similarity_path = %similarity_path.as_ref().display(),
        "Catalog loaded"
    );

    Ok(snapshot)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let unreadable = |reason: String| DataError::Unreadable {
        path: path.display().to_string(),
        reason,
    };

    let bytes = fs::read(path).map_err(|e| unreadable(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| unreadable(e.to_string()))
}

fn validate(catalog: &Catalog, matrix: &SimilarityMatrix) -> Result<(), DataError> {
    let size = catalog.len();

    if matrix.dimension() != size {
        return Err(DataError::Inconsistent(format!(
            "matrix has {} rows but catalog has {} movies",
            matrix.dimension(),
            size
        )));
    }

    if let Some((index, row)) = matrix.rows.iter().enumerate().find(|(_, row)| row.len() != size) {
        return Err(DataError::Inconsistent(format!(
            "matrix row {} has {} columns, expected {}",
            index,
            row.len(),
            size
        )));
    }

    let mut seen_rows = HashSet::with_capacity(size);
    let mut seen_titles = HashSet::with_capacity(size);

    for movie in catalog.movies() {
        if movie.row_index >= size {
            return Err(DataError::Inconsistent(format!(
                "movie {:?} has row_index {} outside matrix of dimension {}",
                movie.title, movie.row_index, size
            )));
        }
        if !seen_rows.insert(movie.row_index) {
            return Err(DataError::Inconsistent(format!(
                "row_index {} is assigned to more than one movie",
                movie.row_index
            )));
        }
        if !seen_titles.insert(movie.title.as_str()) {
            return Err(DataError::Inconsistent(format!(
                "title {:?} appears more than once",
                movie.title
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn record(id: i64, title: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            row_index: None,
        }
    }

    #[test]
    fn test_load_valid_snapshot() {
        let movies = write_file(
            r#"[{"id": 1, "title": "A"}, {"id": 2, "title": "B"}, {"id": 3, "title": "C", "row_index": 2}]"#,
        );
        let matrix = write_file("[[1.0, 0.9, 0.2], [0.9, 1.0, 0.1], [0.2, 0.1, 1.0]]");

        let snapshot = load(movies.path(), matrix.path()).unwrap();

        assert_eq!(snapshot.catalog.len(), 3);
        assert_eq!(snapshot.matrix.dimension(), 3);
        assert_eq!(snapshot.catalog.find_by_title("B").unwrap().row_index, 1);
        assert_eq!(snapshot.catalog.find_by_title("C").unwrap().id, MovieId(3));
    }

    #[test]
    fn test_load_missing_file_is_unreadable() {
        let matrix = write_file("[[1.0]]");
        let result = load("/nonexistent/movies_list.json", matrix.path());
        assert!(matches!(result, Err(DataError::Unreadable { .. })));
    }

    #[test]
    fn test_load_malformed_matrix_is_unreadable() {
        let movies = write_file(r#"[{"id": 1, "title": "A"}]"#);
        let matrix = write_file("not json");
        let result = load(movies.path(), matrix.path());
        assert!(matches!(result, Err(DataError::Unreadable { .. })));
    }

    #[test]
    fn test_dimension_mismatch_is_inconsistent() {
        let movies = write_file(r#"[{"id": 1, "title": "A"}, {"id": 2, "title": "B"}, {"id": 3, "title": "C"}]"#);
        let matrix = write_file("[[1.0, 0.5], [0.5, 1.0]]");
        let result = load(movies.path(), matrix.path());
        assert!(matches!(result, Err(DataError::Inconsistent(_))));
    }

    #[test]
    fn test_non_square_matrix_is_inconsistent() {
        let catalog = Catalog::from_records(vec![record(1, "A"), record(2, "B")]);
        let matrix = SimilarityMatrix::new(vec![vec![1.0, 0.5], vec![0.5]]);
        assert!(matches!(
            CatalogSnapshot::new(catalog, matrix),
            Err(DataError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_out_of_range_row_index_is_inconsistent() {
        let mut records = vec![record(1, "A"), record(2, "B")];
        records[1].row_index = Some(7);
        let catalog = Catalog::from_records(records);
        let matrix = SimilarityMatrix::new(vec![vec![1.0, 0.5], vec![0.5, 1.0]]);
        assert!(matches!(
            CatalogSnapshot::new(catalog, matrix),
            Err(DataError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_duplicate_title_is_inconsistent() {
        let catalog = Catalog::from_records(vec![record(1, "A"), record(2, "A")]);
        let matrix = SimilarityMatrix::new(vec![vec![1.0, 0.5], vec![0.5, 1.0]]);
        assert!(matches!(
            CatalogSnapshot::new(catalog, matrix),
            Err(DataError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_duplicate_row_index_is_inconsistent() {
        let mut records = vec![record(1, "A"), record(2, "B")];
        records[1].row_index = Some(0);
        let catalog = Catalog::from_records(records);
        let matrix = SimilarityMatrix::new(vec![vec![1.0, 0.5], vec![0.5, 1.0]]);
        assert!(matches!(
            CatalogSnapshot::new(catalog, matrix),
            Err(DataError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_search_is_case_insensitive_and_ordered() {
        let catalog = Catalog::from_records(vec![
            record(1, "The Dark Knight"),
            record(2, "Avatar"),
            record(3, "The Dark Knight Rises"),
        ]);

        let titles: Vec<&str> = catalog.search("dark", 10).iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["The Dark Knight", "The Dark Knight Rises"]);

        assert_eq!(catalog.search("", 2).len(), 2);
        assert!(catalog.search("zzz", 10).is_empty());
    }

    #[test]
    fn test_find_by_title_is_exact() {
        let catalog = Catalog::from_records(vec![record(1, "Avatar")]);
        assert!(catalog.find_by_title("Avatar").is_some());
        assert!(catalog.find_by_title("avatar").is_none());
        assert!(catalog.find_by_title("Avatar ").is_none());
    }
}
