pub mod catalog;
pub mod posters;
pub mod providers;
pub mod recommendations;

pub use catalog::{Catalog, CatalogSnapshot, SimilarityMatrix};
pub use posters::{PosterCache, PosterResolver};
pub use providers::{MetadataProvider, TmdbProvider};
pub use recommendations::recommend;
