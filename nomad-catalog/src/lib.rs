pub mod catalog;
pub mod destination;
pub mod slug;

pub use catalog::{CatalogOptions, DestinationCatalog};
pub use destination::{Destination, ImageRef};
pub use slug::{fold, slugify};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed catalog data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid price range {min}..={max}")]
    InvalidPriceRange { min: u32, max: u32 },
}
