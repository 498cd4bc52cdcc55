mod loader;

pub use loader::{CatalogueLoader, CatalogueLoaderError, CatalogueRecord};
