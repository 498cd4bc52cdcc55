pub mod calculations;
pub mod catalogue;
pub mod estimator;
pub mod models;

pub use calculations::{GstCalculator, GstSplit, LineTotals, Totals};
pub use catalogue::{Catalogue, CatalogueError};
pub use estimator::Estimator;
pub use models::*;
