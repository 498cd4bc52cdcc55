//! Application state for the fee estimator session.
//!
//! Holds everything that lives for one run: the estimate being built and
//! where the user is in the guided tour. Nothing here is saved except the
//! tour's completion flag, which goes through a preference store.

use fee_core::{Catalogue, Estimator};

use crate::tutorial::Tutorial;

#[derive(Debug, Clone)]
pub struct AppState<'a> {
    pub estimator: Estimator<'a>,
    pub tutorial: Tutorial,
}

impl<'a> AppState<'a> {
    /// Create an empty estimate over `catalogue`.
    pub fn new(
        catalogue: &'a Catalogue,
        tutorial: Tutorial,
    ) -> Self {
        Self {
            estimator: Estimator::new(catalogue),
            tutorial,
        }
    }

    /// Check whether anything has been entered yet.
    pub fn has_estimate_data(&self) -> bool {
        self.estimator.property_type().is_some()
            || self.estimator.selected_count() > 0
            || !self.estimator.custom_items().is_empty()
    }

    /// Clear all estimate data for starting fresh. Tour progress is kept.
    pub fn clear_estimate(&mut self) {
        self.estimator.reset();
    }
}
