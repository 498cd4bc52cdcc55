//! Selection state for a single estimate.
//!
//! The [`Estimator`] owns everything the user can change (property type,
//! selected items, quantities and custom items) and borrows the
//! [`Catalogue`] it selects from. Totals are never stored; every call to
//! [`Estimator::totals`] recomputes them from the current selection.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fee_core::{Catalogue, CustomField, Estimator, PropertyType};
//!
//! let catalogue = Catalogue::standard();
//! let mut estimator = Estimator::new(&catalogue);
//!
//! estimator.set_property_type(Some(PropertyType::Land));
//! estimator.set_quantity("verification-id", 2);
//!
//! let courier = estimator.add_custom_item();
//! estimator.update_custom_item(&courier, CustomField::Description, "Courier");
//! estimator.update_custom_item(&courier, CustomField::UnitCost, "20.00");
//!
//! assert!(estimator.is_selected(&courier));
//! let totals = estimator.totals();
//! assert_eq!(totals.total, totals.subtotal_ex_gst + totals.gst);
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::calculations::common::coerce_quantity;
use crate::calculations::{GstCalculator, LineTotals, Totals};
use crate::models::{CatalogueItem, CustomField, CustomItem, PropertyType, SelectedItem};
use crate::Catalogue;

/// Sequence number given to the first custom item after a reset.
pub const FIRST_CUSTOM_SEQUENCE: u32 = 1;

#[derive(Debug, Clone)]
pub struct Estimator<'a> {
    catalogue: &'a Catalogue,
    property_type: Option<PropertyType>,
    selected: HashMap<String, SelectedItem>,
    quantities: HashMap<String, u32>,
    /// Creation order is display order.
    custom_items: Vec<CustomItem>,
    next_custom_sequence: u32,
}

impl<'a> Estimator<'a> {
    /// Creates an empty estimate over `catalogue`.
    pub fn new(catalogue: &'a Catalogue) -> Self {
        Self {
            catalogue,
            property_type: None,
            selected: HashMap::new(),
            quantities: HashMap::new(),
            custom_items: Vec::new(),
            next_custom_sequence: FIRST_CUSTOM_SEQUENCE,
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Switches the active property type.
    ///
    /// The selection becomes exactly the catalogue items that apply to the
    /// new type. Anything selected by hand, including custom items, is
    /// dropped; custom item definitions are kept. Stored quantities survive
    /// only for the newly selected items. `None` leaves nothing selected.
    pub fn set_property_type(
        &mut self,
        property_type: Option<PropertyType>,
    ) {
        let catalogue = self.catalogue;
        let mut selected = HashMap::new();
        let mut quantities = HashMap::new();

        if let Some(property_type) = property_type {
            for item in catalogue.for_property_type(property_type) {
                let quantity = self.stored_quantity(&item.id);
                selected.insert(item.id.clone(), Self::select_catalogue_item(item, quantity));
                quantities.insert(item.id.clone(), quantity);
            }
        }

        let dropped = self
            .selected
            .keys()
            .filter(|id| !selected.contains_key(*id))
            .count();
        debug!(
            property_type = ?property_type,
            selected = selected.len(),
            dropped,
            "property type changed"
        );

        self.property_type = property_type;
        self.selected = selected;
        self.quantities = quantities;
    }

    /// Checks or unchecks an item.
    ///
    /// Catalogue items are always selectable. A custom item is only selected
    /// when its description and cost are valid; otherwise checking it does
    /// nothing. Unknown ids are ignored.
    pub fn toggle_item(
        &mut self,
        item_id: &str,
        checked: bool,
    ) {
        let catalogue = self.catalogue;

        if let Some(item) = catalogue.get(item_id) {
            if checked {
                let quantity = self.stored_quantity(item_id);
                self.selected
                    .insert(item.id.clone(), Self::select_catalogue_item(item, quantity));
            } else {
                self.selected.remove(item_id);
            }
            debug!(item_id, checked, "catalogue item toggled");
            return;
        }

        let Some(index) = self.custom_index(item_id) else {
            debug!(item_id, "toggle ignored for unknown item");
            return;
        };

        if checked {
            if !self.custom_items[index].is_valid() {
                debug!(item_id, "custom item incomplete; not selected");
                return;
            }
            self.refresh_custom_selection(index);
        } else {
            self.selected.remove(item_id);
        }
        debug!(item_id, checked, "custom item toggled");
    }

    /// Adds a blank, unselected custom item and returns its id.
    pub fn add_custom_item(&mut self) -> String {
        let item = CustomItem::new(self.next_custom_sequence);
        let id = item.id.clone();

        self.custom_items.push(item);
        self.next_custom_sequence = self.next_custom_sequence.saturating_add(1);
        debug!(item_id = %id, "custom item added");

        id
    }

    /// Stores new text for one field of a custom item, then selects the item
    /// if it is now valid or deselects it if it is not. Unknown ids are
    /// ignored.
    pub fn update_custom_item(
        &mut self,
        item_id: &str,
        field: CustomField,
        value: impl Into<String>,
    ) {
        let Some(index) = self.custom_index(item_id) else {
            debug!(item_id, ?field, "update ignored for unknown custom item");
            return;
        };

        self.custom_items[index].set_field(field, value);
        self.refresh_custom_selection(index);
    }

    /// Sets an item's quantity, coercing non-positive requests to 1.
    ///
    /// The quantity is remembered for the id, applied in place to an existing
    /// selection (keeping its unit cost) and mirrored onto the custom item
    /// when the id is one. Ids that are neither catalogue nor custom items
    /// are ignored.
    pub fn set_quantity(
        &mut self,
        item_id: &str,
        requested: i64,
    ) {
        let is_catalogue_item = self.catalogue.get(item_id).is_some();
        let custom_index = self.custom_index(item_id);
        if !is_catalogue_item && custom_index.is_none() {
            debug!(item_id, "quantity ignored for unknown item");
            return;
        }

        let quantity = coerce_quantity(requested);
        self.quantities.insert(item_id.to_string(), quantity);

        if let Some(selected) = self.selected.get_mut(item_id) {
            selected.set_quantity(quantity);
        }
        if let Some(index) = custom_index {
            self.custom_items[index].quantity = quantity;
        }
        debug!(item_id, quantity, "quantity set");
    }

    /// Returns the estimate to its initial state. The custom item counter
    /// starts again from [`FIRST_CUSTOM_SEQUENCE`].
    pub fn reset(&mut self) {
        self.property_type = None;
        self.selected.clear();
        self.quantities.clear();
        self.custom_items.clear();
        self.next_custom_sequence = FIRST_CUSTOM_SEQUENCE;
        debug!("estimate reset");
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn catalogue(&self) -> &'a Catalogue {
        self.catalogue
    }

    pub fn property_type(&self) -> Option<PropertyType> {
        self.property_type
    }

    /// Selected items for display: catalogue items in catalogue order, then
    /// custom items in creation order.
    pub fn selected_items(&self) -> Vec<&SelectedItem> {
        let mut items: Vec<_> = self.selected.values().collect();
        items.sort_by_key(|item| self.display_rank(&item.id));
        items
    }

    pub fn selected_item(
        &self,
        item_id: &str,
    ) -> Option<&SelectedItem> {
        self.selected.get(item_id)
    }

    pub fn is_selected(
        &self,
        item_id: &str,
    ) -> bool {
        self.selected.contains_key(item_id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// The quantity shown for an item: the remembered quantity, the custom
    /// item's own quantity, or 1.
    pub fn quantity(
        &self,
        item_id: &str,
    ) -> u32 {
        if let Some(quantity) = self.quantities.get(item_id) {
            return *quantity;
        }
        self.custom_index(item_id)
            .map(|index| self.custom_items[index].quantity)
            .unwrap_or(1)
    }

    pub fn custom_items(&self) -> &[CustomItem] {
        &self.custom_items
    }

    pub fn custom_item(
        &self,
        item_id: &str,
    ) -> Option<&CustomItem> {
        self.custom_index(item_id)
            .map(|index| &self.custom_items[index])
    }

    /// Sequence number the next custom item will receive.
    pub fn next_custom_sequence(&self) -> u32 {
        self.next_custom_sequence
    }

    /// Current totals, recomputed from the selection on every call.
    pub fn totals(&self) -> Totals {
        GstCalculator::new(self.catalogue).totals(self.selected.values())
    }

    /// Per-line GST breakdown in display order.
    pub fn line_totals(&self) -> Vec<LineTotals> {
        GstCalculator::new(self.catalogue).line_totals(self.selected_items())
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn select_catalogue_item(
        item: &CatalogueItem,
        quantity: u32,
    ) -> SelectedItem {
        SelectedItem::new(
            item.id.clone(),
            item.description.clone(),
            item.effective_unit_cost(),
            quantity,
        )
    }

    fn stored_quantity(
        &self,
        item_id: &str,
    ) -> u32 {
        self.quantities.get(item_id).copied().unwrap_or(1)
    }

    fn custom_index(
        &self,
        item_id: &str,
    ) -> Option<usize> {
        self.custom_items
            .iter()
            .position(|item| item.id == item_id)
    }

    /// Makes the selection state of a custom item match its validity.
    fn refresh_custom_selection(
        &mut self,
        index: usize,
    ) {
        let custom = &self.custom_items[index];

        match custom.validated() {
            Some((description, unit_cost)) => {
                let selected =
                    SelectedItem::new(custom.id.clone(), description, unit_cost, custom.quantity);
                debug!(item_id = %custom.id, %unit_cost, "custom item selected");
                self.selected.insert(custom.id.clone(), selected);
            }
            None => {
                if self.selected.remove(&custom.id).is_some() {
                    debug!(item_id = %custom.id, "custom item deselected");
                }
            }
        }
    }

    fn display_rank(
        &self,
        item_id: &str,
    ) -> (u8, usize) {
        if let Some(position) = self.catalogue.position(item_id) {
            (0, position)
        } else if let Some(index) = self.custom_index(item_id) {
            (1, index)
        } else {
            (2, 0)
        }
    }
}
