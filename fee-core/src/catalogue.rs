//! The disbursement catalogue.
//!
//! A [`Catalogue`] is an ordered, validated list of [`CatalogueItem`]s. Order
//! is significant: it is the display order and the order in which items are
//! auto-selected for a property type.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use crate::calculations::common::MAX_UNIT_COST;
use crate::models::{CUSTOM_ID_PREFIX, CatalogueItem, ItemCategory, PropertyType};

/// Errors raised while assembling a catalogue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogueError {
    /// An item at the given 0-based position has an empty id.
    #[error("item at position {0} has an empty id")]
    EmptyId(usize),

    #[error("duplicate item id '{0}'")]
    DuplicateId(String),

    /// Ids starting with the custom item prefix would collide with
    /// user-created items.
    #[error("item id '{0}' uses the reserved 'custom-' prefix")]
    ReservedId(String),

    #[error("item '{id}' has a negative unit cost {unit_cost}")]
    NegativeUnitCost { id: String, unit_cost: Decimal },

    #[error("item '{id}' has unit cost {unit_cost} above the limit of 1000000000")]
    UnitCostTooLarge { id: String, unit_cost: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalogue {
    items: Vec<CatalogueItem>,
}

impl Catalogue {
    /// Builds a catalogue from items in display order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError`] if:
    /// - an id is empty, duplicated, or uses the custom item prefix
    /// - a unit cost is negative or above [`MAX_UNIT_COST`]
    pub fn new(items: Vec<CatalogueItem>) -> Result<Self, CatalogueError> {
        let mut seen = HashSet::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            if item.id.trim().is_empty() {
                return Err(CatalogueError::EmptyId(position));
            }
            if item.id.starts_with(CUSTOM_ID_PREFIX) {
                return Err(CatalogueError::ReservedId(item.id.clone()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogueError::DuplicateId(item.id.clone()));
            }
            if item.unit_cost < Decimal::ZERO {
                return Err(CatalogueError::NegativeUnitCost {
                    id: item.id.clone(),
                    unit_cost: item.unit_cost,
                });
            }
            if item.unit_cost > MAX_UNIT_COST {
                return Err(CatalogueError::UnitCostTooLarge {
                    id: item.id.clone(),
                    unit_cost: item.unit_cost,
                });
            }
        }

        Ok(Self { items })
    }

    /// The built-in Queensland disbursement schedule.
    pub fn standard() -> Self {
        use PropertyType::{House, Land, Unit};

        const ALL: &[PropertyType] = &[Land, House, Unit];
        const BUILT: &[PropertyType] = &[House, Unit];

        let items = vec![
            standard_item("professional-fees", "Professional fees", dec!(550.00), ALL, false),
            standard_item(
                "verification-id",
                "Verification of ID (per person on Title)",
                dec!(29.90),
                ALL,
                true,
            ),
            standard_item("titles-search", "Titles search", dec!(40.39), ALL, true),
            standard_item("registered-plan", "Registered Plan search", dec!(43.37), ALL, true),
            standard_item(
                "transport-roads",
                "Qld Transport and Main Roads Property search",
                dec!(49.12),
                ALL,
                true,
            ),
            standard_item("contaminated-land", "Contaminated Land search", dec!(76.03), BUILT, true),
            standard_item("heritage-search", "DEHP - Heritage search", dec!(90.18), ALL, true),
            standard_item("qbcc-insurance", "QBCC - Insurance search", dec!(96.55), BUILT, true),
            standard_item(
                "qcat-records",
                "QCAT Records (per person on Title)",
                dec!(37.58),
                ALL,
                true,
            ),
            standard_item(
                "council-rates",
                "Council Rates (Sunshine Coast)",
                dec!(147.42),
                ALL,
                true,
            ),
            standard_item("water-services", "Water Services", dec!(262.85), BUILT, true),
            standard_item("body-corporate-cts", "Body Corporate CTS search", dec!(14.18), &[Unit], true),
            standard_item("cms-dealing", "CMS Dealing search", dec!(69.11), BUILT, true),
            standard_item(
                "body-corporate-cert",
                "Body Corporate Certificate",
                dec!(153.06),
                &[Unit],
                true,
            ),
            standard_item("asic-search", "ASIC search (per entity)", dec!(30.45), ALL, true),
            free_item("qbcc-pool-safety", "QBCC Pool Safety Certificate search", BUILT),
            free_item("council-zoning", "Council Zoning", &[]),
        ];

        Self { items }
    }

    pub fn items(&self) -> &[CatalogueItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogueItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&CatalogueItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Display position of an item.
    pub fn position(
        &self,
        id: &str,
    ) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Items auto-selected for `property_type`, in catalogue order.
    pub fn for_property_type(
        &self,
        property_type: PropertyType,
    ) -> impl Iterator<Item = &CatalogueItem> + '_ {
        self.items
            .iter()
            .filter(move |item| item.applies_to(property_type))
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a CatalogueItem;
    type IntoIter = std::slice::Iter<'a, CatalogueItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn standard_item(
    id: &str,
    description: &str,
    unit_cost: Decimal,
    property_types: &[PropertyType],
    gst_included: bool,
) -> CatalogueItem {
    CatalogueItem {
        id: id.to_string(),
        description: description.to_string(),
        unit_cost,
        category: ItemCategory::Standard,
        property_types: property_types.to_vec(),
        gst_included,
    }
}

fn free_item(
    id: &str,
    description: &str,
    property_types: &[PropertyType],
) -> CatalogueItem {
    CatalogueItem {
        id: id.to_string(),
        description: description.to_string(),
        unit_cost: Decimal::ZERO,
        category: ItemCategory::Free,
        property_types: property_types.to_vec(),
        gst_included: true,
    }
}
