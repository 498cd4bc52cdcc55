//! GST totals for a set of selected disbursement items.
//!
//! Each selected item contributes a tax-exclusive amount and a GST amount.
//! How the two are derived depends on whether the catalogue price already
//! contains GST:
//!
//! | Price basis   | Exclusive amount | GST                       |
//! |---------------|------------------|---------------------------|
//! | GST inclusive | `total / 1.1`    | `total - exclusive`       |
//! | GST exclusive | `total`          | `total × 0.10`            |
//!
//! Custom items have no catalogue entry and are always GST exclusive.
//!
//! Accumulation is done on unrounded [`Decimal`] values; rounding to cents
//! happens only in [`Totals::rounded`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fee_core::{Catalogue, GstCalculator, SelectedItem};
//!
//! let catalogue = Catalogue::standard();
//! let selected = vec![
//!     SelectedItem::new("verification-id", "Verification of ID", dec!(29.90), 1),
//!     SelectedItem::new("custom-1", "Courier", dec!(100.00), 1),
//! ];
//!
//! let totals = GstCalculator::new(&catalogue).totals(&selected).rounded();
//!
//! assert_eq!(totals.subtotal_ex_gst, dec!(127.18));
//! assert_eq!(totals.gst, dec!(12.72));
//! assert_eq!(totals.total, dec!(139.90));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_to_cents;
use crate::{Catalogue, SelectedItem};

/// GST rate applied to tax-exclusive amounts.
pub const GST_RATE: Decimal = dec!(0.10);

/// Divisor that recovers the tax-exclusive amount from a GST-inclusive one.
pub const GST_INCLUSIVE_DIVISOR: Decimal = dec!(1.1);

/// The tax-exclusive and GST components of one amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GstSplit {
    pub exclusive: Decimal,
    pub gst: Decimal,
}

impl GstSplit {
    /// Splits an amount that already contains GST.
    pub fn from_inclusive(amount: Decimal) -> Self {
        let exclusive = amount / GST_INCLUSIVE_DIVISOR;
        Self {
            exclusive,
            gst: amount - exclusive,
        }
    }

    /// Splits an amount that does not yet include GST.
    pub fn from_exclusive(amount: Decimal) -> Self {
        Self {
            exclusive: amount,
            gst: amount * GST_RATE,
        }
    }

    pub fn inclusive(&self) -> Decimal {
        self.exclusive + self.gst
    }
}

/// Estimate totals. `total` is always `subtotal_ex_gst + gst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal_ex_gst: Decimal,
    pub gst: Decimal,
    pub total: Decimal,
}

impl Totals {
    pub fn zero() -> Self {
        Self::default()
    }

    fn from_parts(
        subtotal_ex_gst: Decimal,
        gst: Decimal,
    ) -> Self {
        Self {
            subtotal_ex_gst,
            gst,
            total: subtotal_ex_gst + gst,
        }
    }

    /// Rounds for display.
    ///
    /// `total` and `gst` are rounded to cents independently and the subtotal
    /// is derived from them, so the displayed figures still add up exactly.
    pub fn rounded(&self) -> Self {
        let total = round_to_cents(self.total);
        let gst = round_to_cents(self.gst);
        Self {
            subtotal_ex_gst: total - gst,
            gst,
            total,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total.is_zero() && self.gst.is_zero()
    }
}

/// Per-line breakdown used for itemised output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTotals {
    pub id: String,
    pub description: String,
    pub unit_cost: Decimal,
    pub quantity: u32,
    pub total: Decimal,
    pub gst_included: bool,
    pub split: GstSplit,
}

/// Calculator for estimate totals.
///
/// Borrows the catalogue so it can tell which selected items are priced
/// GST inclusive.
#[derive(Debug, Clone, Copy)]
pub struct GstCalculator<'a> {
    catalogue: &'a Catalogue,
}

impl<'a> GstCalculator<'a> {
    pub fn new(catalogue: &'a Catalogue) -> Self {
        Self { catalogue }
    }

    /// Whether the item's price already contains GST. Ids without a
    /// catalogue entry (custom items) are treated as exclusive.
    pub fn is_gst_included(
        &self,
        item_id: &str,
    ) -> bool {
        self.catalogue
            .get(item_id)
            .is_some_and(|item| item.gst_included)
    }

    /// Splits one selected item's line total.
    pub fn split(
        &self,
        item: &SelectedItem,
    ) -> GstSplit {
        if self.is_gst_included(&item.id) {
            GstSplit::from_inclusive(item.total)
        } else {
            GstSplit::from_exclusive(item.total)
        }
    }

    /// Sums the splits of every item. The result does not depend on the
    /// iteration order.
    pub fn totals<'i, I>(
        &self,
        items: I,
    ) -> Totals
    where
        I: IntoIterator<Item = &'i SelectedItem>,
    {
        let (subtotal, gst) = items
            .into_iter()
            .map(|item| self.split(item))
            .fold((Decimal::ZERO, Decimal::ZERO), |(subtotal, gst), split| {
                (subtotal + split.exclusive, gst + split.gst)
            });

        Totals::from_parts(subtotal, gst)
    }

    /// Itemised breakdown, in the order the items are given.
    pub fn line_totals<'i, I>(
        &self,
        items: I,
    ) -> Vec<LineTotals>
    where
        I: IntoIterator<Item = &'i SelectedItem>,
    {
        items
            .into_iter()
            .map(|item| LineTotals {
                id: item.id.clone(),
                description: item.description.clone(),
                unit_cost: item.unit_cost,
                quantity: item.quantity,
                total: item.total,
                gst_included: self.is_gst_included(&item.id),
                split: self.split(item),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{CatalogueItem, ItemCategory, PropertyType};

    fn test_catalogue() -> Catalogue {
        Catalogue::new(vec![
            CatalogueItem {
                id: "search".to_string(),
                description: "Title search".to_string(),
                unit_cost: dec!(29.90),
                category: ItemCategory::Standard,
                property_types: vec![PropertyType::House],
                gst_included: true,
            },
            CatalogueItem {
                id: "fees".to_string(),
                description: "Professional fees".to_string(),
                unit_cost: dec!(550.00),
                category: ItemCategory::Standard,
                property_types: vec![PropertyType::House],
                gst_included: false,
            },
        ])
        .unwrap()
    }

    // =========================================================================
    // GstSplit tests
    // =========================================================================

    #[test]
    fn inclusive_split_backs_out_gst() {
        let split = GstSplit::from_inclusive(dec!(29.90));

        assert_eq!(round_to_cents(split.exclusive), dec!(27.18));
        assert_eq!(round_to_cents(split.gst), dec!(2.72));
        assert!(split.exclusive > dec!(27.1818) && split.exclusive < dec!(27.1819));
        assert!(split.gst > dec!(2.7181) && split.gst < dec!(2.7182));
    }

    #[test]
    fn inclusive_split_reassembles_exactly() {
        let split = GstSplit::from_inclusive(dec!(29.90));

        assert_eq!(split.inclusive(), dec!(29.90));
    }

    #[test]
    fn exclusive_split_adds_ten_percent() {
        let split = GstSplit::from_exclusive(dec!(100.00));

        assert_eq!(split.exclusive, dec!(100.00));
        assert_eq!(split.gst, dec!(10.00));
        assert_eq!(split.inclusive(), dec!(110.00));
    }

    // =========================================================================
    // GstCalculator tests
    // =========================================================================

    #[test]
    fn totals_of_nothing_are_zero() {
        let catalogue = test_catalogue();
        let items: Vec<SelectedItem> = Vec::new();

        let totals = GstCalculator::new(&catalogue).totals(&items);

        assert_eq!(totals, Totals::zero());
        assert!(totals.is_zero());
    }

    #[test]
    fn custom_items_are_treated_as_exclusive() {
        let catalogue = test_catalogue();
        let calculator = GstCalculator::new(&catalogue);
        let item = SelectedItem::new("custom-1", "Courier", dec!(100.00), 1);

        assert!(!calculator.is_gst_included("custom-1"));
        assert_eq!(calculator.split(&item), GstSplit::from_exclusive(dec!(100.00)));
    }

    #[test]
    fn totals_mix_inclusive_and_exclusive_items() {
        let catalogue = test_catalogue();
        let items = vec![
            SelectedItem::new("search", "Title search", dec!(29.90), 2),
            SelectedItem::new("fees", "Professional fees", dec!(550.00), 1),
        ];

        let totals = GstCalculator::new(&catalogue).totals(&items);

        assert_eq!(totals.total, totals.subtotal_ex_gst + totals.gst);
        assert_eq!(totals.total, dec!(59.80) + dec!(605.00));
        assert_eq!(
            totals.rounded(),
            Totals {
                subtotal_ex_gst: dec!(604.36),
                gst: dec!(60.44),
                total: dec!(664.80),
            }
        );
    }

    #[test]
    fn totals_ignore_iteration_order() {
        let catalogue = test_catalogue();
        let calculator = GstCalculator::new(&catalogue);
        let mut items = vec![
            SelectedItem::new("search", "Title search", dec!(29.90), 3),
            SelectedItem::new("fees", "Professional fees", dec!(550.00), 1),
            SelectedItem::new("custom-1", "Courier", dec!(12.34), 5),
        ];

        let forward = calculator.totals(&items);
        items.reverse();
        let backward = calculator.totals(&items);

        assert_eq!(forward.rounded(), backward.rounded());
    }

    #[test]
    fn many_inclusive_items_do_not_drift() {
        let catalogue = test_catalogue();
        let items: Vec<_> = (0..1000)
            .map(|_| SelectedItem::new("search", "Title search", dec!(29.90), 1))
            .collect();

        let totals = GstCalculator::new(&catalogue).totals(&items).rounded();

        assert_eq!(totals.total, dec!(29900.00));
        assert_eq!(totals.gst, dec!(2718.18));
        assert_eq!(totals.subtotal_ex_gst, dec!(27181.82));
    }

    #[test]
    fn rounded_totals_always_add_up() {
        let catalogue = test_catalogue();
        let items = vec![
            SelectedItem::new("custom-1", "A", dec!(0.05), 1),
            SelectedItem::new("custom-2", "B", dec!(0.15), 1),
            SelectedItem::new("search", "Title search", dec!(0.01), 1),
        ];

        let rounded = GstCalculator::new(&catalogue).totals(&items).rounded();

        assert_eq!(rounded.total, rounded.subtotal_ex_gst + rounded.gst);
    }

    #[test]
    fn line_totals_keep_input_order_and_flags() {
        let catalogue = test_catalogue();
        let items = vec![
            SelectedItem::new("fees", "Professional fees", dec!(550.00), 1),
            SelectedItem::new("search", "Title search", dec!(29.90), 1),
        ];

        let lines = GstCalculator::new(&catalogue).line_totals(&items);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, "fees");
        assert!(!lines[0].gst_included);
        assert_eq!(lines[0].split.gst, dec!(55.00));
        assert_eq!(lines[1].id, "search");
        assert!(lines[1].gst_included);
    }
}
