//! Text rendering of an estimate: the item list, the running summary and the
//! printable estimate.

use comfy_table::{Cell, CellAlignment, Table};
use fee_core::{CatalogueItem, Estimator, Totals};

use crate::utils::money;

pub const ESTIMATE_HEADING: &str = "Conveyancing fees and costs";

fn amount(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn mark(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

fn catalogue_notes(item: &CatalogueItem) -> &'static str {
    if item.is_free() {
        "Free"
    } else if item.gst_included {
        "Inc. GST"
    } else {
        "+ GST"
    }
}

/// Every catalogue item followed by every custom item, with selection marks,
/// quantities and line costs. Items matching the active property type show
/// its label in the Type column.
pub fn catalogue_table(estimator: &Estimator<'_>) -> Table {
    let property_type = estimator.property_type();

    let mut table = Table::new();
    table.set_header(vec!["", "Id", "Description", "Unit cost", "Qty", "Cost", "Type", "Notes"]);

    for item in estimator.catalogue() {
        let selected = estimator.selected_item(&item.id);
        let matches = property_type.filter(|pt| item.applies_to(*pt));

        table.add_row(vec![
            Cell::new(mark(selected.is_some())),
            Cell::new(&item.id),
            Cell::new(&item.description),
            amount(money(item.effective_unit_cost())),
            amount(estimator.quantity(&item.id).to_string()),
            amount(selected.map_or_else(|| "-".to_string(), |s| money(s.total))),
            Cell::new(matches.map_or("", |pt| pt.label())),
            Cell::new(catalogue_notes(item)),
        ]);
    }

    for custom in estimator.custom_items() {
        let selected = estimator.selected_item(&custom.id);
        let description = if custom.description.trim().is_empty() {
            "(no description)"
        } else {
            custom.description.trim()
        };
        let unit_cost = match selected {
            Some(s) => money(s.unit_cost),
            None if custom.unit_cost.trim().is_empty() => "-".to_string(),
            None => custom.unit_cost.trim().to_string(),
        };
        let notes = if selected.is_some() {
            "Custom, + GST"
        } else {
            "Custom, incomplete"
        };

        table.add_row(vec![
            Cell::new(mark(selected.is_some())),
            Cell::new(&custom.id),
            Cell::new(description),
            amount(unit_cost),
            amount(custom.quantity.to_string()),
            amount(selected.map_or_else(|| "-".to_string(), |s| money(s.total))),
            Cell::new(""),
            Cell::new(notes),
        ]);
    }

    table
}

/// Rounded totals as a two-column table.
pub fn totals_table(totals: &Totals) -> Table {
    let rounded = totals.rounded();

    let mut table = Table::new();
    table.add_row(vec![Cell::new("Subtotal (excl. GST)"), amount(money(rounded.subtotal_ex_gst))]);
    table.add_row(vec![Cell::new("GST"), amount(money(rounded.gst))]);
    table.add_row(vec![Cell::new("Total (incl. GST)"), amount(money(rounded.total))]);
    table
}

/// Selected items as `description (×n)` with their cost, then the totals.
pub fn summary(estimator: &Estimator<'_>) -> String {
    let selected = estimator.selected_items();
    if selected.is_empty() {
        return format!("No items selected.\n{}", totals_table(&estimator.totals()));
    }

    let mut table = Table::new();
    table.set_header(vec!["Item", "Cost"]);
    for item in selected {
        let label = if item.quantity > 1 {
            format!("{} (×{})", item.description, item.quantity)
        } else {
            item.description.clone()
        };
        table.add_row(vec![Cell::new(label), amount(money(item.total))]);
    }

    format!("{table}\n{}", totals_table(&estimator.totals()))
}

/// The full estimate as plain text, suitable for printing or saving.
pub fn printable_estimate(estimator: &Estimator<'_>) -> String {
    let property_line = match estimator.property_type() {
        Some(pt) => format!("Property type: {} ({})", pt.label(), pt.blurb()),
        None => "Property type: not selected".to_string(),
    };

    let mut items = Table::new();
    items.set_header(vec!["Description", "Unit cost", "Qty", "Cost", "GST"]);
    for line in estimator.line_totals() {
        let free = estimator
            .catalogue()
            .get(&line.id)
            .is_some_and(CatalogueItem::is_free);
        let gst = if free {
            "Free"
        } else if line.gst_included {
            "Incl."
        } else {
            "Excl."
        };

        items.add_row(vec![
            Cell::new(&line.description),
            amount(money(line.unit_cost)),
            amount(line.quantity.to_string()),
            amount(money(line.total)),
            Cell::new(gst),
        ]);
    }

    format!(
        "{ESTIMATE_HEADING}\n{property_line}\n\n{items}\n\n{}\nAll amounts are in AUD.\n",
        totals_table(&estimator.totals())
    )
}

#[cfg(test)]
mod tests {
    use fee_core::{Catalogue, CustomField, PropertyType};

    use super::*;

    #[test]
    fn summary_shows_multiplied_quantities() {
        let catalogue = Catalogue::standard();
        let mut estimator = Estimator::new(&catalogue);
        estimator.toggle_item("verification-id", true);
        estimator.set_quantity("verification-id", 2);
        estimator.toggle_item("titles-search", true);

        let text = summary(&estimator);

        assert!(text.contains("Verification of ID (per person on Title) (×2)"));
        assert!(text.contains("$59.80"));
        assert!(text.contains("Titles search"));
        assert!(!text.contains("Titles search (×"));
    }

    #[test]
    fn summary_without_selection_shows_zero_totals() {
        let catalogue = Catalogue::standard();
        let estimator = Estimator::new(&catalogue);

        let text = summary(&estimator);

        assert!(text.starts_with("No items selected."));
        assert!(text.contains("Total (incl. GST)"));
        assert!(text.contains("$0.00"));
    }

    #[test]
    fn printable_estimate_has_heading_and_rounded_totals() {
        let catalogue = Catalogue::standard();
        let mut estimator = Estimator::new(&catalogue);
        estimator.toggle_item("verification-id", true);
        let courier = estimator.add_custom_item();
        estimator.update_custom_item(&courier, CustomField::Description, "Courier");
        estimator.update_custom_item(&courier, CustomField::UnitCost, "100");

        let text = printable_estimate(&estimator);

        assert!(text.starts_with("Conveyancing fees and costs\nProperty type: not selected"));
        assert!(text.contains("Courier"));
        assert!(text.contains("Excl."));
        assert!(text.contains("$127.18"));
        assert!(text.contains("$12.72"));
        assert!(text.contains("$139.90"));
    }

    #[test]
    fn printable_estimate_names_property_type() {
        let catalogue = Catalogue::standard();
        let mut estimator = Estimator::new(&catalogue);
        estimator.set_property_type(Some(PropertyType::Unit));

        let text = printable_estimate(&estimator);

        assert!(text.contains("Property type: UNIT (Apartment/townhouse)"));
        assert!(text.contains("Body Corporate Certificate"));
        assert!(text.contains("Free"));
    }

    #[test]
    fn catalogue_table_marks_selection_and_matches() {
        let catalogue = Catalogue::standard();
        let mut estimator = Estimator::new(&catalogue);
        estimator.set_property_type(Some(PropertyType::Land));
        estimator.add_custom_item();

        let text = catalogue_table(&estimator).to_string();
        let row = |id: &str| {
            text.lines()
                .find(|line| line.contains(id))
                .unwrap_or_else(|| panic!("no row for {id}"))
                .to_string()
        };

        assert!(row("titles-search").contains("[x]"));
        assert!(row("titles-search").contains("LAND"));
        assert!(row("water-services").contains("[ ]"));
        assert!(!row("water-services").contains("LAND"));
        assert!(row("professional-fees").contains("+ GST"));
        assert!(row("custom-1").contains("(no description)"));
        assert!(row("custom-1").contains("Custom, incomplete"));
    }
}
