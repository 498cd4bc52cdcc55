use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::parse_unit_cost;

/// Prefix shared by every generated custom item id.
pub const CUSTOM_ID_PREFIX: &str = "custom-";

/// Which text field of a [`CustomItem`] an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomField {
    Description,
    UnitCost,
}

/// A user-defined line item. Both text fields hold exactly what was typed;
/// they are only interpreted when deciding whether the item can be selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomItem {
    pub id: String,
    pub description: String,
    pub unit_cost: String,
    pub quantity: u32,
}

impl CustomItem {
    pub fn new(sequence: u32) -> Self {
        Self {
            id: format!("{CUSTOM_ID_PREFIX}{sequence}"),
            description: String::new(),
            unit_cost: String::new(),
            quantity: 1,
        }
    }

    pub fn set_field(
        &mut self,
        field: CustomField,
        value: impl Into<String>,
    ) {
        match field {
            CustomField::Description => self.description = value.into(),
            CustomField::UnitCost => self.unit_cost = value.into(),
        }
    }

    /// Returns the trimmed description and parsed unit cost when the item is
    /// complete enough to be selected.
    pub fn validated(&self) -> Option<(&str, Decimal)> {
        let description = self.description.trim();
        if description.is_empty() {
            return None;
        }
        let unit_cost = parse_unit_cost(&self.unit_cost)?;
        Some((description, unit_cost))
    }

    pub fn is_valid(&self) -> bool {
        self.validated().is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_item_is_blank_with_quantity_one() {
        let item = CustomItem::new(3);

        assert_eq!(item.id, "custom-3");
        assert_eq!(item.description, "");
        assert_eq!(item.unit_cost, "");
        assert_eq!(item.quantity, 1);
        assert!(!item.is_valid());
    }

    #[test]
    fn validated_trims_description() {
        let mut item = CustomItem::new(1);
        item.set_field(CustomField::Description, "  Courier  ");
        item.set_field(CustomField::UnitCost, "45.00");

        assert_eq!(item.validated(), Some(("Courier", dec!(45.00))));
    }

    #[test]
    fn whitespace_description_is_invalid() {
        let mut item = CustomItem::new(1);
        item.set_field(CustomField::Description, "   ");
        item.set_field(CustomField::UnitCost, "10");

        assert_eq!(item.validated(), None);
    }

    #[test]
    fn unparseable_cost_is_invalid() {
        let mut item = CustomItem::new(1);
        item.set_field(CustomField::Description, "Courier");
        item.set_field(CustomField::UnitCost, "ten dollars");

        assert!(!item.is_valid());
    }
}
