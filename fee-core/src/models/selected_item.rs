use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A line item currently counted towards the estimate.
///
/// The unit cost is captured when the item is selected; later quantity
/// changes only rescale `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub id: String,
    pub description: String,
    pub unit_cost: Decimal,
    pub quantity: u32,
    pub total: Decimal,
}

impl SelectedItem {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        unit_cost: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            unit_cost,
            quantity,
            total: unit_cost * Decimal::from(quantity),
        }
    }

    pub fn set_quantity(
        &mut self,
        quantity: u32,
    ) {
        self.quantity = quantity;
        self.total = self.unit_cost * Decimal::from(quantity);
    }
}
