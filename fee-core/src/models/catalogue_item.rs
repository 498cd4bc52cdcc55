use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PropertyType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    #[default]
    Standard,
    /// Listed for completeness but never charged.
    Free,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Free => "free",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "free" => Some(Self::Free),
            _ => None,
        }
    }
}

/// A disbursement line item as it appears in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueItem {
    pub id: String,
    pub description: String,
    /// Stored price. See [`CatalogueItem::effective_unit_cost`] for what is
    /// actually charged.
    pub unit_cost: Decimal,
    pub category: ItemCategory,
    /// Property types this item is auto-selected for. Empty means never.
    pub property_types: Vec<PropertyType>,
    /// Whether `unit_cost` already contains the 10% GST component.
    pub gst_included: bool,
}

impl CatalogueItem {
    pub fn applies_to(
        &self,
        property_type: PropertyType,
    ) -> bool {
        self.property_types.contains(&property_type)
    }

    pub fn is_free(&self) -> bool {
        self.category == ItemCategory::Free
    }

    /// The unit cost used when the item is selected: zero for free items,
    /// the stored cost otherwise.
    pub fn effective_unit_cost(&self) -> Decimal {
        if self.is_free() {
            Decimal::ZERO
        } else {
            self.unit_cost
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn item(category: ItemCategory) -> CatalogueItem {
        CatalogueItem {
            id: "pool".to_string(),
            description: "Pool search".to_string(),
            unit_cost: dec!(12.50),
            category,
            property_types: vec![PropertyType::House],
            gst_included: true,
        }
    }

    #[test]
    fn free_category_forces_zero_cost() {
        assert_eq!(item(ItemCategory::Free).effective_unit_cost(), Decimal::ZERO);
    }

    #[test]
    fn standard_category_uses_stored_cost() {
        assert_eq!(item(ItemCategory::Standard).effective_unit_cost(), dec!(12.50));
    }

    #[test]
    fn applies_to_checks_membership() {
        let item = item(ItemCategory::Standard);

        assert!(item.applies_to(PropertyType::House));
        assert!(!item.applies_to(PropertyType::Land));
    }

    #[test]
    fn category_parse_round_trips() {
        assert_eq!(ItemCategory::parse("Free"), Some(ItemCategory::Free));
        assert_eq!(ItemCategory::parse(ItemCategory::Standard.as_str()), Some(ItemCategory::Standard));
        assert_eq!(ItemCategory::parse("premium"), None);
    }
}
