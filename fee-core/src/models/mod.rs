mod catalogue_item;
mod custom_item;
mod property_type;
mod selected_item;

pub use catalogue_item::{CatalogueItem, ItemCategory};
pub use custom_item::{CUSTOM_ID_PREFIX, CustomField, CustomItem};
pub use property_type::PropertyType;
pub use selected_item::SelectedItem;
