use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three item categories the dialogue walks through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Mains,
    Sides,
    Drinks,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 3] =
        [ItemCategory::Mains, ItemCategory::Sides, ItemCategory::Drinks];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    pub title: String,
    pub category: ItemCategory,
    pub items: Vec<MenuItem>,
}
