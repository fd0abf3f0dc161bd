use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::warn;

use crate::catalog::{CatalogError, MenuCatalog};
use crate::domain::menu::ItemCategory;
use crate::domain::order::Order;

/// Prices every item entry against the current catalog snapshot, fills
/// the per-unit prices and returns the total. Items no longer present in
/// the catalog contribute zero; this mirrors the source system's behavior
/// and is logged so the kitchen can follow up, instead of failing the
/// order at the last step.
pub async fn price_order<C>(order: &mut Order, catalog: &C) -> Result<Decimal, CatalogError>
where
    C: MenuCatalog + ?Sized,
{
    let mut resolved: HashMap<String, Decimal> = HashMap::new();
    let mut total = Decimal::ZERO;

    for category in ItemCategory::ALL {
        for index in 0..order.items.list(category).len() {
            let name = order.items.list(category)[index].name.clone();
            let unit_price = match resolved.get(&name) {
                Some(price) => *price,
                None => {
                    let price = match catalog.lookup(&name).await? {
                        Some(item) => item.price,
                        None => {
                            warn!(
                                item = %name,
                                conversation_id = %order.conversation_id,
                                "item missing from catalog at finalization, priced at zero"
                            );
                            Decimal::ZERO
                        }
                    };
                    resolved.insert(name.clone(), price);
                    price
                }
            };
            order.items.list_mut(category)[index].unit_price = Some(unit_price);
            total += unit_price;
        }
    }

    order.total = Some(total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::price_order;
    use crate::catalog::{CatalogError, MenuCatalog, StaticMenu};
    use crate::domain::menu::{ItemCategory, MenuItem, MenuSection};
    use crate::domain::order::Order;

    #[tokio::test]
    async fn totals_unit_prices_across_categories() {
        let catalog = StaticMenu::pizzeria_da_mario();
        let mut order = Order::new("user-1");
        order.add_items(ItemCategory::Mains, "Margherita", 2);
        order.add_items(ItemCategory::Drinks, "Coca Cola", 1);

        let total = price_order(&mut order, &catalog).await.expect("priced");

        assert_eq!(total, Decimal::new(1500, 2));
        assert_eq!(order.total, Some(total));
        assert!(order
            .items
            .mains
            .iter()
            .all(|line| line.unit_price == Some(Decimal::new(600, 2))));
    }

    #[tokio::test]
    async fn missing_items_contribute_zero() {
        let catalog = StaticMenu::pizzeria_da_mario();
        let mut order = Order::new("user-1");
        order.add_items(ItemCategory::Mains, "Margherita", 1);
        order.add_items(ItemCategory::Mains, "Pizza Fantasma", 1);

        let total = price_order(&mut order, &catalog).await.expect("priced");

        assert_eq!(total, Decimal::new(600, 2));
        assert_eq!(order.items.mains[1].unit_price, Some(Decimal::ZERO));
    }

    struct BrokenCatalog;

    #[async_trait]
    impl MenuCatalog for BrokenCatalog {
        async fn lookup(&self, _name: &str) -> Result<Option<MenuItem>, CatalogError> {
            Err(CatalogError::Unavailable("index offline".to_owned()))
        }

        async fn search(&self, _query: &str) -> Result<String, CatalogError> {
            Err(CatalogError::Unavailable("index offline".to_owned()))
        }

        async fn sections(&self) -> Result<Vec<MenuSection>, CatalogError> {
            Err(CatalogError::Unavailable("index offline".to_owned()))
        }
    }

    #[tokio::test]
    async fn catalog_transport_failure_is_an_error() {
        let mut order = Order::new("user-1");
        order.add_items(ItemCategory::Mains, "Margherita", 1);

        let result = price_order(&mut order, &BrokenCatalog).await;

        assert!(result.is_err());
        assert_eq!(order.total, None);
    }
}
