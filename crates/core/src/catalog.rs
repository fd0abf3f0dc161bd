use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::menu::{ItemCategory, MenuItem, MenuSection};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read-only menu capability consumed by the dialogue engine. Lookups may
/// be slow or fallible (a remote index in production); the engine treats
/// every call as an external one.
#[async_trait]
pub trait MenuCatalog: Send + Sync {
    /// Exact item lookup by canonical name, case-insensitive.
    async fn lookup(&self, name: &str) -> Result<Option<MenuItem>, CatalogError>;

    /// Free-text menu question, answered as customer-facing text.
    async fn search(&self, query: &str) -> Result<String, CatalogError>;

    /// All menu sections, in presentation order.
    async fn sections(&self) -> Result<Vec<MenuSection>, CatalogError>;
}

/// Built-in menu used when no external catalog is wired in. Contents match
/// the house menu of the pizzeria this system was built for.
#[derive(Clone, Debug)]
pub struct StaticMenu {
    sections: Vec<MenuSection>,
}

impl StaticMenu {
    pub fn new(sections: Vec<MenuSection>) -> Self {
        Self { sections }
    }

    pub fn pizzeria_da_mario() -> Self {
        let euros = |cents: i64| Decimal::new(cents, 2);
        let item = |name: &str, price: Decimal, description: &str| MenuItem {
            name: name.to_owned(),
            price,
            description: description.to_owned(),
        };

        Self::new(vec![
            MenuSection {
                title: "Pizze Classiche".to_owned(),
                category: ItemCategory::Mains,
                items: vec![
                    item("Margherita", euros(600), "Pomodoro, mozzarella, basilico"),
                    item("Diavola", euros(750), "Pomodoro, mozzarella, salame piccante"),
                    item(
                        "Quattro Stagioni",
                        euros(800),
                        "Pomodoro, mozzarella, prosciutto, funghi, carciofi, olive",
                    ),
                    item(
                        "Napoletana",
                        euros(700),
                        "Pomodoro, mozzarella, acciughe, origano, capperi",
                    ),
                    item("Marinara", euros(500), "Pomodoro, aglio, origano"),
                    item(
                        "Capricciosa",
                        euros(850),
                        "Pomodoro, mozzarella, prosciutto, funghi, carciofi, olive",
                    ),
                ],
            },
            MenuSection {
                title: "Fritti".to_owned(),
                category: ItemCategory::Sides,
                items: vec![
                    item("Patatine", euros(350), "Patatine fritte"),
                    item("Crocchette", euros(400), "Crocchette di patate"),
                    item("Supplì", euros(200), "Supplì di riso"),
                    item("Arancini", euros(250), "Arancini siciliani"),
                ],
            },
            MenuSection {
                title: "Bevande".to_owned(),
                category: ItemCategory::Drinks,
                items: vec![
                    item("Acqua", euros(200), "Acqua naturale/frizzante 0.5L"),
                    item("Coca Cola", euros(300), "Coca Cola 0.33L"),
                    item("Birra", euros(400), "Birra alla spina 0.4L"),
                    item("Fanta", euros(300), "Fanta 0.33L"),
                    item("Sprite", euros(300), "Sprite 0.33L"),
                ],
            },
        ])
    }
}

#[async_trait]
impl MenuCatalog for StaticMenu {
    async fn lookup(&self, name: &str) -> Result<Option<MenuItem>, CatalogError> {
        let wanted = name.to_lowercase();
        Ok(self
            .sections
            .iter()
            .flat_map(|section| section.items.iter())
            .find(|item| item.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn search(&self, query: &str) -> Result<String, CatalogError> {
        let normalized = query.to_lowercase();
        let named = self
            .sections
            .iter()
            .flat_map(|section| section.items.iter())
            .find(|item| normalized.contains(&item.name.to_lowercase()));

        Ok(match named {
            Some(item) if item.description.is_empty() => {
                format!("{} costa €{:.2}.", item.name, item.price)
            }
            Some(item) => {
                format!("{} costa €{:.2} ({}).", item.name, item.price, item.description)
            }
            None => "Non ho trovato questa informazione nel menu.".to_owned(),
        })
    }

    async fn sections(&self) -> Result<Vec<MenuSection>, CatalogError> {
        Ok(self.sections.clone())
    }
}

/// Renders one category's sections as a customer-facing menu block.
pub fn render_category(sections: &[MenuSection], category: ItemCategory) -> String {
    let header = match category {
        ItemCategory::Mains => "🍕 MENU PIZZE 🍕",
        ItemCategory::Sides => "🍟 MENU FRITTI 🍟",
        ItemCategory::Drinks => "🥤 MENU BEVANDE 🥤",
    };

    let mut text = header.to_owned();
    for section in sections.iter().filter(|section| section.category == category) {
        text.push_str(&format!("\n\n{}:", section.title));
        for item in &section.items {
            text.push_str(&format!("\n- {}: €{:.2}", item.name, item.price));
        }
    }
    text
}

/// Renders the whole menu, section by section.
pub fn render_full_menu(sections: &[MenuSection]) -> String {
    let mut blocks = Vec::new();
    for section in sections {
        let mut block = format!("## {}", section.title);
        for item in &section.items {
            block.push_str(&format!("\n**{}** - €{:.2}", item.name, item.price));
            if !item.description.is_empty() {
                block.push_str(&format!("\n{}", item.description));
            }
        }
        blocks.push(block);
    }
    blocks.join("\n\n---\n\n")
}
