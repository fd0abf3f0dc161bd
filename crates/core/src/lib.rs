pub mod catalog;
pub mod config;
pub mod dialogue;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod pricing;
pub mod scheduler;
pub mod sink;
pub mod ticket;

pub use catalog::{CatalogError, MenuCatalog, StaticMenu};
pub use dialogue::DialogueEngine;
pub use domain::menu::{ItemCategory, MenuItem, MenuSection};
pub use domain::order::{
    Customer, DialogueState, ItemLine, Order, PaymentMethod, SequenceId,
};
pub use domain::record::{CustomerProfile, OrderRecord, RecordLine};
pub use domain::slot::Slot;
pub use errors::{DomainError, EngineError};
pub use scheduler::{SequenceCounter, SlotBoard};
pub use sink::{OrderSink, SinkError};
