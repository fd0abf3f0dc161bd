pub mod menu;
pub mod order;
pub mod record;
pub mod slot;
