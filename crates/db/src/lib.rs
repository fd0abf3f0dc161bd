pub mod connection;
pub mod migrations;
pub mod sink;

pub use connection::{connect, connect_with_settings, DbPool};
pub use sink::{MemoryOrderSink, SqlOrderSink};
