use std::collections::HashMap;
use std::fmt::Display;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;
use tokio::sync::RwLock;

use pronto_core::domain::order::{PaymentMethod, SequenceId};
use pronto_core::domain::record::{CustomerProfile, OrderRecord, RecordLine};
use pronto_core::domain::slot::Slot;
use pronto_core::sink::{OrderSink, SinkError};

use crate::DbPool;

fn persistence(err: impl Display) -> SinkError {
    SinkError::Persistence(err.to_string())
}

/// SQLite-backed order sink. Orders are append-only rows keyed by their
/// sequence number; customers are upserted by phone so the latest name
/// and address win.
pub struct SqlOrderSink {
    pool: DbPool,
}

impl SqlOrderSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Order history for one customer, oldest first. Used by the kitchen
    /// tooling, not by the dialogue itself.
    pub async fn list_orders_for_phone(
        &self,
        phone: &str,
    ) -> Result<Vec<OrderRecord>, SinkError> {
        let rows = sqlx::query(
            "SELECT sequence_id, conversation_id, placed_at, delivery_slot,
                    customer_name, customer_phone, customer_address, payment_method,
                    mains, sides, drinks, total
             FROM orders
             WHERE customer_phone = ?
             ORDER BY sequence_id",
        )
        .bind(phone)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence)?;

        rows.into_iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: sqlx::sqlite::SqliteRow) -> Result<OrderRecord, SinkError> {
    let lines = |column: &str| -> Result<Vec<RecordLine>, SinkError> {
        serde_json::from_str(&row.get::<String, _>(column)).map_err(persistence)
    };

    let payment_raw = row.get::<String, _>("payment_method");
    let payment = PaymentMethod::parse(&payment_raw)
        .ok_or_else(|| persistence(format!("unknown payment method `{payment_raw}`")))?;

    Ok(OrderRecord {
        sequence_id: SequenceId(row.get::<i64, _>("sequence_id") as u64),
        conversation_id: row.get("conversation_id"),
        placed_at: row
            .get::<String, _>("placed_at")
            .parse::<DateTime<Utc>>()
            .map_err(persistence)?,
        delivery_slot: row.get::<String, _>("delivery_slot").parse::<Slot>().map_err(persistence)?,
        customer_name: row.get("customer_name"),
        customer_phone: row.get("customer_phone"),
        customer_address: row.get("customer_address"),
        payment,
        mains: lines("mains")?,
        sides: lines("sides")?,
        drinks: lines("drinks")?,
        total: row.get::<String, _>("total").parse::<Decimal>().map_err(persistence)?,
    })
}

#[async_trait]
impl OrderSink for SqlOrderSink {
    async fn save_order(&self, record: &OrderRecord) -> Result<(), SinkError> {
        let lines = |lines: &[RecordLine]| -> Result<String, SinkError> {
            serde_json::to_string(lines).map_err(persistence)
        };

        sqlx::query(
            "INSERT INTO orders (
                sequence_id, conversation_id, placed_at, delivery_slot,
                customer_name, customer_phone, customer_address, payment_method,
                mains, sides, drinks, total
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.sequence_id.0 as i64)
        .bind(&record.conversation_id)
        .bind(record.placed_at.to_rfc3339())
        .bind(record.delivery_slot.to_string())
        .bind(&record.customer_name)
        .bind(&record.customer_phone)
        .bind(&record.customer_address)
        .bind(record.payment.as_str())
        .bind(lines(&record.mains)?)
        .bind(lines(&record.sides)?)
        .bind(lines(&record.drinks)?)
        .bind(record.total.to_string())
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(())
    }

    async fn upsert_customer(&self, profile: &CustomerProfile) -> Result<(), SinkError> {
        sqlx::query(
            "INSERT INTO customers (phone, name, address, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (phone) DO UPDATE SET
                 name = excluded.name,
                 address = excluded.address,
                 updated_at = excluded.updated_at",
        )
        .bind(&profile.phone)
        .bind(&profile.name)
        .bind(&profile.address)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(())
    }
}

/// In-memory sink for tests and for running without a database.
#[derive(Default)]
pub struct MemoryOrderSink {
    orders: RwLock<Vec<OrderRecord>>,
    customers: RwLock<HashMap<String, CustomerProfile>>,
}

impl MemoryOrderSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn orders(&self) -> Vec<OrderRecord> {
        self.orders.read().await.clone()
    }

    pub async fn customer(&self, phone: &str) -> Option<CustomerProfile> {
        self.customers.read().await.get(phone).cloned()
    }
}

#[async_trait]
impl OrderSink for MemoryOrderSink {
    async fn save_order(&self, record: &OrderRecord) -> Result<(), SinkError> {
        self.orders.write().await.push(record.clone());
        Ok(())
    }

    async fn upsert_customer(&self, profile: &CustomerProfile) -> Result<(), SinkError> {
        self.customers.write().await.insert(profile.phone.clone(), profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryOrderSink;
    use pronto_core::domain::record::CustomerProfile;
    use pronto_core::sink::OrderSink;

    #[tokio::test]
    async fn memory_sink_upserts_by_phone() {
        let sink = MemoryOrderSink::new();
        let first = CustomerProfile {
            phone: "3331234567".to_owned(),
            name: "Mario Rossi".to_owned(),
            address: "Via Roma 1".to_owned(),
        };
        let moved = CustomerProfile { address: "Via Milano 2".to_owned(), ..first.clone() };

        sink.upsert_customer(&first).await.expect("first upsert");
        sink.upsert_customer(&moved).await.expect("second upsert");

        let stored = sink.customer("3331234567").await.expect("stored profile");
        assert_eq!(stored.address, "Via Milano 2");
    }
}
