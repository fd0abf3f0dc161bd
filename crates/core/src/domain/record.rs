use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::menu::ItemCategory;
use crate::domain::order::{ItemLine, Order, PaymentMethod, SequenceId};
use crate::domain::slot::Slot;
use crate::errors::DomainError;

/// One grouped line of a finalized order: `quantity` units of `name` at
/// `unit_price` each.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordLine {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl RecordLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Append-only profile update sent alongside every finalized order;
/// customers are keyed by phone number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub phone: String,
    pub name: String,
    pub address: String,
}

/// Immutable snapshot of a finalized order, handed to the persistence
/// sink and rendered onto the kitchen ticket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub sequence_id: SequenceId,
    pub conversation_id: String,
    pub placed_at: DateTime<Utc>,
    pub delivery_slot: Slot,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub payment: PaymentMethod,
    pub mains: Vec<RecordLine>,
    pub sides: Vec<RecordLine>,
    pub drinks: Vec<RecordLine>,
    pub total: Decimal,
}

impl OrderRecord {
    /// Snapshots a fully collected, priced order. Every field the dialogue
    /// collects must be present; a gap here is a controller bug, not user
    /// input to re-prompt for.
    pub fn from_order(order: &Order) -> Result<Self, DomainError> {
        let missing = |field: &str| {
            DomainError::InvariantViolation(format!("finalized order missing {field}"))
        };

        Ok(Self {
            sequence_id: order.sequence_id.ok_or_else(|| missing("sequence id"))?,
            conversation_id: order.conversation_id.clone(),
            placed_at: Utc::now(),
            delivery_slot: order.delivery_slot.ok_or_else(|| missing("delivery slot"))?,
            customer_name: order.customer.name.clone().ok_or_else(|| missing("name"))?,
            customer_phone: order.customer.phone.clone().ok_or_else(|| missing("phone"))?,
            customer_address: order
                .customer
                .address
                .clone()
                .ok_or_else(|| missing("address"))?,
            payment: order.payment.ok_or_else(|| missing("payment method"))?,
            mains: grouped_record_lines(&order.items.mains)?,
            sides: grouped_record_lines(&order.items.sides)?,
            drinks: grouped_record_lines(&order.items.drinks)?,
            total: order.total.ok_or_else(|| missing("total"))?,
        })
    }

    pub fn lines(&self, category: ItemCategory) -> &[RecordLine] {
        match category {
            ItemCategory::Mains => &self.mains,
            ItemCategory::Sides => &self.sides,
            ItemCategory::Drinks => &self.drinks,
        }
    }

    pub fn customer_profile(&self) -> CustomerProfile {
        CustomerProfile {
            phone: self.customer_phone.clone(),
            name: self.customer_name.clone(),
            address: self.customer_address.clone(),
        }
    }
}

/// Groups priced unit entries by name, sorted by name for a stable record
/// shape.
fn grouped_record_lines(lines: &[ItemLine]) -> Result<Vec<RecordLine>, DomainError> {
    let mut grouped: Vec<RecordLine> = Vec::new();
    for line in lines {
        let unit_price = line.unit_price.ok_or_else(|| {
            DomainError::InvariantViolation(format!("unpriced item `{}` at finalization", line.name))
        })?;
        match grouped.iter_mut().find(|grouped_line| grouped_line.name == line.name) {
            Some(grouped_line) => grouped_line.quantity += 1,
            None => grouped.push(RecordLine { name: line.name.clone(), unit_price, quantity: 1 }),
        }
    }
    grouped.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(grouped)
}
