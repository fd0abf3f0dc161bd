use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::menu::ItemCategory;
use crate::domain::slot::Slot;

/// Monotonic process-wide order number, rendered as `000001`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceId(pub u64);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    CardOnDelivery,
}

impl PaymentMethod {
    /// Customer-facing Italian label, also used on tickets and records.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Contanti alla consegna",
            Self::CardOnDelivery => "Carta alla consegna",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cash_on_delivery",
            Self::CardOnDelivery => "card_on_delivery",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cash_on_delivery" => Some(Self::CashOnDelivery),
            "card_on_delivery" => Some(Self::CardOnDelivery),
            _ => None,
        }
    }
}

/// The dialogue controller's finite states, strictly linear with a single
/// loop-back edge from the two confirmation states to `CollectingMains`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    CollectingMains,
    CollectingSides,
    CollectingDrinks,
    ConfirmingOrder,
    CollectingName,
    CollectingAddress,
    CollectingPhone,
    CollectingPayment,
    CollectingSlot,
    ConfirmingFinal,
}

/// One ordered unit. Quantity is represented by repetition: list length
/// equals ordered quantity. The unit price stays empty until finalization
/// prices the order against the live catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemLine {
    pub name: String,
    pub unit_price: Option<Decimal>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemLists {
    pub mains: Vec<ItemLine>,
    pub sides: Vec<ItemLine>,
    pub drinks: Vec<ItemLine>,
}

impl ItemLists {
    pub fn list(&self, category: ItemCategory) -> &[ItemLine] {
        match category {
            ItemCategory::Mains => &self.mains,
            ItemCategory::Sides => &self.sides,
            ItemCategory::Drinks => &self.drinks,
        }
    }

    pub fn list_mut(&mut self, category: ItemCategory) -> &mut Vec<ItemLine> {
        match category {
            ItemCategory::Mains => &mut self.mains,
            ItemCategory::Sides => &mut self.sides,
            ItemCategory::Drinks => &mut self.drinks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mains.is_empty() && self.sides.is_empty() && self.drinks.is_empty()
    }

    pub fn clear(&mut self) {
        self.mains.clear();
        self.sides.clear();
        self.drinks.clear();
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Audit-only entry for every inbound message of the conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub at: DateTime<Utc>,
    pub text: String,
}

/// The per-conversation mutable aggregate. Mutated exclusively by the
/// dialogue controller and discarded from active memory at finalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub conversation_id: String,
    pub items: ItemLists,
    pub customer: Customer,
    pub payment: Option<PaymentMethod>,
    pub delivery_slot: Option<Slot>,
    pub status: DialogueState,
    pub sequence_id: Option<SequenceId>,
    pub message_log: Vec<MessageEntry>,
    pub total: Option<Decimal>,
    pub started_at: DateTime<Utc>,
}

impl Order {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            items: ItemLists::default(),
            customer: Customer::default(),
            payment: None,
            delivery_slot: None,
            status: DialogueState::CollectingMains,
            sequence_id: None,
            message_log: Vec::new(),
            total: None,
            started_at: Utc::now(),
        }
    }

    pub fn log_message(&mut self, text: impl Into<String>) {
        self.message_log.push(MessageEntry { at: Utc::now(), text: text.into() });
    }

    /// Appends `quantity` single-unit entries for `name`.
    pub fn add_items(&mut self, category: ItemCategory, name: &str, quantity: u32) {
        let list = self.items.list_mut(category);
        for _ in 0..quantity {
            list.push(ItemLine { name: name.to_owned(), unit_price: None });
        }
    }

    /// Loop-back reset: items, customer details, payment and slot are
    /// cleared; an already assigned sequence id and the message log are
    /// retained for the rest of the conversation.
    pub fn reset_for_restart(&mut self) {
        self.items.clear();
        self.customer = Customer::default();
        self.payment = None;
        self.delivery_slot = None;
        self.total = None;
        self.status = DialogueState::CollectingMains;
    }

    /// Canonical-name counts for one category, in first-seen order.
    pub fn grouped(&self, category: ItemCategory) -> Vec<(String, u32)> {
        group_by_name(self.items.list(category))
    }
}

pub(crate) fn group_by_name(lines: &[ItemLine]) -> Vec<(String, u32)> {
    let mut grouped: Vec<(String, u32)> = Vec::new();
    for line in lines {
        match grouped.iter_mut().find(|(name, _)| name == &line.name) {
            Some((_, count)) => *count += 1,
            None => grouped.push((line.name.clone(), 1)),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::{DialogueState, Order, SequenceId};
    use crate::domain::menu::ItemCategory;
    use crate::domain::order::PaymentMethod;
    use crate::domain::slot::Slot;

    #[test]
    fn quantity_is_represented_by_repetition() {
        let mut order = Order::new("user-1");
        order.add_items(ItemCategory::Mains, "Margherita", 2);
        order.add_items(ItemCategory::Mains, "Diavola", 1);

        assert_eq!(order.items.mains.len(), 3);
        assert_eq!(
            order.grouped(ItemCategory::Mains),
            vec![("Margherita".to_owned(), 2), ("Diavola".to_owned(), 1)]
        );
    }

    #[test]
    fn restart_reset_keeps_sequence_id_and_log() {
        let mut order = Order::new("user-1");
        order.log_message("margherita");
        order.add_items(ItemCategory::Mains, "Margherita", 1);
        order.customer.name = Some("Mario Rossi".to_owned());
        order.payment = Some(PaymentMethod::CashOnDelivery);
        order.delivery_slot = Some(Slot::new(19, 0).expect("valid slot"));
        order.sequence_id = Some(SequenceId(7));
        order.status = DialogueState::ConfirmingFinal;

        order.reset_for_restart();

        assert!(order.items.is_empty());
        assert_eq!(order.customer.name, None);
        assert_eq!(order.payment, None);
        assert_eq!(order.delivery_slot, None);
        assert_eq!(order.status, DialogueState::CollectingMains);
        assert_eq!(order.sequence_id, Some(SequenceId(7)));
        assert_eq!(order.message_log.len(), 1);
    }

    #[test]
    fn sequence_id_renders_six_digits() {
        assert_eq!(SequenceId(1).to_string(), "000001");
        assert_eq!(SequenceId(123_456).to_string(), "123456");
    }
}
