use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::catalog::{render_category, CatalogError, MenuCatalog};
use crate::domain::menu::ItemCategory;
use crate::domain::order::{DialogueState, Order};
use crate::domain::record::OrderRecord;
use crate::errors::EngineError;
use crate::extract::{
    classify_payment, extract_slot, is_affirmation, is_item_refusal, is_phone_like, is_rejection,
    Lexicon,
};
use crate::pricing::price_order;
use crate::scheduler::{SequenceCounter, SlotBoard};
use crate::sink::OrderSink;
use crate::ticket::render_ticket;

use super::prompts;

/// Per-conversation dialogue controller. One engine instance serves every
/// conversation of the process; conversations are isolated by id and each
/// is serialized behind its own lock, so two messages for the same
/// conversation are never interleaved while distinct conversations run
/// concurrently.
pub struct DialogueEngine<C, S> {
    catalog: Arc<C>,
    sink: Arc<S>,
    slots: Arc<SlotBoard>,
    sequence: SequenceCounter,
    mains: Lexicon,
    sides: Lexicon,
    drinks: Lexicon,
    sessions: RwLock<HashMap<String, Arc<Mutex<Order>>>>,
}

impl<C, S> DialogueEngine<C, S>
where
    C: MenuCatalog,
    S: OrderSink,
{
    pub fn new(catalog: Arc<C>, sink: Arc<S>, slots: Arc<SlotBoard>) -> Self {
        Self {
            catalog,
            sink,
            slots,
            sequence: SequenceCounter::new(),
            mains: Lexicon::default_mains(),
            sides: Lexicon::default_sides(),
            drinks: Lexicon::default_drinks(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Swaps the built-in alias tables, for menus beyond the house one.
    pub fn with_lexicons(mut self, mains: Lexicon, sides: Lexicon, drinks: Lexicon) -> Self {
        self.mains = mains;
        self.sides = sides;
        self.drinks = drinks;
        self
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Explicit conversation bootstrap: opens the order for
    /// `conversation_id` and returns the greeting with the pizza menu. An
    /// existing conversation is reset in place, keeping its order number
    /// and message log.
    pub async fn start_order(&self, conversation_id: &str) -> String {
        let outcome = self.open_order(conversation_id).await;
        self.respond(conversation_id, outcome)
    }

    /// Entry point for one inbound message. Always answers with
    /// customer-facing text; infrastructure failures degrade to an apology
    /// instead of surfacing to the caller.
    pub async fn handle_message(&self, conversation_id: &str, text: &str) -> String {
        let session = self.sessions.read().await.get(conversation_id).cloned();

        let outcome = match session {
            None => self.first_contact(conversation_id, text).await,
            Some(order) => {
                let mut order = order.lock().await;
                order.log_message(text);
                self.advance(&mut order, text).await
            }
        };

        self.respond(conversation_id, outcome)
    }

    fn respond(&self, conversation_id: &str, outcome: Result<String, EngineError>) -> String {
        match outcome {
            Ok(reply) => reply,
            Err(EngineError::Catalog(err)) => {
                warn!(conversation_id, error = %err, "catalog unavailable, apologizing");
                prompts::catalog_apology()
            }
            Err(EngineError::Domain(err)) => {
                error!(conversation_id, error = %err, "dialogue invariant violated");
                prompts::fatal_apology()
            }
        }
    }

    async fn open_order(&self, conversation_id: &str) -> Result<String, EngineError> {
        let mains_menu = self.category_menu(ItemCategory::Mains).await?;

        let session = self.session_entry(conversation_id).await;
        session.lock().await.reset_for_restart();

        info!(conversation_id, "order started");
        Ok(prompts::greeting(&mains_menu))
    }

    /// First contact through the message path: the menu is fetched before
    /// the session is created, so a catalog outage leaves no half-open
    /// conversation behind.
    async fn first_contact(&self, conversation_id: &str, text: &str) -> Result<String, EngineError> {
        let mains_menu = self.category_menu(ItemCategory::Mains).await?;

        let session = self.session_entry(conversation_id).await;
        session.lock().await.log_message(text);

        info!(conversation_id, "order started");
        Ok(prompts::greeting(&mains_menu))
    }

    async fn session_entry(&self, conversation_id: &str) -> Arc<Mutex<Order>> {
        let mut sessions = self.sessions.write().await;
        Arc::clone(
            sessions
                .entry(conversation_id.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(Order::new(conversation_id)))),
        )
    }

    async fn advance(&self, order: &mut Order, text: &str) -> Result<String, EngineError> {
        debug!(
            conversation_id = %order.conversation_id,
            state = ?order.status,
            "handling message"
        );

        match order.status {
            DialogueState::CollectingMains => self.collect_mains(order, text).await,
            DialogueState::CollectingSides => self.collect_sides(order, text).await,
            DialogueState::CollectingDrinks => self.collect_drinks(order, text).await,
            DialogueState::ConfirmingOrder => self.confirm_order(order, text).await,
            DialogueState::CollectingName => Ok(Self::collect_name(order, text)),
            DialogueState::CollectingAddress => Ok(Self::collect_address(order, text)),
            DialogueState::CollectingPhone => Ok(Self::collect_phone(order, text)),
            DialogueState::CollectingPayment => Ok(self.collect_payment(order, text)),
            DialogueState::CollectingSlot => Ok(self.collect_slot(order, text)),
            DialogueState::ConfirmingFinal => self.confirm_final(order, text).await,
        }
    }

    async fn collect_mains(&self, order: &mut Order, text: &str) -> Result<String, EngineError> {
        let matched = self.mains.match_items(text);
        if matched.is_empty() {
            return Ok(prompts::mains_reprompt());
        }

        // Fetch the next menu before touching the order: a catalog failure
        // here must leave the state untouched so the message can simply be
        // retried.
        let sides_menu = self.category_menu(ItemCategory::Sides).await?;
        for (name, quantity) in &matched {
            order.add_items(ItemCategory::Mains, name, *quantity);
        }
        order.status = DialogueState::CollectingSides;
        Ok(prompts::added_and_ask_sides(&matched, &sides_menu))
    }

    async fn collect_sides(&self, order: &mut Order, text: &str) -> Result<String, EngineError> {
        if is_item_refusal(text) {
            let drinks_menu = self.category_menu(ItemCategory::Drinks).await?;
            order.status = DialogueState::CollectingDrinks;
            return Ok(prompts::ask_drinks(None, &drinks_menu));
        }

        let matched = self.sides.match_items(text);
        if matched.is_empty() {
            return Ok(prompts::sides_reprompt());
        }

        let drinks_menu = self.category_menu(ItemCategory::Drinks).await?;
        for (name, quantity) in &matched {
            order.add_items(ItemCategory::Sides, name, *quantity);
        }
        order.status = DialogueState::CollectingDrinks;
        Ok(prompts::ask_drinks(Some(&matched), &drinks_menu))
    }

    async fn collect_drinks(&self, order: &mut Order, text: &str) -> Result<String, EngineError> {
        if is_item_refusal(text) {
            order.status = DialogueState::ConfirmingOrder;
            return Ok(prompts::confirm_order(None, order));
        }

        let matched = self.drinks.match_items(text);
        if matched.is_empty() {
            return Ok(prompts::drinks_reprompt());
        }

        for (name, quantity) in &matched {
            order.add_items(ItemCategory::Drinks, name, *quantity);
        }
        order.status = DialogueState::ConfirmingOrder;
        Ok(prompts::confirm_order(Some(&matched), order))
    }

    async fn confirm_order(&self, order: &mut Order, text: &str) -> Result<String, EngineError> {
        if is_affirmation(text) {
            order.status = DialogueState::CollectingName;
            return Ok(prompts::ask_name());
        }
        if is_rejection(text) {
            return self.restart(order, prompts::restart_order).await;
        }
        Ok(prompts::confirm_order_reprompt())
    }

    fn collect_name(order: &mut Order, text: &str) -> String {
        order.customer.name = Some(text.trim().to_owned());
        order.status = DialogueState::CollectingAddress;
        prompts::ask_address()
    }

    fn collect_address(order: &mut Order, text: &str) -> String {
        order.customer.address = Some(text.trim().to_owned());
        order.status = DialogueState::CollectingPhone;
        prompts::ask_phone()
    }

    fn collect_phone(order: &mut Order, text: &str) -> String {
        if !is_phone_like(text) {
            return prompts::invalid_phone();
        }
        order.customer.phone = Some(text.trim().to_owned());
        order.status = DialogueState::CollectingPayment;
        prompts::ask_payment()
    }

    fn collect_payment(&self, order: &mut Order, text: &str) -> String {
        match classify_payment(text) {
            Some(method) => {
                order.payment = Some(method);
                order.status = DialogueState::CollectingSlot;
                prompts::ask_slot(&self.slots.available_slots())
            }
            None => prompts::invalid_payment(),
        }
    }

    /// The capacity check and the booking are one atomic step on the slot
    /// board; a booked slot is never released, even if the order is later
    /// restarted before final confirmation.
    fn collect_slot(&self, order: &mut Order, text: &str) -> String {
        let Some(slot) = extract_slot(text) else {
            return prompts::slot_reprompt(&self.slots.available_slots());
        };

        if !self.slots.book(slot) {
            return prompts::slot_unavailable(slot, &self.slots.available_slots());
        }

        order.delivery_slot = Some(slot);
        if order.sequence_id.is_none() {
            order.sequence_id = Some(self.sequence.next());
        }
        order.status = DialogueState::ConfirmingFinal;
        prompts::final_summary(order)
    }

    async fn confirm_final(&self, order: &mut Order, text: &str) -> Result<String, EngineError> {
        if is_affirmation(text) {
            return self.finalize(order).await;
        }
        if is_rejection(text) {
            return self.restart(order, prompts::restart_from_scratch).await;
        }
        Ok(prompts::final_reprompt())
    }

    async fn restart(
        &self,
        order: &mut Order,
        prompt: fn(&str) -> String,
    ) -> Result<String, EngineError> {
        let mains_menu = self.category_menu(ItemCategory::Mains).await?;
        order.reset_for_restart();
        info!(conversation_id = %order.conversation_id, "order restarted");
        Ok(prompt(&mains_menu))
    }

    /// Prices the order against the live catalog, snapshots it and hands
    /// the snapshot to the sink. Sink failures are logged and swallowed:
    /// the customer has been promised a delivery slot, so the order is
    /// confirmed even if persistence is down.
    async fn finalize(&self, order: &mut Order) -> Result<String, EngineError> {
        price_order(order, self.catalog.as_ref()).await?;
        let record = OrderRecord::from_order(order)?;

        if let Err(err) = self.sink.save_order(&record).await {
            error!(
                sequence_id = %record.sequence_id,
                error = %err,
                "failed to persist order, confirming anyway"
            );
        }
        if let Err(err) = self.sink.upsert_customer(&record.customer_profile()).await {
            error!(
                phone = %record.customer_phone,
                error = %err,
                "failed to upsert customer profile"
            );
        }

        info!(
            sequence_id = %record.sequence_id,
            total = %record.total,
            slot = %record.delivery_slot,
            "order finalized"
        );
        info!("\n{}", render_ticket(&record));

        self.sessions.write().await.remove(&order.conversation_id);

        Ok(prompts::finalized(
            &record.customer_name,
            &record.sequence_id.to_string(),
            &record.customer_address,
            &record.delivery_slot.to_string(),
            &record.customer_phone,
        ))
    }

    async fn category_menu(&self, category: ItemCategory) -> Result<String, CatalogError> {
        let sections = self.catalog.sections().await?;
        Ok(render_category(&sections, category))
    }
}
