use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use pronto_core::catalog::{CatalogError, MenuCatalog, StaticMenu};
use pronto_core::domain::menu::{MenuItem, MenuSection};
use pronto_core::domain::record::{CustomerProfile, OrderRecord};
use pronto_core::scheduler::SlotBoard;
use pronto_core::sink::{OrderSink, SinkError};
use pronto_core::{DialogueEngine, Slot};

#[derive(Default)]
struct RecordingSink {
    orders: Mutex<Vec<OrderRecord>>,
    profiles: Mutex<Vec<CustomerProfile>>,
}

#[async_trait]
impl OrderSink for RecordingSink {
    async fn save_order(&self, record: &OrderRecord) -> Result<(), SinkError> {
        self.orders.lock().await.push(record.clone());
        Ok(())
    }

    async fn upsert_customer(&self, profile: &CustomerProfile) -> Result<(), SinkError> {
        self.profiles.lock().await.push(profile.clone());
        Ok(())
    }
}

struct FailingSink;

#[async_trait]
impl OrderSink for FailingSink {
    async fn save_order(&self, _record: &OrderRecord) -> Result<(), SinkError> {
        Err(SinkError::Persistence("database offline".into()))
    }

    async fn upsert_customer(&self, _profile: &CustomerProfile) -> Result<(), SinkError> {
        Err(SinkError::Persistence("database offline".into()))
    }
}

/// Serves the menu but fails every priced lookup, the shape of an outage
/// that hits only at finalization time.
struct LookupOutageCatalog {
    menu: StaticMenu,
}

#[async_trait]
impl MenuCatalog for LookupOutageCatalog {
    async fn lookup(&self, _name: &str) -> Result<Option<MenuItem>, CatalogError> {
        Err(CatalogError::Unavailable("price index offline".into()))
    }

    async fn search(&self, query: &str) -> Result<String, CatalogError> {
        self.menu.search(query).await
    }

    async fn sections(&self) -> Result<Vec<MenuSection>, CatalogError> {
        self.menu.sections().await
    }
}

fn engine_with_sink<S: OrderSink>(sink: Arc<S>) -> DialogueEngine<StaticMenu, S> {
    DialogueEngine::new(
        Arc::new(StaticMenu::pizzeria_da_mario()),
        sink,
        Arc::new(SlotBoard::evening(2)),
    )
}

/// Drives one conversation from greeting to delivery-slot choice.
async fn drive_to_final_summary<C, S>(engine: &DialogueEngine<C, S>, id: &str, slot_text: &str) -> String
where
    C: MenuCatalog,
    S: OrderSink,
{
    engine.handle_message(id, "buonasera").await;
    engine.handle_message(id, "una margherita").await;
    engine.handle_message(id, "no grazie").await;
    engine.handle_message(id, "una coca cola").await;
    engine.handle_message(id, "sì").await;
    engine.handle_message(id, "Mario Rossi").await;
    engine.handle_message(id, "Via Roma 1").await;
    engine.handle_message(id, "3331234567").await;
    engine.handle_message(id, "contanti").await;
    engine.handle_message(id, slot_text).await
}

#[tokio::test]
async fn full_conversation_places_and_persists_an_order() {
    let sink = Arc::new(RecordingSink::default());
    let engine = engine_with_sink(Arc::clone(&sink));

    let summary = drive_to_final_summary(&engine, "user-1", "alle 19:30").await;
    assert!(summary.contains("Riepilogo del suo ordine #000001"));
    assert!(summary.contains("1 Margherita e 1 Coca Cola"));
    assert!(summary.contains("19:30"));
    assert!(summary.contains("Contanti alla consegna"));

    let confirmation = engine.handle_message("user-1", "sì").await;
    assert!(confirmation.contains("Grazie Mario Rossi"));
    assert!(confirmation.contains("#000001"));
    assert!(confirmation.contains("Via Roma 1"));
    assert!(confirmation.contains("19:30"));
    assert!(confirmation.contains("contattare direttamente il numero della pizzeria, a presto!"));

    // The conversation is over, the session is gone.
    assert_eq!(engine.active_sessions().await, 0);

    let orders = sink.orders.lock().await;
    assert_eq!(orders.len(), 1);
    let record = &orders[0];
    assert_eq!(record.sequence_id.to_string(), "000001");
    assert_eq!(record.customer_name, "Mario Rossi");
    assert_eq!(record.customer_phone, "3331234567");
    assert_eq!(record.delivery_slot, Slot::new(19, 30).expect("valid slot"));
    assert_eq!(record.total, Decimal::new(900, 2));
    assert_eq!(record.mains.len(), 1);
    assert_eq!(record.drinks.len(), 1);

    let profiles = sink.profiles.lock().await;
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].phone, "3331234567");
}

#[tokio::test]
async fn rejecting_the_final_summary_restarts_but_keeps_the_order_number() {
    let sink = Arc::new(RecordingSink::default());
    let engine = engine_with_sink(Arc::clone(&sink));

    drive_to_final_summary(&engine, "user-1", "alle 19:30").await;
    let restart = engine.handle_message("user-1", "no, è sbagliato").await;
    assert!(restart.contains("Ricominciamo da capo"));

    engine.handle_message("user-1", "una diavola").await;
    engine.handle_message("user-1", "no grazie").await;
    engine.handle_message("user-1", "no grazie").await;
    engine.handle_message("user-1", "sì").await;
    engine.handle_message("user-1", "Mario Rossi").await;
    engine.handle_message("user-1", "Via Roma 1").await;
    engine.handle_message("user-1", "3331234567").await;
    engine.handle_message("user-1", "carta").await;
    let summary = engine.handle_message("user-1", "alle 20:00").await;

    // Same conversation, same order number across the restart.
    assert!(summary.contains("#000001"));
    assert!(summary.contains("1 Diavola"));
    assert!(summary.contains("Carta alla consegna"));
}

#[tokio::test]
async fn fully_booked_slot_is_refused_and_another_can_be_chosen() {
    let board = Arc::new(SlotBoard::evening(1));
    let taken = Slot::new(19, 30).expect("valid slot");
    assert!(board.book(taken));

    let engine = DialogueEngine::new(
        Arc::new(StaticMenu::pizzeria_da_mario()),
        Arc::new(RecordingSink::default()),
        board,
    );

    let refusal = drive_to_final_summary(&engine, "user-1", "alle 19:30").await;
    assert!(refusal.contains("19:30 non è disponibile"));

    let summary = engine.handle_message("user-1", "allora alle 19:45").await;
    assert!(summary.contains("Riepilogo"));
    assert!(summary.contains("19:45"));
}

#[tokio::test]
async fn sink_outage_still_confirms_the_order() {
    let engine = engine_with_sink(Arc::new(FailingSink));

    drive_to_final_summary(&engine, "user-1", "alle 21:00").await;
    let confirmation = engine.handle_message("user-1", "sì").await;

    assert!(confirmation.contains("è stato confermato"));
    assert_eq!(engine.active_sessions().await, 0);
}

#[tokio::test]
async fn pricing_outage_apologizes_and_keeps_the_session_alive() {
    let catalog = Arc::new(LookupOutageCatalog { menu: StaticMenu::pizzeria_da_mario() });
    let engine = DialogueEngine::new(
        catalog,
        Arc::new(RecordingSink::default()),
        Arc::new(SlotBoard::evening(2)),
    );

    drive_to_final_summary(&engine, "user-1", "alle 22:00").await;
    let reply = engine.handle_message("user-1", "sì").await;

    assert!(reply.contains("problema con il nostro menu"));
    assert_eq!(engine.active_sessions().await, 1);
}

#[tokio::test]
async fn conversations_are_isolated_from_each_other() {
    let sink = Arc::new(RecordingSink::default());
    let engine = engine_with_sink(Arc::clone(&sink));

    engine.handle_message("user-1", "ciao").await;
    engine.handle_message("user-2", "ciao").await;
    engine.handle_message("user-1", "una margherita").await;
    let reply = engine.handle_message("user-2", "una marinara").await;

    assert!(reply.contains("1 Marinara"));
    assert_eq!(engine.active_sessions().await, 2);
}
