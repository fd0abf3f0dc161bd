use crate::domain::menu::ItemCategory;
use crate::domain::record::{OrderRecord, RecordLine};

const RULE_HEAVY: &str = "==================================================";
const RULE_LIGHT: &str = "--------------------------------------------------";

/// Renders a finalized order as the printable kitchen ticket.
pub fn render_ticket(record: &OrderRecord) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(RULE_HEAVY.to_owned());
    lines.push(format!("ORDINE #{}", record.sequence_id));
    lines.push(RULE_HEAVY.to_owned());
    lines.push(format!("Data: {}", record.placed_at.format("%Y-%m-%d")));
    lines.push(format!("Ora: {}", record.placed_at.format("%H:%M:%S")));
    lines.push(format!("Orario consegna: {}", record.delivery_slot));
    lines.push(RULE_LIGHT.to_owned());

    lines.push("INFORMAZIONI CLIENTE:".to_owned());
    lines.push(format!("Nome: {}", record.customer_name));
    lines.push(format!("Telefono: {}", record.customer_phone));
    lines.push(format!("Indirizzo: {}", record.customer_address));
    lines.push(format!("Metodo pagamento: {}", record.payment.label()));
    lines.push(RULE_LIGHT.to_owned());

    lines.push("PRODOTTI ORDINATI:".to_owned());
    for (category, header) in [
        (ItemCategory::Mains, "PIZZE"),
        (ItemCategory::Sides, "FRITTI"),
        (ItemCategory::Drinks, "BEVANDE"),
    ] {
        let category_lines = record.lines(category);
        if category_lines.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{header}:"));
        for line in category_lines {
            lines.push(render_line(line));
        }
    }

    lines.push(RULE_LIGHT.to_owned());
    lines.push(format!("TOTALE: {:.2}€", record.total));
    lines.push(RULE_HEAVY.to_owned());

    lines.join("\n")
}

fn render_line(line: &RecordLine) -> String {
    format!(
        "  {}x {:<20} {:.2}€/cad = {:.2}€",
        line.quantity,
        line.name,
        line.unit_price,
        line.line_total()
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::render_ticket;
    use crate::domain::order::{PaymentMethod, SequenceId};
    use crate::domain::record::{OrderRecord, RecordLine};
    use crate::domain::slot::Slot;

    fn record() -> OrderRecord {
        OrderRecord {
            sequence_id: SequenceId(42),
            conversation_id: "user-1".to_owned(),
            placed_at: Utc::now(),
            delivery_slot: Slot::new(19, 30).expect("valid slot"),
            customer_name: "Mario Rossi".to_owned(),
            customer_phone: "3331234567".to_owned(),
            customer_address: "Via Roma 1".to_owned(),
            payment: PaymentMethod::CashOnDelivery,
            mains: vec![RecordLine {
                name: "Margherita".to_owned(),
                unit_price: Decimal::new(600, 2),
                quantity: 2,
            }],
            sides: Vec::new(),
            drinks: vec![RecordLine {
                name: "Coca Cola".to_owned(),
                unit_price: Decimal::new(300, 2),
                quantity: 1,
            }],
            total: Decimal::new(1500, 2),
        }
    }

    #[test]
    fn ticket_lists_grouped_lines_and_total() {
        let ticket = render_ticket(&record());

        assert!(ticket.contains("ORDINE #000042"));
        assert!(ticket.contains("Orario consegna: 19:30"));
        assert!(ticket.contains("2x Margherita"));
        assert!(ticket.contains("6.00€/cad = 12.00€"));
        assert!(ticket.contains("TOTALE: 15.00€"));
        assert!(!ticket.contains("FRITTI"), "empty categories are omitted");
    }
}
