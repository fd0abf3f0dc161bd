//! Customer-facing Italian response texts, kept apart from the state
//! logic so the controller reads as a transition table.

use crate::domain::menu::ItemCategory;
use crate::domain::order::Order;
use crate::domain::slot::Slot;

pub(crate) fn greeting(mains_menu: &str) -> String {
    format!("Buonasera, pizzeria da Mario! Che pizza desidera ordinare?\n\n{mains_menu}")
}

pub(crate) fn mains_reprompt() -> String {
    "Mi scusi, non ho capito quali pizze desidera. Può ripetere per favore?".to_owned()
}

pub(crate) fn added_and_ask_sides(added: &[(String, u32)], sides_menu: &str) -> String {
    format!(
        "Perfetto! Ho registrato: {}. Vuole anche dei fritti?\n\n{sides_menu}",
        counted_list(added)
    )
}

pub(crate) fn ask_drinks(added: Option<&[(String, u32)]>, drinks_menu: &str) -> String {
    match added {
        Some(added) => format!(
            "Ottimo! Ho aggiunto {}. Vuole anche delle bibite?\n\n{drinks_menu}",
            counted_list(added)
        ),
        None => format!("Vuole anche delle bibite?\n\n{drinks_menu}"),
    }
}

pub(crate) fn sides_reprompt() -> String {
    "Mi scusi, non ho capito quali fritti desidera. Può ripetere per favore? \
     Se non desidera fritti, può dirmi 'no grazie'."
        .to_owned()
}

pub(crate) fn drinks_reprompt() -> String {
    "Mi scusi, non ho capito quali bibite desidera. Può ripetere per favore? \
     Se non desidera bibite, può dirmi 'no grazie'."
        .to_owned()
}

pub(crate) fn confirm_order(added: Option<&[(String, u32)]>, order: &Order) -> String {
    let summary = order_summary(order);
    match added {
        Some(added) => format!(
            "Ottimo! Ho aggiunto {}. L'ordine è: {summary} È corretto?",
            counted_list(added)
        ),
        None => format!("L'ordine è: {summary} È corretto?"),
    }
}

pub(crate) fn confirm_order_reprompt() -> String {
    "Mi scusi, non ho capito se l'ordine è corretto. Può rispondere con 'sì' o 'no'?".to_owned()
}

pub(crate) fn ask_name() -> String {
    "Per gestire l'ordine correttamente ho bisogno di: nome, indirizzo di consegna, \
     numero di telefono, metodo di pagamento. Iniziamo con il nome, come si chiama?"
        .to_owned()
}

pub(crate) fn ask_address() -> String {
    "Grazie. Qual è l'indirizzo di consegna?".to_owned()
}

pub(crate) fn ask_phone() -> String {
    "Mi può lasciare un numero di telefono per eventuali comunicazioni sulla consegna?".to_owned()
}

pub(crate) fn invalid_phone() -> String {
    "Mi scusi, non sembra un numero di telefono valido. \
     Può inserire un numero di telefono corretto?"
        .to_owned()
}

pub(crate) fn ask_payment() -> String {
    "Come preferisce pagare? Accettiamo contanti e carta alla consegna.".to_owned()
}

pub(crate) fn invalid_payment() -> String {
    "Mi scusi, non ho capito il metodo di pagamento. \
     Può scegliere tra contanti o carta alla consegna?"
        .to_owned()
}

pub(crate) fn ask_slot(available: &[Slot]) -> String {
    format!(
        "Quale orario preferisce per la consegna? Ecco gli orari disponibili:\n{}",
        slot_grid(available)
    )
}

pub(crate) fn slot_unavailable(slot: Slot, available: &[Slot]) -> String {
    format!(
        "Mi dispiace, l'orario {slot} non è disponibile. Scelga uno tra questi orari: {}...",
        slot_preview(available)
    )
}

pub(crate) fn slot_reprompt(available: &[Slot]) -> String {
    format!(
        "Mi scusi, non ho capito l'orario. Può scegliere uno tra questi orari: {}...",
        slot_preview(available)
    )
}

pub(crate) fn final_summary(order: &Order) -> String {
    let sequence_id =
        order.sequence_id.map(|id| id.to_string()).unwrap_or_else(|| "------".to_owned());
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    let payment = order.payment.map(|p| p.label()).unwrap_or_default();
    let slot = order.delivery_slot.map(|s| s.to_string()).unwrap_or_default();

    format!(
        "Riepilogo del suo ordine #{sequence_id}:\n\
         Prodotti: {}\n\
         Nome: {}\n\
         Indirizzo di consegna: {}\n\
         Telefono: {}\n\
         Orario di consegna: {slot}\n\
         Metodo di pagamento: {payment}\n\n\
         È tutto corretto? Conferma l'ordine?",
        order_summary(order),
        field(&order.customer.name),
        field(&order.customer.address),
        field(&order.customer.phone),
    )
}

pub(crate) fn final_reprompt() -> String {
    "Mi scusi, non ho capito se vuole confermare l'ordine. \
     Può rispondere con 'sì' o 'no'?"
        .to_owned()
}

/// Loop-back after a rejected order summary, before customer details.
pub(crate) fn restart_order(mains_menu: &str) -> String {
    format!("Mi scusi per l'errore. Ricominciamo. Che pizza desidera ordinare?\n\n{mains_menu}")
}

/// Loop-back after a rejected final confirmation.
pub(crate) fn restart_from_scratch(mains_menu: &str) -> String {
    format!(
        "Mi scusi per l'errore. Ricominciamo da capo. \
         Che pizza desidera ordinare?\n\n{mains_menu}"
    )
}

pub(crate) fn finalized(
    name: &str,
    sequence_id: &str,
    address: &str,
    slot: &str,
    phone: &str,
) -> String {
    format!(
        "Grazie {name}! Il suo ordine #{sequence_id} è stato confermato. \
         Consegneremo a {address} alle {slot}. In caso di problemi, la contatteremo \
         al numero {phone}. Grazie per aver scelto la pizzeria da Mario! \
         In caso di problemi o modifiche all'ordine la preghiamo di contattare \
         direttamente il numero della pizzeria, a presto!"
    )
}

pub(crate) fn catalog_apology() -> String {
    "Mi scusi, si è verificato un problema con il nostro menu. Può ripetere tra un momento?"
        .to_owned()
}

pub(crate) fn fatal_apology() -> String {
    "Mi scusi, c'è stato un errore. Può ricominciare l'ordine?".to_owned()
}

/// "2 Margherita, 1 Diavola"
fn counted_list(items: &[(String, u32)]) -> String {
    items
        .iter()
        .map(|(name, count)| format!("{count} {name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Grouped per-category summary, categories joined with " e ".
pub(crate) fn order_summary(order: &Order) -> String {
    let parts: Vec<String> = ItemCategory::ALL
        .iter()
        .map(|category| order.grouped(*category))
        .filter(|grouped| !grouped.is_empty())
        .map(|grouped| counted_list(&grouped))
        .collect();

    if parts.is_empty() {
        "non ci sono prodotti nel suo ordine".to_owned()
    } else {
        parts.join(" e ")
    }
}

/// Full availability list, five slots per line for readability.
fn slot_grid(available: &[Slot]) -> String {
    available
        .chunks(5)
        .map(|row| row.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Short preview used on re-prompts.
fn slot_preview(available: &[Slot]) -> String {
    available.iter().take(5).map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::{order_summary, slot_grid};
    use crate::domain::menu::ItemCategory;
    use crate::domain::order::Order;
    use crate::domain::slot::Slot;

    #[test]
    fn summary_groups_and_counts_by_canonical_name() {
        let mut order = Order::new("user-1");
        order.add_items(ItemCategory::Mains, "Margherita", 2);
        order.add_items(ItemCategory::Mains, "Diavola", 1);
        order.add_items(ItemCategory::Drinks, "Coca Cola", 1);

        assert_eq!(order_summary(&order), "2 Margherita, 1 Diavola e 1 Coca Cola");
    }

    #[test]
    fn empty_order_summary_says_so() {
        let order = Order::new("user-1");
        assert_eq!(order_summary(&order), "non ci sono prodotti nel suo ordine");
    }

    #[test]
    fn slot_grid_wraps_every_five_entries() {
        let slots: Vec<Slot> = (0u8..7)
            .map(|i| Slot::new(19 + i / 4, (i % 4) * 15).expect("valid slot"))
            .collect();
        let grid = slot_grid(&slots);
        assert_eq!(grid.lines().count(), 2);
    }
}
