use crate::domain::order::PaymentMethod;

// Decision points use closed, auditable keyword sets on purpose; this is
// keyword spotting, not NLU.

const AFFIRMATIONS: &[&str] =
    &["sì", "si", "yes", "ok", "giusto", "corretto", "esatto", "confermo"];

const REJECTIONS: &[&str] = &["no", "sbagliato", "non va bene", "cambia", "modifica"];

const ITEM_REFUSALS: &[&str] = &["no", "niente", "non voglio", "basta così"];

const CASH_KEYWORDS: &[&str] = &["contanti", "cash"];

const CARD_KEYWORDS: &[&str] = &["carta", "bancomat", "credit", "credito", "debito", "pos"];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let normalized = text.to_lowercase();
    keywords.iter().any(|keyword| normalized.contains(keyword))
}

/// "Is the order correct?" — positive answer at a confirmation state.
pub fn is_affirmation(text: &str) -> bool {
    contains_any(text, AFFIRMATIONS)
}

/// Negative answer at a confirmation state; triggers the restart loop-back.
pub fn is_rejection(text: &str) -> bool {
    contains_any(text, REJECTIONS)
}

/// Explicit "nothing for me" while collecting sides or drinks.
pub fn is_item_refusal(text: &str) -> bool {
    contains_any(text, ITEM_REFUSALS)
}

pub fn classify_payment(text: &str) -> Option<PaymentMethod> {
    if contains_any(text, CASH_KEYWORDS) {
        return Some(PaymentMethod::CashOnDelivery);
    }
    if contains_any(text, CARD_KEYWORDS) {
        return Some(PaymentMethod::CardOnDelivery);
    }
    None
}

/// Minimal phone-shape check: optional leading `+`, then a digit followed
/// by at least seven more digits, spaces, or hyphens. Anything stricter
/// would reject real numbers people dictate over the phone.
pub fn is_phone_like(text: &str) -> bool {
    let trimmed = text.trim();
    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) if first.is_ascii_digit() => {}
        _ => return false,
    }
    chars
        .take_while(|c| c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .count()
        >= 7
}
