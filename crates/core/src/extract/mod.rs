pub mod keywords;
pub mod lexicon;
pub mod timeslot;

pub use keywords::{
    classify_payment, is_affirmation, is_item_refusal, is_phone_like, is_rejection,
};
pub use lexicon::Lexicon;
pub use timeslot::extract_slot;
