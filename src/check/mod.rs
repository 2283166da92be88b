pub mod answer;
pub mod normalize;

pub use answer::{WordCard, WordStatus, is_match, word_cards, word_statuses};
pub use normalize::normalize;
