pub mod confirm_dialog;
pub mod practice_area;
pub mod progress_bar;
pub mod summary_banner;
pub mod transcript_panel;
pub mod word_cards;
