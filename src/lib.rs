rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod audio;
pub mod capture;
pub mod catalog;
pub mod check;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod session;
pub mod ui;

/// Switch UI language. Unknown locales fall back to English per key.
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}
