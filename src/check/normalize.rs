use icu_normalizer::ComposingNormalizerBorrowed;

/// Reduce `text` to the canonical form used by every answer comparison.
///
/// Lowercases, composes to NFC, drops everything that is not a letter, digit,
/// underscore or whitespace, then collapses whitespace runs to a single space
/// and trims both ends. Both sides of a comparison must go through this.
///
/// Dropping punctuation can leave two composable code points side by side,
/// so the kept text is composed once more.
pub fn normalize(text: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    let lowered = text.to_lowercase();
    let composed = nfc.normalize(&lowered);

    let mut out = String::with_capacity(composed.len());
    let mut pending_space = false;
    for ch in composed.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else if is_word_char(ch) {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    nfc.normalize(&out).into_owned()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
