use crate::check::normalize::normalize;

/// Exact comparison after normalizing both sides.
pub fn is_match(candidate: &str, target: &str) -> bool {
    normalize(candidate) == normalize(target)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordStatus {
    Pending,
    Correct,
    Incorrect,
}

/// Target words as displayed: split on single spaces.
pub fn target_words(target: &str) -> Vec<&str> {
    target.split(' ').collect()
}

/// Per-position status of each target word against what has been typed so far.
/// Recomputed from scratch on every call.
pub fn word_statuses(target: &str, input: &str) -> Vec<WordStatus> {
    let typed: Vec<&str> = input.split_whitespace().collect();

    target_words(target)
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let typed_word = typed.get(i).map(|w| normalize(w)).unwrap_or_default();
            if typed_word.is_empty() {
                WordStatus::Pending
            } else if typed_word == normalize(word) {
                WordStatus::Correct
            } else {
                WordStatus::Incorrect
            }
        })
        .collect()
}

/// Display form of one word card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordCard {
    pub text: String,
    pub status: WordStatus,
}

/// Word cards for the live feedback strip.
///
/// Correct words show the target word, incorrect words show what was typed
/// followed by `*`, pending words are masked with one `*` per character. With
/// `revealed`, every card shows its target word but keeps its status colour.
pub fn word_cards(target: &str, input: &str, revealed: bool) -> Vec<WordCard> {
    let typed: Vec<&str> = input.split_whitespace().collect();
    let statuses = word_statuses(target, input);

    target_words(target)
        .into_iter()
        .zip(statuses)
        .enumerate()
        .map(|(i, (word, status))| {
            let text = if revealed {
                word.to_string()
            } else {
                match status {
                    WordStatus::Correct => word.to_string(),
                    WordStatus::Incorrect => format!("{}*", typed.get(i).copied().unwrap_or("")),
                    WordStatus::Pending => "*".repeat(word.chars().count()),
                }
            };
            WordCard { text, status }
        })
        .collect()
}

/// True when every target word is currently typed correctly.
pub fn all_correct(statuses: &[WordStatus]) -> bool {
    !statuses.is_empty() && statuses.iter().all(|s| *s == WordStatus::Correct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_insensitive() {
        assert!(is_match("the   SNOW is beautiful", "The snow is beautiful."));
    }

    #[test]
    fn apostrophe_stripped_on_both_sides() {
        assert!(is_match(
            "My mom doesnt like the snow",
            "My mom doesn't like the snow."
        ));
    }

    #[test]
    fn missing_or_wrong_word_is_a_full_miss() {
        assert!(!is_match("My mom like the snow", "My mom doesn't like the snow."));
        assert!(!is_match("My dad doesn't like the snow", "My mom doesn't like the snow."));
        assert!(!is_match("", "First snowfall."));
    }

    #[test]
    fn symmetric() {
        let pairs = [
            ("The snow is beautiful.", "the snow is beautiful"),
            ("First snowfall.", "first snow fall"),
            ("", "  "),
            ("It's", "its"),
        ];
        for (a, b) in pairs {
            assert_eq!(is_match(a, b), is_match(b, a), "asymmetric for {a:?} / {b:?}");
        }
    }

    #[test]
    fn partial_input_marks_rest_pending() {
        let statuses = word_statuses("My sister and I go outside.", "my sister AND");
        assert_eq!(
            statuses,
            vec![
                WordStatus::Correct,
                WordStatus::Correct,
                WordStatus::Correct,
                WordStatus::Pending,
                WordStatus::Pending,
                WordStatus::Pending,
            ]
        );
    }

    #[test]
    fn wrong_word_is_incorrect_and_punctuation_ignored() {
        let statuses = word_statuses("We go inside for hot chocolate.", "we went inside for hot chocolate");
        assert_eq!(statuses[1], WordStatus::Incorrect);
        assert_eq!(statuses[5], WordStatus::Correct);
    }

    #[test]
    fn punctuation_only_token_stays_pending() {
        let statuses = word_statuses("First snowfall.", "first ,");
        assert_eq!(statuses, vec![WordStatus::Correct, WordStatus::Pending]);
    }

    #[test]
    fn empty_input_is_all_pending() {
        let statuses = word_statuses("It starts to snow again.", "   ");
        assert!(statuses.iter().all(|s| *s == WordStatus::Pending));
        assert!(!all_correct(&statuses));
    }

    #[test]
    fn cards_mask_pending_and_flag_incorrect() {
        let cards = word_cards("The snow finally stopped.", "the snaw", false);
        let texts: Vec<&str> = cards.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["The", "snaw*", "*******", "********"]);
    }

    #[test]
    fn revealed_cards_show_targets_with_status() {
        let cards = word_cards("The snow finally stopped.", "the snaw", true);
        assert_eq!(cards[1].text, "snow");
        assert_eq!(cards[1].status, WordStatus::Incorrect);
        assert_eq!(cards[3].text, "stopped.");
        assert_eq!(cards[3].status, WordStatus::Pending);
    }
}
