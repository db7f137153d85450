use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `dollars` and `USD` are matched case-sensitively.
    static ref MONEY_PATTERN: Regex = Regex::new(
        r"\$\d[\d,]*(?:\.\d+)?|\b\d+\s+dollars\b|\bUSD\s*\d+"
    )
    .expect("money pattern is valid");
}

/// Case-insensitive, non-overlapping occurrences of `phrase` in the title plus
/// those in the description.
pub fn count_phrase(title: &str, description: &str, phrase: &str) -> usize {
    let phrase = phrase.to_lowercase();
    if phrase.is_empty() {
        return 0;
    }
    count_in(title, &phrase) + count_in(description, &phrase)
}

fn count_in(text: &str, lowered_phrase: &str) -> usize {
    text.to_lowercase().matches(lowered_phrase).count()
}

pub fn contains_money(title: &str, description: &str) -> bool {
    MONEY_PATTERN.is_match(&format!("{} {}", title, description))
}
