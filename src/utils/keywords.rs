const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "in", "with", "and", "or", "for", "from", "who", "is", "are", "has", "have",
    "that", "this", "to", "influencer", "creator", "blogger", "vlogger",
];

pub(crate) fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

pub(crate) fn extract(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() > 1 && !is_stop_word(word))
        .collect()
}

/// `ILIKE` pattern matching `keyword` as a substring. `%`, `_` and the
/// escape character are escaped so they match literally.
pub(crate) fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');

    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }

    pattern.push('%');
    pattern
}
