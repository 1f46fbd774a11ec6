/// Lowercase `text` and split it into word tokens. Characters that commonly
/// belong to technology names (`+`, `#`, `.`) stay inside a token so that
/// "c++", "c#" and "node.js" survive.
pub fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#' || c == '.'))
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokens long enough to carry meaning on their own.
pub fn significant_tokens(text: &str, min_len: usize) -> Vec<String> {
    tokens(text).into_iter().filter(|t| t.chars().count() >= min_len).collect()
}
