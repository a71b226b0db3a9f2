//! Query normalization shared by the directory term and candidate names.

/// Keep ASCII letters, digits and spaces, then lowercase.
///
/// Whitespace is neither trimmed nor collapsed, so `"Joe's  Pizza"` becomes
/// `"joes  pizza"`.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
