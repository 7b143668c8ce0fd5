use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// "Crème brûlée" -> "Creme brulee"
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Form used on both sides of a filter comparison
pub fn fold_for_search(text: &str) -> String {
    strip_diacritics(text).to_uppercase()
}
