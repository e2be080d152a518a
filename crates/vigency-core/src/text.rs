//! Text cleaning helpers shared by the normalizers.

/// Stringified nulls left behind by spreadsheet tooling.
const MISSING_TOKENS: &[&str] = &["nan", "none", "null", "nat"];

/// Trim a cell and map blanks and null tokens to `None`.
pub fn clean_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || is_missing_token(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn is_missing_token(value: &str) -> bool {
    MISSING_TOKENS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
}

/// Title-case a string word by word.
///
/// A letter is uppercased when the character before it is not a letter and
/// lowercased otherwise, so `"tdah-leve"` becomes `"Tdah-Leve"` and
/// `"DEPRESSÃO maior"` becomes `"Depressão Maior"`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_is_letter = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}
