//! Identifier and comment conversions shared by the generators.

/// Converts a mixed-case identifier to snake_case.
///
/// Scans left to right over non-overlapping character pairs and inserts an
/// underscore between a character and a following uppercase letter, so
/// `entityID` becomes `entity_id` rather than `entity_i_d`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match chars.get(i + 1) {
            Some(&next) if next.is_uppercase() && c != '\n' => {
                result.extend(c.to_lowercase());
                result.push('_');
                result.extend(next.to_lowercase());
                i += 2;
            }
            _ => {
                result.extend(c.to_lowercase());
                i += 1;
            }
        }
    }

    result
}

/// Uppercases the first character.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Collapses every whitespace run to a single space and trims the ends.
#[must_use]
pub fn normalize_comment(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips a trailing `Pdu` suffix, ignoring case.
///
/// A name that consists only of the suffix is returned unchanged.
#[must_use]
pub fn strip_pdu_suffix(name: &str) -> &str {
    const SUFFIX: &str = "pdu";
    if name.len() > SUFFIX.len() && name.is_char_boundary(name.len() - SUFFIX.len()) {
        let (head, tail) = name.split_at(name.len() - SUFFIX.len());
        if tail.eq_ignore_ascii_case(SUFFIX) {
            return head;
        }
    }
    name
}
