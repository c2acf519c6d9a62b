//! Name normalization helpers shared by both catalog services
//!
//! Every persisted name goes through [`title_case`]; every name comparison
//! in the uniqueness and resolution paths goes through [`eq_ignore_case`].

/// Case-insensitive equality using full Unicode lowercasing, not just ASCII.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Title-case a name word by word.
///
/// Words are whitespace-separated. The first alphabetic character of a word
/// is uppercased and the remainder lowercased, except that a word which is
/// already entirely uppercase is left alone (acronyms such as "BBQ" survive).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while !rest.is_empty() {
        let word_start = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        out.push_str(&rest[..word_start]);
        rest = &rest[word_start..];
        if rest.is_empty() {
            break;
        }

        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_end];
        if is_all_uppercase(word) {
            out.push_str(word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
        rest = &rest[word_end..];
    }
    out
}

fn is_all_uppercase(word: &str) -> bool {
    let mut has_alpha = false;
    for ch in word.chars() {
        if ch.is_alphabetic() {
            has_alpha = true;
            if !ch.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha
}
