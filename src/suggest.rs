// ==============================================================================
// Type Name Suggestions
// ==============================================================================
//
// "Did you mean?" hints for unknown field types. Candidates are the builtin
// catalog plus the two buffer forms; the closest one wins if it is within a
// length-dependent edit distance.

use crate::model::Builtin;
use crate::model::types::{BYTES, CSTR};

/// Levenshtein edit distance between two strings, over `char`s, using a
/// two-row buffer.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr_row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr_row[j + 1] = (prev_row[j] + cost)
                .min(prev_row[j + 1] + 1)
                .min(curr_row[j] + 1);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }
    prev_row[b.len()]
}

/// Short names only tolerate a single edit; otherwise `int` would suggest
/// nearly everything.
pub(crate) fn max_edit_distance(name_len: usize) -> usize {
    if name_len <= 4 { 1 } else { 2 }
}

/// All type names a field may use.
pub(crate) fn known_type_names() -> impl Iterator<Item = &'static str> {
    Builtin::ALL
        .into_iter()
        .map(Builtin::name)
        .chain([BYTES, CSTR])
}

/// The known type name closest to `unknown`, if any is close enough. Ties go
/// to the name listed first.
pub(crate) fn suggest_type(unknown: &str) -> Option<&'static str> {
    // Case-only differences (`Int32`, `UINT8`) are always worth suggesting.
    let lower = unknown.to_ascii_lowercase();
    if let Some(exact) = known_type_names().find(|name| *name == lower) {
        return Some(exact);
    }

    let threshold = max_edit_distance(unknown.chars().count());
    let mut best: Option<(usize, &'static str)> = None;
    for candidate in known_type_names() {
        let distance = levenshtein(unknown, candidate);
        if distance <= threshold && best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("int", ""), 3);
        assert_eq!(levenshtein("", "cstr"), 4);
        assert_eq!(levenshtein("uint32", "uint32"), 0);
        assert_eq!(levenshtein("unit32", "uint32"), 2);
        assert_eq!(levenshtein("int23", "int32"), 2);
        assert_eq!(levenshtein("uin32", "uint32"), 1);
        assert_eq!(levenshtein("byte", "bytes"), 1);
    }

    #[test]
    fn threshold() {
        assert_eq!(max_edit_distance(3), 1);
        assert_eq!(max_edit_distance(4), 1);
        assert_eq!(max_edit_distance(5), 2);
    }

    #[test]
    fn suggests_close_names() {
        assert_eq!(suggest_type("byte"), Some("bytes"));
        assert_eq!(suggest_type("uin32"), Some("uint32"));
        assert_eq!(suggest_type("notification"), Some("notifications"));
        assert_eq!(suggest_type("paddr_"), Some("paddr"));
        assert_eq!(suggest_type("str"), Some("cstr"));
    }

    #[test]
    fn suggests_case_fixes() {
        assert_eq!(suggest_type("Int32"), Some("int32"));
        assert_eq!(suggest_type("TASK"), Some("task"));
    }

    #[test]
    fn nothing_for_unrelated_names() {
        assert_eq!(suggest_type("bogus"), None);
        assert_eq!(suggest_type("float"), None);
        assert_eq!(suggest_type("string"), None);
    }
}
