//! Case-insensitive string helpers shared by column lookup and rule matching.

/// Compare two strings ignoring case.
///
/// ASCII input takes a fast path; anything else is compared through the
/// Unicode lowercase mapping of both sides.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.len() == b.len() && a.eq_ignore_ascii_case(b) {
        return true;
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Lowercased key used for case-insensitive map lookups.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// Split a comma-separated list, trimming each token and dropping empty ones.
pub fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_case_folding() {
        assert!(eq_ignore_case("Not Used", "NOT USED"));
        assert!(eq_ignore_case("", ""));
        assert!(!eq_ignore_case("abc", "abd"));
        assert!(!eq_ignore_case("abc", "ab"));
    }

    #[test]
    fn unicode_case_folding() {
        assert!(eq_ignore_case("Ärger", "ärger"));
        assert!(eq_ignore_case("ÉCOLE", "école"));
    }

    #[test]
    fn split_list_trims_and_drops_empty_tokens() {
        let tokens: Vec<&str> = split_list(" a , b,,c ,").collect();
        assert_eq!(tokens, vec!["a", "b", "c"]);
        assert_eq!(split_list("").count(), 0);
    }
}
