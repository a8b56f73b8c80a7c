//! Keyed value lines and comma separated value sets.
//!
//! Definition blocks are line oriented:
//! ```text
//! key: value
//! other-key: a, b, c
//! ```
//! A key is located anywhere in the text (not only at the start of a line)
//! and its value runs from after the key to the next line break.

use std::collections::BTreeSet;

const LINE_BREAK: char = '\n';
const VALUE_SEPARATOR: char = ',';

/// Returns the value following the first occurrence of `key` in `text`.
///
/// Whitespace directly after the key is skipped, the value ends at the next
/// line break (or the end of `text`) and is trimmed. Returns an empty string
/// when `key` does not occur.
#[must_use]
pub fn value_line<'a>(key: &str, text: &'a str) -> &'a str {
    let Some(start) = text.find(key) else {
        return "";
    };

    let rest = text[start + key.len()..].trim_start();

    rest.find(LINE_BREAK)
        .map_or(rest, |end| &rest[..end])
        .trim()
}

/// Splits a comma separated line into a set of trimmed tokens.
///
/// Tokens that are empty after trimming (e.g. from a trailing comma) are
/// dropped, and duplicates collapse.
#[must_use]
pub fn split_csv(line: &str) -> BTreeSet<String> {
    if line.is_empty() {
        return BTreeSet::new();
    }

    line.split(VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Joins a set of tokens back into a comma separated line.
///
/// The set is ordered, so the output is sorted and stable.
#[must_use]
pub fn join_csv(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Counts the non-overlapping occurrences of `key` in `text`.
#[must_use]
pub fn occurrences(key: &str, text: &str) -> usize {
    text.matches(key).count()
}

/// Returns true if `key` occurs in `text` at most once.
#[must_use]
pub fn appears_at_most_once(key: &str, text: &str) -> bool {
    occurrences(key, text) <= 1
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod value_line_tests {
        use super::*;

        #[test]
        fn one_liner() {
            assert_eq!(value_line("from:", "from: stoyo@fmi.bg"), "stoyo@fmi.bg");
        }

        #[test]
        fn missing_key() {
            assert_eq!(value_line("from:", "test sentence no match"), "");
        }

        #[test]
        fn line_break_at_end() {
            assert_eq!(value_line("from:", "from: stoyo@fmi.bg\n"), "stoyo@fmi.bg");
        }

        #[test]
        fn line_breaks_around() {
            assert_eq!(
                value_line("from:", "\nfrom: stoyo@fmi.bg\n"),
                "stoyo@fmi.bg"
            );
        }

        #[test]
        fn no_space_after_key() {
            assert_eq!(value_line("from:", "from:stoyo@fmi.bg"), "stoyo@fmi.bg");
        }

        #[test]
        fn carriage_return_is_trimmed() {
            assert_eq!(
                value_line("subject:", "subject: Hello there \r\nfrom: x"),
                "Hello there"
            );
        }

        #[test]
        fn key_in_the_middle() {
            let text = "subject-includes: mjt, izpit, 2022\nfrom: stoyo@fmi.bg\nsubject-or-body-includes: izpit\n";
            assert_eq!(value_line("from:", text), "stoyo@fmi.bg");
            assert_eq!(value_line("subject-includes:", text), "mjt, izpit, 2022");
            assert_eq!(value_line("subject-or-body-includes:", text), "izpit");
        }

        #[test]
        fn first_occurrence_wins() {
            assert_eq!(value_line("from:", "from: a@x.com\nfrom: b@x.com"), "a@x.com");
        }
    }

    mod csv_tests {
        use super::*;

        #[test]
        fn empty_line() {
            assert!(split_csv("").is_empty());
        }

        #[test]
        fn trims_tokens() {
            let set = split_csv("  a@x.com ,b@x.com,   c@x.com");
            assert_eq!(set.len(), 3);
            assert!(set.contains("a@x.com"));
            assert!(set.contains("b@x.com"));
            assert!(set.contains("c@x.com"));
        }

        #[test]
        fn duplicates_collapse() {
            let set = split_csv("mjt, mjt ,exam");
            assert_eq!(set.len(), 2);
        }

        #[test]
        fn trailing_comma_is_ignored() {
            let set = split_csv("a@x.com, b@x.com,");
            assert_eq!(set.len(), 2);
            assert!(!set.contains(""));
        }

        #[test]
        fn join_is_sorted() {
            let set = split_csv("c, a, b");
            assert_eq!(join_csv(&set), "a, b, c");
        }
    }

    mod uniqueness_tests {
        use super::*;

        #[test]
        fn occurrences_counts_every_line() {
            let text = "from: a@x.com\nsubject-includes: from:\nfrom: b@x.com";
            assert_eq!(occurrences("from:", text), 3);
            assert_eq!(occurrences("subject-includes:", text), 1);
            assert_eq!(occurrences("recipients-includes:", text), 0);
        }

        #[test]
        fn occurrences_ignores_similar_keys() {
            let text = "subject-or-body-includes: izpit";
            assert_eq!(occurrences("subject-includes:", text), 0);
        }

        #[test]
        fn at_most_once_single() {
            assert!(appears_at_most_once("from:", "from: stoyo@fmi.bg"));
        }

        #[test]
        fn at_most_once_absent() {
            assert!(appears_at_most_once("from:", "this is a no match sentence"));
        }

        #[test]
        fn at_most_once_duplicate_next_to_each_other() {
            assert!(!appears_at_most_once(
                "from:",
                "from: stoyo@fmi.bg from: stoyo@fmi.bg"
            ));
        }

        #[test]
        fn at_most_once_duplicate_on_separate_lines() {
            let text = "subject-includes: mjt\nfrom: test@fmi.bg\nsubject-or-body-includes: izpit\nfrom: stoyo@fmi.bg";
            assert!(!appears_at_most_once("from:", text));
        }
    }

    proptest! {
        #[test]
        fn csv_round_trip(tokens in proptest::collection::btree_set("[a-z0-9@.]{1,12}", 0..8)) {
            let line = join_csv(&tokens);
            prop_assert_eq!(split_csv(&line), tokens);
        }

        #[test]
        fn csv_ignores_token_order(tokens in proptest::collection::vec("[a-z]{1,6}", 1..6)) {
            let forward = tokens.join(",");
            let reversed = tokens.iter().rev().cloned().collect::<Vec<_>>().join(" , ");
            prop_assert_eq!(split_csv(&forward), split_csv(&reversed));
        }
    }
}
