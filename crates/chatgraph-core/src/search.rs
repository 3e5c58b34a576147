//! # Search
//!
//! Case-insensitive substring search over message content.
//!
//! Text and query are folded the same way before comparison:
//! 1. Compatibility decomposition (NFKD), so precomposed and combining-mark
//!    spellings of a letter are equivalent, and so are fullwidth forms and
//!    ligatures and their plain letters.
//! 2. Full Unicode case folding ("Straße" matches "STRASSE", final sigma
//!    matches capital sigma), followed by NFKD again.
//! 3. Optionally, removal of combining marks (`ignore_diacritics`).
//!
//! A match never starts or ends inside a decomposed character, and without
//! diacritic folding it may not stop right before a combining mark that
//! belongs to its last letter ("e" does not match the "e" of "é").
//!
//! Spans are reported in characters of the original content, with the
//! equivalent byte range for slicing.

use crate::{Graph, Message, NodeId};
use caseless::Caseless;
use std::ops::Range;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::{canonical_combining_class, is_combining_mark};

// =============================================================================
// SEARCH RESULT
// =============================================================================

/// A message whose content contains the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<'g> {
    /// Handle of the matched message.
    pub node: NodeId,
    /// The matched message.
    pub message: &'g Message,
    /// Position of the message in the searched collection.
    pub message_index: usize,
    /// Character offset where the first match starts.
    pub start_index: usize,
    /// Character offset one past the end of the first match.
    pub end_index: usize,
    /// The same span as byte offsets into `message.content`.
    pub byte_range: Range<usize>,
}

impl SearchResult<'_> {
    /// The matched slice of the message content.
    #[must_use]
    pub fn matched_text(&self) -> &str {
        self.message
            .content
            .get(self.byte_range.clone())
            .unwrap_or_default()
    }
}

// =============================================================================
// MATCHER
// =============================================================================

/// Folding options for search.
///
/// The default folds case only, leaving accented letters distinct from their
/// base letters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Matcher {
    ignore_diacritics: bool,
}

impl Matcher {
    /// Create a case-insensitive matcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also treat accented letters as their base letters.
    #[must_use]
    pub fn ignore_diacritics(mut self, ignore: bool) -> Self {
        self.ignore_diacritics = ignore;
        self
    }

    /// Fold a query once so it can be matched against many texts.
    #[must_use]
    pub fn compile(&self, query: &str) -> Pattern {
        Pattern {
            matcher: *self,
            folded: self.fold(query).chars,
        }
    }

    fn fold(&self, text: &str) -> Folded {
        let mut folded = Folded::default();

        // Folding one character at a time keeps every folded character
        // traceable to the original character it came from.
        for (index, ch) in text.chars().enumerate() {
            let expanded = std::iter::once(ch).nfkd().default_case_fold().nfkd();
            for c in expanded {
                if self.ignore_diacritics && is_combining_mark(c) {
                    continue;
                }
                folded.chars.push(c);
                folded.origin.push(index);
            }
        }

        folded.reorder_marks();
        folded
    }
}

/// Folded characters, each tagged with the index of the original character
/// it came from.
#[derive(Debug, Default)]
struct Folded {
    chars: Vec<char>,
    origin: Vec<usize>,
}

impl Folded {
    /// Put runs of combining marks in canonical order, as full-string NFKD
    /// would. Per-character decomposition alone leaves them in input order.
    fn reorder_marks(&mut self) {
        let mut start = 0;
        while start < self.chars.len() {
            if canonical_combining_class(self.chars[start]) == 0 {
                start += 1;
                continue;
            }
            let mut end = start;
            while end < self.chars.len() && canonical_combining_class(self.chars[end]) != 0 {
                end += 1;
            }
            let mut run: Vec<(char, usize)> = self.chars[start..end]
                .iter()
                .copied()
                .zip(self.origin[start..end].iter().copied())
                .collect();
            run.sort_by_key(|(c, _)| canonical_combining_class(*c));
            for (offset, (c, o)) in run.into_iter().enumerate() {
                self.chars[start + offset] = c;
                self.origin[start + offset] = o;
            }
            start = end;
        }
    }
}

// =============================================================================
// PATTERN
// =============================================================================

/// A folded query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    matcher: Matcher,
    folded: Vec<char>,
}

/// Location of a match inside a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Character range in the original text.
    pub chars: Range<usize>,
    /// Byte range in the original text.
    pub bytes: Range<usize>,
}

impl Pattern {
    /// True when the query folds to nothing; an empty pattern never matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Find the first match of this pattern in `text`.
    #[must_use]
    pub fn find(&self, text: &str) -> Option<Span> {
        if self.folded.is_empty() {
            return None;
        }

        let haystack = self.matcher.fold(text);
        let len = self.folded.len();

        let start = haystack
            .chars
            .windows(len)
            .enumerate()
            .find(|(at, window)| {
                *window == self.folded.as_slice() && self.aligned(&haystack, *at, *at + len)
            })
            .map(|(at, _)| at)?;
        let end = start + len;

        let first_char = haystack.origin[start];
        let end_char = haystack.origin[end - 1] + 1;
        Some(Span {
            chars: first_char..end_char,
            bytes: byte_offset(text, first_char)..byte_offset(text, end_char),
        })
    }

    fn aligned(&self, haystack: &Folded, start: usize, end: usize) -> bool {
        let starts_clean = start == 0 || haystack.origin[start - 1] != haystack.origin[start];
        let ends_clean =
            end == haystack.chars.len() || haystack.origin[end] != haystack.origin[end - 1];
        let no_trailing_mark = self.matcher.ignore_diacritics
            || haystack
                .chars
                .get(end)
                .is_none_or(|next| !is_combining_mark(*next));
        starts_clean && ends_clean && no_trailing_mark
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

// =============================================================================
// SEARCH
// =============================================================================

/// Search `messages` for `query` with the default case-insensitive matcher.
///
/// One result per matching message, in collection order. Handles that do not
/// belong to `graph` never match but still count towards `message_index`.
#[must_use]
pub fn search<'g>(graph: &'g Graph, messages: &[NodeId], query: &str) -> Vec<SearchResult<'g>> {
    search_with(graph, messages, &Matcher::default(), query)
}

/// Search with an explicitly configured matcher.
#[must_use]
pub fn search_with<'g>(
    graph: &'g Graph,
    messages: &[NodeId],
    matcher: &Matcher,
    query: &str,
) -> Vec<SearchResult<'g>> {
    let pattern = matcher.compile(query);
    if pattern.is_empty() {
        return Vec::new();
    }

    messages
        .iter()
        .enumerate()
        .filter_map(|(index, &node)| {
            let message = graph.get(node)?;
            let span = pattern.find(&message.content)?;
            Some(SearchResult {
                node,
                message,
                message_index: index,
                start_index: span.chars.start,
                end_index: span.chars.end,
                byte_range: span.bytes,
            })
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn find(query: &str, text: &str) -> Option<Range<usize>> {
        Matcher::new().compile(query).find(text).map(|s| s.chars)
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(find("world", "Hello World!"), Some(6..11));
        assert_eq!(find("WORLD", "hello world"), Some(6..11));
        assert_eq!(find("wOrLd", "WORLD"), Some(0..5));
    }

    #[test]
    fn no_match_returns_none() {
        assert_eq!(find("mother", "Who is Jon Snow's father?"), None);
    }

    #[test]
    fn only_first_match_is_reported() {
        assert_eq!(find("ab", "xxABab"), Some(2..4));
    }

    #[test]
    fn composed_and_decomposed_forms_are_equivalent() {
        let composed = "Caf\u{e9} au lait";
        let decomposed = "Cafe\u{301} au lait";

        assert_eq!(find("caf\u{e9}", decomposed), Some(0..5));
        assert_eq!(find("cafe\u{301}", composed), Some(0..4));
        assert_eq!(find("CAF\u{c9}", composed), Some(0..4));
    }

    #[test]
    fn base_letter_does_not_match_accented_letter_by_default() {
        assert_eq!(find("cafe", "Caf\u{e9}"), None);
        assert_eq!(find("cafe", "Cafe\u{301}"), None);
    }

    #[test]
    fn diacritics_can_be_ignored() {
        let matcher = Matcher::new().ignore_diacritics(true);
        let pattern = matcher.compile("resume");
        let span = pattern.find("My R\u{e9}sum\u{e9}.").expect("match");
        assert_eq!(span.chars, 3..9);
        assert_eq!(&"My R\u{e9}sum\u{e9}."[span.bytes], "R\u{e9}sum\u{e9}");
    }

    #[test]
    fn spans_count_characters_not_bytes() {
        let text = "\u{e9}t\u{e9} \u{e0} Paris";
        let span = Matcher::new().compile("paris").find(text).expect("match");
        assert_eq!(span.chars, 6..11);
        assert_eq!(span.bytes, 9..14);
        assert_eq!(&text[span.bytes], "Paris");
    }

    #[test]
    fn dotted_capital_i_folds_to_plain_i() {
        // U+0130 decomposes to "I" + U+0307.
        let text = "\u{130}stanbul";
        let span = Matcher::new().ignore_diacritics(true).compile("istanbul").find(text);
        assert_eq!(span.map(|s| s.chars), Some(0..8));
    }

    #[test]
    fn final_sigma_matches_capital_sigma() {
        let mut graph = Graph::new();
        let ids = vec![graph.insert(Message::user("1", "εν αρχη ην ο λογος"))];

        let results = search(&graph, &ids, "ΛΟΓΟΣ");
        assert_eq!(results.len(), 1);
        assert_eq!((results[0].start_index, results[0].end_index), (13, 18));
        assert_eq!(results[0].matched_text(), "λογος");

        assert_eq!(find("λογοσ", "λογος"), Some(0..5));
    }

    #[test]
    fn sharp_s_matches_double_s() {
        let text = "Die Stra\u{df}e";
        let span = Matcher::new().compile("STRASSE").find(text).expect("match");
        assert_eq!(span.chars, 4..10);
        assert_eq!(&text[span.bytes], "Stra\u{df}e");

        assert_eq!(find("stra\u{df}e", "STRASSE"), Some(0..7));
        // Half of the expansion of a single character is not a match.
        assert_eq!(find("stras", "Stra\u{df}e"), None);
    }

    #[test]
    fn fullwidth_and_ligature_forms_match_plain_letters() {
        // U+FF37 FULLWIDTH LATIN CAPITAL LETTER W, ...
        assert_eq!(
            find("world", "Hello \u{ff37}\u{ff4f}\u{ff52}\u{ff4c}\u{ff44}"),
            Some(6..11)
        );
        assert_eq!(find("file", "\u{fb01}le"), Some(0..3));
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(Matcher::new().compile("").is_empty());
        assert_eq!(find("", "anything"), None);
    }

    #[test]
    fn search_reports_collection_indices() {
        let mut graph = Graph::new();
        let ids = vec![
            graph.insert(Message::user("1", "nothing here")),
            graph.insert(Message::assistant("2", "Hello World!")),
        ];

        let results = search(&graph, &ids, "world");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].node, ids[1]);
        assert_eq!(results[0].message_index, 1);
        assert_eq!(results[0].message.content, "Hello World!");
        assert_eq!((results[0].start_index, results[0].end_index), (6, 11));
        assert_eq!(results[0].matched_text(), "World");

        let tail_only = search(&graph, &ids[1..], "world");
        assert_eq!(tail_only[0].message_index, 0);
    }

    #[test]
    fn search_is_repeatable() {
        let mut graph = Graph::new();
        let ids = vec![graph.insert(Message::user("1", "Ned Stark, adoptive father"))];

        assert_eq!(search(&graph, &ids, "FATHER"), search(&graph, &ids, "FATHER"));
    }
}
