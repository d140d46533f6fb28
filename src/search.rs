use regex::RegexBuilder;

use crate::bible::BibleData;

/// Queries shorter than this (after trimming) are not run. Guards against
/// scanning the whole corpus on every keystroke.
pub const MIN_QUERY_LEN: usize = 3;

/// At most this many matches are collected, in natural order.
pub const MAX_RESULTS: usize = 100;

/// Previews longer than this many characters are cut and get an ellipsis.
pub const PREVIEW_LIMIT: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFilter {
    #[default]
    All,
    OldTestament,
    NewTestament,
}

impl SearchFilter {
    pub fn label(&self) -> &'static str {
        match self {
            SearchFilter::All => "All",
            SearchFilter::OldTestament => "Old Testament",
            SearchFilter::NewTestament => "New Testament",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SearchFilter::All => SearchFilter::OldTestament,
            SearchFilter::OldTestament => SearchFilter::NewTestament,
            SearchFilter::NewTestament => SearchFilter::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    pub preview: String,
}

impl SearchResult {
    pub fn reference(&self) -> String {
        format!("{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// Number of leading books that belong to the Old Testament.
///
/// The data model carries no testament tag, so the split is derived from the
/// ordered book list: the first book whose name contains "matthew" starts the
/// New Testament. Translations without a Matthew fall back to treating the
/// first 75% of books as Old Testament.
pub fn old_testament_len(books: &[String]) -> usize {
    books
        .iter()
        .position(|b| b.to_lowercase().contains("matthew"))
        .unwrap_or_else(|| (books.len() as f64 * 0.75).floor() as usize)
}

/// Scan every verse for a case-insensitive substring match of `query`,
/// optionally restricted to one testament.
///
/// Results come back in natural order (book, chapter, verse), capped at
/// [`MAX_RESULTS`]. Each result carries a `preview`: the verse text with
/// every occurrence of the query wrapped in `**` markers, truncated to
/// [`PREVIEW_LIMIT`] characters. Too-short queries, no matches, and an empty
/// translation all yield an empty vec; the caller distinguishes "too short"
/// by re-checking the query length itself.
pub fn search(bible: &BibleData, query: &str, filter: SearchFilter) -> Vec<SearchResult> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    let query_lower = trimmed.to_lowercase();
    let highlighter = RegexBuilder::new(&regex::escape(trimmed))
        .case_insensitive(true)
        .build()
        .ok();

    let books = bible.books();
    let ot_len = old_testament_len(books);

    let mut results = Vec::new();

    for (book_idx, book) in books.iter().enumerate() {
        let in_old_testament = book_idx < ot_len;
        match filter {
            SearchFilter::OldTestament if !in_old_testament => continue,
            SearchFilter::NewTestament if in_old_testament => continue,
            _ => {}
        }

        for &chapter in bible.chapters(book) {
            for (verse, text) in bible.verses(book, chapter) {
                if !text.to_lowercase().contains(&query_lower) {
                    continue;
                }

                results.push(SearchResult {
                    book: book.clone(),
                    chapter,
                    verse: *verse,
                    text: text.clone(),
                    preview: make_preview(text, highlighter.as_ref()),
                });

                if results.len() >= MAX_RESULTS {
                    return results;
                }
            }
        }
    }

    results
}

fn make_preview(text: &str, highlighter: Option<&regex::Regex>) -> String {
    let highlighted = match highlighter {
        Some(re) => re.replace_all(text, "**${0}**").into_owned(),
        None => text.to_string(),
    };

    // Truncation may land inside a marker pair; cosmetic, accepted.
    if highlighted.chars().count() > PREVIEW_LIMIT {
        let cut: String = highlighted.chars().take(PREVIEW_LIMIT).collect();
        format!("{}...", cut)
    } else {
        highlighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bible::BibleData;
    use serde_json::{json, Map, Value};

    fn sample() -> BibleData {
        BibleData::from_value(&json!({
            "Genesis": {
                "1": {
                    "1": "In the beginning God created the heavens",
                    "2": "And the Spirit of God moved upon the waters"
                }
            },
            "Malachi": {
                "1": {"1": "The burden of the word of the LORD"}
            },
            "Matthew": {
                "1": {"1": "The book of the generation of Jesus Christ"}
            },
            "Revelation": {
                "1": {"1": "The Revelation of Jesus Christ, which God gave"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_short_query_returns_nothing() {
        let bible = sample();
        assert!(search(&bible, "ab", SearchFilter::All).is_empty());
        assert!(search(&bible, "  go  ", SearchFilter::All).is_empty());
        assert!(search(&bible, "", SearchFilter::All).is_empty());
    }

    #[test]
    fn test_case_insensitive_matching() {
        let bible = sample();
        let lower = search(&bible, "god", SearchFilter::All);
        let upper = search(&bible, "GOD", SearchFilter::All);
        assert_eq!(lower, upper);
        assert_eq!(lower.len(), 3);
    }

    #[test]
    fn test_every_result_contains_query() {
        let bible = sample();
        for result in search(&bible, "the", SearchFilter::All) {
            assert!(result.text.to_lowercase().contains("the"));
        }
    }

    #[test]
    fn test_results_in_natural_order() {
        let bible = sample();
        let results = search(&bible, "god", SearchFilter::All);
        let books: Vec<&str> = results.iter().map(|r| r.book.as_str()).collect();
        assert_eq!(books, ["Genesis", "Genesis", "Revelation"]);
        assert_eq!(results[0].verse, 1);
        assert_eq!(results[1].verse, 2);
    }

    #[test]
    fn test_preview_highlights_with_original_casing() {
        let bible = sample();
        let results = search(&bible, "god", SearchFilter::All);
        assert_eq!(
            results[0].preview,
            "In the beginning **God** created the heavens"
        );
    }

    #[test]
    fn test_preview_highlights_every_occurrence() {
        let bible = BibleData::from_value(&json!({
            "Psalms": {"1": {"1": "Praise the LORD, praise his name"}}
        }))
        .unwrap();
        let results = search(&bible, "praise", SearchFilter::All);
        assert_eq!(
            results[0].preview,
            "**Praise** the LORD, **praise** his name"
        );
    }

    #[test]
    fn test_long_preview_truncated_with_ellipsis() {
        let long_text = format!("God {}", "word ".repeat(40));
        let bible = BibleData::from_value(&json!({
            "Genesis": {"1": {"1": long_text}}
        }))
        .unwrap();
        let results = search(&bible, "god", SearchFilter::All);
        let preview = &results[0].preview;
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_LIMIT + 3);
    }

    #[test]
    fn test_result_cap() {
        let mut verses = Map::new();
        for v in 1..=150 {
            verses.insert(v.to_string(), Value::String("the word of God".into()));
        }
        let mut chapter = Map::new();
        chapter.insert("1".to_string(), Value::Object(verses));
        let mut root = Map::new();
        root.insert("Psalms".to_string(), Value::Object(chapter));

        let bible = BibleData::from_value(&Value::Object(root)).unwrap();
        let results = search(&bible, "god", SearchFilter::All);
        assert_eq!(results.len(), MAX_RESULTS);
        // First 100 matches in verse order
        assert_eq!(results[0].verse, 1);
        assert_eq!(results[99].verse, 100);
    }

    #[test]
    fn test_testament_filter_with_matthew_boundary() {
        let bible = sample();

        let ot = search(&bible, "the", SearchFilter::OldTestament);
        assert!(!ot.is_empty());
        assert!(ot.iter().all(|r| r.book == "Genesis" || r.book == "Malachi"));

        let nt = search(&bible, "the", SearchFilter::NewTestament);
        assert!(!nt.is_empty());
        assert!(nt
            .iter()
            .all(|r| r.book == "Matthew" || r.book == "Revelation"));
    }

    #[test]
    fn test_partition_falls_back_to_75_percent() {
        let books: Vec<String> = ["Alpha", "Beta", "Gamma", "Delta"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // No "matthew": floor(4 * 0.75) = 3 books are Old Testament
        assert_eq!(old_testament_len(&books), 3);

        let with_matthew: Vec<String> = ["Genesis", "Matthew", "Mark"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(old_testament_len(&with_matthew), 1);
    }

    #[test]
    fn test_regex_metacharacters_in_query_are_literal() {
        let bible = BibleData::from_value(&json!({
            "Notes": {"1": {"1": "what (then) shall we say"}}
        }))
        .unwrap();
        let results = search(&bible, "(then)", SearchFilter::All);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].preview, "what **(then)** shall we say");
    }
}
