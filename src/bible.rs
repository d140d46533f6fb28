use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::HashMap;

/// One loaded Bible translation: identifier, display name, and the full text.
#[derive(Debug, Clone)]
pub struct Translation {
    pub id: String,
    pub name: String,
    pub data: BibleData,
}

/// The complete text of one translation, book -> chapter -> verse.
///
/// Book iteration order is the canonical scriptural order as delivered by the
/// API; navigation and the testament partition both depend on it, so it is
/// kept explicitly alongside the lookup map.
#[derive(Debug, Clone, Default)]
pub struct BibleData {
    book_order: Vec<String>,
    books: HashMap<String, Book>,
}

#[derive(Debug, Clone)]
struct Book {
    chapter_order: Vec<u32>,
    chapters: HashMap<u32, Vec<(u32, String)>>,
}

impl BibleData {
    /// Build from the API's nested JSON object
    /// (`{"Genesis": {"1": {"1": "In the beginning..."}}}`).
    ///
    /// Chapter and verse keys arrive as stringified integers; they are parsed
    /// and sorted numerically. Book order is taken as-is from the JSON object.
    pub fn from_value(value: &Value) -> Result<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| anyhow!("Bible data is not a JSON object"))?;

        if root.is_empty() {
            return Err(anyhow!("Bible data contains no books"));
        }

        let mut book_order = Vec::with_capacity(root.len());
        let mut books = HashMap::with_capacity(root.len());

        for (book_name, book_value) in root {
            let chapters_obj = book_value
                .as_object()
                .ok_or_else(|| anyhow!("Book '{}' is not a JSON object", book_name))?;

            let mut chapter_order = Vec::with_capacity(chapters_obj.len());
            let mut chapters = HashMap::with_capacity(chapters_obj.len());

            for (chapter_key, chapter_value) in chapters_obj {
                let chapter_num: u32 = match chapter_key.parse() {
                    Ok(n) => n,
                    Err(_) => {
                        log::warn!(
                            "Skipping non-numeric chapter key '{}' in {}",
                            chapter_key,
                            book_name
                        );
                        continue;
                    }
                };

                let verses_obj = chapter_value.as_object().ok_or_else(|| {
                    anyhow!("{} chapter {} is not a JSON object", book_name, chapter_num)
                })?;

                let mut verses: Vec<(u32, String)> = verses_obj
                    .iter()
                    .filter_map(|(verse_key, text)| {
                        let verse_num: u32 = verse_key.parse().ok()?;
                        Some((verse_num, text.as_str().unwrap_or_default().to_string()))
                    })
                    .collect();
                verses.sort_by_key(|(num, _)| *num);

                chapter_order.push(chapter_num);
                chapters.insert(chapter_num, verses);
            }

            chapter_order.sort_unstable();

            book_order.push(book_name.clone());
            books.insert(
                book_name.clone(),
                Book {
                    chapter_order,
                    chapters,
                },
            );
        }

        Ok(Self { book_order, books })
    }

    /// Book names in canonical order.
    pub fn books(&self) -> &[String] {
        &self.book_order
    }

    pub fn contains_book(&self, book: &str) -> bool {
        self.books.contains_key(book)
    }

    pub fn book_index(&self, book: &str) -> Option<usize> {
        self.book_order.iter().position(|b| b == book)
    }

    /// Chapter numbers of a book, sorted ascending. Empty if the book is unknown.
    pub fn chapters(&self, book: &str) -> &[u32] {
        self.books
            .get(book)
            .map(|b| b.chapter_order.as_slice())
            .unwrap_or(&[])
    }

    /// Highest chapter number of a book.
    pub fn max_chapter(&self, book: &str) -> Option<u32> {
        self.books
            .get(book)
            .and_then(|b| b.chapter_order.iter().copied().max())
    }

    /// Verses of a chapter as (verse number, text), sorted ascending.
    /// Empty if the book or chapter is missing.
    pub fn verses(&self, book: &str, chapter: u32) -> &[(u32, String)] {
        self.books
            .get(book)
            .and_then(|b| b.chapters.get(&chapter))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn verse_text(&self, book: &str, chapter: u32, verse: u32) -> Option<&str> {
        self.verses(book, chapter)
            .iter()
            .find(|(num, _)| *num == verse)
            .map(|(_, text)| text.as_str())
    }

    pub fn verse_count(&self) -> usize {
        self.books
            .values()
            .flat_map(|b| b.chapters.values())
            .map(|verses| verses.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.book_order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> BibleData {
        BibleData::from_value(&json!({
            "Genesis": {
                "2": {"1": "Thus the heavens and the earth were finished"},
                "1": {
                    "1": "In the beginning God created the heavens",
                    "2": "And the earth was without form"
                }
            },
            "Exodus": {
                "1": {"1": "Now these are the names"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_book_order_preserved() {
        let bible = sample();
        assert_eq!(bible.books(), &["Genesis", "Exodus"]);
        assert_eq!(bible.book_index("Exodus"), Some(1));
    }

    #[test]
    fn test_chapters_sorted() {
        let bible = sample();
        assert_eq!(bible.chapters("Genesis"), &[1, 2]);
        assert_eq!(bible.max_chapter("Genesis"), Some(2));
        assert_eq!(bible.max_chapter("Leviticus"), None);
    }

    #[test]
    fn test_verses_sorted_and_missing_empty() {
        let bible = sample();
        let verses = bible.verses("Genesis", 1);
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].0, 1);
        assert!(bible.verses("Genesis", 9).is_empty());
        assert!(bible.verses("Numbers", 1).is_empty());
    }

    #[test]
    fn test_verse_text_lookup() {
        let bible = sample();
        assert_eq!(
            bible.verse_text("Exodus", 1, 1),
            Some("Now these are the names")
        );
        assert_eq!(bible.verse_text("Exodus", 1, 2), None);
    }

    #[test]
    fn test_verse_count() {
        assert_eq!(sample().verse_count(), 4);
    }

    #[test]
    fn test_rejects_empty_and_non_object() {
        assert!(BibleData::from_value(&json!({})).is_err());
        assert!(BibleData::from_value(&json!([1, 2])).is_err());
    }
}
