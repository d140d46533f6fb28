use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const EXPORT_APP_NAME: &str = "VerseLens";
const EXPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn reference(&self) -> String {
        format!("{} {}:{}", self.book, self.chapter, self.verse)
    }
}

#[derive(Serialize, Deserialize)]
struct ExportMetadata {
    exported_at: DateTime<Utc>,
    version: String,
    bookmark_count: usize,
}

/// Backup envelope; `metadata` is optional so older exports still import.
#[derive(Serialize, Deserialize)]
struct ExportEnvelope {
    app: String,
    bookmarks: Vec<Bookmark>,
    metadata: Option<ExportMetadata>,
}

/// Bookmarks persisted as JSON in the config directory. Every mutation saves
/// immediately; there is no separate flush step.
pub struct BookmarkStore {
    path: PathBuf,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Self::load_from(config_dir.join("verselens").join("bookmarks.json"))
    }

    pub fn load_from(path: PathBuf) -> Result<Self> {
        let bookmarks = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };

        Ok(Self { path, bookmarks })
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.bookmarks)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn list(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn add(&mut self, book: &str, chapter: u32, verse: u32, text: &str) -> Result<()> {
        let now = Utc::now();
        let bookmark = Bookmark {
            id: format!("bookmark-{}-{}", now.timestamp_millis(), self.bookmarks.len()),
            book: book.to_string(),
            chapter,
            verse,
            text: text.to_string(),
            note: String::new(),
            created_at: now,
        };
        self.bookmarks.push(bookmark);
        self.save()
    }

    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.id != id);
        let removed = self.bookmarks.len() != before;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn update_note(&mut self, id: &str, note: &str) -> Result<bool> {
        match self.bookmarks.iter_mut().find(|b| b.id == id) {
            Some(bookmark) => {
                bookmark.note = note.to_string();
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn is_bookmarked(&self, book: &str, chapter: u32, verse: u32) -> bool {
        self.find(book, chapter, verse).is_some()
    }

    pub fn find(&self, book: &str, chapter: u32, verse: u32) -> Option<&Bookmark> {
        self.bookmarks
            .iter()
            .find(|b| b.book == book && b.chapter == chapter && b.verse == verse)
    }

    /// Toggle: removes the bookmark if present, otherwise adds one.
    /// Returns true when a bookmark was added.
    pub fn toggle(&mut self, book: &str, chapter: u32, verse: u32, text: &str) -> Result<bool> {
        if let Some(existing) = self.find(book, chapter, verse) {
            let id = existing.id.clone();
            self.remove(&id)?;
            Ok(false)
        } else {
            self.add(book, chapter, verse, text)?;
            Ok(true)
        }
    }

    pub fn export_json(&self) -> Result<String> {
        let envelope = ExportEnvelope {
            app: EXPORT_APP_NAME.to_string(),
            bookmarks: self.bookmarks.clone(),
            metadata: Some(ExportMetadata {
                exported_at: Utc::now(),
                version: EXPORT_VERSION.to_string(),
                bookmark_count: self.bookmarks.len(),
            }),
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    pub fn export_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.export_json()?)?;
        Ok(())
    }

    /// Replace the current bookmarks with the ones in the backup.
    /// Returns how many were imported.
    pub fn import_json(&mut self, data: &str) -> Result<usize> {
        let envelope: ExportEnvelope =
            serde_json::from_str(data).map_err(|e| anyhow!("Invalid backup file: {}", e))?;
        self.bookmarks = envelope.bookmarks;
        self.save()?;
        Ok(self.bookmarks.len())
    }

    pub fn import_from_file(&mut self, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path)?;
        self.import_json(&content)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.bookmarks.clear();
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> BookmarkStore {
        BookmarkStore::load_from(dir.join("bookmarks.json")).unwrap()
    }

    #[test]
    fn test_add_and_find() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        store.add("Genesis", 1, 1, "In the beginning").unwrap();
        assert!(store.is_bookmarked("Genesis", 1, 1));
        assert!(!store.is_bookmarked("Genesis", 1, 2));
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].reference(), "Genesis 1:1");
    }

    #[test]
    fn test_persists_across_loads() {
        let dir = tempdir().unwrap();
        {
            let mut store = store_in(dir.path());
            store.add("John", 3, 16, "For God so loved the world").unwrap();
        }
        let store = store_in(dir.path());
        assert!(store.is_bookmarked("John", 3, 16));
    }

    #[test]
    fn test_toggle() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        assert!(store.toggle("Psalms", 23, 1, "The LORD is my shepherd").unwrap());
        assert!(store.is_bookmarked("Psalms", 23, 1));
        assert!(!store.toggle("Psalms", 23, 1, "The LORD is my shepherd").unwrap());
        assert!(!store.is_bookmarked("Psalms", 23, 1));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        assert!(!store.remove("bookmark-nope").unwrap());
    }

    #[test]
    fn test_update_note() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.add("Ruth", 1, 16, "Whither thou goest").unwrap();
        let id = store.list()[0].id.clone();

        assert!(store.update_note(&id, "wedding reading").unwrap());
        assert_eq!(store.list()[0].note, "wedding reading");
        assert!(!store.update_note("missing", "x").unwrap());
    }

    #[test]
    fn test_export_import_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.add("Genesis", 1, 1, "In the beginning").unwrap();
        store.add("Exodus", 20, 3, "No other gods").unwrap();

        let backup = store.export_json().unwrap();

        let other_dir = tempdir().unwrap();
        let mut restored = store_in(other_dir.path());
        let count = restored.import_json(&backup).unwrap();

        assert_eq!(count, 2);
        assert!(restored.is_bookmarked("Genesis", 1, 1));
        assert!(restored.is_bookmarked("Exodus", 20, 3));
    }

    #[test]
    fn test_import_rejects_garbage() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        assert!(store.import_json("not json").is_err());
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.add("Genesis", 1, 1, "In the beginning").unwrap();
        store.clear().unwrap();
        assert!(store.list().is_empty());
    }
}
