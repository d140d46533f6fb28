use anyhow::Result;
use ratatui::widgets::ListState;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::bible::{BibleData, Translation};
use crate::bookmarks::BookmarkStore;
use crate::config::Config;
use crate::dictionary::{DictionaryClient, DictionaryEntry};
use crate::navigation::{self, Position};
use crate::search::{self, SearchFilter, SearchResult};
use crate::store::TranslationStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Read,
    Search,
    Bookmarks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLevel {
    Book,
    Chapter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Navigation,
    Content,
}

/// Word-definition popup: `entry`/`error` empty while the lookup is running.
pub struct DefinitionPopup {
    pub word: String,
    pub entry: Option<DictionaryEntry>,
    pub error: Option<String>,
}

impl DefinitionPopup {
    pub fn is_loading(&self) -> bool {
        self.entry.is_none() && self.error.is_none()
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Reading position
    pub position: Position,
    pub verse_state: ListState,

    // Navigation pane
    pub nav_level: NavLevel,
    pub book_state: ListState,
    pub chapter_state: ListState,

    // Search state
    pub search_input: String,
    pub search_filter: SearchFilter,
    pub search_results: Vec<SearchResult>,
    pub search_state: ListState,

    // Bookmarks
    pub bookmarks: BookmarkStore,
    pub bookmark_state: ListState,

    // Translation state
    pub store: Arc<Mutex<TranslationStore>>,
    pub translation: Arc<Translation>,
    pub available_translations: Vec<String>,
    pub show_translation_picker: bool,
    pub translation_picker_state: ListState,
    pub translation_task: Option<JoinHandle<Result<Arc<Translation>>>>,
    pub loading_translation: bool,

    // Dictionary state
    pub dictionary: Arc<DictionaryClient>,
    pub definition: Option<DefinitionPopup>,
    pub definition_task: Option<JoinHandle<Result<DictionaryEntry>>>,

    // Transient status line, cleared on the next keypress
    pub status: Option<String>,

    // Animation state (loading spinner)
    pub animation_frame: u8,
}

fn initial_position(bible: &BibleData) -> Position {
    if bible.contains_book("Genesis") {
        return Position::new("Genesis", 1);
    }
    match bible.books().first() {
        Some(book) => Position::new(book.clone(), 1),
        None => Position::new("Genesis", 1),
    }
}

impl App {
    pub async fn new(
        store: Arc<Mutex<TranslationStore>>,
        dictionary: Arc<DictionaryClient>,
        config: &Config,
    ) -> Result<Self> {
        let (available_translations, translation) = {
            let mut guard = store.lock().await;
            let available = guard.available_translations().await?;
            let translation = guard
                .default_translation(config.default_translation.as_deref())
                .await?;
            (available, translation)
        };

        let bookmarks = BookmarkStore::load()?;
        let position = initial_position(&translation.data);

        let mut app = Self {
            should_quit: false,
            screen: Screen::Read,
            input_mode: InputMode::Normal,
            focus: FocusPane::Navigation,

            position: position.clone(),
            verse_state: ListState::default(),

            nav_level: NavLevel::Book,
            book_state: ListState::default(),
            chapter_state: ListState::default(),

            search_input: String::new(),
            search_filter: SearchFilter::All,
            search_results: Vec::new(),
            search_state: ListState::default(),

            bookmarks,
            bookmark_state: ListState::default(),

            store,
            translation,
            available_translations,
            show_translation_picker: false,
            translation_picker_state: ListState::default(),
            translation_task: None,
            loading_translation: false,

            dictionary,
            definition: None,
            definition_task: None,

            status: None,
            animation_frame: 0,
        };

        app.set_position(position);
        Ok(app)
    }

    pub fn bible(&self) -> &BibleData {
        &self.translation.data
    }

    pub fn current_verses(&self) -> &[(u32, String)] {
        self.bible().verses(&self.position.book, self.position.chapter)
    }

    pub fn selected_verse(&self) -> Option<&(u32, String)> {
        let idx = self.verse_state.selected()?;
        self.current_verses().get(idx)
    }

    /// Move to a new reading position and resync every dependent list state.
    pub fn set_position(&mut self, pos: Position) {
        self.position = pos;

        let book_idx = self.bible().book_index(&self.position.book);
        self.book_state.select(book_idx);

        let chapter_idx = self
            .bible()
            .chapters(&self.position.book)
            .iter()
            .position(|&c| c == self.position.chapter);
        self.chapter_state.select(chapter_idx);

        if self.current_verses().is_empty() {
            self.verse_state.select(None);
        } else {
            self.verse_state.select(Some(0));
        }
    }

    // ---- Chapter navigation -------------------------------------------------

    pub fn go_next_chapter(&mut self) {
        if let Some(pos) =
            navigation::next_chapter(self.bible(), &self.position.book, self.position.chapter)
        {
            self.set_position(pos);
        }
    }

    pub fn go_previous_chapter(&mut self) {
        if let Some(pos) =
            navigation::previous_chapter(self.bible(), &self.position.book, self.position.chapter)
        {
            self.set_position(pos);
        }
    }

    pub fn can_go_next(&self) -> bool {
        navigation::can_navigate_next(self.bible(), &self.position.book, self.position.chapter)
    }

    pub fn can_go_previous(&self) -> bool {
        navigation::can_navigate_previous(self.bible(), &self.position.book, self.position.chapter)
    }

    // ---- Book/chapter picker pane -------------------------------------------

    pub fn nav_len(&self) -> usize {
        match self.nav_level {
            NavLevel::Book => self.bible().books().len(),
            NavLevel::Chapter => self.bible().chapters(&self.position.book).len(),
        }
    }

    fn nav_state_mut(&mut self) -> &mut ListState {
        match self.nav_level {
            NavLevel::Book => &mut self.book_state,
            NavLevel::Chapter => &mut self.chapter_state,
        }
    }

    pub fn nav_down(&mut self) {
        let len = self.nav_len();
        move_selection(self.nav_state_mut(), len, 1);
    }

    pub fn nav_up(&mut self) {
        let len = self.nav_len();
        move_selection(self.nav_state_mut(), len, -1);
    }

    pub fn nav_enter(&mut self) {
        match self.nav_level {
            NavLevel::Book => {
                if let Some(idx) = self.book_state.selected() {
                    if let Some(book) = self.bible().books().get(idx).cloned() {
                        // Selecting a book resets the position to its first chapter
                        self.set_position(Position::new(book, 1));
                        self.nav_level = NavLevel::Chapter;
                        self.chapter_state.select(Some(0));
                    }
                }
            }
            NavLevel::Chapter => {
                if let Some(idx) = self.chapter_state.selected() {
                    if let Some(&chapter) = self.bible().chapters(&self.position.book).get(idx) {
                        let book = self.position.book.clone();
                        self.set_position(Position::new(book, chapter));
                        self.focus = FocusPane::Content;
                    }
                }
            }
        }
    }

    pub fn nav_back(&mut self) {
        if self.nav_level == NavLevel::Chapter {
            self.nav_level = NavLevel::Book;
        }
    }

    pub fn select_next_verse(&mut self) {
        let len = self.current_verses().len();
        move_selection(&mut self.verse_state, len, 1);
    }

    pub fn select_previous_verse(&mut self) {
        let len = self.current_verses().len();
        move_selection(&mut self.verse_state, len, -1);
    }

    pub fn select_first_verse(&mut self) {
        if !self.current_verses().is_empty() {
            self.verse_state.select(Some(0));
        }
    }

    pub fn select_last_verse(&mut self) {
        let len = self.current_verses().len();
        if len > 0 {
            self.verse_state.select(Some(len - 1));
        }
    }

    // ---- Search -------------------------------------------------------------

    pub fn run_search(&mut self) {
        self.search_results = search::search(self.bible(), &self.search_input, self.search_filter);
        if self.search_results.is_empty() {
            self.search_state.select(None);
        } else {
            self.search_state.select(Some(0));
        }
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
        self.run_search();
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
        self.run_search();
    }

    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.search_results.clear();
        self.search_state.select(None);
    }

    pub fn cycle_search_filter(&mut self) {
        self.search_filter = self.search_filter.next();
        self.run_search();
    }

    pub fn search_down(&mut self) {
        let len = self.search_results.len();
        move_selection(&mut self.search_state, len, 1);
    }

    pub fn search_up(&mut self) {
        let len = self.search_results.len();
        move_selection(&mut self.search_state, len, -1);
    }

    /// Jump from the selected search result to its verse on the Read screen.
    pub fn open_selected_search_result(&mut self) {
        let Some(idx) = self.search_state.selected() else {
            return;
        };
        let Some(result) = self.search_results.get(idx) else {
            return;
        };
        let (book, chapter, verse) = (result.book.clone(), result.chapter, result.verse);
        self.jump_to_verse(&book, chapter, verse);
    }

    pub fn jump_to_verse(&mut self, book: &str, chapter: u32, verse: u32) {
        if !self.bible().contains_book(book) {
            self.set_status(format!("{} is not in this translation", book));
            return;
        }
        self.set_position(Position::new(book, chapter));
        let verse_idx = self
            .current_verses()
            .iter()
            .position(|(num, _)| *num == verse);
        if verse_idx.is_some() {
            self.verse_state.select(verse_idx);
        }
        self.screen = Screen::Read;
        self.focus = FocusPane::Content;
    }

    // ---- Bookmarks ----------------------------------------------------------

    pub fn toggle_bookmark_on_selected_verse(&mut self) {
        let Some((verse, text)) = self.selected_verse().cloned() else {
            return;
        };
        let (book, chapter) = (self.position.book.clone(), self.position.chapter);
        match self.bookmarks.toggle(&book, chapter, verse, &text) {
            Ok(true) => self.set_status(format!("Bookmarked {} {}:{}", book, chapter, verse)),
            Ok(false) => self.set_status(format!("Removed bookmark {} {}:{}", book, chapter, verse)),
            Err(e) => {
                log::warn!("Bookmark save failed: {}", e);
                self.set_status(format!("Could not save bookmark: {}", e));
            }
        }
    }

    pub fn bookmark_down(&mut self) {
        let len = self.bookmarks.list().len();
        move_selection(&mut self.bookmark_state, len, 1);
    }

    pub fn bookmark_up(&mut self) {
        let len = self.bookmarks.list().len();
        move_selection(&mut self.bookmark_state, len, -1);
    }

    pub fn delete_selected_bookmark(&mut self) {
        let Some(idx) = self.bookmark_state.selected() else {
            return;
        };
        let Some(id) = self.bookmarks.list().get(idx).map(|b| b.id.clone()) else {
            return;
        };
        if let Err(e) = self.bookmarks.remove(&id) {
            log::warn!("Bookmark delete failed: {}", e);
            return;
        }
        let len = self.bookmarks.list().len();
        if len == 0 {
            self.bookmark_state.select(None);
        } else if idx >= len {
            self.bookmark_state.select(Some(len - 1));
        }
    }

    pub fn open_selected_bookmark(&mut self) {
        let Some(idx) = self.bookmark_state.selected() else {
            return;
        };
        let Some(bookmark) = self.bookmarks.list().get(idx) else {
            return;
        };
        let (book, chapter, verse) = (bookmark.book.clone(), bookmark.chapter, bookmark.verse);
        self.jump_to_verse(&book, chapter, verse);
    }

    // ---- Translation switching ----------------------------------------------

    pub fn open_translation_picker(&mut self) {
        let current = self
            .available_translations
            .iter()
            .position(|name| name.eq_ignore_ascii_case(&self.translation.id));
        self.translation_picker_state.select(current.or(Some(0)));
        self.show_translation_picker = true;
    }

    pub fn translation_picker_down(&mut self) {
        let len = self.available_translations.len();
        move_selection(&mut self.translation_picker_state, len, 1);
    }

    pub fn translation_picker_up(&mut self) {
        let len = self.available_translations.len();
        move_selection(&mut self.translation_picker_state, len, -1);
    }

    /// Kick off a background fetch of the chosen translation; the result is
    /// picked up in `poll_tasks`.
    pub fn confirm_translation_pick(&mut self) {
        self.show_translation_picker = false;
        let Some(idx) = self.translation_picker_state.selected() else {
            return;
        };
        let Some(name) = self.available_translations.get(idx).cloned() else {
            return;
        };
        if name.eq_ignore_ascii_case(&self.translation.id) {
            return;
        }

        let store = Arc::clone(&self.store);
        self.loading_translation = true;
        self.translation_task = Some(tokio::spawn(async move {
            store.lock().await.get(&name).await
        }));
    }

    fn apply_translation(&mut self, translation: Arc<Translation>) {
        let name = translation.name.clone();
        self.translation = translation;

        // The old position may not exist in the new translation
        let pos = if self.bible().contains_book(&self.position.book)
            && self.position.chapter <= self.bible().max_chapter(&self.position.book).unwrap_or(0)
        {
            self.position.clone()
        } else {
            initial_position(self.bible())
        };
        self.set_position(pos);

        // Search results belong to the old text
        self.run_search();

        if let Err(e) = Config::save_default_translation(&name) {
            log::warn!("Could not persist translation preference: {}", e);
        }
        self.set_status(format!("Loaded {}", name));
    }

    // ---- Word definitions ---------------------------------------------------

    /// Look up the first word of the selected verse in a background task.
    pub fn request_definition(&mut self) {
        let Some((_, text)) = self.selected_verse() else {
            return;
        };
        let Some(word) = text.split_whitespace().next() else {
            return;
        };
        let word = word.to_string();

        self.definition = Some(DefinitionPopup {
            word: word.clone(),
            entry: None,
            error: None,
        });

        let dictionary = Arc::clone(&self.dictionary);
        self.definition_task = Some(tokio::spawn(async move {
            dictionary.define(&word).await
        }));
    }

    pub fn close_definition(&mut self) {
        self.definition = None;
        if let Some(task) = self.definition_task.take() {
            task.abort();
        }
    }

    // ---- Background task polling (driven by Tick events) --------------------

    pub async fn poll_tasks(&mut self) {
        if self
            .translation_task
            .as_ref()
            .map(|t| t.is_finished())
            .unwrap_or(false)
        {
            if let Some(task) = self.translation_task.take() {
                self.loading_translation = false;
                match task.await {
                    Ok(Ok(translation)) => self.apply_translation(translation),
                    Ok(Err(e)) => {
                        log::warn!("Translation fetch failed: {}", e);
                        self.set_status(format!("Failed to load translation: {}", e));
                    }
                    Err(e) => log::warn!("Translation task panicked: {}", e),
                }
            }
        }

        if self
            .definition_task
            .as_ref()
            .map(|t| t.is_finished())
            .unwrap_or(false)
        {
            if let Some(task) = self.definition_task.take() {
                let outcome = task.await;
                if let Some(popup) = self.definition.as_mut() {
                    match outcome {
                        Ok(Ok(entry)) => popup.entry = Some(entry),
                        Ok(Err(e)) => popup.error = Some(e.to_string()),
                        Err(e) => popup.error = Some(format!("Lookup failed: {}", e)),
                    }
                }
            }
        }
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 3;
    }

    pub fn set_status(&mut self, message: String) {
        self.status = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Shared list-selection movement: clamps at the ends, selects the first
/// entry when nothing is selected yet.
fn move_selection(state: &mut ListState, len: usize, delta: i32) {
    if len == 0 {
        state.select(None);
        return;
    }
    let next = match state.selected() {
        Some(idx) => {
            let idx = idx as i32 + delta;
            idx.clamp(0, len as i32 - 1) as usize
        }
        None => 0,
    };
    state.select(Some(next));
}
