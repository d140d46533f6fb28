use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, FocusPane, InputMode, Screen};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => {
            app.clear_status();
            handle_key(app, key);
        }
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.poll_tasks().await;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Works everywhere, including while editing
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Popups swallow input while open
    if app.show_translation_picker {
        handle_translation_picker(app, key);
        return;
    }
    if app.definition.is_some() {
        handle_definition_popup(app, key);
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_editing_mode(app, key);
        return;
    }

    // Screen switching
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('1') => {
            app.screen = Screen::Read;
            return;
        }
        KeyCode::Char('2') => {
            app.screen = Screen::Search;
            return;
        }
        KeyCode::Char('3') => {
            app.screen = Screen::Bookmarks;
            return;
        }
        KeyCode::Char('t') => {
            app.open_translation_picker();
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::Read => handle_read_normal(app, key),
        Screen::Search => handle_search_normal(app, key),
        Screen::Bookmarks => handle_bookmarks_normal(app, key),
    }
}

fn handle_read_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.focus == FocusPane::Navigation {
                app.nav_down();
            } else {
                app.select_next_verse();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.focus == FocusPane::Navigation {
                app.nav_up();
            } else {
                app.select_previous_verse();
            }
        }
        KeyCode::Char('g') => {
            if app.focus == FocusPane::Content {
                app.select_first_verse();
            }
        }
        KeyCode::Char('G') => {
            if app.focus == FocusPane::Content {
                app.select_last_verse();
            }
        }

        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if app.focus == FocusPane::Navigation {
                app.nav_enter();
            }
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
            if app.focus == FocusPane::Content {
                app.focus = FocusPane::Navigation;
            } else {
                app.nav_back();
            }
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                FocusPane::Navigation => FocusPane::Content,
                FocusPane::Content => FocusPane::Navigation,
            };
        }

        // Chapter navigation crosses book boundaries
        KeyCode::Char(']') | KeyCode::Char('n') => app.go_next_chapter(),
        KeyCode::Char('[') | KeyCode::Char('p') => app.go_previous_chapter(),

        KeyCode::Char('b') => {
            if app.focus == FocusPane::Content {
                app.toggle_bookmark_on_selected_verse();
            }
        }
        KeyCode::Char('d') => {
            if app.focus == FocusPane::Content {
                app.request_definition();
            }
        }
        _ => {}
    }
}

fn handle_search_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('/') | KeyCode::Char('i') => app.input_mode = InputMode::Editing,
        KeyCode::Char('f') => app.cycle_search_filter(),
        KeyCode::Char('j') | KeyCode::Down => app.search_down(),
        KeyCode::Char('k') | KeyCode::Up => app.search_up(),
        KeyCode::Enter => app.open_selected_search_result(),
        KeyCode::Char('x') => app.clear_search(),
        _ => {}
    }
}

fn handle_bookmarks_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.bookmark_down(),
        KeyCode::Char('k') | KeyCode::Up => app.bookmark_up(),
        KeyCode::Char('x') | KeyCode::Char('d') => app.delete_selected_bookmark(),
        KeyCode::Enter => app.open_selected_bookmark(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}

fn handle_translation_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.translation_picker_down(),
        KeyCode::Char('k') | KeyCode::Up => app.translation_picker_up(),
        KeyCode::Enter => app.confirm_translation_pick(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('t') => {
            app.show_translation_picker = false;
        }
        _ => {}
    }
}

fn handle_definition_popup(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char('q') => {
            app.close_definition();
        }
        _ => {}
    }
}
