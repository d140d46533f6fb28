use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use crate::app::{App, FocusPane, InputMode, NavLevel, Screen};
use crate::search::{SearchFilter, MIN_QUERY_LEN};

const SPINNER: [&str; 3] = [".  ", ".. ", "..."];

/// Split preview text on `**` delimiters and style the enclosed matches.
/// Mirrors how the search engine marks hits; odd segments are the matches.
fn highlight_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    for (i, part) in text.split("**").enumerate() {
        if part.is_empty() {
            continue;
        }
        if i % 2 == 1 {
            spans.push(Span::styled(
                part.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(part.to_string()));
        }
    }
    Line::from(spans)
}

/// Wrap verse text to the pane width; List items don't wrap on their own.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Read => render_read_screen(app, frame, body_area),
        Screen::Search => render_search_screen(app, frame, body_area),
        Screen::Bookmarks => render_bookmarks_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);

    if app.show_translation_picker {
        render_translation_picker(app, frame, area);
    } else if app.definition.is_some() {
        render_definition_popup(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let loading = if app.loading_translation {
        format!(" loading{}", SPINNER[app.animation_frame as usize % SPINNER.len()])
    } else {
        String::new()
    };

    let title = Line::from(vec![
        Span::styled(" VerseLens ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("[{}] ", app.translation.name),
            Style::default().fg(Color::Green),
        ),
        Span::raw(format!(
            "{} {}",
            app.position.book, app.position.chapter
        )),
        Span::styled(loading, Style::default().fg(Color::Yellow)),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(status) = &app.status {
        let line = Line::from(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints: Vec<Span> = vec![
        Span::styled(" 1/2/3 ", key_style),
        Span::styled(" read/search/marks ", label_style),
        Span::styled(" t ", key_style),
        Span::styled(" translation ", label_style),
    ];

    match (app.screen, app.input_mode) {
        (Screen::Read, _) => {
            if app.can_go_previous() {
                hints.push(Span::styled(" [ ", key_style));
                hints.push(Span::styled(" prev ch ", label_style));
            }
            if app.can_go_next() {
                hints.push(Span::styled(" ] ", key_style));
                hints.push(Span::styled(" next ch ", label_style));
            }
            hints.extend([
                Span::styled(" b ", key_style),
                Span::styled(" bookmark ", label_style),
                Span::styled(" d ", key_style),
                Span::styled(" define ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ]);
        }
        (Screen::Search, InputMode::Editing) => {
            hints.extend([
                Span::styled(" Esc ", key_style),
                Span::styled(" done ", label_style),
            ]);
        }
        (Screen::Search, InputMode::Normal) => {
            hints.extend([
                Span::styled(" / ", key_style),
                Span::styled(" edit query ", label_style),
                Span::styled(" f ", key_style),
                Span::styled(" filter ", label_style),
                Span::styled(" Enter ", key_style),
                Span::styled(" open ", label_style),
            ]);
        }
        (Screen::Bookmarks, _) => {
            hints.extend([
                Span::styled(" x ", key_style),
                Span::styled(" delete ", label_style),
                Span::styled(" Enter ", key_style),
                Span::styled(" open ", label_style),
            ]);
        }
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_read_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [nav_area, content_area] =
        Layout::horizontal([Constraint::Length(26), Constraint::Min(0)]).areas(area);

    render_nav_pane(app, frame, nav_area);
    render_content_pane(app, frame, content_area);
}

fn render_nav_pane(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Navigation;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let (title, items): (String, Vec<ListItem>) = match app.nav_level {
        NavLevel::Book => (
            " Books ".to_string(),
            app.bible()
                .books()
                .iter()
                .map(|b| ListItem::new(b.clone()))
                .collect(),
        ),
        NavLevel::Chapter => (
            format!(" {} ", app.position.book),
            app.bible()
                .chapters(&app.position.book)
                .iter()
                .map(|c| ListItem::new(format!("Chapter {}", c)))
                .collect(),
        ),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border_style))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    let state = match app.nav_level {
        NavLevel::Book => &mut app.book_state,
        NavLevel::Chapter => &mut app.chapter_state,
    };
    frame.render_stateful_widget(list, area, state);
}

fn render_content_pane(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Content;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = format!(" {} {} ", app.position.book, app.position.chapter);
    let text_width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = app
        .current_verses()
        .iter()
        .map(|(num, text)| {
            let bookmarked =
                app.bookmarks
                    .is_bookmarked(&app.position.book, app.position.chapter, *num);
            let marker = if bookmarked { "*" } else { " " };

            let mut lines = Vec::new();
            for (i, wrapped) in wrap_text(text, text_width).into_iter().enumerate() {
                if i == 0 {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("{}{:>3} ", marker, num),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::raw(wrapped),
                    ]));
                } else {
                    lines.push(Line::from(vec![Span::raw("     "), Span::raw(wrapped)]));
                }
            }
            ListItem::new(Text::from(lines))
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border_style))
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)));

    frame.render_stateful_widget(list, area, &mut app.verse_state);

    if empty {
        let inner = area.inner(ratatui::layout::Margin {
            horizontal: 2,
            vertical: 2,
        });
        let msg = Paragraph::new("No verses in this chapter")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(msg, inner);
    }
}

fn render_search_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [input_area, filter_area, body_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let input_style = if app.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let input = Paragraph::new(app.search_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search the Bible ")
            .border_style(input_style),
    );
    frame.render_widget(input, input_area);

    if app.input_mode == InputMode::Editing {
        frame.set_cursor_position((
            input_area.x + 1 + app.search_input.chars().count() as u16,
            input_area.y + 1,
        ));
    }

    let filters = [
        SearchFilter::All,
        SearchFilter::OldTestament,
        SearchFilter::NewTestament,
    ];
    let mut filter_spans: Vec<Span> = vec![Span::raw(" ")];
    for filter in filters {
        let style = if filter == app.search_filter {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        filter_spans.push(Span::styled(format!(" {} ", filter.label()), style));
        filter_spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(filter_spans)), filter_area);

    let trimmed_len = app.search_input.trim().chars().count();
    if app.search_results.is_empty() {
        let message = if trimmed_len >= MIN_QUERY_LEN {
            format!("No results found for \"{}\"", app.search_input.trim())
        } else {
            format!("Enter at least {} characters to search", MIN_QUERY_LEN)
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, body_area);
        return;
    }

    let title = format!(
        " {} result{} ",
        app.search_results.len(),
        if app.search_results.len() == 1 { "" } else { "s" }
    );

    let items: Vec<ListItem> = app
        .search_results
        .iter()
        .map(|result| {
            let reference = Line::from(Span::styled(
                result.reference(),
                Style::default().fg(Color::Cyan).bold(),
            ));
            ListItem::new(Text::from(vec![reference, highlight_line(&result.preview)]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, body_area, &mut app.search_state);
}

fn render_bookmarks_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    if app.bookmarks.list().is_empty() {
        let empty = Paragraph::new("No bookmarks yet. Press 'b' on a verse to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Bookmarks "));
        frame.render_widget(empty, area);
        return;
    }

    let text_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .bookmarks
        .list()
        .iter()
        .map(|bookmark| {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    bookmark.reference(),
                    Style::default().fg(Color::Cyan).bold(),
                ),
                Span::styled(
                    format!("  {}", bookmark.created_at.format("%Y-%m-%d")),
                    Style::default().fg(Color::DarkGray),
                ),
            ])];
            for wrapped in wrap_text(&bookmark.text, text_width) {
                lines.push(Line::from(Span::raw(wrapped)));
            }
            if !bookmark.note.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("note: {}", bookmark.note),
                    Style::default().fg(Color::Green),
                )));
            }
            ListItem::new(Text::from(lines))
        })
        .collect();

    let title = format!(" Bookmarks ({}) ", app.bookmarks.list().len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.bookmark_state);
}

fn render_translation_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(40, 60, area);
    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = app
        .available_translations
        .iter()
        .map(|name| {
            if name.eq_ignore_ascii_case(&app.translation.id) {
                ListItem::new(format!("{} (current)", name))
                    .style(Style::default().fg(Color::Green))
            } else {
                ListItem::new(name.clone())
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Translation ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup, &mut app.translation_picker_state);
}

fn render_definition_popup(app: &App, frame: &mut Frame, area: Rect) {
    let Some(popup) = &app.definition else {
        return;
    };
    let rect = centered_rect(60, 50, area);
    frame.render_widget(Clear, rect);

    let mut lines: Vec<Line> = Vec::new();

    if popup.is_loading() {
        lines.push(Line::from(Span::styled(
            format!(
                "Looking up \"{}\"{}",
                popup.word,
                SPINNER[app.animation_frame as usize % SPINNER.len()]
            ),
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &popup.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(entry) = &popup.entry {
        let phonetics: Vec<&str> = entry
            .pronunciation
            .phonetics
            .iter()
            .filter(|p| !p.text.is_empty())
            .map(|p| p.text.as_str())
            .collect();
        if !phonetics.is_empty() {
            lines.push(Line::from(Span::styled(
                phonetics.join("  "),
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::default());
        }
        if entry.definitions.wordnet.is_empty() {
            lines.push(Line::from("No definitions available."));
        }
        for (i, definition) in entry.definitions.wordnet.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}. ", i + 1),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(definition.clone()),
            ]));
        }
    }

    let title = format!(" {} ", app.definition.as_ref().map(|d| d.word.as_str()).unwrap_or(""));
    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(paragraph, rect);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, vertical, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, horizontal, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(vertical);
    horizontal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_line_styles_marked_segments() {
        let line = highlight_line("In the beginning **God** created");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "God");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_highlight_line_plain_text() {
        let line = highlight_line("no markers here");
        assert_eq!(line.spans.len(), 1);
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let lines = wrap_text("one two three four five", 9);
        assert!(lines.iter().all(|l| l.chars().count() <= 9));
        assert_eq!(lines.join(" "), "one two three four five");
    }

    #[test]
    fn test_wrap_text_empty() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_wrap_text_breaks_long_words() {
        let lines = wrap_text("Mahershalalhashbaz", 8);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 8));
    }

    #[test]
    fn test_wrap_text_zero_width_does_not_panic() {
        let lines = wrap_text("and God said", 0);
        assert!(!lines.is_empty());
    }
}
