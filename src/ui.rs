use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use crate::app::App;
use crate::selector::{ListItem, SelectionMode, Selector};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, navbar, body, footer
    let [header_area, navbar_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_navbar(app, frame, navbar_area);
    render_columns(app, frame, body_area);
    render_footer(app, frame, footer_area);

    if app.panel.open {
        render_picker(app, frame, area);
    } else {
        // Stale rows must not keep swallowing presses.
        app.filtered_item_areas.clear();
        app.book_shortcut_areas.clear();
        app.chapter_shortcut_areas.clear();
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Bible Reader ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

/// One tab per open passage plus a trailing add button, the active tab
/// highlighted. Tab rectangles are recorded for mouse navigation.
fn render_navbar(app: &mut App, frame: &mut Frame, area: Rect) {
    app.tab_areas.clear();
    app.add_tab_area = None;

    let labels: Vec<(String, String)> = app
        .passages
        .iter()
        .enumerate()
        .map(|(index, passage)| (app.tab_title(index), passage.version_id.to_uppercase()))
        .collect();

    let mut x = area.x;
    for (index, (title, version)) in labels.iter().enumerate() {
        let width = title.chars().count().max(version.chars().count()) as u16 + 2;
        if x + width > area.x + area.width {
            break;
        }
        let tab = Rect::new(x, area.y, width, area.height.min(2));
        let style = if index == app.active {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        let lines = vec![
            Line::from(format!(" {} ", title)),
            Line::from(Span::styled(
                format!(" {} ", version),
                style.add_modifier(Modifier::DIM),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).style(style), tab);
        app.tab_areas.push(tab);
        x += width + 1;
    }

    if x + 3 <= area.x + area.width {
        let add = Rect::new(x, area.y, 3, area.height.min(2));
        frame.render_widget(
            Paragraph::new(" + ").style(Style::default().fg(Color::Green).bold()),
            add,
        );
        app.add_tab_area = Some(add);
    }
}

/// Every passage as a side-by-side column, with a trailing "+" column that
/// opens a new passage.
fn render_columns(app: &mut App, frame: &mut Frame, area: Rect) {
    app.column_areas.clear();
    app.column_header_areas.clear();
    app.add_column_area = None;
    app.panel.handle_area = None;

    let mut constraints: Vec<Constraint> =
        (0..app.passages.len()).map(|_| Constraint::Min(20)).collect();
    constraints.push(Constraint::Length(3));
    let chunks = Layout::horizontal(constraints).split(area);

    for index in 0..app.passages.len() {
        let column = chunks[index];
        app.column_areas.push(column);
        render_passage(app, frame, column, index);
    }

    let add = chunks[app.passages.len()];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(add);
    frame.render_widget(block, add);
    if inner.height > 0 {
        frame.render_widget(
            Paragraph::new("+")
                .centered()
                .style(Style::default().fg(Color::Green).bold()),
            Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1),
        );
    }
    app.add_column_area = Some(add);
}

fn render_passage(app: &mut App, frame: &mut Frame, area: Rect, index: usize) {
    let is_active = index == app.active;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 1 || inner.width < 1 {
        // Keep header indices aligned with column indices.
        app.column_header_areas.push(Rect::default());
        return;
    }

    let [header_area, content_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

    let title = app.tab_title(index);
    let version = app.passages[index].version_id.to_uppercase();
    let title_style = if is_active {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let header = Line::from(vec![
        Span::styled(format!("{} ", title), title_style),
        Span::styled(format!("[{}] ▾", version), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(header), header_area);
    app.column_header_areas.push(header_area);
    if is_active {
        // The active column's header doubles as the picker handle.
        app.panel.handle_area = Some(header_area);
    }

    let passage = &app.passages[index];
    let mut lines: Vec<Line> = Vec::new();
    if passage.loading {
        lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if passage.verses.is_empty() {
        lines.push(Line::from(Span::styled(
            "No chapter content available",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for (number, verse) in passage.verses.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} ", number + 1),
                    Style::default().fg(Color::Yellow).bold(),
                ),
                Span::raw(verse.clone()),
            ]));
            lines.push(Line::default());
        }
    }

    // Estimate wrapped height to bound scrolling
    let width = content_area.width.max(1) as usize;
    let total_lines: u16 = lines
        .iter()
        .map(|line| {
            let chars = line.width();
            if chars == 0 { 1 } else { ((chars - 1) / width + 1) as u16 }
        })
        .sum();
    let max_scroll = total_lines.saturating_sub(content_area.height);
    let scroll = passage.scroll.min(max_scroll);

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).scroll((scroll, 0)),
        content_area,
    );

    let passage = &mut app.passages[index];
    passage.max_scroll = max_scroll;
    passage.scroll = scroll;
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hint = if app.panel.open {
        " type to filter │ ↑/↓ highlight │ ⏎ select │ esc cancel "
    } else {
        " q quit │ ⏎ go to passage │ j/k scroll │ h/l switch │ a add │ x close "
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

/// The picker dropdown: a shared input on top, and two lists under it. In
/// Book mode the filtered list is joined by the displayed passage's chapter
/// shortcuts; in Chapter mode by the book shortcuts.
fn render_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    app.filtered_item_areas.clear();
    app.book_shortcut_areas.clear();
    app.chapter_shortcut_areas.clear();

    let width = 46.min(area.width);
    let height = 18.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Go to passage ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    app.panel.dropdown_area = Some(popup);

    if inner.height < 3 || inner.width < 4 {
        return;
    }

    let [input_area, lists_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

    let input = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(app.selector.input.clone()),
        Span::styled("▏", Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(Paragraph::new(input), input_area);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(lists_area);

    let current_book_name = app
        .names
        .display(&app.passages[app.active].book)
        .to_string();
    let current_chapter = app.passages[app.active].chapter;
    let visible = app.visible_items();

    match app.selector.mode {
        SelectionMode::Chapter => {
            render_book_shortcuts(app, frame, left);
            render_filtered(app, frame, right, &visible, &current_book_name, current_chapter);
        }
        SelectionMode::Book => {
            render_filtered(app, frame, left, &visible, &current_book_name, current_chapter);
            render_chapter_shortcuts(app, frame, right, current_chapter);
        }
    }
}

fn list_offset(selected: usize, len: usize, height: usize) -> usize {
    if height == 0 || len <= height {
        return 0;
    }
    selected
        .saturating_sub(height / 2)
        .min(len - height)
}

fn render_filtered(
    app: &mut App,
    frame: &mut Frame,
    area: Rect,
    items: &[ListItem],
    current_book_name: &str,
    current_chapter: u32,
) {
    if area.height < 2 {
        return;
    }
    let [title_area, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    frame.render_widget(
        Paragraph::new("Matches").style(Style::default().fg(Color::DarkGray)),
        title_area,
    );

    let height = list_area.height as usize;
    let offset = list_offset(app.selector.highlighted, items.len(), height);
    for (row, (index, item)) in items.iter().enumerate().skip(offset).take(height).enumerate() {
        let line_area = Rect::new(list_area.x, list_area.y + row as u16, list_area.width, 1);
        let mut style = Style::default();
        if Selector::is_active(item, current_book_name, current_chapter) {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        if index == app.selector.highlighted {
            style = style.add_modifier(Modifier::REVERSED);
        }
        frame.render_widget(
            Paragraph::new(format!(" {}", item.text)).style(style),
            line_area,
        );
        app.filtered_item_areas.push((line_area, item.clone()));
    }
}

fn render_book_shortcuts(app: &mut App, frame: &mut Frame, area: Rect) {
    if area.height < 2 {
        return;
    }
    let [title_area, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    frame.render_widget(
        Paragraph::new("Books").style(Style::default().fg(Color::DarkGray)),
        title_area,
    );

    let books: Vec<String> = app.v11n.books().to_vec();
    let selected = books
        .iter()
        .position(|book| *book == app.selector.selected_book)
        .unwrap_or(0);
    let height = list_area.height as usize;
    let offset = list_offset(selected, books.len(), height);

    for (row, book_id) in books.iter().skip(offset).take(height).enumerate() {
        let line_area = Rect::new(list_area.x, list_area.y + row as u16, list_area.width, 1);
        let style = if *book_id == app.selector.selected_book {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        };
        frame.render_widget(
            Paragraph::new(format!(" {}", app.names.display(book_id))).style(style),
            line_area,
        );
        app.book_shortcut_areas.push((line_area, book_id.clone()));
    }
}

fn render_chapter_shortcuts(app: &mut App, frame: &mut Frame, area: Rect, current_chapter: u32) {
    if area.height < 2 {
        return;
    }
    let [title_area, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    frame.render_widget(
        Paragraph::new("Chapters").style(Style::default().fg(Color::DarkGray)),
        title_area,
    );

    // Chapters of the passage on screen, not of the in-progress selection.
    let count = app.v11n.chapter_count(&app.passages[app.active].book);
    let height = list_area.height as usize;
    let selected = current_chapter.saturating_sub(1) as usize;
    let offset = list_offset(selected, count as usize, height);

    for (row, chapter) in (1..=count).skip(offset).take(height).enumerate() {
        let line_area = Rect::new(list_area.x, list_area.y + row as u16, list_area.width, 1);
        let style = if chapter == current_chapter {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        };
        frame.render_widget(
            Paragraph::new(format!(" {}", chapter)).style(style),
            line_area,
        );
        app.chapter_shortcut_areas.push((line_area, chapter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_offset_keeps_selection_visible() {
        assert_eq!(list_offset(0, 66, 10), 0);
        assert_eq!(list_offset(3, 66, 10), 0);
        // Mid-list selections center
        assert_eq!(list_offset(30, 66, 10), 25);
        // Tail selections clamp to the last page
        assert_eq!(list_offset(65, 66, 10), 56);
        // Short lists never scroll
        assert_eq!(list_offset(4, 5, 10), 0);
        assert_eq!(list_offset(4, 5, 0), 0);
    }
}
