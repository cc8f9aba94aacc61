use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::App;
use crate::panel::PanelAction;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key)?,
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse)?,
        AppEvent::Resize(_, _) => {}
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    if app.panel.open {
        handle_picker_key(app, key)?;
    } else {
        handle_reader_key(app, key)?;
    }

    Ok(())
}

fn handle_reader_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,

        // Open the chapter picker for the active passage
        KeyCode::Enter | KeyCode::Char('o') => app.open_picker(),

        // Scroll the active column
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('g') => app.scroll_top(),
        KeyCode::Char('G') => app.scroll_bottom(),

        // Move between passages
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.next_passage(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.prev_passage(),

        // Open / close columns
        KeyCode::Char('a') | KeyCode::Char('+') => app.add_passage()?,
        KeyCode::Char('x') => app.close_passage(app.active),

        _ => {}
    }
    Ok(())
}

fn handle_picker_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        // Abandon the selection, revert to the displayed passage
        KeyCode::Esc => app.cancel_picker(),

        // Choose the highlighted item (narrow to book, or commit chapter)
        KeyCode::Enter => app.choose_highlighted()?,

        KeyCode::Down => {
            let len = app.visible_items().len();
            app.selector.highlight_down(len);
        }
        KeyCode::Up => app.selector.highlight_up(),

        KeyCode::Backspace => app.picker_input_pop(),
        KeyCode::Char(c) => app.picker_input_push(c),

        _ => {}
    }
    Ok(())
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) -> Result<()> {
    match mouse.kind {
        MouseEventKind::Down(_) => handle_mouse_down(app, mouse.column, mouse.row)?,
        MouseEventKind::ScrollDown => app.scroll_down(),
        MouseEventKind::ScrollUp => app.scroll_up(),
        _ => {}
    }
    Ok(())
}

fn handle_mouse_down(app: &mut App, column: u16, row: u16) -> Result<()> {
    if app.panel.open {
        handle_picker_mouse_down(app, column, row)
    } else {
        handle_reader_mouse_down(app, column, row)
    }
}

fn handle_picker_mouse_down(app: &mut App, column: u16, row: u16) -> Result<()> {
    // Presses on list rows first; anything else is routed through the panel,
    // which treats presses outside the dropdown as dismissal.
    if let Some(item) = app
        .filtered_item_areas
        .iter()
        .find(|(area, _)| contains(*area, column, row))
        .map(|(_, item)| item.clone())
    {
        return app.click_filtered_item(&item);
    }

    if let Some(book_id) = app
        .book_shortcut_areas
        .iter()
        .find(|(area, _)| contains(*area, column, row))
        .map(|(_, id)| id.clone())
    {
        app.click_book_shortcut(&book_id);
        return Ok(());
    }

    if let Some(chapter) = app
        .chapter_shortcut_areas
        .iter()
        .find(|(area, _)| contains(*area, column, row))
        .map(|(_, n)| *n)
    {
        return app.click_chapter_shortcut(chapter);
    }

    match app.panel.on_mouse_down(column, row) {
        PanelAction::Dismissed | PanelAction::Closed => app.cancel_picker(),
        _ => {}
    }
    Ok(())
}

fn handle_reader_mouse_down(app: &mut App, column: u16, row: u16) -> Result<()> {
    // Active column's header is the picker handle
    if app.panel.on_mouse_down(column, row) == PanelAction::Opened {
        app.open_picker();
        return Ok(());
    }

    // Navbar tabs
    if let Some(index) = app
        .tab_areas
        .iter()
        .position(|area| contains(*area, column, row))
    {
        app.navigate(index);
        return Ok(());
    }
    if app
        .add_tab_area
        .is_some_and(|area| contains(area, column, row))
    {
        return app.add_passage();
    }

    // Another column's header: activate it and open its picker
    if let Some(index) = app
        .column_header_areas
        .iter()
        .position(|area| contains(*area, column, row))
    {
        app.navigate(index);
        app.open_picker();
        return Ok(());
    }

    // Column bodies activate; the trailing "+" column adds
    if let Some(index) = app
        .column_areas
        .iter()
        .position(|area| contains(*area, column, row))
    {
        app.navigate(index);
        return Ok(());
    }
    if app
        .add_column_area
        .is_some_and(|area| contains(area, column, row))
    {
        return app.add_passage();
    }

    Ok(())
}
