use ratatui::layout::Rect;
use std::path::PathBuf;
use anyhow::Result;

use crate::bible::{BibleStore, BookNames, ChapterReference, Passage, Versification};
use crate::config::Config;
use crate::panel::Panel;
use crate::selector::{Commit, ListItem, Selector};

const DEFAULT_VERSION: &str = "kjv";

pub struct App {
    pub should_quit: bool,

    // Open passages; the picker always acts on the active one
    pub passages: Vec<Passage>,
    pub active: usize,

    // Chapter picker
    pub panel: Panel,
    pub selector: Selector,

    // Data
    pub v11n: Versification,
    pub names: BookNames,
    pub store: BibleStore,

    /// Where commits persist the default passage. Unset means no
    /// persistence; tests leave it unset so they never touch the platform
    /// config directory.
    config_path: Option<PathBuf>,

    // Areas recorded during render for mouse hit-testing
    pub tab_areas: Vec<Rect>,
    pub add_tab_area: Option<Rect>,
    pub column_areas: Vec<Rect>,
    pub column_header_areas: Vec<Rect>,
    pub add_column_area: Option<Rect>,
    pub filtered_item_areas: Vec<(Rect, ListItem)>,
    pub book_shortcut_areas: Vec<(Rect, String)>,
    pub chapter_shortcut_areas: Vec<(Rect, u32)>,
}

impl App {
    pub fn new(
        config: &Config,
        data_dir: Option<PathBuf>,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let store = BibleStore::new(data_dir.or_else(|| config.data_dir.clone()));

        let initial = config.default_passage.clone().unwrap_or(ChapterReference {
            version_id: DEFAULT_VERSION.to_string(),
            book: "gen".to_string(),
            chapter: 1,
        });

        let v11n = store
            .load_versification(&initial.version_id)?
            .unwrap_or_else(Versification::kjv);

        // A stale config may point at a book this versification lacks.
        let initial = if v11n.contains(&initial.book) {
            initial
        } else {
            ChapterReference {
                version_id: initial.version_id,
                book: v11n.books().first().cloned().unwrap_or_else(|| "gen".to_string()),
                chapter: 1,
            }
        };

        let selector = Selector::new(&initial.book, initial.chapter);
        let mut app = Self {
            should_quit: false,
            passages: vec![Passage::new(&initial.version_id, &initial.book, initial.chapter)],
            active: 0,
            panel: Panel::default(),
            selector,
            v11n,
            names: BookNames::english(),
            store,
            config_path,
            tab_areas: Vec::new(),
            add_tab_area: None,
            column_areas: Vec::new(),
            column_header_areas: Vec::new(),
            add_column_area: None,
            filtered_item_areas: Vec::new(),
            book_shortcut_areas: Vec::new(),
            chapter_shortcut_areas: Vec::new(),
        };
        app.load_verses(0)?;
        Ok(app)
    }

    pub fn active_passage(&self) -> &Passage {
        &self.passages[self.active]
    }

    pub fn active_passage_mut(&mut self) -> &mut Passage {
        &mut self.passages[self.active]
    }

    fn load_verses(&mut self, index: usize) -> Result<()> {
        let (version_id, book, chapter) = {
            let passage = &self.passages[index];
            (passage.version_id.clone(), passage.book.clone(), passage.chapter)
        };
        let content = self.store.load_chapter(&version_id, &book, chapter)?;
        let passage = &mut self.passages[index];
        passage.verses = content.map(|c| c.verses).unwrap_or_default();
        passage.loading = false;
        passage.scroll = 0;
        Ok(())
    }

    // Navbar / columns operations

    /// Open a new column next to the existing ones, seeded from the active
    /// passage's reference.
    pub fn add_passage(&mut self) -> Result<()> {
        let reference = self.active_passage().reference();
        self.passages.push(Passage::new(
            &reference.version_id,
            &reference.book,
            reference.chapter,
        ));
        self.active = self.passages.len() - 1;
        self.load_verses(self.active)
    }

    pub fn navigate(&mut self, index: usize) {
        if index < self.passages.len() {
            self.active = index;
        }
    }

    pub fn next_passage(&mut self) {
        self.active = (self.active + 1) % self.passages.len();
    }

    pub fn prev_passage(&mut self) {
        self.active = (self.active + self.passages.len() - 1) % self.passages.len();
    }

    /// Close a column. The last remaining passage stays open.
    pub fn close_passage(&mut self, index: usize) {
        if self.passages.len() > 1 && index < self.passages.len() {
            self.passages.remove(index);
            if self.active >= self.passages.len() {
                self.active = self.passages.len() - 1;
            }
        }
    }

    // Picker operations

    /// Open the picker over the active passage. The selector is reseeded on
    /// every open, so an abandoned search never leaks into the next one.
    pub fn open_picker(&mut self) {
        let passage = &self.passages[self.active];
        self.selector = Selector::new(&passage.book, passage.chapter);
        self.panel.open();
    }

    /// Abandon the in-progress selection and close the dropdown. No commit.
    pub fn cancel_picker(&mut self) {
        let (book, chapter) = {
            let passage = &self.passages[self.active];
            (passage.book.clone(), passage.chapter)
        };
        self.selector.cancel(&book, chapter, &self.names);
        self.panel.close();
    }

    /// Retarget the active passage to a committed (book, chapter), reload its
    /// verses and close the picker. Runs once per commit; identical commits
    /// repeat the work.
    pub fn apply_commit(&mut self, commit: Commit) -> Result<()> {
        {
            let passage = &mut self.passages[self.active];
            passage.book = commit.book;
            passage.chapter = commit.chapter;
        }
        self.load_verses(self.active)?;
        self.panel.close();
        if let Some(path) = &self.config_path {
            let _ = Config::save_default_passage(path, &self.passages[self.active].reference());
        }
        Ok(())
    }

    pub fn visible_items(&self) -> Vec<ListItem> {
        self.selector.visible_items(&self.v11n, &self.names)
    }

    /// Enter on the filtered list: choose the highlighted item. Book stage
    /// narrows, chapter stage commits.
    pub fn choose_highlighted(&mut self) -> Result<()> {
        let items = self.visible_items();
        if let Some(item) = items.get(self.selector.highlighted).cloned() {
            if let Some(commit) = self.selector.item_chosen(&item) {
                self.apply_commit(commit)?;
            }
        }
        Ok(())
    }

    pub fn click_filtered_item(&mut self, item: &ListItem) -> Result<()> {
        if let Some(commit) = self.selector.item_chosen(item) {
            self.apply_commit(commit)?;
        }
        Ok(())
    }

    pub fn click_book_shortcut(&mut self, book_id: &str) {
        self.selector.book_clicked(book_id, &self.names);
    }

    /// The always-visible chapter list commits against the passage currently
    /// on screen, regardless of any in-progress book search.
    pub fn click_chapter_shortcut(&mut self, chapter: u32) -> Result<()> {
        let commit = self
            .selector
            .chapter_clicked(&self.passages[self.active].book, chapter);
        self.apply_commit(commit)
    }

    pub fn picker_input_push(&mut self, c: char) {
        let mut text = self.selector.input.clone();
        text.push(c);
        self.selector.input_changed(text, &self.names);
    }

    pub fn picker_input_pop(&mut self) {
        let mut text = self.selector.input.clone();
        text.pop();
        self.selector.input_changed(text, &self.names);
    }

    // Content scrolling

    pub fn scroll_down(&mut self) {
        let passage = self.active_passage_mut();
        passage.scroll = passage.scroll.saturating_add(1).min(passage.max_scroll);
    }

    pub fn scroll_up(&mut self) {
        let passage = self.active_passage_mut();
        passage.scroll = passage.scroll.saturating_sub(1);
    }

    pub fn scroll_top(&mut self) {
        self.active_passage_mut().scroll = 0;
    }

    pub fn scroll_bottom(&mut self) {
        let passage = self.active_passage_mut();
        passage.scroll = passage.max_scroll;
    }

    /// Navbar tab label, e.g. "Genesis 1".
    pub fn tab_title(&self, index: usize) -> String {
        let passage = &self.passages[index];
        format!("{} {}", self.names.display(&passage.book), passage.chapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectionMode;

    fn app() -> App {
        App::new(&Config::new(), None, None).unwrap()
    }

    #[test]
    fn test_starts_with_one_passage() {
        let app = app();
        assert_eq!(app.passages.len(), 1);
        assert_eq!(app.active, 0);
        assert_eq!(app.active_passage().book, "gen");
        assert_eq!(app.active_passage().chapter, 1);
    }

    #[test]
    fn test_add_passage_clones_active_reference() {
        let mut app = app();
        app.add_passage().unwrap();
        assert_eq!(app.passages.len(), 2);
        assert_eq!(app.active, 1);
        assert_eq!(app.passages[1].book, "gen");
        assert_eq!(app.passages[1].chapter, 1);
    }

    #[test]
    fn test_close_passage_clamps_active_and_keeps_last() {
        let mut app = app();
        app.add_passage().unwrap();
        app.add_passage().unwrap();
        assert_eq!(app.active, 2);
        app.close_passage(2);
        assert_eq!(app.passages.len(), 2);
        assert_eq!(app.active, 1);
        app.close_passage(0);
        app.close_passage(0);
        // Last passage never closes.
        assert_eq!(app.passages.len(), 1);
    }

    #[test]
    fn test_passage_cycling_wraps() {
        let mut app = app();
        app.add_passage().unwrap();
        app.navigate(0);
        app.prev_passage();
        assert_eq!(app.active, 1);
        app.next_passage();
        assert_eq!(app.active, 0);
    }

    #[test]
    fn test_commit_retargets_active_passage_and_closes_panel() {
        let mut app = app();
        app.open_picker();
        assert!(app.panel.open);

        let items = app.visible_items();
        let exodus = items
            .iter()
            .find(|item| item.text == "Exodus")
            .cloned()
            .unwrap();
        app.click_filtered_item(&exodus).unwrap();
        // Book stage: no commit yet, panel still open.
        assert!(app.panel.open);
        assert_eq!(app.active_passage().book, "gen");

        let chapters = app.visible_items();
        app.click_filtered_item(&chapters[4]).unwrap();
        assert!(!app.panel.open);
        assert_eq!(app.active_passage().book, "exo");
        assert_eq!(app.active_passage().chapter, 5);
    }

    #[test]
    fn test_chapter_shortcut_ignores_in_progress_book_search() {
        let mut app = app();
        app.open_picker();
        app.click_book_shortcut("exo");
        app.click_chapter_shortcut(7).unwrap();
        // Commits against the displayed passage's book, not the search.
        assert_eq!(app.active_passage().book, "gen");
        assert_eq!(app.active_passage().chapter, 7);
    }

    #[test]
    fn test_cancel_picker_reverts_without_commit() {
        let mut app = app();
        app.open_picker();
        app.picker_input_push('E');
        app.click_book_shortcut("exo");
        app.cancel_picker();
        assert!(!app.panel.open);
        assert_eq!(app.active_passage().book, "gen");
        assert_eq!(app.selector.mode, SelectionMode::Chapter);
        assert_eq!(app.selector.input, "Genesis 1");
    }

    #[test]
    fn test_reopen_reseeds_selector() {
        let mut app = app();
        app.open_picker();
        app.picker_input_push('x');
        app.cancel_picker();
        app.open_picker();
        assert_eq!(app.selector.input, "");
        assert_eq!(app.selector.mode, SelectionMode::Book);
    }

    #[test]
    fn test_commit_persists_default_passage_to_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bible-reader").join("config.json");
        let mut app = App::new(&Config::new(), None, Some(path.clone())).unwrap();

        app.open_picker();
        app.click_chapter_shortcut(7).unwrap();

        let saved = Config::load_from(&path).unwrap();
        let passage = saved.default_passage.unwrap();
        assert_eq!(passage.book, "gen");
        assert_eq!(passage.chapter, 7);
    }

    #[test]
    fn test_commit_without_config_path_persists_nothing() {
        // The test default: no config path, so a commit writes no file.
        let mut app = app();
        app.open_picker();
        app.click_chapter_shortcut(2).unwrap();
        assert_eq!(app.active_passage().chapter, 2);
        assert!(app.config_path.is_none());
    }

    #[test]
    fn test_typing_updates_selector_input() {
        let mut app = app();
        app.open_picker();
        app.picker_input_push('g');
        app.picker_input_push('e');
        assert_eq!(app.selector.input, "ge");
        app.picker_input_pop();
        assert_eq!(app.selector.input, "g");
    }
}
