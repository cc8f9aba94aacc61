use crate::bible::{BookNames, Versification};

/// Which list the picker is currently resolving: a book name or a chapter
/// number within the selected book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Book,
    Chapter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKey {
    Book(String),
    Chapter(u32),
}

/// Transient display record, rebuilt on every render from the versification
/// and the name table. `comparison` is the text the input filter runs
/// against; for chapters it is `"<book name> <n>"` so that typing a full
/// reference keeps narrowing the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub key: ItemKey,
    pub text: String,
    pub comparison: String,
}

/// A completed (book, chapter) choice, reported to the owner exactly once
/// per finalized selection. Cancelling never produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub book: String,
    pub chapter: u32,
}

/// Dual-mode book/chapter picker state. The same input field and filtered
/// list serve both stages: first the book is resolved, then a chapter within
/// it. The meaning of choosing an item depends only on `mode`.
pub struct Selector {
    pub mode: SelectionMode,
    pub selected_book: String,
    pub selected_chapter: u32,
    pub input: String,
    pub highlighted: usize,
}

impl Selector {
    /// Seed from the owner's current position. Always starts in Book mode
    /// with an empty input, so the full book list shows immediately.
    pub fn new(book: &str, chapter: u32) -> Self {
        Self {
            mode: SelectionMode::Book,
            selected_book: book.to_string(),
            selected_chapter: chapter,
            input: String::new(),
            highlighted: 0,
        }
    }

    /// The user edited the input. If the text no longer starts with the
    /// selected book's display name, they are typing a new book name, so the
    /// picker drops back to Book mode. A prefix check only; filtering itself
    /// is substring-based.
    pub fn input_changed(&mut self, input: String, names: &BookNames) {
        if !input.starts_with(names.display(&self.selected_book)) {
            self.mode = SelectionMode::Book;
        }
        self.input = input;
        self.highlighted = 0;
    }

    /// An item from the filtered list was chosen (Enter or click). In Book
    /// mode this only narrows to that book and switches the list to its
    /// chapters; in Chapter mode it finalizes the selection.
    pub fn item_chosen(&mut self, item: &ListItem) -> Option<Commit> {
        match self.mode {
            SelectionMode::Book => {
                if let ItemKey::Book(book_id) = &item.key {
                    self.selected_book = book_id.clone();
                }
                self.mode = SelectionMode::Chapter;
                self.input = item.text.clone();
                self.highlighted = 0;
                None
            }
            SelectionMode::Chapter => match item.key {
                ItemKey::Chapter(chapter) => Some(Commit {
                    book: self.selected_book.clone(),
                    chapter,
                }),
                ItemKey::Book(_) => None,
            },
        }
    }

    /// Direct click on the always-visible book list. Same effect as choosing
    /// the book through the filter, but also rewrites the input to the book's
    /// name. Never commits.
    pub fn book_clicked(&mut self, book_id: &str, names: &BookNames) {
        self.input = names.display(book_id).to_string();
        self.selected_book = book_id.to_string();
        self.mode = SelectionMode::Chapter;
        self.highlighted = 0;
    }

    /// Direct click on the always-visible chapter list of the currently
    /// displayed passage. Commits against the owner's current book, not the
    /// in-progress `selected_book`: this is the shortcut for flipping the
    /// chapter of the passage already on screen, and stays that way even if
    /// a book search is underway.
    pub fn chapter_clicked(&self, current_book: &str, chapter: u32) -> Commit {
        Commit {
            book: current_book.to_string(),
            chapter,
        }
    }

    /// Abandon the in-progress selection (blur, Escape, outside click):
    /// revert to the owner's current position with the input showing
    /// `"<book name> <chapter>"`. No commit.
    pub fn cancel(&mut self, current_book: &str, current_chapter: u32, names: &BookNames) {
        self.mode = SelectionMode::Chapter;
        self.selected_book = current_book.to_string();
        self.selected_chapter = current_chapter;
        self.input = format!("{} {}", names.display(current_book), current_chapter);
        self.highlighted = 0;
    }

    /// Candidate list for the current mode: every book, or every chapter of
    /// the selected book.
    pub fn items(&self, v11n: &Versification, names: &BookNames) -> Vec<ListItem> {
        match self.mode {
            SelectionMode::Book => v11n
                .books()
                .iter()
                .map(|book_id| {
                    let name = names.display(book_id).to_string();
                    ListItem {
                        key: ItemKey::Book(book_id.clone()),
                        comparison: name.clone(),
                        text: name,
                    }
                })
                .collect(),
            SelectionMode::Chapter => {
                let book_name = names.display(&self.selected_book);
                (1..=v11n.chapter_count(&self.selected_book))
                    .map(|chapter| ListItem {
                        key: ItemKey::Chapter(chapter),
                        text: chapter.to_string(),
                        comparison: format!("{} {}", book_name, chapter),
                    })
                    .collect()
            }
        }
    }

    /// Candidates whose comparison text contains the input as a
    /// case-insensitive substring. An empty input shows everything.
    pub fn visible_items(&self, v11n: &Versification, names: &BookNames) -> Vec<ListItem> {
        let needle = self.input.to_lowercase();
        self.items(v11n, names)
            .into_iter()
            .filter(|item| needle.is_empty() || item.comparison.to_lowercase().contains(&needle))
            .collect()
    }

    /// Whether an item matches the owner's committed position. Independent of
    /// the hover highlight; both may apply to the same row.
    pub fn is_active(item: &ListItem, current_book_name: &str, current_chapter: u32) -> bool {
        item.text == current_book_name || item.text == current_chapter.to_string()
    }

    pub fn highlight_down(&mut self, visible_len: usize) {
        if visible_len > 0 {
            self.highlighted = (self.highlighted + 1).min(visible_len - 1);
        }
    }

    pub fn highlight_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }
}
