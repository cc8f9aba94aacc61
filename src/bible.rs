use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

/// Book ids, English display names and KJV chapter counts for the 66-book
/// Protestant canon, in canonical order.
const BOOKS: &[(&str, &str, u32)] = &[
    ("gen", "Genesis", 50),
    ("exo", "Exodus", 40),
    ("lev", "Leviticus", 27),
    ("num", "Numbers", 36),
    ("deu", "Deuteronomy", 34),
    ("jos", "Joshua", 24),
    ("jdg", "Judges", 21),
    ("rut", "Ruth", 4),
    ("1sa", "1 Samuel", 31),
    ("2sa", "2 Samuel", 24),
    ("1ki", "1 Kings", 22),
    ("2ki", "2 Kings", 25),
    ("1ch", "1 Chronicles", 29),
    ("2ch", "2 Chronicles", 36),
    ("ezr", "Ezra", 10),
    ("neh", "Nehemiah", 13),
    ("est", "Esther", 10),
    ("job", "Job", 42),
    ("psa", "Psalms", 150),
    ("pro", "Proverbs", 31),
    ("ecc", "Ecclesiastes", 12),
    ("sng", "Song of Solomon", 8),
    ("isa", "Isaiah", 66),
    ("jer", "Jeremiah", 52),
    ("lam", "Lamentations", 5),
    ("ezk", "Ezekiel", 48),
    ("dan", "Daniel", 12),
    ("hos", "Hosea", 14),
    ("jol", "Joel", 3),
    ("amo", "Amos", 9),
    ("oba", "Obadiah", 1),
    ("jon", "Jonah", 4),
    ("mic", "Micah", 7),
    ("nam", "Nahum", 3),
    ("hab", "Habakkuk", 3),
    ("zep", "Zephaniah", 3),
    ("hag", "Haggai", 2),
    ("zec", "Zechariah", 14),
    ("mal", "Malachi", 4),
    ("mat", "Matthew", 28),
    ("mrk", "Mark", 16),
    ("luk", "Luke", 24),
    ("jhn", "John", 21),
    ("act", "Acts", 28),
    ("rom", "Romans", 16),
    ("1co", "1 Corinthians", 16),
    ("2co", "2 Corinthians", 13),
    ("gal", "Galatians", 6),
    ("eph", "Ephesians", 6),
    ("php", "Philippians", 4),
    ("col", "Colossians", 4),
    ("1th", "1 Thessalonians", 5),
    ("2th", "2 Thessalonians", 3),
    ("1ti", "1 Timothy", 6),
    ("2ti", "2 Timothy", 4),
    ("tit", "Titus", 3),
    ("phm", "Philemon", 1),
    ("heb", "Hebrews", 13),
    ("jas", "James", 5),
    ("1pe", "1 Peter", 5),
    ("2pe", "2 Peter", 3),
    ("1jn", "1 John", 5),
    ("2jn", "2 John", 1),
    ("3jn", "3 John", 1),
    ("jud", "Jude", 1),
    ("rev", "Revelation", 22),
];

/// Book id -> display name lookup. Read-only; supplied to the picker for
/// comparison text and labels. A missing id falls back to the raw id rather
/// than failing, since an unknown key is a caller bug, not a runtime error.
pub struct BookNames {
    names: HashMap<String, String>,
}

impl BookNames {
    pub fn english() -> Self {
        let names = BOOKS
            .iter()
            .map(|(id, name, _)| (id.to_string(), name.to_string()))
            .collect();
        Self { names }
    }

    pub fn get(&self, book_id: &str) -> Option<&str> {
        self.names.get(book_id).map(|s| s.as_str())
    }

    pub fn display<'a>(&'a self, book_id: &'a str) -> &'a str {
        self.get(book_id).unwrap_or(book_id)
    }
}

/// Versification scheme: which books exist (in canonical order) and how many
/// chapters each has. Source of truth for valid chapter ranges per book.
pub struct Versification {
    books: Vec<String>,
    chapter_counts: HashMap<String, u32>,
}

impl Versification {
    /// Built-in KJV scheme, used when no data directory provides one.
    pub fn kjv() -> Self {
        let books = BOOKS.iter().map(|(id, _, _)| id.to_string()).collect();
        let chapter_counts = BOOKS
            .iter()
            .map(|(id, _, chapters)| (id.to_string(), *chapters))
            .collect();
        Self { books, chapter_counts }
    }

    /// Parse a `v11n.json` document: an object mapping each book id to an
    /// array with one entry per chapter (verse counts; only the array length
    /// matters here). Key order is the canonical book order.
    pub fn from_json(json: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).context("versification is not a JSON object")?;

        let mut books = Vec::with_capacity(map.len());
        let mut chapter_counts = HashMap::with_capacity(map.len());
        for (book_id, chapters) in &map {
            let count = chapters
                .as_array()
                .with_context(|| format!("versification entry for '{}' is not an array", book_id))?
                .len() as u32;
            books.push(book_id.clone());
            chapter_counts.insert(book_id.clone(), count);
        }
        Ok(Self { books, chapter_counts })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading versification from {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn books(&self) -> &[String] {
        &self.books
    }

    pub fn contains(&self, book_id: &str) -> bool {
        self.chapter_counts.contains_key(book_id)
    }

    pub fn chapter_count(&self, book_id: &str) -> u32 {
        self.chapter_counts.get(book_id).copied().unwrap_or(0)
    }
}

/// A (version, book, chapter) address, the unit the navbar and the picker
/// trade in. Serialized with the upstream JSON field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterReference {
    pub version_id: String,
    pub book: String,
    pub chapter: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterContent {
    pub verses: Vec<String>,
}

/// One open reading column.
#[derive(Debug, Clone)]
pub struct Passage {
    pub version_id: String,
    pub book: String,
    pub chapter: u32,
    pub verses: Vec<String>,
    pub loading: bool,
    pub scroll: u16,
    /// Upper scroll bound for the current viewport, recomputed during render.
    pub max_scroll: u16,
}

impl Passage {
    pub fn new(version_id: &str, book: &str, chapter: u32) -> Self {
        Self {
            version_id: version_id.to_string(),
            book: book.to_string(),
            chapter,
            verses: Vec::new(),
            loading: false,
            scroll: 0,
            max_scroll: 0,
        }
    }

    pub fn reference(&self) -> ChapterReference {
        ChapterReference {
            version_id: self.version_id.clone(),
            book: self.book.clone(),
            chapter: self.chapter,
        }
    }
}

/// Chapter content on disk, laid out as `<data>/<version>/<book>/chNNN.json`
/// with the chapter number zero-padded to three digits.
pub struct BibleStore {
    data_dir: Option<PathBuf>,
}

impl BibleStore {
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self { data_dir }
    }

    pub fn chapter_path(&self, version_id: &str, book: &str, chapter: u32) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| {
            dir.join(version_id)
                .join(book)
                .join(format!("ch{:03}.json", chapter))
        })
    }

    /// Load a chapter's verses. `Ok(None)` when there is no data directory or
    /// the chapter file does not exist; the passage then renders empty.
    pub fn load_chapter(
        &self,
        version_id: &str,
        book: &str,
        chapter: u32,
    ) -> Result<Option<ChapterContent>> {
        let Some(path) = self.chapter_path(version_id, book, chapter) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading chapter from {}", path.display()))?;
        let chapter: ChapterContent = serde_json::from_str(&content)
            .with_context(|| format!("parsing chapter JSON at {}", path.display()))?;
        Ok(Some(chapter))
    }

    /// Versification for a version, if the data directory carries one.
    pub fn load_versification(&self, version_id: &str) -> Result<Option<Versification>> {
        let Some(dir) = &self.data_dir else {
            return Ok(None);
        };
        let path = dir.join(version_id).join("v11n.json");
        if !path.exists() {
            return Ok(None);
        }
        Versification::load(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_kjv_versification_counts() {
        let v11n = Versification::kjv();
        assert_eq!(v11n.books().len(), 66);
        assert_eq!(v11n.books()[0], "gen");
        assert_eq!(v11n.chapter_count("gen"), 50);
        assert_eq!(v11n.chapter_count("psa"), 150);
        assert_eq!(v11n.chapter_count("jud"), 1);
        assert_eq!(v11n.chapter_count("rev"), 22);
        assert_eq!(v11n.chapter_count("nope"), 0);
    }

    #[test]
    fn test_versification_from_json_preserves_order() {
        let v11n = Versification::from_json(r#"{"gen": [31, 25, 24], "exo": [22]}"#).unwrap();
        assert_eq!(v11n.books(), &["gen".to_string(), "exo".to_string()]);
        assert_eq!(v11n.chapter_count("gen"), 3);
        assert_eq!(v11n.chapter_count("exo"), 1);
    }

    #[test]
    fn test_versification_rejects_non_array_entry() {
        assert!(Versification::from_json(r#"{"gen": 50}"#).is_err());
    }

    #[test]
    fn test_book_names_lookup_and_fallback() {
        let names = BookNames::english();
        assert_eq!(names.get("gen"), Some("Genesis"));
        assert_eq!(names.display("sng"), "Song of Solomon");
        assert_eq!(names.get("zzz"), None);
        assert_eq!(names.display("zzz"), "zzz");
    }

    #[test]
    fn test_store_loads_chapter_from_padded_path() {
        let dir = tempfile::tempdir().unwrap();
        let chapter_dir = dir.path().join("kjv").join("gen");
        std::fs::create_dir_all(&chapter_dir).unwrap();
        let mut file = std::fs::File::create(chapter_dir.join("ch003.json")).unwrap();
        write!(file, r#"{{"verses": ["v1", "v2"]}}"#).unwrap();

        let store = BibleStore::new(Some(dir.path().to_path_buf()));
        let content = store.load_chapter("kjv", "gen", 3).unwrap().unwrap();
        assert_eq!(content.verses, vec!["v1", "v2"]);

        // Absent chapter is not an error.
        assert!(store.load_chapter("kjv", "gen", 4).unwrap().is_none());
    }

    #[test]
    fn test_store_without_data_dir() {
        let store = BibleStore::new(None);
        assert!(store.load_chapter("kjv", "gen", 1).unwrap().is_none());
        assert!(store.load_versification("kjv").unwrap().is_none());
    }
}
