use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use anyhow::{anyhow, Context, Result};

use crate::bible::ChapterReference;

/// One bible version as listed in the build configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleInputConfig {
    pub id: String,
    pub lang: String,
    pub name: String,
}

/// Content hashes for one version's fixture files.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibleHashes {
    pub v11n_hash: String,
    pub descriptor_hash: String,
}

/// Everything the generator needs besides the public directory itself.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateManifest {
    pub bibles: Vec<BibleInputConfig>,
    pub bibles_json_hash: String,
    pub bibles_hashes: HashMap<String, BibleHashes>,
    pub initial: ChapterReference,
}

impl GenerateManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading generate manifest from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing generate manifest at {}", path.display()))
    }

    fn hashes_for(&self, version_id: &str) -> Result<&BibleHashes> {
        self.bibles_hashes
            .get(version_id)
            .ok_or_else(|| anyhow!("no hashes configured for bible '{}'", version_id))
    }
}

/// Zero-pad a chapter number, matching the `chNNN` fixture file names.
pub fn pad(n: u32, width: usize) -> String {
    format!("{:0width$}", n, width = width)
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing fixture {}", path.display()))
}

/// Assemble the bundled-content source file from the content-hashed JSON
/// fixtures in `public`: the versions map with each bible's versification
/// merged in, plus the initial chapter resolved through the version's
/// descriptor. Returns the file's text; the caller writes it out.
pub fn generate_code(public: &Path, manifest: &GenerateManifest) -> Result<String> {
    let bibles_path = public.join(format!("bibles.{}.json", manifest.bibles_json_hash));
    let mut bibles = read_json(&bibles_path)?;
    let bibles_map = bibles
        .as_object_mut()
        .ok_or_else(|| anyhow!("{} is not a JSON object", bibles_path.display()))?;

    for bible in &manifest.bibles {
        let hashes = manifest.hashes_for(&bible.id)?;
        let v11n = read_json(
            &public
                .join(&bible.id)
                .join(format!("v11n.{}.json", hashes.v11n_hash)),
        )?;
        let entry = bibles_map
            .get_mut(&bible.id)
            .ok_or_else(|| anyhow!("bible '{}' missing from {}", bible.id, bibles_path.display()))?;
        entry
            .as_object_mut()
            .ok_or_else(|| anyhow!("bible '{}' entry is not a JSON object", bible.id))?
            .insert("v11n".to_string(), v11n);
    }

    let initial = &manifest.initial;
    let hashes = manifest.hashes_for(&initial.version_id)?;
    let descriptor = read_json(
        &public
            .join(&initial.version_id)
            .join(format!("descriptor.{}.json", hashes.descriptor_hash)),
    )?;

    if initial.chapter == 0 {
        return Err(anyhow!("initial chapter numbers start at 1"));
    }
    let chapter_hash = descriptor["chapters"][&initial.book]
        .get((initial.chapter - 1) as usize)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            anyhow!(
                "descriptor for '{}' has no hash for {} {}",
                initial.version_id,
                initial.book,
                initial.chapter
            )
        })?;

    let chapter = read_json(&public.join(&initial.version_id).join(&initial.book).join(
        format!("ch{}.{}.json", pad(initial.chapter, 3), chapter_hash),
    ))?;

    let default_passage = serde_json::json!({
        "versionId": initial.version_id,
        "book": initial.book,
        "chapter": initial.chapter,
        "verses": chapter["verses"],
        "loading": false,
    });

    let mut code = String::new();
    code.push_str(
        "// This file is generated by `bible-reader generate` and is not to be\n\
         // manually modified.\n\n",
    );
    code.push_str(&format!(
        "pub const BIBLES_JSON: &str = r##\"{}\"##;\n\n",
        serde_json::to_string(&bibles)?
    ));
    code.push_str(&format!(
        "pub const DEFAULT_PASSAGE_JSON: &str = r##\"{}\"##;\n",
        serde_json::to_string(&default_passage)?
    ));
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn manifest() -> GenerateManifest {
        serde_json::from_str(
            r#"{
                "bibles": [{"id": "kjv", "lang": "en", "name": "King James Version"}],
                "biblesJsonHash": "abc123",
                "biblesHashes": {"kjv": {"v11nHash": "v1hash", "descriptorHash": "deschash"}},
                "initial": {"versionId": "kjv", "book": "gen", "chapter": 2}
            }"#,
        )
        .unwrap()
    }

    fn fixture_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path();
        write(
            &public.join("bibles.abc123.json"),
            r#"{"kjv": {"id": "kjv", "lang": "en", "name": "King James Version"}}"#,
        );
        write(
            &public.join("kjv/v11n.v1hash.json"),
            r#"{"gen": [31, 25], "exo": [22]}"#,
        );
        write(
            &public.join("kjv/descriptor.deschash.json"),
            r#"{"chapters": {"gen": ["h001", "h002"]}}"#,
        );
        write(
            &public.join("kjv/gen/ch002.h002.json"),
            r#"{"verses": ["In the beginning", "And the earth"]}"#,
        );
        dir
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad(2, 3), "002");
        assert_eq!(pad(45, 3), "045");
        assert_eq!(pad(119, 3), "119");
        assert_eq!(pad(1000, 3), "1000");
    }

    #[test]
    fn test_generates_merged_bundle() {
        let dir = fixture_tree();
        let code = generate_code(dir.path(), &manifest()).unwrap();

        assert!(code.starts_with("// This file is generated"));

        // The versification landed inside the version's entry.
        let bibles_json = code
            .split("BIBLES_JSON: &str = r##\"")
            .nth(1)
            .and_then(|rest| rest.split("\"##").next())
            .unwrap();
        let bibles: Value = serde_json::from_str(bibles_json).unwrap();
        assert_eq!(bibles["kjv"]["v11n"]["exo"][0], 22);
        assert_eq!(bibles["kjv"]["name"], "King James Version");

        // The initial chapter was resolved through the descriptor.
        let passage_json = code
            .split("DEFAULT_PASSAGE_JSON: &str = r##\"")
            .nth(1)
            .and_then(|rest| rest.split("\"##").next())
            .unwrap();
        let passage: Value = serde_json::from_str(passage_json).unwrap();
        assert_eq!(passage["versionId"], "kjv");
        assert_eq!(passage["book"], "gen");
        assert_eq!(passage["chapter"], 2);
        assert_eq!(passage["verses"][0], "In the beginning");
        assert_eq!(passage["loading"], false);
    }

    #[test]
    fn test_missing_fixture_names_the_path() {
        let dir = fixture_tree();
        fs::remove_file(dir.path().join("kjv/v11n.v1hash.json")).unwrap();
        let err = generate_code(dir.path(), &manifest()).unwrap_err();
        assert!(format!("{:#}", err).contains("v11n.v1hash.json"));
    }

    #[test]
    fn test_chapter_outside_descriptor_fails() {
        let dir = fixture_tree();
        let mut manifest = manifest();
        manifest.initial.chapter = 9;
        let err = generate_code(dir.path(), &manifest).unwrap_err();
        assert!(err.to_string().contains("no hash for gen 9"));
    }

    #[test]
    fn test_unconfigured_bible_fails() {
        let dir = fixture_tree();
        let mut manifest = manifest();
        manifest.initial.version_id = "web".to_string();
        let err = generate_code(dir.path(), &manifest).unwrap_err();
        assert!(err.to_string().contains("no hashes configured"));
    }
}
