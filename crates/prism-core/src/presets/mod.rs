//! Prompt presets: bracket-delimited text files plus builtin fallbacks.
//!
//! A preset file is a sequence of blocks:
//!
//! ```text
//! [Cinematic]
//! Expand the idea into a detailed video prompt.
//! Mention camera movement.
//!
//! [Short]
//! Keep it to one sentence.
//! ```
//!
//! Files are re-read on every load so edits show up on the next invocation.

mod builtin;
mod resolve;

pub use builtin::{builtin_image_presets, builtin_text_presets};
pub use resolve::{resolve_prompt, PromptSource, ResolvedPrompt};

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Preset name to prompt body, in file order.
pub type PresetMap = IndexMap<String, String>;

/// A preset file paired with the builtin presets used when it is unusable.
#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
    builtin: PresetMap,
}

impl PresetStore {
    pub fn new(path: impl Into<PathBuf>, builtin: PresetMap) -> Self {
        Self {
            path: path.into(),
            builtin,
        }
    }

    /// Store for text-expansion system prompts.
    pub fn text(path: impl Into<PathBuf>) -> Self {
        Self::new(path, builtin_text_presets())
    }

    /// Store for image-description prompts.
    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self::new(path, builtin_image_presets())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn builtin(&self) -> &PresetMap {
        &self.builtin
    }

    /// Read the file now, falling back to the builtin presets.
    pub fn load(&self) -> PresetMap {
        load_presets(&self.path, &self.builtin)
    }
}

/// Load presets from `path`, or return `builtin` if the file is missing,
/// unreadable, or contains no usable block.
pub fn load_presets(path: &Path, builtin: &PresetMap) -> PresetMap {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if !path.exists() {
        tracing::warn!("Preset file '{file_name}' does not exist, using builtin presets");
        return builtin.clone();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("Failed to read preset file '{file_name}': {e}. Using builtin presets");
            return builtin.clone();
        }
    };

    let presets = parse_presets(&content);
    if presets.is_empty() {
        tracing::warn!(
            "Preset file '{file_name}' is empty or malformed, using builtin presets"
        );
        return builtin.clone();
    }

    tracing::debug!("Loaded {} presets from '{file_name}'", presets.len());
    presets
}

/// Parse bracket-delimited preset text.
///
/// Lines are trimmed and blank lines dropped. Blocks with an empty name or an
/// empty body are skipped; a repeated name replaces the earlier body.
pub fn parse_presets(content: &str) -> PresetMap {
    let mut presets = PresetMap::new();
    let mut current: Option<String> = None;
    let mut body: Vec<&str> = Vec::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        if let Some(name) = header_name(line) {
            flush(&mut presets, current.take(), &mut body);
            current = Some(name.to_string());
        } else if current.is_some() {
            body.push(line);
        }
    }
    flush(&mut presets, current, &mut body);

    presets
}

/// `[name]` -> `name` (trimmed). Anything else is body text.
fn header_name(line: &str) -> Option<&str> {
    if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
        Some(line[1..line.len() - 1].trim())
    } else {
        None
    }
}

fn flush(presets: &mut PresetMap, name: Option<String>, body: &mut Vec<&str>) {
    if let Some(name) = name {
        if !name.is_empty() && !body.is_empty() {
            presets.insert(name, body.join("\n").trim().to_string());
        }
    }
    body.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> PresetMap {
        let mut map = PresetMap::new();
        map.insert("fallback".to_string(), "builtin body".to_string());
        map
    }

    #[test]
    fn test_parse_two_blocks() {
        let presets = parse_presets("[A]\nhello\n[B]\nworld");
        assert_eq!(presets.len(), 2);
        assert_eq!(presets["A"], "hello");
        assert_eq!(presets["B"], "world");
    }

    #[test]
    fn test_parse_preserves_file_order() {
        let presets = parse_presets("[zeta]\n1\n[alpha]\n2\n[mid]\n3\n");
        let keys: Vec<&str> = presets.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_multiline_body_drops_blank_lines() {
        let presets = parse_presets("[ Story ]\n  first line  \n\n   \nsecond line\n");
        assert_eq!(presets["Story"], "first line\nsecond line");
    }

    #[test]
    fn test_parse_ignores_preamble() {
        let presets = parse_presets("preamble text\nmore\n[only]\nbody\n");
        assert_eq!(presets.len(), 1);
        assert_eq!(presets["only"], "body");
    }

    #[test]
    fn test_parse_skips_empty_name_and_empty_body() {
        let presets = parse_presets("[]\norphan\n[empty]\n[full]\ncontent\n");
        assert_eq!(presets.len(), 1);
        assert_eq!(presets["full"], "content");
    }

    #[test]
    fn test_parse_repeated_name_overwrites() {
        let presets = parse_presets("[a]\none\n[b]\ntwo\n[a]\nthree\n");
        assert_eq!(presets["a"], "three");
        assert_eq!(presets.get_index(0).map(|(k, _)| k.as_str()), Some("a"));
    }

    #[test]
    fn test_bracket_inside_text_is_body() {
        let presets = parse_presets("[a]\nuse [brackets] inline\n");
        assert_eq!(presets["a"], "use [brackets] inline");
    }

    #[test]
    fn test_load_missing_file_returns_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let presets = load_presets(&dir.path().join("nope.txt"), &builtin());
        assert_eq!(presets, builtin());
    }

    #[test]
    fn test_load_empty_or_malformed_returns_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "").unwrap();
        assert_eq!(load_presets(&empty, &builtin()), builtin());

        let malformed = dir.path().join("malformed.txt");
        std::fs::write(&malformed, "no headers here\njust text\n").unwrap();
        assert_eq!(load_presets(&malformed, &builtin()), builtin());
    }

    #[test]
    fn test_store_rereads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text_prompts.txt");
        std::fs::write(&path, "[first]\none\n").unwrap();

        let store = PresetStore::new(&path, builtin());
        assert_eq!(store.load().len(), 1);

        std::fs::write(&path, "[first]\none\n[second]\ntwo\n").unwrap();
        assert_eq!(store.load().len(), 2);
    }
}
