//! Persistent statement history with fuzzy search.
//!
//! History lives in `history.json` under the config directory as a
//! versioned document. Saves are atomic (write to a temp file, then rename)
//! so a crash mid-write cannot eat the existing history.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use nucleo_matcher::{
    pattern::{CaseMatching, Normalization, Pattern},
    Config, Matcher, Utf32Str,
};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config;

const HISTORY_VERSION: u32 = 1;

/// One executed statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub statement: String,
    pub timestamp: DateTime<Utc>,
    /// Connection name or database target the statement ran against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl HistoryEntry {
    pub fn new(statement: impl Into<String>, database: Option<String>) -> HistoryEntry {
        HistoryEntry {
            statement: statement.into(),
            timestamp: Utc::now(),
            database,
        }
    }
}

/// On-disk document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistoryFile {
    version: u32,
    entries: Vec<HistoryEntry>,
}

/// A search hit: the entry plus where and how well the pattern matched.
#[derive(Debug, Clone)]
pub struct HistoryMatch {
    /// Position in the underlying entry list.
    pub index: usize,
    pub entry: HistoryEntry,
    pub score: u32,
    /// Matched character positions, for highlighting.
    pub indices: Vec<u32>,
}

/// In-memory statement history bound to its file. Dropping it saves any
/// unsaved entries.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    max_entries: usize,
    path: PathBuf,
    dirty: bool,
}

impl History {
    /// Loads history from the default location. With no determinable config
    /// directory the history is in-memory only.
    pub fn load(max_entries: usize) -> Result<History> {
        match config::history_path() {
            Some(path) => History::load_from_path(path, max_entries),
            None => Ok(History::new_empty(max_entries)),
        }
    }

    /// Loads history from a specific file; a missing file is an empty
    /// history. Entries beyond `max_entries` are dropped oldest-first.
    pub fn load_from_path(path: PathBuf, max_entries: usize) -> Result<History> {
        if !path.exists() {
            return Ok(History {
                entries: Vec::new(),
                max_entries,
                path,
                dirty: false,
            });
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;
        let file: HistoryFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse history file: {}", path.display()))?;
        let mut entries = file.entries;
        if entries.len() > max_entries {
            entries.drain(..entries.len() - max_entries);
        }
        Ok(History {
            entries,
            max_entries,
            path,
            dirty: false,
        })
    }

    /// An empty history with no backing file; saves are no-ops.
    pub fn new_empty(max_entries: usize) -> History {
        History {
            entries: Vec::new(),
            max_entries,
            path: PathBuf::new(),
            dirty: false,
        }
    }

    /// Appends a statement. Blank statements and an immediate repeat of the
    /// previous statement are skipped; the oldest entries give way once
    /// `max_entries` is reached.
    pub fn push(&mut self, statement: &str, database: Option<String>) {
        let trimmed = statement.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.entries.last().is_some_and(|e| e.statement == trimmed) {
            return;
        }
        self.entries.push(HistoryEntry::new(trimmed, database));
        while self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        self.dirty = true;
    }

    /// Writes the history file if there is anything unsaved.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty || self.path.as_os_str().is_empty() {
            return Ok(());
        }
        let file = HistoryFile {
            version: HISTORY_VERSION,
            entries: self.entries.clone(),
        };
        let content = serde_json::to_string_pretty(&file).context("Failed to serialize history")?;

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create history directory: {}", parent.display()))?;
        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
        tmp.write_all(content.as_bytes())
            .context("Failed to write history")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace history file: {}", self.path.display()))?;
        self.dirty = false;
        Ok(())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fuzzy-searches the history. An empty pattern returns everything,
    /// newest first; otherwise matches come back best score first.
    pub fn search(&self, pattern: &str) -> Vec<HistoryMatch> {
        if pattern.trim().is_empty() {
            return self
                .entries
                .iter()
                .enumerate()
                .rev()
                .map(|(index, entry)| HistoryMatch {
                    index,
                    entry: entry.clone(),
                    score: 0,
                    indices: Vec::new(),
                })
                .collect();
        }

        let mut matcher = Matcher::new(Config::DEFAULT);
        let pat = Pattern::parse(pattern, CaseMatching::Ignore, Normalization::Smart);

        let mut matches = Vec::new();
        let mut buf = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            buf.clear();
            let haystack = Utf32Str::new(&entry.statement, &mut buf);
            let mut indices = Vec::new();
            if let Some(score) = pat.indices(haystack, &mut matcher, &mut indices) {
                matches.push(HistoryMatch {
                    index,
                    entry: entry.clone(),
                    score,
                    indices,
                });
            }
        }
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }
}

impl Drop for History {
    fn drop(&mut self) {
        let _ = self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_at(dir: &Path) -> History {
        History::load_from_path(dir.join("history.json"), 100).unwrap()
    }

    #[test]
    fn test_push_and_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let mut history = history_at(tmp.path());
        history.push("SELECT 1", None);
        history.push("SELECT 2", Some("dev".to_string()));
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].statement, "SELECT 1");
        assert_eq!(history.entries()[1].database.as_deref(), Some("dev"));
    }

    #[test]
    fn test_push_skips_blank_statements() {
        let tmp = tempfile::tempdir().unwrap();
        let mut history = history_at(tmp.path());
        history.push("", None);
        history.push("   \n ", None);
        assert!(history.is_empty());
    }

    #[test]
    fn test_push_skips_consecutive_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        let mut history = history_at(tmp.path());
        history.push("SELECT 1", None);
        history.push("SELECT 1", None);
        history.push("SELECT 2", None);
        history.push("SELECT 1", None);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_push_caps_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let mut history = History::load_from_path(tmp.path().join("history.json"), 3).unwrap();
        for i in 0..5 {
            history.push(&format!("SELECT {i}"), None);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[0].statement, "SELECT 2");
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("history.json");
        let mut history = History::load_from_path(path.clone(), 100).unwrap();
        history.push("SELECT 1", Some("dev".to_string()));
        history.save().unwrap();

        let reloaded = History::load_from_path(path, 100).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.entries()[0].statement, "SELECT 1");
        assert_eq!(reloaded.entries()[0].database.as_deref(), Some("dev"));
    }

    #[test]
    fn test_reload_caps_to_max_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("history.json");
        let mut history = History::load_from_path(path.clone(), 100).unwrap();
        for i in 0..5 {
            history.push(&format!("SELECT {i}"), None);
        }
        history.save().unwrap();

        let reloaded = History::load_from_path(path, 2).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.entries()[0].statement, "SELECT 3");
    }

    #[test]
    fn test_clean_history_is_not_written() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("history.json");
        let mut history = History::load_from_path(path.clone(), 100).unwrap();
        history.save().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_save_marks_entries_as_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("history.json");
        {
            let mut history = History::load_from_path(path.clone(), 100).unwrap();
            history.push("SELECT 1", None);
            history.save().unwrap();
            fs::remove_file(&path).unwrap();
        }
        // Drop has nothing left to save, so the file stays gone.
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_saves_unsaved_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("history.json");
        {
            let mut history = History::load_from_path(path.clone(), 100).unwrap();
            history.push("SELECT 1", None);
        }
        let reloaded = History::load_from_path(path, 100).unwrap();
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("history.json");
        fs::write(&path, "not json at all").unwrap();
        assert!(History::load_from_path(path, 100).is_err());
    }

    #[test]
    fn test_search_empty_pattern_returns_all_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let mut history = history_at(tmp.path());
        history.push("SELECT 1", None);
        history.push("SELECT 2", None);
        let matches = history.search("");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].entry.statement, "SELECT 2");
        assert_eq!(matches[1].entry.statement, "SELECT 1");
    }

    #[test]
    fn test_search_fuzzy_matches() {
        let tmp = tempfile::tempdir().unwrap();
        let mut history = history_at(tmp.path());
        history.push("SELECT * FROM users", None);
        history.push("UPDATE orders SET total = 0", None);
        history.push("select name from users where id = 1", None);

        let matches = history.search("users");
        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert!(m.entry.statement.to_lowercase().contains("users"));
            assert!(!m.indices.is_empty());
        }
    }

    #[test]
    fn test_search_no_matches() {
        let tmp = tempfile::tempdir().unwrap();
        let mut history = history_at(tmp.path());
        history.push("SELECT 1", None);
        assert!(history.search("zzzqqq").is_empty());
    }
}
