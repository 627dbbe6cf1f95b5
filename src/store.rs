// 🗄️ Record Store
// Line-oriented storage port consumed by the record service, plus the
// in-memory and flat-file backends.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Storage for raw person and demerit lines.
///
/// There is no partial update: callers read every person line, change what
/// they need and write the whole collection back. Nothing here coordinates
/// concurrent writers; one mutation at a time per backing store.
pub trait RecordStore: Send + Sync {
    /// Append one serialized person line
    fn append_person(&self, line: &str) -> Result<()>;

    /// Every person line in stored order
    fn read_all_persons(&self) -> Result<Vec<String>>;

    /// Replace the whole person collection
    fn write_all_persons(&self, lines: &[String]) -> Result<()>;

    /// Append one serialized demerit line
    fn append_demerit(&self, line: &str) -> Result<()>;

    /// Every demerit line in stored order
    fn read_all_demerits(&self) -> Result<Vec<String>>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Vector-backed store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    persons: RwLock<Vec<String>>,
    demerits: RwLock<Vec<String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing lines, e.g. to exercise malformed content
    pub fn with_lines(persons: Vec<String>, demerits: Vec<String>) -> Self {
        MemoryRecordStore {
            persons: RwLock::new(persons),
            demerits: RwLock::new(demerits),
        }
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow::anyhow!("record store lock poisoned")
}

impl RecordStore for MemoryRecordStore {
    fn append_person(&self, line: &str) -> Result<()> {
        self.persons.write().map_err(poisoned)?.push(line.to_string());
        Ok(())
    }

    fn read_all_persons(&self) -> Result<Vec<String>> {
        Ok(self.persons.read().map_err(poisoned)?.clone())
    }

    fn write_all_persons(&self, lines: &[String]) -> Result<()> {
        *self.persons.write().map_err(poisoned)? = lines.to_vec();
        Ok(())
    }

    fn append_demerit(&self, line: &str) -> Result<()> {
        self.demerits.write().map_err(poisoned)?.push(line.to_string());
        Ok(())
    }

    fn read_all_demerits(&self) -> Result<Vec<String>> {
        Ok(self.demerits.read().map_err(poisoned)?.clone())
    }
}

// ============================================================================
// FLAT-FILE STORE
// ============================================================================

/// One record per line in two text files.
///
/// Files are created on first append. A missing persons file cannot be read
/// (there is nothing to amend yet); a missing demerits file reads as empty.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    persons_path: PathBuf,
    demerits_path: PathBuf,
}

impl FileRecordStore {
    pub fn new(persons_path: impl Into<PathBuf>, demerits_path: impl Into<PathBuf>) -> Self {
        FileRecordStore {
            persons_path: persons_path.into(),
            demerits_path: demerits_path.into(),
        }
    }

    pub fn persons_path(&self) -> &Path {
        &self.persons_path
    }

    pub fn demerits_path(&self) -> &Path {
        &self.demerits_path
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {:?} for append", path))?;
    writeln!(file, "{}", line).with_context(|| format!("Failed to append to {:?}", path))?;
    debug!(path = %path.display(), "appended line");
    Ok(())
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(content.lines().map(str::to_string).collect())
}

impl RecordStore for FileRecordStore {
    fn append_person(&self, line: &str) -> Result<()> {
        append_line(&self.persons_path, line)
    }

    fn read_all_persons(&self) -> Result<Vec<String>> {
        read_lines(&self.persons_path)
    }

    fn write_all_persons(&self, lines: &[String]) -> Result<()> {
        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(&self.persons_path, content)
            .with_context(|| format!("Failed to rewrite {:?}", self.persons_path))?;
        debug!(path = %self.persons_path.display(), lines = lines.len(), "rewrote persons");
        Ok(())
    }

    fn append_demerit(&self, line: &str) -> Result<()> {
        append_line(&self.demerits_path, line)
    }

    fn read_all_demerits(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.demerits_path) {
            Ok(content) => Ok(content.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read {:?}", self.demerits_path))
            }
        }
    }
}
