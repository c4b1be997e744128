use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("seen-releases file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable record of release ids that have already been processed. The set
/// only grows; there is no delete or compaction.
pub trait SeenStore {
    /// Loads the full set. A missing backing file is an empty set, not an
    /// error.
    fn load(&self) -> Result<HashSet<String>, StoreError>;

    /// Appends one id. The caller is responsible for not marking the same
    /// id twice within a run; duplicate lines across runs collapse on load.
    fn mark_seen(&mut self, release_id: &str) -> Result<(), StoreError>;
}

/// Plain-text store: one release id per line, UTF-8, append-only.
#[derive(Debug, Clone)]
pub struct FileSeenStore {
    path: PathBuf,
}

impl FileSeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeenStore for FileSeenStore {
    fn load(&self) -> Result<HashSet<String>, StoreError> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(content
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    fn mark_seen(&mut self, release_id: &str) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{release_id}")?;
        Ok(())
    }
}

/// In-process store with no persistence. Used by tests and usable as a
/// dry-run store.
#[derive(Debug, Clone, Default)]
pub struct MemorySeenStore {
    marked: Vec<String>,
}

impl MemorySeenStore {
    pub fn with_seen(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            marked: ids.into_iter().collect(),
        }
    }

    pub fn marked(&self) -> &[String] {
        &self.marked
    }
}

impl SeenStore for MemorySeenStore {
    fn load(&self) -> Result<HashSet<String>, StoreError> {
        Ok(self.marked.iter().cloned().collect())
    }

    fn mark_seen(&mut self, release_id: &str) -> Result<(), StoreError> {
        self.marked.push(release_id.to_string());
        Ok(())
    }
}
