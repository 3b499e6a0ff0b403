use std::path::PathBuf;

/// Kind of a staged top-level entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One top-level entry copied into the target directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size_bytes: u64,
}

/// Outcome of a successful staging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub cache_path: PathBuf,
    pub target_dir: PathBuf,
    pub copied: Vec<StagedEntry>,
    /// Cache entries that were neither file nor directory
    pub skipped: Vec<String>,
    /// Stale entries removed from the target before copying
    pub removed: usize,
}

impl StageReport {
    /// Nothing was copied (empty cache directory)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.copied.is_empty()
    }

    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.copied.iter().map(|e| e.size_bytes).sum()
    }
}

/// Format bytes as human-readable string
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
