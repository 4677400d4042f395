/// Scan result types.
///
/// A [`ScanEntry`] is immutable once emitted by the walker; the result
/// containers below are rebuilt from scratch on every scan and never
/// mutated across scans. After a successful deletion the caller prunes
/// the affected entries immediately so nothing is ever listed in a
/// "deleted but still shown" state.
use crate::classify::{self, CleanupCategory, FileKind};
use compact_str::CompactString;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One filesystem entry as reported by a scan.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    /// Absolute path.
    pub path: PathBuf,
    /// File or directory name only.
    pub name: CompactString,
    /// File size in bytes; for directories, the recursive subtree size.
    pub size: u64,
    pub is_dir: bool,
    /// Last-modified timestamp where the filesystem provides one.
    pub modified: Option<SystemTime>,
    /// File-type bucket. Directories bucket as `Other`.
    pub kind: FileKind,
}

impl ScanEntry {
    pub fn new(path: PathBuf, size: u64, is_dir: bool, modified: Option<SystemTime>) -> Self {
        let name = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_else(|| CompactString::new(path.to_string_lossy()));
        let kind = if is_dir {
            FileKind::Other
        } else {
            classify::file_kind(&path)
        };
        Self {
            path,
            name,
            size,
            is_dir,
            modified,
            kind,
        }
    }
}

/// A cleanable entry with its selection state.
#[derive(Debug, Clone)]
pub struct CleanableItem {
    pub entry: ScanEntry,
    pub selected: bool,
}

/// A named group of cleanable items; aggregate size is the sum of its
/// children and is kept in step by the pruning helpers.
#[derive(Debug, Clone)]
pub struct CleanableCategory {
    pub category: CleanupCategory,
    pub items: Vec<CleanableItem>,
    pub total_size: u64,
}

impl CleanableCategory {
    pub fn new(category: CleanupCategory, items: Vec<CleanableItem>) -> Self {
        let total_size = items.iter().map(|i| i.entry.size).sum();
        Self {
            category,
            items,
            total_size,
        }
    }

    pub fn selected_size(&self) -> u64 {
        self.items
            .iter()
            .filter(|i| i.selected)
            .map(|i| i.entry.size)
            .sum()
    }

    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.items
            .iter()
            .filter(|i| i.selected)
            .map(|i| i.entry.path.clone())
            .collect()
    }

    /// Drop one item by path. Returns whether anything was removed.
    pub fn remove_item(&mut self, path: &Path) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.entry.path != path);
        let removed = self.items.len() != before;
        if removed {
            self.total_size = self.items.iter().map(|i| i.entry.size).sum();
        }
        removed
    }
}

/// Remove successfully-deleted paths from a cleanup result set and drop
/// categories that end up empty.
pub fn prune_categories(categories: &mut Vec<CleanableCategory>, deleted: &[PathBuf]) {
    for category in categories.iter_mut() {
        for path in deleted {
            category.remove_item(path);
        }
    }
    categories.retain(|c| !c.items.is_empty());
}
