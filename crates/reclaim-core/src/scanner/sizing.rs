/// Memoized subtree sizing.
///
/// Cleanup, listing, and uninstaller scans all need "how big is this
/// directory, recursively" — often for the same subtrees, repeatedly
/// (expand/collapse in a UI re-asks constantly). [`DirSizer`] memoizes
/// by absolute path behind a mutex so concurrent scan lines share one
/// cache safely.
///
/// The traversal itself runs `jwalk` serially per call: callers size
/// many sibling items from a rayon `par_iter`, and nesting a thread
/// pool per item would oversubscribe the machine.
use jwalk::WalkDir;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared, cloneable size cache. Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct DirSizer {
    cache: Arc<Mutex<HashMap<PathBuf, u64>>>,
}

impl DirSizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of a file, or the recursive file-size total of a directory.
    /// Unreadable paths size as 0 — sizing is best-effort by design;
    /// the walker is where unreadable entries get reported.
    pub fn size_of(&self, path: &Path) -> u64 {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(_) => return 0,
        };
        if !meta.is_dir() {
            return meta.len();
        }

        if let Some(&cached) = self.cache.lock().get(path) {
            return cached;
        }

        // Computed outside the lock: sizing a large subtree can take
        // seconds and other scan lines must not stall behind it.
        let size = subtree_size(path);
        self.cache.lock().insert(path.to_path_buf(), size);
        size
    }

    /// Evict `path`, everything cached beneath it, and every cached
    /// ancestor. Call after deleting an entry so stale totals are
    /// recomputed on next use.
    pub fn invalidate(&self, path: &Path) {
        let mut cache = self.cache.lock();
        cache.retain(|key, _| !(key.starts_with(path) || path.starts_with(key)));
    }

    /// Number of cached directory totals.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

/// Sum all file sizes beneath `path`, hidden files included.
fn subtree_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.metadata().ok())
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_bytes(path: &Path, n: usize) {
        let mut f = File::create(path).unwrap();
        f.write_all(&vec![0u8; n]).unwrap();
    }

    #[test]
    fn sizes_files_and_subtrees() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let sub = tmp.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write_bytes(&tmp.path().join("a.bin"), 100);
        write_bytes(&sub.join("b.bin"), 200);
        // Hidden files count toward the aggregate.
        write_bytes(&sub.join(".hidden"), 50);

        let sizer = DirSizer::new();
        assert_eq!(sizer.size_of(&tmp.path().join("a.bin")), 100);
        assert_eq!(sizer.size_of(&sub), 250);
        assert_eq!(sizer.size_of(tmp.path()), 350);
    }

    /// The memo cache serves stale totals until invalidated — that is
    /// the contract, not a bug.
    #[test]
    fn memoizes_until_invalidated() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        write_bytes(&tmp.path().join("a.bin"), 100);

        let sizer = DirSizer::new();
        assert_eq!(sizer.size_of(tmp.path()), 100);

        write_bytes(&tmp.path().join("b.bin"), 900);
        assert_eq!(sizer.size_of(tmp.path()), 100, "served from cache");

        sizer.invalidate(tmp.path());
        assert_eq!(sizer.size_of(tmp.path()), 1_000);
    }

    #[test]
    fn invalidate_evicts_ancestors_and_descendants() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let sub = tmp.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write_bytes(&sub.join("b.bin"), 200);

        let sizer = DirSizer::new();
        sizer.size_of(tmp.path());
        sizer.size_of(&sub);
        assert_eq!(sizer.cached_len(), 2);

        sizer.invalidate(&sub.join("b.bin"));
        assert_eq!(sizer.cached_len(), 0, "both ancestors evicted");
    }

    #[test]
    fn missing_path_sizes_as_zero() {
        let sizer = DirSizer::new();
        assert_eq!(sizer.size_of(Path::new("/definitely/not/here")), 0);
    }

    #[test]
    fn clones_share_one_cache() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        write_bytes(&tmp.path().join("a.bin"), 100);

        let sizer = DirSizer::new();
        let clone = sizer.clone();
        sizer.size_of(tmp.path());
        assert_eq!(clone.cached_len(), 1);
    }
}
