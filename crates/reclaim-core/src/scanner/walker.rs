/// Cancellable directory traversal.
///
/// The walker is deliberately sequential: the cancellation contract
/// (token checked before every directory and after every child) and the
/// symlink-cycle ancestry check need per-entry control that a parallel
/// walk does not give. Bulk subtree sizing, which has no per-entry
/// contract, goes through [`super::sizing::DirSizer`] instead.
///
/// Behaviour:
/// - Files are emitted pre-order with their lstat size; directories
///   post-order, carrying the accumulated size of their subtree.
/// - Unreadable entries are recorded in [`WalkStats::errors`] and
///   skipped; a single bad child never aborts the walk.
/// - Hidden (dot-prefixed) entries are never emitted, but their sizes
///   still count toward directory totals.
/// - Symlinks are not followed unless [`WalkPolicy::follow_symlinks`]
///   is set, and then only when the resolved target is not an ancestor
///   already on the walk stack (real-path ancestry, not names).
use crate::model::ScanEntry;
use crate::scanner::ScanToken;
use std::fs;
use std::path::{Path, PathBuf};

/// Traversal options.
#[derive(Debug, Clone)]
pub struct WalkPolicy {
    /// Follow symlinked directories (with cycle protection). Off by
    /// default: a link's own lstat entry is reported instead.
    pub follow_symlinks: bool,
    /// Emit hidden entries too. Their sizes are always counted.
    pub emit_hidden: bool,
}

impl Default for WalkPolicy {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            emit_hidden: false,
        }
    }
}

/// One unreadable entry, recorded instead of raised.
#[derive(Debug, Clone)]
pub struct WalkError {
    pub path: PathBuf,
    pub message: String,
}

/// Totals for one walk. A cancelled walk returns the partial totals
/// accumulated so far — that is expected, not an error.
#[derive(Debug, Default)]
pub struct WalkStats {
    pub files: u64,
    pub dirs: u64,
    /// Sum of file sizes seen (directory entries are not re-counted).
    pub total_size: u64,
    pub errors: Vec<WalkError>,
    /// Symlinks skipped because they resolved into an ancestor.
    pub cycles_skipped: u64,
}

impl WalkStats {
    fn record(&mut self, path: &Path, err: &std::io::Error) {
        self.errors.push(WalkError {
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }
}

/// Whether the final component is dot-prefixed.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Walk `root`, invoking `on_entry` for every visible entry beneath it
/// (the root itself is not emitted). Stops promptly when `token` goes
/// dead and returns whatever was accumulated.
pub fn walk(
    root: &Path,
    token: &ScanToken,
    policy: &WalkPolicy,
    on_entry: &mut dyn FnMut(ScanEntry),
) -> WalkStats {
    let mut stats = WalkStats::default();
    if !token.is_live() {
        return stats;
    }

    // Ancestry of canonical paths for cycle detection. Canonicalisation
    // of the root can fail (dangling root); the walk then proceeds
    // without an anchor and read_dir reports the real error below.
    let mut ancestry: Vec<PathBuf> = Vec::new();
    if let Ok(canonical) = fs::canonicalize(root) {
        ancestry.push(canonical);
    }

    walk_dir(
        root,
        token,
        policy,
        on_entry,
        &mut ancestry,
        &mut stats,
        true,
    );
    stats
}

/// Recurse into `dir`, returning the subtree's file-size total.
///
/// `emitting` is false inside hidden subtrees: sizes still accumulate,
/// entries are not reported.
fn walk_dir(
    dir: &Path,
    token: &ScanToken,
    policy: &WalkPolicy,
    on_entry: &mut dyn FnMut(ScanEntry),
    ancestry: &mut Vec<PathBuf>,
    stats: &mut WalkStats,
    emitting: bool,
) -> u64 {
    let reader = match fs::read_dir(dir) {
        Ok(reader) => reader,
        Err(err) => {
            stats.record(dir, &err);
            return 0;
        }
    };

    let mut subtree_size = 0u64;

    for entry_result in reader {
        // The cancellation contract: checked after every child.
        if !token.is_live() {
            return subtree_size;
        }

        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                stats.record(dir, &err);
                continue;
            }
        };
        let path = entry.path();

        let meta = match fs::symlink_metadata(&path) {
            Ok(meta) => meta,
            Err(err) => {
                // Vanished mid-scan or unreadable — skip, keep going.
                stats.record(&path, &err);
                continue;
            }
        };

        let emit_this = emitting && (policy.emit_hidden || !is_hidden(&path));
        let file_type = meta.file_type();

        if file_type.is_dir() {
            if !token.is_live() {
                return subtree_size;
            }
            stats.dirs += 1;
            let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
            ancestry.push(canonical);
            let size = walk_dir(&path, token, policy, on_entry, ancestry, stats, emit_this);
            ancestry.pop();
            subtree_size += size;
            // Post-order emission is guarded too: once the token dies,
            // the unwinding ancestor chain must stay silent.
            if emit_this && token.is_live() {
                on_entry(ScanEntry::new(path, size, true, meta.modified().ok()));
            }
        } else if file_type.is_symlink() && policy.follow_symlinks {
            match fs::canonicalize(&path) {
                Ok(target) if target.is_dir() => {
                    // Never re-enter a directory already on the walk
                    // stack: that symlink forms a cycle.
                    if ancestry.iter().any(|a| a.starts_with(&target)) {
                        stats.cycles_skipped += 1;
                        continue;
                    }
                    if !token.is_live() {
                        return subtree_size;
                    }
                    stats.dirs += 1;
                    ancestry.push(target);
                    let size =
                        walk_dir(&path, token, policy, on_entry, ancestry, stats, emit_this);
                    ancestry.pop();
                    subtree_size += size;
                    if emit_this && token.is_live() {
                        on_entry(ScanEntry::new(path, size, true, meta.modified().ok()));
                    }
                }
                Ok(_) => {
                    // Symlink to a file: report the target's size.
                    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                    stats.files += 1;
                    stats.total_size += size;
                    subtree_size += size;
                    if emit_this {
                        on_entry(ScanEntry::new(path, size, false, meta.modified().ok()));
                    }
                }
                Err(err) => {
                    // Broken symlink.
                    stats.record(&path, &err);
                }
            }
        } else {
            // Regular file, or an unfollowed symlink reported as-is.
            let size = meta.len();
            stats.files += 1;
            stats.total_size += size;
            subtree_size += size;
            if emit_this {
                on_entry(ScanEntry::new(path, size, false, meta.modified().ok()));
            }
        }
    }

    subtree_size
}
