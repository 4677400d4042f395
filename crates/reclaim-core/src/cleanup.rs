/// Deletion executor — batched, reversible, failure-tolerant.
///
/// Deletion is strictly "move to trash", never a permanent unlink:
/// this engine is destructive by design, so every removal must stay
/// reversible through the OS trash. Items are processed sequentially
/// so progress is exact and the order of partial failures is
/// reproducible; one locked or vanished file never aborts the batch.
///
/// After a batch the caller should prune the successfully-deleted
/// paths from its result set (`model::prune_categories`,
/// `analysis::duplicates::prune_deleted`) and invalidate them on the
/// shared sizer so directory totals are recomputed.
use std::path::PathBuf;
use tracing::warn;

/// Aggregate outcome of one deletion batch. Partial failure is data,
/// not an error — this function never raises.
#[derive(Debug, Clone, Default)]
pub struct DeletionResult {
    pub success: usize,
    pub failed: usize,
    /// One human-readable message per failed item, in batch order.
    pub errors: Vec<String>,
    /// Exactly the paths that reached the trash, for pruning.
    pub deleted: Vec<PathBuf>,
}

/// Move every path to the trash, invoking `on_progress(done, total)`
/// after each item.
pub fn move_to_trash(
    paths: &[PathBuf],
    mut on_progress: impl FnMut(usize, usize),
) -> DeletionResult {
    let total = paths.len();
    let mut result = DeletionResult::default();

    for (idx, path) in paths.iter().enumerate() {
        match trash::delete(path) {
            Ok(()) => {
                result.success += 1;
                result.deleted.push(path.clone());
            }
            Err(err) => {
                warn!("failed to trash {}: {err}", path.display());
                result.failed += 1;
                result.errors.push(format!("{}: {err}", path.display()));
            }
        }
        on_progress(idx + 1, total);
    }

    result
}
