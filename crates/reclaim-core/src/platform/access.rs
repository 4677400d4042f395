/// Path access capability.
///
/// Sandboxed hosts gate filesystem access behind user-granted
/// permissions (security-scoped bookmarks and the like). The engine
/// stays portable by consulting an injected checker before touching a
/// scan root; the default implementation just asks the filesystem.
use std::fs;
use std::path::Path;

pub trait PathAccessChecker: Send + Sync {
    /// Whether the engine may read `path`. A `false` answer turns the
    /// root into a soft error rather than a crashed scan.
    fn can_read(&self, path: &Path) -> bool;
}

/// Checker backed by plain filesystem probes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsAccessChecker;

impl PathAccessChecker for FsAccessChecker {
    fn can_read(&self, path: &Path) -> bool {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => fs::read_dir(path).is_ok(),
            Ok(_) => fs::File::open(path).is_ok(),
            Err(_) => false,
        }
    }
}
