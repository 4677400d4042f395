/// Platform integration — well-known directory resolution and path
/// access checks.
///
/// Everything OS-specific the engine needs is concentrated here so the
/// scanning and analysis code stays portable.
pub mod access;
pub mod dirs;

pub use access::{FsAccessChecker, PathAccessChecker};
pub use dirs::KnownDirs;
