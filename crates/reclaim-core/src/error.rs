/// Fatal engine errors.
///
/// Only conditions that prevent a scan from *starting* live here (the
/// canonical example is failing to resolve the user's home directory).
/// Per-item failures during a scan — permission denied, vanished files,
/// broken symlinks — are data, carried in `WalkStats`/`ScanEvent`, and
/// never surface as an `Err`.
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not resolve the user home directory")]
    HomeDirUnavailable,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
