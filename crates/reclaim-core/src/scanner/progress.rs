/// Scan event reporting — lightweight messages sent from the scan
/// thread to the consumer via a crossbeam channel.
///
/// Events are delivered on the worker thread that owns the scan; the
/// caller is responsible for redispatching to its own UI context.
use crate::analysis::duplicates::DuplicateGroup;
use crate::model::{CleanableCategory, ScanEntry};
use crate::scanner::Generation;
use std::path::PathBuf;
use std::time::Duration;

/// Running totals for one scan, delivered with the terminal event.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub files: u64,
    pub dirs: u64,
    pub total_size: u64,
    pub soft_errors: u64,
    pub duration: Duration,
}

/// Events published by a scan, in order. Result payloads are only ever
/// appended, never reordered or retracted; `fraction` is monotonically
/// non-decreasing in `[0, 1]` and may plateau during one large subtree.
#[derive(Debug)]
pub enum ScanEvent {
    /// The scan thread is up and its generation is current.
    Started { generation: Generation },
    /// Progress heartbeat: a human-readable "currently scanning" label
    /// plus the overall fraction.
    Scanning { label: String, fraction: f64 },
    /// One completed cleanup category (cleanup scans).
    Category(CleanableCategory),
    /// Files at or above the size threshold for one root (large-file scans).
    LargeFiles(Vec<ScanEntry>),
    /// The final duplicate grouping (duplicate scans).
    Duplicates(Vec<DuplicateGroup>),
    /// Immediate children of the requested directory (listing scans).
    Listing(Vec<ScanEntry>),
    /// A non-fatal error (e.g. permission denied on one entry).
    SoftError { path: PathBuf, message: String },
    /// Scanning completed. Fires exactly once per generation, and only
    /// if that generation is still current.
    Completed(ScanStats),
    /// The scan was stopped by the caller. Partial results already
    /// published remain valid; nothing follows this event.
    Cancelled,
}
