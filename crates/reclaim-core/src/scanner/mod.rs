/// Scanner module — cancellable scan orchestration.
///
/// One [`ScanCoordinator`] drives one *scan line* (cleanup, large
/// files, duplicates, directory listing). Lines are independent: each
/// owns its result stream exclusively; the only shared resource is the
/// size-memo cache inside [`ScanContext`], which is mutex-protected.
///
/// Cancellation is generational. Every `start` bumps the coordinator's
/// generation and hands the worker a [`ScanToken`] capturing it; the
/// token goes dead the moment a newer scan starts or `stop` is called,
/// and every emission is guarded by it — stale generations are
/// silently dropped, so two quick `start` calls can never interleave
/// their results.
pub mod progress;
pub mod sizing;
pub mod walker;

use crate::analysis::duplicates::{self, DuplicateGroup};
use crate::analysis::large_files::{sort_entries, SortOrder};
use crate::classify::CleanupCategory;
use crate::error::EngineError;
use crate::model::{CleanableCategory, CleanableItem, ScanEntry};
use crate::platform::{FsAccessChecker, KnownDirs, PathAccessChecker};
use progress::{ScanEvent, ScanStats};
use sizing::DirSizer;
use walker::{WalkPolicy, WalkStats};

use crossbeam_channel::{Receiver, Sender};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// Maximum number of events that may queue up in a session channel.
///
/// Events are coarse (per category / per root), so this is generous; if
/// a consumer stops draining entirely, the scan thread stalls on a full
/// channel rather than consuming unbounded heap, and exits as soon as
/// the receiver is dropped.
pub const EVENT_CHANNEL_CAPACITY: usize = 4_096;

/// Identifier of one logical scan run. Strictly increasing per
/// coordinator; at most one generation is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

/// Cancellation value handed to walkers and detectors.
///
/// A token is *live* while its generation is still the coordinator's
/// current one and no stop was requested. Checking it is the engine's
/// sole cancellation mechanism — nothing interrupts an in-flight
/// syscall, so cancellation latency is bounded by one traversal step.
#[derive(Clone)]
pub struct ScanToken {
    generation: u64,
    current: Arc<AtomicU64>,
    stop: Arc<AtomicBool>,
}

impl ScanToken {
    pub fn is_live(&self) -> bool {
        !self.stop.load(Ordering::Relaxed)
            && self.current.load(Ordering::Relaxed) == self.generation
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn is_current(&self) -> bool {
        self.current.load(Ordering::Relaxed) == self.generation
    }

    pub fn generation(&self) -> Generation {
        Generation(self.generation)
    }

    /// A free-standing token for driving the walker or detector outside
    /// a coordinator. Live until cancelled.
    pub fn detached() -> Self {
        Self {
            generation: 0,
            current: Arc::new(AtomicU64::new(0)),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Kill this token (detached use; coordinator scans go through
    /// [`ScanCoordinator::stop`]).
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Shared environment for all scan lines: the well-known directory
/// table, the shared size cache, and the path-access capability.
#[derive(Clone)]
pub struct ScanContext {
    pub dirs: KnownDirs,
    pub sizer: DirSizer,
    pub access: Arc<dyn PathAccessChecker>,
}

impl ScanContext {
    /// Build against the real home directory. The only fatal start-up
    /// failure lives here; everything later degrades to soft errors.
    pub fn discover() -> Result<Self, EngineError> {
        Ok(Self::new(KnownDirs::discover()?))
    }

    pub fn new(dirs: KnownDirs) -> Self {
        Self {
            dirs,
            sizer: DirSizer::new(),
            access: Arc::new(FsAccessChecker),
        }
    }

    pub fn with_access_checker(mut self, access: Arc<dyn PathAccessChecker>) -> Self {
        self.access = access;
        self
    }
}

/// What one scan run should do.
#[derive(Debug, Clone)]
pub enum ScanRequest {
    /// Scan the given cleanup categories, publishing one
    /// [`CleanableCategory`] batch per non-empty category.
    Cleanup { categories: Vec<CleanupCategory> },
    /// Walk the user content roots for files of at least `min_size`
    /// bytes, publishing per-root batches.
    LargeFiles { min_size: u64 },
    /// Collect candidate files from the content roots and group
    /// byte-identical ones. `min_size` bounds the candidate population
    /// (the detector itself only excludes zero-byte files).
    Duplicates { min_size: u64 },
    /// List the immediate children of one directory with recursive
    /// sizes — the disk-visualizer drill-down.
    DirectoryListing { path: PathBuf },
}

impl ScanRequest {
    /// The standard cleanup scan: every category except Trash.
    pub fn cleanup_default() -> Self {
        Self::Cleanup {
            categories: CleanupCategory::default_set(),
        }
    }
}

/// Lifecycle of the most recent scan on a coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Completed,
    Cancelled,
}

/// A running (or finished) scan: its generation and its event stream.
///
/// Events arrive on the scan's worker thread. Dropping the receiver is
/// a valid way to abandon a scan — the worker notices the closed
/// channel or its dead token and exits.
pub struct ScanSession {
    pub generation: Generation,
    pub events: Receiver<ScanEvent>,
}

/// Orchestrates one scan line. See the module docs for the generation
/// and ownership rules.
pub struct ScanCoordinator {
    ctx: ScanContext,
    current: Arc<AtomicU64>,
    state: Arc<parking_lot::Mutex<ScanState>>,
    active_stop: Option<Arc<AtomicBool>>,
}

impl ScanCoordinator {
    pub fn new(ctx: ScanContext) -> Self {
        Self {
            ctx,
            current: Arc::new(AtomicU64::new(0)),
            state: Arc::new(parking_lot::Mutex::new(ScanState::Idle)),
            active_stop: None,
        }
    }

    pub fn state(&self) -> ScanState {
        *self.state.lock()
    }

    /// Start a new scan, invalidating any in-flight one.
    pub fn start(&mut self, request: ScanRequest) -> ScanSession {
        let generation = self.current.fetch_add(1, Ordering::Relaxed) + 1;
        let stop = Arc::new(AtomicBool::new(false));
        self.active_stop = Some(stop.clone());
        *self.state.lock() = ScanState::Scanning;

        let token = ScanToken {
            generation,
            current: self.current.clone(),
            stop,
        };
        let (tx, rx) = crossbeam_channel::bounded::<ScanEvent>(EVENT_CHANNEL_CAPACITY);
        let ctx = self.ctx.clone();
        let state = self.state.clone();

        thread::Builder::new()
            .name("reclaim-scan".into())
            .spawn(move || run_scan(request, ctx, token, tx, state))
            .expect("failed to spawn scan thread");

        ScanSession {
            generation: Generation(generation),
            events: rx,
        }
    }

    /// Request cancellation of the in-flight scan. Already-published
    /// partial results are not rolled back — the caller decides whether
    /// to keep them. No-op when nothing is running.
    pub fn stop(&mut self) {
        if let Some(stop) = self.active_stop.take() {
            stop.store(true, Ordering::Relaxed);
            let mut state = self.state.lock();
            if *state == ScanState::Scanning {
                *state = ScanState::Cancelled;
            }
        }
    }
}

/// Send an event unless this generation has been invalidated.
fn emit(tx: &Sender<ScanEvent>, token: &ScanToken, event: ScanEvent) {
    if token.is_live() {
        let _ = tx.send(event);
    }
}

fn run_scan(
    request: ScanRequest,
    ctx: ScanContext,
    token: ScanToken,
    tx: Sender<ScanEvent>,
    state: Arc<parking_lot::Mutex<ScanState>>,
) {
    let start = Instant::now();
    info!(generation = token.generation, "starting scan");
    emit(
        &tx,
        &token,
        ScanEvent::Started {
            generation: token.generation(),
        },
    );

    let mut stats = ScanStats::default();
    match &request {
        ScanRequest::Cleanup { categories } => {
            run_cleanup(categories, &ctx, &token, &tx, &mut stats)
        }
        ScanRequest::LargeFiles { min_size } => {
            run_large_files(*min_size, &ctx, &token, &tx, &mut stats)
        }
        ScanRequest::Duplicates { min_size } => {
            run_duplicates(*min_size, &ctx, &token, &tx, &mut stats)
        }
        ScanRequest::DirectoryListing { path } => {
            run_listing(path, &ctx, &token, &tx, &mut stats)
        }
    }
    stats.duration = start.elapsed();

    // Terminal transition. Completion fires only while the generation
    // is still current; a superseded scan dies silently, a stopped one
    // acknowledges with Cancelled.
    if token.is_live() {
        debug!(
            generation = token.generation,
            files = stats.files,
            errors = stats.soft_errors,
            "scan complete in {:?}",
            stats.duration
        );
        *state.lock() = ScanState::Completed;
        let _ = tx.send(ScanEvent::Completed(stats));
    } else if token.is_stopped() && token.is_current() {
        debug!(generation = token.generation, "scan cancelled");
        let _ = tx.send(ScanEvent::Cancelled);
    }
}

/// Display name for a scan root.
fn root_label(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

/// Forward a walk's recorded errors into the event stream.
fn forward_walk_errors(
    wstats: &WalkStats,
    token: &ScanToken,
    tx: &Sender<ScanEvent>,
    stats: &mut ScanStats,
) {
    for error in &wstats.errors {
        stats.soft_errors += 1;
        emit(
            tx,
            token,
            ScanEvent::SoftError {
                path: error.path.clone(),
                message: error.message.clone(),
            },
        );
    }
    stats.files += wstats.files;
    stats.dirs += wstats.dirs;
    stats.total_size += wstats.total_size;
}

// ── Cleanup ──────────────────────────────────────────────────────────────

fn run_cleanup(
    categories: &[CleanupCategory],
    ctx: &ScanContext,
    token: &ScanToken,
    tx: &Sender<ScanEvent>,
    stats: &mut ScanStats,
) {
    let total = categories.len().max(1) as f64;

    for (idx, &category) in categories.iter().enumerate() {
        if !token.is_live() {
            return;
        }

        let mut items: Vec<CleanableItem> = Vec::new();
        for root in ctx.dirs.category_roots(category) {
            if !token.is_live() {
                return;
            }
            if !root.exists() {
                continue;
            }
            if !ctx.access.can_read(&root) {
                stats.soft_errors += 1;
                emit(
                    tx,
                    token,
                    ScanEvent::SoftError {
                        path: root.clone(),
                        message: "not readable".into(),
                    },
                );
                continue;
            }
            emit(
                tx,
                token,
                ScanEvent::Scanning {
                    label: format!("{}/{}", category.label(), root_label(&root)),
                    fraction: (idx as f64 + 0.5) / total,
                },
            );
            items.extend(collect_items(&root, ctx, token, tx, stats));
        }

        if !items.is_empty() && token.is_live() {
            items.sort_by(|a, b| {
                b.entry
                    .size
                    .cmp(&a.entry.size)
                    .then_with(|| a.entry.path.cmp(&b.entry.path))
            });
            stats.files += items.iter().filter(|i| !i.entry.is_dir).count() as u64;
            stats.dirs += items.iter().filter(|i| i.entry.is_dir).count() as u64;
            stats.total_size += items.iter().map(|i| i.entry.size).sum::<u64>();
            emit(
                tx,
                token,
                ScanEvent::Category(CleanableCategory::new(category, items)),
            );
        }

        emit(
            tx,
            token,
            ScanEvent::Scanning {
                label: category.label().to_string(),
                fraction: (idx + 1) as f64 / total,
            },
        );
    }
}

/// One cleanable item per non-hidden top-level entry of a category
/// root, each sized recursively. Hidden entries never become items but
/// their bytes are still in any parent totals the sizer reports.
fn collect_items(
    root: &Path,
    ctx: &ScanContext,
    token: &ScanToken,
    tx: &Sender<ScanEvent>,
    stats: &mut ScanStats,
) -> Vec<CleanableItem> {
    let children: Vec<PathBuf> = match fs::read_dir(root) {
        Ok(reader) => reader
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| !walker::is_hidden(p))
            .collect(),
        Err(err) => {
            stats.soft_errors += 1;
            emit(
                tx,
                token,
                ScanEvent::SoftError {
                    path: root.to_path_buf(),
                    message: err.to_string(),
                },
            );
            return Vec::new();
        }
    };
    if !token.is_live() {
        return Vec::new();
    }

    let sizer = &ctx.sizer;
    children
        .par_iter()
        .map(|path| CleanableItem {
            entry: sized_entry(path, sizer),
            selected: true,
        })
        .collect()
}

fn sized_entry(path: &Path, sizer: &DirSizer) -> ScanEntry {
    let meta = fs::symlink_metadata(path).ok();
    let is_dir = meta.as_ref().map(|m| m.is_dir()).unwrap_or(false);
    let modified = meta.as_ref().and_then(|m| m.modified().ok());
    ScanEntry::new(path.to_path_buf(), sizer.size_of(path), is_dir, modified)
}

// ── Large files ──────────────────────────────────────────────────────────

fn run_large_files(
    min_size: u64,
    ctx: &ScanContext,
    token: &ScanToken,
    tx: &Sender<ScanEvent>,
    stats: &mut ScanStats,
) {
    let roots = ctx.dirs.content_roots();
    let total = roots.len().max(1) as f64;

    for (idx, root) in roots.iter().enumerate() {
        if !token.is_live() {
            return;
        }
        if root.exists() && ctx.access.can_read(root) {
            emit(
                tx,
                token,
                ScanEvent::Scanning {
                    label: root_label(root),
                    fraction: (idx as f64 + 0.5) / total,
                },
            );

            let mut batch: Vec<ScanEntry> = Vec::new();
            let wstats = walker::walk(root, token, &WalkPolicy::default(), &mut |entry| {
                if !entry.is_dir && entry.size >= min_size {
                    batch.push(entry);
                }
            });
            forward_walk_errors(&wstats, token, tx, stats);

            if !batch.is_empty() {
                sort_entries(&mut batch, SortOrder::SizeDesc);
                emit(tx, token, ScanEvent::LargeFiles(batch));
            }
        }
        emit(
            tx,
            token,
            ScanEvent::Scanning {
                label: root_label(root),
                fraction: (idx + 1) as f64 / total,
            },
        );
    }
}

// ── Duplicates ───────────────────────────────────────────────────────────

/// Share of the progress bar spent collecting candidates; the rest is
/// hashing.
const COLLECT_SHARE: f64 = 0.6;

fn run_duplicates(
    min_size: u64,
    ctx: &ScanContext,
    token: &ScanToken,
    tx: &Sender<ScanEvent>,
    stats: &mut ScanStats,
) {
    let roots = ctx.dirs.content_roots();
    let total = roots.len().max(1) as f64;
    let mut candidates: Vec<ScanEntry> = Vec::new();

    for (idx, root) in roots.iter().enumerate() {
        if !token.is_live() {
            return;
        }
        if root.exists() && ctx.access.can_read(root) {
            emit(
                tx,
                token,
                ScanEvent::Scanning {
                    label: root_label(root),
                    fraction: COLLECT_SHARE * (idx as f64 + 0.5) / total,
                },
            );
            let wstats = walker::walk(root, token, &WalkPolicy::default(), &mut |entry| {
                if !entry.is_dir
                    && entry.size >= min_size
                    && entry.size <= duplicates::MAX_CANDIDATE_SIZE
                {
                    candidates.push(entry);
                }
            });
            forward_walk_errors(&wstats, token, tx, stats);
        }
        emit(
            tx,
            token,
            ScanEvent::Scanning {
                label: root_label(root),
                fraction: COLLECT_SHARE * (idx + 1) as f64 / total,
            },
        );
    }

    if !token.is_live() {
        return;
    }
    debug!(candidates = candidates.len(), "hashing candidate files");
    emit(
        tx,
        token,
        ScanEvent::Scanning {
            label: format!("Comparing {} candidates", candidates.len()),
            fraction: COLLECT_SHARE,
        },
    );

    let groups: Vec<DuplicateGroup> =
        duplicates::find_duplicates_with_progress(candidates, token, |done, total| {
            if total > 0 {
                emit(
                    tx,
                    token,
                    ScanEvent::Scanning {
                        label: "Comparing candidates".into(),
                        fraction: COLLECT_SHARE + (1.0 - COLLECT_SHARE) * done as f64 / total as f64,
                    },
                );
            }
        });

    if !groups.is_empty() {
        emit(tx, token, ScanEvent::Duplicates(groups));
    }
}

// ── Directory listing ────────────────────────────────────────────────────

fn run_listing(
    path: &Path,
    ctx: &ScanContext,
    token: &ScanToken,
    tx: &Sender<ScanEvent>,
    stats: &mut ScanStats,
) {
    if !ctx.access.can_read(path) {
        stats.soft_errors += 1;
        emit(
            tx,
            token,
            ScanEvent::SoftError {
                path: path.to_path_buf(),
                message: "not readable".into(),
            },
        );
        return;
    }
    emit(
        tx,
        token,
        ScanEvent::Scanning {
            label: path.display().to_string(),
            fraction: 0.0,
        },
    );

    let children: Vec<PathBuf> = match fs::read_dir(path) {
        Ok(reader) => reader
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| !walker::is_hidden(p))
            .collect(),
        Err(err) => {
            stats.soft_errors += 1;
            emit(
                tx,
                token,
                ScanEvent::SoftError {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                },
            );
            return;
        }
    };
    if !token.is_live() {
        return;
    }

    let sizer = &ctx.sizer;
    let mut entries: Vec<ScanEntry> = children
        .par_iter()
        .map(|child| sized_entry(child, sizer))
        .collect();
    sort_entries(&mut entries, SortOrder::SizeDesc);

    stats.files += entries.iter().filter(|e| !e.is_dir).count() as u64;
    stats.dirs += entries.iter().filter(|e| e.is_dir).count() as u64;
    stats.total_size += entries.iter().map(|e| e.size).sum::<u64>();

    emit(tx, token, ScanEvent::Listing(entries));
    emit(
        tx,
        token,
        ScanEvent::Scanning {
            label: path.display().to_string(),
            fraction: 1.0,
        },
    );
}
