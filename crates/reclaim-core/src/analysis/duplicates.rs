/// Duplicate file detection (size and type bucket, then partial hash,
/// then full content hash).
///
/// The size/kind bucketing is the dominant cost reducer — most files
/// have unique sizes and never get read at all. Surviving buckets go
/// through a 4 KiB blake3 prefix filter before the full-content hash,
/// so large files that differ early are read once, cheaply.
///
/// Policy decisions (deliberate, tested):
/// - Zero-byte files are excluded outright. Hashing empty content
///   would weld every empty file on the disk into one giant group.
/// - Equal full-content blake3 hashes are trusted as equality; with a
///   256-bit cryptographic hash a collision is vastly less likely than
///   an I/O error, so there is no byte-for-byte confirmation pass.
/// - The "original" of a group is the member with the earliest
///   modified timestamp; missing or equal timestamps fall back to the
///   lexicographically smallest path. Stable across runs and invariant
///   to input order.
use crate::classify::FileKind;
use crate::model::ScanEntry;
use crate::scanner::ScanToken;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bytes hashed by the prefix filter.
const PARTIAL_READ: usize = 4096;

/// Read granularity for full-content hashing; the cancellation token
/// is consulted once per chunk so stopping mid-hash of a huge file
/// stays prompt.
const HASH_CHUNK: usize = 64 * 1024;

/// Default candidate floor for a duplicate scan — tiny files reclaim
/// nothing and explode the bucket count.
pub const DEFAULT_MIN_CANDIDATE_SIZE: u64 = 1_048_576;

/// Files above this are skipped as candidates (hashing them would
/// dominate the scan).
pub const MAX_CANDIDATE_SIZE: u64 = 500_000_000;

/// One member of a duplicate group.
#[derive(Debug, Clone)]
pub struct DuplicateFile {
    pub entry: ScanEntry,
    pub is_original: bool,
    pub selected: bool,
}

/// Two or more byte-identical files. Exactly one member is the
/// original; members are held in lexicographic path order.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// Size of each member (they are identical).
    pub size: u64,
    pub kind: FileKind,
    pub files: Vec<DuplicateFile>,
}

impl DuplicateGroup {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Bytes reclaimable by deleting everything but the original.
    pub fn duplicate_size(&self) -> u64 {
        self.size * (self.files.len() as u64 - 1)
    }

    pub fn selected_count(&self) -> usize {
        self.files.iter().filter(|f| f.selected).count()
    }

    pub fn selected_size(&self) -> u64 {
        self.size * self.selected_count() as u64
    }

    pub fn original(&self) -> Option<&DuplicateFile> {
        self.files.iter().find(|f| f.is_original)
    }
}

/// Presentation orders for duplicate groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSort {
    SizeDesc,
    SizeAsc,
    CountDesc,
    CountAsc,
    Name,
}

/// Group byte-identical files. See the module docs for policies.
///
/// Cancellation returns the groups finished so far; the coordinator
/// suppresses publication of a dead generation, so partial output is
/// never observed unless the caller drives this directly.
pub fn find_duplicates(candidates: Vec<ScanEntry>, token: &ScanToken) -> Vec<DuplicateGroup> {
    find_duplicates_with_progress(candidates, token, |_, _| {})
}

pub fn find_duplicates_with_progress(
    candidates: Vec<ScanEntry>,
    token: &ScanToken,
    mut on_progress: impl FnMut(usize, usize),
) -> Vec<DuplicateGroup> {
    // Stage 1: bucket by (size, kind). A bucket of one cannot contain
    // duplicates.
    let mut buckets: HashMap<(u64, FileKind), Vec<ScanEntry>> = HashMap::new();
    for entry in candidates {
        if entry.is_dir || entry.size == 0 {
            continue;
        }
        buckets
            .entry((entry.size, entry.kind))
            .or_default()
            .push(entry);
    }
    buckets.retain(|_, members| members.len() >= 2);

    let total: usize = buckets.values().map(Vec::len).sum();
    debug!(candidates = total, buckets = buckets.len(), "hashing surviving buckets");
    let mut done = 0usize;
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    'buckets: for ((size, kind), mut members) in buckets {
        if !token.is_live() {
            break;
        }
        members.sort_by(|a, b| a.path.cmp(&b.path));

        // Stage 2: prefix filter.
        let mut by_prefix: HashMap<blake3::Hash, Vec<ScanEntry>> = HashMap::new();
        for entry in members {
            if !token.is_live() {
                break 'buckets;
            }
            done += 1;
            on_progress(done, total);
            if let Some(hash) = partial_hash(&entry.path) {
                by_prefix.entry(hash).or_default().push(entry);
            }
        }

        // Stage 3: full-content hash within surviving prefix groups.
        for (_, same_prefix) in by_prefix {
            if same_prefix.len() < 2 {
                continue;
            }
            let mut by_content: HashMap<blake3::Hash, Vec<ScanEntry>> = HashMap::new();
            for entry in same_prefix {
                if !token.is_live() {
                    break 'buckets;
                }
                if let Some(hash) = full_hash(&entry.path, token) {
                    by_content.entry(hash).or_default().push(entry);
                }
            }

            for (_, mut identical) in by_content {
                if identical.len() < 2 {
                    continue;
                }
                identical.sort_by(|a, b| a.path.cmp(&b.path));
                let mut files: Vec<DuplicateFile> = identical
                    .into_iter()
                    .map(|entry| DuplicateFile {
                        entry,
                        is_original: false,
                        selected: false,
                    })
                    .collect();
                let original = elect_original(&files);
                files[original].is_original = true;
                groups.push(DuplicateGroup { size, kind, files });
            }
        }
    }

    // Deterministic presentation order regardless of hash-map iteration:
    // most reclaimable bytes first, path as tie-break.
    groups.sort_by(|a, b| {
        b.duplicate_size()
            .cmp(&a.duplicate_size())
            .then_with(|| a.files[0].entry.path.cmp(&b.files[0].entry.path))
    });
    groups
}

/// Index of the group's original. `files` must be path-sorted; the
/// earliest modified timestamp wins, and only a strictly earlier
/// timestamp displaces the current best, so missing or equal
/// timestamps resolve to the smallest path.
fn elect_original(files: &[DuplicateFile]) -> usize {
    let mut best = 0;
    for (i, candidate) in files.iter().enumerate().skip(1) {
        if let (Some(best_time), Some(time)) = (files[best].entry.modified, candidate.entry.modified)
        {
            if time < best_time {
                best = i;
            }
        }
    }
    best
}

/// Mark every non-original member selected (the "Auto Select" action).
pub fn auto_select(groups: &mut [DuplicateGroup]) {
    for group in groups.iter_mut() {
        for file in group.files.iter_mut() {
            file.selected = !file.is_original;
        }
    }
}

/// Re-sort groups for presentation.
pub fn sort_groups(groups: &mut [DuplicateGroup], order: GroupSort) {
    match order {
        GroupSort::SizeDesc => {
            groups.sort_by(|a, b| b.duplicate_size().cmp(&a.duplicate_size()));
        }
        GroupSort::SizeAsc => {
            groups.sort_by(|a, b| a.duplicate_size().cmp(&b.duplicate_size()));
        }
        GroupSort::CountDesc => groups.sort_by(|a, b| b.file_count().cmp(&a.file_count())),
        GroupSort::CountAsc => groups.sort_by(|a, b| a.file_count().cmp(&b.file_count())),
        GroupSort::Name => groups.sort_by(|a, b| {
            let a_name = a.files[0].entry.name.to_lowercase();
            let b_name = b.files[0].entry.name.to_lowercase();
            a_name.cmp(&b_name)
        }),
    }
}

/// Drop deleted members and collapse groups that no longer contain a
/// duplicate pair. If a group's original was deleted, a new one is
/// elected from the survivors.
pub fn prune_deleted(groups: &mut Vec<DuplicateGroup>, deleted: &[PathBuf]) {
    for group in groups.iter_mut() {
        group
            .files
            .retain(|f| !deleted.iter().any(|d| *d == f.entry.path));
        if group.files.len() >= 2 && !group.files.iter().any(|f| f.is_original) {
            let original = elect_original(&group.files);
            group.files[original].is_original = true;
        }
    }
    groups.retain(|g| g.files.len() >= 2);
}

fn partial_hash(path: &Path) -> Option<blake3::Hash> {
    let mut file = File::open(path).ok()?;
    let mut buf = vec![0u8; PARTIAL_READ];
    let bytes_read = file.read(&mut buf).ok()?;
    buf.truncate(bytes_read);
    Some(blake3::hash(&buf))
}

fn full_hash(path: &Path, token: &ScanToken) -> Option<blake3::Hash> {
    let mut file = File::open(path).ok()?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; HASH_CHUNK];
    loop {
        if !token.is_live() {
            return None;
        }
        let n = file.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Some(hasher.finalize())
}
