/// Large-file selection over a scanned population.
///
/// A "large file" is any file entry at or above a caller-chosen size
/// threshold, independent of cleanup category. Sorting covers the five
/// orders the large-files view offers.
use crate::model::ScanEntry;

/// Default threshold: 100 MB.
pub const DEFAULT_MIN_SIZE: u64 = 100 * 1024 * 1024;

/// Sort orders for file listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    SizeDesc,
    SizeAsc,
    DateDesc,
    DateAsc,
    Name,
}

/// Keep the files at or above `min_size`, largest first.
pub fn filter_large(population: Vec<ScanEntry>, min_size: u64) -> Vec<ScanEntry> {
    let mut files: Vec<ScanEntry> = population
        .into_iter()
        .filter(|e| !e.is_dir && e.size >= min_size)
        .collect();
    sort_entries(&mut files, SortOrder::SizeDesc);
    files
}

/// Sort entries in place. Every order tie-breaks by path so the result
/// is deterministic for equal keys.
pub fn sort_entries(entries: &mut [ScanEntry], order: SortOrder) {
    match order {
        SortOrder::SizeDesc => {
            entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        }
        SortOrder::SizeAsc => {
            entries.sort_by(|a, b| a.size.cmp(&b.size).then_with(|| a.path.cmp(&b.path)));
        }
        SortOrder::DateDesc => {
            entries.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)));
        }
        SortOrder::DateAsc => {
            entries.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));
        }
        SortOrder::Name => {
            entries.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.path.cmp(&b.path))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    const MB: u64 = 1024 * 1024;

    fn file(name: &str, size_mb: u64, age_secs: u64) -> ScanEntry {
        ScanEntry::new(
            PathBuf::from(format!("/files/{name}")),
            size_mb * MB,
            false,
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(age_secs)),
        )
    }

    /// With a 100 MB threshold, exactly the 150 MB and 200 MB files
    /// survive, and each sort order arranges them correctly.
    #[test]
    fn threshold_and_all_five_orders() {
        let population = vec![
            file("small.mov", 50, 30),
            file("Bigger.iso", 200, 10),
            file("archive.zip", 150, 20),
        ];

        let mut large = filter_large(population, 100 * MB);
        assert_eq!(large.len(), 2);

        sort_entries(&mut large, SortOrder::SizeDesc);
        assert_eq!(large[0].name.as_str(), "Bigger.iso");
        sort_entries(&mut large, SortOrder::SizeAsc);
        assert_eq!(large[0].name.as_str(), "archive.zip");
        sort_entries(&mut large, SortOrder::DateDesc);
        assert_eq!(large[0].name.as_str(), "archive.zip");
        sort_entries(&mut large, SortOrder::DateAsc);
        assert_eq!(large[0].name.as_str(), "Bigger.iso");
        // Case-insensitive: "archive" < "Bigger".
        sort_entries(&mut large, SortOrder::Name);
        assert_eq!(large[0].name.as_str(), "archive.zip");
    }

    #[test]
    fn directories_never_count_as_large_files() {
        let dir = ScanEntry::new(PathBuf::from("/files/huge-dir"), 500 * MB, true, None);
        assert!(filter_large(vec![dir], 100 * MB).is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let exact = file("exact.bin", 100, 0);
        let large = filter_large(vec![exact], 100 * MB);
        assert_eq!(large.len(), 1);
    }

    /// Missing timestamps sort stably (before any real timestamp in
    /// ascending order) rather than panicking.
    #[test]
    fn missing_dates_sort_stably() {
        let mut entries = vec![
            file("dated.bin", 200, 100),
            ScanEntry::new(PathBuf::from("/files/undated.bin"), 150 * MB, false, None),
        ];
        sort_entries(&mut entries, SortOrder::DateAsc);
        assert_eq!(entries[0].name.as_str(), "undated.bin");
        sort_entries(&mut entries, SortOrder::DateDesc);
        assert_eq!(entries[0].name.as_str(), "dated.bin");
    }
}
