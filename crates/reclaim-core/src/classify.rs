/// Path classification — cleanup categories and file-type buckets.
///
/// Two independent, pure classification schemes:
///
/// - [`PathClassifier`] maps a path to a [`CleanupCategory`] by prefix
///   matching against the well-known location table, most specific
///   prefix first (so a Chrome cache dir classifies as BrowserCaches,
///   not the general UserCaches).
/// - [`file_kind`] maps a path to a [`FileKind`] bucket by extension,
///   used by the large-files and duplicates views.
///
/// Both are total: every path maps to some category, with an explicit
/// fallback, and neither performs any I/O.
use crate::platform::KnownDirs;
use std::path::{Path, PathBuf};

/// Cleanup domains a scanned path can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupCategory {
    UserCaches,
    BrowserCaches,
    Logs,
    Xcode,
    DeveloperTools,
    Trash,
    /// Fallback for paths outside every known cleanup location.
    Uncategorized,
}

impl CleanupCategory {
    /// All real categories, in scan order. Excludes the fallback.
    pub const ALL: [CleanupCategory; 6] = [
        CleanupCategory::UserCaches,
        CleanupCategory::BrowserCaches,
        CleanupCategory::Logs,
        CleanupCategory::Xcode,
        CleanupCategory::DeveloperTools,
        CleanupCategory::Trash,
    ];

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::UserCaches => "User Caches",
            Self::BrowserCaches => "Browser Caches",
            Self::Logs => "Logs",
            Self::Xcode => "Xcode Junk",
            Self::DeveloperTools => "Developer Tools",
            Self::Trash => "Trash",
            Self::Uncategorized => "Other",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::UserCaches => "Application cache files in your user library",
            Self::BrowserCaches => "Web browser caches (Chrome, Safari, Firefox)",
            Self::Logs => "Application and diagnostic log files",
            Self::Xcode => "DerivedData, archives, and device support files",
            Self::DeveloperTools => "Package manager and build tool caches",
            Self::Trash => "Files already in the trash",
            Self::Uncategorized => "Everything else",
        }
    }

    /// The default set a cleanup scan runs with: every category except
    /// Trash, which users opt into explicitly.
    pub fn default_set() -> Vec<CleanupCategory> {
        Self::ALL
            .into_iter()
            .filter(|c| *c != CleanupCategory::Trash)
            .collect()
    }
}

/// Broad file-type buckets for the large-files and duplicates views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Documents,
    Images,
    Video,
    Audio,
    Archives,
    Other,
}

impl FileKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Other => "Other",
        }
    }
}

/// Bucket a path by its file extension.
///
/// Zero-heap-allocation hot path: the extension is lowercased into a
/// fixed-size stack buffer rather than allocating a `String`.
/// Extensions longer than 16 bytes are treated as `Other`.
pub fn file_kind(path: &Path) -> FileKind {
    let ext = match path.extension() {
        Some(e) => e.to_string_lossy(),
        None => return FileKind::Other,
    };
    let bytes = ext.as_bytes();
    if bytes.len() > 16 {
        return FileKind::Other;
    }

    let mut lower = [0u8; 16];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    let lower_str = match std::str::from_utf8(&lower[..bytes.len()]) {
        Ok(s) => s,
        Err(_) => return FileKind::Other,
    };

    match lower_str {
        "doc" | "docx" | "pdf" | "txt" | "rtf" | "odt" | "xls" | "xlsx" | "ppt" | "pptx"
        | "csv" | "md" | "epub" | "pages" | "key" | "numbers" => FileKind::Documents,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "ico" | "tiff" | "tif"
        | "psd" | "raw" | "cr2" | "nef" | "heic" | "heif" => FileKind::Images,
        "mp4" | "mkv" | "avi" | "mov" | "wmv" | "flv" | "webm" | "m4v" | "mpg" | "mpeg"
        | "3gp" => FileKind::Video,
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" | "m4a" | "aiff" | "opus" => {
            FileKind::Audio
        }
        "zip" | "rar" | "7z" | "tar" | "gz" | "bz2" | "xz" | "zst" | "iso" | "dmg" | "pkg" => {
            FileKind::Archives
        }
        _ => FileKind::Other,
    }
}

/// Prefix-table classifier for cleanup categories.
///
/// The table is fixed at construction from the well-known location set;
/// rules are ordered by descending path depth so overlapping prefixes
/// resolve deterministically (most specific match wins).
pub struct PathClassifier {
    rules: Vec<(PathBuf, CleanupCategory)>,
}

impl PathClassifier {
    pub fn new(dirs: &KnownDirs) -> Self {
        let mut rules: Vec<(PathBuf, CleanupCategory)> = Vec::new();

        for root in dirs.browser_cache_roots() {
            rules.push((root, CleanupCategory::BrowserCaches));
        }
        rules.push((dirs.user_caches(), CleanupCategory::UserCaches));
        rules.push((dirs.user_logs(), CleanupCategory::Logs));
        for root in dirs.xcode_roots() {
            rules.push((root, CleanupCategory::Xcode));
        }
        for root in dirs.developer_roots() {
            rules.push((root, CleanupCategory::DeveloperTools));
        }
        rules.push((dirs.trash_dir(), CleanupCategory::Trash));

        // Longest prefix first; ties keep insertion order, which is fixed.
        rules.sort_by(|a, b| b.0.components().count().cmp(&a.0.components().count()));

        Self { rules }
    }

    /// Map a path to its cleanup category. Total: paths outside every
    /// known location classify as `Uncategorized`.
    pub fn classify(&self, path: &Path) -> CleanupCategory {
        self.rules
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix))
            .map(|&(_, category)| category)
            .unwrap_or(CleanupCategory::Uncategorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn classifier() -> PathClassifier {
        PathClassifier::new(&KnownDirs::rooted_at(PathBuf::from("/Users/alice")))
    }

    // ── file_kind ────────────────────────────────────────────────────────

    #[test]
    fn kind_known_image_extensions() {
        for ext in &["jpg", "jpeg", "png", "gif", "webp", "heic"] {
            assert_eq!(
                file_kind(Path::new(&format!("photo.{ext}"))),
                FileKind::Images,
                "expected Images for .{ext}"
            );
        }
    }

    #[test]
    fn kind_known_document_extensions() {
        for ext in &["pdf", "docx", "txt", "pages", "numbers"] {
            assert_eq!(
                file_kind(Path::new(&format!("report.{ext}"))),
                FileKind::Documents,
                "expected Documents for .{ext}"
            );
        }
    }

    #[test]
    fn kind_known_archive_extensions() {
        for ext in &["zip", "tar", "gz", "dmg", "pkg"] {
            assert_eq!(
                file_kind(Path::new(&format!("bundle.{ext}"))),
                FileKind::Archives,
                "expected Archives for .{ext}"
            );
        }
    }

    /// Extension matching must be case-insensitive so "JPG" == "jpg".
    #[test]
    fn kind_case_insensitive() {
        assert_eq!(file_kind(Path::new("IMG_0001.JPG")), FileKind::Images);
        assert_eq!(file_kind(Path::new("movie.MOV")), FileKind::Video);
    }

    #[test]
    fn kind_unknown_or_missing_extension_is_other() {
        assert_eq!(file_kind(Path::new("mystery.xyz")), FileKind::Other);
        assert_eq!(file_kind(Path::new("Makefile")), FileKind::Other);
    }

    // ── PathClassifier ───────────────────────────────────────────────────

    #[test]
    fn classify_user_caches() {
        let c = classifier();
        assert_eq!(
            c.classify(Path::new("/Users/alice/Library/Caches/com.example.App")),
            CleanupCategory::UserCaches
        );
    }

    /// A browser cache lives under Library/Caches, so the more specific
    /// browser rule must win over the general user-caches rule.
    #[test]
    fn classify_browser_cache_beats_user_caches() {
        let c = classifier();
        assert_eq!(
            c.classify(Path::new(
                "/Users/alice/Library/Caches/Google/Chrome/Default/Cache"
            )),
            CleanupCategory::BrowserCaches
        );
        assert_eq!(
            c.classify(Path::new(
                "/Users/alice/Library/Caches/com.apple.Safari/WebKitCache"
            )),
            CleanupCategory::BrowserCaches
        );
    }

    #[test]
    fn classify_logs_xcode_dev_trash() {
        let c = classifier();
        assert_eq!(
            c.classify(Path::new("/Users/alice/Library/Logs/app.log")),
            CleanupCategory::Logs
        );
        assert_eq!(
            c.classify(Path::new(
                "/Users/alice/Library/Developer/Xcode/DerivedData/MyApp-abcdef"
            )),
            CleanupCategory::Xcode
        );
        assert_eq!(
            c.classify(Path::new("/Users/alice/.cargo/registry/cache")),
            CleanupCategory::DeveloperTools
        );
        assert_eq!(
            c.classify(Path::new("/Users/alice/.Trash/old.zip")),
            CleanupCategory::Trash
        );
    }

    /// A desktop document belongs to no cleanup category, but buckets
    /// as a document under the file-type scheme.
    #[test]
    fn classify_is_total_with_uncategorized_fallback() {
        let c = classifier();
        let report = Path::new("/Users/alice/Desktop/report.pdf");
        assert_eq!(c.classify(report), CleanupCategory::Uncategorized);
        assert_eq!(file_kind(report), FileKind::Documents);
    }

    #[test]
    fn default_set_excludes_trash() {
        let set = CleanupCategory::default_set();
        assert_eq!(set.len(), CleanupCategory::ALL.len() - 1);
        assert!(!set.contains(&CleanupCategory::Trash));
    }
}
