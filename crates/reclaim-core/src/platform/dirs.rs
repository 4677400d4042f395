/// Well-known per-user directory table.
///
/// Every location the engine scans is derived from the home directory
/// via the relative constants below; [`KnownDirs::rooted_at`] lets tests
/// point the whole table at a temporary root.
use crate::classify::CleanupCategory;
use crate::error::EngineError;
use std::path::{Path, PathBuf};

pub const LIBRARY_CACHES: &str = "Library/Caches";
pub const LIBRARY_LOGS: &str = "Library/Logs";
pub const APPLICATION_SUPPORT: &str = "Library/Application Support";
pub const PREFERENCES: &str = "Library/Preferences";
pub const CONTAINERS: &str = "Library/Containers";
pub const SAVED_STATE: &str = "Library/Saved Application State";
pub const TRASH_DIR: &str = ".Trash";

pub const CHROME_CACHE: &str = "Library/Caches/Google/Chrome";
pub const SAFARI_CACHE: &str = "Library/Caches/com.apple.Safari";
pub const FIREFOX_CACHE: &str = "Library/Caches/Firefox";
pub const MOZILLA_CACHE: &str = "Library/Caches/Mozilla";

pub const XCODE_DERIVED_DATA: &str = "Library/Developer/Xcode/DerivedData";
pub const XCODE_ARCHIVES: &str = "Library/Developer/Xcode/Archives";
pub const XCODE_DEVICE_SUPPORT: &str = "Library/Developer/Xcode/iOS DeviceSupport";
pub const CORE_SIMULATOR: &str = "Library/Developer/CoreSimulator";

pub const NPM_CACHE: &str = ".npm";
pub const CARGO_REGISTRY: &str = ".cargo/registry";
pub const GRADLE_CACHE: &str = ".gradle/caches";
pub const GO_MOD_CACHE: &str = "go/pkg/mod";
pub const PNPM_STORE: &str = ".pnpm-store";
pub const BUN_CACHE: &str = ".bun/install/cache";

/// User content folders scanned by the large-file and duplicate lines.
const CONTENT_DIRS: [&str; 6] = [
    "Desktop",
    "Documents",
    "Downloads",
    "Movies",
    "Music",
    "Pictures",
];

/// Resolver for every well-known location the engine touches.
#[derive(Debug, Clone)]
pub struct KnownDirs {
    home: PathBuf,
}

impl KnownDirs {
    /// Resolve the table from the real user home directory.
    ///
    /// This is the engine's only fatal start-up condition: with no home
    /// directory there is nothing meaningful to scan.
    pub fn discover() -> Result<Self, EngineError> {
        ::dirs::home_dir()
            .map(Self::rooted_at)
            .ok_or(EngineError::HomeDirUnavailable)
    }

    /// Build the table against an explicit home root (tests, containers).
    pub fn rooted_at(home: PathBuf) -> Self {
        Self { home }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn user_caches(&self) -> PathBuf {
        self.home.join(LIBRARY_CACHES)
    }

    pub fn user_logs(&self) -> PathBuf {
        self.home.join(LIBRARY_LOGS)
    }

    pub fn app_support(&self) -> PathBuf {
        self.home.join(APPLICATION_SUPPORT)
    }

    pub fn preferences(&self) -> PathBuf {
        self.home.join(PREFERENCES)
    }

    pub fn containers(&self) -> PathBuf {
        self.home.join(CONTAINERS)
    }

    pub fn saved_state(&self) -> PathBuf {
        self.home.join(SAVED_STATE)
    }

    pub fn trash_dir(&self) -> PathBuf {
        self.home.join(TRASH_DIR)
    }

    pub fn browser_cache_roots(&self) -> Vec<PathBuf> {
        [CHROME_CACHE, SAFARI_CACHE, FIREFOX_CACHE, MOZILLA_CACHE]
            .iter()
            .map(|rel| self.home.join(rel))
            .collect()
    }

    pub fn xcode_roots(&self) -> Vec<PathBuf> {
        [
            XCODE_DERIVED_DATA,
            XCODE_ARCHIVES,
            XCODE_DEVICE_SUPPORT,
            CORE_SIMULATOR,
        ]
        .iter()
        .map(|rel| self.home.join(rel))
        .collect()
    }

    pub fn developer_roots(&self) -> Vec<PathBuf> {
        [
            NPM_CACHE,
            CARGO_REGISTRY,
            GRADLE_CACHE,
            GO_MOD_CACHE,
            PNPM_STORE,
            BUN_CACHE,
        ]
        .iter()
        .map(|rel| self.home.join(rel))
        .collect()
    }

    /// Roots for the large-file and duplicate scan lines.
    pub fn content_roots(&self) -> Vec<PathBuf> {
        CONTENT_DIRS.iter().map(|rel| self.home.join(rel)).collect()
    }

    /// Where installed application bundles live.
    pub fn application_roots(&self) -> Vec<PathBuf> {
        vec![
            PathBuf::from("/Applications"),
            self.home.join("Applications"),
        ]
    }

    /// The directories a cleanup scan walks for one category.
    pub fn category_roots(&self, category: CleanupCategory) -> Vec<PathBuf> {
        match category {
            CleanupCategory::UserCaches => vec![self.user_caches()],
            CleanupCategory::BrowserCaches => self.browser_cache_roots(),
            CleanupCategory::Logs => vec![self.user_logs()],
            CleanupCategory::Xcode => self.xcode_roots(),
            CleanupCategory::DeveloperTools => self.developer_roots(),
            CleanupCategory::Trash => vec![self.trash_dir()],
            CleanupCategory::Uncategorized => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_home_relative() {
        let dirs = KnownDirs::rooted_at(PathBuf::from("/Users/alice"));
        assert_eq!(
            dirs.user_caches(),
            PathBuf::from("/Users/alice/Library/Caches")
        );
        assert_eq!(dirs.trash_dir(), PathBuf::from("/Users/alice/.Trash"));
        assert!(dirs
            .browser_cache_roots()
            .contains(&PathBuf::from("/Users/alice/Library/Caches/Google/Chrome")));
    }

    #[test]
    fn uncategorized_has_no_roots() {
        let dirs = KnownDirs::rooted_at(PathBuf::from("/Users/alice"));
        assert!(dirs
            .category_roots(CleanupCategory::Uncategorized)
            .is_empty());
    }

    #[test]
    fn every_real_category_has_roots() {
        let dirs = KnownDirs::rooted_at(PathBuf::from("/Users/alice"));
        for category in CleanupCategory::ALL {
            assert!(
                !dirs.category_roots(category).is_empty(),
                "no roots for {category:?}"
            );
        }
    }
}
