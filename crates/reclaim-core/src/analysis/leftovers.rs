/// App-leftover discovery for the uninstaller.
///
/// Given an installed application, search the well-known support,
/// cache, preference, and log roots for entries plausibly belonging to
/// it. Strictly read-only — deletion goes through the normal executor,
/// and the application bundle itself is never touched: for bundles in
/// system-protected locations the caller must direct the user to
/// remove the app manually ([`in_protected_location`]).
use crate::scanner::{sizing::DirSizer, ScanContext};
use compact_str::CompactString;
use std::fs;
use std::path::{Path, PathBuf};

/// What kind of leftover a matched entry is, by the root it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeftoverKind {
    Cache,
    Preference,
    SupportFile,
    Log,
    Other,
}

impl LeftoverKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cache => "Caches",
            Self::Preference => "Preferences",
            Self::SupportFile => "Support Files",
            Self::Log => "Logs",
            Self::Other => "Other",
        }
    }
}

/// One file or directory left behind by an application.
#[derive(Debug, Clone)]
pub struct LeftoverItem {
    pub path: PathBuf,
    pub name: CompactString,
    pub size: u64,
    pub kind: LeftoverKind,
}

/// An installed application, as fed to the resolver.
#[derive(Debug, Clone)]
pub struct AppInfo {
    /// Display name, e.g. "Example App".
    pub name: String,
    /// Reverse-DNS bundle identifier when known.
    pub bundle_id: Option<String>,
    /// Path of the `.app` bundle.
    pub path: PathBuf,
    /// Recursive bundle size.
    pub size: u64,
}

impl AppInfo {
    /// Build from a bundle path, sniffing the bundle identifier out of
    /// a textual `Info.plist` when one is present.
    pub fn from_bundle_path(path: &Path, sizer: &DirSizer) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            bundle_id: read_bundle_identifier(path),
            size: sizer.size_of(path),
            path: path.to_path_buf(),
        }
    }
}

/// Enumerate `.app` bundles in the application roots, sorted by name.
pub fn installed_apps(ctx: &ScanContext) -> Vec<AppInfo> {
    let mut apps: Vec<AppInfo> = Vec::new();
    for root in ctx.dirs.application_roots() {
        let reader = match fs::read_dir(&root) {
            Ok(reader) => reader,
            Err(_) => continue,
        };
        for entry in reader.flatten() {
            let path = entry.path();
            let is_bundle =
                path.is_dir() && path.extension().map(|e| e == "app").unwrap_or(false);
            if is_bundle {
                apps.push(AppInfo::from_bundle_path(&path, &ctx.sizer));
            }
        }
    }
    apps.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    apps
}

/// Find files plausibly belonging to `app` in the well-known roots.
/// Returns an empty list — not an error — when nothing matches.
pub fn find_leftovers(app: &AppInfo, ctx: &ScanContext) -> Vec<LeftoverItem> {
    let roots = [
        (ctx.dirs.user_caches(), LeftoverKind::Cache),
        (ctx.dirs.preferences(), LeftoverKind::Preference),
        (ctx.dirs.app_support(), LeftoverKind::SupportFile),
        (ctx.dirs.containers(), LeftoverKind::SupportFile),
        (ctx.dirs.user_logs(), LeftoverKind::Log),
        (ctx.dirs.saved_state(), LeftoverKind::Other),
    ];

    let mut items: Vec<LeftoverItem> = Vec::new();
    for (root, kind) in roots {
        let reader = match fs::read_dir(&root) {
            Ok(reader) => reader,
            Err(_) => continue, // root absent or unreadable — nothing to find
        };
        for entry in reader.flatten() {
            let entry_name = entry.file_name().to_string_lossy().into_owned();
            if !matches_app(&entry_name, app) {
                continue;
            }
            let path = entry.path();
            items.push(LeftoverItem {
                size: ctx.sizer.size_of(&path),
                name: CompactString::new(&entry_name),
                path,
                kind,
            });
        }
    }
    items.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    items
}

/// Whether `app` lives somewhere the engine must not delete from; the
/// caller surfaces a manual removal step for the bundle itself.
pub fn in_protected_location(app: &AppInfo) -> bool {
    app.path.starts_with("/Applications") || app.path.starts_with("/System/Applications")
}

/// Case-insensitive match against the app's identifiers: the bundle id
/// exactly or as a dotted prefix (`com.example.app.savedState`), or
/// the display name as a substring (minimum three characters, so short
/// names don't match half the library).
fn matches_app(entry_name: &str, app: &AppInfo) -> bool {
    let entry = entry_name.to_lowercase();
    if let Some(bundle_id) = &app.bundle_id {
        let bundle = bundle_id.to_lowercase();
        if entry == bundle || entry.starts_with(&format!("{bundle}.")) {
            return true;
        }
    }
    let name = app.name.to_lowercase();
    name.len() >= 3 && entry.contains(&name)
}

/// Best-effort `CFBundleIdentifier` extraction from a textual plist.
/// Binary plists simply yield `None`.
fn read_bundle_identifier(bundle: &Path) -> Option<String> {
    let plist = fs::read_to_string(bundle.join("Contents/Info.plist")).ok()?;
    let key = plist.find("<key>CFBundleIdentifier</key>")?;
    let rest = &plist[key..];
    let start = rest.find("<string>")? + "<string>".len();
    let end = rest[start..].find("</string>")? + start;
    let id = rest[start..end].trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
