/// Analysis modules — algorithms over scanned file populations.
pub mod duplicates;
pub mod large_files;
pub mod leftovers;

pub use duplicates::{find_duplicates, DuplicateFile, DuplicateGroup, GroupSort};
pub use large_files::{filter_large, sort_entries, SortOrder};
pub use leftovers::{find_leftovers, installed_apps, AppInfo, LeftoverItem, LeftoverKind};
