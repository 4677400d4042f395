/// Data model — scan entries, result containers, size formatting.
pub mod entry;
pub mod size;

pub use entry::{prune_categories, CleanableCategory, CleanableItem, ScanEntry};
pub use size::{format_count, format_size};
