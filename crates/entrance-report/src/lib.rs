//! entrance-report: exports and reports generated from the student store.

pub mod backup;
pub mod csv;
pub mod rankings;
pub mod summary;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// `dir/<stem>_<YYYYMMDD_HHMMSS>.<ext>`, stamped with local time.
pub fn timestamped_path(dir: &Path, stem: &str, ext: &str, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("{stem}_{}.{ext}", now.format("%Y%m%d_%H%M%S")))
}

/// Text truncated to at most `width` characters, for fixed-width columns.
pub(crate) fn clip(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}
