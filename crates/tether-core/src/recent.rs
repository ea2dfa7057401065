//! Pruning of the host's recent-items list.
//!
//! When a session closes, its snapshot directory must disappear from
//! the host's "recent projects" list; the snapshot stays on disk but is
//! no longer advertised.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Strips a trailing path separator, leaving a bare root untouched.
pub fn strip_trailing_separator(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim_end_matches(MAIN_SEPARATOR);
    if trimmed.is_empty() {
        PathBuf::from(MAIN_SEPARATOR.to_string())
    } else {
        PathBuf::from(trimmed)
    }
}

/// Removes every entry whose normalized path equals the normalized
/// `target` from `recents`, preserving the relative order of the rest.
///
/// Normalization is `canonicalize` (the host's resolution hook)
/// followed by trailing-separator stripping. The input slice is not
/// mutated.
pub fn prune<F>(recents: &[PathBuf], target: &Path, canonicalize: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> PathBuf,
{
    let normalized_target = strip_trailing_separator(&canonicalize(target));
    recents
        .iter()
        .filter(|item| strip_trailing_separator(&canonicalize(item)) != normalized_target)
        .cloned()
        .collect()
}
