/*!
 * Discovery of exportable files under the project root
 */

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::Result;
use crate::types::FileCandidate;
use crate::utils::{normalize_extension, to_forward_slashes};

/// Scanner for exportable files
pub struct Scanner {
    /// Names of top-level directories to skip
    exclude_dirs: BTreeSet<String>,
    /// File names to skip at any depth
    exclude_files: BTreeSet<String>,
    /// Normalized extensions to keep
    allowed_exts: BTreeSet<String>,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: &Config, progress: Arc<ProgressBar>) -> Self {
        Self {
            exclude_dirs: config.exclude_dirs.iter().cloned().collect(),
            exclude_files: config.excluded_file_names(),
            allowed_exts: config.allowed_extensions(),
            progress,
        }
    }

    /// Enumerate every regular file under `root` that passes the exclusion
    /// rules and the extension filter, sorted case-insensitively by relative
    /// path.
    ///
    /// Directory exclusion only looks at the first component of the relative
    /// path: `root/.git/config` is skipped while `root/src/.git/x.py` is kept.
    pub fn discover(&self, root: &Path) -> Result<Vec<FileCandidate>> {
        self.progress
            .set_message(format!("Scanning {}", root.display()));

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded_top_level(e));

        let mut candidates = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.depth() == 0 || !is_regular_file(&entry) {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative_path = to_forward_slashes(relative);

            let file_name = entry.file_name().to_string_lossy();
            if self.exclude_files.contains(file_name.as_ref()) {
                debug!(path = %relative_path, "skipping excluded file name");
                continue;
            }

            if !self.has_allowed_extension(entry.path()) {
                trace!(path = %relative_path, "extension not selected");
                continue;
            }

            debug!(path = %relative_path, "selected for export");
            candidates.push(FileCandidate {
                absolute_path: entry.path().to_path_buf(),
                relative_path,
            });
        }

        sort_candidates(&mut candidates);
        Ok(candidates)
    }

    /// True for a direct child of the root whose name is an excluded
    /// directory name
    fn is_excluded_top_level(&self, entry: &DirEntry) -> bool {
        if entry.depth() != 1 {
            return false;
        }
        let excluded = self
            .exclude_dirs
            .contains(entry.file_name().to_string_lossy().as_ref());
        if excluded {
            debug!(name = %entry.file_name().to_string_lossy(), "skipping excluded directory");
        }
        excluded
    }

    fn has_allowed_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| normalize_extension(&ext.to_string_lossy()))
            .is_some_and(|ext| self.allowed_exts.contains(&ext))
    }
}

/// Regular files, plus symlinks whose target is a regular file
fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink()
        && fs::metadata(entry.path())
            .map(|m| m.is_file())
            .unwrap_or(false)
}

/// Case-insensitive order by relative path, ties broken by the exact path
pub fn sort_candidates(candidates: &mut [FileCandidate]) {
    candidates.sort_by(|a, b| {
        a.relative_path
            .to_lowercase()
            .cmp(&b.relative_path.to_lowercase())
            .then_with(|| a.relative_path.cmp(&b.relative_path))
    });
}
