/*!
 * Utility functions and default settings for allcode
 */

use std::path::Path;

use once_cell::sync::Lazy;

/// Default name of the concatenated text artifact
pub const DEFAULT_OUTPUT_TXT: &str = "ALL_CODE.txt";

/// Default name of the JSON manifest
pub const DEFAULT_OUTPUT_MANIFEST: &str = "ALL_CODE_MANIFEST.json";

/// Extensions always exported: source code and config
pub static DEFAULT_INCLUDE_EXTS: Lazy<Vec<&'static str>> = Lazy::new(|| vec!["py", "ini"]);

/// Extensions exported unless `--no-optional` is given: plain text and docs
pub static DEFAULT_OPTIONAL_EXTS: Lazy<Vec<&'static str>> = Lazy::new(|| vec!["txt", "md"]);

/// Top-level directories never exported
pub static DEFAULT_EXCLUDE_DIRS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git",
        // Python
        "__pycache__",
        ".venv",
        "venv",
        ".mypy_cache",
        ".pytest_cache",
        // Build & Dist
        "dist",
        "build",
        // IDEs & Editors
        ".idea",
        ".vscode",
    ]
});

/// Normalize an extension for comparison: no leading dot, lowercase.
/// Returns `None` for an empty extension.
pub fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Render a relative path with `/` separators regardless of platform
pub fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
