/*!
 * Text artifact and manifest writer for allcode
 */

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};
use tracing::info;

use crate::error::{AllCodeError, IoResultExt, Result};
use crate::types::{ExportEntry, ExportManifest};

/// Title line at the top of the text artifact
pub const ARTIFACT_TITLE: &str = "ALL_CODE export";

const BANNER_WIDTH: usize = 80;

/// Renders and persists both export artifacts
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Build the concatenated text artifact.
    ///
    /// Lines are joined with `\n` and any `\r\n` left in file bodies is
    /// folded to `\n`, so identical inputs give identical bytes on every
    /// platform.
    pub fn render_text(manifest: &ExportManifest, entries: &[ExportEntry]) -> String {
        let header_rule = "=".repeat(BANNER_WIDTH);
        let banner = "#".repeat(BANNER_WIDTH);

        let mut lines: Vec<String> = vec![
            ARTIFACT_TITLE.to_string(),
            format!("Generated at: {}", manifest.generated_at),
            format!("Project root: {}", manifest.project_root),
            format!("File count: {}", manifest.file_count),
            header_rule,
            String::new(),
        ];

        for entry in entries {
            let record = &entry.record;
            lines.push(banner.clone());
            lines.push(format!("# FILE: {}", record.path));
            lines.push(format!("# SIZE: {} bytes", record.size_bytes));
            lines.push(format!("# SHA256: {}", record.sha256));
            lines.push(format!("# ENCODING_READ: {}", record.encoding_read));
            lines.push(banner.clone());
            lines.push(String::new());
            lines.push(entry.decoded.text.trim_end_matches('\n').to_string());
            lines.push(String::new());
            lines.push(String::new());
        }

        lines.join("\n").replace("\r\n", "\n")
    }

    /// Serialize the manifest as pretty-printed JSON
    pub fn render_manifest(manifest: &ExportManifest) -> Result<String> {
        Ok(serde_json::to_string_pretty(manifest)?)
    }

    /// Replace `dest` with `contents` by writing a sibling temporary file
    /// and renaming it into place
    pub fn write_atomic(dest: &Path, contents: &str) -> Result<()> {
        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = Self::temp_file_for(dest, dir)?;
        tmp.write_all(contents.as_bytes()).at_path(tmp.path())?;
        tmp.as_file().sync_all().at_path(tmp.path())?;
        tmp.persist(dest)
            .map_err(|e| AllCodeError::io(dest, e.error))?;
        info!(path = %dest.display(), bytes = contents.len(), "wrote artifact");
        Ok(())
    }

    /// Temporary file that ends up with the permissions a plain write would
    /// give `dest`: the existing mode when it exists, otherwise 0o666 under
    /// the process umask.
    fn temp_file_for(dest: &Path, dir: &Path) -> Result<NamedTempFile> {
        let existing = fs::metadata(dest).ok().map(|m| m.permissions());

        let mut builder = Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let tmp = builder.tempfile_in(dir).at_path(dir)?;

        if let Some(permissions) = existing {
            tmp.as_file()
                .set_permissions(permissions)
                .at_path(tmp.path())?;
        }
        Ok(tmp)
    }

    /// Render and persist both artifacts. The text artifact is written
    /// first, then the manifest.
    pub fn write(
        manifest: &ExportManifest,
        entries: &[ExportEntry],
        text_path: &Path,
        manifest_path: &Path,
    ) -> Result<()> {
        let text = Self::render_text(manifest, entries);
        let json = Self::render_manifest(manifest)?;
        Self::write_atomic(text_path, &text)?;
        Self::write_atomic(manifest_path, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::types::{DecodedFile, FileRecord, TextEncoding};

    fn entry(path: &str, text: &str) -> ExportEntry {
        ExportEntry {
            decoded: DecodedFile {
                text: text.to_string(),
                encoding_used: TextEncoding::Utf8,
            },
            record: FileRecord {
                path: path.to_string(),
                size_bytes: text.len() as u64,
                sha256: "ab".repeat(32),
                encoding_read: TextEncoding::Utf8,
            },
        }
    }

    fn manifest(entries: &[ExportEntry]) -> ExportManifest {
        ExportManifest {
            generated_at: "2026-10-15T09:30:00".to_string(),
            project_root: "/proj".to_string(),
            file_count: entries.len(),
            files: entries.iter().map(|e| e.record.clone()).collect(),
        }
    }

    #[test]
    fn text_layout_matches_expected_bytes() {
        let entries = vec![entry("a.py", "print(1)\n\n")];
        let text = ArtifactWriter::render_text(&manifest(&entries), &entries);

        let rule = "=".repeat(80);
        let banner = "#".repeat(80);
        let hash = "ab".repeat(32);
        let expected = format!(
            "ALL_CODE export\nGenerated at: 2026-10-15T09:30:00\nProject root: /proj\nFile count: 1\n{rule}\n\n\
             {banner}\n# FILE: a.py\n# SIZE: 10 bytes\n# SHA256: {hash}\n# ENCODING_READ: utf-8\n{banner}\n\nprint(1)\n\n"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn crlf_is_normalized() {
        let entries = vec![entry("win.ini", "[x]\r\nk=1\r\n")];
        let text = ArtifactWriter::render_text(&manifest(&entries), &entries);
        assert!(!text.contains('\r'));
        assert!(text.contains("[x]\nk=1\n"));
    }

    #[test]
    fn manifest_uses_stable_keys() {
        let entries = vec![entry("a.py", "x")];
        let json = ArtifactWriter::render_manifest(&manifest(&entries)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["generated_at"], "2026-10-15T09:30:00");
        assert_eq!(value["project_root"], "/proj");
        assert_eq!(value["file_count"], 1);
        let file = &value["files"][0];
        assert_eq!(file["path"], "a.py");
        assert_eq!(file["size_bytes"], 1);
        assert_eq!(file["encoding_read"], "utf-8");
        assert!(json.contains("\n  \"file_count\": 1"));
    }

    #[test]
    fn write_atomic_overwrites() {
        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("ALL_CODE.txt");
        std::fs::write(&dest, "stale contents from a prior run").unwrap();

        ArtifactWriter::write_atomic(&dest, "fresh").unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "fresh");
        let leftovers = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn new_artifact_gets_umask_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let plain = temp_dir.path().join("plain.txt");
        fs::write(&plain, "x").unwrap();
        let dest = temp_dir.path().join("ALL_CODE.txt");

        ArtifactWriter::write_atomic(&dest, "fresh").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&dest), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let dest = temp_dir.path().join("ALL_CODE_MANIFEST.json");
        fs::write(&dest, "{}").unwrap();
        fs::set_permissions(&dest, fs::Permissions::from_mode(0o644)).unwrap();

        ArtifactWriter::write_atomic(&dest, "{\"file_count\": 1}").unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "{\"file_count\": 1}");
    }
}
