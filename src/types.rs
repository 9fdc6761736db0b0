/*!
 * Core types and data structures for the allcode export pipeline
 */

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Text encodings tried when decoding a file, in priority order
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum TextEncoding {
    /// Strict UTF-8; a leading byte-order mark stays in the text
    #[strum(serialize = "utf-8")]
    #[serde(rename = "utf-8")]
    Utf8,
    /// UTF-8 with the byte-order mark removed
    #[strum(serialize = "utf-8-sig")]
    #[serde(rename = "utf-8-sig")]
    Utf8Sig,
    /// Windows Central European code page
    #[strum(serialize = "cp1250")]
    #[serde(rename = "cp1250")]
    Cp1250,
    /// ISO-8859-1, accepts every byte value
    #[strum(serialize = "latin-1")]
    #[serde(rename = "latin-1")]
    Latin1,
}

impl TextEncoding {
    /// True for the final catch-all encoding. A file decoded with it is
    /// most likely binary.
    pub fn is_fallback(self) -> bool {
        self == Self::Latin1
    }
}

/// A regular file selected for export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Location on disk
    pub absolute_path: PathBuf,
    /// Path relative to the root, always with `/` separators
    pub relative_path: String,
}

/// Result of decoding a candidate's bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    /// Decoded content, verbatim
    pub text: String,
    /// Encoding that accepted the bytes
    pub encoding_used: TextEncoding,
}

/// Manifest entry for one exported file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Relative path with `/` separators
    pub path: String,
    /// Length of the raw content
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the raw bytes
    pub sha256: String,
    /// Encoding the content was read with
    pub encoding_read: TextEncoding,
}

/// Structured record of a whole export run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Local time, second precision (`%Y-%m-%dT%H:%M:%S`)
    pub generated_at: String,
    /// Root that was scanned
    pub project_root: String,
    /// Number of entries in `files`
    pub file_count: usize,
    /// Records sorted case-insensitively by path
    pub files: Vec<FileRecord>,
}

/// One fully processed file, ready to be serialized
#[derive(Debug, Clone)]
pub struct ExportEntry {
    pub decoded: DecodedFile,
    pub record: FileRecord,
}
