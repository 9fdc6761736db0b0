/*!
 * allcode - Export a project's source files for sharing
 *
 * Walks a project directory, selects files by extension, and produces a
 * concatenated text snapshot together with a JSON manifest recording the
 * size, SHA-256 and text encoding of every exported file.
 */

pub mod config;
pub mod decode;
pub mod digest;
pub mod error;
pub mod export;
pub mod report;
pub mod scanner;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::Config;
pub use decode::decode_bytes;
pub use digest::sha256_hex;
pub use error::{AllCodeError, Result};
pub use export::{ExportOutcome, Exporter};
pub use report::{ReportFormat, Reporter};
pub use scanner::Scanner;
pub use types::{DecodedFile, ExportEntry, ExportManifest, FileCandidate, FileRecord, TextEncoding};
pub use writer::ArtifactWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
