/*!
 * Reporting functionality for allcode
 *
 * Renders a console summary of an export run using the tabled library.
 */

use std::collections::BTreeMap;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::export::ExportOutcome;
use crate::types::{FileRecord, TextEncoding};
use crate::utils::format_file_size;

/// Show every file up to this many, otherwise only the largest ten
const FULL_LISTING_LIMIT: usize = 15;
const TOP_FILES: usize = 10;

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for export results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string for a finished run
    pub fn generate_report(&self, outcome: &ExportOutcome) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(outcome),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, outcome: &ExportOutcome) {
        println!("\n{}", self.generate_report(outcome));
    }

    // Keep the tail of long paths, which carries the file name
    fn format_path(&self, path: &str, max_len: usize) -> String {
        let count = path.chars().count();
        if count <= max_len {
            return path.to_string();
        }
        let tail: String = path.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    }

    fn create_summary_table(&self, outcome: &ExportOutcome) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let manifest = &outcome.manifest;
        let total_bytes: u64 = manifest.files.iter().map(|f| f.size_bytes).sum();

        let mut rows = vec![
            SummaryRow {
                key: "Project Root".to_string(),
                value: manifest.project_root.clone(),
            },
            SummaryRow {
                key: "Text Export".to_string(),
                value: outcome.text_path.display().to_string(),
            },
            SummaryRow {
                key: "Manifest".to_string(),
                value: outcome.manifest_path.display().to_string(),
            },
            SummaryRow {
                key: "Files Exported".to_string(),
                value: manifest.file_count.to_string(),
            },
            SummaryRow {
                key: "Total Size".to_string(),
                value: format_file_size(total_bytes),
            },
        ];

        for (encoding, count) in encoding_histogram(&manifest.files) {
            let marker = if encoding.is_fallback() {
                " (possibly binary)"
            } else {
                ""
            };
            rows.push(SummaryRow {
                key: format!("Encoding {}", encoding),
                value: format!("{} files{}", count, marker),
            });
        }

        rows.push(SummaryRow {
            key: "Process Time".to_string(),
            value: format!("{:.4?}", outcome.duration),
        });

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, outcome: &ExportOutcome) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Size")]
            size: String,

            #[tabled(rename = "Encoding")]
            encoding: String,

            #[tabled(rename = "SHA256")]
            sha256: String,
        }

        let mut files: Vec<&FileRecord> = outcome.manifest.files.iter().collect();
        if files.len() > FULL_LISTING_LIMIT {
            files.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
            files.truncate(TOP_FILES);
        }

        let rows: Vec<FileRow> = files
            .iter()
            .map(|record| FileRow {
                path: self.format_path(&record.path, 60),
                size: format_file_size(record.size_bytes),
                encoding: record.encoding_read.to_string(),
                sha256: record.sha256.chars().take(12).collect(),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, outcome: &ExportOutcome) -> String {
        let files_table = self.create_files_table(outcome);
        let summary_table = self.create_summary_table(outcome);

        let files_title = if outcome.manifest.files.len() > FULL_LISTING_LIMIT {
            "TOP 10 LARGEST FILES"
        } else {
            "EXPORTED FILES"
        };

        format!(
            "{}\n{}\n\nEXPORT COMPLETE\n{}",
            files_title, files_table, summary_table
        )
    }
}

/// Number of files read with each encoding
pub fn encoding_histogram(files: &[FileRecord]) -> BTreeMap<TextEncoding, usize> {
    let mut counts = BTreeMap::new();
    for record in files {
        *counts.entry(record.encoding_read).or_insert(0) += 1;
    }
    counts
}
