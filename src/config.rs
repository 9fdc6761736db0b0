/*!
 * Configuration handling for allcode
 */

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::ensure;
use crate::error::{AllCodeError, Result};
use crate::utils::{
    normalize_extension, DEFAULT_EXCLUDE_DIRS, DEFAULT_INCLUDE_EXTS, DEFAULT_OPTIONAL_EXTS,
    DEFAULT_OUTPUT_MANIFEST, DEFAULT_OUTPUT_TXT,
};

/// Command-line arguments for allcode
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "allcode",
    version = env!("CARGO_PKG_VERSION"),
    about = "Export a project's source files into one text snapshot plus a JSON manifest",
    long_about = "Walks a project directory, concatenates every selected source and documentation file into a single text export, and writes a JSON manifest with the size, SHA-256 and encoding of each file. Both artifacts land in the project root and are overwritten on every run."
)]
pub struct Args {
    /// Project root to export
    #[clap(default_value = ".")]
    pub root: PathBuf,

    /// Comma-separated list of extensions that are always exported [default: py,ini]
    #[clap(long, value_delimiter = ',')]
    pub include_ext: Option<Vec<String>>,

    /// Comma-separated list of additional extensions to export [default: txt,md]
    #[clap(long, value_delimiter = ',')]
    pub optional_ext: Option<Vec<String>>,

    /// Do not export the optional extensions
    #[clap(long)]
    pub no_optional: bool,

    /// Comma-separated list of top-level directory names to skip (replaces the defaults)
    #[clap(long, value_delimiter = ',')]
    pub exclude_dir: Option<Vec<String>>,

    /// Comma-separated list of extra file names to skip
    #[clap(long, value_delimiter = ',')]
    pub exclude_file: Vec<String>,

    /// File name of the text export, created in the root
    #[clap(long, default_value = DEFAULT_OUTPUT_TXT)]
    pub output_txt: String,

    /// File name of the JSON manifest, created in the root
    #[clap(long, default_value = DEFAULT_OUTPUT_MANIFEST)]
    pub output_manifest: String,

    /// Do not print the summary report or show progress
    #[clap(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Export configuration, passed explicitly into the pipeline
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to export
    pub root: PathBuf,

    /// Normalized extensions that are always exported
    pub include_exts: Vec<String>,

    /// Normalized extensions exported in addition to `include_exts`
    pub optional_exts: Vec<String>,

    /// Names of top-level directories to skip
    pub exclude_dirs: Vec<String>,

    /// Extra file names to skip, on top of the two output names
    pub exclude_files: Vec<String>,

    /// File name of the text export
    pub output_txt: String,

    /// File name of the JSON manifest
    pub output_manifest: String,

    /// Suppress progress and the summary report
    pub quiet: bool,

    /// Log verbosity requested on the command line
    pub verbosity: u8,
}

impl Config {
    /// Default configuration for exporting `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_exts: normalize_all(DEFAULT_INCLUDE_EXTS.iter().copied()),
            optional_exts: normalize_all(DEFAULT_OPTIONAL_EXTS.iter().copied()),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|d| d.to_string()).collect(),
            exclude_files: Vec::new(),
            output_txt: DEFAULT_OUTPUT_TXT.to_string(),
            output_manifest: DEFAULT_OUTPUT_MANIFEST.to_string(),
            quiet: false,
            verbosity: 0,
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let mut config = Self::new(args.root);

        if let Some(exts) = args.include_ext {
            config.include_exts = normalize_all(exts.iter().map(String::as_str));
        }
        if args.no_optional {
            config.optional_exts.clear();
        } else if let Some(exts) = args.optional_ext {
            config.optional_exts = normalize_all(exts.iter().map(String::as_str));
        }
        if let Some(dirs) = args.exclude_dir {
            config.exclude_dirs = dirs
                .into_iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
        }

        config.exclude_files = args
            .exclude_file
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        config.output_txt = args.output_txt;
        config.output_manifest = args.output_manifest;
        config.quiet = args.quiet;
        config.verbosity = args.verbose;
        config
    }

    /// Validate the configuration. Performs no I/O beyond checking the root.
    pub fn validate(&self) -> Result<()> {
        if !self.root.exists() {
            return Err(AllCodeError::RootNotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(AllCodeError::NotADirectory(self.root.clone()));
        }

        for name in [&self.output_txt, &self.output_manifest] {
            ensure!(
                is_plain_file_name(name),
                Config,
                "output name must be a plain file name, got {:?}",
                name
            );
        }
        ensure!(
            self.output_txt != self.output_manifest,
            Config,
            "text export and manifest must have different names ({})",
            self.output_txt
        );
        ensure!(
            !self.allowed_extensions().is_empty(),
            Config,
            "no file extensions selected for export"
        );

        Ok(())
    }

    /// Union of mandatory and optional extensions
    pub fn allowed_extensions(&self) -> BTreeSet<String> {
        self.include_exts
            .iter()
            .chain(self.optional_exts.iter())
            .cloned()
            .collect()
    }

    /// File names skipped during discovery, always including both outputs
    pub fn excluded_file_names(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self.exclude_files.iter().cloned().collect();
        names.insert(self.output_txt.clone());
        names.insert(self.output_manifest.clone());
        names
    }

    /// Locations of the text export and the manifest under `root`
    pub fn output_paths(&self, root: &Path) -> (PathBuf, PathBuf) {
        (root.join(&self.output_txt), root.join(&self.output_manifest))
    }
}

fn normalize_all<'a>(exts: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = exts.filter_map(normalize_extension).collect();
    out.sort();
    out.dedup();
    out
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}
