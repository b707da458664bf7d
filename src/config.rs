//! Resolved run configuration.
//!
//! `Config::resolve` turns the raw option store into a fully-defaulted,
//! immutable configuration. Resolution never fails: a malformed value is
//! reported on stderr and replaced by its default, so only the absence of
//! usable input files can stop a run later on.

use std::path::PathBuf;

use crate::cli::{OPT_INPUT, OPT_KEEP_SIZE, OPT_OUTPUT, OPT_SORT, OPT_TYPE, ParsedArgs};

/// Extensions accepted when no `-t` filter is given.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".bmp", ".gif", ".tiff"];

/// Ordering applied to the files found within a single directory input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    FileName,
    ModifiedTime,
    CreationTime,
}

impl SortOrder {
    /// Accepts the documented spellings, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "name" => Some(Self::FileName),
            "time" | "modified" | "mtime" => Some(Self::ModifiedTime),
            "created" | "ctime" => Some(Self::CreationTime),
            _ => None,
        }
    }
}

/// Immutable configuration for one run.
#[derive(Debug, PartialEq)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub keep_original_size: bool,
    /// Normalized allow-list: lower-case, dot-prefixed, never empty.
    pub extensions: Vec<String>,
    pub sort_order: SortOrder,
}

impl Config {
    pub fn resolve(args: &ParsedArgs) -> Self {
        let inputs = match args.values(&OPT_INPUT) {
            Some(values) => values.iter().map(PathBuf::from).collect(),
            None => vec![PathBuf::from(".")],
        };

        let output = args
            .value(&OPT_OUTPUT)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output.pdf"));

        // An explicit value must parse as a bool or the default is kept,
        // with a warning rather than a silent fallback. With no value at
        // all (absent, or supplied as a bare flag) the default true holds,
        // but a valued alias always outranks a bare one.
        let keep_original_size = match args.value(&OPT_KEEP_SIZE) {
            None => true,
            Some(value) => value.to_lowercase().parse::<bool>().unwrap_or_else(|_| {
                eprintln!("warning: ignoring invalid --keep-size value '{value}', using true");
                true
            }),
        };

        let extensions = match args.values(&OPT_TYPE) {
            Some(values) if !values.is_empty() => {
                values.iter().map(|ext| normalize_extension(ext)).collect()
            }
            _ => DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        };

        let sort_order = match args.value(&OPT_SORT) {
            None => SortOrder::default(),
            Some(value) => SortOrder::parse(value).unwrap_or_else(|| {
                eprintln!("warning: ignoring unknown --sort order '{value}', using name");
                SortOrder::default()
            }),
        };

        Self {
            inputs,
            output,
            keep_original_size,
            extensions,
            sort_order,
        }
    }
}

/// Lower-cases an extension and prefixes a dot if the user left it off.
fn normalize_extension(ext: &str) -> String {
    let lowered = ext.to_lowercase();
    if lowered.starts_with('.') {
        lowered
    } else {
        format!(".{lowered}")
    }
}
