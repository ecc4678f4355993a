//! Single-pass symbol tag extraction for Go and Kotlin.
//!
//! Each scanner reads a source file once and appends declaration tags
//! (name, kind, line, byte offset, optional scope) to a [`TagSink`] in
//! source order. The Go scanner and the hand-written Kotlin scanner
//! tolerate malformed input. The grammar-driven Kotlin scanner stops at
//! the first syntax error.
//!
//! # Quick start
//!
//! ## Tag a Go file
//!
//! ```
//! use tagscan::{Language, ScanOptions, TagKind, scan_str};
//!
//! let input = "package demo\n\nfunc Run() {}\n";
//! let options = ScanOptions::new().qualified_tags(true);
//! let tags = scan_str(Language::Go, input, &options).unwrap();
//!
//! let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
//! assert_eq!(names, ["demo", "Run", "demo.Run"]);
//! assert_eq!(tags[1].kind, TagKind::Function);
//! assert_eq!(tags[1].line, 3);
//! ```
//!
//! ## Scoped Kotlin tags
//!
//! ```
//! use tagscan::{KotlinStrategy, Language, ScanOptions, scan_str};
//!
//! let input = "class Outer {\n    fun inner() {}\n}\n";
//! let options = ScanOptions::new().kotlin_strategy(KotlinStrategy::Grammar);
//! let tags = scan_str(Language::Kotlin, input, &options).unwrap();
//!
//! assert_eq!(tags[1].name, "inner");
//! assert_eq!(tags[1].qualified_name.as_deref(), Some("Outer.inner"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod go;
pub mod kotlin;
pub mod options;
pub mod source;
pub mod tag;

use std::io;
use std::path::{Path, PathBuf};

pub use kotlin::{SyntaxError, SyntaxErrorKind};
pub use options::{KotlinStrategy, Language, ScanOptions};
pub use source::{LineIndex, Source};
pub use tag::{Tag, TagHandle, TagKind, TagSink};

/// Unified error type for scanning.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The grammar-driven Kotlin scanner rejected the input.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    /// No scanner for the named language or file extension.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Scan `input` as `language`, appending tags to `sink`.
///
/// Tags found before a syntax error stay in `sink`.
pub fn scan(
    language: Language,
    input: &[u8],
    options: &ScanOptions,
    sink: &mut TagSink,
) -> Result<(), SyntaxError> {
    match language {
        Language::Go => {
            go::scan(input, options, sink);
            Ok(())
        }
        Language::Kotlin => kotlin::scan(input, options, sink),
    }
}

/// Scan a source string in one step.
pub fn scan_str(language: Language, input: &str, options: &ScanOptions) -> Result<Vec<Tag>, Error> {
    let mut sink = TagSink::new();
    scan(language, input.as_bytes(), options, &mut sink)?;
    Ok(sink.into_tags())
}

/// Read and scan a file, picking the language from its extension.
pub fn scan_file(path: &Path, options: &ScanOptions) -> Result<Vec<Tag>, Error> {
    let language = Language::from_path(path)
        .ok_or_else(|| Error::UnknownLanguage(path.display().to_string()))?;
    let input = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut options = options.clone();
    if options.file_name.is_none() {
        options.file_name = Some(path.display().to_string());
    }
    let mut sink = TagSink::new();
    scan(language, &input, &options, &mut sink)?;
    Ok(sink.into_tags())
}
