//! CLI tool to extract symbol tags from Go and Kotlin files.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tagscan::{Error, KotlinStrategy, Language, ScanOptions, Tag, TagSink};

/// Extract declaration tags from source files.
///
/// Examples:
///   tagscan main.go                  # Tag a Go file
///   tagscan --qualified src/*.go     # Add package-qualified entries
///   tagscan --grammar --format json App.kt
#[derive(Parser, Debug)]
#[command(name = "tagscan")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Source files to scan
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Language for every file (go, kotlin); default is by extension
    #[arg(short, long)]
    language: Option<Language>,

    /// Also emit an entry named by each scoped tag's qualified name
    #[arg(long)]
    qualified: bool,

    /// Use the grammar-driven Kotlin scanner
    ///
    /// Tracks class and object scopes, but stops at the first syntax
    /// error in a file.
    #[arg(long)]
    grammar: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Tags)]
    format: Format,

    /// Log scanner decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Tab-separated tag lines
    Tags,
    /// One JSON array of tag objects
    Json,
}

#[derive(Serialize)]
struct FileTag {
    file: String,
    #[serde(flatten)]
    tag: Tag,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "tagscan=debug"
    } else {
        "tagscan=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let strategy = if cli.grammar {
        KotlinStrategy::Grammar
    } else {
        KotlinStrategy::HandWritten
    };
    let options = ScanOptions::new()
        .qualified_tags(cli.qualified)
        .kotlin_strategy(strategy);

    let mut had_error = false;
    let mut records = Vec::new();
    let mut out = io::stdout().lock();

    for path in &cli.files {
        let file = path.display().to_string();
        let Some(language) = cli.language.or_else(|| Language::from_path(path)) else {
            eprintln!("{}", Error::UnknownLanguage(file));
            had_error = true;
            continue;
        };
        let input = match fs::read(path) {
            Ok(input) => input,
            Err(source) => {
                let err = Error::Io {
                    path: path.clone(),
                    source,
                };
                eprintln!("{err}");
                had_error = true;
                continue;
            }
        };

        let options = options.clone().file_name(file.clone());
        let mut sink = TagSink::new();
        // The scanner logs the syntax error itself.
        if tagscan::scan(language, &input, &options, &mut sink).is_err() {
            had_error = true;
        }

        match cli.format {
            Format::Tags => {
                if write_tags(&mut out, &file, &sink).is_err() {
                    return ExitCode::FAILURE;
                }
            }
            Format::Json => records.extend(sink.into_tags().into_iter().map(|tag| FileTag {
                file: file.clone(),
                tag,
            })),
        }
    }

    if cli.format == Format::Json {
        let written = serde_json::to_writer_pretty(&mut out, &records)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(out));
        if let Err(err) = written {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// `name<TAB>file<TAB>line;"<TAB>kind[<TAB>parent-kind:parent]`
fn write_tags(out: &mut impl Write, file: &str, sink: &TagSink) -> io::Result<()> {
    for tag in sink {
        write!(out, "{}\t{file}\t{};\"\t{}", tag.name, tag.line, tag.letter())?;
        let parent = tag
            .scope
            .and_then(|scope| Some((sink.get(scope)?, sink.qualified_name(scope)?)));
        if let Some((parent, qualified)) = parent {
            write!(out, "\t{}:{qualified}", parent.kind_name())?;
        }
        writeln!(out)?;
    }
    Ok(())
}
