//! Kotlin tag scanners.
//!
//! Two independent scanners share the lexer:
//!
//! - [`parser`] walks the token stream and fires on declaration keywords.
//!   It tolerates anything and tags no scopes.
//! - [`grammar`] matches declarations rule by rule and hands the fired
//!   [`Action`]s to [`actions::ParserCtx`], which tracks kinds and scopes.
//!   It stops at the first syntax error.

pub mod actions;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod token;

pub use actions::ParserCtx;
pub use grammar::{Action, Grammar, SyntaxError, SyntaxErrorKind};
pub use lexer::{Lexer, tokenize};
pub use token::{Declaration, Token, TokenKind};

use crate::options::{KotlinStrategy, ScanOptions};
use crate::tag::TagSink;

/// Scan Kotlin source with the scanner selected in `options`.
///
/// # Errors
///
/// Only the grammar scanner fails, with the first [`SyntaxError`].
pub fn scan(input: &[u8], options: &ScanOptions, sink: &mut TagSink) -> Result<(), SyntaxError> {
    match options.kotlin_strategy {
        KotlinStrategy::HandWritten => {
            parser::scan(input, options, sink);
            Ok(())
        }
        KotlinStrategy::Grammar => actions::scan(input, options, sink),
    }
}
