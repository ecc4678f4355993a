//! Go tag scanner.
//!
//! A hand-written tokenizer with automatic statement termination feeds
//! a declaration walker that tags packages, functions, methods, and
//! `const`/`type`/`var` specs. Bodies, imports and initializers are
//! skipped as balanced groups.

pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::{Lexer, tokenize};
pub use parser::scan;
pub use token::{Keyword, Token, TokenKind};
