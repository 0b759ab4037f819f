//! Front end for the sls language: tokenizer, statement recognizer,
//! and diagnostics.
//!
//! Source text is scanned into [`Token`]s, runs of tokens are recognized
//! as functions, parameters, declarations, assignments and calls, and every
//! problem found along the way is collected into [`Diagnostics`] rather
//! than aborting the pass.
//!
//! # Quick start
//!
//! ```
//! use sls_front::{compile_str, format_notices};
//!
//! let out = compile_str("main.sls", "fun add(int a, int b) { a = b; }");
//! assert!(!out.diagnostics.has_errors());
//! assert_eq!(
//!     format_notices(&out.parsed.tree, out.parsed.root),
//!     "function: add\nparameter: int a\nparameter: int b\nassignment: a = b\n"
//! );
//! ```
//!
//! Errors render in the usual compiler layout:
//!
//! ```
//! use sls_front::compile_str;
//!
//! let out = compile_str("main.sls", "fun f() { s = \"open; }");
//! let rendered = out.diagnostics.render();
//! let lines: Vec<_> = rendered.lines().collect();
//! assert_eq!(lines[0], "main.sls:1:15: error: unterminated string literal");
//! assert_eq!(lines[1], "fun f() { s = \"open; }");
//! assert_eq!(lines[2], format!("{}^", " ".repeat(14)));
//! assert_eq!(lines[3], "main.sls:1:23: error: unexpected end of file");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod diagnostics;
pub mod formatter;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod tree;

use std::path::{Path, PathBuf};

pub use ast::{NodeData, SyntaxKind, SyntaxTree};
pub use diagnostics::{Diagnostic, Diagnostics, ErrorKind};
pub use formatter::{format_notices, format_tree};
pub use grammar::{Grammar, GrammarError, GrammarSymbol};
pub use lexer::{LexErrorKind, Lexer, Tokens, tokenize};
pub use parser::{ParseErrorKind, Parsed, Parser, Statement, SymbolTable, classify_statement, parse};
pub use token::{Span, Token, TokenKind};
pub use tree::{Node, NodeId, NodeRef, Tree, TreeError};

/// Errors that stop the front end before it can run.
///
/// Problems in the source itself never show up here; they are
/// collected as [`Diagnostic`]s.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Result of running the front end over one source.
#[derive(Debug)]
pub struct Compilation {
    pub parsed: Parsed,
    pub diagnostics: Diagnostics,
}

impl Compilation {
    /// Whether the source came through without any diagnostic.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Tokenize and recognize a source string in one step.
#[must_use]
pub fn compile_str(file: &str, input: &str) -> Compilation {
    let mut diagnostics = Diagnostics::new();
    let parsed = parse(file, input, &mut diagnostics);
    Compilation {
        parsed,
        diagnostics,
    }
}

/// Read a source file and run the front end over it.
///
/// The path is made absolute first; that is the name tokens and
/// diagnostics carry.
pub fn compile_file(path: &Path) -> Result<Compilation, Error> {
    let (file, input) = read_source(path)?;
    tracing::debug!(path = %file, bytes = input.len(), "compiling");
    Ok(compile_str(&file, &input))
}

/// Read a source file and tokenize it, naming it the way
/// [`compile_file`] does.
pub fn tokenize_file(path: &Path) -> Result<(Vec<Token>, Diagnostics), Error> {
    let (file, input) = read_source(path)?;
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize(&file, &input, &mut diagnostics);
    Ok((tokens, diagnostics))
}

/// Absolute file name and contents.
fn read_source(path: &Path) -> Result<(String, String), Error> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let absolute = std::path::absolute(path).map_err(io_error)?;
    let input = std::fs::read_to_string(&absolute).map_err(io_error)?;
    Ok((absolute.to_string_lossy().into_owned(), input))
}
