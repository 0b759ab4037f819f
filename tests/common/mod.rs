#![allow(dead_code)]

use std::path::PathBuf;

use sls_front::{Diagnostics, Parsed, Token, TokenKind, format_notices, parse, tokenize};

pub const FILE: &str = "test.sls";

/// Tokenize `input`, returning the tokens (EOF included) and diagnostics.
pub fn lex(input: &str) -> (Vec<Token>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize(FILE, input, &mut diagnostics);
    (tokens, diagnostics)
}

pub fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

pub fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// Diagnostic messages in the order they were raised.
pub fn messages(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics.iter().map(|d| d.message()).collect()
}

pub fn recognize(input: &str) -> (Parsed, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let parsed = parse(FILE, input, &mut diagnostics);
    (parsed, diagnostics)
}

pub fn notices(input: &str) -> String {
    let (parsed, _) = recognize(input);
    format_notices(&parsed.tree, parsed.root)
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
