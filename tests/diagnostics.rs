//! Diagnostic ordering and rendering, through the library entry points.

mod common;

use common::{fixture, messages};
use sls_front::{Error, TokenKind, compile_file, compile_str, tokenize_file};

// -----------------------------------------------------------
// Rendering.
// -----------------------------------------------------------

#[test]
fn render_block_layout() {
    let out = compile_str("main.sls", "fun f() {\n    x;\n}\n");
    assert_eq!(
        out.diagnostics.render(),
        "main.sls:2:5: error: expected statement\n    x;\n    ^\n"
    );
}

#[test]
fn caret_at_first_column() {
    let out = compile_str("main.sls", "\u{1}");
    assert_eq!(
        out.diagnostics.render(),
        "main.sls:1:1: error: unexpected invalid token\n\u{1}\n^\n"
    );
}

#[test]
fn display_is_header_only() {
    let out = compile_str("main.sls", "fun (");
    let first = out.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(first.to_string(), "main.sls:1:5: error: expected function name");
    assert_eq!(first.message(), "expected function name");
}

#[test]
fn clean_source_renders_nothing() {
    let out = compile_str("main.sls", "fun f() { x = 1; }");
    assert!(out.succeeded());
    assert_eq!(out.diagnostics.render(), "");
}

// -----------------------------------------------------------
// Ordering.
// -----------------------------------------------------------

#[test]
fn records_keep_raise_order() {
    let out = compile_str(
        "main.sls",
        "fun f(int a int b) {}\nfun g() {\n  c = 'xy;\n  y;\n  z = 1'2';\n}\n",
    );
    assert_eq!(
        messages(&out.diagnostics),
        vec![
            "expected comma",
            "expected left brace",
            "unterminated character constant",
            "expected statement",
            "trailing separators are not allowed",
        ]
    );
    let lines: Vec<_> = out.diagnostics.iter().map(|d| d.span.line).collect();
    assert_eq!(lines, vec![1, 1, 3, 4, 5]);
}

// -----------------------------------------------------------
// Files.
// -----------------------------------------------------------

#[test]
fn compile_clean_fixture() {
    let out = compile_file(&fixture("main.sls")).expect("read fixture");
    assert!(out.succeeded(), "{}", out.diagnostics.render());
    assert_eq!(
        sls_front::format_notices(&out.parsed.tree, out.parsed.root),
        "function: add\n\
         parameter: int a\n\
         parameter: int b\n\
         var declaration: z with type int\n\
         assignment: z = 0 <- Int32\n\
         assignment: z = a\n\
         function call: io.print\n\
         param: z\n\
         param: done\n\
         function: main\n\
         var declaration: total with type long\n\
         assignment: total = 1000000L <- Int64\n\
         function call: add\n\
         param: total\n\
         param: 2\n"
    );
    assert!(out.parsed.symbols.contains_key("main"));
}

#[test]
fn compile_broken_fixture() {
    let path = fixture("broken.sls");
    let out = compile_file(&path).expect("read fixture");
    let file = path.to_string_lossy().into_owned();

    let headers: Vec<_> = out.diagnostics.iter().map(ToString::to_string).collect();
    assert_eq!(
        headers,
        vec![
            format!("{file}:1:15: error: expected comma"),
            format!("{file}:1:19: error: expected left brace"),
            format!("{file}:5:5: error: expected statement"),
            format!("{file}:6:12: error: unterminated string literal"),
            format!("{file}:8:1: error: unexpected end of file"),
        ]
    );

    let rendered = out.diagnostics.render();
    let first: Vec<_> = rendered.lines().take(3).collect();
    assert_eq!(
        first,
        vec![
            format!("{file}:1:15: error: expected comma").as_str(),
            "fun add(int a int b) {",
            "              ^",
        ]
    );
}

#[test]
fn tokenize_file_uses_absolute_name() {
    let path = fixture("broken.sls");
    let (tokens, diagnostics) = tokenize_file(&path).expect("read fixture");
    let file = path.to_string_lossy().into_owned();
    assert_eq!(tokens[0].span.file, file);
    assert!(tokens.last().is_some_and(|t| t.kind == TokenKind::EndOfFile));
    let headers: Vec<_> = diagnostics.iter().map(ToString::to_string).collect();
    assert_eq!(
        headers,
        vec![format!("{file}:6:12: error: unterminated string literal")]
    );
}

#[test]
fn missing_file() {
    let err = compile_file(&fixture("absent.sls")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(err.to_string().contains("absent.sls"));
}
