//! Text renderings of a syntax tree.
//!
//! [`format_notices`] produces the one-line-per-construct report the
//! compiler prints after recognition; [`format_tree`] is an indented dump
//! for debugging.

use std::fmt::Write as _;

use crate::ast::{SyntaxKind, SyntaxTree};
use crate::tree::NodeRef;

/// One notice per recognized construct, in source order.
///
/// ```text
/// function: add
/// parameter: int a
/// var declaration: z with type int
/// assignment: z = 0 <- Int32
/// ```
#[must_use]
pub fn format_notices(tree: &SyntaxTree, root: NodeRef) -> String {
    let mut out = String::new();
    for (node, _) in tree.descendants(root) {
        format_notice(&mut out, tree, node);
    }
    out
}

fn format_notice(out: &mut String, tree: &SyntaxTree, node: NodeRef) {
    let n = tree.get(node);
    let children = n.children();
    match n.kind {
        SyntaxKind::FunctionDecl => {
            let _ = writeln!(out, "function: {}", n.name);
        }
        SyntaxKind::ParamVarDecl => {
            let ty = first_of(tree, children, SyntaxKind::TypeRef).unwrap_or_default();
            let _ = writeln!(out, "parameter: {ty} {}", n.name);
        }
        SyntaxKind::VarDecl => {
            let ty = first_of(tree, children, SyntaxKind::TypeRef).unwrap_or_default();
            let init = children
                .iter()
                .map(|&c| tree.get(c))
                .find(|c| c.kind.is_literal() || c.kind == SyntaxKind::DeclRefExpr);
            if let Some(init) = init {
                let _ = writeln!(out, "var declaration: {} with type {ty}", n.name);
                let _ = writeln!(
                    out,
                    "assignment: {} = {} <- {}",
                    n.name, init.payload.value, init.payload.token_kind
                );
            } else {
                let _ = writeln!(out, "var declaration: {} {ty}", n.name);
            }
        }
        SyntaxKind::Assignment => {
            let value = children
                .first()
                .map(|&c| tree.get(c).payload.value.as_str())
                .unwrap_or_default();
            let _ = writeln!(out, "assignment: {} = {value}", n.name);
        }
        SyntaxKind::CallExpr => {
            let _ = writeln!(out, "function call: {}", n.name);
            for &arg in children {
                let _ = writeln!(out, "param: {}", tree.get(arg).payload.value);
            }
        }
        _ => {}
    }
}

fn first_of<'t>(tree: &'t SyntaxTree, children: &[NodeRef], kind: SyntaxKind) -> Option<&'t str> {
    children
        .iter()
        .map(|&c| tree.get(c))
        .find(|c| c.kind == kind)
        .map(|c| c.name.as_str())
}

/// Indented dump: kind, name, id and position of every node.
#[must_use]
pub fn format_tree(tree: &SyntaxTree, root: NodeRef) -> String {
    let mut out = String::new();
    for (node, depth) in tree.descendants(root) {
        let n = tree.get(node);
        for _ in 0..depth {
            out.push_str("  ");
        }
        let _ = write!(out, "{:?}", n.kind);
        if !n.name.is_empty() && n.kind != SyntaxKind::Root {
            let _ = write!(out, " '{}'", n.name);
        }
        let _ = writeln!(
            out,
            " {} <{}:{}>",
            n.id, n.payload.span.line, n.payload.span.column
        );
    }
    out
}
