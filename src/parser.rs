//! Statement and function recognizer.
//!
//! This is not a grammar interpreter. Function headers are parsed token by
//! token; statement bodies are buffered up to their `;` and matched against
//! a small table of fixed token shapes. A run that matches no shape is
//! accepted silently.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::Path;

use crate::ast::{NodeData, SyntaxKind, SyntaxTree};
use crate::diagnostics::Diagnostics;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::tree::NodeRef;

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected function name")]
    ExpectedFunctionName,
    #[error("expected left parenthesis")]
    ExpectedLeftParen,
    /// Parameter list still open at end of input.
    #[error("expected right parenthesis")]
    ExpectedRightParen,
    #[error("expected left brace")]
    ExpectedLeftBrace,
    #[error("expected parameter type")]
    ExpectedParameterType,
    #[error("expected parameter name")]
    ExpectedParameterName,
    #[error("expected comma")]
    ExpectedComma,
    /// Single-token statement.
    #[error("expected statement")]
    ExpectedStatement,
    #[error("unexpected end of file")]
    UnexpectedEndOfFile,
    /// Something other than `.` between the names of a dotted call.
    #[error("unexpected punctuation")]
    UnexpectedPunctuation,
    /// Call candidate with no `(` after its name.
    #[error("expected open parenthesis")]
    ExpectedOpenParenthesis,
    /// Call candidate with more `(` than `)`.
    #[error("expected close parenthesis")]
    ExpectedCloseParenthesis,
    #[error("unexpected invalid token")]
    UnexpectedInvalidToken,
}

/// A recognized statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `var name: ty` or `var name: ty = init`
    VarDecl {
        name: Token,
        ty: Token,
        init: Option<Token>,
    },
    /// `target = value`
    Assignment { target: Token, value: Token },
    /// `a.b.c(arg, ...)`
    Call {
        head: Token,
        callee: String,
        args: Vec<Token>,
    },
}

/// What a single token of a shape has to be.
#[derive(Debug, Clone, Copy)]
enum Expect {
    Keyword(&'static str),
    Operator(&'static str),
    Punct(&'static str),
    Identifier,
    /// Identifier or constant.
    Value,
}

impl Expect {
    fn matches(self, token: &Token) -> bool {
        match self {
            Self::Keyword(k) => token.is_keyword(k),
            Self::Operator(op) => token.is_operator(op),
            Self::Punct(p) => token.is_punct(p),
            Self::Identifier => token.kind == TokenKind::Identifier,
            Self::Value => token.is_value(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Form {
    TypedDeclWithInit,
    TypedDecl,
    Assignment,
}

/// A fixed-length statement pattern.
struct Shape {
    form: Form,
    pattern: &'static [Expect],
}

impl Shape {
    fn matches(&self, run: &[Token]) -> bool {
        run.len() == self.pattern.len() && self.pattern.iter().zip(run).all(|(e, t)| e.matches(t))
    }

    fn build(&self, run: &[Token]) -> Statement {
        match self.form {
            Form::TypedDeclWithInit => Statement::VarDecl {
                name: run[1].clone(),
                ty: run[3].clone(),
                init: Some(run[5].clone()),
            },
            Form::TypedDecl => Statement::VarDecl {
                name: run[1].clone(),
                ty: run[3].clone(),
                init: None,
            },
            Form::Assignment => Statement::Assignment {
                target: run[0].clone(),
                value: run[2].clone(),
            },
        }
    }
}

const SHAPES: &[Shape] = &[
    Shape {
        form: Form::TypedDeclWithInit,
        pattern: &[
            Expect::Keyword("var"),
            Expect::Identifier,
            Expect::Punct(":"),
            Expect::Identifier,
            Expect::Operator("="),
            Expect::Value,
        ],
    },
    Shape {
        form: Form::TypedDecl,
        pattern: &[
            Expect::Keyword("var"),
            Expect::Identifier,
            Expect::Punct(":"),
            Expect::Identifier,
        ],
    },
    Shape {
        form: Form::Assignment,
        pattern: &[Expect::Identifier, Expect::Operator("="), Expect::Value],
    },
];

/// Classify the tokens of one statement (without its `;`).
///
/// Errors inside a call candidate are recorded into `diagnostics`; a call
/// with bad arguments is still returned. Runs matching nothing give `None`
/// without a diagnostic.
pub fn classify_statement(run: &[Token], diagnostics: &mut Diagnostics) -> Option<Statement> {
    match run {
        [] => return None,
        [only] => {
            report(diagnostics, ParseErrorKind::ExpectedStatement, only);
            return None;
        }
        _ => {}
    }

    if let Some(shape) = SHAPES.iter().find(|s| s.matches(run)) {
        return Some(shape.build(run));
    }

    if run.last().is_some_and(|t| t.is_punct(")")) {
        return classify_call(run, diagnostics);
    }
    None
}

fn classify_call(run: &[Token], diagnostics: &mut Diagnostics) -> Option<Statement> {
    let last = run.last()?;
    let open = run.iter().position(|t| t.is_punct("("));
    // without a `(` the trailing `)` is not part of the name
    let name_end = open.unwrap_or(run.len() - 1);

    let mut callee = String::new();
    let mut expect_dot = false;
    for token in &run[..name_end] {
        if expect_dot {
            expect_dot = false;
            if token.is_punct(".") {
                callee.push('.');
                continue;
            }
            report(diagnostics, ParseErrorKind::UnexpectedPunctuation, token);
        } else if token.is_punct(".") {
            report(diagnostics, ParseErrorKind::UnexpectedPunctuation, token);
            continue;
        }
        if token.kind == TokenKind::Identifier {
            callee.push_str(&token.text);
            expect_dot = true;
        }
    }

    let Some(open) = open.filter(|&i| i > 0) else {
        report(diagnostics, ParseErrorKind::ExpectedOpenParenthesis, last);
        return None;
    };

    let opened = run.iter().filter(|t| t.is_punct("(")).count();
    let closed = run.iter().filter(|t| t.is_punct(")")).count();
    if opened > closed {
        report(diagnostics, ParseErrorKind::ExpectedCloseParenthesis, last);
        return None;
    }

    let mut args = Vec::new();
    for (slot, token) in run[open + 1..run.len() - 1].iter().enumerate() {
        if slot % 2 == 1 {
            if !token.is_punct(",") {
                report(diagnostics, ParseErrorKind::ExpectedComma, token);
                break;
            }
        } else if token.is_value() {
            args.push(token.clone());
        }
    }

    Some(Statement::Call {
        head: run[0].clone(),
        callee,
        args,
    })
}

fn report(diagnostics: &mut Diagnostics, kind: ParseErrorKind, token: &Token) {
    diagnostics.push_error(kind, token.span.clone(), token.source_line.clone());
}

/// Declared names per module. Filled during recognition, not yet queried.
pub type SymbolTable = HashMap<String, Vec<String>>;

/// Output of one recognition pass.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub tree: SyntaxTree,
    pub root: NodeRef,
    pub symbols: SymbolTable,
}

/// Recognize a whole source string.
pub fn parse(file: &str, input: &str, diagnostics: &mut Diagnostics) -> Parsed {
    Parser::new(Lexer::new(file, input), diagnostics).parse()
}

/// Drives a [`Lexer`] and builds the syntax tree.
pub struct Parser<'a, 'd> {
    lexer: Lexer<'a>,
    diagnostics: &'d mut Diagnostics,
    tree: SyntaxTree,
    root: NodeRef,
    current_node: NodeRef,
    module: String,
    symbols: SymbolTable,
}

impl<'a, 'd> Parser<'a, 'd> {
    pub fn new(lexer: Lexer<'a>, diagnostics: &'d mut Diagnostics) -> Self {
        Self::with_tree(lexer, diagnostics, SyntaxTree::new())
    }

    /// Build into `tree`. Seed it with [`SyntaxTree::with_first_id`] to
    /// continue the node id sequence of an earlier tree.
    pub fn with_tree(lexer: Lexer<'a>, diagnostics: &'d mut Diagnostics, mut tree: SyntaxTree) -> Self {
        let module = Path::new(lexer.file())
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let root = tree.create(SyntaxKind::Root, NodeData::root(lexer.file()), "root");
        Self {
            lexer,
            diagnostics,
            tree,
            root,
            current_node: root,
            module,
            symbols: SymbolTable::new(),
        }
    }

    #[must_use]
    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Run the top-level loop until end of input.
    #[must_use]
    pub fn parse(mut self) -> Parsed {
        loop {
            let token = self.next_significant();
            match token.kind {
                TokenKind::EndOfFile => break,
                TokenKind::Invalid => self.error(ParseErrorKind::UnexpectedInvalidToken, &token),
                TokenKind::Keyword if token.text == "fun" => self.parse_function(),
                // TODO: report stray top-level tokens once modules and imports are recognized
                _ => {}
            }
        }

        Parsed {
            tree: self.tree,
            root: self.root,
            symbols: self.symbols,
        }
    }

    fn next_significant(&mut self) -> Token {
        loop {
            let token = self.lexer.next_token(self.diagnostics);
            if token.kind != TokenKind::Comment {
                return token;
            }
        }
    }

    fn error(&mut self, kind: ParseErrorKind, token: &Token) {
        report(self.diagnostics, kind, token);
    }

    fn declare(&mut self, name: &str) {
        self.symbols
            .entry(self.module.clone())
            .or_default()
            .push(name.to_string());
    }

    fn parse_function(&mut self) {
        let name = self.next_significant();
        if name.kind != TokenKind::Identifier {
            self.error(ParseErrorKind::ExpectedFunctionName, &name);
            return;
        }
        tracing::info!(name = %name.text, "function");
        let function = self.tree.append(
            self.root,
            SyntaxKind::FunctionDecl,
            NodeData::from(&name),
            name.text.clone(),
        );
        self.declare(&name.text);

        // a bad parameter list ends the list only; the body may still follow
        let parameters_ok = self.parse_parameters(function);

        let brace = self.next_significant();
        if !brace.is_punct("{") {
            // end of input inside the list is already reported
            if parameters_ok || !brace.is_eof() {
                self.error(ParseErrorKind::ExpectedLeftBrace, &brace);
            }
            return;
        }
        let body = self.tree.append(
            function,
            SyntaxKind::CompoundStatement,
            NodeData::from(&brace),
            "body",
        );

        let enclosing = self.current_node;
        self.current_node = body;
        loop {
            let token = self.next_significant();
            if token.is_punct("}") {
                break;
            }
            if token.is_eof() {
                self.error(ParseErrorKind::UnexpectedEndOfFile, &token);
                break;
            }
            if self.parse_statement(token).is_break() {
                break;
            }
        }
        self.current_node = enclosing;
    }

    /// Returns `false` if the list was malformed.
    fn parse_parameters(&mut self, function: NodeRef) -> bool {
        let open = self.next_significant();
        if !open.is_punct("(") {
            self.error(ParseErrorKind::ExpectedLeftParen, &open);
            return false;
        }

        let mut expect_comma = false;
        loop {
            let mut ty = self.next_significant();
            if ty.is_punct(")") {
                return true;
            }
            if ty.is_eof() {
                self.error(ParseErrorKind::ExpectedRightParen, &ty);
                return false;
            }
            if expect_comma {
                if !ty.is_punct(",") {
                    self.error(ParseErrorKind::ExpectedComma, &ty);
                    return false;
                }
                ty = self.next_significant();
            }
            if ty.kind != TokenKind::Identifier {
                self.error(ParseErrorKind::ExpectedParameterType, &ty);
                return false;
            }
            let name = self.next_significant();
            if name.kind != TokenKind::Identifier {
                self.error(ParseErrorKind::ExpectedParameterName, &name);
                return false;
            }
            expect_comma = true;

            tracing::info!(ty = %ty.text, name = %name.text, "parameter");
            let param = self.tree.append(
                function,
                SyntaxKind::ParamVarDecl,
                NodeData::from(&name),
                name.text.clone(),
            );
            self.tree
                .append(param, SyntaxKind::TypeRef, NodeData::from(&ty), ty.text);
            self.declare(&name.text);
        }
    }

    /// Buffer one statement starting at `first` and record what it is.
    /// Breaks if the input ended before the `;`.
    fn parse_statement(&mut self, first: Token) -> ControlFlow<()> {
        let mut run = Vec::new();
        let mut token = first;
        loop {
            if token.is_eof() {
                self.error(ParseErrorKind::UnexpectedEndOfFile, &token);
                return ControlFlow::Break(());
            }
            if token.is_punct(";") {
                break;
            }
            run.push(token);
            token = self.next_significant();
        }

        if let Some(statement) = classify_statement(&run, self.diagnostics) {
            self.record(statement);
        }
        ControlFlow::Continue(())
    }

    fn record(&mut self, statement: Statement) {
        let parent = self.current_node;
        match statement {
            Statement::VarDecl { name, ty, init } => {
                tracing::info!(name = %name.text, ty = %ty.text, "var declaration");
                let decl = self.tree.append(
                    parent,
                    SyntaxKind::DeclStatement,
                    NodeData::from(&name),
                    "decl",
                );
                let var = self.tree.append(
                    decl,
                    SyntaxKind::VarDecl,
                    NodeData::from(&name),
                    name.text.clone(),
                );
                self.tree
                    .append(var, SyntaxKind::TypeRef, NodeData::from(&ty), ty.text);
                if let Some(init) = init {
                    tracing::info!(name = %name.text, value = %init.text, kind = %init.kind, "assignment");
                    self.append_value(var, &init);
                }
                self.declare(&name.text);
            }
            Statement::Assignment { target, value } => {
                tracing::info!(name = %target.text, value = %value.text, "assignment");
                let assignment = self.tree.append(
                    parent,
                    SyntaxKind::Assignment,
                    NodeData::from(&target),
                    target.text,
                );
                self.append_value(assignment, &value);
            }
            Statement::Call { head, callee, args } => {
                tracing::info!(callee = %callee, args = args.len(), "function call");
                let call =
                    self.tree
                        .append(parent, SyntaxKind::CallExpr, NodeData::from(&head), callee);
                for arg in &args {
                    self.append_value(call, arg);
                }
            }
        }
    }

    fn append_value(&mut self, parent: NodeRef, token: &Token) {
        if let Some(kind) = SyntaxKind::for_value(token.kind) {
            self.tree
                .append(parent, kind, NodeData::from(token), token.text.clone());
        }
    }
}
