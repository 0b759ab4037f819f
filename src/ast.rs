use crate::token::{Span, Token, TokenKind};
use crate::tree::Tree;

/// Kinds of syntax tree nodes the recognizer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// Synthetic root, one per parse.
    Root,
    /// `fun name(params) { ... }`
    FunctionDecl,
    /// `type name` inside a parameter list.
    ParamVarDecl,
    /// Function body.
    CompoundStatement,
    /// Statement wrapping a declaration.
    DeclStatement,
    /// `var name: type`
    VarDecl,
    /// Type annotation of a declaration or parameter.
    TypeRef,
    /// `name = value`
    Assignment,
    /// `a.b(args)`
    CallExpr,
    /// Name used as a value.
    DeclRefExpr,
    StringLiteral,
    FloatLiteral,
    DoubleLiteral,
    Int32Literal,
    Int64Literal,
    CharacterLiteral,
    BooleanLiteral,
}

impl SyntaxKind {
    /// Node kind for a value token, `None` if the token is not a value.
    #[must_use]
    pub const fn for_value(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Identifier => Self::DeclRefExpr,
            TokenKind::StringLiteral => Self::StringLiteral,
            TokenKind::NumberFloat => Self::FloatLiteral,
            TokenKind::NumberDouble => Self::DoubleLiteral,
            TokenKind::NumberInt32 => Self::Int32Literal,
            TokenKind::NumberInt64 => Self::Int64Literal,
            TokenKind::CharacterLiteral => Self::CharacterLiteral,
            TokenKind::Boolean => Self::BooleanLiteral,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::StringLiteral
                | Self::FloatLiteral
                | Self::DoubleLiteral
                | Self::Int32Literal
                | Self::Int64Literal
                | Self::CharacterLiteral
                | Self::BooleanLiteral
        )
    }
}

/// Payload carried by every syntax node: the text and location of the
/// token that introduced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub value: String,
    pub token_kind: TokenKind,
    pub source_line: String,
    pub span: Span,
}

impl NodeData {
    /// Payload for the synthetic root.
    #[must_use]
    pub fn root(file: &str) -> Self {
        Self {
            value: String::new(),
            token_kind: TokenKind::EndOfFile,
            source_line: String::new(),
            span: Span {
                file: file.to_string(),
                line: 1,
                column: 1,
            },
        }
    }
}

impl From<&Token> for NodeData {
    fn from(token: &Token) -> Self {
        Self {
            value: token.text.clone(),
            token_kind: token.kind,
            source_line: token.source_line.clone(),
            span: token.span.clone(),
        }
    }
}

/// The tree the recognizer builds.
pub type SyntaxTree = Tree<SyntaxKind, NodeData>;
