use std::fmt;

/// Source location for error reporting.
///
/// `line` and `column` are 1-based and address the first character of
/// whatever the span is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Name that is not a keyword.
    Identifier,
    /// Reserved word such as `fun` or `var`.
    Keyword,
    /// Single operator character (`=`, `+`, `<`, ...).
    Operator,
    /// Single punctuation character (`(`, `;`, `.`, ...).
    Punctuation,
    /// End of input. Produced again on every call once reached.
    EndOfFile,
    /// Character constant (`'a'`).
    CharacterLiteral,
    /// Double-quoted string (`"..."`).
    StringLiteral,
    /// Floating constant without a float suffix (`1.5`).
    NumberDouble,
    /// Floating constant with an `f`/`F` suffix (`1.5f`).
    NumberFloat,
    /// Integer constant (`42`).
    NumberInt32,
    /// Integer constant with an `l`/`L` suffix (`42L`).
    NumberInt64,
    /// Boolean constant.
    Boolean,
    /// Line (`// ...`) or block (`/* ... */`) comment.
    Comment,
    /// Character that cannot start any token.
    Invalid,
}

impl TokenKind {
    /// Whether this kind is a literal constant usable as a value.
    #[must_use]
    pub const fn is_constant(self) -> bool {
        matches!(
            self,
            Self::CharacterLiteral
                | Self::StringLiteral
                | Self::NumberDouble
                | Self::NumberFloat
                | Self::NumberInt32
                | Self::NumberInt64
                | Self::Boolean
        )
    }

    /// Human-readable name used in dumps and notices.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identifier => "Identifier",
            Self::Keyword => "Keyword",
            Self::Operator => "Operator",
            Self::Punctuation => "Punctuation",
            Self::EndOfFile => "EndOfFile",
            Self::CharacterLiteral => "CharacterLiteral",
            Self::StringLiteral => "StringLiteral",
            Self::NumberDouble => "Double",
            Self::NumberFloat => "Float",
            Self::NumberInt32 => "Int32",
            Self::NumberInt64 => "Int64",
            Self::Boolean => "Boolean",
            Self::Comment => "Comment",
            Self::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token with its kind, text, and source location.
///
/// `source_line` is the full text of the line the token starts on,
/// kept so diagnostics can echo it without going back to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub source_line: String,
    pub span: Span,
}

impl Token {
    /// True if this is punctuation with exactly the given text.
    #[must_use]
    pub fn is_punct(&self, value: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == value
    }

    /// True if this is an operator with exactly the given text.
    #[must_use]
    pub fn is_operator(&self, value: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == value
    }

    /// True if this is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, value: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == value
    }

    /// True if this token can stand as a value: a name or a constant.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier) || self.kind.is_constant()
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfFile)
    }
}
