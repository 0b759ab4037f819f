//! Character-stream tokenizer.
//!
//! [`Lexer::next_token`] hands out one token per call. Lexical errors are
//! recorded into a [`Diagnostics`] sink and the best-effort token is still
//! returned, so the parser always has something to work with. Once the
//! input is exhausted every further call yields `EndOfFile`.

use std::iter::FusedIterator;

use crate::diagnostics::Diagnostics;
use crate::token::{Span, Token, TokenKind};

/// Longest identifier accepted: one leading character plus 2048 more.
pub const MAX_IDENTIFIER_LEN: usize = 2049;

const KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "return", "break", "continue", "true", "false", "null", "fun",
    "enum", "class", "import", "var", "module", "extern", "static",
];

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    /// Block comment without a closing `*/`.
    #[error("unterminated comment")]
    UnterminatedComment,
    /// String literal without a closing quote on the same line.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// Character constant not closed by `'`.
    #[error("unterminated character constant")]
    UnterminatedCharacter,
    /// Newline where the character of a constant was expected.
    #[error("unexpected end of line in character constant")]
    UnexpectedEndOfLineInCharacter,
    /// Word that is neither a keyword nor a valid identifier.
    #[error("invalid identifier name")]
    InvalidIdentifier,
    /// Number starting with a digit separator (`'000`).
    #[error("leading separators are not allowed")]
    LeadingSeparator,
    /// Number ending with a digit separator (`1'`).
    #[error("trailing separators are not allowed")]
    TrailingSeparator,
    /// Decimal point after a decimal point or a suffix (`1.2.3`, `1f.0`).
    #[error("invalid suffix '{0}' in floating constant")]
    InvalidFloatSuffix(char),
}

/// Whitespace skipped between tokens.
#[must_use]
pub const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

#[must_use]
pub const fn is_operator(c: char) -> bool {
    matches!(
        c,
        '=' | '+' | '-' | '*' | '/' | '%' | '^' | '!' | '<' | '>' | '&' | '|' | '~' | '?'
    )
}

#[must_use]
pub const fn is_punctuation(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '}' | '[' | ']' | ',' | ':' | ';' | '.')
}

#[must_use]
pub const fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Suffix characters that change the type of a numeric constant.
#[must_use]
pub const fn is_numeric_suffix(c: char) -> bool {
    matches!(c, 'f' | 'F' | 'l' | 'L')
}

#[must_use]
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// `[_a-zA-Z][_a-zA-Z0-9]{0,2048}`
#[must_use]
pub fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && word.len() <= MAX_IDENTIFIER_LEN
}

/// Tokenize a whole source string, `EndOfFile` included.
pub fn tokenize(file: &str, input: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    let mut lexer = Lexer::new(file, input);
    lexer.tokens(diagnostics).collect()
}

/// Where a token started, captured before its first character is consumed.
struct Mark {
    line: usize,
    column: usize,
    source_line: String,
}

/// Stateful scanner over one source text.
pub struct Lexer<'a> {
    file: String,
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    line_text: String,
}

impl<'a> Lexer<'a> {
    pub fn new(file: impl Into<String>, input: &'a str) -> Self {
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
        Self {
            file: file.into(),
            input,
            pos: 0,
            line: 1,
            col: 1,
            line_text: line_at(input, 0),
        }
    }

    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Lazy token stream that ends after the first `EndOfFile`.
    pub const fn tokens<'l, 'd>(&'l mut self, diagnostics: &'d mut Diagnostics) -> Tokens<'l, 'a, 'd> {
        Tokens {
            lexer: self,
            diagnostics,
            done: false,
        }
    }

    /// Scan and return the next token.
    pub fn next_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        self.skip_whitespace();
        let mark = self.mark();

        let Some(ch) = self.peek() else {
            return self.make_token(TokenKind::EndOfFile, String::new(), mark);
        };

        let token = match ch {
            '/' if self.peek_at(1) == Some('/') => self.read_line_comment(mark),
            '/' if self.peek_at(1) == Some('*') => self.read_block_comment(mark, diagnostics),
            c if is_operator(c) => {
                self.advance();
                self.make_token(TokenKind::Operator, c.to_string(), mark)
            }
            c if is_punctuation(c) => {
                self.advance();
                self.make_token(TokenKind::Punctuation, c.to_string(), mark)
            }
            c if is_digit(c) => self.read_number(mark, diagnostics),
            '\'' if self.starts_separated_number() => self.read_number(mark, diagnostics),
            '\'' => self.read_character(mark, diagnostics),
            '"' => self.read_string(mark, diagnostics),
            c if c.is_ascii_control() => {
                self.advance();
                self.make_token(TokenKind::Invalid, c.to_string(), mark)
            }
            _ => self.read_word(mark, diagnostics),
        };

        tracing::trace!(
            kind = %token.kind,
            text = %token.text,
            line = token.span.line,
            column = token.span.column,
            "token"
        );
        token
    }

    fn mark(&self) -> Mark {
        Mark {
            line: self.line,
            column: self.col,
            source_line: self.line_text.clone(),
        }
    }

    fn span_of(&self, mark: &Mark) -> Span {
        Span {
            file: self.file.clone(),
            line: mark.line,
            column: mark.column,
        }
    }

    fn make_token(&self, kind: TokenKind, text: String, mark: Mark) -> Token {
        Token {
            kind,
            text,
            span: self.span_of(&mark),
            source_line: mark.source_line,
        }
    }

    fn error(&self, diagnostics: &mut Diagnostics, kind: LexErrorKind, mark: &Mark) {
        diagnostics.push_error(kind, self.span_of(mark), mark.source_line.clone());
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
            self.line_text = line_at(self.input, self.pos);
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
    }

    fn read_line_comment(&mut self, mark: Mark) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        let text = self.input[start..self.pos].trim_end_matches('\r').to_string();
        self.make_token(TokenKind::Comment, text, mark)
    }

    fn read_block_comment(&mut self, mark: Mark, diagnostics: &mut Diagnostics) -> Token {
        let start = self.pos;
        self.advance(); // skip /
        self.advance(); // skip *

        let mut closed = false;
        while let Some(c) = self.advance() {
            if c == '*' && self.peek() == Some('/') {
                self.advance();
                closed = true;
                break;
            }
        }

        if !closed {
            self.error(diagnostics, LexErrorKind::UnterminatedComment, &mark);
        }
        let text = self.input[start..self.pos].to_string();
        self.make_token(TokenKind::Comment, text, mark)
    }

    /// `'` followed by a digit that is not itself closed by `'`.
    fn starts_separated_number(&self) -> bool {
        self.peek_at(1).is_some_and(is_digit) && self.peek_at(2) != Some('\'')
    }

    fn read_number(&mut self, mark: Mark, diagnostics: &mut Diagnostics) -> Token {
        if self.peek() == Some('\'') {
            self.error(diagnostics, LexErrorKind::LeadingSeparator, &mark);
            self.advance();
        }

        let mut text = String::new();
        let mut floating = false;
        let mut float_suffix = false;
        let mut long_suffix = false;
        let mut dangling_separator = false;

        while let Some(c) = self.peek() {
            if c == '\'' {
                // digit group separator, as in 1'000'000
                self.advance();
                dangling_separator = true;
                continue;
            }
            if c == ';' || is_whitespace(c) {
                break;
            }
            match c {
                '.' => {
                    if floating || long_suffix {
                        self.error(diagnostics, LexErrorKind::InvalidFloatSuffix(c), &mark);
                    }
                    floating = true;
                }
                'f' | 'F' => {
                    float_suffix = true;
                    floating = true;
                }
                'l' | 'L' => long_suffix = true,
                c if is_digit(c) => {}
                _ => break,
            }
            self.advance();
            text.push(c);
            dangling_separator = false;
        }

        if dangling_separator {
            self.error(diagnostics, LexErrorKind::TrailingSeparator, &mark);
        }

        let kind = match (floating, float_suffix, long_suffix) {
            (true, true, _) => TokenKind::NumberFloat,
            (true, false, _) => TokenKind::NumberDouble,
            (false, _, true) => TokenKind::NumberInt64,
            (false, _, false) => TokenKind::NumberInt32,
        };
        self.make_token(kind, text, mark)
    }

    fn read_string(&mut self, mark: Mark, diagnostics: &mut Diagnostics) -> Token {
        self.advance(); // skip opening quote

        let mut value = String::new();
        let mut closed = false;
        while let Some(c) = self.peek() {
            match c {
                '\n' => break,
                '"' => {
                    self.advance();
                    closed = true;
                    break;
                }
                '\\' => {
                    self.advance();
                    match self.peek() {
                        Some('\n') | None => value.push('\\'),
                        Some(escaped) => {
                            self.advance();
                            push_escape(&mut value, escaped);
                        }
                    }
                }
                _ => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        if !closed {
            self.error(diagnostics, LexErrorKind::UnterminatedString, &mark);
        }
        self.make_token(TokenKind::StringLiteral, value, mark)
    }

    fn read_character(&mut self, mark: Mark, diagnostics: &mut Diagnostics) -> Token {
        self.advance(); // skip opening quote

        let value = match self.peek() {
            None | Some('\n') => {
                self.error(
                    diagnostics,
                    LexErrorKind::UnexpectedEndOfLineInCharacter,
                    &mark,
                );
                return self.make_token(TokenKind::CharacterLiteral, String::new(), mark);
            }
            Some('\\') if self.peek_at(1).is_some_and(|c| c != '\n') => {
                self.advance();
                let mut value = String::new();
                if let Some(escaped) = self.advance() {
                    push_escape(&mut value, escaped);
                }
                value
            }
            Some(c) => {
                self.advance();
                c.to_string()
            }
        };

        if self.peek() == Some('\'') {
            self.advance();
        } else {
            self.error(diagnostics, LexErrorKind::UnterminatedCharacter, &mark);
        }
        self.make_token(TokenKind::CharacterLiteral, value, mark)
    }

    fn read_word(&mut self, mark: Mark, diagnostics: &mut Diagnostics) -> Token {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !is_whitespace(c) && !is_punctuation(c) && !is_operator(c))
        {
            self.advance();
        }
        let text = self.input[start..self.pos].to_string();

        if is_keyword(&text) {
            return self.make_token(TokenKind::Keyword, text, mark);
        }
        if !is_identifier(&text) {
            self.error(diagnostics, LexErrorKind::InvalidIdentifier, &mark);
        }
        self.make_token(TokenKind::Identifier, text, mark)
    }
}

/// Token stream borrowed from a [`Lexer`], see [`Lexer::tokens`].
pub struct Tokens<'l, 'a, 'd> {
    lexer: &'l mut Lexer<'a>,
    diagnostics: &'d mut Diagnostics,
    done: bool,
}

impl Iterator for Tokens<'_, '_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.lexer.next_token(self.diagnostics);
        self.done = token.is_eof();
        Some(token)
    }
}

impl FusedIterator for Tokens<'_, '_, '_> {}

/// Text of the line starting at byte `start`, without its line break.
fn line_at(input: &str, start: usize) -> String {
    let rest = &input[start..];
    rest.find('\n').map_or_else(
        || rest.to_string(),
        |end| rest[..end].strip_suffix('\r').unwrap_or(&rest[..end]).to_string(),
    )
}

fn push_escape(value: &mut String, escaped: char) {
    match escaped {
        'n' => value.push('\n'),
        't' => value.push('\t'),
        'r' => value.push('\r'),
        '0' => value.push('\0'),
        '\\' | '"' | '\'' => value.push(escaped),
        other => {
            value.push('\\');
            value.push(other);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> (Vec<Token>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("test.sls", input, &mut diagnostics);
        (tokens, diagnostics)
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn predicates() {
        assert!(is_whitespace('\x0B'));
        assert!(!is_whitespace('a'));
        assert!(is_operator('?'));
        assert!(!is_operator('.'));
        assert!(is_punctuation('.'));
        assert!(is_numeric_suffix('L'));
        assert!(!is_numeric_suffix('d'));
        assert!(is_keyword("extern"));
        assert!(!is_keyword("function"));
        assert!(is_identifier("_a1"));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn identifier_length_limit() {
        assert!(is_identifier(&"a".repeat(MAX_IDENTIFIER_LEN)));
        assert!(!is_identifier(&"a".repeat(MAX_IDENTIFIER_LEN + 1)));
    }

    #[test]
    fn simple_declaration() {
        let (tokens, diagnostics) = lex("var x: int = 5;");
        assert!(!diagnostics.has_errors());
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Punctuation,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::NumberInt32,
                TokenKind::Punctuation,
                TokenKind::EndOfFile,
            ]
        );
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[5].span.column, 14);
    }

    #[test]
    fn number_kinds() {
        let (tokens, _) = lex("1 2L 3.5 4.5f 5f");
        assert_eq!(
            kinds(&tokens[..5]),
            vec![
                TokenKind::NumberInt32,
                TokenKind::NumberInt64,
                TokenKind::NumberDouble,
                TokenKind::NumberFloat,
                TokenKind::NumberFloat,
            ]
        );
    }

    #[test]
    fn digit_separators_are_stripped() {
        let (tokens, diagnostics) = lex("1'000'000");
        assert!(!diagnostics.has_errors());
        assert_eq!(tokens[0].text, "1000000");
        assert_eq!(tokens[0].kind, TokenKind::NumberInt32);
    }

    #[test]
    fn second_decimal_point() {
        let (tokens, diagnostics) = lex("1.2.3");
        assert_eq!(tokens[0].text, "1.2.3");
        assert_eq!(tokens[0].kind, TokenKind::NumberDouble);
        let d = diagnostics.iter().next().unwrap();
        assert_eq!(d.message(), "invalid suffix '.' in floating constant");
        assert_eq!(d.span.column, 1);
    }

    #[test]
    fn number_stops_at_letter() {
        let (tokens, _) = lex("12abc");
        assert_eq!(tokens[0].text, "12");
        assert_eq!(tokens[1].text, "abc");
        assert_eq!(tokens[1].span.column, 3);
    }

    #[test]
    fn char_literal_position() {
        let (tokens, diagnostics) = lex("  'a' b");
        assert!(!diagnostics.has_errors());
        assert_eq!(tokens[0].kind, TokenKind::CharacterLiteral);
        assert_eq!(tokens[0].text, "a");
        assert_eq!(tokens[0].span.column, 3);
        assert_eq!(tokens[1].span.column, 7);
    }

    #[test]
    fn eof_is_sticky() {
        let mut diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new("test.sls", "x");
        assert_eq!(lexer.next_token(&mut diagnostics).kind, TokenKind::Identifier);
        for _ in 0..3 {
            assert!(lexer.next_token(&mut diagnostics).is_eof());
        }
    }

    #[test]
    fn newline_refreshes_source_line() {
        let (tokens, _) = lex("first\n  second\r\nthird");
        assert_eq!(tokens[0].source_line, "first");
        assert_eq!(tokens[1].source_line, "  second");
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 3);
        assert_eq!(tokens[2].source_line, "third");
        assert_eq!(tokens[2].span.line, 3);
    }

    #[test]
    fn bom_stripping() {
        let (tokens, _) = lex("\u{FEFF}fun");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].span.column, 1);
    }

    #[test]
    fn control_character_is_invalid() {
        let (tokens, diagnostics) = lex("a \u{1} b");
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert!(!diagnostics.has_errors());
    }
}
