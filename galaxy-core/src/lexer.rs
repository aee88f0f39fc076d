//! Lexer for Galaxy source files.
//!
//! A single forward pass over the source with one character of lookahead
//! (`peek_char`) and one extra character of peek (`peek_next`). All
//! position tracking lives on the [`Lexer`] value, so independent files
//! can be lexed side by side.

use std::fmt;
use std::io::Read;

use tracing::debug;

use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::{CoreError, offset_or_abort, reserve_or_abort};
use crate::span::Span;

/// Longest identifier kept in a single token, in characters.
pub const MAX_IDENTIFIER_LEN: usize = 255;
/// Longest string literal kept in a single token, in characters.
pub const MAX_STRING_LEN: usize = 1023;

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Special
    Eof,
    Unknown,

    // Identifiers and literals
    Identifier,
    Number,
    String,

    // Keywords
    For,
    If,
    Elif,
    Else,
    Switch,
    Case,
    Default,
    Package,
    Import,
    Def,
    Return,
    End,
    True,
    False,

    // Single-character operators and delimiters
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %
    Less,    // <
    Greater, // >
    Caret,   // ^
    Dot,     // .
    Comma,   // ,
    Colon,   // :
    Semi,    // ;
    LParen,  // (
    RParen,  // )

    // Two-character operators
    Power,        // **
    Arrow,        // ->
    Range,        // ..
    LessEqual,    // <=
    GreaterEqual, // >=
    EqualEqual,   // ==
    Assign,       // :=
}

impl TokenKind {
    /// Fixed spelling of keywords and operators; `None` for token classes.
    pub fn as_str(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Eof
            | TokenKind::Unknown
            | TokenKind::Identifier
            | TokenKind::Number
            | TokenKind::String => return None,
            TokenKind::For => "for",
            TokenKind::If => "if",
            TokenKind::Elif => "elif",
            TokenKind::Else => "else",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::Package => "package",
            TokenKind::Import => "import",
            TokenKind::Def => "def",
            TokenKind::Return => "return",
            TokenKind::End => "end",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::Caret => "^",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semi => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Power => "**",
            TokenKind::Arrow => "->",
            TokenKind::Range => "..",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterEqual => ">=",
            TokenKind::EqualEqual => "==",
            TokenKind::Assign => ":=",
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => write!(f, "`{text}`"),
            None => f.write_str(match self {
                TokenKind::Eof => "EOF",
                TokenKind::Unknown => "unknown token",
                TokenKind::Identifier => "identifier",
                TokenKind::Number => "number",
                _ => "string",
            }),
        }
    }
}

/// A single token.
///
/// The lexeme is owned, so tokens stay valid after the source buffer is
/// gone; only the file name is borrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
    pub source_name: &'a str,
    /// Set when the lexer reported a problem while producing this token.
    pub message: Option<String>,
}

/// What to do when an identifier or string outgrows its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Stop at the cap and lex the remaining characters as a new token.
    #[default]
    Split,
    /// Keep consuming past the cap, returning one token capped to the
    /// buffered characters.
    Truncate,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexOptions {
    pub overflow: OverflowPolicy,
}

/// Result of lexing a source file.
#[derive(Debug)]
pub struct LexOutput<'a> {
    pub tokens: Vec<Token<'a>>,
    pub diagnostics: Diagnostics,
}

/// Lex a source string into tokens with default options.
pub fn tokenize<'a>(source: &'a str, source_name: &'a str) -> LexOutput<'a> {
    tokenize_with(source, source_name, &LexOptions::default())
}

pub fn tokenize_with<'a>(
    source: &'a str,
    source_name: &'a str,
    options: &LexOptions,
) -> LexOutput<'a> {
    Lexer::new(source, source_name, *options).run()
}

/// Read a whole source stream so it can be handed to [`tokenize`].
pub fn read_source<R: Read>(mut reader: R) -> Result<String, CoreError> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    Ok(source)
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    line: u32,
    column: u32,
    index: usize,
}

pub struct Lexer<'a> {
    source: &'a str,
    source_name: &'a str,
    options: LexOptions,
    index: usize,
    line: u32,
    column: u32,
    diagnostics: Diagnostics,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, source_name: &'a str, options: LexOptions) -> Self {
        Lexer {
            source,
            source_name,
            options,
            index: 0,
            line: 1,
            column: 1,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Drive [`Lexer::next_token`] until the input is exhausted.
    pub fn run(mut self) -> LexOutput<'a> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            reserve_or_abort(&mut tokens, "tokens");
            tokens.push(token);
            if self.is_at_end() {
                break;
            }
        }

        // The loop stops on the cursor, not on the last kind, so the
        // final token may be an ordinary one.
        if !tokens.iter().any(|token| token.kind == TokenKind::Eof) {
            let eof = self.eof_token();
            reserve_or_abort(&mut tokens, "tokens");
            tokens.push(eof);
        }

        debug!(
            source = self.source_name,
            tokens = tokens.len(),
            diagnostics = self.diagnostics.len(),
            "lexed source"
        );

        LexOutput {
            tokens,
            diagnostics: self.diagnostics,
        }
    }

    /// Scan exactly one token. Returns `Eof` once the input is exhausted.
    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace();

        let mark = self.mark();
        let Some(ch) = self.peek_char() else {
            return self.eof_token();
        };

        if is_ident_start(ch) {
            return self.lex_ident_or_keyword(mark);
        }
        if ch.is_ascii_digit() {
            return self.lex_number(mark);
        }
        if ch == '"' {
            return self.lex_string();
        }

        // Longest match first.
        if let Some(kind) = self.peek_next().and_then(|next| two_char_operator(ch, next)) {
            self.consume_char();
            self.consume_char();
            return self.token(kind, mark);
        }
        if let Some(kind) = single_char_operator(ch) {
            self.consume_char();
            return self.token(kind, mark);
        }

        self.consume_char();
        self.unexpected_char(ch, mark)
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !is_whitespace(ch) {
                break;
            }
            self.consume_char();
        }
    }

    fn lex_ident_or_keyword(&mut self, mark: Mark) -> Token<'a> {
        let source = self.source;
        let mut count = 0;
        let mut buffered_end = None;
        let mut message = None;

        while let Some(ch) = self.peek_char() {
            if !is_ident_continue(ch) {
                break;
            }
            if count == MAX_IDENTIFIER_LEN && buffered_end.is_none() {
                let text = &source[mark.index..self.index];
                message = Some(self.overflow(text, "identifier too long"));
                buffered_end = Some(self.index);
                if self.options.overflow == OverflowPolicy::Split {
                    break;
                }
            }
            self.consume_char();
            count += 1;
        }

        let end = buffered_end.unwrap_or(self.index);
        let text = &source[mark.index..end];
        let kind = keyword(text).unwrap_or(TokenKind::Identifier);
        Token {
            kind,
            lexeme: text.to_owned(),
            span: self.span_from(mark),
            source_name: self.source_name,
            message,
        }
    }

    fn lex_number(&mut self, mark: Mark) -> Token<'a> {
        let mut seen_dot = false;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                self.consume_char();
            } else if ch == '.' && !seen_dot && self.peek_next() != Some('.') {
                // `1..5` is a range, so the dot stays for the operator.
                seen_dot = true;
                self.consume_char();
            } else {
                break;
            }
        }
        self.token(TokenKind::Number, mark)
    }

    fn lex_string(&mut self) -> Token<'a> {
        // Consume the opening quote; the token covers the content only.
        self.consume_char();
        let source = self.source;
        let content = self.mark();

        let mut count = 0;
        let mut buffered_end = None;
        let mut message = None;

        while let Some(ch) = self.peek_char() {
            if ch == '"' {
                break;
            }
            if count == MAX_STRING_LEN && buffered_end.is_none() {
                let text = &source[content.index..self.index];
                message = Some(self.overflow(text, "string too long"));
                buffered_end = Some(self.index);
                if self.options.overflow == OverflowPolicy::Split {
                    return Token {
                        kind: TokenKind::String,
                        lexeme: text.to_owned(),
                        span: self.span_from(content),
                        source_name: self.source_name,
                        message,
                    };
                }
            }
            self.consume_char();
            count += 1;
        }

        let end = buffered_end.unwrap_or(self.index);
        let span = self.span_from(content);
        let lexeme = source[content.index..end].to_owned();

        if self.peek_char() == Some('"') {
            self.consume_char();
        } else {
            let here = self.span_from(self.mark());
            self.diagnostics.push(Diagnostic::error(
                self.source_name,
                here,
                "",
                "unterminated string",
            ));
            message = Some("unterminated string".to_owned());
        }

        Token {
            kind: TokenKind::String,
            lexeme,
            span,
            source_name: self.source_name,
            message,
        }
    }

    /// Record an overflow diagnostic at the cursor and return its message.
    fn overflow(&mut self, text: &str, message: &str) -> String {
        let here = self.span_from(self.mark());
        let diagnostic = match self.options.overflow {
            OverflowPolicy::Split => Diagnostic::error(self.source_name, here, text, message),
            OverflowPolicy::Truncate => Diagnostic::warning(self.source_name, here, text, message),
        };
        self.diagnostics.push(diagnostic);
        message.to_owned()
    }

    fn unexpected_char(&mut self, ch: char, mark: Mark) -> Token<'a> {
        let message = format!("invalid character '{ch}'");
        let span = self.span_from(mark);
        self.diagnostics.push(Diagnostic::error(
            self.source_name,
            span,
            ch.to_string(),
            message.clone(),
        ));
        Token {
            kind: TokenKind::Unknown,
            lexeme: ch.to_string(),
            span,
            source_name: self.source_name,
            message: Some(message),
        }
    }

    fn token(&self, kind: TokenKind, mark: Mark) -> Token<'a> {
        Token {
            kind,
            lexeme: self.source[mark.index..self.index].to_owned(),
            span: self.span_from(mark),
            source_name: self.source_name,
            message: None,
        }
    }

    fn eof_token(&self) -> Token<'a> {
        Token {
            kind: TokenKind::Eof,
            lexeme: "EOF".to_owned(),
            span: Span::point(self.line, self.column, offset_or_abort(self.index)),
            source_name: self.source_name,
            message: None,
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            line: self.line,
            column: self.column,
            index: self.index,
        }
    }

    fn span_from(&self, mark: Mark) -> Span {
        Span::new(
            mark.line,
            mark.column,
            self.column,
            offset_or_abort(mark.index),
            offset_or_abort(self.index),
        )
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.index..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.index..].chars();
        chars.next();
        chars.next()
    }

    fn consume_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.index += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "for" => TokenKind::For,
        "if" => TokenKind::If,
        "elif" => TokenKind::Elif,
        "else" => TokenKind::Else,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "package" => TokenKind::Package,
        "import" => TokenKind::Import,
        "def" => TokenKind::Def,
        "return" => TokenKind::Return,
        "end" => TokenKind::End,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        _ => return None,
    };
    Some(kind)
}

fn two_char_operator(first: char, second: char) -> Option<TokenKind> {
    let kind = match (first, second) {
        ('*', '*') => TokenKind::Power,
        ('-', '>') => TokenKind::Arrow,
        ('.', '.') => TokenKind::Range,
        ('<', '=') => TokenKind::LessEqual,
        ('>', '=') => TokenKind::GreaterEqual,
        ('=', '=') => TokenKind::EqualEqual,
        (':', '=') => TokenKind::Assign,
        _ => return None,
    };
    Some(kind)
}

// `=`, `{` and `}` have no kind of their own and fall through to
// `Unknown`.
fn single_char_operator(ch: char) -> Option<TokenKind> {
    let kind = match ch {
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '<' => TokenKind::Less,
        '>' => TokenKind::Greater,
        '^' => TokenKind::Caret,
        '.' => TokenKind::Dot,
        ',' => TokenKind::Comma,
        ':' => TokenKind::Colon,
        ';' => TokenKind::Semi,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        _ => return None,
    };
    Some(kind)
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, "test.gx")
            .tokens
            .iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn lexes_assignment_with_exact_columns() {
        let output = tokenize("x := 1 + 2", "test.gx");
        assert!(output.diagnostics.is_empty());

        let summary: Vec<_> = output
            .tokens
            .iter()
            .map(|t| (t.kind, t.lexeme.as_str(), t.span.column_start, t.span.column_end))
            .collect();
        assert_eq!(
            summary,
            vec![
                (TokenKind::Identifier, "x", 1, 2),
                (TokenKind::Assign, ":=", 3, 5),
                (TokenKind::Number, "1", 6, 7),
                (TokenKind::Plus, "+", 8, 9),
                (TokenKind::Number, "2", 10, 11),
                (TokenKind::Eof, "EOF", 11, 11),
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            kinds("if true end"),
            vec![TokenKind::If, TokenKind::True, TokenKind::End, TokenKind::Eof]
        );
        assert_eq!(kinds("IF"), vec![TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(kinds("ends"), vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn every_keyword_is_recognized() {
        let source = "for if elif else switch case default package import def return end true false";
        let output = tokenize(source, "test.gx");
        let tokens = &output.tokens[..output.tokens.len() - 1];
        assert_eq!(tokens.len(), 14);
        for token in tokens {
            assert_eq!(token.kind.as_str(), Some(token.lexeme.as_str()));
        }
    }

    #[test]
    fn unterminated_string_reports_once() {
        let output = tokenize("\"abc", "test.gx");
        assert_eq!(output.diagnostics.len(), 1);
        let diag = output.diagnostics.iter().next().unwrap();
        assert_eq!(diag.message, "unterminated string");

        assert_eq!(output.tokens.len(), 2);
        assert_eq!(output.tokens[0].kind, TokenKind::String);
        assert_eq!(output.tokens[0].lexeme, "abc");
        assert_eq!(output.tokens[0].message.as_deref(), Some("unterminated string"));
        assert_eq!(output.tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn string_excludes_quotes_and_skips_no_escapes() {
        let output = tokenize(r#"import "std\n" x"#, "test.gx");
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.tokens[1].kind, TokenKind::String);
        assert_eq!(output.tokens[1].lexeme, r"std\n");
        assert_eq!(output.tokens[2].lexeme, "x");
    }

    #[test]
    fn range_is_not_absorbed_into_number() {
        let output = tokenize("1..5", "test.gx");
        let summary: Vec<_> = output
            .tokens
            .iter()
            .map(|t| (t.kind, t.lexeme.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (TokenKind::Number, "1"),
                (TokenKind::Range, ".."),
                (TokenKind::Number, "5"),
                (TokenKind::Eof, "EOF"),
            ]
        );
    }

    #[test]
    fn number_accepts_a_single_dot() {
        let output = tokenize("3.14.15", "test.gx");
        let lexemes: Vec<_> = output.tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["3.14", ".", "15", "EOF"]);
        assert_eq!(output.tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn negative_number_is_two_tokens() {
        assert_eq!(
            kinds("-4"),
            vec![TokenKind::Minus, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn two_char_operators_win_over_single() {
        assert_eq!(
            kinds("** -> .. <= >= == := * - . < > :"),
            vec![
                TokenKind::Power,
                TokenKind::Arrow,
                TokenKind::Range,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::EqualEqual,
                TokenKind::Assign,
                TokenKind::Star,
                TokenKind::Minus,
                TokenKind::Dot,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Colon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn invalid_character_becomes_unknown_token() {
        let output = tokenize("a @ b", "test.gx");
        assert_eq!(
            output.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Identifier,
                TokenKind::Unknown,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
        let unknown = &output.tokens[1];
        assert_eq!(unknown.lexeme, "@");
        assert_eq!((unknown.span.column_start, unknown.span.column_end), (3, 4));

        let diag = output.diagnostics.iter().next().unwrap();
        assert_eq!(diag.to_string(), "test.gx:1:3: invalid character '@'");
        assert_eq!(diag.text, "@");
    }

    #[test]
    fn unmapped_delimiters_are_unknown() {
        let output = tokenize("= { }", "test.gx");
        assert_eq!(output.diagnostics.len(), 3);
        assert!(
            output.tokens[..3]
                .iter()
                .all(|t| t.kind == TokenKind::Unknown)
        );
    }

    #[test]
    fn newline_advances_line_and_resets_column() {
        let output = tokenize("a\n  bc", "test.gx");
        let bc = &output.tokens[1];
        assert_eq!(bc.span.line, 2);
        assert_eq!((bc.span.column_start, bc.span.column_end), (3, 5));
        assert_eq!(output.tokens[2].span, Span::point(2, 5, 6));
    }

    #[test]
    fn eof_terminates_every_sequence_exactly_once() {
        let samples = [
            "",
            "   ",
            "x",
            "x ",
            "\"open",
            "1..",
            "@",
            "def f(a, b) -> int return a ** b end\n",
        ];
        for source in samples {
            let tokens = tokenize(source, "test.gx").tokens;
            assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof), "{source:?}");
            let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
            assert_eq!(eofs, 1, "{source:?}");
        }
    }

    #[test]
    fn lexemes_round_trip_through_byte_offsets() {
        let source = "package demo\nimport \"io\"\ndef area(w, h) -> num\n  return w * h ** 2 % 3\nend\nx := -1.5 .. 10 ; y == z @ obj.field(1, \"s\")\n";
        let output = tokenize(source, "test.gx");
        for token in &output.tokens {
            if token.kind == TokenKind::Eof {
                continue;
            }
            assert_eq!(&source[token.span.range()], token.lexeme, "{token:?}");
        }
    }

    #[test]
    fn long_identifier_is_split_by_default() {
        let source = "a".repeat(300);
        let output = tokenize(&source, "test.gx");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(
            output.diagnostics.iter().next().unwrap().message,
            "identifier too long"
        );

        let lengths: Vec<_> = output.tokens.iter().map(|t| (t.kind, t.lexeme.len())).collect();
        assert_eq!(
            lengths,
            vec![
                (TokenKind::Identifier, MAX_IDENTIFIER_LEN),
                (TokenKind::Identifier, 300 - MAX_IDENTIFIER_LEN),
                (TokenKind::Eof, 3),
            ]
        );
        assert!(output.tokens[0].message.is_some());
        assert!(output.tokens[1].message.is_none());
    }

    #[test]
    fn long_identifier_is_truncated_when_configured() {
        let source = format!("{} x", "a".repeat(300));
        let options = LexOptions {
            overflow: OverflowPolicy::Truncate,
        };
        let output = tokenize_with(&source, "test.gx", &options);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics.error_count(), 0);

        let first = &output.tokens[0];
        assert_eq!(first.lexeme.len(), MAX_IDENTIFIER_LEN);
        assert_eq!(first.span.range(), 0..300);
        assert_eq!(output.tokens[1].lexeme, "x");
        assert_eq!(output.tokens.len(), 3);
    }

    #[test]
    fn long_string_is_split_by_default() {
        let source = format!("\"{}\"", "s".repeat(MAX_STRING_LEN + 1));
        let output = tokenize(&source, "test.gx");
        let first = &output.tokens[0];
        assert_eq!(first.kind, TokenKind::String);
        assert_eq!(first.lexeme.len(), MAX_STRING_LEN);
        assert_eq!(first.message.as_deref(), Some("string too long"));
        // The leftover `s` is an identifier and the closing quote opens a
        // new, unterminated string.
        assert_eq!(output.tokens[1].kind, TokenKind::Identifier);
        assert_eq!(output.tokens[2].kind, TokenKind::String);
        let messages: Vec<_> = output.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["string too long", "unterminated string"]);
    }

    #[test]
    fn long_string_is_truncated_when_configured() {
        let source = format!("\"{}\" 1", "s".repeat(MAX_STRING_LEN + 10));
        let options = LexOptions {
            overflow: OverflowPolicy::Truncate,
        };
        let output = tokenize_with(&source, "test.gx", &options);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.tokens[0].lexeme.len(), MAX_STRING_LEN);
        assert_eq!(output.tokens[1].kind, TokenKind::Number);
    }

    #[test]
    fn reads_source_from_any_reader() {
        let source = read_source("def main() end".as_bytes()).expect("read");
        assert_eq!(kinds(&source)[0], TokenKind::Def);
    }

    #[test]
    fn token_kind_display_names() {
        assert_eq!(TokenKind::End.to_string(), "`end`");
        assert_eq!(TokenKind::Identifier.to_string(), "identifier");
        assert_eq!(TokenKind::Eof.to_string(), "EOF");
    }
}
