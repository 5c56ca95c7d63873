//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of spanned tokens for the parser.

use crate::{
    error::{ParseError, ParseErrorKind},
    span::{Position, Span},
};

/// The kind of a token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare word. Backslash escapes are kept verbatim.
    Term(String),

    /// A quoted phrase (the quotes are stripped, escapes preserved).
    Phrase(String),

    /// Field prefix (e.g., "level:" produces Field("level")).
    Field(String),

    /// The AND keyword or `&&`.
    And,

    /// The OR keyword or `||`.
    Or,

    /// The NOT keyword or `!`.
    Not,

    /// Prohibit prefix (-).
    Minus,

    /// Require prefix (+).
    Plus,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,
}

impl TokenKind {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Term(t) => format!("term '{t}'"),
            Self::Phrase(p) => format!("phrase \"{p}\""),
            Self::Field(f) => format!("field '{f}:'"),
            Self::And => "operator AND".into(),
            Self::Or => "operator OR".into(),
            Self::Not => "operator NOT".into(),
            Self::Minus => "'-'".into(),
            Self::Plus => "'+'".into(),
            Self::LParen => "'('".into(),
            Self::RParen => "')'".into(),
        }
    }
}

/// A token with its location in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Where it was read.
    pub span: Span,
}

/// Tokenizes a query string.
struct Lexer {
    /// Input characters. Indexed so the lexer can look past whitespace for a colon.
    chars: Vec<char>,
    /// Index of the next unread character.
    index: usize,
    /// Position of the next unread character.
    position: Position,
}

impl Lexer {
    /// Creates a new lexer for the given input.
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
            position: Position::START,
        }
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_whitespace();

        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let start = self.position;
        let kind = match ch {
            '"' => return self.read_phrase().map(Some),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '-' => self.single(TokenKind::Minus),
            '+' => self.single(TokenKind::Plus),
            '!' => self.single(TokenKind::Not),
            '&' if self.peek_at(1) == Some('&') => self.double(TokenKind::And),
            '|' if self.peek_at(1) == Some('|') => self.double(TokenKind::Or),
            ':' => {
                self.advance();
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken,
                    "unexpected ':' (missing field name)",
                    Span::new(start, self.position),
                ));
            }
            _ => return self.read_word().map(Some),
        };

        Ok(Some(Token {
            kind,
            span: Span::new(start, self.position),
        }))
    }

    /// Consumes one character and yields `kind`.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Consumes two characters and yields `kind`.
    fn double(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        self.advance();
        kind
    }

    /// Reads a quoted phrase.
    fn read_phrase(&mut self) -> Result<Token, ParseError> {
        let start = self.position;
        self.advance(); // opening quote

        let mut content = String::new();

        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return Ok(Token {
                        kind: TokenKind::Phrase(content),
                        span: Span::new(start, self.position),
                    });
                }
                Some('\\') => {
                    content.push('\\');
                    self.advance();
                    // A trailing backslash inside a phrase leaves it unclosed.
                    if let Some(escaped) = self.peek() {
                        content.push(escaped);
                        self.advance();
                    }
                }
                Some(ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedQuote,
                        "unclosed quote",
                        Span::new(start, self.position),
                    ));
                }
            }
        }
    }

    /// Reads a term, keyword, or field prefix.
    ///
    /// Whitespace between a word and a following colon is skipped, so `level :error` reads the
    /// same as `level:error`.
    fn read_word(&mut self) -> Result<Token, ParseError> {
        let start = self.position;
        let mut word = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | ':') {
                break;
            }
            if ch == '\\' {
                let escape_start = self.position;
                self.advance();
                let Some(escaped) = self.peek() else {
                    return Err(ParseError::new(
                        ParseErrorKind::DanglingEscape,
                        "backslash at end of query escapes nothing",
                        Span::new(escape_start, self.position),
                    ));
                };
                word.push('\\');
                word.push(escaped);
                self.advance();
                continue;
            }
            word.push(ch);
            self.advance();
        }

        if let Some(gap) = self.colon_distance() {
            for _ in 0..=gap {
                self.advance();
            }
            return Ok(Token {
                kind: TokenKind::Field(word),
                span: Span::new(start, self.position),
            });
        }

        let kind = match word.as_str() {
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            _ => TokenKind::Term(word),
        };

        Ok(Token {
            kind,
            span: Span::new(start, self.position),
        })
    }

    /// If the next non-whitespace character is a colon, returns how many whitespace characters
    /// precede it.
    fn colon_distance(&self) -> Option<usize> {
        let mut gap = 0;
        while let Some(ch) = self.peek_at(gap) {
            match ch {
                ':' => return Some(gap),
                c if c.is_whitespace() => gap += 1,
                _ => return None,
            }
        }
        None
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Returns the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Returns the character `n` places ahead without consuming anything.
    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.index + n).copied()
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(&ch) = self.chars.get(self.index) {
            self.index += 1;
            self.position = self.position.advance(ch);
        }
    }
}

/// Tokenizes a query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(input).tokenize()
}

/// Returns the position just past the end of `input`.
pub fn end_position(input: &str) -> Position {
    input.chars().fold(Position::START, Position::advance)
}
