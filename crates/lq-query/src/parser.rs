//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent. Recursion follows group and
//! prefix nesting only, which is capped at [`MAX_NESTING`]; clause lists are parsed in a loop.
//!
//! # Grammar
//!
//! ```text
//! query    → list? EOF
//! list     → group (operator? list)?
//! group    → ("NOT" | "-" | "+") group | primary
//! primary  → TERM | PHRASE | FIELD (TERM | PHRASE | paren) | paren
//! paren    → "(" list ")"
//! operator → "AND" "NOT"? | "OR" "NOT"? | "NOT"
//! ```
//!
//! Lists are right-recursive and AND/OR share one precedence level, so `a AND b OR c` is
//! `a AND (b OR c)` structurally. Adjacent clauses without an operator are joined with
//! `Operator::Implicit`.

use std::mem;

use crate::{
    ast::{Binary, GroupPrefix, LeftOnly, Node, Operator, Prefix, Term},
    error::{ParseError, ParseErrorKind},
    lexer::{Token, TokenKind, end_position, tokenize},
    span::{Position, Span},
};

/// Deepest nesting of groups and prefixes the parser accepts.
pub const MAX_NESTING: usize = 128;

/// Recursive descent parser for query expressions.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Token>,
    /// Current position in token stream.
    position: usize,
    /// Position just past the end of the input, for end-of-query errors.
    end: Position,
    /// Number of groups and prefixes currently open.
    depth: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Token>, end: Position) -> Self {
        Self {
            tokens,
            position: 0,
            end,
            depth: 0,
        }
    }

    /// Parses the token stream into a query expression.
    fn parse(mut self) -> Result<Node, ParseError> {
        if self.tokens.is_empty() {
            return Ok(Node::Empty);
        }

        let node = self.parse_list()?;

        if let Some(token) = self.peek() {
            return Err(self.unexpected(token));
        }

        Ok(node)
    }

    /// Parses: list → group (operator? list)?
    ///
    /// Clauses are read in a loop and folded from the right, so a long flat list does not
    /// recurse once per clause.
    fn parse_list(&mut self) -> Result<Node, ParseError> {
        let mut clauses = Vec::new();
        let mut last = self.parse_group()?;

        while !matches!(self.peek_kind(), None | Some(TokenKind::RParen)) {
            let operator_span = self.peek().map(|t| t.span);
            let operator = self.parse_operator();

            if operator != Operator::Implicit {
                match self.peek() {
                    None => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedEnd,
                            format!("expected expression after operator {operator}"),
                            Span::point(self.end),
                        ));
                    }
                    Some(token) if matches!(token.kind, TokenKind::RParen) => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedToken,
                            format!("expected expression after operator {operator}"),
                            operator_span.unwrap_or(token.span),
                        ));
                    }
                    _ => {}
                }
            }

            let next = self.parse_group()?;
            clauses.push((mem::replace(&mut last, next), operator));
        }

        Ok(clauses
            .into_iter()
            .rev()
            .fold(last, |right, (left, operator)| {
                Node::Binary(Binary {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    field: None,
                    parenthesized: false,
                })
            }))
    }

    /// Parses an optional operator, returning `Implicit` if none is present.
    fn parse_operator(&mut self) -> Operator {
        match self.peek_kind() {
            Some(TokenKind::And) => {
                self.advance();
                if self.check(&TokenKind::Not) {
                    self.advance();
                    Operator::AndNot
                } else {
                    Operator::And
                }
            }
            Some(TokenKind::Or) => {
                self.advance();
                if self.check(&TokenKind::Not) {
                    self.advance();
                    Operator::OrNot
                } else {
                    Operator::Or
                }
            }
            Some(TokenKind::Not) => {
                self.advance();
                Operator::Not
            }
            _ => Operator::Implicit,
        }
    }

    /// Parses: group → ("NOT" | "-" | "+") group | primary
    fn parse_group(&mut self) -> Result<Node, ParseError> {
        let prefix = match self.peek_kind() {
            Some(TokenKind::Not) => GroupPrefix::Not,
            Some(TokenKind::Minus) => GroupPrefix::Prohibited,
            Some(TokenKind::Plus) => GroupPrefix::Required,
            _ => return self.parse_primary(),
        };
        self.enter()?;
        self.advance();

        let child = self.parse_group()?;
        self.depth -= 1;

        let term_prefix = match prefix {
            GroupPrefix::Not => None,
            GroupPrefix::Required => Some(Prefix::Required),
            GroupPrefix::Prohibited => Some(Prefix::Prohibited),
        };

        match (child, term_prefix) {
            (Node::Term(mut term), Some(p)) if term.prefix.is_none() => {
                term.prefix = Some(p);
                Ok(Node::Term(term))
            }
            (child, _) => Ok(Node::LeftOnly(LeftOnly {
                child: Box::new(child),
                prefix: Some(prefix),
                field: None,
                parenthesized: false,
            })),
        }
    }

    /// Parses: primary → TERM | PHRASE | FIELD (TERM | PHRASE | paren) | paren
    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let Some(token) = self.peek().cloned() else {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedEnd,
                "unexpected end of query",
                Span::point(self.end),
            ));
        };

        match &token.kind {
            TokenKind::Term(_) | TokenKind::Phrase(_) => Ok(self.parse_value(None)),
            TokenKind::Field(name) => {
                self.advance();
                self.parse_field_expr(name.clone(), token.span)
            }
            TokenKind::LParen => self.parse_paren(),
            _ => Err(self.unexpected(&token)),
        }
    }

    /// Parses the expression after a field prefix.
    fn parse_field_expr(&mut self, name: String, field_span: Span) -> Result<Node, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Term(_) | TokenKind::Phrase(_)) => Ok(self.parse_value(Some(name))),
            Some(TokenKind::LParen) => {
                let mut group = self.parse_paren()?;
                match &mut group {
                    Node::Binary(binary) => binary.field = Some(name),
                    Node::LeftOnly(wrapper) => wrapper.field = Some(name),
                    Node::Empty | Node::Term(_) => {}
                }
                Ok(group)
            }
            _ => {
                let span = self.peek().map_or(field_span, |t| t.span);
                Err(ParseError::new(
                    ParseErrorKind::MissingFieldValue,
                    format!("expected term, phrase, or group after '{name}:'"),
                    span,
                ))
            }
        }
    }

    /// Consumes a TERM or PHRASE token and builds a term node.
    fn parse_value(&mut self, field: Option<String>) -> Node {
        let (term, quoted) = match self.peek_kind() {
            Some(TokenKind::Term(text)) => (text.clone(), false),
            Some(TokenKind::Phrase(text)) => (text.clone(), true),
            _ => return Node::Empty,
        };
        self.advance();

        Node::Term(Term {
            field,
            term,
            quoted,
            prefix: None,
        })
    }

    /// Parses a parenthesized group, consuming the surrounding parentheses.
    fn parse_paren(&mut self) -> Result<Node, ParseError> {
        let open_span = self.peek().map_or(Span::point(self.end), |t| t.span);
        self.enter()?;
        self.advance(); // (

        if let Some(token) = self.peek()
            && token.kind == TokenKind::RParen
        {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedToken,
                "empty group",
                Span::new(open_span.start, token.span.end),
            ));
        }

        let inner = self.parse_list()?;

        if !self.check(&TokenKind::RParen) {
            return Err(ParseError::new(
                ParseErrorKind::UnclosedGroup,
                "expected closing parenthesis",
                open_span,
            ));
        }
        self.advance(); // )
        self.depth -= 1;

        Ok(match inner {
            Node::Binary(mut binary) if !binary.parenthesized && binary.field.is_none() => {
                binary.parenthesized = true;
                Node::Binary(binary)
            }
            other => Node::LeftOnly(LeftOnly {
                child: Box::new(other),
                prefix: None,
                field: None,
                parenthesized: true,
            }),
        })
    }

    /// Opens one level of nesting at the current token.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            let span = self.peek().map_or(Span::point(self.end), |t| t.span);
            return Err(ParseError::new(
                ParseErrorKind::TooDeep,
                format!("groups and prefixes nest deeper than {MAX_NESTING} levels"),
                span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Builds the error for a token that cannot appear where it was found.
    fn unexpected(&self, token: &Token) -> ParseError {
        let message = match token.kind {
            TokenKind::RParen => "unexpected closing parenthesis".to_string(),
            TokenKind::And | TokenKind::Or => format!(
                "unexpected {} (needs expression before it)",
                token.kind.describe()
            ),
            ref other => format!("unexpected {}", other.describe()),
        };
        ParseError::new(ParseErrorKind::UnexpectedToken, message, token.span)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Returns the kind of the current token.
    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    /// Checks if the current token has the same kind as `kind`.
    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind()
            .is_some_and(|k| mem::discriminant(k) == mem::discriminant(kind))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses query text into an AST.
///
/// Returns `Node::Empty` for empty or whitespace-only input. Whitespace between a field name and
/// its colon is ignored.
pub fn parse_expression(input: &str) -> Result<Node, ParseError> {
    let tokens = tokenize(input)?;
    Parser::new(tokens, end_position(input)).parse()
}
