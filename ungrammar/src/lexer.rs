//! Lexical analysis of Ungrammar source.
//!
//! The [`Lexer`] is pulled one token at a time by the parser. Note that the
//! word "token" is overloaded here: a quoted literal like `'+'` is called a
//! token in Ungrammar, and it's just one of the kinds of [`Token`]s the lexer
//! produces ([`TokenKind::Token`]).

use std::fmt;

/// Position of a lexical element in the source. Both line and column are
/// 1-based; columns count characters, not bytes.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
#[display(fmt = "{}:{}", line, column)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, derive_more::Display)]
pub enum TokenKind {
    #[display(fmt = "ERROR")]
    Error,
    #[display(fmt = "EOF")]
    Eof,
    #[display(fmt = "NODE")]
    Node,
    #[display(fmt = "TOKEN")]
    Token,
    #[display(fmt = "EQ")]
    Eq,
    #[display(fmt = "STAR")]
    Star,
    #[display(fmt = "PIPE")]
    Pipe,
    #[display(fmt = "QMARK")]
    QMark,
    #[display(fmt = "COLON")]
    Colon,
    #[display(fmt = "LPAREN")]
    LParen,
    #[display(fmt = "RPAREN")]
    RParen,
}

/// A token produced by the [`Lexer`].
///
/// For identifiers and quoted literals `value` is the (unescaped) text. For
/// [`TokenKind::Error`] it's the error message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token{{{}, '{}', {}}}", self.kind, self.value, self.location)
    }
}

pub(crate) const END_OF_INPUT: &str = "<end of input>";

/// Scans Ungrammar source into [`Token`]s.
///
/// Once the end of the input is reached, [`Lexer::next_token`] keeps
/// returning [`TokenKind::Eof`] tokens.
#[derive(Clone, Debug)]
pub struct Lexer<'source> {
    source: &'source str,

    /// current character, `None` at the end of input
    current: Option<char>,

    /// byte offset of `current`
    offset: usize,

    /// byte offset of the character after `current`
    next_offset: usize,

    /// location of `current`
    location: Location,

    done: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        let mut lexer = Self {
            source,
            current: None,
            offset: 0,
            next_offset: 0,
            // column is incremented by `advance` before we see the first character.
            location: Location::new(1, 0),
            done: false,
        };
        lexer.advance();
        lexer
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_nontokens();

        let location = self.location;
        let Some(c) = self.current else {
            return Token::new(TokenKind::Eof, END_OF_INPUT, location);
        };

        if is_id_char(c) {
            return self.scan_node();
        }

        let kind = match c {
            '\'' => return self.scan_quoted(),
            '=' => TokenKind::Eq,
            '*' => TokenKind::Star,
            '?' => TokenKind::QMark,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '|' => TokenKind::Pipe,
            ':' => TokenKind::Colon,
            _ => {
                self.advance();
                return Token::new(
                    TokenKind::Error,
                    format!("unknown token starting with {c:?}"),
                    location,
                );
            }
        };

        self.advance();
        Token::new(kind, c, location)
    }

    /// Moves to the next character, keeping `location` in sync. At the end of
    /// input the column stays where it was.
    fn advance(&mut self) {
        if self.current == Some('\n') {
            self.location.line += 1;
            self.location.column = 0;
        }

        match self.source[self.next_offset..].chars().next() {
            Some(c) => {
                self.offset = self.next_offset;
                self.next_offset += c.len_utf8();
                self.current = Some(c);
                self.location.column += 1;
            }
            None => {
                self.offset = self.source.len();
                self.current = None;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.next_offset..].chars().next()
    }

    fn skip_nontokens(&mut self) {
        loop {
            match self.current {
                Some(' ' | '\t' | '\r' | '\n') => self.advance(),
                Some('/') if self.peek() == Some('/') => self.skip_line_comment(),
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while !matches!(self.current, None | Some('\n')) {
            self.advance();
        }
    }

    fn scan_node(&mut self) -> Token {
        let location = self.location;
        let start = self.offset;
        while self.current.map_or(false, is_id_char) {
            self.advance();
        }
        Token::new(TokenKind::Node, &self.source[start..self.offset], location)
    }

    fn scan_quoted(&mut self) -> Token {
        let location = self.location;
        // skip the opening quote
        self.advance();

        let mut value = String::new();
        loop {
            match self.current {
                None => {
                    return Token::new(TokenKind::Error, "unterminated token literal", location);
                }
                Some('\'') => {
                    self.advance();
                    return Token::new(TokenKind::Token, value, location);
                }
                Some('\\') => {
                    let escape_location = self.location;
                    self.advance();
                    match self.current {
                        Some(c @ ('\'' | '\\')) => value.push(c),
                        None => {
                            return Token::new(
                                TokenKind::Error,
                                "unterminated token literal",
                                location,
                            );
                        }
                        Some(_) => {
                            self.skip_rest_of_quoted();
                            return Token::new(
                                TokenKind::Error,
                                "invalid escape in token literal",
                                escape_location,
                            );
                        }
                    }
                }
                Some(c) => value.push(c),
            }
            self.advance();
        }
    }

    /// Skips past the closing quote of a literal that already failed to scan,
    /// so its remains aren't tokenized.
    fn skip_rest_of_quoted(&mut self) {
        loop {
            match self.current {
                None => return,
                Some('\'') => {
                    self.advance();
                    return;
                }
                Some('\\') => {
                    self.advance();
                    if self.current.is_some() {
                        self.advance();
                    }
                }
                Some(_) => self.advance(),
            }
        }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Token;

    /// Yields all tokens before the end of input. Unlike
    /// [`Lexer::next_token`] this doesn't return an EOF token.
    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        if token.is_eof() {
            self.done = true;
            None
        }
        else {
            Some(token)
        }
    }
}

impl<'source> std::iter::FusedIterator for Lexer<'source> {}

/// Identifier characters are ASCII letters and underscores only.
fn is_id_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
