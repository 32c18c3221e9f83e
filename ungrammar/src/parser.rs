//! Recursive descent parser with error recovery.
//!
//! The parser pulls tokens from the [`Lexer`] and keeps a lookahead of two
//! tokens. Ungrammar rules aren't terminated explicitly, so in
//!
//! ```text
//! Foo = Bar Baz
//! Bob = Rob
//! ```
//!
//! the sequence `Bar Baz` ends where `Bob` starts. The only way to tell is
//! that `Bob` is followed by `=`, hence the second lookahead token.
//!
//! On errors the parser skips tokens until the next `Node =` (see
//! [`Parser::synchronize`]) and continues from there, so a single parse can
//! report many independent errors.

use crate::{
    ast::{
        Grammar,
        Rule,
    },
    error::{
        ErrorList,
        ParseError,
    },
    lexer::{
        Lexer,
        Location,
        Token,
        TokenKind,
    },
};

/// Marks that a sub-parser failed, already reported the error and
/// synchronized. Callers must not report it again.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Reported;

type Parsed<T> = Result<T, Reported>;

/// Parses Ungrammar source into a [`Grammar`].
#[derive(Debug)]
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    token: Token,
    next_token: Token,
    errors: ErrorList,
}

impl<'source> Parser<'source> {
    pub fn new(source: &'source str) -> Self {
        let mut lexer = Lexer::new(source);
        let token = lexer.next_token();
        let next_token = lexer.next_token();

        Self {
            lexer,
            token,
            next_token,
            errors: ErrorList::new(),
        }
    }

    /// Parses the whole input.
    ///
    /// This always returns a grammar with everything that could be parsed,
    /// together with all errors found on the way. Rules whose definition
    /// failed entirely are left out. If a rule name is defined more than
    /// once, the last definition wins and an error is reported.
    pub fn parse_grammar(mut self) -> (Grammar, ErrorList) {
        let mut grammar = Grammar::default();

        while !self.token.is_eof() {
            if let Some((name, location, rule)) = self.parse_named_rule() {
                if grammar.contains(&name) {
                    self.emit_error(location, format!("duplicate rule name {name}"));
                }
                grammar.insert(name, location, rule);
            }
        }

        tracing::debug!(
            rules = grammar.len(),
            errors = self.errors.len(),
            "parsed grammar"
        );

        (grammar, self.errors)
    }

    /// Consumes the current token and returns it.
    fn advance(&mut self) -> Token {
        if self.token.is_eof() {
            return self.token.clone();
        }

        let next = self.lexer.next_token();
        tracing::trace!(token = %next, "next token");

        let next_token = std::mem::replace(&mut self.next_token, next);
        std::mem::replace(&mut self.token, next_token)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    fn at_rule_start(&self) -> bool {
        self.at(TokenKind::Node) && self.next_token.kind == TokenKind::Eq
    }

    /// Parses `Node '=' rule`. If the parser isn't looking at the start of a
    /// named rule, the tokens up to the next one are skipped.
    fn parse_named_rule(&mut self) -> Option<(String, Location, Rule)> {
        if !self.at_rule_start() {
            self.synchronize();
            return None;
        }

        let name = self.advance();
        // skip '='
        self.advance();

        let rule = self.parse_alt().ok()?;
        Some((name.value, name.location, rule))
    }

    /// Parses `seq ('|' seq)*`.
    ///
    /// If an alternative after the first one fails, it's kept as a
    /// placeholder.
    fn parse_alt(&mut self) -> Parsed<Rule> {
        let first = self.parse_seq()?;
        if !self.at(TokenKind::Pipe) {
            return Ok(first);
        }

        let mut alternatives = vec![Some(first)];
        while self.at(TokenKind::Pipe) {
            self.advance();
            alternatives.push(self.parse_seq().ok());
        }

        Ok(Rule::alt(alternatives))
    }

    /// Parses `single_rule+`.
    ///
    /// A failing element after the first one ends the sequence with the
    /// elements parsed so far.
    fn parse_seq(&mut self) -> Parsed<Rule> {
        let Some(first) = self.parse_single_rule()? else {
            self.emit_error(
                self.token.location,
                format!("expected rule, got {}", self.token.value),
            );
            self.synchronize();
            return Err(Reported);
        };

        let mut rules = vec![first];
        while let Ok(Some(rule)) = self.parse_single_rule() {
            rules.push(rule);
        }

        if rules.len() == 1 {
            Ok(rules.remove(0))
        }
        else {
            Ok(Rule::seq(rules))
        }
    }

    /// Parses an atom followed by an optional `?` or `*`. Returns `None` if
    /// there's no rule to parse here.
    fn parse_single_rule(&mut self) -> Parsed<Option<Rule>> {
        let Some(atom) = self.parse_atom()? else {
            return Ok(None);
        };

        let rule = match self.token.kind {
            TokenKind::QMark => {
                self.advance();
                Rule::opt(atom)
            }
            TokenKind::Star => {
                self.advance();
                Rule::rep(atom)
            }
            _ => atom,
        };

        Ok(Some(rule))
    }

    /// Parses a node, a token, a labeled rule or a parenthesized rule.
    ///
    /// Returns `None` without consuming anything if the current token can't
    /// start a rule, or if it's the name of the next named rule.
    fn parse_atom(&mut self) -> Parsed<Option<Rule>> {
        match self.token.kind {
            TokenKind::Node => {
                match self.next_token.kind {
                    // this is the start of the next named rule.
                    TokenKind::Eq => Ok(None),
                    TokenKind::Colon => self.parse_labeled().map(Some),
                    _ => {
                        let token = self.advance();
                        Ok(Some(Rule::node(token.value, token.location)))
                    }
                }
            }
            TokenKind::Token => {
                let token = self.advance();
                Ok(Some(Rule::token(token.value, token.location)))
            }
            TokenKind::LParen => {
                self.advance();
                let errors_before = self.errors.len();
                let rule = self.parse_alt()?;

                // a missing ')' is reported, but we still return what was inside.
                // if the body already reported an error, the parser synchronized
                // past the group and there's no ')' to expect.
                if self.errors.len() > errors_before {
                    tracing::trace!("group body failed, not expecting ')'");
                }
                else if self.at(TokenKind::RParen) {
                    self.advance();
                }
                else {
                    self.emit_error(
                        self.token.location,
                        format!("expected ')', got {}", self.token.value),
                    );
                    self.synchronize();
                }

                Ok(Some(rule))
            }
            TokenKind::Error => {
                self.emit_error(self.token.location, self.token.value.clone());
                self.synchronize();
                Err(Reported)
            }
            _ => Ok(None),
        }
    }

    /// Parses `label ':' single_rule`. The parser is at the label.
    fn parse_labeled(&mut self) -> Parsed<Rule> {
        let label = self.advance();
        // skip ':'
        self.advance();

        let rule = match self.parse_single_rule() {
            Ok(Some(rule)) => Some(rule),
            Ok(None) => {
                self.emit_error(
                    self.token.location,
                    format!("expected rule after label, got {}", self.token.value),
                );
                self.synchronize();
                None
            }
            Err(Reported) => None,
        };

        Ok(Rule::labeled(label.value, rule, label.location))
    }

    /// Skips tokens until the parser is at `Node '='`, where a new named rule
    /// can start, or at the end of input.
    fn synchronize(&mut self) {
        let mut skipped = 0usize;
        while !self.token.is_eof() && !self.at_rule_start() {
            self.advance();
            skipped += 1;
        }
        tracing::debug!(skipped, at = %self.token.location, "synchronized");
    }

    fn emit_error(&mut self, location: Location, message: impl Into<String>) {
        let error = ParseError::new(location, message);
        tracing::debug!(%error, "parse error");
        self.errors.push(error);
    }
}
