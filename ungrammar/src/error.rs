use std::{
    fmt,
    slice,
    vec,
};

use crate::lexer::Location;

/// A single error found while parsing, attributed to a source location.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{location}: {message}")]
pub struct ParseError {
    pub location: Location,
    pub message: String,
}

impl ParseError {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// All errors reported during a parse, in the order they were found.
///
/// When displayed this only shows the first error, followed by the number of
/// errors that were omitted, e.g. `2:7: expected rule, got | (and 1 more
/// errors)`. Iterate over it to get all of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<ParseError>);

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ParseError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&ParseError> {
        self.0.first()
    }

    pub fn iter(&self) -> slice::Iter<'_, ParseError> {
        self.0.iter()
    }

    /// Returns `value` if there are no errors, and the errors otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        }
        else {
            Err(self)
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "no errors"),
            [error] => write!(f, "{error}"),
            [first, rest @ ..] => write!(f, "{first} (and {} more errors)", rest.len()),
        }
    }
}

impl std::error::Error for ErrorList {}

impl IntoIterator for ErrorList {
    type Item = ParseError;
    type IntoIter = vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a ParseError;
    type IntoIter = slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ParseError> for ErrorList {
    fn from_iter<T: IntoIterator<Item = ParseError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<ParseError> for ErrorList {
    fn extend<T: IntoIterator<Item = ParseError>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(line: usize, column: usize, message: &str) -> ParseError {
        ParseError::new(Location::new(line, column), message)
    }

    #[test]
    fn it_formats_single_errors() {
        assert_eq!(
            error(1, 9, "expected rule, got |").to_string(),
            "1:9: expected rule, got |"
        );
    }

    #[test]
    fn it_summarizes_error_lists() {
        let mut errors = ErrorList::new();
        assert_eq!(errors.to_string(), "no errors");

        errors.push(error(2, 7, "expected rule, got |"));
        assert_eq!(errors.to_string(), "2:7: expected rule, got |");

        errors.push(error(3, 13, "expected ')', got x"));
        assert_eq!(
            errors.to_string(),
            "2:7: expected rule, got | (and 1 more errors)"
        );

        errors.push(error(4, 1, "duplicate rule name x"));
        assert_eq!(
            errors.to_string(),
            "2:7: expected rule, got | (and 2 more errors)"
        );
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn it_converts_into_result() {
        assert_eq!(ErrorList::new().into_result(42), Ok(42));

        let errors = ErrorList::from_iter([error(1, 1, "oops")]);
        assert_eq!(errors.clone().into_result(42), Err(errors));
    }
}
