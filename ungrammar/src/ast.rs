//! The parsed representation of an Ungrammar file.

use std::{
    collections::{
        hash_map,
        HashMap,
    },
    fmt,
};

use itertools::Itertools;

use crate::lexer::Location;

/// A parsed Ungrammar file: a mapping from rule names to their rules.
///
/// For `Foo = Bar Baz` the rules map contains `"Foo"` mapped to
/// `Seq(Bar, Baz)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grammar {
    pub rules: HashMap<String, Rule>,

    /// Location of each rule's name. Rules carry their own locations, but
    /// names are just strings, so we keep them here.
    pub name_locations: HashMap<String, Location>,
}

impl Grammar {
    /// Inserts a named rule, replacing (and returning) an earlier rule with the
    /// same name.
    pub fn insert(&mut self, name: impl Into<String>, location: Location, rule: Rule) -> Option<Rule> {
        let name = name.into();
        self.name_locations.insert(name.clone(), location);
        self.rules.insert(name, rule)
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn location_of(&self, name: &str) -> Option<Location> {
        self.name_locations.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over the rules in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, Rule> {
        self.rules.iter()
    }

    pub fn names_sorted(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).sorted().collect()
    }

    /// Returns `true` if no rule contains a placeholder.
    pub fn is_complete(&self) -> bool {
        self.rules.values().all(Rule::is_complete)
    }
}

impl<'a> IntoIterator for &'a Grammar {
    type Item = (&'a String, &'a Rule);
    type IntoIter = hash_map::Iter<'a, String, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// One `name: rule` line per rule. The order of the lines is unspecified.
impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, rule) in &self.rules {
            writeln!(f, "{name}: {rule}")?;
        }
        Ok(())
    }
}

/// A node in the tree of a rule.
///
/// Sub-rules that are wrapped in an [`Option`] are placeholders: the
/// parser reported an error where that sub-rule should have been. They are
/// rendered as `<nil>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    /// `label:rule`
    Labeled {
        label: String,
        rule: Option<Box<Rule>>,
        location: Location,
    },

    /// A reference to another rule, e.g. `Expr`
    Node { name: String, location: Location },

    /// A quoted token, e.g. `'+'`
    Token { value: String, location: Location },

    /// `a b c`
    Seq(Vec<Rule>),

    /// `a | b | c`
    Alt(Vec<Option<Rule>>),

    /// `rule?`
    Opt(Box<Rule>),

    /// `rule*`
    Rep(Box<Rule>),
}

impl Rule {
    pub fn node(name: impl Into<String>, location: Location) -> Self {
        Self::Node {
            name: name.into(),
            location,
        }
    }

    pub fn token(value: impl Into<String>, location: Location) -> Self {
        Self::Token {
            value: value.into(),
            location,
        }
    }

    pub fn labeled(label: impl Into<String>, rule: Option<Rule>, location: Location) -> Self {
        Self::Labeled {
            label: label.into(),
            rule: rule.map(Box::new),
            location,
        }
    }

    /// # Panics
    ///
    /// Panics if `rules` is empty.
    pub fn seq(rules: Vec<Rule>) -> Self {
        assert!(!rules.is_empty(), "empty sequence");
        Self::Seq(rules)
    }

    /// # Panics
    ///
    /// Panics if `rules` is empty or starts with a placeholder.
    pub fn alt(rules: Vec<Option<Rule>>) -> Self {
        assert!(
            matches!(rules.first(), Some(Some(_))),
            "alternation must start with a rule"
        );
        Self::Alt(rules)
    }

    pub fn opt(rule: Rule) -> Self {
        Self::Opt(Box::new(rule))
    }

    pub fn rep(rule: Rule) -> Self {
        Self::Rep(Box::new(rule))
    }

    /// Location where this rule starts.
    ///
    /// For sequences and alternations this is the location of their first
    /// element.
    pub fn location(&self) -> Location {
        match self {
            Self::Labeled { location, .. }
            | Self::Node { location, .. }
            | Self::Token { location, .. } => *location,
            Self::Seq(rules) => {
                rules
                    .first()
                    .unwrap_or_else(|| panic!("empty sequence"))
                    .location()
            }
            Self::Alt(rules) => {
                rules
                    .first()
                    .and_then(Option::as_ref)
                    .unwrap_or_else(|| panic!("alternation doesn't start with a rule"))
                    .location()
            }
            Self::Opt(rule) | Self::Rep(rule) => rule.location(),
        }
    }

    /// Returns `true` if this rule contains no placeholders.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Labeled { rule, .. } => rule.as_deref().map_or(false, Rule::is_complete),
            Self::Node { .. } | Self::Token { .. } => true,
            Self::Seq(rules) => rules.iter().all(Rule::is_complete),
            Self::Alt(rules) => {
                rules
                    .iter()
                    .all(|rule| rule.as_ref().map_or(false, Rule::is_complete))
            }
            Self::Opt(rule) | Self::Rep(rule) => rule.is_complete(),
        }
    }
}

/// The canonical form: `name`, `'token'`, `Seq(a, b)`, `Alt(a, b)`,
/// `Opt(a)`, `Rep(a)` and `label:a`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Labeled { label, rule, .. } => write!(f, "{label}:{}", Slot(rule.as_deref())),
            Self::Node { name, .. } => write!(f, "{name}"),
            Self::Token { value, .. } => write!(f, "'{value}'"),
            Self::Seq(rules) => write!(f, "Seq({})", rules.iter().format(", ")),
            Self::Alt(rules) => {
                write!(
                    f,
                    "Alt({})",
                    rules.iter().map(|rule| Slot(rule.as_ref())).format(", ")
                )
            }
            Self::Opt(rule) => write!(f, "Opt({rule})"),
            Self::Rep(rule) => write!(f, "Rep({rule})"),
        }
    }
}

/// Displays a sub-rule, or `<nil>` for a placeholder.
struct Slot<'a>(Option<&'a Rule>);

impl<'a> fmt::Display for Slot<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(rule) => write!(f, "{rule}"),
            None => write!(f, "<nil>"),
        }
    }
}
