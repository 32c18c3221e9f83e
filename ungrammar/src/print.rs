//! Prints rules back as Ungrammar source.
//!
//! The output parses back into the same tree: sequences and alternations are
//! parenthesized wherever the syntax would otherwise flatten or regroup them.

use crate::ast::{
    Grammar,
    Rule,
};

/// Where a rule is printed. This decides whether it needs parentheses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Position {
    /// right hand side of a named rule, or inside parentheses
    Top,
    /// element of an alternation
    Alternative,
    /// element of a sequence
    Element,
    /// operand of `?` or `*`
    Operand,
    /// rule after `label:`
    Labeled,
}

impl Position {
    fn needs_parens(self, rule: &Rule) -> bool {
        match (self, rule) {
            (Self::Top, _) => false,
            (Self::Alternative, rule) => matches!(rule, Rule::Alt(_)),
            (Self::Element | Self::Labeled, rule) => matches!(rule, Rule::Seq(_) | Rule::Alt(_)),
            (Self::Operand, rule) => !matches!(rule, Rule::Node { .. } | Rule::Token { .. }),
        }
    }
}

impl Rule {
    /// Renders this rule as Ungrammar source, e.g. `lhs:Expr ('+' | '-')`.
    ///
    /// Placeholders are printed as nothing, so a rule with placeholders might
    /// not parse back.
    pub fn to_ungrammar(&self) -> String {
        let mut output = String::new();
        write_rule(&mut output, Some(self), Position::Top);
        output
    }
}

impl Grammar {
    /// Renders the grammar as Ungrammar source, one `Name = rule` per line,
    /// sorted by name.
    pub fn to_ungrammar(&self) -> String {
        let mut output = String::new();
        for name in self.names_sorted() {
            output.push_str(name);
            output.push_str(" = ");
            write_rule(&mut output, self.get(name), Position::Top);
            output.push('\n');
        }
        output
    }
}

fn write_rule(output: &mut String, rule: Option<&Rule>, position: Position) {
    let Some(rule) = rule else {
        return;
    };

    let parens = position.needs_parens(rule);
    if parens {
        output.push('(');
    }

    match rule {
        Rule::Labeled { label, rule, .. } => {
            output.push_str(label);
            output.push(':');
            write_rule(output, rule.as_deref(), Position::Labeled);
        }
        Rule::Node { name, .. } => output.push_str(name),
        Rule::Token { value, .. } => write_token(output, value),
        Rule::Seq(rules) => {
            for (i, rule) in rules.iter().enumerate() {
                if i > 0 {
                    output.push(' ');
                }
                write_rule(output, Some(rule), Position::Element);
            }
        }
        Rule::Alt(rules) => {
            for (i, rule) in rules.iter().enumerate() {
                if i > 0 {
                    output.push_str(" | ");
                }
                write_rule(output, rule.as_ref(), Position::Alternative);
            }
        }
        Rule::Opt(rule) => {
            write_rule(output, Some(&**rule), Position::Operand);
            output.push('?');
        }
        Rule::Rep(rule) => {
            write_rule(output, Some(&**rule), Position::Operand);
            output.push('*');
        }
    }

    if parens {
        output.push(')');
    }
}

fn write_token(output: &mut String, value: &str) {
    output.push('\'');
    for c in value.chars() {
        if matches!(c, '\'' | '\\') {
            output.push('\\');
        }
        output.push(c);
    }
    output.push('\'');
}
