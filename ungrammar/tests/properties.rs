//! Property-based tests for the lexer, parser and printer.

use proptest::prelude::*;
use ungrammar::{
    lexer::Lexer,
    parse,
    Location,
    Rule,
};

fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_]{1,8}"
}

/// Token values with the characters that need escaping thrown in.
fn token_value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z+*=|:?()]{0,4}",
        "[a-z'\\\\ ]{0,6}",
        "\\PC{0,4}",
    ]
}

/// Rules without placeholders. Locations are all the same, since they aren't
/// part of the rendered form.
fn rule_strategy() -> impl Strategy<Value = Rule> {
    let leaf = prop_oneof![
        ident_strategy().prop_map(|name| Rule::node(name, Location::default())),
        token_value_strategy().prop_map(|value| Rule::token(value, Location::default())),
    ];

    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (ident_strategy(), inner.clone())
                .prop_map(|(label, rule)| Rule::labeled(label, Some(rule), Location::default())),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Rule::seq),
            prop::collection::vec(inner.clone(), 2..4)
                .prop_map(|rules| Rule::alt(rules.into_iter().map(Some).collect())),
            inner.clone().prop_map(Rule::opt),
            inner.prop_map(Rule::rep),
        ]
    })
}

/// Soup of Ungrammar-ish characters, mostly invalid.
fn noise_strategy() -> impl Strategy<Value = String> {
    "[a-c =|?*():'\\\\@/\n]{0,40}"
}

proptest! {
    #[test]
    fn printed_rules_parse_back(rule in rule_strategy()) {
        let source = format!("x = {}", rule.to_ungrammar());
        let (grammar, errors) = parse(&source);

        prop_assert!(errors.is_empty(), "{}: {}", source, errors);
        prop_assert_eq!(grammar.len(), 1);
        prop_assert_eq!(grammar.get("x").unwrap().to_string(), rule.to_string());
    }

    #[test]
    fn distinct_names_give_one_rule_each(
        rules in prop::collection::btree_map(ident_strategy(), rule_strategy(), 1..6)
    ) {
        let source = rules
            .iter()
            .map(|(name, rule)| format!("{name} = {}\n", rule.to_ungrammar()))
            .collect::<String>();
        let (grammar, errors) = parse(&source);

        prop_assert!(errors.is_empty(), "{}: {}", source, errors);
        prop_assert_eq!(grammar.len(), rules.len());
        for (name, rule) in &rules {
            prop_assert_eq!(grammar.get(name).unwrap().to_string(), rule.to_string());
        }
    }

    #[test]
    fn lexer_always_makes_progress(input in "\\PC{0,64}") {
        let tokens = Lexer::new(&input).count();
        prop_assert!(tokens <= input.chars().count());
    }

    #[test]
    fn parser_never_gives_up(input in noise_strategy()) {
        let (grammar, errors) = parse(&input);

        let lines = input.lines().count().max(1) + 1;
        for error in &errors {
            prop_assert!(error.location.line <= lines, "{}", error);
        }
        for name in grammar.names_sorted() {
            prop_assert!(grammar.location_of(name).is_some());
        }
    }
}
