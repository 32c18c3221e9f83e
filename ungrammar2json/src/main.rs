//! Parses an Ungrammar file and dumps it as JSON that any tool or language
//! can read.
//!
//! By default this reads from stdin and writes to stdout, with minimal
//! whitespace. Use `--pretty` or pipe through `jq .` for readable output.

use std::{
    fs::File,
    io::{
        stdin,
        stdout,
        BufWriter,
        Read,
        Write,
    },
    path::PathBuf,
};

use color_eyre::eyre::{
    eyre,
    Error,
    WrapErr,
};
use serde::{
    ser::SerializeMap,
    Serialize,
    Serializer,
};
use structopt::StructOpt;
use ungrammar::{
    Grammar,
    Rule,
};

#[derive(Debug, StructOpt)]
#[structopt(about = "Dump an Ungrammar file as JSON")]
struct Args {
    /// Ungrammar file to read. Reads stdin if omitted.
    input: Option<PathBuf>,

    /// File to write the JSON to. Writes to stdout if omitted.
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON.
    #[structopt(short, long)]
    pretty: bool,
}

impl Args {
    pub fn run(self) -> Result<(), Error> {
        let source = self.read_input()?;

        let (grammar, errors) = ungrammar::parse(&source);
        if !errors.is_empty() {
            for error in &errors {
                tracing::error!("{error}");
            }
            return Err(eyre!("error parsing ungrammar: {}", errors));
        }
        tracing::info!(rules = grammar.len(), "parsed grammar");

        let mut output: Box<dyn Write> = match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .wrap_err_with(|| format!("failed to create {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(stdout().lock()),
        };

        let json = JsonGrammar(&grammar);
        if self.pretty {
            serde_json::to_writer_pretty(&mut output, &json)?;
        }
        else {
            serde_json::to_writer(&mut output, &json)?;
        }
        writeln!(output)?;
        output.flush()?;

        Ok(())
    }

    fn read_input(&self) -> Result<String, Error> {
        match &self.input {
            Some(path) => {
                tracing::debug!(path = %path.display(), "reading input");
                std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("failed to read {}", path.display()))
            }
            None => {
                tracing::debug!("reading stdin");
                let mut source = String::new();
                stdin()
                    .read_to_string(&mut source)
                    .wrap_err("failed to read stdin")?;
                Ok(source)
            }
        }
    }
}

/// JSON encoding of a grammar: an object mapping rule names to rules.
struct JsonGrammar<'a>(&'a Grammar);

impl<'a> Serialize for JsonGrammar<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .names_sorted()
                .into_iter()
                .map(|name| (name, JsonRule(self.0.get(name)))),
        )
    }
}

/// JSON encoding of a rule. Each variant becomes an object with a single key
/// naming the variant, e.g. `{"opt": {"node": "Expr"}}`, except labeled rules,
/// which become `{"label": "lhs", "rule": ...}`. Placeholders are `null`.
struct JsonRule<'a>(Option<&'a Rule>);

impl<'a> Serialize for JsonRule<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(rule) = self.0 else {
            return serializer.serialize_none();
        };

        match rule {
            Rule::Labeled { label, rule, .. } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("label", label)?;
                map.serialize_entry("rule", &JsonRule(rule.as_deref()))?;
                map.end()
            }
            Rule::Node { name, .. } => single_entry(serializer, "node", name),
            Rule::Token { value, .. } => single_entry(serializer, "token", value),
            Rule::Seq(rules) => {
                let rules = rules.iter().map(|rule| JsonRule(Some(rule))).collect::<Vec<_>>();
                single_entry(serializer, "seq", &rules)
            }
            Rule::Alt(rules) => {
                let rules = rules.iter().map(|rule| JsonRule(rule.as_ref())).collect::<Vec<_>>();
                single_entry(serializer, "alt", &rules)
            }
            Rule::Opt(rule) => single_entry(serializer, "opt", &JsonRule(Some(&**rule))),
            Rule::Rep(rule) => single_entry(serializer, "rep", &JsonRule(Some(&**rule))),
        }
    }
}

fn single_entry<S: Serializer, V: Serialize + ?Sized>(
    serializer: S,
    key: &str,
    value: &V,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::from_args();
    args.run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn encode(source: &str) -> serde_json::Value {
        let (grammar, _) = ungrammar::parse(source);
        serde_json::to_value(JsonGrammar(&grammar)).unwrap()
    }

    #[test]
    fn it_encodes_every_variant() {
        assert_eq!(
            encode("x = lab:a 'b' c? d* | e"),
            json!({
                "x": {
                    "alt": [
                        {
                            "seq": [
                                { "label": "lab", "rule": { "node": "a" } },
                                { "token": "b" },
                                { "opt": { "node": "c" } },
                                { "rep": { "node": "d" } }
                            ]
                        },
                        { "node": "e" }
                    ]
                }
            })
        );
    }

    #[test]
    fn it_encodes_placeholders_as_null() {
        assert_eq!(
            encode("x = a | | b"),
            json!({ "x": { "alt": [{ "node": "a" }, null] } })
        );
        assert_eq!(
            encode("x = lab:"),
            json!({ "x": { "label": "lab", "rule": null } })
        );
    }

    #[test]
    fn it_writes_minimal_json_sorted_by_name() {
        let (grammar, errors) = ungrammar::parse("c = 'd'\na = b");
        assert!(errors.is_empty());
        assert_eq!(
            serde_json::to_string(&JsonGrammar(&grammar)).unwrap(),
            r#"{"a":{"node":"b"},"c":{"token":"d"}}"#
        );
    }

    #[test]
    fn it_parses_arguments() {
        let args = Args::from_iter(["ungrammar2json", "--pretty", "-o", "out.json", "rust.ungram"]);
        assert!(args.pretty);
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.input, Some(PathBuf::from("rust.ungram")));

        let args = Args::from_iter(["ungrammar2json"]);
        assert!(!args.pretty);
        assert_eq!(args.input, None);
        assert_eq!(args.output, None);
    }
}
