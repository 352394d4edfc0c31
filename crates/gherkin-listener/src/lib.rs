#![doc = include_str!("../README.md")]

mod formatter;
mod listener;
mod options;
mod record;

pub use formatter::Formatter;
pub use gherkin_lexer::{KeywordError, KeywordTable, KeywordTables};
pub use gherkin_parse::{GrammarError, ParseError};
pub use listener::AggregatingListener;
pub use options::ParseOptions;
pub use record::{Element, Examples, Feature, Record, Row, Step, TrailingBlock};

use gherkin_parse::Parser;

/// Parse an English document, handing its records to `formatter`.
pub fn parse<F: Formatter + ?Sized>(source: &str, formatter: &mut F) -> Result<(), ParseError> {
    parse_with(source, &ParseOptions::default(), formatter)
}

/// Parse a document with explicit options.
///
/// Records flushed before an error stay with the formatter. The element open
/// when the error hit is not flushed.
pub fn parse_with<F: Formatter + ?Sized>(
    source: &str,
    options: &ParseOptions<'_>,
    formatter: &mut F,
) -> Result<(), ParseError> {
    let mut listener = AggregatingListener::new(formatter);
    if let Some(uri) = options.document_uri() {
        listener = listener.with_uri(uri);
    }
    Parser::new(options.lexer(source)).parse(&mut listener)
}

#[cfg(test)]
#[ctor::ctor]
fn init_test_tracing() {
    gherkin_testhelpers::init_tracing();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let mut records = Vec::new();
        parse("Feature: F\n  Scenario: S\n    Given x\n", &mut records).unwrap();
        assert_eq!(
            records.iter().map(Record::to_string).collect::<Vec<_>>(),
            vec![
                r#"(feature [] [] "Feature" "F" "" 1 nil)"#,
                r#"(scenario [] [] "Scenario" "S" "" 2)"#,
                r#"(step [] [] "Given" "x" 3 nil)"#,
                "(eof)",
            ]
        );
    }

    #[test]
    fn test_parse_empty() {
        let mut records = Vec::new();
        parse("", &mut records).unwrap();
        assert_eq!(records, vec![Record::Eof]);
    }

    #[test]
    fn test_options_reject_unknown_language() {
        assert!(matches!(
            ParseOptions::new().language("xx"),
            Err(KeywordError::UnknownLanguage(code)) if code == "xx"
        ));
    }

    #[test]
    fn test_options_keep_language_across_tables() {
        let mut tables = KeywordTables::builtin().clone();
        let mut pirate = tables.get("en").unwrap().clone();
        pirate.feature = vec!["Ahoy matey!".to_string()];
        tables.insert("en-pirate", pirate);

        let options = ParseOptions::new()
            .keywords(&tables)
            .unwrap()
            .language("en-pirate")
            .unwrap();
        assert_eq!(options.language_code(), "en-pirate");

        let mut records = Vec::new();
        parse_with("Ahoy matey!: Treasure\n", &options, &mut records).unwrap();
        assert_eq!(
            records[0].to_string(),
            r#"(feature [] [] "Ahoy matey!" "Treasure" "" 1 nil)"#
        );
    }

    #[test]
    fn test_error_keeps_flushed_records() {
        let mut records = Vec::new();
        let err = parse(
            "Feature: F\nScenario: S\nGiven x\nScenario: T\n@wip\nGiven y\n",
            &mut records,
        )
        .unwrap_err();
        assert_eq!(err.line(), 6);
        assert_eq!(
            records.iter().map(Record::to_string).collect::<Vec<_>>(),
            vec![
                r#"(feature [] [] "Feature" "F" "" 1 nil)"#,
                r#"(scenario [] [] "Scenario" "S" "" 2)"#,
                r#"(step [] [] "Given" "x" 3 nil)"#,
            ]
        );
    }
}
