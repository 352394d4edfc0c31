//! Diagnostic rendering for parse errors.

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};
use gherkin_lexer::LexErrorKind;

use crate::error::expected_list;
use crate::{ConstructKind, ParseError};

impl ParseError {
    /// Render this error with ariadne.
    ///
    /// `line_offset` must match the offset the document was parsed with, so
    /// the reported line can be found in `source`.
    pub fn render(&self, filename: &str, source: &str, line_offset: usize) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, line_offset, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(
        &self,
        filename: &str,
        source: &str,
        line_offset: usize,
        writer: W,
    ) {
        let range = line_range(source, self.line().saturating_sub(line_offset + 1));
        let report = self.build_report(filename, range);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
        range: Range<usize>,
    ) -> ariadne::ReportBuilder<'static, (&'a str, Range<usize>)> {
        let report = Report::build(ReportKind::Error, (filename, range.clone()));
        let label = Label::new((filename, range)).with_color(Color::Red);

        match self {
            ParseError::Lex(e) => match &e.kind {
                LexErrorKind::UnexpectedLine(_) => report
                    .with_message("unexpected line")
                    .with_label(label.with_message("not a keyword, table row, tag or comment"))
                    .with_help("free text is only allowed as the description after a header line"),

                LexErrorKind::UnterminatedTextBlock => report
                    .with_message("unterminated text block")
                    .with_label(label.with_message("text block opened here"))
                    .with_help("close it with a matching delimiter line"),

                LexErrorKind::InvalidEscape(c) => report
                    .with_message(format!("invalid escape sequence '\\{c}'"))
                    .with_label(label.with_message("in this table row"))
                    .with_help("valid escapes in table cells are: \\|, \\\\ and \\n"),

                LexErrorKind::DanglingEscape => report
                    .with_message("dangling escape")
                    .with_label(label.with_message("row ends with a backslash"))
                    .with_help("escape a literal backslash as \\\\"),

                LexErrorKind::UnterminatedRow(delimiter) => report
                    .with_message("unterminated table row")
                    .with_label(label.with_message("text after the last cell"))
                    .with_help(format!("end the row with '{delimiter}'")),

                LexErrorKind::UnknownLanguage(code) => report
                    .with_message(format!("unknown language {code:?}"))
                    .with_label(label.with_message("no keyword table for this language"))
                    .with_help("use a language code present in the keyword tables the document is parsed with"),
            },

            ParseError::Grammar(e) => {
                let report = report
                    .with_message(format!("unexpected {}", e.found))
                    .with_label(label.with_message(format!(
                        "expected {}",
                        expected_list(&e.expected)
                    )));
                match e.found {
                    ConstructKind::EndOfInput => {
                        report.with_help("tags must be followed by a Feature, Scenario, Scenario Outline or Examples")
                    }
                    ConstructKind::Step | ConstructKind::Row | ConstructKind::TextBlock
                        if e.expected.iter().all(ConstructKind::is_taggable) =>
                    {
                        report.with_help("only a Feature, Scenario, Scenario Outline or Examples can be tagged")
                    }
                    _ => report,
                }
            }
        }
    }
}

/// Character range of the line at `index`, end of input if there is none.
///
/// ariadne counts characters, not bytes.
fn line_range(source: &str, index: usize) -> Range<usize> {
    let mut start = 0;
    for (i, line) in source.split_inclusive('\n').enumerate() {
        let content = line.trim_end_matches(['\n', '\r']);
        if i == index {
            return start..start + content.chars().count();
        }
        start += line.chars().count();
    }
    start..start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use gherkin_lexer::{KeywordTables, Lexer};

    fn parse_error(source: &str, line_offset: usize) -> ParseError {
        let lexer = Lexer::for_language(source, KeywordTables::builtin(), "en", line_offset).unwrap();
        Parser::new(lexer)
            .parse_to_vec()
            .expect_err("expected a parse error")
    }

    fn render(source: &str, line_offset: usize) -> String {
        let output = parse_error(source, line_offset).render("test.feature", source, line_offset);
        String::from_utf8(strip_ansi_escapes::strip(output)).unwrap()
    }

    #[test]
    fn test_line_range() {
        let source = "ab\ncdé\r\n\nlast";
        assert_eq!(line_range(source, 0), 0..2);
        assert_eq!(line_range(source, 1), 3..6);
        assert_eq!(line_range(source, 2), 8..8);
        assert_eq!(line_range(source, 3), 9..13);
        assert_eq!(line_range(source, 9), 13..13);
    }

    #[test]
    fn test_grammar_error_diagnostic() {
        let rendered = render("Feature: F\nFeature: G\n", 0);
        assert!(rendered.contains("unexpected Feature"), "{rendered}");
        assert!(
            rendered.contains("expected Background, Scenario or Scenario Outline"),
            "{rendered}"
        );
        assert!(rendered.contains("Feature: G"), "{rendered}");
    }

    #[test]
    fn test_tagged_step_has_help() {
        let rendered = render("Feature: F\nScenario: S\n@wip\nGiven x\n", 0);
        assert!(rendered.contains("unexpected Step"), "{rendered}");
        assert!(rendered.contains("can be tagged"), "{rendered}");
    }

    #[test]
    fn test_lex_error_diagnostic() {
        let rendered = render("Feature: F\nScenario: S\nGiven x\n| a | b\n", 0);
        assert!(rendered.contains("unterminated table row"), "{rendered}");
        assert!(rendered.contains("| a | b"), "{rendered}");
    }

    #[test]
    fn test_unknown_language_help_names_no_table_set() {
        let rendered = render("# language: xx\nFeature: F\n", 0);
        assert!(rendered.contains("unknown language \"xx\""), "{rendered}");
        assert!(rendered.contains("keyword tables the document is parsed with"), "{rendered}");
        assert!(!rendered.contains("en, "), "{rendered}");
    }

    #[test]
    fn test_line_offset_is_respected() {
        let error = parse_error("Feature: F\nGiven x\n", 10);
        assert_eq!(error.line(), 12);
        let rendered = error.render("test.feature", "Feature: F\nGiven x\n", 10);
        let rendered = String::from_utf8(strip_ansi_escapes::strip(rendered)).unwrap();
        assert!(rendered.contains("Given x"), "{rendered}");
    }
}
