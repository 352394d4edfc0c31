//! Records handed to a [`Formatter`](crate::Formatter).

use std::fmt;

use serde::Serialize;

/// A flushed feature header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub comments: Vec<String>,
    pub tags: Vec<String>,
    pub keyword: String,
    pub name: String,
    pub description: String,
    pub line: usize,
    /// Identifier of the document, when the caller supplied one.
    pub uri: Option<String>,
}

/// A flushed background, scenario or scenario outline header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub comments: Vec<String>,
    pub tags: Vec<String>,
    pub keyword: String,
    pub name: String,
    pub description: String,
    pub line: usize,
}

/// A flushed examples block with its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Examples {
    pub comments: Vec<String>,
    pub tags: Vec<String>,
    pub keyword: String,
    pub name: String,
    pub description: String,
    pub line: usize,
    pub block: Option<TrailingBlock>,
}

/// A flushed step with its trailing block, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct Step {
    pub comments: Vec<String>,
    pub tags: Vec<String>,
    /// Verbatim keyword: `Given`, `And`, `*`, ...
    pub keyword: String,
    pub name: String,
    pub line: usize,
    pub block: Option<TrailingBlock>,
}

/// One table row. Comments are those directly above the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub line: usize,
    pub comments: Vec<String>,
    pub cells: Vec<String>,
}

/// The table or text block that follows a step or examples header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum TrailingBlock {
    Table(Vec<Row>),
    /// Content lines joined with `\n`.
    TextBlock(String),
}

/// One formatter call, as captured by the `Vec<Record>` formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Record {
    Feature(Feature),
    Background(Element),
    Scenario(Element),
    ScenarioOutline(Element),
    Examples(Examples),
    Step(Step),
    Eof,
}

struct List<'a>(&'a [String]);

impl fmt::Display for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item:?}")?;
        }
        f.write_str("]")
    }
}

struct Block<'a>(&'a Option<TrailingBlock>);

impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("nil"),
            Some(TrailingBlock::TextBlock(text)) => write!(f, "(text {text:?})"),
            Some(TrailingBlock::Table(rows)) => {
                f.write_str("(table")?;
                for row in rows {
                    write!(
                        f,
                        " (row {} {} {})",
                        row.line,
                        List(&row.comments),
                        List(&row.cells)
                    )?;
                }
                f.write_str(")")
            }
        }
    }
}

struct Fields<'a>(&'a Element);

impl fmt::Display for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = self.0;
        write!(
            f,
            "{} {} {:?} {:?} {:?} {}",
            List(&element.comments),
            List(&element.tags),
            element.keyword,
            element.name,
            element.description,
            element.line
        )
    }
}

/// A one-line s-expression, e.g. `(step [] [] "Given" "x" 3 nil)`.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Feature(feature) => {
                write!(
                    f,
                    "(feature {} {} {:?} {:?} {:?} {} ",
                    List(&feature.comments),
                    List(&feature.tags),
                    feature.keyword,
                    feature.name,
                    feature.description,
                    feature.line
                )?;
                match &feature.uri {
                    Some(uri) => write!(f, "{uri:?})"),
                    None => f.write_str("nil)"),
                }
            }
            Record::Background(element) => write!(f, "(background {})", Fields(element)),
            Record::Scenario(element) => write!(f, "(scenario {})", Fields(element)),
            Record::ScenarioOutline(element) => {
                write!(f, "(scenario_outline {})", Fields(element))
            }
            Record::Examples(examples) => write!(
                f,
                "(examples {} {} {:?} {:?} {:?} {} {})",
                List(&examples.comments),
                List(&examples.tags),
                examples.keyword,
                examples.name,
                examples.description,
                examples.line,
                Block(&examples.block)
            ),
            Record::Step(step) => write!(
                f,
                "(step {} {} {:?} {:?} {} {})",
                List(&step.comments),
                List(&step.tags),
                step.keyword,
                step.name,
                step.line,
                Block(&step.block)
            ),
            Record::Eof => f.write_str("(eof)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: usize, comments: &[&str], cells: &[&str]) -> Row {
        Row {
            line,
            comments: comments.iter().map(|c| c.to_string()).collect(),
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_row_serializes_in_field_order() {
        let json = serde_json::to_string(&row(11, &[], &["yo"])).unwrap();
        assert_eq!(json, r#"{"line":11,"comments":[],"cells":["yo"]}"#);
    }

    #[test]
    fn test_trailing_block_serializes_untagged() {
        let table = TrailingBlock::Table(vec![row(14, &["Hello"], &["bro"])]);
        assert_eq!(
            serde_json::to_value(&table).unwrap(),
            serde_json::json!([{"line": 14, "comments": ["Hello"], "cells": ["bro"]}])
        );
        let text = TrailingBlock::TextBlock("a\nb".to_string());
        assert_eq!(serde_json::to_value(&text).unwrap(), serde_json::json!("a\nb"));
    }

    #[test]
    fn test_record_display() {
        let step = Record::Step(Step {
            comments: vec![],
            tags: vec![],
            keyword: "Given".to_string(),
            name: "foo".to_string(),
            line: 10,
            block: Some(TrailingBlock::Table(vec![
                row(11, &[], &["yo"]),
                row(14, &["Hello", "World"], &["bro"]),
            ])),
        });
        assert_eq!(
            step.to_string(),
            r#"(step [] [] "Given" "foo" 10 (table (row 11 [] ["yo"]) (row 14 ["Hello" "World"] ["bro"])))"#
        );

        let feature = Record::Feature(Feature {
            comments: vec!["one".to_string()],
            tags: vec!["@two".to_string()],
            keyword: "Feature".to_string(),
            name: "three".to_string(),
            description: "a\nb".to_string(),
            line: 3,
            uri: None,
        });
        assert_eq!(
            feature.to_string(),
            r#"(feature ["one"] ["@two"] "Feature" "three" "a\nb" 3 nil)"#
        );
        assert_eq!(Record::Eof.to_string(), "(eof)");
    }
}
