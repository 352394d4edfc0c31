//! Aggregation of parser constructs into formatter records.

use std::borrow::Cow;
use std::mem;

use gherkin_parse::{Construct, Header, Listener, TextSegment};
use tracing::{debug, warn};

use crate::formatter::Formatter;
use crate::record::{Element, Examples, Feature, Row, Step, TrailingBlock};

/// A [`Listener`] that buffers the constructs of each element and hands the
/// complete element to a [`Formatter`].
///
/// Comments and tags attach to the next element. Comments inside a table
/// attach to the next row. Tables and text blocks are flushed with the step
/// or examples block that owns them.
pub struct AggregatingListener<F> {
    formatter: F,
    uri: Option<String>,
    pending: Option<PendingElement>,
    buffer: PendingBuffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Feature,
    Background,
    Scenario,
    ScenarioOutline,
    Examples,
    Step,
}

/// The element whose constructs are still arriving.
struct PendingElement {
    kind: ElementKind,
    keyword: String,
    name: String,
    description: String,
    line: usize,
    comments: Vec<String>,
    tags: Vec<String>,
    block: Option<PendingBlock>,
}

enum PendingBlock {
    Table(Vec<Row>),
    Text { lines: Vec<String>, closed: bool },
}

impl PendingBlock {
    fn finish(self) -> TrailingBlock {
        match self {
            PendingBlock::Table(rows) => TrailingBlock::Table(rows),
            PendingBlock::Text { lines, .. } => TrailingBlock::TextBlock(lines.join("\n")),
        }
    }
}

/// Comments and tags seen since the last element opened.
#[derive(Default)]
struct PendingBuffer {
    comments: Vec<String>,
    tags: Vec<String>,
}

impl<F: Formatter> AggregatingListener<F> {
    /// Create a listener that flushes records to `formatter`.
    pub fn new(formatter: F) -> Self {
        Self {
            formatter,
            uri: None,
            pending: None,
            buffer: PendingBuffer::default(),
        }
    }

    /// Attach a document identifier to the feature record.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// The formatter, holding everything flushed so far.
    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    /// Give back the formatter. An element still open is dropped.
    pub fn into_inner(self) -> F {
        self.formatter
    }

    fn open(&mut self, kind: ElementKind, header: Header<'_>) {
        self.flush();
        let buffer = mem::take(&mut self.buffer);
        self.pending = Some(PendingElement {
            kind,
            keyword: header.keyword.to_string(),
            name: header.name.to_string(),
            description: header.description.into_owned(),
            line: header.line,
            comments: buffer.comments,
            tags: buffer.tags,
            block: None,
        });
    }

    fn flush(&mut self) {
        let Some(element) = self.pending.take() else {
            return;
        };
        debug!(kind = ?element.kind, line = element.line, "flush");

        let block = element.block.map(PendingBlock::finish);
        let PendingElement {
            kind,
            keyword,
            name,
            description,
            line,
            comments,
            tags,
            ..
        } = element;

        match kind {
            ElementKind::Feature => self.formatter.feature(Feature {
                comments,
                tags,
                keyword,
                name,
                description,
                line,
                uri: self.uri.clone(),
            }),
            ElementKind::Examples => self.formatter.examples(Examples {
                comments,
                tags,
                keyword,
                name,
                description,
                line,
                block,
            }),
            ElementKind::Step => self.formatter.step(Step {
                comments,
                tags,
                keyword,
                name,
                line,
                block,
            }),
            ElementKind::Background | ElementKind::Scenario | ElementKind::ScenarioOutline => {
                let element = Element {
                    comments,
                    tags,
                    keyword,
                    name,
                    description,
                    line,
                };
                match kind {
                    ElementKind::Background => self.formatter.background(element),
                    ElementKind::Scenario => self.formatter.scenario(element),
                    _ => self.formatter.scenario_outline(element),
                }
            }
        }
    }

    fn push_row(&mut self, cells: Vec<Cow<'_, str>>, line: usize) {
        let Some(element) = &mut self.pending else {
            warn!(line, "row without an open element, ignored");
            return;
        };
        if !matches!(element.kind, ElementKind::Step | ElementKind::Examples) {
            warn!(line, kind = ?element.kind, "row outside a step or examples block, ignored");
            return;
        }
        let rows = match element.block.get_or_insert_with(|| PendingBlock::Table(Vec::new())) {
            PendingBlock::Table(rows) => rows,
            PendingBlock::Text { .. } => {
                warn!(line, "row after a text block, ignored");
                return;
            }
        };
        rows.push(Row {
            line,
            comments: mem::take(&mut self.buffer.comments),
            cells: cells.into_iter().map(Cow::into_owned).collect(),
        });
    }

    fn push_text(&mut self, segment: TextSegment<'_>, line: usize) {
        let Some(element) = &mut self.pending else {
            warn!(line, "text block without an open element, ignored");
            return;
        };
        if element.kind != ElementKind::Step {
            warn!(line, kind = ?element.kind, "text block outside a step, ignored");
            return;
        }
        let block = &mut element.block;
        match segment {
            TextSegment::Open => {
                if block.is_some() {
                    warn!(line, "second trailing block, ignored");
                    return;
                }
                *block = Some(PendingBlock::Text {
                    lines: Vec::new(),
                    closed: false,
                });
            }
            TextSegment::Text(text) => match block {
                Some(PendingBlock::Text {
                    lines,
                    closed: false,
                }) => lines.push(text.into_owned()),
                _ => warn!(line, "text outside an open text block, ignored"),
            },
            TextSegment::Close => match block {
                Some(PendingBlock::Text { closed, .. }) if !*closed => *closed = true,
                _ => warn!(line, "close without an open text block, ignored"),
            },
        }
    }

    fn finish(&mut self) {
        self.flush();
        let PendingBuffer { comments, tags } = mem::take(&mut self.buffer);
        if !comments.is_empty() || !tags.is_empty() {
            debug!(
                comments = comments.len(),
                tags = tags.len(),
                "nothing left to attach to, discarded"
            );
        }
        self.formatter.eof();
    }
}

impl<'src, F: Formatter> Listener<'src> for AggregatingListener<F> {
    fn construct(&mut self, construct: Construct<'src>) {
        match construct {
            Construct::Tag { name, .. } => self.buffer.tags.push(name.to_string()),
            Construct::Comment { text, .. } => self.buffer.comments.push(text.to_string()),
            Construct::Feature(header) => self.open(ElementKind::Feature, header),
            Construct::Background(header) => self.open(ElementKind::Background, header),
            Construct::Scenario(header) => self.open(ElementKind::Scenario, header),
            Construct::ScenarioOutline(header) => self.open(ElementKind::ScenarioOutline, header),
            Construct::Examples(header) => self.open(ElementKind::Examples, header),
            Construct::Step {
                keyword,
                text,
                line,
            } => self.open(
                ElementKind::Step,
                Header {
                    keyword,
                    name: text,
                    description: Cow::Borrowed(""),
                    line,
                },
            ),
            Construct::Row { cells, line } => self.push_row(cells, line),
            Construct::TextBlockContent { segment, line } => self.push_text(segment, line),
            Construct::EndOfInput => self.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    fn listener() -> AggregatingListener<Vec<Record>> {
        AggregatingListener::new(Vec::new())
    }

    fn sexp(records: &[Record]) -> Vec<String> {
        records.iter().map(Record::to_string).collect()
    }

    #[test]
    fn test_tags_pass_to_feature() {
        let mut fl = listener();
        fl.tag("@hello", 1);
        fl.feature("Feature", "awesome", "description", 2);
        fl.eof();

        assert_eq!(
            sexp(&fl.into_inner()),
            vec![
                r#"(feature [] ["@hello"] "Feature" "awesome" "description" 2 nil)"#,
                "(eof)",
            ]
        );
    }

    #[test]
    fn test_comments_pass_to_feature() {
        let mut fl = listener();
        fl.comment("comment", 1);
        fl.feature("Feature", "awesome", "description", 2);
        fl.eof();

        assert_eq!(
            sexp(&fl.into_inner()),
            vec![
                r#"(feature ["comment"] [] "Feature" "awesome" "description" 2 nil)"#,
                "(eof)",
            ]
        );
    }

    #[test]
    fn test_comments_and_tags_pass_to_feature_and_scenario() {
        let mut fl = listener().with_uri("awesome.feature");
        fl.comment("one", 1);
        fl.tag("@two", 2);
        fl.feature("Feature", "three", "feature description", 3);
        fl.comment("four", 4);
        fl.tag("@five", 5);
        fl.scenario("Scenario", "six", "scenario description", 6);
        fl.eof();

        assert_eq!(
            sexp(&fl.into_inner()),
            vec![
                r#"(feature ["one"] ["@two"] "Feature" "three" "feature description" 3 "awesome.feature")"#,
                r#"(scenario ["four"] ["@five"] "Scenario" "six" "scenario description" 6)"#,
                "(eof)",
            ]
        );
    }

    #[test]
    fn test_step_table_replay() {
        let mut fl = listener();
        fl.step("Given", "foo", 10);
        fl.row(&["yo"], 11);
        fl.comment("Hello", 12);
        fl.comment("World", 13);
        fl.row(&["bro"], 14);
        fl.eof();

        assert_eq!(
            sexp(&fl.into_inner()),
            vec![
                r#"(step [] [] "Given" "foo" 10 (table (row 11 [] ["yo"]) (row 14 ["Hello" "World"] ["bro"])))"#,
                "(eof)",
            ]
        );
    }

    #[test]
    fn test_examples_own_their_table() {
        let mut fl = listener();
        fl.scenario_outline("Scenario Outline", "o", "", 1);
        fl.step("Given", "<x>", 2);
        fl.tag("@small", 3);
        fl.examples("Examples", "", "", 4);
        fl.row(&["x"], 5);
        fl.row(&["1"], 6);
        fl.eof();

        assert_eq!(
            sexp(&fl.into_inner()),
            vec![
                r#"(scenario_outline [] [] "Scenario Outline" "o" "" 1)"#,
                r#"(step [] [] "Given" "<x>" 2 nil)"#,
                r#"(examples [] ["@small"] "Examples" "" "" 4 (table (row 5 [] ["x"]) (row 6 [] ["1"])))"#,
                "(eof)",
            ]
        );
    }

    #[test]
    fn test_text_block_lines_are_joined() {
        let mut fl = listener();
        fl.step("Given", "a doc", 1);
        fl.text_block(TextSegment::Open, 2);
        fl.text_block(TextSegment::Text(Cow::Borrowed("one")), 3);
        fl.text_block(TextSegment::Text(Cow::Borrowed("")), 4);
        fl.text_block(TextSegment::Text(Cow::Borrowed("three")), 5);
        fl.text_block(TextSegment::Close, 6);
        fl.eof();

        let records = fl.into_inner();
        let Record::Step(step) = &records[0] else {
            panic!("expected a step, got {:?}", records[0]);
        };
        assert_eq!(
            step.block,
            Some(TrailingBlock::TextBlock("one\n\nthree".to_string()))
        );
    }

    #[test]
    fn test_empty_text_block_is_present() {
        let mut fl = listener();
        fl.step("Given", "nothing", 1);
        fl.text_block(TextSegment::Open, 2);
        fl.text_block(TextSegment::Close, 3);
        fl.step("Then", "no block", 4);
        fl.eof();

        assert_eq!(
            sexp(&fl.into_inner()),
            vec![
                r#"(step [] [] "Given" "nothing" 1 (text ""))"#,
                r#"(step [] [] "Then" "no block" 4 nil)"#,
                "(eof)",
            ]
        );
    }

    #[test]
    fn test_trailing_comments_are_discarded() {
        let mut fl = listener();
        fl.feature("Feature", "f", "", 1);
        fl.comment("bye", 2);
        fl.eof();

        assert_eq!(
            sexp(&fl.into_inner()),
            vec![r#"(feature [] [] "Feature" "f" "" 1 nil)"#, "(eof)"]
        );
    }

    #[test]
    fn test_misuse_is_ignored() {
        let mut fl = listener();
        fl.row(&["orphan"], 1);
        fl.text_block(TextSegment::Open, 2);
        fl.scenario("Scenario", "s", "", 3);
        fl.row(&["not a step"], 4);
        fl.step("Given", "x", 5);
        fl.row(&["a"], 6);
        fl.text_block(TextSegment::Open, 7);
        fl.text_block(TextSegment::Close, 8);
        fl.eof();

        assert_eq!(
            sexp(&fl.into_inner()),
            vec![
                r#"(scenario [] [] "Scenario" "s" "" 3)"#,
                r#"(step [] [] "Given" "x" 5 (table (row 6 [] ["a"])))"#,
                "(eof)",
            ]
        );
    }

    #[test]
    fn test_borrowed_formatter() {
        let mut records: Vec<Record> = Vec::new();
        let mut fl = AggregatingListener::new(&mut records);
        fl.feature("Feature", "f", "", 1);
        assert!(fl.formatter().is_empty());
        fl.eof();
        assert_eq!(fl.into_inner().len(), 2);
    }
}
