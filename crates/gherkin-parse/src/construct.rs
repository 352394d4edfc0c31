//! Constructs raised by the parser, one per lexical event.

use std::borrow::Cow;
use std::fmt;

/// A recognized grammatical element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construct<'src> {
    /// A tag token, including its marker.
    Tag { name: &'src str, line: usize },
    /// A comment, marker removed.
    Comment { text: &'src str, line: usize },
    Feature(Header<'src>),
    Background(Header<'src>),
    Scenario(Header<'src>),
    ScenarioOutline(Header<'src>),
    Examples(Header<'src>),
    /// A step; `keyword` is kept verbatim (`Given`, `And`, `*`, ...).
    Step {
        keyword: &'src str,
        text: &'src str,
        line: usize,
    },
    /// One row of the table trailing a step or examples block.
    Row {
        cells: Vec<Cow<'src, str>>,
        line: usize,
    },
    /// Part of the text block trailing a step.
    TextBlockContent {
        segment: TextSegment<'src>,
        line: usize,
    },
    EndOfInput,
}

impl Construct<'_> {
    /// The fieldless kind of this construct.
    pub fn kind(&self) -> ConstructKind {
        match self {
            Construct::Tag { .. } => ConstructKind::Tag,
            Construct::Comment { .. } => ConstructKind::Comment,
            Construct::Feature(_) => ConstructKind::Feature,
            Construct::Background(_) => ConstructKind::Background,
            Construct::Scenario(_) => ConstructKind::Scenario,
            Construct::ScenarioOutline(_) => ConstructKind::ScenarioOutline,
            Construct::Examples(_) => ConstructKind::Examples,
            Construct::Step { .. } => ConstructKind::Step,
            Construct::Row { .. } => ConstructKind::Row,
            Construct::TextBlockContent { .. } => ConstructKind::TextBlock,
            Construct::EndOfInput => ConstructKind::EndOfInput,
        }
    }
}

/// Keyword, name and description of a header line such as `Scenario: ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<'src> {
    pub keyword: &'src str,
    pub name: &'src str,
    pub description: Cow<'src, str>,
    pub line: usize,
}

/// One piece of a text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment<'src> {
    /// The opening delimiter.
    Open,
    /// One content line.
    Text(Cow<'src, str>),
    /// The closing delimiter.
    Close,
}

/// The kind of a [`Construct`], used to describe grammar errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructKind {
    Tag,
    Comment,
    Feature,
    Background,
    Scenario,
    ScenarioOutline,
    Examples,
    Step,
    Row,
    TextBlock,
    EndOfInput,
}

impl ConstructKind {
    /// Whether tags may precede this construct.
    pub fn is_taggable(&self) -> bool {
        matches!(
            self,
            ConstructKind::Feature
                | ConstructKind::Scenario
                | ConstructKind::ScenarioOutline
                | ConstructKind::Examples
        )
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstructKind::Tag => "tag",
            ConstructKind::Comment => "comment",
            ConstructKind::Feature => "Feature",
            ConstructKind::Background => "Background",
            ConstructKind::Scenario => "Scenario",
            ConstructKind::ScenarioOutline => "Scenario Outline",
            ConstructKind::Examples => "Examples",
            ConstructKind::Step => "Step",
            ConstructKind::Row => "table row",
            ConstructKind::TextBlock => "text block",
            ConstructKind::EndOfInput => "end of input",
        })
    }
}
