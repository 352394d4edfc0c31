//! Lexical events produced by the [`Lexer`](crate::Lexer).

use std::borrow::Cow;

use crate::KeywordKind;

/// One classified line (or, for tag lines, one tag token).
///
/// Line numbers are 1-based and include the lexer's line offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalEvent<'src> {
    /// A comment line, marker removed and trimmed.
    Comment { text: &'src str, line: usize },
    /// One tag token, including its marker (`@wip`).
    Tag { name: &'src str, line: usize },
    /// A line introduced by a construct keyword.
    Keyword {
        kind: KeywordKind,
        /// The keyword as written, without the trailing `:`.
        keyword: &'src str,
        /// Trimmed text after the keyword.
        name: &'src str,
        /// Free text under a header line. Always empty for steps.
        description: Cow<'src, str>,
        line: usize,
    },
    /// A table row; cells are trimmed and unescaped.
    TableRow {
        cells: Vec<Cow<'src, str>>,
        line: usize,
    },
    /// The line opening or closing a text block.
    TextBlockDelimiter { line: usize },
    /// One line inside a text block, relative to the opening delimiter's
    /// indentation.
    TextBlockLine { text: Cow<'src, str>, line: usize },
    /// `# language: xx` on the first line.
    LanguageMarker { code: &'src str, line: usize },
    /// End of input. Always the last event.
    EndOfInput,
}

impl LexicalEvent<'_> {
    /// The line this event came from, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            LexicalEvent::Comment { line, .. }
            | LexicalEvent::Tag { line, .. }
            | LexicalEvent::Keyword { line, .. }
            | LexicalEvent::TableRow { line, .. }
            | LexicalEvent::TextBlockDelimiter { line }
            | LexicalEvent::TextBlockLine { line, .. }
            | LexicalEvent::LanguageMarker { line, .. } => Some(*line),
            LexicalEvent::EndOfInput => None,
        }
    }
}
