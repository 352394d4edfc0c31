//! Lexical errors.

/// A line the lexer could not classify. Always fatal to the scan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: usize,
}

impl LexError {
    pub fn new(kind: LexErrorKind, line: usize) -> Self {
        Self { kind, line }
    }
}

/// What went wrong on the offending line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    /// Not a keyword line, table row, tag line, comment or text block.
    #[error("unexpected line {0:?}")]
    UnexpectedLine(String),
    /// End of input inside a text block; located at the opening delimiter.
    #[error("text block is never closed")]
    UnterminatedTextBlock,
    /// A backslash in a table cell followed by an unsupported character.
    #[error("invalid escape sequence '\\{0}' in table cell")]
    InvalidEscape(char),
    /// A backslash at the very end of a table row.
    #[error("dangling '\\' at end of table row")]
    DanglingEscape,
    /// Cell text after the last delimiter.
    #[error("table row must end with '{0}'")]
    UnterminatedRow(char),
    /// The language marker names a language with no keyword table.
    #[error("unknown language {0:?}")]
    UnknownLanguage(String),
}
