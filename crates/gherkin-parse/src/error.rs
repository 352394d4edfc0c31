//! Grammar and parse errors.

use std::fmt::Write as _;

use gherkin_lexer::LexError;

use crate::ConstructKind;

/// A construct that is not legal where it appears.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: unexpected {found}, expected {}", expected_list(.expected))]
pub struct GrammarError {
    pub line: usize,
    /// The offending construct.
    pub found: ConstructKind,
    /// Constructs that would have been legal. Tags and comments are always
    /// legal and never listed.
    pub expected: Vec<ConstructKind>,
}

/// Why a document could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl ParseError {
    /// The line the error is reported at.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.line,
            ParseError::Grammar(e) => e.line,
        }
    }
}

/// `Feature`, `Step or Examples`, `Row, Step or Examples`.
pub(crate) fn expected_list(expected: &[ConstructKind]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let mut out = String::new();
            for (i, kind) in init.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{kind}");
            }
            let _ = write!(out, " or {last}");
            out
        }
    }
}
