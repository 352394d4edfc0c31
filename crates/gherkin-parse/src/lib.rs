#![doc = include_str!("../README.md")]

pub use gherkin_lexer::{
    KeywordKind, KeywordTable, KeywordTables, LexError, LexErrorKind, Lexer, LexicalEvent,
};

mod construct;
pub use construct::{Construct, ConstructKind, Header, TextSegment};

mod diagnostic;

mod error;
pub use error::{GrammarError, ParseError};

mod listener;
pub use listener::Listener;

mod parser;
pub use parser::Parser;

#[cfg(test)]
#[ctor::ctor]
fn init_test_tracing() {
    gherkin_testhelpers::init_tracing();
}
