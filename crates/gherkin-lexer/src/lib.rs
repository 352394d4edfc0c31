#![doc = include_str!("../README.md")]

mod error;
pub use error::{LexError, LexErrorKind};

mod event;
pub use event::LexicalEvent;

mod keywords;
pub use keywords::{KeywordError, KeywordKind, KeywordTable, KeywordTables, Syntax};

mod lexer;
pub use lexer::Lexer;

#[cfg(test)]
#[ctor::ctor]
fn init_test_tracing() {
    gherkin_testhelpers::init_tracing();
}
