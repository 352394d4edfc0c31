//! The interface the parser drives.

use std::borrow::Cow;

use crate::{Construct, Header, TextSegment};

/// Receives constructs from the [`Parser`](crate::Parser), in source order.
///
/// Implementors handle [`construct`](Listener::construct); the per-construct
/// methods build the matching variant and forward it, which is convenient
/// when driving a listener by hand.
pub trait Listener<'src> {
    /// Handle one construct.
    fn construct(&mut self, construct: Construct<'src>);

    /// A tag token such as `@wip`.
    fn tag(&mut self, name: &'src str, line: usize) {
        self.construct(Construct::Tag { name, line });
    }

    /// A comment, marker removed.
    fn comment(&mut self, text: &'src str, line: usize) {
        self.construct(Construct::Comment { text, line });
    }

    /// A `Feature:` header.
    fn feature(&mut self, keyword: &'src str, name: &'src str, description: &'src str, line: usize) {
        self.construct(Construct::Feature(header(keyword, name, description, line)));
    }

    /// A `Background:` header.
    fn background(
        &mut self,
        keyword: &'src str,
        name: &'src str,
        description: &'src str,
        line: usize,
    ) {
        self.construct(Construct::Background(header(keyword, name, description, line)));
    }

    /// A `Scenario:` header.
    fn scenario(&mut self, keyword: &'src str, name: &'src str, description: &'src str, line: usize) {
        self.construct(Construct::Scenario(header(keyword, name, description, line)));
    }

    /// A `Scenario Outline:` header.
    fn scenario_outline(
        &mut self,
        keyword: &'src str,
        name: &'src str,
        description: &'src str,
        line: usize,
    ) {
        self.construct(Construct::ScenarioOutline(header(
            keyword,
            name,
            description,
            line,
        )));
    }

    /// An `Examples:` header.
    fn examples(&mut self, keyword: &'src str, name: &'src str, description: &'src str, line: usize) {
        self.construct(Construct::Examples(header(keyword, name, description, line)));
    }

    /// A step line; `keyword` is verbatim.
    fn step(&mut self, keyword: &'src str, text: &'src str, line: usize) {
        self.construct(Construct::Step {
            keyword,
            text,
            line,
        });
    }

    /// One table row of unescaped cells.
    fn row(&mut self, cells: &[&'src str], line: usize) {
        self.construct(Construct::Row {
            cells: cells.iter().map(|cell| Cow::Borrowed(*cell)).collect(),
            line,
        });
    }

    /// One segment of a text block.
    fn text_block(&mut self, segment: TextSegment<'src>, line: usize) {
        self.construct(Construct::TextBlockContent { segment, line });
    }

    /// The end of the document.
    fn eof(&mut self) {
        self.construct(Construct::EndOfInput);
    }
}

fn header<'src>(
    keyword: &'src str,
    name: &'src str,
    description: &'src str,
    line: usize,
) -> Header<'src> {
    Header {
        keyword,
        name,
        description: Cow::Borrowed(description),
        line,
    }
}

/// Records every construct.
impl<'src> Listener<'src> for Vec<Construct<'src>> {
    fn construct(&mut self, construct: Construct<'src>) {
        self.push(construct);
    }
}

impl<'src, L: Listener<'src> + ?Sized> Listener<'src> for &mut L {
    fn construct(&mut self, construct: Construct<'src>) {
        (**self).construct(construct);
    }
}
