//! Grammar-enforcing parser over lexical events.

use gherkin_lexer::{KeywordKind, LexError, LexicalEvent};
use tracing::{debug, trace};

use crate::{Construct, ConstructKind, GrammarError, Header, Listener, ParseError, TextSegment};

/// Sequences lexical events into a legal document and raises one
/// [`Construct`] per event to a [`Listener`].
///
/// Usually driven by a [`Lexer`](gherkin_lexer::Lexer), but any iterator of
/// lexical events works.
pub struct Parser<I> {
    events: I,
    scope: Scope,
    /// Line of the first tag not yet claimed by a taggable construct.
    pending_tag: Option<usize>,
}

/// The innermost open construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Nothing seen yet.
    Start,
    /// Feature header seen, no background or scenario yet.
    Feature,
    Background,
    Scenario,
    ScenarioOutline,
    Examples,
    Step { owner: Owner, block: Block },
}

/// The construct whose steps are being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Background,
    Scenario,
    ScenarioOutline,
}

/// The trailing block of the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Table,
    OpenText,
    ClosedText,
}

impl Owner {
    fn scope(self) -> Scope {
        match self {
            Owner::Background => Scope::Background,
            Owner::Scenario => Scope::Scenario,
            Owner::ScenarioOutline => Scope::ScenarioOutline,
        }
    }
}

impl Scope {
    /// Constructs that may come next, tags and comments aside.
    fn legal(self) -> Vec<ConstructKind> {
        use ConstructKind as K;
        match self {
            Scope::Start => vec![K::Feature],
            Scope::Feature => vec![K::Background, K::Scenario, K::ScenarioOutline],
            Scope::Background | Scope::Scenario => {
                vec![K::Step, K::Scenario, K::ScenarioOutline]
            }
            Scope::ScenarioOutline => {
                vec![K::Step, K::Examples, K::Scenario, K::ScenarioOutline]
            }
            Scope::Examples => vec![K::Row, K::Examples, K::Scenario, K::ScenarioOutline],
            Scope::Step { owner, block } => {
                let mut legal = match block {
                    Block::OpenText => return vec![K::TextBlock],
                    Block::None => vec![K::Row, K::TextBlock],
                    Block::Table => vec![K::Row],
                    Block::ClosedText => vec![],
                };
                legal.extend(owner.scope().legal());
                legal
            }
        }
    }

    /// The owner new steps would belong to.
    fn step_owner(self) -> Option<Owner> {
        match self {
            Scope::Background => Some(Owner::Background),
            Scope::Scenario => Some(Owner::Scenario),
            Scope::ScenarioOutline => Some(Owner::ScenarioOutline),
            Scope::Step { owner, .. } => Some(owner),
            _ => None,
        }
    }
}

impl<'src, I> Parser<I>
where
    I: Iterator<Item = Result<LexicalEvent<'src>, LexError>>,
{
    /// Create a parser over a stream of lexical events.
    pub fn new(events: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            events: events.into_iter(),
            scope: Scope::Start,
            pending_tag: None,
        }
    }

    /// Parse the whole stream, raising constructs to `listener`.
    ///
    /// Stops at the first lexical or grammar error; constructs raised before
    /// it have already reached the listener.
    pub fn parse<L: Listener<'src> + ?Sized>(mut self, listener: &mut L) -> Result<(), ParseError> {
        while let Some(event) = self.events.next() {
            let at_end = matches!(event, Ok(LexicalEvent::EndOfInput));
            if let Some(construct) = self.accept(event?)? {
                debug!(kind = ?construct.kind(), "construct");
                listener.construct(construct);
            }
            if at_end {
                break;
            }
        }
        Ok(())
    }

    /// Convenience: parse and collect all constructs.
    pub fn parse_to_vec(self) -> Result<Vec<Construct<'src>>, ParseError> {
        let mut constructs = Vec::new();
        self.parse(&mut constructs)?;
        Ok(constructs)
    }

    /// Advance the state machine by one event.
    fn accept(&mut self, event: LexicalEvent<'src>) -> Result<Option<Construct<'src>>, GrammarError> {
        let construct = match event {
            LexicalEvent::LanguageMarker { code, line } => {
                trace!(code, line, "language marker");
                return Ok(None);
            }
            LexicalEvent::Comment { text, line } => Construct::Comment { text, line },
            LexicalEvent::Tag { name, line } => {
                self.pending_tag.get_or_insert(line);
                Construct::Tag { name, line }
            }
            LexicalEvent::Keyword {
                kind,
                keyword,
                name,
                description,
                line,
            } => {
                let header = Header {
                    keyword,
                    name,
                    description,
                    line,
                };
                match kind {
                    KeywordKind::Feature => {
                        self.enter(ConstructKind::Feature, line, Scope::Feature)?;
                        Construct::Feature(header)
                    }
                    KeywordKind::Background => {
                        self.enter(ConstructKind::Background, line, Scope::Background)?;
                        Construct::Background(header)
                    }
                    KeywordKind::Scenario => {
                        self.enter(ConstructKind::Scenario, line, Scope::Scenario)?;
                        Construct::Scenario(header)
                    }
                    KeywordKind::ScenarioOutline => {
                        self.enter(
                            ConstructKind::ScenarioOutline,
                            line,
                            Scope::ScenarioOutline,
                        )?;
                        Construct::ScenarioOutline(header)
                    }
                    KeywordKind::Examples => {
                        self.enter(ConstructKind::Examples, line, Scope::Examples)?;
                        Construct::Examples(header)
                    }
                    KeywordKind::Step => {
                        self.check(ConstructKind::Step, line)?;
                        if let Some(owner) = self.scope.step_owner() {
                            self.scope = Scope::Step {
                                owner,
                                block: Block::None,
                            };
                        }
                        Construct::Step {
                            keyword,
                            text: name,
                            line,
                        }
                    }
                }
            }
            LexicalEvent::TableRow { cells, line } => {
                self.check(ConstructKind::Row, line)?;
                if let Scope::Step { block, .. } = &mut self.scope {
                    *block = Block::Table;
                }
                Construct::Row { cells, line }
            }
            LexicalEvent::TextBlockDelimiter { line } => {
                self.check(ConstructKind::TextBlock, line)?;
                let mut segment = TextSegment::Open;
                if let Scope::Step { block, .. } = &mut self.scope {
                    if *block == Block::OpenText {
                        *block = Block::ClosedText;
                        segment = TextSegment::Close;
                    } else {
                        *block = Block::OpenText;
                    }
                }
                Construct::TextBlockContent { segment, line }
            }
            LexicalEvent::TextBlockLine { text, line } => {
                self.check(ConstructKind::TextBlock, line)?;
                Construct::TextBlockContent {
                    segment: TextSegment::Text(text),
                    line,
                }
            }
            LexicalEvent::EndOfInput => {
                if let Some(line) = self.pending_tag {
                    return Err(self.error(ConstructKind::EndOfInput, line));
                }
                Construct::EndOfInput
            }
        };
        Ok(Some(construct))
    }

    /// Check `found` is legal, then make `scope` the current scope.
    fn enter(&mut self, found: ConstructKind, line: usize, scope: Scope) -> Result<(), GrammarError> {
        self.check(found, line)?;
        self.scope = scope;
        Ok(())
    }

    fn check(&mut self, found: ConstructKind, line: usize) -> Result<(), GrammarError> {
        let legal = self.scope.legal();
        let tagged = self.pending_tag.is_some();
        if legal.contains(&found) && (!tagged || found.is_taggable()) {
            self.pending_tag = None;
            return Ok(());
        }
        Err(self.error(found, line))
    }

    fn error(&self, found: ConstructKind, line: usize) -> GrammarError {
        let mut expected = self.scope.legal();
        if self.pending_tag.is_some() {
            expected.retain(ConstructKind::is_taggable);
        }
        GrammarError {
            line,
            found,
            expected,
        }
    }
}
