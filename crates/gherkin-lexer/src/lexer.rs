//! Line scanner for feature files.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::iter::{Enumerate, Peekable};
use std::str::Lines;

use tracing::trace;

use crate::{
    KeywordError, KeywordKind, KeywordTable, KeywordTables, LexError, LexErrorKind, LexicalEvent,
};

/// A lexer that classifies feature file lines into [`LexicalEvent`]s.
///
/// The lexer is an iterator of `Result`s. It yields [`LexicalEvent::EndOfInput`]
/// last, or stops after the first error.
#[derive(Clone)]
pub struct Lexer<'src, 'k> {
    /// Tables the language marker may switch to.
    tables: &'k KeywordTables,
    /// The active table.
    keywords: &'k KeywordTable,
    /// Keywords of the active table, longest first.
    matchers: Vec<(KeywordKind, &'k str)>,
    lines: Peekable<Enumerate<Lines<'src>>>,
    line_offset: usize,

    /// Set while inside a text block.
    text_block: Option<TextBlockState>,
    /// Tags after the first one on a tag line.
    queue: VecDeque<LexicalEvent<'src>>,
    done: bool,
}

/// State for tracking an open text block.
#[derive(Debug, Clone, Copy)]
struct TextBlockState {
    /// Indentation of the opening delimiter, in characters.
    indent: usize,
    /// Line of the opening delimiter.
    line: usize,
}

/// What a single physical line looks like, before any state is applied.
enum LineClass<'src> {
    Blank,
    Comment(&'src str),
    Tags(&'src str),
    TableRow(&'src str),
    TextBlockDelimiter {
        indent: usize,
    },
    Keyword {
        kind: KeywordKind,
        keyword: &'src str,
        name: &'src str,
    },
    Other,
}

impl<'src, 'k> Lexer<'src, 'k> {
    /// Create a lexer over `source` using `keywords` until a language marker
    /// selects another table from `tables`.
    ///
    /// Reported line numbers are 1-based, plus `line_offset`.
    pub fn new(
        source: &'src str,
        tables: &'k KeywordTables,
        keywords: &'k KeywordTable,
        line_offset: usize,
    ) -> Self {
        Self {
            tables,
            keywords,
            matchers: keywords.matchers(),
            lines: source.lines().enumerate().peekable(),
            line_offset,
            text_block: None,
            queue: VecDeque::new(),
            done: false,
        }
    }

    /// Create a lexer whose default table is `tables[language]`.
    pub fn for_language(
        source: &'src str,
        tables: &'k KeywordTables,
        language: &str,
        line_offset: usize,
    ) -> Result<Self, KeywordError> {
        let keywords = tables.get(language)?;
        Ok(Self::new(source, tables, keywords, line_offset))
    }

    /// The keyword table currently in effect.
    pub fn keywords(&self) -> &'k KeywordTable {
        self.keywords
    }

    fn line_number(&self, index: usize) -> usize {
        index + 1 + self.line_offset
    }

    /// Scan lines until one produces an event.
    fn next_event(&mut self) -> Result<LexicalEvent<'src>, LexError> {
        loop {
            let Some((index, text)) = self.lines.next() else {
                if let Some(block) = self.text_block.take() {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedTextBlock,
                        block.line,
                    ));
                }
                return Ok(LexicalEvent::EndOfInput);
            };
            let line = self.line_number(index);

            if let Some(block) = self.text_block {
                return Ok(self.text_block_line(block, text, line));
            }

            if index == 0
                && let Some(code) = self.language_marker(text)
            {
                self.switch_language(code, line)?;
                return Ok(LexicalEvent::LanguageMarker { code, line });
            }

            match self.classify(text) {
                LineClass::Blank => continue,
                LineClass::Comment(text) => return Ok(LexicalEvent::Comment { text, line }),
                LineClass::Tags(tags) => {
                    let mut tags = tags
                        .split_whitespace()
                        .map(|name| LexicalEvent::Tag { name, line });
                    if let Some(first) = tags.next() {
                        self.queue.extend(tags);
                        return Ok(first);
                    }
                }
                LineClass::TableRow(row) => {
                    let cells = split_row(row, self.keywords.syntax.table_cell, line)?;
                    return Ok(LexicalEvent::TableRow { cells, line });
                }
                LineClass::TextBlockDelimiter { indent } => {
                    self.text_block = Some(TextBlockState { indent, line });
                    return Ok(LexicalEvent::TextBlockDelimiter { line });
                }
                LineClass::Keyword {
                    kind,
                    keyword,
                    name,
                } => {
                    let description = if kind.is_header() {
                        self.description()
                    } else {
                        Cow::Borrowed("")
                    };
                    return Ok(LexicalEvent::Keyword {
                        kind,
                        keyword,
                        name,
                        description,
                        line,
                    });
                }
                LineClass::Other => {
                    return Err(LexError::new(
                        LexErrorKind::UnexpectedLine(text.trim().to_string()),
                        line,
                    ));
                }
            }
        }
    }

    /// Classify one line against the active table.
    fn classify(&self, text: &'src str) -> LineClass<'src> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return LineClass::Blank;
        }

        let syntax = &self.keywords.syntax;
        if let Some(comment) = trimmed.strip_prefix(syntax.comment.as_str()) {
            return LineClass::Comment(comment.trim());
        }
        if is_tag_line(trimmed, &syntax.tag) {
            return LineClass::Tags(trimmed);
        }
        if trimmed.starts_with(syntax.table_cell) {
            return LineClass::TableRow(trimmed);
        }
        if trimmed == syntax.text_block {
            return LineClass::TextBlockDelimiter {
                indent: text.chars().take_while(|c| c.is_whitespace()).count(),
            };
        }
        if let Some((kind, keyword, name)) = self.match_keyword(trimmed) {
            return LineClass::Keyword {
                kind,
                keyword,
                name,
            };
        }
        LineClass::Other
    }

    /// Match the longest keyword at the start of `trimmed`.
    ///
    /// Header keywords must be followed by `:`; step keywords by whitespace
    /// or the end of the line.
    fn match_keyword(&self, trimmed: &'src str) -> Option<(KeywordKind, &'src str, &'src str)> {
        for &(kind, keyword) in &self.matchers {
            let Some(rest) = trimmed.strip_prefix(keyword) else {
                continue;
            };
            let keyword = &trimmed[..keyword.len()];
            if kind.is_header() {
                if let Some(name) = rest.strip_prefix(':') {
                    return Some((kind, keyword, name.trim()));
                }
            } else if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return Some((kind, keyword, rest.trim()));
            }
        }
        None
    }

    /// `# language: fr` -> `fr`.
    fn language_marker(&self, text: &'src str) -> Option<&'src str> {
        let syntax = &self.keywords.syntax;
        let rest = text.trim().strip_prefix(syntax.comment.as_str())?;
        let rest = rest.trim_start().strip_prefix(syntax.language.as_str())?;
        let code = rest.trim_start().strip_prefix(':')?.trim();
        (!code.is_empty() && !code.contains(char::is_whitespace)).then_some(code)
    }

    fn switch_language(&mut self, code: &str, line: usize) -> Result<(), LexError> {
        let tables: &'k KeywordTables = self.tables;
        let keywords = tables
            .get(code)
            .map_err(|_| LexError::new(LexErrorKind::UnknownLanguage(code.to_string()), line))?;
        trace!(code, name = %keywords.name, "switching keyword table");
        self.keywords = keywords;
        self.matchers = keywords.matchers();
        Ok(())
    }

    /// Collect the free text under a header line.
    ///
    /// Stops at the first line that classifies as anything but plain text,
    /// leaving it unconsumed.
    fn description(&mut self) -> Cow<'src, str> {
        let mut lines: Vec<&'src str> = Vec::new();
        let mut blanks = 0;
        while let Some(&(_, text)) = self.lines.peek() {
            match self.classify(text) {
                LineClass::Blank => blanks += 1,
                LineClass::Other => {
                    if !lines.is_empty() {
                        lines.extend(std::iter::repeat_n("", blanks));
                    }
                    blanks = 0;
                    lines.push(text.trim());
                }
                _ => break,
            }
            self.lines.next();
        }
        match lines.as_slice() {
            [] => Cow::Borrowed(""),
            [line] => Cow::Borrowed(*line),
            _ => Cow::Owned(lines.join("\n")),
        }
    }

    /// Emit one line of an open text block, or close it.
    fn text_block_line(
        &mut self,
        block: TextBlockState,
        text: &'src str,
        line: usize,
    ) -> LexicalEvent<'src> {
        let keywords: &'k KeywordTable = self.keywords;
        let delimiter = keywords.syntax.text_block.as_str();
        if text.trim() == delimiter {
            self.text_block = None;
            return LexicalEvent::TextBlockDelimiter { line };
        }

        let content = strip_indent(text, block.indent);
        let escaped: String = delimiter.chars().flat_map(|c| ['\\', c]).collect();
        let text = if content.contains(escaped.as_str()) {
            Cow::Owned(content.replace(escaped.as_str(), delimiter))
        } else {
            Cow::Borrowed(content)
        };
        LexicalEvent::TextBlockLine { text, line }
    }
}

impl<'src> Iterator for Lexer<'src, '_> {
    type Item = Result<LexicalEvent<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.queue.pop_front() {
            trace!(?event, "lexed");
            return Some(Ok(event));
        }
        if self.done {
            return None;
        }

        let result = self.next_event();
        if matches!(result, Ok(LexicalEvent::EndOfInput) | Err(_)) {
            self.done = true;
        }
        trace!(?result, "lexed");
        Some(result)
    }
}

fn is_tag_line(trimmed: &str, marker: &str) -> bool {
    !marker.is_empty()
        && trimmed
            .split_whitespace()
            .all(|token| token.len() > marker.len() && token.starts_with(marker))
}

/// Remove up to `indent` leading whitespace characters.
fn strip_indent(text: &str, indent: usize) -> &str {
    let mut end = 0;
    for (i, c) in text.char_indices().take(indent) {
        if !c.is_whitespace() {
            break;
        }
        end = i + c.len_utf8();
    }
    &text[end..]
}

/// Split `| a | b |` into trimmed, unescaped cells.
///
/// Raw cells are trimmed before unescaping.
fn split_row<'src>(
    row: &'src str,
    delimiter: char,
    line: usize,
) -> Result<Vec<Cow<'src, str>>, LexError> {
    let error = |kind| LexError::new(kind, line);
    let body = &row[delimiter.len_utf8()..];

    let mut cells = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some((_, d)) if d == delimiter || d == '\\' || d == 'n' => escaped = true,
                Some((_, other)) => return Err(error(LexErrorKind::InvalidEscape(other))),
                None => return Err(error(LexErrorKind::DanglingEscape)),
            }
        } else if c == delimiter {
            let raw = body[start..i].trim();
            cells.push(if escaped {
                Cow::Owned(unescape_cell(raw))
            } else {
                Cow::Borrowed(raw)
            });
            escaped = false;
            start = i + c.len_utf8();
        }
    }

    if !body[start..].trim().is_empty() {
        return Err(error(LexErrorKind::UnterminatedRow(delimiter)));
    }
    Ok(cells)
}

/// Resolve the escapes of a cell `split_row` has already validated.
fn unescape_cell(raw: &str) -> String {
    let mut cell = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            cell.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => cell.push('\n'),
            Some(escaped) => cell.push(escaped),
            None => {}
        }
    }
    cell
}
