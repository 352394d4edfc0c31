//! Options for parsing a document into records.

use gherkin_lexer::{KeywordError, KeywordTable, KeywordTables, Lexer};

/// Where keywords come from and how the document is identified.
#[derive(Debug, Clone)]
pub struct ParseOptions<'k> {
    tables: &'k KeywordTables,
    language: String,
    keywords: &'k KeywordTable,
    uri: Option<String>,
    line_offset: usize,
}

impl Default for ParseOptions<'static> {
    fn default() -> Self {
        let tables = KeywordTables::builtin();
        Self {
            tables,
            language: "en".to_string(),
            keywords: tables.get("en").expect("built-in tables include English"),
            uri: None,
            line_offset: 0,
        }
    }
}

impl ParseOptions<'static> {
    /// Create new default options: built-in tables, English, no uri.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'k> ParseOptions<'k> {
    /// Select the default language, used unless the document starts with a
    /// language marker.
    pub fn language(mut self, code: &str) -> Result<Self, KeywordError> {
        self.keywords = self.tables.get(code)?;
        self.language = code.to_string();
        Ok(self)
    }

    /// Use other keyword tables. The current language must exist in them.
    pub fn keywords<'j>(self, tables: &'j KeywordTables) -> Result<ParseOptions<'j>, KeywordError> {
        let keywords = tables.get(&self.language)?;
        Ok(ParseOptions {
            tables,
            language: self.language,
            keywords,
            uri: self.uri,
            line_offset: self.line_offset,
        })
    }

    /// Identify the document; the feature record carries it.
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Number reported lines from `offset + 1`.
    pub fn line_offset(mut self, offset: usize) -> Self {
        self.line_offset = offset;
        self
    }

    /// The default language code.
    pub fn language_code(&self) -> &str {
        &self.language
    }

    pub(crate) fn document_uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub(crate) fn lexer<'src>(&self, source: &'src str) -> Lexer<'src, 'k> {
        Lexer::new(source, self.tables, self.keywords, self.line_offset)
    }
}
