//! Per-language keyword tables.
//!
//! A [`KeywordTable`] lists the words that introduce each construct in one
//! natural language. Tables are plain data; the [`Lexer`](crate::Lexer) is
//! the only thing that interprets them.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Deserialize;

/// Which construct a keyword introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    /// `Feature:`
    Feature,
    /// `Background:`
    Background,
    /// `Scenario:`
    Scenario,
    /// `Scenario Outline:`
    ScenarioOutline,
    /// `Examples:`
    Examples,
    /// Any step keyword: `Given`, `When`, `Then`, `And`, `But`, `*`.
    Step,
}

impl KeywordKind {
    /// Header keywords are followed by `:` and may carry a description.
    pub fn is_header(&self) -> bool {
        !matches!(self, KeywordKind::Step)
    }
}

/// Markers shared by every construct of a language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Syntax {
    /// Line comment marker.
    pub comment: String,
    /// Prefix of each tag token.
    pub tag: String,
    /// Table cell delimiter.
    pub table_cell: char,
    /// Line that opens and closes a text block.
    pub text_block: String,
    /// Word in `# language: fr` that names the language marker.
    pub language: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            comment: "#".to_string(),
            tag: "@".to_string(),
            table_cell: '|',
            text_block: "\"\"\"".to_string(),
            language: "language".to_string(),
        }
    }
}

/// The keyword vocabulary of one language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordTable {
    /// English name of the language.
    pub name: String,
    /// Name of the language in that language.
    pub native: String,
    pub feature: Vec<String>,
    pub background: Vec<String>,
    pub scenario: Vec<String>,
    pub scenario_outline: Vec<String>,
    pub examples: Vec<String>,
    pub given: Vec<String>,
    pub when: Vec<String>,
    pub then: Vec<String>,
    pub and: Vec<String>,
    pub but: Vec<String>,
    #[serde(default)]
    pub syntax: Syntax,
}

impl KeywordTable {
    /// Keywords introducing `kind`. Step keywords may repeat across kinds.
    pub fn keywords(&self, kind: KeywordKind) -> Vec<&str> {
        match kind {
            KeywordKind::Feature => as_strs(&self.feature),
            KeywordKind::Background => as_strs(&self.background),
            KeywordKind::Scenario => as_strs(&self.scenario),
            KeywordKind::ScenarioOutline => as_strs(&self.scenario_outline),
            KeywordKind::Examples => as_strs(&self.examples),
            KeywordKind::Step => self.step_keywords(),
        }
    }

    /// Every distinct step keyword, in table order.
    pub fn step_keywords(&self) -> Vec<&str> {
        let mut keywords: Vec<&str> = Vec::new();
        for keyword in [&self.given, &self.when, &self.then, &self.and, &self.but]
            .into_iter()
            .flatten()
        {
            if !keywords.contains(&keyword.as_str()) {
                keywords.push(keyword);
            }
        }
        keywords
    }

    /// All keywords paired with their kind, longest first.
    ///
    /// Longest-first order makes `Scenario Outline` win over `Scenario`.
    pub fn matchers(&self) -> Vec<(KeywordKind, &str)> {
        let mut matchers: Vec<(KeywordKind, &str)> = [
            KeywordKind::Feature,
            KeywordKind::Background,
            KeywordKind::Scenario,
            KeywordKind::ScenarioOutline,
            KeywordKind::Examples,
            KeywordKind::Step,
        ]
        .into_iter()
        .flat_map(|kind| self.keywords(kind).into_iter().map(move |kw| (kind, kw)))
        .filter(|(_, kw)| !kw.is_empty())
        .collect();
        matchers.sort_by_key(|(_, kw)| std::cmp::Reverse(kw.len()));
        matchers
    }

    /// Strip surrounding whitespace from every keyword.
    fn trim_keywords(&mut self) {
        for keywords in [
            &mut self.feature,
            &mut self.background,
            &mut self.scenario,
            &mut self.scenario_outline,
            &mut self.examples,
            &mut self.given,
            &mut self.when,
            &mut self.then,
            &mut self.and,
            &mut self.but,
        ] {
            for keyword in keywords.iter_mut() {
                let trimmed = keyword.trim();
                if trimmed.len() != keyword.len() {
                    *keyword = trimmed.to_string();
                }
            }
        }
    }
}

fn as_strs(keywords: &[String]) -> Vec<&str> {
    keywords.iter().map(String::as_str).collect()
}

/// Error loading or selecting keyword tables.
#[derive(Debug, thiserror::Error)]
pub enum KeywordError {
    #[error("invalid keyword tables: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no keyword table for language {0:?}")]
    UnknownLanguage(String),
}

/// Keyword tables keyed by language code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct KeywordTables {
    tables: BTreeMap<String, KeywordTable>,
}

static BUILTIN: LazyLock<KeywordTables> = LazyLock::new(|| {
    KeywordTables::from_json(include_str!("i18n.json"))
        .expect("embedded i18n.json must be valid")
});

impl KeywordTables {
    /// The tables shipped with this crate.
    pub fn builtin() -> &'static KeywordTables {
        &BUILTIN
    }

    /// Load tables from JSON shaped like the embedded `i18n.json`.
    ///
    /// Keywords are trimmed, so `"Given "` and `"Given"` are equivalent.
    pub fn from_json(json: &str) -> Result<Self, KeywordError> {
        let mut tables: Self = serde_json::from_str(json)?;
        for table in tables.tables.values_mut() {
            table.trim_keywords();
        }
        Ok(tables)
    }

    /// Look up the table for a language code.
    pub fn get(&self, code: &str) -> Result<&KeywordTable, KeywordError> {
        self.tables
            .get(code)
            .ok_or_else(|| KeywordError::UnknownLanguage(code.to_string()))
    }

    /// Known language codes, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Add or replace the table for `code`.
    pub fn insert(&mut self, code: impl Into<String>, mut table: KeywordTable) {
        table.trim_keywords();
        self.tables.insert(code.into(), table);
    }
}
