//! Declarative grammar table loaded from JSON.
//!
//! The document has a `rules` object mapping each symbol to either a
//! plain alternative string, `{"$or": [...]}` (strings or `{"$type": ..}`
//! objects), or `{"$type": ..}`. A sub-term starting with `<` refers to
//! another symbol; a symbol whose alternatives contain none is terminal.
//!
//! The recognizer does not consult this table yet.

use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;

const OR_KEY: &str = "$or";
const TYPE_KEY: &str = "$type";

/// Errors raised while loading a grammar document.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("failed to read grammar: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid grammar JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grammar has no `rules` object")]
    MissingRules,
    #[error("rule `{name}` is neither a string, `$or` nor `$type`")]
    InvalidRule { name: String },
}

/// One symbol of the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarSymbol {
    pub name: String,
    pub alternatives: Vec<String>,
    pub is_terminal: bool,
}

impl GrammarSymbol {
    fn new(name: &str, alternatives: Vec<String>) -> Self {
        let is_terminal = !alternatives.iter().any(|alt| references_symbol(alt));
        Self {
            name: name.to_string(),
            alternatives,
            is_terminal,
        }
    }
}

impl fmt::Display for GrammarSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = if self.is_terminal {
            "terminal"
        } else {
            "non-terminal"
        };
        write!(f, "{class} {} -> {}", self.name, self.alternatives.join(" | "))
    }
}

/// Whether any whitespace-separated term of `alternative` starts with `<`.
#[must_use]
pub fn references_symbol(alternative: &str) -> bool {
    alternative
        .split_whitespace()
        .any(|term| term.starts_with('<'))
}

/// Symbols sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    symbols: Vec<GrammarSymbol>,
}

impl Grammar {
    /// Load and parse a grammar file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading grammar");
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse a grammar document.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let document: Value = serde_json::from_str(text)?;
        let rules = document
            .get("rules")
            .and_then(Value::as_object)
            .ok_or(GrammarError::MissingRules)?;

        let symbols = rules
            .iter()
            .map(|(name, rule)| parse_rule(name, rule))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = symbols.len(), "grammar loaded");
        Ok(Self { symbols })
    }

    #[must_use]
    pub fn symbols(&self) -> &[GrammarSymbol] {
        &self.symbols
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GrammarSymbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            writeln!(f, "{symbol}")?;
        }
        Ok(())
    }
}

fn parse_rule(name: &str, rule: &Value) -> Result<GrammarSymbol, GrammarError> {
    let invalid = || GrammarError::InvalidRule {
        name: name.to_string(),
    };

    if let Some(alternative) = rule.as_str() {
        return Ok(GrammarSymbol::new(name, vec![alternative.to_string()]));
    }

    if let Some(alternatives) = rule.get(OR_KEY) {
        let alternatives = alternatives
            .as_array()
            .ok_or_else(invalid)?
            .iter()
            .map(|alt| alternative_text(alt).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(GrammarSymbol::new(name, alternatives));
    }

    if let Some(reference) = rule.get(TYPE_KEY).and_then(Value::as_str) {
        return Ok(GrammarSymbol::new(name, vec![reference.to_string()]));
    }

    Err(invalid())
}

/// A `$or` entry: a plain string or a `{"$type": ..}` object.
fn alternative_text(alt: &Value) -> Option<String> {
    alt.as_str()
        .or_else(|| alt.get(TYPE_KEY).and_then(Value::as_str))
        .map(str::to_string)
}
