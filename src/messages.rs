//! Message templates and locale selection
//!
//! Default failure messages come from a [`MessageTable`], a map from
//! [`RuleKind`] to a template such as `'{propertyName}' must not be empty.`.
//! English ships built in and is the fallback for any key another table lacks.
//!
//! The process-wide language manager holds the registered tables and the
//! current locale. Validators take an `Arc` snapshot of the current table once
//! per invocation, so switching locale mid-run never changes the messages of a
//! run already in progress.
//!
//! # Example
//!
//! ```
//! use ruleflow::messages::{format_message, MessageTable};
//! use ruleflow::RuleKind;
//!
//! let table = MessageTable::new("pirate")
//!     .with_template(RuleKind::NotEmpty, "Arr, '{propertyName}' be empty!");
//!
//! assert_eq!(table.template(RuleKind::NotEmpty), "Arr, '{propertyName}' be empty!");
//! // Missing keys fall back to English.
//! assert_eq!(table.template(RuleKind::IsNull), "'{propertyName}' must be empty (null).");
//!
//! let args = [("propertyName", "ship".to_string())];
//! let msg = format_message(table.template(RuleKind::NotEmpty), &args);
//! assert_eq!(msg, "Arr, 'ship' be empty!");
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use regex::{Captures, Regex};

use crate::error::ValidationError;
use crate::primitive::RuleKind;

/// Locale tag of the built-in English table.
pub const ENGLISH: &str = "en";

/// Matches `{placeholder}` tokens in templates.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder regex"));

/// Templates for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTable {
    locale: Cow<'static, str>,
    templates: HashMap<RuleKind, Cow<'static, str>>,
}

impl MessageTable {
    /// An empty table; every lookup falls back to English.
    pub fn new(locale: impl Into<Cow<'static, str>>) -> Self {
        MessageTable {
            locale: locale.into(),
            templates: HashMap::new(),
        }
    }

    /// The built-in English table.
    pub fn english() -> Self {
        let templates = RuleKind::ALL
            .iter()
            .map(|kind| (*kind, Cow::Borrowed(english_template(*kind))))
            .collect();
        MessageTable {
            locale: Cow::Borrowed(ENGLISH),
            templates,
        }
    }

    /// Add or replace the template for a rule kind.
    #[must_use]
    pub fn with_template(
        mut self,
        kind: RuleKind,
        template: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.templates.insert(kind, template.into());
        self
    }

    /// Locale tag of this table.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Template for `kind`, falling back to English.
    pub fn template(&self, kind: RuleKind) -> &str {
        match self.templates.get(&kind) {
            Some(template) => template.as_ref(),
            None => english_template(kind),
        }
    }
}

impl Default for MessageTable {
    fn default() -> Self {
        MessageTable::english()
    }
}

fn english_template(kind: RuleKind) -> &'static str {
    match kind {
        RuleKind::Equals => "'{propertyName}' must be equal to '{comparisonValue}'.",
        RuleKind::NotEquals => "'{propertyName}' must not be equal to '{comparisonValue}'.",
        RuleKind::Required => "'{propertyName}' is required.",
        RuleKind::NotNull => "'{propertyName}' must not be empty (null).",
        RuleKind::IsNull => "'{propertyName}' must be empty (null).",
        RuleKind::Length => {
            "'{propertyName}' must be between {minLength} and {maxLength} characters. \
             You entered {totalLength} characters."
        }
        RuleKind::MinLength => {
            "The length of '{propertyName}' must be at least {minLength} characters. \
             You entered {totalLength} characters."
        }
        RuleKind::MaxLength => {
            "The length of '{propertyName}' must be {maxLength} characters or fewer. \
             You entered {totalLength} characters."
        }
        RuleKind::Empty => "'{propertyName}' must be empty.",
        RuleKind::NotEmpty => "'{propertyName}' must not be empty.",
        RuleKind::GreaterThan => "'{propertyName}' must be greater than '{comparisonValue}'.",
        RuleKind::GreaterThanOrEquals => {
            "'{propertyName}' must be greater than or equal to '{comparisonValue}'."
        }
        RuleKind::LessThan => "'{propertyName}' must be less than '{comparisonValue}'.",
        RuleKind::LessThanOrEquals => {
            "'{propertyName}' must be less than or equal to '{comparisonValue}'."
        }
        RuleKind::InclusiveBetween => {
            "'{propertyName}' must be between {lowerBound} and {upperBound}. \
             You entered {propertyValue}."
        }
        RuleKind::ExclusiveBetween => {
            "'{propertyName}' must be between {lowerBound} and {upperBound} (exclusive). \
             You entered {propertyValue}."
        }
        RuleKind::IsTrue => "'{propertyName}' must be true.",
        RuleKind::IsFalse => "'{propertyName}' must be false.",
        RuleKind::IsTruthy => "'{propertyName}' must be truthy.",
        RuleKind::IsFalsy => "'{propertyName}' must be falsy.",
        RuleKind::Matches => "'{propertyName}' is not in the correct format.",
        RuleKind::Must | RuleKind::MustAsync => {
            "The specified condition was not met for '{propertyName}'."
        }
    }
}

/// Substitute `{name}` placeholders in `template`.
///
/// Unknown placeholders and unmatched braces are kept verbatim.
///
/// ```
/// use ruleflow::messages::format_message;
///
/// let msg = format_message("{a} and {b}", &[("a", "1".to_string())]);
/// assert_eq!(msg, "1 and {b}");
/// ```
pub fn format_message(template: &str, args: &[(&str, String)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            match args.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Registered message tables and the current locale.
#[derive(Debug)]
pub struct LanguageManager {
    tables: HashMap<String, Arc<MessageTable>>,
    current: String,
}

impl Default for LanguageManager {
    fn default() -> Self {
        let mut tables = HashMap::new();
        tables.insert(ENGLISH.to_string(), Arc::new(MessageTable::english()));
        LanguageManager {
            tables,
            current: ENGLISH.to_string(),
        }
    }
}

impl LanguageManager {
    /// Register (or replace) the table for its locale.
    pub fn register(&mut self, table: MessageTable) {
        self.tables
            .insert(table.locale().to_string(), Arc::new(table));
    }

    /// Switch the current locale.
    pub fn set_locale(&mut self, locale: &str) -> Result<(), ValidationError> {
        if !self.tables.contains_key(locale) {
            return Err(ValidationError::UnknownLocale(locale.to_string()));
        }
        self.current = locale.to_string();
        Ok(())
    }

    /// The current locale tag.
    pub fn locale(&self) -> &str {
        &self.current
    }

    /// Snapshot of the current table.
    pub fn current(&self) -> Arc<MessageTable> {
        match self.tables.get(&self.current) {
            Some(table) => Arc::clone(table),
            None => Arc::new(MessageTable::english()),
        }
    }
}

static LANGUAGES: LazyLock<RwLock<LanguageManager>> =
    LazyLock::new(|| RwLock::new(LanguageManager::default()));

/// Register a table with the process-wide language manager.
///
/// Intended for start-up; runs already in progress keep their snapshot.
pub fn register(table: MessageTable) {
    LANGUAGES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(table);
}

/// Select the process-wide locale.
pub fn set_locale(locale: &str) -> Result<(), ValidationError> {
    LANGUAGES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .set_locale(locale)
}

/// The process-wide locale tag.
pub fn locale() -> String {
    LANGUAGES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .locale()
        .to_string()
}

/// Snapshot of the process-wide table.
pub fn current() -> Arc<MessageTable> {
    LANGUAGES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .current()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_covers_every_kind() {
        let table = MessageTable::english();
        for kind in RuleKind::ALL {
            assert!(table.template(kind).contains("{propertyName}"), "{kind:?}");
        }
    }

    #[test]
    fn test_format_substitutes_known_placeholders() {
        let msg = format_message(
            "'{propertyName}' must be between {minLength} and {maxLength}.",
            &[
                ("propertyName", "name".into()),
                ("minLength", "3".into()),
                ("maxLength", "5".into()),
            ],
        );
        assert_eq!(msg, "'name' must be between 3 and 5.");
    }

    #[test]
    fn test_format_keeps_unknown_and_unbalanced() {
        assert_eq!(format_message("{x} {", &[]), "{x} {");
        assert_eq!(format_message("no braces", &[]), "no braces");
        assert_eq!(format_message("}{", &[]), "}{");
    }

    #[test]
    fn test_format_is_single_pass() {
        let args = [("a", "{b}".to_string()), ("b", "x".to_string())];
        assert_eq!(format_message("{a}/{b}", &args), "{b}/x");
        assert_eq!(format_message("{not a name}", &args), "{not a name}");
    }

    #[test]
    fn test_format_repeated_placeholder() {
        let msg = format_message("{a}{a}", &[("a", "x".into())]);
        assert_eq!(msg, "xx");
    }

    #[test]
    fn test_manager_rejects_unknown_locale() {
        let mut manager = LanguageManager::default();
        assert_eq!(
            manager.set_locale("xx"),
            Err(ValidationError::UnknownLocale("xx".into()))
        );
        assert_eq!(manager.locale(), ENGLISH);
    }

    #[test]
    fn test_manager_switches_table() {
        let mut manager = LanguageManager::default();
        manager.register(
            MessageTable::new("de").with_template(RuleKind::Required, "'{propertyName}' fehlt."),
        );
        let before = manager.current();
        manager.set_locale("de").expect("registered");
        let after = manager.current();

        assert_eq!(before.template(RuleKind::Required), "'{propertyName}' is required.");
        assert_eq!(after.template(RuleKind::Required), "'{propertyName}' fehlt.");
        assert_eq!(after.locale(), "de");
    }
}
