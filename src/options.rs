//! Per-invocation configuration
//!
//! Each `validate_with` / `validate_async_with` call starts from
//! [`ValidationOptions::default`], hands a mutable reference to the caller's
//! configuration callback, and then freezes the options for the rest of the run.
//!
//! # Example
//!
//! ```
//! use ruleflow::{CascadeMode, ValidationOptions};
//!
//! let opts = ValidationOptions::configured(|o| {
//!     o.include_property("email").cascade(CascadeMode::Stop);
//! });
//!
//! assert!(opts.includes("email"));
//! assert!(!opts.includes("name"));
//! assert_eq!(opts.property_cascade_mode, Some(CascadeMode::Stop));
//! ```

/// Whether a rule chain keeps evaluating after its first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CascadeMode {
    /// Run every primitive.
    #[default]
    Continue,
    /// Halt at the first failure.
    Stop,
}

/// Name that selects chains declared outside of any rule set.
pub const DEFAULT_RULE_SET: &str = "default";

/// Name that selects every chain regardless of rule set.
pub const ALL_RULE_SETS: &str = "*";

/// Options for one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationOptions {
    /// Restrict validation to these property keys (and their nested keys).
    /// `None` validates everything.
    pub include_properties: Option<Vec<String>>,
    /// Cascade mode forced on every chain for this run.
    pub property_cascade_mode: Option<CascadeMode>,
    /// Rule sets to execute. Empty selects only chains outside any rule set.
    pub rule_sets: Vec<String>,
}

impl ValidationOptions {
    /// Default options with `configure` applied.
    pub fn configured<F>(configure: F) -> Self
    where
        F: FnOnce(&mut ValidationOptions),
    {
        let mut options = ValidationOptions::default();
        configure(&mut options);
        options
    }

    /// Add one property key to the inclusion filter.
    pub fn include_property(&mut self, property: impl Into<String>) -> &mut Self {
        self.include_properties
            .get_or_insert_with(Vec::new)
            .push(property.into());
        self
    }

    /// Add several property keys to the inclusion filter.
    pub fn include_properties<I, S>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = self.include_properties.get_or_insert_with(Vec::new);
        keys.extend(properties.into_iter().map(Into::into));
        self
    }

    /// Force a cascade mode on every chain.
    pub fn cascade(&mut self, mode: CascadeMode) -> &mut Self {
        self.property_cascade_mode = Some(mode);
        self
    }

    /// Select a rule set by name.
    pub fn rule_set(&mut self, name: impl Into<String>) -> &mut Self {
        self.rule_sets.push(name.into());
        self
    }

    /// Select every chain, in or out of rule sets.
    pub fn all_rule_sets(&mut self) -> &mut Self {
        self.rule_set(ALL_RULE_SETS)
    }

    /// Whether a property key passes the inclusion filter.
    ///
    /// Including `address` also includes `address.city` and `address[0]`.
    pub fn includes(&self, property: &str) -> bool {
        match &self.include_properties {
            None => true,
            Some(keys) => keys
                .iter()
                .any(|key| key == property || is_descendant(property, key)),
        }
    }

    /// Whether some included key lies below `property`.
    pub(crate) fn leads_to(&self, property: &str) -> bool {
        match &self.include_properties {
            None => true,
            Some(keys) => keys.iter().any(|key| is_descendant(key, property)),
        }
    }

    /// Whether a chain declared in `chain_sets` is selected by this run.
    pub(crate) fn selects_rule_sets(&self, chain_sets: &[String]) -> bool {
        if self.rule_sets.is_empty() {
            return chain_sets.is_empty();
        }
        if self.rule_sets.iter().any(|s| s == ALL_RULE_SETS) {
            return true;
        }
        if chain_sets.is_empty() {
            return self.rule_sets.iter().any(|s| s == DEFAULT_RULE_SET);
        }
        chain_sets.iter().any(|s| self.rule_sets.contains(s))
    }

    /// Rule set names reported on the result.
    pub(crate) fn executed_rule_sets(&self) -> Vec<String> {
        if self.rule_sets.is_empty() {
            vec![DEFAULT_RULE_SET.to_string()]
        } else {
            self.rule_sets.clone()
        }
    }
}

fn is_descendant(path: &str, ancestor: &str) -> bool {
    path.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
}
