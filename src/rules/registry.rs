//! The ordered set of rules a run evaluates.

use std::sync::Arc;

use crate::{
    rules::{
        security::{NonVirtualInheritanceDemandRule, SealedTypeInheritanceDemandRule},
        traits::Rule,
    },
    Error, Result,
};

/// Ordered collection of rules with unique identifiers.
///
/// Rules are evaluated in registration order, which is also the order their defects appear in
/// for a given target.
///
/// # Examples
///
/// ```rust
/// use dotaudit::rules::{security::NonVirtualInheritanceDemandRule, RuleRegistry};
///
/// let mut registry = RuleRegistry::new();
/// registry.register(NonVirtualInheritanceDemandRule::default())?;
/// assert!(registry.register(NonVirtualInheritanceDemandRule::default()).is_err());
/// assert_eq!(registry.len(), 1);
/// # Ok::<(), dotaudit::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        RuleRegistry { rules: Vec::new() }
    }

    /// Creates a registry holding every built-in rule with its default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        RuleRegistry {
            rules: vec![
                Arc::new(NonVirtualInheritanceDemandRule::default()),
                Arc::new(SealedTypeInheritanceDemandRule),
            ],
        }
    }

    /// Adds a rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRule`] if a rule with the same identifier is registered.
    pub fn register<R: Rule + 'static>(&mut self, rule: R) -> Result<()> {
        self.register_shared(Arc::new(rule))
    }

    /// Adds a rule that is shared with other registries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRule`] if a rule with the same identifier is registered.
    pub fn register_shared(&mut self, rule: Arc<dyn Rule>) -> Result<()> {
        if self.get(rule.id()).is_some() {
            return Err(Error::DuplicateRule(rule.id().to_string()));
        }

        self.rules.push(rule);
        Ok(())
    }

    /// Returns the rule with the given identifier
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.iter().find(|rule| rule.id() == id)
    }

    /// Returns the rules in registration order
    #[must_use]
    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    /// Returns the rule identifiers in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.id())
    }

    /// Returns the number of registered rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
