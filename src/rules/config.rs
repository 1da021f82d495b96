//! Run configuration for the rule engine
//!
//! Controls how the [`crate::rules::Runner`] schedules rule evaluations and what it does when a
//! rule faults. Rule-specific knobs are not kept here; they live on the rule values themselves.

use std::collections::BTreeSet;

/// Configuration for one analysis run
///
/// A faulting rule is either recorded as a diagnostic and skipped (the default), or aborts the
/// whole run (`fail_fast`). Panics are only contained when `isolate_faults` is set; with it
/// cleared a panicking rule unwinds through [`crate::rules::Runner::analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalysisConfig {
    /// Evaluate targets on the rayon thread pool
    pub parallel: bool,

    /// Catch panics raised by rules and report them as diagnostics
    pub isolate_faults: bool,

    /// Abort the run on the first rule fault
    pub fail_fast: bool,

    /// Identifiers of rules the runner skips
    pub disabled_rules: BTreeSet<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            isolate_faults: true,
            fail_fast: false,
            disabled_rules: BTreeSet::new(),
        }
    }
}

impl AnalysisConfig {
    /// Creates a configuration evaluating every target on the calling thread
    ///
    /// Faults are still isolated and recorded. Useful for debugging rules and for
    /// environments where spawning worker threads is undesirable.
    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            parallel: false,
            isolate_faults: true,
            fail_fast: false,
            disabled_rules: BTreeSet::new(),
        }
    }

    /// Creates a configuration that treats any rule fault as fatal
    ///
    /// Panics are still caught at the runner boundary, but converted into an
    /// [`crate::Error::RulePanicked`] that ends the run instead of a diagnostic.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            parallel: true,
            isolate_faults: true,
            fail_fast: true,
            disabled_rules: BTreeSet::new(),
        }
    }

    /// Adds a rule identifier to the set of skipped rules
    #[must_use]
    pub fn disable(mut self, rule: impl Into<String>) -> Self {
        self.disabled_rules.insert(rule.into());
        self
    }

    /// Returns true if the rule with the given identifier should run
    #[must_use]
    pub fn is_enabled(&self, rule: &str) -> bool {
        !self.disabled_rules.contains(rule)
    }
}
