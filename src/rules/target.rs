//! Evaluation targets and rule outcomes.

use strum::{Display, EnumIter};

use crate::{
    metadata::{method::Method, module::Module, token::Token, typesystem::CilType},
    rules::defect::{Defect, Location},
};

/// The kind of metadata node a rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TargetKind {
    /// The module as a whole
    Assembly,
    /// A type definition
    Type,
    /// A method definition
    Method,
}

/// One metadata node handed to a rule.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// The module as a whole, including its assembly-level annotations
    Assembly(&'a Module),
    /// A type definition
    Type(&'a CilType),
    /// A method definition
    Method(&'a Method),
}

impl Target<'_> {
    /// Returns the kind of this target
    #[must_use]
    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Assembly(_) => TargetKind::Assembly,
            Target::Type(_) => TargetKind::Type,
            Target::Method(_) => TargetKind::Method,
        }
    }

    /// Returns the metadata token of this target
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            Target::Assembly(module) => module.token(),
            Target::Type(ty) => ty.token,
            Target::Method(method) => method.token,
        }
    }

    /// Returns the report location of this target
    #[must_use]
    pub fn location(&self, module: &Module) -> Location {
        match self {
            Target::Assembly(module) => Location::assembly(module),
            Target::Type(ty) => Location::of_type(ty),
            Target::Method(method) => Location::of_method(module, method),
        }
    }
}

/// The result of evaluating one rule against one target.
///
/// `NotApplicable` and `Applied(vec![])` are different answers: the first says the rule has
/// nothing to say about this target, the second says it looked and found nothing wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule does not evaluate this target
    NotApplicable,
    /// The rule evaluated the target and found these defects (possibly none)
    Applied(Vec<Defect>),
}

impl RuleOutcome {
    /// An applied outcome without defects
    #[must_use]
    pub fn clean() -> Self {
        RuleOutcome::Applied(Vec::new())
    }

    /// An applied outcome with exactly one defect
    #[must_use]
    pub fn single(defect: Defect) -> Self {
        RuleOutcome::Applied(vec![defect])
    }

    /// Returns true unless the outcome is [`RuleOutcome::NotApplicable`]
    #[must_use]
    pub fn is_applicable(&self) -> bool {
        matches!(self, RuleOutcome::Applied(_))
    }

    /// Returns the defects, empty for [`RuleOutcome::NotApplicable`]
    #[must_use]
    pub fn defects(&self) -> &[Defect] {
        match self {
            RuleOutcome::NotApplicable => &[],
            RuleOutcome::Applied(defects) => defects,
        }
    }

    /// Consumes the outcome and returns its defects
    #[must_use]
    pub fn into_defects(self) -> Vec<Defect> {
        match self {
            RuleOutcome::NotApplicable => Vec::new(),
            RuleOutcome::Applied(defects) => defects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::defect::Severity;

    #[test]
    fn test_outcome_distinguishes_clean_from_not_applicable() {
        assert!(!RuleOutcome::NotApplicable.is_applicable());
        assert!(RuleOutcome::clean().is_applicable());
        assert_ne!(RuleOutcome::NotApplicable, RuleOutcome::clean());
        assert!(RuleOutcome::NotApplicable.defects().is_empty());
        assert!(RuleOutcome::clean().defects().is_empty());
    }

    #[test]
    fn test_single_outcome() {
        let defect = Defect::new(
            Location::Assembly {
                name: "A.dll".to_string(),
            },
            "r",
            Severity::Audit,
            "m",
        );
        let outcome = RuleOutcome::single(defect.clone());
        assert_eq!(outcome.defects(), &[defect.clone()]);
        assert_eq!(outcome.into_defects(), vec![defect]);
    }
}
