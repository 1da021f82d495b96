//! The contract every rule implements.

use crate::{
    metadata::{method::Method, module::Module, typesystem::CilType},
    rules::{
        context::RuleContext,
        target::{RuleOutcome, Target, TargetKind},
    },
    Result,
};

/// A pluggable structural rule.
///
/// A rule offers one check per target kind. The defaults answer
/// [`RuleOutcome::NotApplicable`], so a rule implements only the checks for the kinds it cares
/// about. Rules must be pure with respect to the module: the same target yields the same
/// outcome no matter which targets were evaluated before, and no state is kept between calls.
/// Configuration is the only state a rule value may hold.
///
/// Returning `Err` signals an internal fault of the rule for this target, not a defect in the
/// analysed code; the runner records it as a diagnostic.
///
/// # Examples
///
/// ```rust
/// use dotaudit::metadata::{method::Method, security::{find, AnnotationKind, SecurityAction}};
/// use dotaudit::rules::{Defect, Rule, RuleContext, RuleOutcome, Severity, TargetKind};
///
/// struct LinkDemandAudit;
///
/// impl Rule for LinkDemandAudit {
///     fn id(&self) -> &str {
///         "audit.link-demand"
///     }
///
///     fn name(&self) -> &str {
///         "Link demands"
///     }
///
///     fn description(&self) -> &str {
///         "Lists methods protected by a link demand"
///     }
///
///     fn applies_to(&self, kind: TargetKind) -> bool {
///         kind == TargetKind::Method
///     }
///
///     fn check_method(&self, method: &Method, ctx: &RuleContext<'_>) -> dotaudit::Result<RuleOutcome> {
///         let demands = find(method, AnnotationKind::SecurityDemand, SecurityAction::LinkDemand);
///         Ok(RuleOutcome::Applied(
///             demands
///                 .map(|_| Defect::new(ctx.method_location(method), self.id(), Severity::Audit, "Link demand"))
///                 .collect(),
///         ))
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Stable identifier, used for filtering and in reports
    fn id(&self) -> &str;

    /// Short human-readable name
    fn name(&self) -> &str;

    /// What the rule detects
    fn description(&self) -> &str;

    /// Returns false for target kinds the runner does not need to offer this rule.
    ///
    /// Skipping is an optimisation only; a skipped pair counts as `NotApplicable`.
    fn applies_to(&self, _kind: TargetKind) -> bool {
        true
    }

    /// Evaluates the module as a whole
    ///
    /// # Errors
    ///
    /// Returns an error if the rule faults on this target.
    fn check_assembly(&self, _module: &Module, _ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        Ok(RuleOutcome::NotApplicable)
    }

    /// Evaluates a type definition
    ///
    /// # Errors
    ///
    /// Returns an error if the rule faults on this target.
    fn check_type(&self, _ty: &CilType, _ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        Ok(RuleOutcome::NotApplicable)
    }

    /// Evaluates a method definition
    ///
    /// # Errors
    ///
    /// Returns an error if the rule faults on this target.
    fn check_method(&self, _method: &Method, _ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        Ok(RuleOutcome::NotApplicable)
    }

    /// Dispatches to the check matching the target kind
    ///
    /// # Errors
    ///
    /// Returns an error if the rule faults on this target.
    fn check(&self, target: Target<'_>, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        match target {
            Target::Assembly(module) => self.check_assembly(module, ctx),
            Target::Type(ty) => self.check_type(ty, ctx),
            Target::Method(method) => self.check_method(method, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::module::{MethodBuilder, ModuleBuilder, TypeBuilder},
        rules::defect::{Defect, Severity},
    };

    struct TypeCounter;

    impl Rule for TypeCounter {
        fn id(&self) -> &str {
            "test.type-counter"
        }

        fn name(&self) -> &str {
            "Type counter"
        }

        fn description(&self) -> &str {
            "Reports every type"
        }

        fn check_type(&self, ty: &CilType, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
            Ok(RuleOutcome::single(Defect::new(
                ctx.type_location(ty),
                self.id(),
                Severity::Audit,
                "seen",
            )))
        }
    }

    #[test]
    fn test_default_checks_are_not_applicable() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Traits.dll");
        builder.add_type(TypeBuilder::class("N", "T").method(MethodBuilder::new("M")))?;
        let module = builder.build()?;
        let ctx = RuleContext::minimal(&module);
        let rule = TypeCounter;

        assert_eq!(
            rule.check(Target::Assembly(&module), &ctx)?,
            RuleOutcome::NotApplicable
        );
        assert_eq!(
            rule.check(Target::Method(&module.types()[0].methods[0]), &ctx)?,
            RuleOutcome::NotApplicable
        );

        let outcome = rule.check(Target::Type(&module.types()[0]), &ctx)?;
        assert_eq!(outcome.defects().len(), 1);
        assert!(rule.applies_to(TargetKind::Assembly));
        Ok(())
    }
}
