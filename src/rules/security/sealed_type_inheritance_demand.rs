//! Inheritance demands on types nothing may derive from.

use crate::{
    metadata::{
        security::{find, AnnotationKind, HasAnnotations, SecurityAction},
        typesystem::CilType,
    },
    rules::{
        context::RuleContext,
        defect::{Defect, Severity},
        target::{RuleOutcome, TargetKind},
        traits::Rule,
    },
    Result,
};

/// Reports `InheritanceDemand` annotations on sealed types.
///
/// Only sealed types carrying declarative security are evaluated; a sealed type whose
/// security annotations are all other actions is applied without findings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SealedTypeInheritanceDemandRule;

impl SealedTypeInheritanceDemandRule {
    /// Identifier of this rule
    pub const ID: &'static str = "security.sealed-type-inheritance-demand";
}

impl Rule for SealedTypeInheritanceDemandRule {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Sealed type with InheritanceDemand"
    }

    fn description(&self) -> &str {
        "An InheritanceDemand on a sealed type is never checked because no type can derive from it"
    }

    fn applies_to(&self, kind: TargetKind) -> bool {
        kind == TargetKind::Type
    }

    fn check_type(&self, ty: &CilType, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let has_security = ty
            .annotations()
            .iter()
            .any(|annotation| annotation.kind() == AnnotationKind::SecurityDemand);
        if !has_security || ctx.module().can_be_derived(ty) {
            return Ok(RuleOutcome::NotApplicable);
        }

        let permissions: Vec<&str> = find(
            ty,
            AnnotationKind::SecurityDemand,
            SecurityAction::InheritanceDemand,
        )
        .map(|annotation| annotation.class_name())
        .collect();
        if permissions.is_empty() {
            return Ok(RuleOutcome::clean());
        }

        Ok(RuleOutcome::single(Defect::new(
            ctx.type_location(ty),
            Self::ID,
            Severity::Medium,
            format!(
                "InheritanceDemand ({}) on sealed type '{}' is never checked",
                permissions.join(", "),
                ty.fullname()
            ),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::module::{ModuleBuilder, TypeBuilder},
        rules::target::Target,
        test::{inheritance_demand, link_demand},
    };

    #[test]
    fn test_sealed_type_outcomes() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("SealedTypes.dll");
        builder.add_type(TypeBuilder::class("N", "Open").annotation(inheritance_demand()))?;
        builder.add_type(TypeBuilder::class("N", "Bare").sealed())?;
        builder.add_type(TypeBuilder::class("N", "Linked").sealed().annotation(link_demand()))?;
        builder.add_type(
            TypeBuilder::class("N", "Guarded")
                .sealed()
                .annotation(link_demand())
                .annotation(inheritance_demand()),
        )?;
        builder.add_type(
            TypeBuilder::class("N", "Helpers")
                .abstract_type()
                .sealed()
                .annotation(inheritance_demand()),
        )?;
        let module = builder.build()?;
        let ctx = RuleContext::minimal(&module);
        let rule = SealedTypeInheritanceDemandRule;

        let outcomes = module
            .types()
            .iter()
            .map(|ty| rule.check(Target::Type(ty), &ctx))
            .collect::<crate::Result<Vec<_>>>()?;

        assert_eq!(outcomes[0], RuleOutcome::NotApplicable);
        assert_eq!(outcomes[1], RuleOutcome::NotApplicable);
        assert_eq!(outcomes[2], RuleOutcome::clean());

        let guarded = outcomes[3].defects();
        assert_eq!(guarded.len(), 1);
        assert_eq!(guarded[0].severity(), Severity::Medium);
        assert_eq!(guarded[0].location().token(), module.types()[3].token);
        assert!(guarded[0].message().contains("N.Guarded"));

        // Static classes are sealed as well
        assert_eq!(outcomes[4].defects().len(), 1);
        Ok(())
    }

    #[test]
    fn test_methods_are_not_applicable() -> crate::Result<()> {
        let module = crate::test::scenario_module()?;
        let ctx = RuleContext::minimal(&module);
        let rule = SealedTypeInheritanceDemandRule;

        assert!(!rule.applies_to(TargetKind::Method));
        for method in module.methods() {
            assert_eq!(rule.check(Target::Method(method), &ctx)?, RuleOutcome::NotApplicable);
        }
        Ok(())
    }
}
