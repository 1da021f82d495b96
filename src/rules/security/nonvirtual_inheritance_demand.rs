//! Inheritance demands on members no derived type can override.
//!
//! An `InheritanceDemand` is checked when a derived type overrides the annotated member. On a
//! member that can not be overridden (a static method, a non-virtual instance method, a sealed
//! override) that moment never comes, so the demand protects nothing while looking like it
//! does.
//!
//! | Method kind                          | Verdict         |
//! |--------------------------------------|-----------------|
//! | no `InheritanceDemand`               | not applicable  |
//! | abstract                             | not applicable  |
//! | virtual or override, not sealed      | not applicable  |
//! | virtual or override, sealed          | one high defect |
//! | non-virtual instance                 | one high defect |
//! | static                               | one high defect |
//!
//! With [`NonVirtualInheritanceDemandConfig::sealed_type_members_are_final`] enabled, unsealed
//! virtual members of a sealed declaring type are reported as well.

use crate::{
    metadata::{
        method::{Method, MethodKind},
        security::{find, AnnotationKind, SecurityAction},
    },
    rules::{
        context::RuleContext,
        defect::{Defect, Severity},
        target::{RuleOutcome, TargetKind},
        traits::Rule,
    },
    Result,
};

/// Options of [`NonVirtualInheritanceDemandRule`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonVirtualInheritanceDemandConfig {
    /// Treat virtual members of sealed types as final
    pub sealed_type_members_are_final: bool,
}

/// Reports `InheritanceDemand` annotations on methods that can not be overridden.
#[derive(Debug, Clone, Default)]
pub struct NonVirtualInheritanceDemandRule {
    config: NonVirtualInheritanceDemandConfig,
}

impl NonVirtualInheritanceDemandRule {
    /// Identifier of this rule
    pub const ID: &'static str = "security.nonvirtual-inheritance-demand";

    /// Creates the rule with the given options.
    #[must_use]
    pub fn new(config: NonVirtualInheritanceDemandConfig) -> Self {
        NonVirtualInheritanceDemandRule { config }
    }

    /// Returns the options of this rule
    #[must_use]
    pub fn config(&self) -> NonVirtualInheritanceDemandConfig {
        self.config
    }

    fn unreachable_reason(
        &self,
        method: &Method,
        ctx: &RuleContext<'_>,
    ) -> Result<Option<&'static str>> {
        let reason = match method.kind() {
            MethodKind::Abstract => None,
            MethodKind::Static => Some("static"),
            MethodKind::Instance => Some("non-virtual"),
            MethodKind::Virtual | MethodKind::Override if method.is_sealed() => Some("sealed"),
            MethodKind::Virtual | MethodKind::Override => {
                if self.config.sealed_type_members_are_final
                    && !ctx.module().can_be_derived(ctx.declaring_type(method)?)
                {
                    Some("sealed type's virtual")
                } else {
                    None
                }
            }
        };

        Ok(reason)
    }
}

impl Rule for NonVirtualInheritanceDemandRule {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Non-virtual method with InheritanceDemand"
    }

    fn description(&self) -> &str {
        "An InheritanceDemand on a method that can not be overridden is never checked"
    }

    fn applies_to(&self, kind: TargetKind) -> bool {
        kind == TargetKind::Method
    }

    fn check_method(&self, method: &Method, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let demands = find(
            method,
            AnnotationKind::SecurityDemand,
            SecurityAction::InheritanceDemand,
        );
        let permissions: Vec<&str> = demands
            .map(|annotation| annotation.class_name())
            .collect();
        if permissions.is_empty() {
            return Ok(RuleOutcome::NotApplicable);
        }

        let Some(reason) = self.unreachable_reason(method, ctx)? else {
            return Ok(RuleOutcome::NotApplicable);
        };

        Ok(RuleOutcome::single(Defect::new(
            ctx.method_location(method),
            Self::ID,
            Severity::High,
            format!(
                "InheritanceDemand ({}) on {} method '{}' is never checked because no derived type can override it",
                permissions.join(", "),
                reason,
                method.name
            ),
        )))
    }
}
