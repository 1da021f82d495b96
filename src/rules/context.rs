//! The execution context handed to every rule evaluation.

use crate::{
    metadata::{method::Method, module::Module, typesystem::CilType},
    rules::{config::AnalysisConfig, defect::Location},
    Result,
};

static MINIMAL_CONFIG: AnalysisConfig = AnalysisConfig::sequential();

/// Read-only context for one rule evaluation.
///
/// The context is an explicitly passed value holding shared references only; a rule can not
/// mutate the engine through it, and two evaluations running on different threads see the
/// same context. The module it exposes is fully built before the first rule runs.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    module: &'a Module,
    config: &'a AnalysisConfig,
}

impl<'a> RuleContext<'a> {
    /// Creates a context over a built module.
    #[must_use]
    pub fn new(module: &'a Module, config: &'a AnalysisConfig) -> Self {
        RuleContext { module, config }
    }

    /// Creates a context with a sequential default configuration.
    ///
    /// Intended for evaluating a single rule directly, without a [`crate::rules::Runner`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dotaudit::metadata::module::{MethodBuilder, ModuleBuilder, TypeBuilder};
    /// use dotaudit::rules::{security::NonVirtualInheritanceDemandRule, Rule, RuleContext, Target};
    ///
    /// let mut builder = ModuleBuilder::new("Sample.dll");
    /// builder.add_type(TypeBuilder::class("Sample", "Plain").method(MethodBuilder::new("Run")))?;
    /// let module = builder.build()?;
    ///
    /// let ctx = RuleContext::minimal(&module);
    /// let rule = NonVirtualInheritanceDemandRule::default();
    /// for method in module.methods() {
    ///     assert!(!rule.check(Target::Method(method), &ctx)?.is_applicable());
    /// }
    /// # Ok::<(), dotaudit::Error>(())
    /// ```
    #[must_use]
    pub fn minimal(module: &'a Module) -> Self {
        RuleContext {
            module,
            config: &MINIMAL_CONFIG,
        }
    }

    /// Returns the module under analysis
    #[must_use]
    pub fn module(&self) -> &'a Module {
        self.module
    }

    /// Returns the run configuration
    #[must_use]
    pub fn config(&self) -> &'a AnalysisConfig {
        self.config
    }

    /// Returns the type owning the given method.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TypeNotFound`] if the method is not part of this module.
    pub fn declaring_type(&self, method: &Method) -> Result<&'a CilType> {
        self.module.declaring_type(method)
    }

    /// Returns true if the type takes part in inheritance: something derives from it in this
    /// module, or something may derive from it elsewhere.
    #[must_use]
    pub fn participates_in_inheritance(&self, ty: &CilType) -> bool {
        self.module.has_derived_types(ty) || self.module.can_be_derived(ty)
    }

    /// Returns the report location of a method
    #[must_use]
    pub fn method_location(&self, method: &Method) -> Location {
        Location::of_method(self.module, method)
    }

    /// Returns the report location of a type
    #[must_use]
    pub fn type_location(&self, ty: &CilType) -> Location {
        Location::of_type(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::module::{MethodBuilder, ModuleBuilder, TypeBuilder},
        metadata::token::Token,
    };

    #[test]
    fn test_minimal_context() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Context.dll");
        let base = builder.add_type(TypeBuilder::class("N", "Base").method(MethodBuilder::new("Run")))?;
        builder.add_type(TypeBuilder::class("N", "Leaf").extends(base).sealed())?;
        let module = builder.build()?;
        let ctx = RuleContext::minimal(&module);

        assert!(!ctx.config().parallel);
        assert_eq!(ctx.module().name(), "Context.dll");

        let run = &module.types()[0].methods[0];
        assert_eq!(ctx.declaring_type(run)?.token, base);
        assert_eq!(ctx.method_location(run).token(), Token::method_def(1));
        assert_eq!(ctx.method_location(run).name(), "N.Base::Run()");

        assert!(ctx.participates_in_inheritance(&module.types()[0]));
        assert!(!ctx.participates_in_inheritance(&module.types()[1]));
        assert_eq!(ctx.type_location(&module.types()[1]).name(), "N.Leaf");
        Ok(())
    }
}
