//! Evaluation of a rule registry against a module.
//!
//! The [`Runner`] enumerates every target of a module (the assembly, then each type, then each
//! method, all in token order), offers each target to each enabled rule, and gathers the
//! outcomes into an [`AnalysisReport`]. Targets are independent of each other, so with
//! [`AnalysisConfig::parallel`] they are distributed over the [`rayon`] pool; results are
//! merged in target order and the report is identical to a sequential run.
//!
//! A rule that returns an error or panics on one target does not stop the run. The fault is
//! recorded as a [`Diagnostic`] naming the rule and the target, and evaluation continues with
//! the next pair, unless [`AnalysisConfig::fail_fast`] asks for the run to end instead.

use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
};

use rayon::prelude::*;

use crate::{
    metadata::{
        diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
        module::Module,
        token::Token,
    },
    rules::{
        config::AnalysisConfig,
        context::RuleContext,
        defect::{Defect, Severity},
        registry::RuleRegistry,
        target::{RuleOutcome, Target},
        traits::Rule,
    },
    Error, Result,
};

/// Counters describing one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Number of targets enumerated
    pub targets: usize,
    /// Number of rules that were enabled
    pub rules: usize,
    /// Number of (rule, target) pairs offered to a rule
    pub evaluations: usize,
    /// Pairs that ended `NotApplicable`, including those the rule opted out of
    pub not_applicable: usize,
    /// Pairs that ended `Applied`, with or without defects
    pub applied: usize,
    /// Pairs where the rule faulted
    pub faults: usize,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} targets x {} rules: {} applied, {} not applicable, {} faults",
            self.targets, self.rules, self.applied, self.not_applicable, self.faults
        )
    }
}

/// Everything one run produced.
#[derive(Debug)]
pub struct AnalysisReport {
    module: String,
    defects: Vec<Defect>,
    diagnostics: Diagnostics,
    stats: RunStats,
}

impl AnalysisReport {
    /// Returns the name of the analysed module
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module
    }

    /// Returns all defects, ordered by target and then by rule registration order
    #[must_use]
    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    /// Consumes the report and returns its defects
    #[must_use]
    pub fn into_defects(self) -> Vec<Defect> {
        self.defects
    }

    /// Returns the diagnostics collected during the run, after those of the module itself
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Returns the run counters
    #[must_use]
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Returns true if at least one defect was reported
    #[must_use]
    pub fn has_defects(&self) -> bool {
        !self.defects.is_empty()
    }

    /// Returns the defects located at the given token
    pub fn defects_for(&self, token: Token) -> impl Iterator<Item = &Defect> {
        self.defects
            .iter()
            .filter(move |defect| defect.location().token() == token)
    }

    /// Returns the defects with exactly the given severity
    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Defect> {
        self.defects
            .iter()
            .filter(move |defect| defect.severity() == severity)
    }

    /// Returns the defects at or above the given severity
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Defect> {
        self.defects
            .iter()
            .filter(move |defect| defect.severity() >= severity)
    }

    /// Returns the defects reported by the given rule
    pub fn by_rule<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a Defect> + 'a {
        self.defects
            .iter()
            .filter(move |defect| defect.rule() == rule)
    }
}

enum Evaluation {
    Skipped,
    Outcome(RuleOutcome),
    Fault(Error),
}

/// Evaluates the rules of a registry against modules.
///
/// # Examples
///
/// ```rust
/// use dotaudit::metadata::module::{MethodBuilder, ModuleBuilder, TypeBuilder};
/// use dotaudit::metadata::security::{Annotation, SecurityAction};
/// use dotaudit::rules::{AnalysisConfig, RuleRegistry, Runner, Severity};
///
/// let mut builder = ModuleBuilder::new("Sample.dll");
/// builder.add_type(TypeBuilder::class("Sample", "Guarded").method(
///     MethodBuilder::new("Run").annotation(Annotation::security(
///         SecurityAction::InheritanceDemand,
///         "System.Security.Permissions.SecurityPermissionAttribute",
///     )),
/// ))?;
/// let module = builder.build()?;
///
/// let runner = Runner::new(RuleRegistry::with_defaults(), AnalysisConfig::default());
/// let report = runner.analyze(&module)?;
/// assert_eq!(report.by_severity(Severity::High).count(), 1);
/// # Ok::<(), dotaudit::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Runner {
    registry: RuleRegistry,
    config: AnalysisConfig,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(RuleRegistry::with_defaults(), AnalysisConfig::default())
    }
}

impl Runner {
    /// Creates a runner for the given rules and configuration.
    #[must_use]
    pub fn new(registry: RuleRegistry, config: AnalysisConfig) -> Self {
        Runner { registry, config }
    }

    /// Returns the registered rules
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Returns the run configuration
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Evaluates every enabled rule against every target of the module.
    ///
    /// # Errors
    ///
    /// Only with [`AnalysisConfig::fail_fast`]: returns the first rule fault in target order,
    /// as [`Error::RuleFailed`] or [`Error::RulePanicked`].
    pub fn analyze(&self, module: &Module) -> Result<AnalysisReport> {
        let diagnostics = Diagnostics::new();
        for diagnostic in module.diagnostics().iter() {
            diagnostics.push(diagnostic.clone());
        }

        let mut rules: Vec<&dyn Rule> = Vec::with_capacity(self.registry.len());
        for rule in self.registry.rules() {
            if self.config.is_enabled(rule.id()) {
                rules.push(rule.as_ref());
            } else {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticSeverity::Info,
                        DiagnosticCategory::Runner,
                        "Rule disabled by configuration",
                    )
                    .with_rule(rule.id()),
                );
            }
        }
        if rules.is_empty() {
            diagnostics.warning(DiagnosticCategory::Runner, "No rules enabled");
        }

        let mut targets = Vec::with_capacity(1 + module.types().len() + module.method_count());
        targets.push(Target::Assembly(module));
        targets.extend(module.types().iter().map(Target::Type));
        targets.extend(module.methods().map(Target::Method));

        log::debug!(
            "Analyzing '{}': {} targets, {} rules (parallel: {})",
            module.name(),
            targets.len(),
            rules.len(),
            self.config.parallel
        );
        for rule in &rules {
            log::debug!("Rule '{}' - {}", rule.id(), rule.name());
        }

        let ctx = RuleContext::new(module, &self.config);
        let evaluate_target = |target: &Target<'_>| -> Vec<Evaluation> {
            rules
                .iter()
                .map(|rule| self.evaluate(*rule, *target, &ctx))
                .collect()
        };

        let mut report = AnalysisReport {
            module: module.name().to_string(),
            defects: Vec::new(),
            diagnostics,
            stats: RunStats {
                targets: targets.len(),
                rules: rules.len(),
                ..RunStats::default()
            },
        };

        if self.config.parallel {
            let results: Vec<Vec<Evaluation>> = targets.par_iter().map(evaluate_target).collect();
            for (target, evaluations) in targets.iter().zip(results) {
                self.record(&mut report, module, target, &rules, evaluations)?;
            }
        } else {
            for target in &targets {
                self.record(&mut report, module, target, &rules, evaluate_target(target))?;
            }
        }

        log::debug!(
            "Finished '{}': {} defects, {}",
            module.name(),
            report.defects.len(),
            report.stats
        );

        Ok(report)
    }

    fn evaluate(&self, rule: &dyn Rule, target: Target<'_>, ctx: &RuleContext<'_>) -> Evaluation {
        if !rule.applies_to(target.kind()) {
            return Evaluation::Skipped;
        }

        let result = if self.config.isolate_faults {
            match panic::catch_unwind(AssertUnwindSafe(|| rule.check(target, ctx))) {
                Ok(result) => result,
                Err(payload) => Err(Error::RulePanicked {
                    rule: rule.id().to_string(),
                    message: panic_message(payload.as_ref()),
                }),
            }
        } else {
            rule.check(target, ctx)
        };

        match result {
            Ok(outcome) => Evaluation::Outcome(outcome),
            Err(error @ (Error::RuleFailed { .. } | Error::RulePanicked { .. })) => {
                Evaluation::Fault(error)
            }
            Err(other) => Evaluation::Fault(Error::RuleFailed {
                rule: rule.id().to_string(),
                message: other.to_string(),
            }),
        }
    }

    fn record(
        &self,
        report: &mut AnalysisReport,
        module: &Module,
        target: &Target<'_>,
        rules: &[&dyn Rule],
        evaluations: Vec<Evaluation>,
    ) -> Result<()> {
        for (rule, evaluation) in rules.iter().zip(evaluations) {
            match evaluation {
                Evaluation::Skipped => report.stats.not_applicable += 1,
                Evaluation::Outcome(RuleOutcome::NotApplicable) => {
                    report.stats.evaluations += 1;
                    report.stats.not_applicable += 1;
                }
                Evaluation::Outcome(RuleOutcome::Applied(defects)) => {
                    report.stats.evaluations += 1;
                    report.stats.applied += 1;
                    report.defects.extend(defects);
                }
                Evaluation::Fault(error) => {
                    report.stats.evaluations += 1;
                    report.stats.faults += 1;

                    let location = target.location(module);
                    log::warn!("{} on {}", error, location);
                    if self.config.fail_fast {
                        return Err(error);
                    }

                    report.diagnostics.push(
                        Diagnostic::new(
                            DiagnosticSeverity::Error,
                            DiagnosticCategory::Rule,
                            format!("{} on {}", error, location),
                        )
                        .with_rule(rule.id())
                        .with_token(target.token()),
                    );
                }
            }
        }

        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{method::Method, typesystem::CilType},
        rules::target::TargetKind,
        test::{scenario_module, PanickingRule},
    };

    struct FailingRule;

    impl Rule for FailingRule {
        fn id(&self) -> &str {
            "test.failing"
        }

        fn name(&self) -> &str {
            "Failing"
        }

        fn description(&self) -> &str {
            "Fails on every type"
        }

        fn check_type(&self, ty: &CilType, _ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
            Err(Error::RuleFailed {
                rule: self.id().to_string(),
                message: format!("can not handle {}", ty.name),
            })
        }
    }

    struct MethodOnly;

    impl Rule for MethodOnly {
        fn id(&self) -> &str {
            "test.method-only"
        }

        fn name(&self) -> &str {
            "Method only"
        }

        fn description(&self) -> &str {
            "Applies to every method without findings"
        }

        fn applies_to(&self, kind: TargetKind) -> bool {
            kind == TargetKind::Method
        }

        fn check_method(&self, method: &Method, _ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
            if method.token.is_null() {
                return Err(Error::MethodNotFound(method.token));
            }
            Ok(RuleOutcome::clean())
        }
    }

    fn registry_with<R: Rule + 'static>(rule: R) -> Result<RuleRegistry> {
        let mut registry = RuleRegistry::with_defaults();
        registry.register(rule)?;
        Ok(registry)
    }

    #[test]
    fn test_stats_add_up() -> crate::Result<()> {
        let module = scenario_module()?;
        let runner = Runner::new(registry_with(MethodOnly)?, AnalysisConfig::sequential());
        let report = runner.analyze(&module)?;
        let stats = report.stats();

        assert_eq!(stats.targets, 1 + module.types().len() + module.method_count());
        assert_eq!(stats.rules, 3);
        assert_eq!(stats.faults, 0);
        assert_eq!(stats.applied + stats.not_applicable, stats.targets * stats.rules);
        assert!(stats.applied >= module.method_count());
        assert!(!report.diagnostics().has_any());
        Ok(())
    }

    #[test]
    fn test_faults_become_diagnostics() -> crate::Result<()> {
        let module = scenario_module()?;
        let runner = Runner::new(registry_with(FailingRule)?, AnalysisConfig::default());
        let report = runner.analyze(&module)?;

        assert_eq!(report.stats().faults, module.types().len());
        let faults = report.diagnostics().by_rule("test.failing");
        assert_eq!(faults.len(), module.types().len());
        assert_eq!(faults[0].category, DiagnosticCategory::Rule);
        assert_eq!(faults[0].token, Some(module.types()[0].token));

        // The other rules still ran
        let clean = Runner::new(RuleRegistry::with_defaults(), AnalysisConfig::default());
        assert_eq!(report.defects(), clean.analyze(&module)?.defects());
        Ok(())
    }

    #[test]
    fn test_panics_are_isolated() -> crate::Result<()> {
        let module = scenario_module()?;
        let runner = Runner::new(registry_with(PanickingRule)?, AnalysisConfig::default());
        let report = runner.analyze(&module)?;

        assert!(report.stats().faults > 0);
        assert!(report.diagnostics().has_errors());
        assert!(report
            .diagnostics()
            .by_rule(PanickingRule::ID)
            .iter()
            .all(|diag| diag.message.contains("panicked")));
        assert!(report.has_defects());
        Ok(())
    }

    #[test]
    fn test_fail_fast_returns_first_fault() -> crate::Result<()> {
        let module = scenario_module()?;
        let runner = Runner::new(registry_with(FailingRule)?, AnalysisConfig::strict());

        match runner.analyze(&module) {
            Err(Error::RuleFailed { rule, message }) => {
                assert_eq!(rule, "test.failing");
                assert!(message.contains(&module.types()[0].name));
            }
            other => panic!("expected rule failure, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_disabled_rules_are_skipped() -> crate::Result<()> {
        let module = scenario_module()?;
        let config = AnalysisConfig::sequential().disable("test.failing");
        let report = Runner::new(registry_with(FailingRule)?, config).analyze(&module)?;

        assert_eq!(report.stats().faults, 0);
        assert_eq!(report.stats().rules, 2);
        assert_eq!(
            report.diagnostics().by_category(DiagnosticCategory::Runner).len(),
            1
        );
        Ok(())
    }

    #[test]
    fn test_empty_registry_warns() -> crate::Result<()> {
        let module = scenario_module()?;
        let report = Runner::new(RuleRegistry::new(), AnalysisConfig::default()).analyze(&module)?;
        assert!(!report.has_defects());
        assert_eq!(report.stats().evaluations, 0);
        assert_eq!(report.diagnostics().count(), 1);
        Ok(())
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
