//! The rule engine.
//!
//! A [`Rule`] is a pure function of a [`Target`] (the assembly, a type or a method) and a
//! [`RuleContext`]. It answers [`RuleOutcome::NotApplicable`] when it has nothing to say about a
//! target, or [`RuleOutcome::Applied`] with zero or more [`Defect`]s. Rules are collected in a
//! [`RuleRegistry`] and evaluated against a built [`crate::metadata::module::Module`] by the
//! [`Runner`], which produces an [`AnalysisReport`].
//!
//! # Key Components
//!
//! - [`Rule`] - The rule contract, one check per target kind
//! - [`Target`], [`TargetKind`], [`RuleOutcome`] - Evaluation inputs and outputs
//! - [`Defect`], [`Location`], [`Severity`] - Reported findings
//! - [`RuleContext`] - Read-only context passed to each evaluation
//! - [`RuleRegistry`] - Ordered set of rules with unique identifiers
//! - [`Runner`], [`AnalysisReport`], [`RunStats`] - Whole-module evaluation
//! - [`AnalysisConfig`] - Scheduling and fault handling options
//! - [`security`] - The built-in security rules
//!
//! # Examples
//!
//! ```rust
//! use dotaudit::metadata::module::{MethodBuilder, ModuleBuilder, TypeBuilder};
//! use dotaudit::metadata::security::{Annotation, SecurityAction};
//! use dotaudit::rules::{security::NonVirtualInheritanceDemandRule, Rule, RuleContext, Target};
//!
//! let demand = Annotation::security(
//!     SecurityAction::InheritanceDemand,
//!     "System.Security.Permissions.SecurityPermissionAttribute",
//! );
//!
//! let mut builder = ModuleBuilder::new("Sample.dll");
//! builder.add_type(
//!     TypeBuilder::class("Sample", "Service")
//!         .method(MethodBuilder::virtual_method("Open").annotation(demand.clone()))
//!         .method(MethodBuilder::static_method("Create").annotation(demand)),
//! )?;
//! let module = builder.build()?;
//!
//! let ctx = RuleContext::minimal(&module);
//! let rule = NonVirtualInheritanceDemandRule::default();
//! let open = &module.types()[0].methods[0];
//! let create = &module.types()[0].methods[1];
//!
//! assert!(!rule.check(Target::Method(open), &ctx)?.is_applicable());
//! assert_eq!(rule.check(Target::Method(create), &ctx)?.defects().len(), 1);
//! # Ok::<(), dotaudit::Error>(())
//! ```

mod config;
mod context;
mod defect;
mod registry;
mod runner;
mod target;
mod traits;

pub mod security;

pub use config::AnalysisConfig;
pub use context::RuleContext;
pub use defect::{Defect, Location, Severity};
pub use registry::RuleRegistry;
pub use runner::{AnalysisReport, RunStats, Runner};
pub use target::{RuleOutcome, Target, TargetKind};
pub use traits::Rule;
