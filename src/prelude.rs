//! # dotaudit Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotaudit library. Import this module to get quick access to the essential
//! types for building a module view and running rules against it.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotaudit operations
pub use crate::Error;

/// The result type used throughout dotaudit
pub use crate::Result;

// ================================================================================================
// Metadata View
// ================================================================================================

/// Metadata token type for identifying types, methods and fields
pub use crate::metadata::token::Token;

/// The module view and its builders
pub use crate::metadata::module::{FieldBuilder, MethodBuilder, Module, ModuleBuilder, TypeBuilder};

/// Type definitions
pub use crate::metadata::typesystem::{CilType, TypeAttributes, TypeReference, TypeVisibility};

/// Method definitions
pub use crate::metadata::method::{
    MemberAccess, Method, MethodKind, MethodModifiers, MethodVtableFlags,
};

/// Field definitions
pub use crate::metadata::field::{Field, FieldModifiers};

/// Declarative annotations and the annotation matcher
pub use crate::metadata::security::{
    find, find_filtered, Annotation, AnnotationFilter, AnnotationKind, ArgumentValue,
    HasAnnotations, SecurityAction,
};

/// Diagnostics about the analysis itself
pub use crate::metadata::diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics,
};

// ================================================================================================
// Rule Engine
// ================================================================================================

/// Rule contract, targets and outcomes
pub use crate::rules::{Rule, RuleContext, RuleOutcome, Target, TargetKind};

/// Reported findings
pub use crate::rules::{Defect, Location, Severity};

/// Registry, runner and run configuration
pub use crate::rules::{AnalysisConfig, AnalysisReport, RuleRegistry, RunStats, Runner};

/// Built-in rules
pub use crate::rules::security::{
    NonVirtualInheritanceDemandConfig, NonVirtualInheritanceDemandRule,
    SealedTypeInheritanceDemandRule,
};
