//! The read-only metadata view the rules operate on.
//!
//! This module models the parts of a compiled .NET module that static analysis rules inspect:
//! type definitions and their inheritance, the methods and fields they own, and the
//! declarative annotations (security demands and custom attributes) attached to each of them.
//! The view is produced once by a loader through the [`module::ModuleBuilder`] and is never
//! mutated afterwards, which lets many rules borrow it at the same time.
//!
//! # Key Components
//!
//! - [`module`] - The [`module::Module`] container, its builders and hierarchy queries
//! - [`typesystem`] - Type definitions, type flags and references between types
//! - [`method`] - Method definitions and their structural classification
//! - [`field`] - Field definitions
//! - [`security`] - Declarative annotations and the annotation matcher
//! - [`token`] - Metadata tokens identifying types, methods and fields
//! - [`diagnostics`] - Observations about the analysis itself
//!
//! # Examples
//!
//! ```rust
//! use dotaudit::metadata::{
//!     module::{MethodBuilder, ModuleBuilder, TypeBuilder},
//!     security::{find, Annotation, AnnotationKind, SecurityAction},
//! };
//!
//! let mut builder = ModuleBuilder::new("Sample.dll");
//! builder.add_type(
//!     TypeBuilder::class("Sample", "Guarded").method(
//!         MethodBuilder::new("Run").annotation(Annotation::security(
//!             SecurityAction::InheritanceDemand,
//!             "System.Security.Permissions.SecurityPermissionAttribute",
//!         )),
//!     ),
//! )?;
//! let module = builder.build()?;
//!
//! let run = module.methods().next().unwrap();
//! assert_eq!(find(run, AnnotationKind::SecurityDemand, SecurityAction::InheritanceDemand).count(), 1);
//! # Ok::<(), dotaudit::Error>(())
//! ```

/// Diagnostics about the analysis itself
pub mod diagnostics;
/// Field definitions
pub mod field;
/// Method definitions and their classification
pub mod method;
/// The module view, its builders and hierarchy queries
pub mod module;
/// Declarative security annotations and matching
pub mod security;
/// Commonly used metadata token type
pub mod token;
/// Type definitions and inheritance
pub mod typesystem;
