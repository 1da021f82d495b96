//! Declarative security annotations and the matcher rules use to query them.
//!
//! Compiled .NET modules attach declarative Code Access Security permissions to assemblies,
//! types and methods. Each declaration pairs a [`SecurityAction`] (when the runtime checks the
//! permission) with a permission class and its named properties. Rules never look at the encoded
//! permission blobs: the metadata view hands them decoded [`Annotation`] values, and rules select
//! the ones they care about through the matcher.
//!
//! # Key Components
//!
//! - [`crate::metadata::security::Annotation`] - A (kind, action, named-properties) triple attached to a node
//! - [`crate::metadata::security::AnnotationKind`] - Declarative security versus plain custom attributes
//! - [`crate::metadata::security::SecurityAction`] - The closed set of ECMA-335 security actions
//! - [`crate::metadata::security::HasAnnotations`] - Implemented by every node that can carry annotations
//! - [`crate::metadata::security::find`] - Exact (kind, action) lookup returning a lazy, restartable sequence
//! - [`crate::metadata::security::AnnotationFilter`] - Lookup with additional property constraints
//!
//! # Usage Examples
//!
//! ```rust
//! use dotaudit::metadata::security::{
//!     find, security_classes, Annotation, AnnotationKind, SecurityAction,
//! };
//!
//! let annotations = vec![
//!     Annotation::security(SecurityAction::LinkDemand, security_classes::SECURITY_PERMISSION),
//!     Annotation::security(SecurityAction::InheritanceDemand, security_classes::SECURITY_PERMISSION)
//!         .with_property("ControlAppDomain", true),
//! ];
//!
//! let demands = find(&annotations, AnnotationKind::SecurityDemand, SecurityAction::InheritanceDemand);
//! assert_eq!(demands.count(), 1);
//! ```
//!
//! # Thread Safety
//!
//! All types in this module are immutable once built and are [`Send`] and [`Sync`].

mod annotation;
mod matcher;
mod types;

pub use annotation::*;
pub use matcher::*;
pub use types::*;
