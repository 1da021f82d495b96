// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotaudit
//!
//! A static-analysis rule engine for compiled .NET modules. `dotaudit` evaluates independent,
//! pluggable rules against a read-only view of a module's metadata (types, methods, fields and
//! the declarative security annotations attached to them) and reports defects with a location
//! and a severity.
//!
//! ## Features
//!
//! - **Immutable metadata view** - Built once, validated once, shared by every rule
//! - **Pure rules** - A rule is a function of a target and a context, with one check per target kind
//! - **Parallel evaluation** - Targets are spread over a [`rayon`] pool with deterministic results
//! - **Fault isolation** - A failing or panicking rule becomes a diagnostic, not an aborted run
//!
//! ## Quick Start
//!
//! ```rust
//! use dotaudit::prelude::*;
//!
//! let demand = Annotation::security(
//!     SecurityAction::InheritanceDemand,
//!     "System.Security.Permissions.SecurityPermissionAttribute",
//! )
//! .with_property("ControlAppDomain", true);
//!
//! let mut builder = ModuleBuilder::new("Sample.dll");
//! builder.add_type(
//!     TypeBuilder::class("Sample", "Plugin")
//!         .method(MethodBuilder::virtual_method("Load").annotation(demand.clone()))
//!         .method(MethodBuilder::new("Unload").annotation(demand)),
//! )?;
//! let module = builder.build()?;
//!
//! let report = Runner::default().analyze(&module)?;
//! for defect in report.defects() {
//!     println!("{defect}");
//! }
//! assert_eq!(report.by_severity(Severity::High).count(), 1);
//! # Ok::<(), dotaudit::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - The module view: types, methods, fields, annotations and their builders
//! - [`rules`] - The rule contract, the built-in rules, the registry and the runner
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Malformed metadata is rejected while the view is built, before any rule runs:
//!
//! ```rust
//! use dotaudit::{metadata::module::{ModuleBuilder, TypeBuilder}, metadata::token::Token, Error};
//!
//! let mut builder = ModuleBuilder::new("Cycle.dll");
//! builder.add_type(TypeBuilder::class("N", "A").extends(Token::type_def(2)))?;
//! builder.add_type(TypeBuilder::class("N", "B").extends(Token::type_def(1)))?;
//!
//! match builder.build() {
//!     Err(Error::Malformed { message, .. }) => println!("Malformed module: {message}"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! # Ok::<(), dotaudit::Error>(())
//! ```
//!
//! Faults raised by rules are recorded in [`rules::AnalysisReport::diagnostics`] unless
//! [`rules::AnalysisConfig::fail_fast`] is set.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotaudit::prelude::*;
///
/// let registry = RuleRegistry::with_defaults();
/// let runner = Runner::new(registry, AnalysisConfig::sequential());
/// assert_eq!(runner.registry().len(), 2);
/// ```
pub mod prelude;

/// The read-only metadata view of a compiled module
pub mod metadata;

/// The rule engine and the built-in rules
pub mod rules;

/// `dotaudit` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotaudit` Error type
pub use error::Error;
