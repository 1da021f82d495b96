use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Two very different things can go wrong while auditing a module: the metadata handed to the
/// engine can violate the data model (a method that claims to be both `abstract` and `static`,
/// a type that transitively derives from itself), or a single rule can fault while evaluating a
/// single target. The first is surfaced to whoever builds the [`crate::metadata::module::Module`],
/// the second is normally caught by the [`crate::rules::Runner`] and recorded as a
/// [`crate::metadata::diagnostics::Diagnostic`] instead of aborting the run.
///
/// # Error Categories
///
/// ## Metadata Errors
/// - [`Error::Malformed`] - A data-model invariant was violated while building the view
/// - [`Error::TypeNotFound`] - A type token does not resolve inside the module
/// - [`Error::MethodNotFound`] - A method token does not resolve inside the module
///
/// ## Rule Errors
/// - [`Error::RuleFailed`] - A rule reported an internal fault for a target
/// - [`Error::RulePanicked`] - A rule panicked and the runner isolated the fault
/// - [`Error::DuplicateRule`] - Two rules with the same identifier were registered
///
/// # Examples
///
/// ```rust
/// use dotaudit::{
///     metadata::method::MethodModifiers,
///     metadata::module::{MethodBuilder, ModuleBuilder, TypeBuilder},
///     Error,
/// };
///
/// let mut builder = ModuleBuilder::new("Sample.dll");
/// let result = builder.add_type(TypeBuilder::class("Sample", "Broken").method(
///     MethodBuilder::new("Both").modifiers(MethodModifiers::ABSTRACT | MethodModifiers::STATIC),
/// ));
///
/// match result {
///     Err(Error::Malformed { message, .. }) => println!("rejected: {message}"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata is damaged and can not be analysed.
    ///
    /// This error indicates that the metadata violates one of the invariants the rule engine
    /// depends on. Rules are never evaluated against malformed nodes, because every verdict that
    /// depends on the violated property would be unreliable. The error includes the source
    /// location where the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),

    /// Failed to find a type in the module.
    ///
    /// The associated [`Token`] identifies which type was not found.
    #[error("Failed to find type in module - {0}")]
    TypeNotFound(Token),

    /// Failed to find a method in the module.
    ///
    /// The associated [`Token`] identifies which method was not found.
    #[error("Failed to find method in module - {0}")]
    MethodNotFound(Token),

    /// A rule could not complete its evaluation of a target.
    ///
    /// Rules return this error for conditions they can not classify. The runner records it as a
    /// diagnostic and continues with the next (rule, target) pair.
    #[error("Rule '{rule}' failed: {message}")]
    RuleFailed {
        /// Identifier of the failing rule
        rule: String,
        /// Description of the fault
        message: String,
    },

    /// A rule panicked while evaluating a target.
    ///
    /// Only produced when the runner isolates faults; the panic payload is preserved as text.
    #[error("Rule '{rule}' panicked: {message}")]
    RulePanicked {
        /// Identifier of the panicking rule
        rule: String,
        /// Panic payload, if it was a string
        message: String,
    },

    /// A rule with the same identifier is already registered.
    #[error("Rule '{0}' is already registered")]
    DuplicateRule(String),
}
