//! Defects reported by rules.

use std::fmt;

use strum::{Display, EnumIter, EnumString};

use crate::metadata::{
    method::Method,
    module::Module,
    token::Token,
    typesystem::CilType,
};

/// How serious a defect is.
///
/// Ordered from least to most severe, so reports can be filtered with comparisons.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Worth a look during review, not necessarily wrong
    Audit,
    /// Minor issue
    Low,
    /// Issue that weakens a guarantee the code tries to give
    Medium,
    /// Issue that silently disables a security guarantee
    High,
    /// Issue that is exploitable as is
    Critical,
}

/// Where in the module a defect was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// The module as a whole
    Assembly {
        /// File name of the module
        name: String,
    },
    /// A type definition
    Type {
        /// `TypeDef` token
        token: Token,
        /// Namespace-qualified name
        name: String,
    },
    /// A method definition
    Method {
        /// `MethodDef` token
        token: Token,
        /// `Namespace.Type::Name(Params)`
        name: String,
    },
}

impl Location {
    /// Location of the module itself
    #[must_use]
    pub fn assembly(module: &Module) -> Self {
        Location::Assembly {
            name: module.name().to_string(),
        }
    }

    /// Location of a type definition
    #[must_use]
    pub fn of_type(ty: &CilType) -> Self {
        Location::Type {
            token: ty.token,
            name: ty.fullname(),
        }
    }

    /// Location of a method, named through its declaring type
    #[must_use]
    pub fn of_method(module: &Module, method: &Method) -> Self {
        Location::Method {
            token: method.token,
            name: module.method_full_name(method),
        }
    }

    /// Returns the metadata token of the location
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            Location::Assembly { .. } => Token::assembly(),
            Location::Type { token, .. } | Location::Method { token, .. } => *token,
        }
    }

    /// Returns the display name of the location
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Location::Assembly { name }
            | Location::Type { name, .. }
            | Location::Method { name, .. } => name,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Assembly { name } => write!(f, "assembly {}", name),
            Location::Type { token, name } => write!(f, "type {} ({})", name, token),
            Location::Method { token, name } => write!(f, "method {} ({})", name, token),
        }
    }
}

/// One reported rule violation.
///
/// Immutable once created; the caller that requested the check owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Defect {
    location: Location,
    rule: String,
    message: String,
    severity: Severity,
}

impl Defect {
    /// Creates a new defect.
    ///
    /// # Arguments
    ///
    /// * `location` - Where the defect was found
    /// * `rule` - Identifier of the reporting rule
    /// * `severity` - How serious the defect is
    /// * `message` - Human-readable explanation
    pub fn new(
        location: Location,
        rule: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Defect {
            location,
            rule: rule.into(),
            message: message.into(),
            severity,
        }
    }

    /// Returns where the defect was found
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Returns the identifier of the reporting rule
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Returns the explanation
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the severity
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.severity, self.location, self.message, self.rule
        )
    }
}
