//! Type definitions of the metadata view.
//!
//! A [`CilType`] owns its methods and fields. Relations to other types (the base type and the
//! implemented interfaces) are stored as [`TypeReference`] values: a token when the other type is
//! defined in the same module, a plain name otherwise. Tokens are back-references only; the
//! [`crate::metadata::module::Module`] owns every type and resolves them.
//!
//! # Key Components
//!
//! - [`CilType`] - A type definition with its members and annotations
//! - [`TypeReference`] - Reference to a type inside or outside the module
//! - [`TypeAttributes`], [`TypeVisibility`] - Raw type semantics and visibility

mod flags;

pub use flags::*;

use std::fmt;

use crate::metadata::{
    field::Field,
    method::Method,
    security::{Annotation, HasAnnotations},
    token::Token,
};

/// Reference from one type to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReference {
    /// A type defined in the analysed module
    Definition(Token),
    /// A type defined elsewhere, by full name; never followed (no cross-assembly analysis)
    External(String),
}

impl TypeReference {
    /// Returns the token if the referenced type lives in the analysed module
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        match self {
            TypeReference::Definition(token) => Some(*token),
            TypeReference::External(_) => None,
        }
    }
}

impl From<Token> for TypeReference {
    fn from(token: Token) -> Self {
        TypeReference::Definition(token)
    }
}

impl From<&str> for TypeReference {
    fn from(name: &str) -> Self {
        TypeReference::External(name.to_string())
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReference::Definition(token) => write!(f, "{}", token),
            TypeReference::External(name) => write!(f, "{}", name),
        }
    }
}

/// A type definition.
///
/// Created by the [`crate::metadata::module::ModuleBuilder`]; immutable afterwards.
#[derive(Debug, Clone)]
pub struct CilType {
    /// `TypeDef` token of this type
    pub token: Token,
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Visibility of the type
    pub visibility: TypeVisibility,
    /// Semantic flags (abstract, sealed, interface, ...)
    pub flags: TypeAttributes,
    /// Base type, `None` for interfaces and roots such as `System.Object`
    pub base: Option<TypeReference>,
    /// Implemented interfaces, in declaration order
    pub interfaces: Vec<TypeReference>,
    /// Methods owned by this type, in declaration order
    pub methods: Vec<Method>,
    /// Fields owned by this type, in declaration order
    pub fields: Vec<Field>,
    /// Declarative annotations, in declaration order
    pub annotations: Vec<Annotation>,
}

impl CilType {
    /// Returns the namespace-qualified name
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns true if the type can not be instantiated
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeAttributes::ABSTRACT)
    }

    /// Returns true if no type may derive from this type
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.flags.contains(TypeAttributes::SEALED)
    }

    /// Returns true for interface definitions
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(TypeAttributes::INTERFACE)
    }

    /// Returns true for `static` classes, which the compiler emits as abstract and sealed
    #[must_use]
    pub fn is_static_class(&self) -> bool {
        self.is_abstract() && self.is_sealed()
    }

    /// Returns the method with the given token, if this type owns it
    #[must_use]
    pub fn method(&self, token: Token) -> Option<&Method> {
        self.methods.iter().find(|method| method.token == token)
    }

    /// Returns the methods with the given name, in declaration order
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Method> + 'a {
        self.methods.iter().filter(move |method| method.name == name)
    }
}

impl HasAnnotations for CilType {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl fmt::Display for CilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fullname())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, flags: TypeAttributes) -> CilType {
        CilType {
            token: Token::type_def(1),
            namespace: "N".to_string(),
            name: name.to_string(),
            visibility: TypeVisibility::Public,
            flags,
            base: Some(TypeReference::from("System.Object")),
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            annotations: Vec::new(),
        }
    }

    #[test]
    fn test_static_class_is_abstract_and_sealed() {
        let helpers = class("Helpers", TypeAttributes::ABSTRACT | TypeAttributes::SEALED);
        assert!(helpers.is_static_class());
        assert!(helpers.is_sealed());

        assert!(!class("Base", TypeAttributes::ABSTRACT).is_static_class());
        assert!(!class("Leaf", TypeAttributes::SEALED).is_static_class());
        assert!(!class("Plain", TypeAttributes::empty()).is_static_class());
    }

    #[test]
    fn test_fullname_and_references() {
        let ty = class("Widget", TypeAttributes::empty());
        assert_eq!(ty.fullname(), "N.Widget");
        assert_eq!(ty.base.as_ref().and_then(TypeReference::token), None);
        assert_eq!(
            TypeReference::from(Token::type_def(3)).token(),
            Some(Token::type_def(3))
        );
    }
}
