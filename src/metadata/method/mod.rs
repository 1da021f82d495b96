//! Method definitions of the metadata view.
//!
//! A [`Method`] belongs to exactly one [`crate::metadata::typesystem::CilType`], which owns it.
//! The method keeps the token of its declaring type so the owner can be resolved in O(1) through
//! [`crate::metadata::module::Module::declaring_type`].
//!
//! # Key Components
//!
//! - [`Method`] - A method definition with flags, signature and annotations
//! - [`MethodKind`] - The validated structural classification (abstract, virtual, override, instance, static)
//! - [`MethodModifiers`], [`MethodVtableFlags`], [`MemberAccess`] - Raw attribute groups

mod types;

pub use types::*;

use std::fmt;

use crate::{
    metadata::{
        security::{Annotation, HasAnnotations},
        token::Token,
    },
    Result,
};

/// Name of instance constructors
pub const CONSTRUCTOR_NAME: &str = ".ctor";
/// Name of type initializers
pub const TYPE_INITIALIZER_NAME: &str = ".cctor";

/// A method definition.
///
/// Methods are created by the [`crate::metadata::module::ModuleBuilder`] and are immutable
/// afterwards. The structural [`MethodKind`] is derived from the flags at construction time, so
/// a `Method` value never carries a contradictory flag combination.
#[derive(Debug, Clone)]
pub struct Method {
    /// `MethodDef` token of this method
    pub token: Token,
    /// `TypeDef` token of the type owning this method
    pub declaring_type: Token,
    /// Simple name, e.g. `Dispose` or `.ctor`
    pub name: String,
    /// Accessibility of the method
    pub access: MemberAccess,
    /// Modifier flags as declared
    pub modifiers: MethodModifiers,
    /// Vtable layout flags as declared
    pub vtable: MethodVtableFlags,
    /// Full type names of the parameters, in order
    pub params: Vec<String>,
    /// Full type name of the return type
    pub return_type: String,
    /// Declarative annotations, in declaration order
    pub annotations: Vec<Annotation>,
    kind: MethodKind,
}

impl Method {
    /// Creates a method, classifying its flags.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the modifier flags are contradictory, see
    /// [`MethodKind::classify`].
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        token: Token,
        declaring_type: Token,
        name: String,
        access: MemberAccess,
        modifiers: MethodModifiers,
        vtable: MethodVtableFlags,
        params: Vec<String>,
        return_type: String,
        annotations: Vec<Annotation>,
    ) -> Result<Self> {
        let kind = MethodKind::classify(modifiers, vtable)
            .map_err(|error| malformed_error!("Method '{}' ({}) - {}", name, token, error))?;

        Ok(Method {
            token,
            declaring_type,
            name,
            access,
            modifiers,
            vtable,
            params,
            return_type,
            annotations,
            kind,
        })
    }

    /// Returns the structural kind of this method
    #[must_use]
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Returns true if the method has no body of its own
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.kind == MethodKind::Abstract
    }

    /// Returns true if the method is defined on the type rather than per instance
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.kind == MethodKind::Static
    }

    /// Returns true if the method is dispatched through the vtable
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.kind.is_virtual()
    }

    /// Returns true if the method is marked `final`, forbidding further overrides
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.modifiers.contains(MethodModifiers::FINAL)
    }

    /// Returns true if a derived type may override this method
    ///
    /// Only the method's own flags are considered; whether the declaring type can be derived
    /// from at all is answered by [`crate::metadata::module::Module::can_be_derived`].
    #[must_use]
    pub fn is_overridable(&self) -> bool {
        self.is_virtual() && !self.is_sealed()
    }

    /// Returns true for instance constructors and type initializers
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME || self.name == TYPE_INITIALIZER_NAME
    }

    /// Returns true if both methods have the same name and parameter types
    #[must_use]
    pub fn same_signature(&self, other: &Method) -> bool {
        self.name == other.name && self.params == other.params
    }

    /// Returns the raw ECMA-335 `MethodAttributes` value
    #[must_use]
    pub fn raw_flags(&self) -> u32 {
        self.access.bits() | self.modifiers.bits() | self.vtable.bits()
    }
}

impl HasAnnotations for Method {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}({})", self.return_type, self.name, self.params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::security::SecurityAction, Error};

    fn method(modifiers: MethodModifiers, vtable: MethodVtableFlags) -> Result<Method> {
        Method::new(
            Token::method_def(1),
            Token::type_def(1),
            "Run".to_string(),
            MemberAccess::Public,
            modifiers,
            vtable,
            vec!["System.Int32".to_string()],
            "System.Void".to_string(),
            vec![Annotation::security(SecurityAction::Demand, "Perm")],
        )
    }

    #[test]
    fn test_method_predicates() -> crate::Result<()> {
        let virt = method(MethodModifiers::VIRTUAL, MethodVtableFlags::NEW_SLOT)?;
        assert_eq!(virt.kind(), MethodKind::Virtual);
        assert!(virt.is_virtual());
        assert!(virt.is_overridable());
        assert!(!virt.is_sealed());

        let sealed = method(
            MethodModifiers::VIRTUAL | MethodModifiers::FINAL,
            MethodVtableFlags::REUSE_SLOT,
        )?;
        assert_eq!(sealed.kind(), MethodKind::Override);
        assert!(sealed.is_sealed());
        assert!(!sealed.is_overridable());

        let stat = method(MethodModifiers::STATIC, MethodVtableFlags::empty())?;
        assert!(stat.is_static());
        assert!(!stat.is_overridable());
        assert_eq!(stat.annotations().len(), 1);
        Ok(())
    }

    #[test]
    fn test_malformed_method_names_itself() {
        let result = method(
            MethodModifiers::ABSTRACT | MethodModifiers::STATIC,
            MethodVtableFlags::empty(),
        );
        match result {
            Err(Error::Malformed { message, .. }) => {
                assert!(message.contains("Run"));
                assert!(message.contains("0x06000001"));
            }
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_flags_and_display() -> crate::Result<()> {
        let m = method(
            MethodModifiers::VIRTUAL | MethodModifiers::HIDE_BY_SIG,
            MethodVtableFlags::NEW_SLOT,
        )?;
        assert_eq!(m.raw_flags(), 0x01C6);
        assert_eq!(m.to_string(), "System.Void Run(System.Int32)");
        Ok(())
    }
}
