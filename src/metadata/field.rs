//! Field definitions of the metadata view.

use bitflags::bitflags;

use crate::metadata::{
    method::MemberAccess,
    security::{Annotation, HasAnnotations},
    token::Token,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Field modifiers (the access bits are kept in [`MemberAccess`])
    pub struct FieldModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Field can only be initialized, not written to after init
        const INIT_ONLY = 0x0020;
        /// Value is compile time constant
        const LITERAL = 0x0040;
        /// Reserved (to indicate this field should not be serialized when type is remoted)
        const NOT_SERIALIZED = 0x0080;
        /// Field is special
        const SPECIAL_NAME = 0x0200;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
        /// CLI provides 'special' behavior, depending upon the name of the field
        const RTSPECIAL_NAME = 0x0400;
    }
}

/// A field definition, owned by its declaring type.
#[derive(Debug, Clone)]
pub struct Field {
    /// `Field` token of this field
    pub token: Token,
    /// `TypeDef` token of the type owning this field
    pub declaring_type: Token,
    /// Simple name
    pub name: String,
    /// Full type name of the field
    pub field_type: String,
    /// Accessibility of the field
    pub access: MemberAccess,
    /// Modifier flags as declared
    pub modifiers: FieldModifiers,
    /// Declarative annotations, in declaration order
    pub annotations: Vec<Annotation>,
}

impl Field {
    /// Returns true if the field is defined on the type rather than per instance
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(FieldModifiers::STATIC)
    }

    /// Returns true for compile time constants
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.modifiers.contains(FieldModifiers::LITERAL)
    }
}

impl HasAnnotations for Field {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}
