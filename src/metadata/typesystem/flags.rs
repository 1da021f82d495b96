use bitflags::bitflags;
use strum::Display;

/// Mask for extracting type visibility information.
pub const TYPE_VISIBILITY_MASK: u32 = 0x0000_0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Type semantics flags of a `TypeDef` entry.
    ///
    /// The visibility bits are not flags but a three-bit field; use [`TypeVisibility`] for them.
    pub struct TypeAttributes: u32 {
        /// Class fields are laid out sequentially in declaration order.
        const SEQUENTIAL_LAYOUT = 0x0000_0008;
        /// Field layout is explicitly specified using field offsets.
        const EXPLICIT_LAYOUT = 0x0000_0010;
        /// Type is an interface definition.
        const INTERFACE = 0x0000_0020;
        /// Class is abstract and cannot be instantiated directly.
        const ABSTRACT = 0x0000_0080;
        /// Class is sealed and cannot be inherited from.
        const SEALED = 0x0000_0100;
        /// Class name is special.
        const SPECIAL_NAME = 0x0000_0400;
        /// Class is imported from a COM type library.
        const IMPORT = 0x0000_1000;
        /// Class can be serialized.
        const SERIALIZABLE = 0x0000_2000;
        /// Initialize the class before the first static field access.
        const BEFORE_FIELD_INIT = 0x0010_0000;
        /// CLI provides special behavior, depending upon the name of the type.
        const RT_SPECIAL_NAME = 0x0000_0800;
        /// Type has security associated with it.
        const HAS_SECURITY = 0x0004_0000;
    }
}

/// Visibility of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TypeVisibility {
    /// Top-level type internal to the assembly
    NotPublic,
    /// Top-level type visible outside the assembly
    Public,
    /// Nested type with public visibility
    NestedPublic,
    /// Nested type with private visibility
    NestedPrivate,
    /// Nested type with family (protected) visibility
    NestedFamily,
    /// Nested type with assembly (internal) visibility
    NestedAssembly,
    /// Nested type with family AND assembly visibility
    NestedFamilyAndAssembly,
    /// Nested type with family OR assembly visibility
    NestedFamilyOrAssembly,
}

impl TypeVisibility {
    /// Extract visibility from raw type attributes
    #[must_use]
    pub fn from_type_flags(flags: u32) -> Self {
        match flags & TYPE_VISIBILITY_MASK {
            0x0001 => TypeVisibility::Public,
            0x0002 => TypeVisibility::NestedPublic,
            0x0003 => TypeVisibility::NestedPrivate,
            0x0004 => TypeVisibility::NestedFamily,
            0x0005 => TypeVisibility::NestedAssembly,
            0x0006 => TypeVisibility::NestedFamilyAndAssembly,
            0x0007 => TypeVisibility::NestedFamilyOrAssembly,
            _ => TypeVisibility::NotPublic,
        }
    }

    /// Returns the raw three-bit encoding
    #[must_use]
    pub fn bits(&self) -> u32 {
        match self {
            TypeVisibility::NotPublic => 0x0000,
            TypeVisibility::Public => 0x0001,
            TypeVisibility::NestedPublic => 0x0002,
            TypeVisibility::NestedPrivate => 0x0003,
            TypeVisibility::NestedFamily => 0x0004,
            TypeVisibility::NestedAssembly => 0x0005,
            TypeVisibility::NestedFamilyAndAssembly => 0x0006,
            TypeVisibility::NestedFamilyOrAssembly => 0x0007,
        }
    }

    /// Returns true for the nested visibilities
    #[must_use]
    pub fn is_nested(&self) -> bool {
        !matches!(self, TypeVisibility::NotPublic | TypeVisibility::Public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_roundtrip() {
        for bits in 0..=7 {
            assert_eq!(TypeVisibility::from_type_flags(bits).bits(), bits);
        }
        assert!(!TypeVisibility::Public.is_nested());
        assert!(TypeVisibility::NestedPrivate.is_nested());
    }

    #[test]
    fn test_visibility_ignores_semantic_bits() {
        let raw = TypeAttributes::ABSTRACT.bits() | TypeAttributes::SEALED.bits() | 0x0002;
        assert_eq!(
            TypeVisibility::from_type_flags(raw),
            TypeVisibility::NestedPublic
        );
    }
}
