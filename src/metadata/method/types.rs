//! Method attribute flags and the structural classification derived from them.
//!
//! # Key Types
//! - [`MethodModifiers`], [`MethodVtableFlags`]: Raw ECMA-335 `MethodAttributes` groups
//! - [`MemberAccess`]: Accessibility shared by methods and fields
//! - [`MethodKind`]: The validated structural kind every rule reasons about

use bitflags::bitflags;
use strum::Display;

use crate::Result;

/// Bitmask for `ACCESS` state extraction
pub const METHOD_ACCESS_MASK: u32 = 0x0007;
/// Bitmask for `VTABLE_LAYOUT` information extraction
pub const METHOD_VTABLE_LAYOUT_MASK: u32 = 0x0100;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method vtable layout flags
    pub struct MethodVtableFlags: u32 {
        /// Method reuses existing slot in vtable
        const REUSE_SLOT = 0x0000;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
    }
}

impl MethodVtableFlags {
    /// Extract vtable layout flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        let vtable = flags & METHOD_VTABLE_LAYOUT_MASK;
        Self::from_bits_truncate(vtable)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method can only be overriden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, dpending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
        /// Method has security associate with it
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code
        const REQUIRE_SEC_OBJECT = 0x8000;
    }
}

impl MethodModifiers {
    /// Extract method modifiers from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        let modifiers = flags & !METHOD_ACCESS_MASK & !METHOD_VTABLE_LAYOUT_MASK;
        Self::from_bits_truncate(modifiers)
    }
}

/// Member accessibility, as encoded in the low three bits of method and field attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MemberAccess {
    /// Member not referenceable
    CompilerControlled,
    /// Accessible only by the parent type
    Private,
    /// Accessible by sub-types only in this Assembly
    FamilyAndAssembly,
    /// Accessibly by anyone in the Assembly
    Assembly,
    /// Accessible only by type and sub-types
    Family,
    /// Accessibly by sub-types anywhere, plus anyone in assembly
    FamilyOrAssembly,
    /// Accessibly by anyone who has visibility to this scope
    Public,
}

impl MemberAccess {
    /// Extract the access level from raw member attributes
    #[must_use]
    pub fn from_member_flags(flags: u32) -> Self {
        match flags & METHOD_ACCESS_MASK {
            0x0001 => MemberAccess::Private,
            0x0002 => MemberAccess::FamilyAndAssembly,
            0x0003 => MemberAccess::Assembly,
            0x0004 => MemberAccess::Family,
            0x0005 => MemberAccess::FamilyOrAssembly,
            0x0006 => MemberAccess::Public,
            _ => MemberAccess::CompilerControlled,
        }
    }

    /// Returns the raw three-bit encoding
    #[must_use]
    pub fn bits(&self) -> u32 {
        match self {
            MemberAccess::CompilerControlled => 0x0000,
            MemberAccess::Private => 0x0001,
            MemberAccess::FamilyAndAssembly => 0x0002,
            MemberAccess::Assembly => 0x0003,
            MemberAccess::Family => 0x0004,
            MemberAccess::FamilyOrAssembly => 0x0005,
            MemberAccess::Public => 0x0006,
        }
    }

    /// Returns true if a derived type in another assembly can reach the member
    #[must_use]
    pub fn is_visible_to_subclasses(&self) -> bool {
        matches!(
            self,
            MemberAccess::Family | MemberAccess::FamilyOrAssembly | MemberAccess::Public
        )
    }
}

/// The structural kind of a method.
///
/// Every method is exactly one of these. The raw flags allow contradictory combinations, so the
/// kind is derived once by [`MethodKind::classify`] while the view is built and malformed
/// combinations are rejected there. Whether a virtual method is additionally sealed (`final`)
/// is tracked separately on the method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MethodKind {
    /// Virtual method without a body; every concrete subclass must override it
    Abstract,
    /// Virtual method introducing a new vtable slot
    Virtual,
    /// Virtual method reusing the slot of an inherited method
    Override,
    /// Instance method without virtual dispatch
    Instance,
    /// Method defined on the type rather than per instance
    Static,
}

impl MethodKind {
    /// Derives the structural kind from the modifier and vtable flags.
    ///
    /// # Arguments
    ///
    /// * `modifiers` - The method's modifier flags
    /// * `vtable` - The method's vtable layout flags
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if:
    /// - A static method is also abstract, virtual or final
    /// - An abstract method is not virtual, or is also final
    /// - A final method is not virtual
    pub fn classify(modifiers: MethodModifiers, vtable: MethodVtableFlags) -> Result<Self> {
        let is_static = modifiers.contains(MethodModifiers::STATIC);
        let is_abstract = modifiers.contains(MethodModifiers::ABSTRACT);
        let is_virtual = modifiers.contains(MethodModifiers::VIRTUAL);
        let is_final = modifiers.contains(MethodModifiers::FINAL);

        if is_static {
            if is_abstract {
                return Err(malformed_error!("Method can not be both static and abstract"));
            }
            if is_virtual {
                return Err(malformed_error!("Method can not be both static and virtual"));
            }
            if is_final {
                return Err(malformed_error!("Method can not be both static and final"));
            }
            return Ok(MethodKind::Static);
        }

        if is_abstract {
            if !is_virtual {
                return Err(malformed_error!("Abstract method must also be virtual"));
            }
            if is_final {
                return Err(malformed_error!("Method can not be both abstract and final"));
            }
            return Ok(MethodKind::Abstract);
        }

        if is_final && !is_virtual {
            return Err(malformed_error!("Final method must also be virtual"));
        }

        if is_virtual {
            if vtable.contains(MethodVtableFlags::NEW_SLOT) {
                Ok(MethodKind::Virtual)
            } else {
                Ok(MethodKind::Override)
            }
        } else {
            Ok(MethodKind::Instance)
        }
    }

    /// Returns true for every kind dispatched through the vtable
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        matches!(
            self,
            MethodKind::Abstract | MethodKind::Virtual | MethodKind::Override
        )
    }
}
