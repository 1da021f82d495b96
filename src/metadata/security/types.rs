use std::fmt;

use strum::EnumIter;

/// Security actions as defined in ECMA-335 and .NET Framework
///
/// The action decides when the runtime evaluates a declarative permission: on every call, at link
/// time, or whenever a type derives from (or a method overrides) the annotated member. The set is
/// closed; values outside the documented range are preserved in [`SecurityAction::Unknown`] so
/// that an annotation never silently changes meaning.
///
/// # Reference
/// * ECMA-335 II.20 + II.22.11
/// * <https://learn.microsoft.com/en-us/dotnet/api/system.security.permissions.securityaction>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[repr(u16)]
pub enum SecurityAction {
    /// Without further checks, refuse Demand for the specified permission.
    Deny = 0x0001,
    /// Check that all callers in the call chain have been granted specified permission.
    Demand = 0x0002,
    /// Without further checks, satisfy Demand for the specified permission.
    Assert = 0x0003,
    /// Check that the current assembly has been granted the specified permission.
    NonCasDemand = 0x0004,
    /// Check that the immediate caller has been granted the specified permission.
    LinkDemand = 0x0005,
    /// The specified permission shall be granted in order to inherit from class or override
    /// virtual method.
    InheritanceDemand = 0x0006,
    /// Specify the minimum permissions required to run (obsolete).
    RequestMinimum = 0x0007,
    /// Specify the optional permissions to grant (obsolete).
    RequestOptional = 0x0008,
    /// Specify the permissions not to be granted (obsolete).
    RequestRefuse = 0x0009,
    /// Reserved for implementation-specific use.
    PrejitGrant = 0x000A,
    /// Reserved for implementation-specific use.
    PrejitDeny = 0x000B,
    /// Non-CAS version of `LinkDemand`.
    NonCasLinkDemand = 0x000C,
    /// Non-CAS version of `InheritanceDemand`.
    NonCasInheritance = 0x000D,
    /// Link demand for any permission of a choice set.
    LinkDemandChoice = 0x000E,
    /// Inheritance demand for any permission of a choice set.
    InheritanceDemandChoice = 0x000F,
    /// Demand for any permission of a choice set.
    DemandChoice = 0x0010,
    /// Without further checks, refuse Demand for all permissions other than those specified.
    PermitOnly = 0x0011,
    /// Unknown security action.
    Unknown(u16),
}

impl SecurityAction {
    /// Returns the raw ECMA-335 action code.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            SecurityAction::Deny => 0x0001,
            SecurityAction::Demand => 0x0002,
            SecurityAction::Assert => 0x0003,
            SecurityAction::NonCasDemand => 0x0004,
            SecurityAction::LinkDemand => 0x0005,
            SecurityAction::InheritanceDemand => 0x0006,
            SecurityAction::RequestMinimum => 0x0007,
            SecurityAction::RequestOptional => 0x0008,
            SecurityAction::RequestRefuse => 0x0009,
            SecurityAction::PrejitGrant => 0x000A,
            SecurityAction::PrejitDeny => 0x000B,
            SecurityAction::NonCasLinkDemand => 0x000C,
            SecurityAction::NonCasInheritance => 0x000D,
            SecurityAction::LinkDemandChoice => 0x000E,
            SecurityAction::InheritanceDemandChoice => 0x000F,
            SecurityAction::DemandChoice => 0x0010,
            SecurityAction::PermitOnly => 0x0011,
            SecurityAction::Unknown(value) => *value,
        }
    }
}

impl fmt::Display for SecurityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityAction::Unknown(value) => write!(f, "Unknown({:#06x})", value),
            other => write!(f, "{:?}", other),
        }
    }
}

impl From<u16> for SecurityAction {
    fn from(value: u16) -> Self {
        match value {
            0x0001 => SecurityAction::Deny,
            0x0002 => SecurityAction::Demand,
            0x0003 => SecurityAction::Assert,
            0x0004 => SecurityAction::NonCasDemand,
            0x0005 => SecurityAction::LinkDemand,
            0x0006 => SecurityAction::InheritanceDemand,
            0x0007 => SecurityAction::RequestMinimum,
            0x0008 => SecurityAction::RequestOptional,
            0x0009 => SecurityAction::RequestRefuse,
            0x000A => SecurityAction::PrejitGrant,
            0x000B => SecurityAction::PrejitDeny,
            0x000C => SecurityAction::NonCasLinkDemand,
            0x000D => SecurityAction::NonCasInheritance,
            0x000E => SecurityAction::LinkDemandChoice,
            0x000F => SecurityAction::InheritanceDemandChoice,
            0x0010 => SecurityAction::DemandChoice,
            0x0011 => SecurityAction::PermitOnly,
            _ => SecurityAction::Unknown(value),
        }
    }
}

/// The value of a named property on an annotation
///
/// Declarative permissions carry their configuration as named properties
/// (`ControlAppDomain = true`, `Read = "C:\\Data"`). The values are kept in decoded form so that
/// property constraints can be matched by plain equality.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// Boolean value
    Boolean(bool),
    /// 32-bit integer
    Int32(i32),
    /// 64-bit integer
    Int64(i64),
    /// String value
    String(String),
    /// Type reference - full name of the type
    Type(String),
    /// Enumeration value - type name and integer value
    Enum(String, i32),
    /// Array of values
    Array(Vec<ArgumentValue>),
    /// Null value
    Null,
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        ArgumentValue::Boolean(value)
    }
}

impl From<i32> for ArgumentValue {
    fn from(value: i32) -> Self {
        ArgumentValue::Int32(value)
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        ArgumentValue::String(value.to_string())
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Boolean(v) => write!(f, "{}", v),
            ArgumentValue::Int32(v) => write!(f, "{}", v),
            ArgumentValue::Int64(v) => write!(f, "{}", v),
            ArgumentValue::String(v) => write!(f, "\"{}\"", v),
            ArgumentValue::Type(v) => write!(f, "typeof({})", v),
            ArgumentValue::Enum(t, v) => write!(f, "{}({})", t, v),
            ArgumentValue::Array(v) => {
                write!(f, "[")?;
                for (i, val) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            ArgumentValue::Null => write!(f, "null"),
        }
    }
}

/// Common .NET security permission classes
pub mod security_classes {
    /// File IO Permission - Controls access to files and directories
    pub const FILE_IO_PERMISSION: &str = "System.Security.Permissions.FileIOPermission";

    /// Security Permission - Controls access to security-sensitive operations
    pub const SECURITY_PERMISSION: &str = "System.Security.Permissions.SecurityPermission";

    /// Registry Permission - Controls access to registry keys
    pub const REGISTRY_PERMISSION: &str = "System.Security.Permissions.RegistryPermission";

    /// Environment Permission - Controls access to environment variables
    pub const ENVIRONMENT_PERMISSION: &str = "System.Security.Permissions.EnvironmentPermission";

    /// Reflection Permission - Controls use of reflection
    pub const REFLECTION_PERMISSION: &str = "System.Security.Permissions.ReflectionPermission";

    /// Permission Set - An unnamed collection of permissions
    pub const PERMISSION_SET: &str = "System.Security.PermissionSet";
}
