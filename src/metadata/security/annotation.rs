//! Declarative annotations attached to metadata nodes.
//!
//! An [`Annotation`] is either a security permission declaration, which always carries a
//! [`SecurityAction`], or a plain custom attribute, which never does. The constructors are the
//! only way to create one, so that pairing holds for every annotation in a module.

use std::{collections::BTreeMap, fmt};

use strum::Display;

use crate::metadata::security::{ArgumentValue, SecurityAction};

/// The kind of declarative metadata an [`Annotation`] was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AnnotationKind {
    /// A declarative security permission (`DeclSecurity` row), always paired with an action
    SecurityDemand,
    /// A plain custom attribute, which carries no security action
    Custom,
}

/// A declarative annotation attached to an assembly, type, method or field.
///
/// Annotations are decoded once when the metadata view is built and are read-only afterwards.
/// Property names are unique per annotation, and their order carries no meaning, so the
/// properties are kept in a sorted map.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    kind: AnnotationKind,
    action: Option<SecurityAction>,
    class_name: String,
    properties: BTreeMap<String, ArgumentValue>,
}

impl Annotation {
    /// Creates a declarative security annotation.
    ///
    /// # Arguments
    ///
    /// * `action` - When the runtime evaluates the permission
    /// * `class_name` - Full name of the permission class
    #[must_use]
    pub fn security(action: SecurityAction, class_name: impl Into<String>) -> Self {
        Annotation {
            kind: AnnotationKind::SecurityDemand,
            action: Some(action),
            class_name: class_name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Creates a plain custom attribute annotation.
    ///
    /// # Arguments
    ///
    /// * `class_name` - Full name of the attribute class
    #[must_use]
    pub fn custom(class_name: impl Into<String>) -> Self {
        Annotation {
            kind: AnnotationKind::Custom,
            action: None,
            class_name: class_name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Returns where the annotation came from
    #[must_use]
    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    /// Returns the security action, present for [`AnnotationKind::SecurityDemand`] only
    #[must_use]
    pub fn action(&self) -> Option<SecurityAction> {
        self.action
    }

    /// Returns the full name of the permission or attribute class,
    /// e.g. `System.Security.Permissions.SecurityPermissionAttribute`
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the named properties set on the declaration, sorted by name
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, ArgumentValue> {
        &self.properties
    }

    /// Sets a named property, replacing an earlier value of the same name.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<ArgumentValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Returns the value of a named property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&ArgumentValue> {
        self.properties.get(name)
    }

    /// Returns true if this is a security annotation with exactly the given action.
    #[must_use]
    pub fn is_security_action(&self, action: SecurityAction) -> bool {
        self.kind == AnnotationKind::SecurityDemand && self.action == Some(action)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.class_name)?;
        if let Some(action) = self.action {
            write!(f, "({})", action)?;
        }
        for (name, value) in &self.properties {
            write!(f, ", {} = {}", name, value)?;
        }
        write!(f, "]")
    }
}
