//! Lookup of declarative annotations on metadata nodes.
//!
//! [`find`] selects annotations by exact kind and security action. [`find_filtered`] applies an
//! [`AnnotationFilter`], which can also constrain the attribute class and named properties. Both
//! return lazy iterators borrowing the node, so nothing is copied or allocated.

use std::slice;

use crate::metadata::security::{Annotation, AnnotationKind, ArgumentValue, SecurityAction};

/// Implemented by every metadata node that can carry declarative annotations.
///
/// The view stores annotations in declaration order next to the node, so access is O(1) and the
/// matcher never re-scans the module.
pub trait HasAnnotations {
    /// Returns the annotations attached to this node, in declaration order.
    fn annotations(&self) -> &[Annotation];
}

impl HasAnnotations for [Annotation] {
    fn annotations(&self) -> &[Annotation] {
        self
    }
}

impl HasAnnotations for Vec<Annotation> {
    fn annotations(&self) -> &[Annotation] {
        self.as_slice()
    }
}

/// Lazy sequence of annotations matching an exact (kind, action) pair.
///
/// A clone taken before the sequence is first consumed replays it in full; a clone taken later
/// continues from the same position. Calling [`find`] again always gives a fresh sequence.
#[derive(Debug, Clone)]
pub struct AnnotationMatches<'a> {
    inner: slice::Iter<'a, Annotation>,
    kind: AnnotationKind,
    action: SecurityAction,
}

impl<'a> Iterator for AnnotationMatches<'a> {
    type Item = &'a Annotation;

    fn next(&mut self) -> Option<Self::Item> {
        let (kind, action) = (self.kind, self.action);
        self.inner.by_ref().find(|annotation| {
            annotation.kind() == kind && annotation.action() == Some(action)
        })
    }
}

/// Yields the annotations of `node` with exactly the given kind and action.
///
/// Matching is plain equality: [`SecurityAction::NonCasInheritance`] is not an
/// [`SecurityAction::InheritanceDemand`], and [`AnnotationKind::Custom`] annotations never match
/// since they carry no action. A node without matching annotations yields an empty sequence.
///
/// # Arguments
///
/// * `node` - Any node carrying annotations
/// * `kind` - The annotation kind to select
/// * `action` - The security action to select
pub fn find<N>(node: &N, kind: AnnotationKind, action: SecurityAction) -> AnnotationMatches<'_>
where
    N: HasAnnotations + ?Sized,
{
    AnnotationMatches {
        inner: node.annotations().iter(),
        kind,
        action,
    }
}

/// Annotation selection with constraints beyond (kind, action).
///
/// Every constraint that is set must hold; properties are matched by containment, so an
/// annotation may carry more properties than the filter names.
///
/// # Examples
///
/// ```rust
/// use dotaudit::metadata::security::{
///     find_filtered, Annotation, AnnotationFilter, AnnotationKind, SecurityAction,
/// };
///
/// let annotations = vec![
///     Annotation::security(SecurityAction::Demand, "Perm").with_property("Unrestricted", true),
///     Annotation::security(SecurityAction::Demand, "Perm").with_property("Unrestricted", false),
/// ];
///
/// let filter = AnnotationFilter::new(AnnotationKind::SecurityDemand)
///     .action(SecurityAction::Demand)
///     .property("Unrestricted", true);
///
/// assert_eq!(find_filtered(&annotations, &filter).count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationFilter {
    kind: AnnotationKind,
    action: Option<SecurityAction>,
    class_name: Option<String>,
    properties: Vec<(String, ArgumentValue)>,
}

impl AnnotationFilter {
    /// Creates a filter selecting every annotation of `kind`.
    #[must_use]
    pub fn new(kind: AnnotationKind) -> Self {
        AnnotationFilter {
            kind,
            action: None,
            class_name: None,
            properties: Vec::new(),
        }
    }

    /// Restricts the filter to one security action.
    #[must_use]
    pub fn action(mut self, action: SecurityAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Restricts the filter to one permission or attribute class.
    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Requires a named property with exactly this value.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<ArgumentValue>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    /// Returns true if `annotation` satisfies every constraint of this filter.
    #[must_use]
    pub fn matches(&self, annotation: &Annotation) -> bool {
        if annotation.kind() != self.kind {
            return false;
        }

        if let Some(action) = self.action {
            if annotation.action() != Some(action) {
                return false;
            }
        }

        if let Some(class_name) = &self.class_name {
            if annotation.class_name() != class_name.as_str() {
                return false;
            }
        }

        self.properties
            .iter()
            .all(|(name, value)| annotation.property(name) == Some(value))
    }
}

/// Lazy sequence of annotations accepted by an [`AnnotationFilter`].
#[derive(Debug, Clone)]
pub struct FilteredMatches<'a, 'f> {
    inner: slice::Iter<'a, Annotation>,
    filter: &'f AnnotationFilter,
}

impl<'a> Iterator for FilteredMatches<'a, '_> {
    type Item = &'a Annotation;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.inner.by_ref().find(|annotation| filter.matches(annotation))
    }
}

/// Yields the annotations of `node` accepted by `filter`.
pub fn find_filtered<'a, 'f, N>(node: &'a N, filter: &'f AnnotationFilter) -> FilteredMatches<'a, 'f>
where
    N: HasAnnotations + ?Sized,
{
    FilteredMatches {
        inner: node.annotations().iter(),
        filter,
    }
}
