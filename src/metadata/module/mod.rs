//! The read-only metadata view of one compiled module.
//!
//! A [`Module`] owns every type definition, and every type owns its methods and fields. Types
//! are stored in token order, so resolving a `TypeDef` token is an index operation, and a
//! method index maps `MethodDef` tokens to their owner. The inheritance relation is a forest:
//! each type has at most one base type inside the module and the chain of base types always
//! terminates. [`ModuleBuilder::build`] establishes these properties, so none of the queries
//! below can fail on a module that exists.
//!
//! # Key Components
//!
//! - [`Module`] - The immutable view and its hierarchy queries
//! - [`ModuleBuilder`], [`TypeBuilder`], [`MethodBuilder`], [`FieldBuilder`] - Construction
//! - [`Ancestors`] - Iterator over the in-module base type chain
//!
//! # Examples
//!
//! ```rust
//! use dotaudit::metadata::module::{MethodBuilder, ModuleBuilder, TypeBuilder};
//!
//! let mut builder = ModuleBuilder::new("Sample.dll");
//! let base = builder.add_type(
//!     TypeBuilder::class("Sample", "Widget").method(MethodBuilder::virtual_method("Draw")),
//! )?;
//! let derived = builder.add_type(
//!     TypeBuilder::class("Sample", "Button")
//!         .extends(base)
//!         .method(MethodBuilder::override_method("Draw")),
//! )?;
//! let module = builder.build()?;
//!
//! let button = module.type_by_token(derived).unwrap();
//! let draw = &button.methods[0];
//! let overridden = module.overridden_method(draw).unwrap();
//! assert_eq!(module.method_full_name(overridden), "Sample.Widget::Draw()");
//! # Ok::<(), dotaudit::Error>(())
//! ```

mod builder;

pub use builder::{FieldBuilder, MethodBuilder, ModuleBuilder, TypeBuilder};

use rustc_hash::FxHashMap;

use crate::{
    metadata::{
        diagnostics::Diagnostics,
        method::Method,
        security::{Annotation, HasAnnotations},
        token::{Token, TokenTable},
        typesystem::{CilType, TypeReference},
    },
    Error, Result,
};

/// An immutable, fully validated module.
///
/// `Module` is `Send + Sync`; rules borrow it concurrently while the runner evaluates
/// targets in parallel.
#[derive(Debug)]
pub struct Module {
    name: String,
    annotations: Vec<Annotation>,
    types: Vec<CilType>,
    methods: FxHashMap<Token, (usize, usize)>,
    derived: Vec<Vec<Token>>,
    by_name: FxHashMap<String, Token>,
    diagnostics: Diagnostics,
}

impl Module {
    /// Returns the module's file name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the observations recorded while the module was built
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Returns the token identifying the assembly target
    #[must_use]
    pub fn token(&self) -> Token {
        Token::assembly()
    }

    /// Returns all type definitions in token order
    #[must_use]
    pub fn types(&self) -> &[CilType] {
        &self.types
    }

    /// Returns all methods, grouped by declaring type in token order
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.types.iter().flat_map(|ty| ty.methods.iter())
    }

    /// Returns the number of methods defined in the module
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Resolves a `TypeDef` token
    #[must_use]
    pub fn type_by_token(&self, token: Token) -> Option<&CilType> {
        if token.is_null() || !token.is_table(TokenTable::TypeDef) {
            return None;
        }
        self.types.get(token.row() as usize - 1)
    }

    /// Resolves a namespace-qualified type name.
    ///
    /// If several types share a name, the one with the lowest token is returned.
    #[must_use]
    pub fn type_by_name(&self, fullname: &str) -> Option<&CilType> {
        self.by_name
            .get(fullname)
            .and_then(|token| self.type_by_token(*token))
    }

    /// Resolves a `MethodDef` token
    #[must_use]
    pub fn method_by_token(&self, token: Token) -> Option<&Method> {
        let (type_index, method_index) = *self.methods.get(&token)?;
        self.types.get(type_index)?.methods.get(method_index)
    }

    /// Returns the type owning the given method.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeNotFound`] if the method does not belong to this module.
    pub fn declaring_type(&self, method: &Method) -> Result<&CilType> {
        self.type_by_token(method.declaring_type)
            .ok_or(Error::TypeNotFound(method.declaring_type))
    }

    /// Returns the base type if it is defined in this module.
    ///
    /// External bases (for instance `System.Object`) are not part of the view and yield `None`,
    /// exactly like hierarchy roots.
    #[must_use]
    pub fn base_type(&self, ty: &CilType) -> Option<&CilType> {
        ty.base
            .as_ref()
            .and_then(TypeReference::token)
            .and_then(|token| self.type_by_token(token))
    }

    /// Iterates the in-module base type chain, nearest ancestor first
    #[must_use]
    pub fn ancestors<'a>(&'a self, ty: &'a CilType) -> Ancestors<'a> {
        Ancestors {
            module: self,
            current: self.base_type(ty),
        }
    }

    /// Returns the types directly deriving from `ty`, in token order
    pub fn derived_types<'a>(&'a self, ty: &CilType) -> impl Iterator<Item = &'a CilType> + 'a {
        let children = self
            .type_index(ty)
            .and_then(|index| self.derived.get(index))
            .map(Vec::as_slice)
            .unwrap_or_default();

        children
            .iter()
            .filter_map(move |token| self.type_by_token(*token))
    }

    /// Returns true if any type in this module derives directly from `ty`
    #[must_use]
    pub fn has_derived_types(&self, ty: &CilType) -> bool {
        self.type_index(ty)
            .and_then(|index| self.derived.get(index))
            .is_some_and(|children| !children.is_empty())
    }

    /// Returns true if a subclass of `ty` may exist, inside or outside this module.
    ///
    /// Sealed types (which includes static classes) can not be derived from.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dotaudit::metadata::module::{ModuleBuilder, TypeBuilder};
    ///
    /// let mut builder = ModuleBuilder::new("Sample.dll");
    /// let helpers = builder.add_type(TypeBuilder::class("Sample", "Helpers").abstract_type().sealed())?;
    /// let base = builder.add_type(TypeBuilder::class("Sample", "Base").abstract_type())?;
    /// let module = builder.build()?;
    ///
    /// let helpers = module.type_by_token(helpers).unwrap();
    /// assert!(helpers.is_static_class());
    /// assert!(!module.can_be_derived(helpers));
    ///
    /// let base = module.type_by_token(base).unwrap();
    /// assert!(!base.is_static_class());
    /// assert!(module.can_be_derived(base));
    /// # Ok::<(), dotaudit::Error>(())
    /// ```
    #[must_use]
    pub fn can_be_derived(&self, ty: &CilType) -> bool {
        !ty.is_sealed()
    }

    /// Finds the virtual method an override replaces.
    ///
    /// Walks the in-module ancestors nearest first and returns the first virtual method with the
    /// same name and parameter types. Returns `None` for non-virtual methods, for methods that
    /// introduce a new slot, and when the overridden method lives outside the module.
    #[must_use]
    pub fn overridden_method(&self, method: &Method) -> Option<&Method> {
        if method.kind() != crate::metadata::method::MethodKind::Override {
            return None;
        }

        let declaring = self.type_by_token(method.declaring_type)?;
        self.ancestors(declaring).find_map(|ancestor| {
            ancestor
                .methods
                .iter()
                .find(|candidate| candidate.is_virtual() && candidate.same_signature(method))
        })
    }

    /// Formats `Namespace.Type::Name(ParamTypes)` for reports
    #[must_use]
    pub fn method_full_name(&self, method: &Method) -> String {
        let owner = self
            .type_by_token(method.declaring_type)
            .map_or_else(|| method.declaring_type.to_string(), CilType::fullname);

        format!("{}::{}({})", owner, method.name, method.params.join(", "))
    }

    fn type_index(&self, ty: &CilType) -> Option<usize> {
        let candidate = self.type_by_token(ty.token)?;
        std::ptr::eq(candidate, ty).then(|| ty.token.row() as usize - 1)
    }
}

impl HasAnnotations for Module {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Iterator returned by [`Module::ancestors`].
///
/// Terminates because the inheritance relation of a built module is acyclic.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    module: &'a Module,
    current: Option<&'a CilType>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a CilType;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.module.base_type(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::security::{find, AnnotationKind, SecurityAction};

    fn hierarchy() -> Result<Module> {
        let mut builder = ModuleBuilder::new("Hierarchy.dll");
        builder.annotation(Annotation::security(
            SecurityAction::RequestMinimum,
            "System.Security.Permissions.SecurityPermissionAttribute",
        ));

        let root = builder.add_type(
            TypeBuilder::class("Shapes", "Shape")
                .abstract_type()
                .method(MethodBuilder::abstract_method("Area").returns("System.Double"))
                .method(MethodBuilder::virtual_method("Scale").param("System.Double")),
        )?;
        let circle = builder.add_type(
            TypeBuilder::class("Shapes", "Circle")
                .extends(root)
                .method(MethodBuilder::override_method("Area").returns("System.Double"))
                .method(MethodBuilder::override_method("Scale").param("System.Int32")),
        )?;
        builder.add_type(
            TypeBuilder::class("Shapes", "UnitCircle")
                .extends(circle)
                .sealed()
                .method(
                    MethodBuilder::override_method("Area")
                        .returns("System.Double")
                        .sealed(),
                ),
        )?;
        builder.add_type(TypeBuilder::class("Shapes", "Square").extends(root))?;
        builder.build()
    }

    #[test]
    fn test_type_lookup() -> Result<()> {
        let module = hierarchy()?;
        assert_eq!(module.name(), "Hierarchy.dll");
        assert_eq!(module.types().len(), 4);
        assert_eq!(module.method_count(), 5);
        assert_eq!(module.methods().count(), 5);

        let circle = module
            .type_by_name("Shapes.Circle")
            .ok_or(Error::TypeNotFound(Token::type_def(2)))?;
        assert_eq!(circle.token, Token::type_def(2));

        assert!(module.type_by_token(Token::type_def(0)).is_none());
        assert!(module.type_by_token(Token::type_def(5)).is_none());
        assert!(module.type_by_token(Token::method_def(1)).is_none());
        assert!(module.type_by_name("Shapes.Triangle").is_none());
        Ok(())
    }

    #[test]
    fn test_method_lookup() -> Result<()> {
        let module = hierarchy()?;
        let token = Token::method_def(3);
        let method = module.method_by_token(token).ok_or(Error::MethodNotFound(token))?;
        assert_eq!(method.name, "Area");

        let owner = module.declaring_type(method)?;
        assert_eq!(owner.fullname(), "Shapes.Circle");
        assert_eq!(module.method_full_name(method), "Shapes.Circle::Area()");
        assert!(module.method_by_token(Token::method_def(42)).is_none());
        Ok(())
    }

    #[test]
    fn test_ancestors_and_derived() -> Result<()> {
        let module = hierarchy()?;
        let unit = module
            .type_by_name("Shapes.UnitCircle")
            .ok_or(Error::TypeNotFound(Token::type_def(3)))?;

        let chain: Vec<_> = module.ancestors(unit).map(CilType::fullname).collect();
        assert_eq!(chain, vec!["Shapes.Circle", "Shapes.Shape"]);

        let root = &module.types()[0];
        assert!(module.base_type(root).is_none());
        let children: Vec<_> = module.derived_types(root).map(|ty| ty.name.as_str()).collect();
        assert_eq!(children, vec!["Circle", "Square"]);
        assert!(module.has_derived_types(root));
        assert!(!module.has_derived_types(unit));
        assert!(module.can_be_derived(root));
        assert!(!module.can_be_derived(unit));
        Ok(())
    }

    #[test]
    fn test_overridden_method() -> Result<()> {
        let module = hierarchy()?;
        let unit = &module.types()[2];
        let area = &unit.methods[0];

        let overridden = module.overridden_method(area).ok_or(Error::MethodNotFound(area.token))?;
        assert_eq!(module.method_full_name(overridden), "Shapes.Circle::Area()");

        // Scale(int) does not match Scale(double); the slot belongs to a type outside the view
        let circle = &module.types()[1];
        assert!(module.overridden_method(&circle.methods[1]).is_none());

        // Introducing methods override nothing
        assert!(module.overridden_method(&module.types()[0].methods[1]).is_none());
        Ok(())
    }

    #[test]
    fn test_assembly_annotations() -> Result<()> {
        let module = hierarchy()?;
        assert_eq!(module.token(), Token::assembly());
        assert_eq!(
            find(&module, AnnotationKind::SecurityDemand, SecurityAction::RequestMinimum).count(),
            1
        );
        Ok(())
    }

    #[test]
    fn test_foreign_type_has_no_relations() -> Result<()> {
        let module = hierarchy()?;
        let other = hierarchy()?;
        let foreign = &other.types()[0];

        assert!(!module.has_derived_types(foreign));
        assert_eq!(module.derived_types(foreign).count(), 0);
        Ok(())
    }
}
