//! Construction of [`Module`] views.
//!
//! The loader (or a test) describes types with [`TypeBuilder`], [`MethodBuilder`] and
//! [`FieldBuilder`] values and hands them to a [`ModuleBuilder`]. Tokens are assigned in the
//! order types and members are added, member flags are classified immediately, and the
//! cross-type invariants (resolvable references, acyclic inheritance) are checked once by
//! [`ModuleBuilder::build`]. A [`Module`] that exists is therefore fully constructed and valid.

use rustc_hash::FxHashMap;

use crate::{
    metadata::{
        diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
        field::{Field, FieldModifiers},
        method::{MemberAccess, Method, MethodModifiers, MethodVtableFlags},
        module::Module,
        security::{Annotation, AnnotationKind},
        token::Token,
        typesystem::{CilType, TypeAttributes, TypeReference, TypeVisibility},
    },
    Result,
};

const VOID_TYPE: &str = "System.Void";
const OBJECT_TYPE: &str = "System.Object";

/// Describes one method of a [`TypeBuilder`].
///
/// # Examples
///
/// ```rust
/// use dotaudit::metadata::module::MethodBuilder;
///
/// let method = MethodBuilder::virtual_method("Render")
///     .param("System.Int32")
///     .returns("System.Boolean");
/// ```
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    name: String,
    access: MemberAccess,
    modifiers: MethodModifiers,
    vtable: MethodVtableFlags,
    params: Vec<String>,
    return_type: String,
    annotations: Vec<Annotation>,
}

impl MethodBuilder {
    /// Creates a public, non-virtual instance method returning `System.Void`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        MethodBuilder {
            name: name.into(),
            access: MemberAccess::Public,
            modifiers: MethodModifiers::HIDE_BY_SIG,
            vtable: MethodVtableFlags::REUSE_SLOT,
            params: Vec::new(),
            return_type: VOID_TYPE.to_string(),
            annotations: Vec::new(),
        }
    }

    /// Creates a `virtual` method introducing a new vtable slot.
    #[must_use]
    pub fn virtual_method(name: impl Into<String>) -> Self {
        Self::new(name)
            .modifiers(MethodModifiers::HIDE_BY_SIG | MethodModifiers::VIRTUAL)
            .vtable(MethodVtableFlags::NEW_SLOT)
    }

    /// Creates an `override` of an inherited virtual method.
    #[must_use]
    pub fn override_method(name: impl Into<String>) -> Self {
        Self::new(name)
            .modifiers(MethodModifiers::HIDE_BY_SIG | MethodModifiers::VIRTUAL)
            .vtable(MethodVtableFlags::REUSE_SLOT)
    }

    /// Creates an `abstract` method introducing a new vtable slot.
    #[must_use]
    pub fn abstract_method(name: impl Into<String>) -> Self {
        Self::new(name)
            .modifiers(
                MethodModifiers::HIDE_BY_SIG | MethodModifiers::VIRTUAL | MethodModifiers::ABSTRACT,
            )
            .vtable(MethodVtableFlags::NEW_SLOT)
    }

    /// Creates a `static` method.
    #[must_use]
    pub fn static_method(name: impl Into<String>) -> Self {
        Self::new(name).modifiers(MethodModifiers::HIDE_BY_SIG | MethodModifiers::STATIC)
    }

    /// Sets the accessibility.
    #[must_use]
    pub fn access(mut self, access: MemberAccess) -> Self {
        self.access = access;
        self
    }

    /// Replaces the modifier flags.
    #[must_use]
    pub fn modifiers(mut self, modifiers: MethodModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replaces the vtable layout flags.
    #[must_use]
    pub fn vtable(mut self, vtable: MethodVtableFlags) -> Self {
        self.vtable = vtable;
        self
    }

    /// Marks the method `final` (C# `sealed override`).
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.modifiers |= MethodModifiers::FINAL;
        self
    }

    /// Appends a parameter of the given type.
    #[must_use]
    pub fn param(mut self, type_name: impl Into<String>) -> Self {
        self.params.push(type_name.into());
        self
    }

    /// Sets the return type.
    #[must_use]
    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = type_name.into();
        self
    }

    /// Attaches an annotation.
    #[must_use]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    fn build(self, token: Token, declaring_type: Token) -> Result<Method> {
        let mut modifiers = self.modifiers;
        if has_security(&self.annotations) {
            modifiers |= MethodModifiers::HAS_SECURITY;
        }

        Method::new(
            token,
            declaring_type,
            self.name,
            self.access,
            modifiers,
            self.vtable,
            self.params,
            self.return_type,
            self.annotations,
        )
    }
}

/// Describes one field of a [`TypeBuilder`].
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    name: String,
    field_type: String,
    access: MemberAccess,
    modifiers: FieldModifiers,
    annotations: Vec<Annotation>,
}

impl FieldBuilder {
    /// Creates a private instance field.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        FieldBuilder {
            name: name.into(),
            field_type: field_type.into(),
            access: MemberAccess::Private,
            modifiers: FieldModifiers::empty(),
            annotations: Vec::new(),
        }
    }

    /// Sets the accessibility.
    #[must_use]
    pub fn access(mut self, access: MemberAccess) -> Self {
        self.access = access;
        self
    }

    /// Replaces the modifier flags.
    #[must_use]
    pub fn modifiers(mut self, modifiers: FieldModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Attaches an annotation.
    #[must_use]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    fn build(self, token: Token, declaring_type: Token) -> Result<Field> {
        if self.modifiers.contains(FieldModifiers::LITERAL)
            && !self.modifiers.contains(FieldModifiers::STATIC)
        {
            return Err(malformed_error!(
                "Literal field '{}' ({}) must also be static",
                self.name,
                token
            ));
        }

        Ok(Field {
            token,
            declaring_type,
            name: self.name,
            field_type: self.field_type,
            access: self.access,
            modifiers: self.modifiers,
            annotations: self.annotations,
        })
    }
}

/// Describes one type definition.
///
/// # Examples
///
/// ```rust
/// use dotaudit::metadata::module::{MethodBuilder, ModuleBuilder, TypeBuilder};
///
/// let mut builder = ModuleBuilder::new("Sample.dll");
/// let base = builder.add_type(
///     TypeBuilder::class("Sample", "Shape")
///         .abstract_type()
///         .method(MethodBuilder::abstract_method("Area").returns("System.Double")),
/// )?;
/// builder.add_type(
///     TypeBuilder::class("Sample", "Circle")
///         .extends(base)
///         .method(MethodBuilder::override_method("Area").returns("System.Double")),
/// )?;
///
/// let module = builder.build()?;
/// assert_eq!(module.types().len(), 2);
/// # Ok::<(), dotaudit::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    namespace: String,
    name: String,
    visibility: TypeVisibility,
    flags: TypeAttributes,
    base: Option<TypeReference>,
    interfaces: Vec<TypeReference>,
    methods: Vec<MethodBuilder>,
    fields: Vec<FieldBuilder>,
    annotations: Vec<Annotation>,
}

impl TypeBuilder {
    /// Creates a public class deriving from `System.Object`.
    #[must_use]
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeBuilder {
            namespace: namespace.into(),
            name: name.into(),
            visibility: TypeVisibility::Public,
            flags: TypeAttributes::BEFORE_FIELD_INIT,
            base: Some(TypeReference::External(OBJECT_TYPE.to_string())),
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Creates a public interface.
    #[must_use]
    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut builder = Self::class(namespace, name);
        builder.flags = TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT;
        builder.base = None;
        builder
    }

    /// Sets the visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: TypeVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Adds semantic flags.
    #[must_use]
    pub fn flags(mut self, flags: TypeAttributes) -> Self {
        self.flags |= flags;
        self
    }

    /// Marks the type `abstract`.
    #[must_use]
    pub fn abstract_type(self) -> Self {
        self.flags(TypeAttributes::ABSTRACT)
    }

    /// Marks the type `sealed`.
    #[must_use]
    pub fn sealed(self) -> Self {
        self.flags(TypeAttributes::SEALED)
    }

    /// Sets the base type.
    #[must_use]
    pub fn extends(mut self, base: impl Into<TypeReference>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Removes the base type, making this a root of the hierarchy.
    #[must_use]
    pub fn root(mut self) -> Self {
        self.base = None;
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn implements(mut self, interface: impl Into<TypeReference>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    /// Attaches an annotation.
    #[must_use]
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// Builds an immutable [`Module`].
#[derive(Debug)]
pub struct ModuleBuilder {
    name: String,
    annotations: Vec<Annotation>,
    types: Vec<CilType>,
    method_rows: u32,
    field_rows: u32,
}

impl ModuleBuilder {
    /// Creates an empty builder for the module with the given file name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ModuleBuilder {
            name: name.into(),
            annotations: Vec::new(),
            types: Vec::new(),
            method_rows: 0,
            field_rows: 0,
        }
    }

    /// Attaches an assembly-level annotation.
    pub fn annotation(&mut self, annotation: Annotation) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    /// Returns the token the next added type will receive.
    #[must_use]
    pub fn next_type_token(&self) -> Token {
        Token::type_def(self.types.len() as u32 + 1)
    }

    /// Adds a type definition with its members.
    ///
    /// Tokens are assigned to the type, its methods and its fields in declaration order.
    /// References to other types are not resolved here, so a type may extend a type that is
    /// added later; [`ModuleBuilder::build`] checks them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if:
    /// - A method or field carries a contradictory flag combination
    /// - An abstract method is declared on a type that is neither abstract nor an interface
    /// - An interface declares a base type or is sealed
    pub fn add_type(&mut self, builder: TypeBuilder) -> Result<Token> {
        let token = self.next_type_token();
        let fullname = builder.fullname();

        if builder.flags.contains(TypeAttributes::INTERFACE) {
            if builder.base.is_some() {
                return Err(malformed_error!(
                    "Interface '{}' ({}) can not have a base type",
                    fullname,
                    token
                ));
            }
            if builder.flags.contains(TypeAttributes::SEALED) {
                return Err(malformed_error!(
                    "Interface '{}' ({}) can not be sealed",
                    fullname,
                    token
                ));
            }
        }

        let mut flags = builder.flags;
        if has_security(&builder.annotations) {
            flags |= TypeAttributes::HAS_SECURITY;
        }
        let can_declare_abstract =
            flags.contains(TypeAttributes::ABSTRACT) || flags.contains(TypeAttributes::INTERFACE);

        // Rows are committed only once the whole type is valid.
        let mut methods = Vec::with_capacity(builder.methods.len());
        for (index, method_builder) in builder.methods.into_iter().enumerate() {
            let method_token = Token::method_def(self.method_rows + 1 + index as u32);
            let method = method_builder.build(method_token, token)?;
            if method.is_abstract() && !can_declare_abstract {
                return Err(malformed_error!(
                    "Abstract method '{}' ({}) declared on concrete type '{}'",
                    method.name,
                    method_token,
                    fullname
                ));
            }
            methods.push(method);
        }

        let mut fields = Vec::with_capacity(builder.fields.len());
        for (index, field_builder) in builder.fields.into_iter().enumerate() {
            let field_token = Token::field(self.field_rows + 1 + index as u32);
            fields.push(field_builder.build(field_token, token)?);
        }

        self.method_rows += methods.len() as u32;
        self.field_rows += fields.len() as u32;

        self.types.push(CilType {
            token,
            namespace: builder.namespace,
            name: builder.name,
            visibility: builder.visibility,
            flags,
            base: builder.base,
            interfaces: builder.interfaces,
            methods,
            fields,
            annotations: builder.annotations,
        });

        Ok(token)
    }

    /// Validates the cross-type invariants and freezes the module.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if:
    /// - A base type or interface token does not resolve to a type of this module
    /// - A type derives from a sealed type or from an interface
    /// - A type implements something that is not an interface
    /// - The inheritance relation contains a cycle
    ///
    /// Types deriving from an external type other than `System.Object` are noted in
    /// [`Module::diagnostics`].
    pub fn build(self) -> Result<Module> {
        let types = self.types;

        for ty in &types {
            if let Some(base_token) = ty.base.as_ref().and_then(TypeReference::token) {
                let base = resolve(&types, base_token).ok_or_else(|| {
                    malformed_error!(
                        "Type '{}' ({}) extends unknown type {}",
                        ty.fullname(),
                        ty.token,
                        base_token
                    )
                })?;
                if base.is_sealed() {
                    return Err(malformed_error!(
                        "Type '{}' ({}) extends sealed type '{}'",
                        ty.fullname(),
                        ty.token,
                        base.fullname()
                    ));
                }
                if base.is_interface() {
                    return Err(malformed_error!(
                        "Type '{}' ({}) extends interface '{}'",
                        ty.fullname(),
                        ty.token,
                        base.fullname()
                    ));
                }
            }

            for interface_token in ty.interfaces.iter().filter_map(TypeReference::token) {
                let interface = resolve(&types, interface_token).ok_or_else(|| {
                    malformed_error!(
                        "Type '{}' ({}) implements unknown type {}",
                        ty.fullname(),
                        ty.token,
                        interface_token
                    )
                })?;
                if !interface.is_interface() {
                    return Err(malformed_error!(
                        "Type '{}' ({}) implements non-interface '{}'",
                        ty.fullname(),
                        ty.token,
                        interface.fullname()
                    ));
                }
            }
        }

        check_acyclic(&types)?;

        let diagnostics = Diagnostics::new();
        for ty in &types {
            if let Some(TypeReference::External(base)) = &ty.base {
                if base != OBJECT_TYPE {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticSeverity::Info,
                            DiagnosticCategory::Metadata,
                            format!(
                                "Type '{}' extends external type '{}', its ancestors are not followed",
                                ty.fullname(),
                                base
                            ),
                        )
                        .with_token(ty.token),
                    );
                }
            }
        }

        let mut derived = vec![Vec::new(); types.len()];
        let mut methods = FxHashMap::default();
        let mut by_name = FxHashMap::default();

        for (type_index, ty) in types.iter().enumerate() {
            if let Some(base_token) = ty.base.as_ref().and_then(TypeReference::token) {
                derived[base_token.row() as usize - 1].push(ty.token);
            }
            for (method_index, method) in ty.methods.iter().enumerate() {
                methods.insert(method.token, (type_index, method_index));
            }
            by_name.entry(ty.fullname()).or_insert(ty.token);
        }

        log::debug!(
            "Built module '{}' with {} types and {} methods",
            self.name,
            types.len(),
            methods.len()
        );

        Ok(Module {
            name: self.name,
            annotations: self.annotations,
            types,
            methods,
            derived,
            by_name,
            diagnostics,
        })
    }
}

fn has_security(annotations: &[Annotation]) -> bool {
    annotations
        .iter()
        .any(|annotation| annotation.kind() == AnnotationKind::SecurityDemand)
}

fn resolve(types: &[CilType], token: Token) -> Option<&CilType> {
    if token.is_null() || !token.is_table(crate::metadata::token::TokenTable::TypeDef) {
        return None;
    }
    types.get(token.row() as usize - 1)
}

/// Rejects inheritance cycles; every resolved base chain must end in a root or an external type.
fn check_acyclic(types: &[CilType]) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; types.len()];

    for start in 0..types.len() {
        let mut chain = Vec::new();
        let mut current = Some(start);

        while let Some(index) = current {
            match marks[index] {
                Mark::Done => break,
                Mark::InProgress => {
                    return Err(malformed_error!(
                        "Inheritance cycle through type '{}' ({})",
                        types[index].fullname(),
                        types[index].token
                    ));
                }
                Mark::Unvisited => {
                    marks[index] = Mark::InProgress;
                    chain.push(index);
                    current = types[index]
                        .base
                        .as_ref()
                        .and_then(TypeReference::token)
                        .map(|token| token.row() as usize - 1);
                }
            }
        }

        for index in chain {
            marks[index] = Mark::Done;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::security::SecurityAction, Error};

    #[test]
    fn test_tokens_are_assigned_in_order() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Tokens.dll");
        assert_eq!(builder.next_type_token(), Token::type_def(1));

        let first = builder.add_type(
            TypeBuilder::class("N", "First")
                .method(MethodBuilder::new("A"))
                .method(MethodBuilder::new("B"))
                .field(FieldBuilder::new("x", "System.Int32")),
        )?;
        let second = builder.add_type(
            TypeBuilder::class("N", "Second")
                .method(MethodBuilder::new("C"))
                .field(FieldBuilder::new("y", "System.Int32")),
        )?;
        assert_eq!(first, Token::type_def(1));
        assert_eq!(second, Token::type_def(2));

        let module = builder.build()?;
        let second = module.type_by_token(second).ok_or(Error::TypeNotFound(second))?;
        assert_eq!(second.methods[0].token, Token::method_def(3));
        assert_eq!(second.fields[0].token, Token::field(2));
        Ok(())
    }

    #[test]
    fn test_security_flags_are_derived() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Flags.dll");
        let token = builder.add_type(
            TypeBuilder::class("N", "Guarded")
                .annotation(Annotation::security(SecurityAction::LinkDemand, "P"))
                .method(
                    MethodBuilder::new("Run")
                        .annotation(Annotation::security(SecurityAction::Demand, "P")),
                )
                .method(MethodBuilder::new("Plain").annotation(Annotation::custom("A"))),
        )?;
        let module = builder.build()?;
        let ty = module.type_by_token(token).ok_or(Error::TypeNotFound(token))?;

        assert!(ty.flags.contains(TypeAttributes::HAS_SECURITY));
        assert!(ty.methods[0].modifiers.contains(MethodModifiers::HAS_SECURITY));
        assert!(!ty.methods[1].modifiers.contains(MethodModifiers::HAS_SECURITY));
        Ok(())
    }

    #[test]
    fn test_malformed_method_fails_fast() {
        let mut builder = ModuleBuilder::new("Broken.dll");
        let result = builder.add_type(TypeBuilder::class("N", "Broken").method(
            MethodBuilder::new("Both").modifiers(MethodModifiers::ABSTRACT | MethodModifiers::STATIC),
        ));
        assert!(matches!(result, Err(Error::Malformed { .. })));
        assert_eq!(builder.next_type_token(), Token::type_def(1));
    }

    #[test]
    fn test_rejected_type_leaves_no_row_gaps() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Gaps.dll");
        let result = builder.add_type(
            TypeBuilder::class("N", "Broken")
                .method(MethodBuilder::new("Fine"))
                .method(
                    MethodBuilder::new("Both")
                        .modifiers(MethodModifiers::ABSTRACT | MethodModifiers::STATIC),
                ),
        );
        assert!(matches!(result, Err(Error::Malformed { .. })));

        let result = builder.add_type(
            TypeBuilder::class("N", "BrokenFields")
                .field(FieldBuilder::new("ok", "System.Int32"))
                .field(FieldBuilder::new("Max", "System.Int32").modifiers(FieldModifiers::LITERAL)),
        );
        assert!(matches!(result, Err(Error::Malformed { .. })));

        let token = builder.add_type(
            TypeBuilder::class("N", "Good")
                .method(MethodBuilder::new("M"))
                .field(FieldBuilder::new("f", "System.Int32")),
        )?;
        assert_eq!(token, Token::type_def(1));

        let module = builder.build()?;
        let good = module.type_by_token(token).ok_or(Error::TypeNotFound(token))?;
        assert_eq!(good.methods[0].token, Token::method_def(1));
        assert_eq!(good.fields[0].token, Token::field(1));
        assert!(module.method_by_token(Token::method_def(1)).is_some());
        Ok(())
    }

    #[test]
    fn test_external_bases_are_noted() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("External.dll");
        let plain = builder.add_type(TypeBuilder::class("N", "Plain"))?;
        let control = builder.add_type(
            TypeBuilder::class("N", "Control").extends("System.Windows.Forms.Control"),
        )?;
        builder.add_type(TypeBuilder::class("N", "Button").extends(control))?;
        let module = builder.build()?;

        let notes = module.diagnostics().by_category(DiagnosticCategory::Metadata);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, DiagnosticSeverity::Info);
        assert_eq!(notes[0].token, Some(control));
        assert!(notes[0].message.contains("System.Windows.Forms.Control"));
        assert!(!module
            .diagnostics()
            .iter()
            .any(|diagnostic| diagnostic.token == Some(plain)));
        Ok(())
    }

    #[test]
    fn test_abstract_method_on_concrete_type() {
        let mut builder = ModuleBuilder::new("Broken.dll");
        let result = builder.add_type(
            TypeBuilder::class("N", "Concrete").method(MethodBuilder::abstract_method("Run")),
        );
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_literal_field_must_be_static() {
        let mut builder = ModuleBuilder::new("Broken.dll");
        let result = builder.add_type(
            TypeBuilder::class("N", "Constants")
                .field(FieldBuilder::new("Max", "System.Int32").modifiers(FieldModifiers::LITERAL)),
        );
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_interface_constraints() {
        let mut builder = ModuleBuilder::new("Broken.dll");
        assert!(builder
            .add_type(TypeBuilder::interface("N", "IBase").extends("System.Object"))
            .is_err());
        assert!(builder
            .add_type(TypeBuilder::interface("N", "ISealed").sealed())
            .is_err());
    }

    #[test]
    fn test_dangling_base_is_rejected() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Dangling.dll");
        builder.add_type(TypeBuilder::class("N", "Orphan").extends(Token::type_def(7)))?;
        assert!(matches!(builder.build(), Err(Error::Malformed { .. })));
        Ok(())
    }

    #[test]
    fn test_sealed_base_is_rejected() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Sealed.dll");
        let base = builder.add_type(TypeBuilder::class("N", "Final").sealed())?;
        builder.add_type(TypeBuilder::class("N", "Derived").extends(base))?;
        assert!(matches!(builder.build(), Err(Error::Malformed { .. })));
        Ok(())
    }

    #[test]
    fn test_implementing_a_class_is_rejected() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Implements.dll");
        let class = builder.add_type(TypeBuilder::class("N", "NotAnInterface"))?;
        builder.add_type(TypeBuilder::class("N", "Impl").implements(class))?;
        assert!(matches!(builder.build(), Err(Error::Malformed { .. })));
        Ok(())
    }

    #[test]
    fn test_inheritance_cycle_is_rejected() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Cycle.dll");
        builder.add_type(TypeBuilder::class("N", "A").extends(Token::type_def(3)))?;
        builder.add_type(TypeBuilder::class("N", "B").extends(Token::type_def(1)))?;
        builder.add_type(TypeBuilder::class("N", "C").extends(Token::type_def(2)))?;

        match builder.build() {
            Err(Error::Malformed { message, .. }) => assert!(message.contains("cycle")),
            other => panic!("expected cycle error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_self_inheritance_is_rejected() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Self.dll");
        builder.add_type(TypeBuilder::class("N", "Ouroboros").extends(Token::type_def(1)))?;
        assert!(builder.build().is_err());
        Ok(())
    }

    #[test]
    fn test_shared_ancestors_are_not_cycles() -> crate::Result<()> {
        let mut builder = ModuleBuilder::new("Diamond.dll");
        let root = builder.add_type(TypeBuilder::class("N", "Root"))?;
        let left = builder.add_type(TypeBuilder::class("N", "Left").extends(root))?;
        builder.add_type(TypeBuilder::class("N", "Right").extends(root))?;
        builder.add_type(TypeBuilder::class("N", "Leaf").extends(left))?;
        assert_eq!(builder.build()?.types().len(), 4);
        Ok(())
    }
}
