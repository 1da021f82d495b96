//! Shared fixtures for unit tests.
//!
//! The scenario module mirrors a small compiled test assembly with four classes: abstract
//! methods, overriding and virtual methods, non-virtual and static methods, and methods that
//! only carry other demand actions.

use crate::{
    metadata::{
        method::{MemberAccess, Method, CONSTRUCTOR_NAME},
        module::{MethodBuilder, Module, ModuleBuilder, TypeBuilder},
        security::{Annotation, SecurityAction},
    },
    rules::{Rule, RuleContext, RuleOutcome},
    Result,
};

pub const SCENARIO_NAMESPACE: &str = "Test.Rules.Security";
pub const ABSTRACT_METHODS_CLASS: &str = "Test.Rules.Security.AbstractMethodsClass";
pub const VIRTUAL_METHODS_CLASS: &str = "Test.Rules.Security.VirtualMethodsClass";
pub const NO_VIRTUAL_METHODS_CLASS: &str = "Test.Rules.Security.NoVirtualMethodsClass";
pub const NOT_INHERITANCE_DEMAND_CLASS: &str = "Test.Rules.Security.NotInheritanceDemandClass";

const SECURITY_PERMISSION: &str = "System.Security.Permissions.SecurityPermissionAttribute";

// Helper function to create a SecurityPermission annotation with ControlAppDomain = true
pub fn security_permission(action: SecurityAction) -> Annotation {
    Annotation::security(action, SECURITY_PERMISSION).with_property("ControlAppDomain", true)
}

pub fn inheritance_demand() -> Annotation {
    security_permission(SecurityAction::InheritanceDemand)
}

pub fn link_demand() -> Annotation {
    security_permission(SecurityAction::LinkDemand)
}

pub fn demand() -> Annotation {
    security_permission(SecurityAction::Demand)
}

// Helper function to create the default constructor the compiler emits
fn constructor(access: MemberAccess) -> MethodBuilder {
    MethodBuilder::new(CONSTRUCTOR_NAME).access(access)
}

/// Builds the four scenario classes in one module.
pub fn scenario_module() -> Result<Module> {
    let mut builder = ModuleBuilder::new("Test.Rules.Security.dll");

    let abstract_methods = builder.add_type(
        TypeBuilder::class(SCENARIO_NAMESPACE, "AbstractMethodsClass")
            .abstract_type()
            .method(MethodBuilder::abstract_method("Abstract").annotation(inheritance_demand()))
            .method(constructor(MemberAccess::Family)),
    )?;

    builder.add_type(
        TypeBuilder::class(SCENARIO_NAMESPACE, "VirtualMethodsClass")
            .extends(abstract_methods)
            .method(MethodBuilder::override_method("Abstract").annotation(inheritance_demand()))
            .method(MethodBuilder::virtual_method("Virtual").annotation(inheritance_demand()))
            .method(constructor(MemberAccess::Public)),
    )?;

    builder.add_type(
        TypeBuilder::class(SCENARIO_NAMESPACE, "NoVirtualMethodsClass")
            .method(MethodBuilder::new("Method").annotation(inheritance_demand()))
            .method(MethodBuilder::static_method("StaticMethod").annotation(inheritance_demand()))
            .method(constructor(MemberAccess::Public)),
    )?;

    builder.add_type(
        TypeBuilder::class(SCENARIO_NAMESPACE, "NotInheritanceDemandClass")
            .abstract_type()
            .method(MethodBuilder::abstract_method("Abstract").annotation(link_demand()))
            .method(MethodBuilder::virtual_method("Virtual").annotation(demand()))
            .method(MethodBuilder::new("Method").annotation(link_demand()))
            .method(MethodBuilder::static_method("StaticMethod").annotation(demand()))
            .method(constructor(MemberAccess::Family)),
    )?;

    builder.build()
}

/// Rule that panics on every method, for exercising fault isolation.
pub struct PanickingRule;

impl PanickingRule {
    pub const ID: &'static str = "test.panicking";
}

impl Rule for PanickingRule {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Panicking"
    }

    fn description(&self) -> &str {
        "Panics on every method"
    }

    fn check_method(&self, method: &Method, _ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        panic!("unexpected method {}", method.name)
    }
}
