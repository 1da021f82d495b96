//! Rules about declarative security annotations.
//!
//! # Key Components
//!
//! - [`NonVirtualInheritanceDemandRule`] - `InheritanceDemand` on methods that can not be overridden
//! - [`SealedTypeInheritanceDemandRule`] - `InheritanceDemand` on types that can not be derived from

mod nonvirtual_inheritance_demand;
mod sealed_type_inheritance_demand;

pub use nonvirtual_inheritance_demand::{
    NonVirtualInheritanceDemandConfig, NonVirtualInheritanceDemandRule,
};
pub use sealed_type_inheritance_demand::SealedTypeInheritanceDemandRule;
