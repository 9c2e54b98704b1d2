//! Block-diagram connectivity for elaborated Strata designs.
//!
//! [`DiagramBlock::extract`] turns a hierarchy block into nested diagram
//! blocks whose links know which block ports they attach to, and whose
//! block ports know which link ports they attach to. The simplifier then
//! collapses compiler-generated bridge and adapter blocks, and a
//! [`ConnectivityIndex`] answers "what is connected to this port" across
//! the whole hierarchy.

#![warn(missing_docs)]

pub mod connectivity;
pub mod error;
pub mod errors;
pub mod extract;
pub mod model;
pub mod simplify;

pub use connectivity::{ConnectivityIndex, Highlight, NetEntry};
pub use error::{ExtractError, SimplifyError};
pub use model::{
    is_internal_name, DiagramBlock, DiagramLink, Export, LinkNet, ADAPTER_PREFIX, BRIDGE_PREFIX,
    CONSTRAINT_PREFIX,
};
pub use simplify::SimplifyOptions;
