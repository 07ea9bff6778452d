//! Parameter filter
//!
//! Untrusted input becomes `Parameters`. `require` selects a sub-tree,
//! `permit` projects it onto a `PermitSpec`, and only the permitted result
//! may be used for mass assignment.
//!
//! # Design Principles
//!
//! - Input is never mutated; every operation returns a fresh tree
//! - A key passes only if the spec names it with a matching shape
//! - Dropped keys are reported, once per `permit` call

mod config;
mod errors;
mod parameters;
mod spec;

pub use config::{ParamsConfig, DEFAULT_ALWAYS_PERMITTED};
pub use errors::{ParamError, ParamResult};
pub use parameters::{is_blank, Parameters};
pub use spec::{PermitSpec, Rule};

pub(crate) use spec::json_type_name;
