//! strongparams - permit-list filtering of untrusted input
//!
//! Request input is wrapped in `Parameters`. Only trees produced by
//! `permit` may be mass-assigned onto `Article` or `Comment`.
//!
//! ```ignore
//! use strongparams::db::Database;
//! use strongparams::params::{Parameters, PermitSpec};
//!
//! let params = Parameters::from_value(body);
//! let article = params
//!     .require("article")?
//!     .permit(&PermitSpec::keys(["title", "body"]));
//! Database::new()?.create_article(&article)?;
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod model;
pub mod observability;
pub mod params;
pub mod resources;
pub mod views;
