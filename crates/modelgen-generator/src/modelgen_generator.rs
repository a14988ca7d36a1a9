//! modelgen generator - Model synthesis from normalized schema metadata
//!
//! This crate provides:
//! - Generator configuration, loadable from TOML
//! - Validation rules and the resolver that turns declared type bounds into
//!   field constraints
//! - The synthesis entry point [`generate`], producing one model definition per
//!   table

pub mod config;
pub mod generator;
pub mod validation;

pub use config::*;
pub use generator::*;
pub use validation::*;
