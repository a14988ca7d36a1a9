//! modelgen core - Schema metadata model and dialect contract
//!
//! This crate provides the engine-agnostic types that the dialect providers
//! and the model generator share. It defines:
//!
//! - `DialectOptions` - Trait every database engine implements
//! - `TableData` - Normalized snapshot of an introspected schema
//! - `Relation` - Association edges derived from foreign keys
//! - `ModelgenError` - Error type shared across the workspace

mod dialect;
mod error;
pub mod relations;
mod schema;

pub use dialect::*;
pub use error::*;
pub use relations::{Cardinality, Relation, build_relations};
pub use schema::*;
