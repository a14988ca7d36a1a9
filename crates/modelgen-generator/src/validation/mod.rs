//! Validation injection
//!
//! Rules come from configuration; the resolver decides per column whether a
//! constraint is emitted and renders its message.

mod resolver;
mod rule;


pub use resolver::*;
pub use rule::*;
