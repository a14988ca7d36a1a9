//! Generator configuration
//!
//! Options are plain serde data so a front end can load them from TOML or
//! JSON before any synthesis work starts.

mod options;

#[cfg(test)]
mod tests;

pub use options::*;
