//! Model synthesis
//!
//! Turns a [`TableData`](modelgen_core::TableData) snapshot into one model
//! definition module per table.

mod defaults;
mod js;
mod naming;
mod synthesis;
mod types;


pub use defaults::render_default_value;
pub use naming::{apply_case, js_identifier, singularize};
pub use synthesis::*;
pub use types::map_data_type;
