//! Application module: the `App` model driven by the runtime and drawn by
//! the UI, plus the key bindings that feed it.

mod command;
mod model;

pub use command::{Command, TextEdit, map_key};
pub use model::*;
