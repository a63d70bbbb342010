//! Data types for the multi-pane grid engine.

mod column;
mod config;
mod scroll;

pub use column::*;
pub use config::*;
pub use scroll::*;
