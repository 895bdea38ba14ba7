//! Query Handlers

mod detection_handlers;
mod file_handlers;

pub use detection_handlers::*;
pub use file_handlers::*;
