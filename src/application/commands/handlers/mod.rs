//! Command Handlers

mod detection_handlers;
mod file_handlers;
mod report_handlers;

pub use detection_handlers::*;
pub use file_handlers::*;
pub use report_handlers::*;
