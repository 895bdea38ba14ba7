//! HTTP Handlers

mod detection;
mod files;
mod ping;
mod report;
mod websocket;

pub use detection::*;
pub use files::*;
pub use ping::*;
pub use report::*;
pub use websocket::*;
