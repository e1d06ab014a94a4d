pub mod assets;
pub mod bridge;
pub mod catalog;
pub mod editor;
pub mod error;
pub mod host;
pub mod protocol;

#[cfg(test)]
mod testing;

pub use bridge::Bridge;
pub use catalog::{HighlightMode, Theme};
pub use editor::Editor;
pub use error::EditorError;
pub use host::ScriptHost;

/// Name under which the native side is exposed to the page.
pub const HANDLER_NAME: &str = "aceview";
