use serde::{Deserialize, Serialize};

use crate::host::escape_separators;

// ---------------------------------------------------------------------------
// Commands: Rust → Ace (sent via ScriptHost::evaluate)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EditorCommand {
    GetLines,
    GotoLine { line: u32 },
    GetText,
    SetText { text: String },
    ClearSelection,
    GetReadOnly,
    SetReadOnly { read_only: bool },
    SetMode { name: String, url: String },
    SetTheme { name: String, url: String },
}

/// Page-side entry point that receives serialized commands.
pub const DISPATCH_FUNCTION: &str = "aceview.dispatch";

impl EditorCommand {
    /// Build the JavaScript call that delivers this command to the page.
    ///
    /// The command is passed as a JSON object literal, so free-form text is
    /// never spliced into the script source unescaped.
    pub fn to_script(&self) -> Result<String, serde_json::Error> {
        let json = escape_separators(serde_json::to_string(self)?);
        Ok(format!("{}({})", DISPATCH_FUNCTION, json))
    }
}

// ---------------------------------------------------------------------------
// Events: Ace → Rust (posted through the registered handler)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EditorEvent {
    LinesChanged { lines: u32 },
    TextChanged,
    /// Ace could not fetch a mode or theme script.
    ResourceFailed { url: String },
}

impl EditorEvent {
    pub fn parse(message: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(message)
    }
}
