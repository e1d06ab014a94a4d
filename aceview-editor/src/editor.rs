use serde_json::Value;
use url::Url;

use crate::assets::EditorAssets;
use crate::bridge::{as_bool, as_string, as_u32, Bridge};
use crate::catalog::{is_valid_name, HighlightMode, Theme};
use crate::error::{EditorError, Result};
use crate::host::ScriptHost;
use crate::protocol::EditorCommand;

/// Typed API over an Ace editor running inside a [`ScriptHost`].
///
/// Nothing is cached on the Rust side: every query goes to the live page,
/// so a read always observes the preceding write.
pub struct Editor<H: ScriptHost> {
    bridge: Bridge<H>,
}

impl<H: ScriptHost> Editor<H> {
    /// Bootstrap the page in `host`. Blocks until the page has loaded and
    /// the wrapper is installed.
    pub fn new(host: H, assets: EditorAssets) -> Result<Self> {
        let bridge = Bridge::bootstrap(host, assets)?;
        Ok(Editor { bridge })
    }

    pub fn bridge(&self) -> &Bridge<H> {
        &self.bridge
    }

    /// Number of lines in the document. An empty document has one line.
    pub fn lines(&self) -> Result<u32> {
        as_u32(self.bridge.send(&EditorCommand::GetLines)?)
    }

    /// Move the cursor to `line` (1-based). Out-of-range values are clamped
    /// by Ace.
    pub fn goto_line(&self, line: u32) -> Result<()> {
        self.bridge.send(&EditorCommand::GotoLine { line })?;
        Ok(())
    }

    pub fn text(&self) -> Result<String> {
        as_string(self.bridge.send(&EditorCommand::GetText)?)
    }

    /// Replace the whole document and drop the selection Ace leaves behind.
    pub fn set_text(&self, text: &str) -> Result<()> {
        self.bridge.send(&EditorCommand::SetText {
            text: text.to_string(),
        })?;
        self.bridge.send(&EditorCommand::ClearSelection)?;
        Ok(())
    }

    pub fn is_read_only(&self) -> Result<bool> {
        as_bool(self.bridge.send(&EditorCommand::GetReadOnly)?)
    }

    pub fn set_read_only(&self, read_only: bool) -> Result<()> {
        self.bridge.send(&EditorCommand::SetReadOnly { read_only })?;
        Ok(())
    }

    pub fn set_highlight_mode(&self, mode: HighlightMode) -> Result<()> {
        let url = self.bridge.assets().mode_url(mode.id())?;
        self.set_custom_highlight_mode(mode.id(), &url)
    }

    /// Load a mode that isn't in [`HighlightMode`] from `url` and activate it
    /// as `ace/mode/<name>`.
    pub fn set_custom_highlight_mode(&self, name: &str, url: &Url) -> Result<()> {
        check_name(name)?;
        self.bridge.send(&EditorCommand::SetMode {
            name: name.to_string(),
            url: url.to_string(),
        })?;
        Ok(())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        let url = self.bridge.assets().theme_url(theme.id())?;
        self.set_custom_theme(theme.id(), &url)
    }

    /// Load a theme that isn't in [`Theme`] from `url` and activate it as
    /// `ace/theme/<name>`.
    pub fn set_custom_theme(&self, name: &str, url: &Url) -> Result<()> {
        check_name(name)?;
        self.bridge.send(&EditorCommand::SetTheme {
            name: name.to_string(),
            url: url.to_string(),
        })?;
        Ok(())
    }

    /// Run arbitrary JavaScript in the page.
    pub fn evaluate_javascript(&self, code: &str) -> Result<Value> {
        self.bridge.evaluate(code)
    }

    pub fn connect_lines_changed<F: Fn(u32) + 'static>(&self, f: F) {
        self.bridge.connect_lines_changed(f);
    }

    pub fn connect_text_changed<F: Fn() + 'static>(&self, f: F) {
        self.bridge.connect_text_changed(f);
    }
}

fn check_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(EditorError::InvalidName(name.to_string()))
    }
}
