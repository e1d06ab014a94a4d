//! In-memory script host that behaves like the bundled wrapper running
//! against a live Ace editor.
//!
//! Like the wrapper, a mutation reports at most one `LinesChanged` (only when
//! the net line count moved) followed by one `TextChanged`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::{json, Value};
use url::Url;

use crate::assets::{EditorAssets, WRAPPER_JS};
use crate::error::{EditorError, Result};
use crate::host::{MessageHandler, ScriptHost};
use crate::protocol::{EditorCommand, EditorEvent, DISPATCH_FUNCTION};

/// Recover the command from a script built by `EditorCommand::to_script`.
/// Returns `None` for any other code.
pub fn parse_dispatch(script: &str) -> Option<EditorCommand> {
    let json = script
        .strip_prefix(DISPATCH_FUNCTION)?
        .strip_prefix('(')?
        .strip_suffix(')')?;
    serde_json::from_str(json).ok()
}

pub fn test_assets() -> EditorAssets {
    EditorAssets {
        page_url: Url::parse("file:///tmp/aceview/editor.html").unwrap(),
        ace_base: Url::parse("file:///opt/ace/").unwrap(),
    }
}

/// Observable state of the simulated page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub text: String,
    pub readonly_property: bool,
    pub cursor_line: Option<u32>,
    pub selection_clears: u32,
    pub mode: Option<(String, String)>,
    pub theme: Option<(String, String)>,
    pub commands: Vec<EditorCommand>,
}

impl Page {
    fn lines(&self) -> u32 {
        self.text.split('\n').count() as u32
    }
}

#[derive(Default)]
struct Inner {
    calls: RefCell<Vec<String>>,
    load_error: RefCell<Option<String>>,
    no_editor: Cell<bool>,
    loaded: Cell<bool>,
    handler: RefCell<Option<MessageHandler>>,
    page: RefCell<Page>,
}

#[derive(Clone, Default)]
pub struct FakeHost {
    inner: Rc<Inner>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_load(&self, reason: &str) {
        *self.inner.load_error.borrow_mut() = Some(reason.to_string());
    }

    pub fn without_editor(&self) {
        self.inner.no_editor.set(true);
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.borrow().clone()
    }

    pub fn page(&self) -> Page {
        self.inner.page.borrow().clone()
    }

    /// Deliver a message as if the page had posted it.
    pub fn post(&self, message: &str) {
        if let Some(handler) = self.inner.handler.borrow().as_ref() {
            handler(message);
        }
    }

    fn post_event(&self, event: &EditorEvent) {
        self.post(&serde_json::to_string(event).unwrap());
    }

    fn apply(&self, cmd: EditorCommand) -> Result<Value> {
        let mut events = Vec::new();
        let result = {
            let mut page = self.inner.page.borrow_mut();
            page.commands.push(cmd.clone());
            match cmd {
                EditorCommand::GetLines => json!(page.lines()),
                EditorCommand::GotoLine { line } => {
                    page.cursor_line = Some(line);
                    Value::Null
                }
                EditorCommand::GetText => json!(page.text),
                EditorCommand::SetText { text } => {
                    let before = page.lines();
                    page.text = text;
                    let after = page.lines();
                    if after != before {
                        events.push(EditorEvent::LinesChanged { lines: after });
                    }
                    events.push(EditorEvent::TextChanged);
                    Value::Null
                }
                EditorCommand::ClearSelection => {
                    page.selection_clears += 1;
                    Value::Null
                }
                EditorCommand::GetReadOnly => json!(page.readonly_property),
                EditorCommand::SetReadOnly { read_only } => {
                    page.readonly_property = read_only;
                    Value::Null
                }
                EditorCommand::SetMode { name, url } => {
                    page.mode = Some((name, url));
                    Value::Null
                }
                EditorCommand::SetTheme { name, url } => {
                    page.theme = Some((name, url));
                    Value::Null
                }
            }
        };
        // The page borrow is released before listeners run; they may query back.
        for event in &events {
            self.post_event(event);
        }
        Ok(result)
    }
}

impl ScriptHost for FakeHost {
    fn load(&self, uri: &str) -> Result<()> {
        self.inner.calls.borrow_mut().push(format!("load {}", uri));
        if let Some(reason) = self.inner.load_error.borrow().clone() {
            return Err(EditorError::ResourceLoad {
                uri: uri.to_string(),
                reason,
            });
        }
        self.inner.loaded.set(true);
        Ok(())
    }

    fn evaluate(&self, code: &str) -> Result<Value> {
        if !self.inner.loaded.get() {
            return Err(EditorError::Host("evaluate before load".to_string()));
        }
        if code == WRAPPER_JS {
            self.inner
                .calls
                .borrow_mut()
                .push("evaluate <wrapper>".to_string());
            return Ok(Value::Bool(!self.inner.no_editor.get()));
        }
        self.inner.calls.borrow_mut().push(format!("evaluate {}", code));
        if let Some(cmd) = parse_dispatch(code) {
            return self.apply(cmd);
        }
        if code.starts_with("throw") {
            return Err(EditorError::Evaluation(format!("Uncaught {}", code)));
        }
        Ok(Value::Null)
    }

    fn register_handler(&self, name: &str, handler: MessageHandler) -> Result<()> {
        self.inner.calls.borrow_mut().push(format!("register {}", name));
        *self.inner.handler.borrow_mut() = Some(handler);
        Ok(())
    }
}
