use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::assets::{EditorAssets, WRAPPER_JS};
use crate::error::{EditorError, Result};
use crate::host::{describe, ScriptHost};
use crate::protocol::{EditorCommand, EditorEvent};
use crate::HANDLER_NAME;

type LinesListener = Rc<dyn Fn(u32)>;
type TextListener = Rc<dyn Fn()>;

/// Outbound notification fan-out. Listeners are cloned out before being
/// called, so a listener may connect further listeners.
#[derive(Default)]
struct Notifier {
    lines_changed: RefCell<Vec<LinesListener>>,
    text_changed: RefCell<Vec<TextListener>>,
}

impl Notifier {
    fn emit_lines_changed(&self, lines: u32) {
        let listeners = self.lines_changed.borrow().clone();
        for listener in listeners {
            listener(lines);
        }
    }

    fn emit_text_changed(&self) {
        let listeners = self.text_changed.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    fn handle_message(&self, message: &str) {
        match EditorEvent::parse(message) {
            Ok(EditorEvent::LinesChanged { lines }) => self.emit_lines_changed(lines),
            Ok(EditorEvent::TextChanged) => self.emit_text_changed(),
            Ok(EditorEvent::ResourceFailed { url }) => {
                log::warn!("Editor failed to load mode/theme script {}", url)
            }
            Err(e) => log::warn!("Failed to parse EditorEvent: {} (json: {})", e, message),
        }
    }
}

/// Owns the script host and the page-side wiring.
///
/// A `Bridge` only exists once bootstrap has succeeded, so every method can
/// assume the page and wrapper are live.
pub struct Bridge<H: ScriptHost> {
    host: H,
    assets: EditorAssets,
    notifier: Rc<Notifier>,
}

impl<H: ScriptHost> Bridge<H> {
    /// Load the host page, expose the native handler, then run the wrapper.
    pub fn bootstrap(host: H, assets: EditorAssets) -> Result<Self> {
        let page = assets.page_url.to_string();
        log::info!("Loading editor page {}", page);
        host.load(&page)?;

        let notifier = Rc::new(Notifier::default());
        let for_page = notifier.clone();
        host.register_handler(
            HANDLER_NAME,
            Box::new(move |message| for_page.handle_message(message)),
        )?;

        match host.evaluate(WRAPPER_JS)? {
            Value::Bool(true) => {}
            other => {
                return Err(EditorError::ResourceLoad {
                    uri: assets.ace_base.to_string(),
                    reason: format!(
                        "editor library did not initialise (wrapper returned {})",
                        describe(&other)
                    ),
                });
            }
        }
        log::info!("Editor bridge ready");

        Ok(Bridge {
            host,
            assets,
            notifier,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn assets(&self) -> &EditorAssets {
        &self.assets
    }

    pub fn evaluate(&self, code: &str) -> Result<Value> {
        self.host.evaluate(code)
    }

    pub fn evaluate_bool(&self, code: &str) -> Result<bool> {
        as_bool(self.evaluate(code)?)
    }

    pub fn evaluate_u32(&self, code: &str) -> Result<u32> {
        as_u32(self.evaluate(code)?)
    }

    pub fn evaluate_string(&self, code: &str) -> Result<String> {
        as_string(self.evaluate(code)?)
    }

    /// Deliver a command to the page and return its result.
    pub fn send(&self, cmd: &EditorCommand) -> Result<Value> {
        let script = cmd.to_script()?;
        log::debug!("Sending {:?}", cmd);
        self.evaluate(&script)
    }

    /// Called when the page reports a new line count.
    pub fn on_lines_changed(&self, lines: u32) {
        self.notifier.emit_lines_changed(lines);
    }

    /// Called when the page reports any text mutation.
    pub fn on_text_changed(&self) {
        self.notifier.emit_text_changed();
    }

    pub fn connect_lines_changed<F: Fn(u32) + 'static>(&self, f: F) {
        self.notifier.lines_changed.borrow_mut().push(Rc::new(f));
    }

    pub fn connect_text_changed<F: Fn() + 'static>(&self, f: F) {
        self.notifier.text_changed.borrow_mut().push(Rc::new(f));
    }
}

pub fn as_bool(value: Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(EditorError::Conversion {
            expected: "boolean",
            found: describe(&other),
        }),
    }
}

pub fn as_u32(value: Value) -> Result<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .or_else(|| {
            // Engines may report integral numbers as floats
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                .map(|f| f as u32)
        })
        .ok_or_else(|| EditorError::Conversion {
            expected: "unsigned integer",
            found: describe(&value),
        })
}

pub fn as_string(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(EditorError::Conversion {
            expected: "string",
            found: describe(&other),
        }),
    }
}
