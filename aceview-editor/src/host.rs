use serde::Deserialize;
use serde_json::Value;

use crate::error::{EditorError, Result};

/// Callback invoked with the raw string a page posts to a registered handler.
pub type MessageHandler = Box<dyn Fn(&str) + 'static>;

/// Capability interface over an embedded browser engine.
///
/// Implementations are UI-thread affine. All calls block until the engine
/// has answered; there is no timeout, so a hung engine hangs the caller.
pub trait ScriptHost {
    /// Load `uri` and wait until the engine reports load completion.
    fn load(&self, uri: &str) -> Result<()>;

    /// Evaluate a JavaScript source string in the page and return its
    /// completion value. `undefined` is reported as `Value::Null`; a thrown
    /// exception is reported as [`EditorError::Evaluation`].
    fn evaluate(&self, code: &str) -> Result<Value>;

    /// Expose `handler` to the page. Once registered, page code can call
    /// `window.aceviewPost(message)` and `handler` receives `message`.
    fn register_handler(&self, name: &str, handler: MessageHandler) -> Result<()>;
}

/// Encode `s` as a JavaScript string literal.
///
/// JSON strings are valid JavaScript literals except for the raw line and
/// paragraph separators, which older engines treat as line terminators.
pub fn js_string_literal(s: &str) -> String {
    escape_separators(serde_json::Value::String(s.to_string()).to_string())
}

pub(crate) fn escape_separators(json: String) -> String {
    if json.contains(|c: char| c == '\u{2028}' || c == '\u{2029}') {
        json.replace('\u{2028}', "\\u2028")
            .replace('\u{2029}', "\\u2029")
    } else {
        json
    }
}

/// Wrap `code` so that evaluating it always yields a JSON string envelope.
///
/// For engines that can only hand back strings. The code runs through an
/// indirect `eval` so declarations land in the global scope, and exceptions
/// are caught and reported in the envelope instead of being lost.
pub fn guard_script(code: &str) -> String {
    format!(
        "(function () {{ try {{ var v = (0, eval)({}); \
         return JSON.stringify({{ ok: v === undefined ? null : v }}); }} \
         catch (e) {{ return JSON.stringify({{ error: String(e) }}); }} }})()",
        js_string_literal(code)
    )
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode the string produced by a script wrapped with [`guard_script`].
pub fn decode_guarded(result: &str) -> Result<Value> {
    let envelope: Envelope = serde_json::from_str(result).map_err(|e| {
        EditorError::Host(format!("Malformed evaluation result {:?}: {}", result, e))
    })?;
    if let Some(error) = envelope.error {
        return Err(EditorError::Evaluation(error));
    }
    Ok(envelope.ok.unwrap_or(Value::Null))
}

/// Render a JSON value the way it would be shown in a conversion error.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => format!("boolean {}", value),
        Value::Number(_) => format!("number {}", value),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
