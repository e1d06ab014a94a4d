/// Errors produced while bootstrapping or driving the embedded editor.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Failed to load {uri}: {reason}")]
    ResourceLoad { uri: String, reason: String },

    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    #[error("Expected {expected} from script, got {found}")]
    Conversion {
        expected: &'static str,
        found: String,
    },

    #[error("Invalid mode or theme name: {0:?}")]
    InvalidName(String),

    #[error("Script host error: {0}")]
    Host(String),

    #[error("Asset error: {0}")]
    Assets(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
