use fs2::FileExt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::catalog::{mode_resource, theme_resource};
use crate::error::{EditorError, Result};

pub const EDITOR_HTML: &str = include_str!("../web/editor.html");
pub const WRAPPER_JS: &str = include_str!("../web/wrapper.js");

pub const PAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

const ACE_BASE_PLACEHOLDER: &str = "{{ACE_BASE}}";

/// Locations the bridge needs at runtime: the host page and the directory
/// holding the Ace build (`ace.js`, `mode-*.js`, `theme-*.js`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorAssets {
    pub page_url: Url,
    pub ace_base: Url,
}

impl EditorAssets {
    pub fn resource_url(&self, resource: &str) -> Result<Url> {
        self.ace_base
            .join(resource)
            .map_err(|e| EditorError::Assets(format!("Bad resource path {:?}: {}", resource, e)))
    }

    pub fn mode_url(&self, id: &str) -> Result<Url> {
        self.resource_url(&mode_resource(id))
    }

    pub fn theme_url(&self, id: &str) -> Result<Url> {
        self.resource_url(&theme_resource(id))
    }
}

/// Default location of the Ace build: `<data_dir>/aceview/ace/`.
pub fn default_ace_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| EditorError::Assets("Cannot determine data home directory".to_string()))?;
    Ok(data_dir.join("aceview").join("ace"))
}

/// Turn a directory into a `file://` URL with a trailing slash so relative
/// resources join under it.
pub fn dir_url(dir: &Path) -> Result<Url> {
    Url::from_directory_path(dir)
        .map_err(|_| EditorError::Assets(format!("Not an absolute directory path: {:?}", dir)))
}

/// Fill the Ace base URL into the bundled page template.
pub fn render_editor_html(ace_base: &Url) -> String {
    EDITOR_HTML.replace(ACE_BASE_PLACEHOLDER, ace_base.as_str())
}

/// Write `editor.html` into `target_dir`, pointing it at the Ace build in
/// `ace_dir`.
pub fn extract_page(target_dir: &Path, ace_dir: &Path) -> Result<EditorAssets> {
    let ace_base = dir_url(ace_dir)?;

    std::fs::create_dir_all(target_dir)
        .map_err(|e| EditorError::Assets(format!("Failed to create {:?}: {}", target_dir, e)))?;

    let page_path = target_dir.join("editor.html");
    std::fs::write(&page_path, render_editor_html(&ace_base))
        .map_err(|e| EditorError::Assets(format!("Failed to write editor.html: {}", e)))?;

    let page_url = Url::from_file_path(&page_path)
        .map_err(|_| EditorError::Assets(format!("Not an absolute path: {:?}", page_path)))?;

    Ok(EditorAssets { page_url, ace_base })
}

/// Ensure the host page is extracted to the local data directory.
///
/// The page lives at `<data_dir>/aceview/page/<version>/editor.html`
/// (e.g. `~/.local/share/aceview/page/0.3.0/` on Linux). It is rewritten
/// on every call since it embeds `ace_dir`.
pub fn ensure_page_extracted(ace_dir: &Path) -> Result<EditorAssets> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| EditorError::Assets("Cannot determine data home directory".to_string()))?;
    let page_root = data_dir.join("aceview").join("page");

    // Exclusive lock so two processes don't write the page at the same time
    std::fs::create_dir_all(&page_root)
        .map_err(|e| EditorError::Assets(format!("Failed to create lock directory: {}", e)))?;
    let lock_file = std::fs::File::create(page_root.join(".extract.lock"))
        .map_err(|e| EditorError::Assets(format!("Failed to create lock file: {}", e)))?;
    lock_file
        .lock_exclusive()
        .map_err(|e| EditorError::Assets(format!("Failed to acquire extraction lock: {}", e)))?;

    let page_dir = page_root.join(PAGE_VERSION);
    log::info!("Extracting editor page v{} to {:?}", PAGE_VERSION, page_dir);
    let assets = extract_page(&page_dir, ace_dir)?;

    if !ace_dir.join("ace.js").is_file() {
        log::warn!(
            "No ace.js in {:?}; the editor will fail to initialise",
            ace_dir
        );
    }

    Ok(assets)
}
