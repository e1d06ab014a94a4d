//! Static tables of the highlight modes and themes the widget knows about.
//!
//! Each entry maps to the identifier Ace registers it under and to the script
//! resource that provides it. Anything outside these tables can still be used
//! through the custom name + URL calls on [`crate::Editor`].

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightMode {
    #[serde(rename = "c_cpp")]
    Cpp,
    #[serde(rename = "css")]
    Css,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "pascal")]
    Pascal,
    #[serde(rename = "php")]
    Php,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "ruby")]
    Ruby,
    #[serde(rename = "xml")]
    Xml,
}

impl HighlightMode {
    pub const ALL: [HighlightMode; 9] = [
        HighlightMode::Cpp,
        HighlightMode::Css,
        HighlightMode::Html,
        HighlightMode::JavaScript,
        HighlightMode::Pascal,
        HighlightMode::Php,
        HighlightMode::Python,
        HighlightMode::Ruby,
        HighlightMode::Xml,
    ];

    /// Identifier inside Ace's registry (`ace/mode/<id>`).
    pub fn id(self) -> &'static str {
        match self {
            HighlightMode::Cpp => "c_cpp",
            HighlightMode::Css => "css",
            HighlightMode::Html => "html",
            HighlightMode::JavaScript => "javascript",
            HighlightMode::Pascal => "pascal",
            HighlightMode::Php => "php",
            HighlightMode::Python => "python",
            HighlightMode::Ruby => "ruby",
            HighlightMode::Xml => "xml",
        }
    }

    /// Script file providing the mode, relative to the Ace base directory.
    pub fn resource(self) -> String {
        mode_resource(self.id())
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }

    /// Guess a mode from a file name's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "c" | "h" | "cc" | "cpp" | "cxx" | "hh" | "hpp" | "hxx" => Some(HighlightMode::Cpp),
            "css" => Some(HighlightMode::Css),
            "html" | "htm" | "xhtml" => Some(HighlightMode::Html),
            "js" | "mjs" | "cjs" | "json" => Some(HighlightMode::JavaScript),
            "pas" | "pp" | "dpr" | "lpr" => Some(HighlightMode::Pascal),
            "php" | "phtml" => Some(HighlightMode::Php),
            "py" | "pyi" | "pyw" => Some(HighlightMode::Python),
            "rb" | "rake" | "gemspec" => Some(HighlightMode::Ruby),
            "xml" | "xsd" | "xsl" | "svg" | "ui" => Some(HighlightMode::Xml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "ambiance")]
    Ambiance,
    #[serde(rename = "monokai")]
    Monokai,
    #[serde(rename = "textmate")]
    TextMate,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Ambiance, Theme::Monokai, Theme::TextMate];

    /// Identifier inside Ace's registry (`ace/theme/<id>`).
    pub fn id(self) -> &'static str {
        match self {
            Theme::Ambiance => "ambiance",
            Theme::Monokai => "monokai",
            Theme::TextMate => "textmate",
        }
    }

    pub fn resource(self) -> String {
        theme_resource(self.id())
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

pub fn mode_resource(id: &str) -> String {
    format!("mode-{}.js", id)
}

pub fn theme_resource(id: &str) -> String {
    format!("theme-{}.js", id)
}

/// Ace identifiers are plain `[A-Za-z0-9_]` words.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpp_mode_resolves() {
        assert_eq!(HighlightMode::Cpp.id(), "c_cpp");
        assert_eq!(HighlightMode::Cpp.resource(), "mode-c_cpp.js");
    }

    #[test]
    fn every_mode_resource_matches_id() {
        for mode in HighlightMode::ALL {
            assert_eq!(mode.resource(), format!("mode-{}.js", mode.id()));
            assert_eq!(HighlightMode::from_id(mode.id()), Some(mode));
        }
        let ids: Vec<_> = HighlightMode::ALL.iter().map(|m| m.id()).collect();
        assert_eq!(
            ids,
            ["c_cpp", "css", "html", "javascript", "pascal", "php", "python", "ruby", "xml"]
        );
    }

    #[test]
    fn monokai_theme_resolves() {
        assert_eq!(Theme::Monokai.id(), "monokai");
        assert_eq!(Theme::Monokai.resource(), "theme-monokai.js");
    }

    #[test]
    fn every_theme_resource_matches_id() {
        for theme in Theme::ALL {
            assert_eq!(theme.resource(), format!("theme-{}.js", theme.id()));
            assert_eq!(Theme::from_id(theme.id()), Some(theme));
        }
        assert_eq!(Theme::TextMate.id(), "textmate");
        assert_eq!(Theme::Ambiance.id(), "ambiance");
    }

    #[test]
    fn unknown_ids() {
        assert_eq!(HighlightMode::from_id("cobol"), None);
        assert_eq!(Theme::from_id("solarized"), None);
    }

    #[test]
    fn serde_uses_ace_ids() {
        assert_eq!(
            serde_json::to_string(&HighlightMode::Cpp).unwrap(),
            "\"c_cpp\""
        );
        assert_eq!(
            serde_json::from_str::<Theme>("\"textmate\"").unwrap(),
            Theme::TextMate
        );
    }

    #[test]
    fn mode_from_path() {
        assert_eq!(
            HighlightMode::from_path(Path::new("/src/main.cpp")),
            Some(HighlightMode::Cpp)
        );
        assert_eq!(
            HighlightMode::from_path(Path::new("lib/Widget.H")),
            Some(HighlightMode::Cpp)
        );
        assert_eq!(
            HighlightMode::from_path(Path::new("setup.py")),
            Some(HighlightMode::Python)
        );
        assert_eq!(
            HighlightMode::from_path(Path::new("index.htm")),
            Some(HighlightMode::Html)
        );
        assert_eq!(HighlightMode::from_path(Path::new("Makefile")), None);
        assert_eq!(HighlightMode::from_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name("c_cpp"));
        assert!(is_valid_name("tomorrow_night"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("../evil"));
        assert!(!is_valid_name("mode'); alert(1"));
    }
}
