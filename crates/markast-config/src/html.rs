//! HTML output configuration.
//!
//! This module contains the `HtmlConfig` struct which controls how the
//! HTML renderer turns a document into markup.

use serde::{Deserialize, Serialize};

/// What a soft line break becomes in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoftBreak {
    /// Keep the line break
    #[default]
    Newline,
    /// Join the lines with a space
    Space,
}

impl SoftBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoftBreak::Newline => "\n",
            SoftBreak::Space => " ",
        }
    }
}

/// HTML renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HtmlConfig {
    /// Prefix for the class of highlighted code blocks.
    /// Default: "language-"
    #[serde(default = "default_language_prefix")]
    pub language_prefix: String,

    /// Code block language rendered as `<pre class="...">` for a client-side
    /// diagram library. Empty disables it.
    /// Default: "mermaid"
    #[serde(default = "default_diagram_language")]
    pub diagram_language: String,

    /// Soft break rendering.
    /// Default: newline
    #[serde(default)]
    pub soft_break: SoftBreak,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            language_prefix: default_language_prefix(),
            diagram_language: default_diagram_language(),
            soft_break: SoftBreak::Newline,
        }
    }
}

impl HtmlConfig {
    /// Merge another HtmlConfig into this one.
    ///
    /// TOML cannot tell "unset" from "default", so every field is copied.
    pub fn merge(&mut self, other: &HtmlConfig) {
        self.language_prefix = other.language_prefix.clone();
        self.diagram_language = other.diagram_language.clone();
        self.soft_break = other.soft_break;
    }

    /// Whether `language` is the reserved diagram language.
    pub fn is_diagram(&self, language: &str) -> bool {
        !self.diagram_language.is_empty() && language.eq_ignore_ascii_case(&self.diagram_language)
    }
}

fn default_language_prefix() -> String {
    "language-".to_string()
}

fn default_diagram_language() -> String {
    "mermaid".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let html = HtmlConfig::default();
        assert_eq!(html.language_prefix, "language-");
        assert!(html.is_diagram("mermaid"));
        assert!(html.is_diagram("Mermaid"));
        assert!(!html.is_diagram("rust"));
        assert_eq!(html.soft_break.as_str(), "\n");
    }

    #[test]
    fn test_serde_pascal_case() {
        let toml_str = r#"
            LanguagePrefix = "lang-"
            DiagramLanguage = ""
            SoftBreak = "space"
        "#;

        let html: HtmlConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(html.language_prefix, "lang-");
        assert!(!html.is_diagram("mermaid"));
        assert_eq!(html.soft_break, SoftBreak::Space);
    }

    #[test]
    fn test_merge() {
        let mut base = HtmlConfig::default();
        let other = HtmlConfig {
            soft_break: SoftBreak::Space,
            ..HtmlConfig::default()
        };
        base.merge(&other);
        assert_eq!(base.soft_break, SoftBreak::Space);
    }
}
