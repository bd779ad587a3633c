//! Language codes and remotely loaded translation payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::preference::PreferenceValue;

/// Language selected when nothing is persisted.
pub const DEFAULT_LANGUAGE: &str = "de";

/// Confirmation shown for languages without a dedicated message.
pub const FALLBACK_CHANGE_MESSAGE: &str = "Language changed!";

/// Short language tag (`de`, `en`, `fr`, `ar`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Wrap a tag, normalising case and surrounding whitespace.
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_lowercase())
    }

    /// Tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Success message announcing a manual switch to this language.
    #[must_use]
    pub fn change_message(&self) -> &'static str {
        match self.as_str() {
            "en" => "Language changed to English!",
            "fr" => "Langue changée en français!",
            "de" => "Die Sprache wurde zu Deutsch geändert!",
            "ar" => "تم تغيير اللغة إلى العربية!",
            _ => FALLBACK_CHANGE_MESSAGE,
        }
    }

    /// Path of the translation payload relative to the API base.
    #[must_use]
    pub fn translation_path(&self) -> String {
        format!("language/{}.json", self.0)
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl PreferenceValue for LanguageCode {
    fn encode(&self) -> String {
        self.0.clone()
    }

    fn decode(raw: &str) -> Option<Self> {
        let code = Self::new(raw);
        (!code.0.is_empty()).then_some(code)
    }
}

/// Translation payload for one language with dotted-path lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct Translations {
    /// Language the payload was loaded for.
    pub language: LanguageCode,
    tree: Value,
    rtl: bool,
}

impl Translations {
    /// Wrap a parsed payload; `meta.rtl` drives the layout direction.
    #[must_use]
    pub fn new(language: LanguageCode, tree: Value) -> Self {
        let rtl = tree
            .get("meta")
            .and_then(|meta| meta.get("rtl"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Self {
            language,
            tree,
            rtl,
        }
    }

    /// Resolve a dotted path (`section.key`), falling back to `default`.
    #[must_use]
    pub fn text(&self, path: &str, default: &str) -> String {
        resolve(&self.tree, path).unwrap_or_else(|| default.to_string())
    }

    /// Whether the language prefers right-to-left layout.
    #[must_use]
    pub const fn rtl(&self) -> bool {
        self.rtl
    }

    /// Raw payload.
    #[must_use]
    pub const fn tree(&self) -> &Value {
        &self.tree
    }
}

fn resolve(tree: &Value, path: &str) -> Option<String> {
    let mut node = tree;
    for segment in path.split('.') {
        node = node.get(segment)?;
    }
    node.as_str().map(ToString::to_string)
}
