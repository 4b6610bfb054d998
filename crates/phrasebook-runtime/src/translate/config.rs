#![forbid(unsafe_code)]

//! Binding configuration and its accepted call shapes.
//!
//! An enhancer can be configured with nothing, with a bare scope name, or
//! with a full [`BindingConfiguration`]. All three are spelled as
//! [`TranslateOptions`] and normalized once, at enhancer construction, into
//! the canonical form.
//!
//! # Loading
//!
//! With the `binding-config` feature a configuration can be read from TOML
//! or JSON. Both the snake_case names and the camelCase names used by
//! JavaScript projects are accepted:
//!
//! ```toml
//! polyglotScope = "checkout"
//!
//! [ownPhrases]
//! title = "Basket"
//! ```

#[cfg(feature = "binding-config")]
use std::path::Path;
use std::rc::Rc;

#[cfg(feature = "binding-config")]
use serde::Deserialize;

use phrasebook_i18n::{PhraseNode, PhraseTree};

/// Canonical per-binding configuration.
///
/// Fixed for the lifetime of a binding. `own_phrases` is compared by pointer
/// when deciding whether to rebuild a translator, so it is held behind an
/// `Rc` that every clone of the configuration shares.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "binding-config", derive(Deserialize))]
#[cfg_attr(feature = "binding-config", serde(default))]
pub struct BindingConfiguration {
    /// Top-level phrase key selecting a subtree; empty means the root.
    #[cfg_attr(
        feature = "binding-config",
        serde(alias = "polyglotScope", alias = "polyglot_scope")
    )]
    pub scope: String,
    /// Overrides merged over the selected subtree, one level deep.
    #[cfg_attr(feature = "binding-config", serde(alias = "ownPhrases"))]
    pub own_phrases: Rc<PhraseTree>,
}

impl BindingConfiguration {
    /// Configuration selecting `scope`.
    #[must_use]
    pub fn scoped(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }

    /// Replace the override table.
    #[must_use]
    pub fn with_own_phrases(mut self, phrases: impl Into<Rc<PhraseTree>>) -> Self {
        self.own_phrases = phrases.into();
        self
    }

    /// Add a single override.
    #[must_use]
    pub fn with_own_phrase(mut self, key: impl Into<String>, node: impl Into<PhraseNode>) -> Self {
        Rc::make_mut(&mut self.own_phrases).insert(key, node);
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "binding-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "binding-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "binding-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "binding-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }
}

/// The ways an enhancer may be configured.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TranslateOptions {
    /// No configuration: root scope, no overrides.
    #[default]
    NoConfig,
    /// Only a scope name.
    ScopeOnly(String),
    /// Scope and overrides.
    FullConfig(BindingConfiguration),
}

impl TranslateOptions {
    /// Collapse into the canonical configuration.
    #[must_use]
    pub fn normalize(self) -> BindingConfiguration {
        match self {
            Self::NoConfig => BindingConfiguration::default(),
            Self::ScopeOnly(scope) => BindingConfiguration::scoped(scope),
            Self::FullConfig(config) => config,
        }
    }

    /// Interpret a loosely typed JSON value.
    ///
    /// A string is a scope, an object is a full configuration, and anything
    /// else (including an object with mistyped fields) degrades to
    /// [`TranslateOptions::NoConfig`].
    #[cfg(feature = "binding-config")]
    #[must_use]
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(scope) => Self::ScopeOnly(scope.clone()),
            serde_json::Value::Object(_) => {
                match BindingConfiguration::deserialize(value) {
                    Ok(config) => Self::FullConfig(config),
                    Err(err) => {
                        tracing::warn!(error = %err, "unreadable binding configuration; using defaults");
                        Self::NoConfig
                    }
                }
            }
            other => {
                tracing::debug!(shape = %json_shape(other), "unrecognized binding configuration shape");
                Self::NoConfig
            }
        }
    }
}

#[cfg(feature = "binding-config")]
fn json_shape(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl From<()> for TranslateOptions {
    fn from((): ()) -> Self {
        Self::NoConfig
    }
}

impl From<&str> for TranslateOptions {
    fn from(scope: &str) -> Self {
        Self::ScopeOnly(scope.to_string())
    }
}

impl From<String> for TranslateOptions {
    fn from(scope: String) -> Self {
        Self::ScopeOnly(scope)
    }
}

impl From<BindingConfiguration> for TranslateOptions {
    fn from(config: BindingConfiguration) -> Self {
        Self::FullConfig(config)
    }
}

impl<T: Into<TranslateOptions>> From<Option<T>> for TranslateOptions {
    fn from(options: Option<T>) -> Self {
        options.map_or(Self::NoConfig, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "binding-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "binding-config")]
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "binding-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "binding-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "binding-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "binding-config")]
            Self::Json(e) => Some(e),
        }
    }
}
