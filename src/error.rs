//! Error types for editor bootstrap
//!
//! Only two kinds of failure exist: a configuration record missing a required
//! key, and an external resource (outline font or web font) that failed to load.

use thiserror::Error;

/// A required key was absent after defaults were applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Configuration must contain a property '{0}'.")]
    MissingKey(&'static str),
}

impl ConfigError {
    /// Name of the offending configuration key
    pub fn key(&self) -> &'static str {
        match self {
            Self::MissingKey(key) => key,
        }
    }
}

/// One of the concurrently loaded resources failed
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("font {path} could not be loaded: {reason}")]
    Font { path: String, reason: String },

    #[error("Webfonts [{families}] could not be loaded: {reason}")]
    WebFont { families: String, reason: String },

    /// The load task itself panicked or was torn down
    #[error("resource load task failed: {0}")]
    Task(String),
}

impl ResourceError {
    pub fn font(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Font {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn web_font(families: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::WebFont {
            families: families.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ResourceError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Task(value.to_string())
    }
}

/// Terminal failure of an editor load
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl EditorError {
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message_names_key() {
        let err = ConfigError::MissingKey("id");
        assert_eq!(err.key(), "id");
        assert_eq!(err.to_string(), "Configuration must contain a property 'id'.");
    }

    #[test]
    fn test_font_error_identifies_path_and_cause() {
        let err = ResourceError::font("/fonts/OpenSans-Bold-Latin.ttf", "No such file");
        let msg = err.to_string();
        assert!(msg.contains("/fonts/OpenSans-Bold-Latin.ttf"));
        assert!(msg.contains("No such file"));
    }

    #[test]
    fn test_editor_error_kinds() {
        let config: EditorError = ConfigError::MissingKey("fonts").into();
        assert!(config.is_config());
        assert!(!config.is_resource());

        let resource: EditorError = ResourceError::web_font("{}", "inactive").into();
        assert!(resource.is_resource());
    }
}
