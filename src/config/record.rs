//! Host-supplied configuration record
//!
//! Every key is optional until resolution fills defaults and derived values
//! in place. Keys use the camelCase names hosts already know.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::webfont::WebFontFamily;
use crate::resources::FontSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Document identifier, required
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(rename = "marginH", skip_serializing_if = "Option::is_none")]
    pub margin_horizontal: Option<f32>,
    #[serde(rename = "marginV", skip_serializing_if = "Option::is_none")]
    pub margin_vertical: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Directory prefix the outline font file names are joined onto
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_font_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_regular: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_bold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_bold_italic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_italic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_font_family: Option<WebFontFamily>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin: Option<String>,
    /// Collaboration server port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_optimizations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_error_notification: Option<bool>,

    // Derived during resolution, never read from the host
    #[serde(skip)]
    pub fonts: Option<FontSet>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub units_per_em: Option<u16>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub min_font_size: Option<f32>,

    /// Host-defined keys carried through to the renderer untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl EditorConfig {
    /// Record with only the required identifier set
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_record() {
        let config: EditorConfig = serde_json::from_str(
            r#"{
                "id": "doc1",
                "fontSize": 22,
                "marginH": 10,
                "userName": "Ada",
                "localFontPath": "/assets/fonts/",
                "wsPort": 8080,
                "theme": "dark"
            }"#,
        )
        .unwrap();

        assert_eq!(config.id.as_deref(), Some("doc1"));
        assert_eq!(config.font_size, Some(22.0));
        assert_eq!(config.margin_horizontal, Some(10.0));
        assert_eq!(config.margin_vertical, None);
        assert_eq!(config.user_name.as_deref(), Some("Ada"));
        assert_eq!(config.local_font_path.as_deref(), Some("/assets/fonts/"));
        assert_eq!(config.ws_port, Some(8080));
        assert_eq!(config.extra.get("theme"), Some(&Value::from("dark")));
        assert!(config.fonts.is_none());
    }

    #[test]
    fn test_derived_keys_are_not_read_from_host() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"id": "doc1", "minFontSize": 3, "unitsPerEm": 1000}"#)
                .unwrap();
        assert_eq!(config.min_font_size, None);
        assert_eq!(config.units_per_em, None);
    }

    #[test]
    fn test_empty_record_serializes_empty() {
        let value = serde_json::to_value(EditorConfig::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
