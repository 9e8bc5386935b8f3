//! Fully resolved editor configuration and its post-load mutations

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::config::webfont::WebFontFamily;
use crate::events::EventEmitter;
use crate::resources::FontSet;

/// Horizontal and vertical page margins, always read and written as a pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Margin {
    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self { horizontal, vertical }
    }
}

/// Configuration after defaults, required-key checks and derived values
///
/// Serializes to the camelCase record the renderer consumes; fonts and the
/// emitter handle are runtime-only.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub id: String,
    pub font_size: f32,
    pub width: f32,
    pub margin: Margin,
    pub user_id: String,
    pub user_name: String,

    pub local_font_path: String,
    pub font_regular: String,
    pub font_bold: String,
    pub font_bold_italic: String,
    pub font_italic: String,
    #[serde(skip)]
    pub fonts: FontSet,
    pub units_per_em: u16,
    /// Measured once at resolution; font size changes never refresh it
    pub min_font_size: f32,
    pub web_font_family: WebFontFamily,

    pub skin: String,
    pub ws_port: Option<u16>,
    pub render_optimizations: bool,
    pub show_error_notification: bool,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,

    /// Emitter of the owning editor, injected after resolution
    #[serde(skip)]
    pub event_emitter: Option<Arc<dyn EventEmitter>>,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("id", &self.id)
            .field("font_size", &self.font_size)
            .field("width", &self.width)
            .field("margin", &self.margin)
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("fonts", &self.fonts)
            .field("units_per_em", &self.units_per_em)
            .field("min_font_size", &self.min_font_size)
            .field("skin", &self.skin)
            .field("ws_port", &self.ws_port)
            .field("render_optimizations", &self.render_optimizations)
            .field("show_error_notification", &self.show_error_notification)
            .field("extra", &self.extra)
            .field("event_emitter", &self.event_emitter.is_some())
            .finish_non_exhaustive()
    }
}

/// A single in-place assignment to a resolved configuration field
///
/// Values are not validated; hosts are trusted to pass sensible numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigUpdate {
    UserName(String),
    FontSize(f32),
    Width(f32),
    Margin(Margin),
    Skin(String),
    WsPort(Option<u16>),
    RenderOptimizations(bool),
    ShowErrorNotification(bool),
    /// Update by key name; known keys are assigned to their field, others
    /// are kept as host extras
    Custom(String, Value),
}

impl ConfigUpdate {
    /// Typed update for a known mutable key, or `None` for any other key
    pub fn from_json(key: &str, value: &Value) -> Option<serde_json::Result<Self>> {
        let value = value.clone();
        let update = match key {
            "userName" => serde_json::from_value(value).map(Self::UserName),
            "fontSize" => serde_json::from_value(value).map(Self::FontSize),
            "width" => serde_json::from_value(value).map(Self::Width),
            "margin" => serde_json::from_value(value).map(Self::Margin),
            "skin" => serde_json::from_value(value).map(Self::Skin),
            "wsPort" => serde_json::from_value(value).map(Self::WsPort),
            "renderOptimizations" => serde_json::from_value(value).map(Self::RenderOptimizations),
            "showErrorNotification" => {
                serde_json::from_value(value).map(Self::ShowErrorNotification)
            }
            _ => return None,
        };
        Some(update)
    }

    /// Config key the update assigns
    pub fn key(&self) -> &str {
        match self {
            Self::UserName(_) => "userName",
            Self::FontSize(_) => "fontSize",
            Self::Width(_) => "width",
            Self::Margin(_) => "margin",
            Self::Skin(_) => "skin",
            Self::WsPort(_) => "wsPort",
            Self::RenderOptimizations(_) => "renderOptimizations",
            Self::ShowErrorNotification(_) => "showErrorNotification",
            Self::Custom(key, _) => key,
        }
    }
}

impl ResolvedConfig {
    pub fn apply(&mut self, update: ConfigUpdate) {
        match update {
            ConfigUpdate::UserName(name) => self.user_name = name,
            ConfigUpdate::FontSize(size) => self.font_size = size,
            ConfigUpdate::Width(width) => self.width = width,
            ConfigUpdate::Margin(margin) => self.margin = margin,
            ConfigUpdate::Skin(skin) => self.skin = skin,
            ConfigUpdate::WsPort(port) => self.ws_port = port,
            ConfigUpdate::RenderOptimizations(on) => self.render_optimizations = on,
            ConfigUpdate::ShowErrorNotification(on) => self.show_error_notification = on,
            ConfigUpdate::Custom(key, value) => self.apply_custom(key, value),
        }
    }

    /// Keys owned by the resolved record itself; host extras may not shadow them
    pub const RESERVED_KEYS: [&'static str; 22] = [
        "id",
        "fontSize",
        "width",
        "margin",
        "marginH",
        "marginV",
        "userId",
        "userName",
        "localFontPath",
        "fontRegular",
        "fontBold",
        "fontBoldItalic",
        "fontItalic",
        "fonts",
        "unitsPerEm",
        "minFontSize",
        "webFontFamily",
        "skin",
        "wsPort",
        "renderOptimizations",
        "showErrorNotification",
        "eventEmitter",
    ];

    pub fn is_reserved_key(key: &str) -> bool {
        Self::RESERVED_KEYS.contains(&key)
    }

    fn apply_custom(&mut self, key: String, value: Value) {
        let half = match key.as_str() {
            "marginH" | "marginV" => Some(serde_json::from_value::<f32>(value.clone())),
            _ => None,
        };
        if let Some(half) = half {
            match half {
                Ok(h) if key == "marginH" => self.margin.horizontal = h,
                Ok(v) => self.margin.vertical = v,
                Err(e) => {
                    warn!(key = %key, error = %e, "Ignoring config update with mistyped value")
                }
            }
            return;
        }

        match ConfigUpdate::from_json(&key, &value) {
            Some(Ok(update)) => self.apply(update),
            Some(Err(e)) => {
                warn!(key = %key, error = %e, "Ignoring config update with mistyped value")
            }
            None if Self::is_reserved_key(&key) => {
                warn!(key = %key, "Ignoring update of read-only config key")
            }
            None => {
                self.extra.insert(key, value);
            }
        }
    }

    /// Scale factor from font units to pixels at the current font size
    pub fn font_scale(&self) -> f32 {
        self.font_size / f32::from(self.units_per_em)
    }
}
