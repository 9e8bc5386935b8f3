//! Turns a host record plus loaded resources into a [`ResolvedConfig`]

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::collaborators::{Environment, StylesheetLoader};
use crate::config::defaults::{default_val, default_with, require_val};
use crate::config::record::EditorConfig;
use crate::config::resolved::{Margin, ResolvedConfig};
use crate::config::webfont::WebFontFamily;
use crate::constants::{self, layout};
use crate::error::ConfigError;
use crate::resources::FontSet;
use crate::storage::{self, LocalStorage};

/// Locators of everything that must load before resolution can finish
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePlan {
    pub regular: String,
    pub bold: String,
    pub bold_italic: String,
    pub italic: String,
    pub web_font_family: WebFontFamily,
}

/// Results of a fully successful resource load
#[derive(Debug, Clone)]
pub struct LoadedResources {
    pub fonts: FontSet,
}

/// Applies defaults, derived values and required-key checks
pub struct ConfigResolver {
    storage: Arc<dyn LocalStorage>,
    environment: Arc<dyn Environment>,
    stylesheets: Arc<dyn StylesheetLoader>,
}

impl ConfigResolver {
    pub fn new(
        storage: Arc<dyn LocalStorage>,
        environment: Arc<dyn Environment>,
        stylesheets: Arc<dyn StylesheetLoader>,
    ) -> Self {
        Self {
            storage,
            environment,
            stylesheets,
        }
    }

    /// Fill the resource-locating defaults and return what to load
    pub fn prepare(&self, config: &mut EditorConfig) -> ResourcePlan {
        let base = default_val(
            &mut config.local_font_path,
            "localFontPath",
            constants::fonts::LOCAL_FONT_PATH.to_string(),
        )
        .clone();
        let regular = default_val(
            &mut config.font_regular,
            "fontRegular",
            constants::fonts::REGULAR.to_string(),
        )
        .clone();
        let bold =
            default_val(&mut config.font_bold, "fontBold", constants::fonts::BOLD.to_string())
                .clone();
        let bold_italic = default_val(
            &mut config.font_bold_italic,
            "fontBoldItalic",
            constants::fonts::BOLD_ITALIC.to_string(),
        )
        .clone();
        let italic = default_val(
            &mut config.font_italic,
            "fontItalic",
            constants::fonts::ITALIC.to_string(),
        )
        .clone();
        let web_font_family =
            default_with(&mut config.web_font_family, "webFontFamily", WebFontFamily::default)
                .clone();

        ResourcePlan {
            regular: format!("{base}{regular}"),
            bold: format!("{base}{bold}"),
            bold_italic: format!("{base}{bold_italic}"),
            italic: format!("{base}{italic}"),
            web_font_family,
        }
    }

    /// Complete resolution once every resource has loaded
    ///
    /// Derived values are written into `config` before any required key is
    /// checked, so only host-supplied keys (`id`) can be missing in practice.
    pub fn resolve(
        &self,
        config: &mut EditorConfig,
        loaded: LoadedResources,
    ) -> Result<ResolvedConfig, ConfigError> {
        let LoadedResources { fonts } = loaded;
        if !fonts.has_uniform_scale() {
            warn!(
                units_per_em = fonts.units_per_em(),
                "Fonts disagree on units per em, scaling every face by the regular one"
            );
        }
        config.units_per_em = Some(fonts.units_per_em());
        config.fonts = Some(fonts);

        config.min_font_size = Some(self.environment.detect_min_font_size());

        let skin =
            default_val(&mut config.skin, "skin", constants::skin::DEFAULT.to_string()).clone();
        if skin == constants::skin::DEFAULT {
            self.stylesheets.load_skin(&skin);
        }

        let id = require_val(&config.id, "id")?.clone();
        let fonts = require_val(&config.fonts, "fonts")?.clone();
        let font_size = *default_val(&mut config.font_size, "fontSize", layout::FONT_SIZE);
        let min_font_size = *require_val(&config.min_font_size, "minFontSize")?;
        let units_per_em = *require_val(&config.units_per_em, "unitsPerEm")?;
        let width = *default_val(&mut config.width, "width", layout::WIDTH);
        let margin = Margin::new(
            *default_val(&mut config.margin_horizontal, "marginH", layout::MARGIN_HORIZONTAL),
            *default_val(&mut config.margin_vertical, "marginV", layout::MARGIN_VERTICAL),
        );
        let user_id = default_with(&mut config.user_id, "userId", || {
            storage::local_user_id(self.storage.as_ref())
        })
        .clone();
        let user_name = default_val(&mut config.user_name, "userName", user_id.clone()).clone();
        let render_optimizations =
            *default_val(&mut config.render_optimizations, "renderOptimizations", true);
        let show_error_notification =
            *default_val(&mut config.show_error_notification, "showErrorNotification", true);

        // Host extras never shadow fields the resolver owns
        let mut extra = config.extra.clone();
        extra.retain(|key, _| {
            let reserved = ResolvedConfig::is_reserved_key(key);
            if reserved {
                warn!(key = %key, "Ignoring host value for a derived config key");
            }
            !reserved
        });

        debug!(
            id = %id,
            user_id = %user_id,
            units_per_em = units_per_em,
            min_font_size = min_font_size,
            "Resolved configuration"
        );
        info!(id = %id, "Editor configuration ready");

        Ok(ResolvedConfig {
            id,
            font_size,
            width,
            margin,
            user_id,
            user_name,
            local_font_path: config.local_font_path.clone().unwrap_or_default(),
            font_regular: config.font_regular.clone().unwrap_or_default(),
            font_bold: config.font_bold.clone().unwrap_or_default(),
            font_bold_italic: config.font_bold_italic.clone().unwrap_or_default(),
            font_italic: config.font_italic.clone().unwrap_or_default(),
            fonts,
            units_per_em,
            min_font_size,
            web_font_family: config.web_font_family.clone().unwrap_or_default(),
            skin,
            ws_port: config.ws_port,
            render_optimizations,
            show_error_notification,
            extra,
            event_emitter: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{BundledStylesheets, FixedEnvironment};
    use crate::config::resolved::ConfigUpdate;
    use crate::resources::OutlineFont;
    use crate::storage::MemoryStorage;
    use serde_json::Value;

    fn loaded(upm: u16) -> LoadedResources {
        LoadedResources {
            fonts: FontSet {
                regular: OutlineFont::detached("r", upm),
                bold: OutlineFont::detached("b", upm),
                bold_italic: OutlineFont::detached("bi", upm),
                italic: OutlineFont::detached("i", upm),
            },
        }
    }

    fn resolver() -> (ConfigResolver, Arc<MemoryStorage>, Arc<BundledStylesheets>) {
        let storage = Arc::new(MemoryStorage::new());
        let sheets = Arc::new(BundledStylesheets::new());
        let resolver = ConfigResolver::new(
            storage.clone(),
            Arc::new(FixedEnvironment { min_font_size: 8.0 }),
            sheets.clone(),
        );
        (resolver, storage, sheets)
    }

    #[test]
    fn test_prepare_default_locators() {
        let (resolver, _, _) = resolver();
        let mut config = EditorConfig::with_id("doc1");
        let plan = resolver.prepare(&mut config);

        assert_eq!(plan.regular, "/fonts/OpenSans-Regular-Latin.ttf");
        assert_eq!(plan.bold, "/fonts/OpenSans-Bold-Latin.ttf");
        assert_eq!(plan.bold_italic, "/fonts/OpenSans-BoldItalic-Latin.ttf");
        assert_eq!(plan.italic, "/fonts/OpenSans-Italic-Latin.ttf");
        assert_eq!(plan.web_font_family, WebFontFamily::default());
        assert_eq!(config.local_font_path.as_deref(), Some("/fonts/"));
    }

    #[test]
    fn test_prepare_respects_host_paths() {
        let (resolver, _, _) = resolver();
        let mut config = EditorConfig {
            local_font_path: Some("/srv/fonts/".to_string()),
            font_bold: Some("Custom-Bold.ttf".to_string()),
            ..EditorConfig::with_id("doc1")
        };
        let plan = resolver.prepare(&mut config);
        assert_eq!(plan.bold, "/srv/fonts/Custom-Bold.ttf");
        assert_eq!(plan.regular, "/srv/fonts/OpenSans-Regular-Latin.ttf");
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let (resolver, storage, sheets) = resolver();
        let mut config = EditorConfig::with_id("doc1");
        resolver.prepare(&mut config);
        let resolved = resolver.resolve(&mut config, loaded(1000)).unwrap();

        assert_eq!(resolved.font_size, 18.0);
        assert_eq!(resolved.width, 600.0);
        assert_eq!(resolved.margin, Margin::new(30.0, 35.0));
        assert_eq!(resolved.units_per_em, 1000);
        assert_eq!(resolved.min_font_size, 8.0);
        assert_eq!(resolved.skin, "default");
        assert!(resolved.render_optimizations);
        assert!(resolved.show_error_notification);
        assert_eq!(resolved.ws_port, None);
        assert_eq!(Some(resolved.user_id.clone()), storage.get_item("localuser"));
        assert_eq!(resolved.user_name, resolved.user_id);
        assert_eq!(sheets.applied(), vec!["default".to_string()]);

        // Defaults are written back into the host record
        assert_eq!(config.font_size, Some(18.0));
        assert_eq!(config.units_per_em, Some(1000));
        assert!(config.fonts.is_some());
    }

    #[test]
    fn test_resolve_missing_id() {
        let (resolver, _, _) = resolver();
        let mut config = EditorConfig::default();
        resolver.prepare(&mut config);
        let err = resolver.resolve(&mut config, loaded(1000)).unwrap_err();
        assert_eq!(err, ConfigError::MissingKey("id"));
    }

    #[test]
    fn test_custom_skin_skips_bundled_stylesheet() {
        let (resolver, _, sheets) = resolver();
        let mut config = EditorConfig {
            skin: Some("dark".to_string()),
            ..EditorConfig::with_id("doc1")
        };
        let resolved = resolver.resolve(&mut config, loaded(2048)).unwrap();
        assert_eq!(resolved.skin, "dark");
        assert!(sheets.applied().is_empty());
    }

    #[test]
    fn test_host_user_id_skips_storage() {
        let (resolver, storage, _) = resolver();
        let mut config = EditorConfig {
            user_id: Some("host-user".to_string()),
            ..EditorConfig::with_id("doc1")
        };
        let resolved = resolver.resolve(&mut config, loaded(2048)).unwrap();
        assert_eq!(resolved.user_id, "host-user");
        assert_eq!(resolved.user_name, "host-user");
        assert_eq!(storage.get_item("localuser"), None);
    }

    #[test]
    fn test_user_name_and_margins_from_host() {
        let (resolver, _, _) = resolver();
        let mut config = EditorConfig {
            user_name: Some("Ada".to_string()),
            margin_vertical: Some(12.0),
            ..EditorConfig::with_id("doc1")
        };
        let resolved = resolver.resolve(&mut config, loaded(2048)).unwrap();
        assert_eq!(resolved.user_name, "Ada");
        assert_eq!(resolved.margin, Margin::new(30.0, 12.0));
    }

    #[test]
    fn test_apply_updates() {
        let (resolver, _, _) = resolver();
        let mut config = EditorConfig::with_id("doc1");
        let mut resolved = resolver.resolve(&mut config, loaded(1000)).unwrap();

        resolved.apply(ConfigUpdate::FontSize(24.0));
        resolved.apply(ConfigUpdate::Custom("theme".to_string(), serde_json::json!("dark")));
        assert_eq!(resolved.font_size, 24.0);
        assert_eq!(resolved.extra.get("theme"), Some(&serde_json::json!("dark")));
        assert!((resolved.font_scale() - 0.024).abs() < 1e-6);
        // Measured once; not refreshed by later font size changes
        assert_eq!(resolved.min_font_size, 8.0);

        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["fontSize"], serde_json::json!(24.0));
        assert_eq!(json["margin"]["horizontal"], serde_json::json!(30.0));
        assert_eq!(json["theme"], serde_json::json!("dark"));
    }

    #[test]
    fn test_custom_update_of_known_key_assigns_field() {
        let (resolver, _, _) = resolver();
        let mut config = EditorConfig::with_id("doc1");
        let mut resolved = resolver.resolve(&mut config, loaded(1000)).unwrap();

        resolved.apply(ConfigUpdate::Custom("fontSize".to_string(), serde_json::json!(30)));
        resolved.apply(ConfigUpdate::Custom("marginV".to_string(), serde_json::json!(9)));
        resolved.apply(ConfigUpdate::Custom("wsPort".to_string(), serde_json::json!(8080)));
        assert_eq!(resolved.font_size, 30.0);
        assert_eq!(resolved.margin, Margin::new(30.0, 9.0));
        assert_eq!(resolved.ws_port, Some(8080));
        assert!(resolved.extra.is_empty());

        let json = serde_json::to_string(&resolved).unwrap();
        assert_eq!(json.matches("\"fontSize\"").count(), 1);
        assert_eq!(serde_json::from_str::<Value>(&json).unwrap()["fontSize"], 30.0);
    }

    #[test]
    fn test_custom_update_rejects_mistyped_and_derived_keys() {
        let (resolver, _, _) = resolver();
        let mut config = EditorConfig::with_id("doc1");
        let mut resolved = resolver.resolve(&mut config, loaded(1000)).unwrap();

        resolved.apply(ConfigUpdate::Custom("width".to_string(), serde_json::json!("wide")));
        resolved.apply(ConfigUpdate::Custom("unitsPerEm".to_string(), serde_json::json!(5)));
        resolved.apply(ConfigUpdate::Custom("id".to_string(), serde_json::json!("other")));
        assert_eq!(resolved.width, 600.0);
        assert_eq!(resolved.units_per_em, 1000);
        assert_eq!(resolved.id, "doc1");
        assert!(resolved.extra.is_empty());
    }

    #[test]
    fn test_host_extras_cannot_shadow_derived_keys() {
        let (resolver, _, _) = resolver();
        let mut config: EditorConfig = serde_json::from_value(serde_json::json!({
            "id": "d",
            "unitsPerEm": 5,
            "minFontSize": 1,
            "margin": {"horizontal": 1},
            "theme": "dark"
        }))
        .unwrap();
        resolver.prepare(&mut config);
        let resolved = resolver.resolve(&mut config, loaded(1000)).unwrap();

        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["unitsPerEm"], 1000);
        assert_eq!(json["minFontSize"], 8.0);
        assert_eq!(json["margin"]["vertical"], 35.0);
        assert_eq!(json["theme"], "dark");
        assert_eq!(resolved.extra.len(), 1);
    }
}
