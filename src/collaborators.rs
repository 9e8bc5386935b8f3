//! Interfaces to the components the editor drives but does not own
//!
//! Rendering, the document store, environment measurement and stylesheet
//! loading all live outside this crate. Hosts plug in their own
//! implementations; the ones here cover headless use.

use std::fmt;
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ResolvedConfig;
use crate::constants;
use crate::document::{DocChar, Position, RemoteCursor, RichChunk};

/// Opaque handle to where the editor is mounted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderTarget(String);

impl RenderTarget {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mounts or updates the visual editor tree at a target
pub trait Renderer: Send + Sync {
    /// Synchronously reflect `config` at `target`. Called again with the same
    /// inputs, the result must be unchanged.
    fn render(&self, config: &ResolvedConfig, target: &RenderTarget);
}

/// Read-only view of the document the editor is displaying
///
/// Calls are cheap and side-effect free; the editor never caches them.
pub trait DocumentStore: Send + Sync {
    fn get_contents(&self) -> Vec<DocChar>;
    fn get_contents_rich(&self) -> Vec<RichChunk>;
    fn get_contents_html(&self) -> String;
    fn get_contents_text(&self) -> String;
    fn get_selection(&self) -> Vec<DocChar>;
    fn get_selection_rich(&self) -> Vec<RichChunk>;
    fn get_selection_html(&self) -> String;
    fn get_selection_text(&self) -> String;
    fn get_position(&self) -> Option<Position>;
    fn get_remote_cursors(&self) -> Vec<RemoteCursor>;
}

/// Facts about the rendering environment
pub trait Environment: Send + Sync {
    /// Smallest font size the environment renders
    fn detect_min_font_size(&self) -> f32;
}

/// Applies skin stylesheets; callers never wait on the result
pub trait StylesheetLoader: Send + Sync {
    fn load_skin(&self, skin: &str);
}

/// Environment with a known minimum font size
#[derive(Debug, Clone, Copy)]
pub struct FixedEnvironment {
    pub min_font_size: f32,
}

impl Default for FixedEnvironment {
    fn default() -> Self {
        Self {
            min_font_size: constants::environment::MIN_FONT_SIZE,
        }
    }
}

impl Environment for FixedEnvironment {
    fn detect_min_font_size(&self) -> f32 {
        self.min_font_size
    }
}

/// Stylesheets compiled into the crate
#[derive(Debug, Default)]
pub struct BundledStylesheets {
    applied: Mutex<Vec<String>>,
}

const DEFAULT_SKIN_CSS: &str = include_str!("../assets/default-skin.css");

impl BundledStylesheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source of a bundled skin
    pub fn stylesheet(skin: &str) -> Option<&'static str> {
        (skin == constants::skin::DEFAULT).then_some(DEFAULT_SKIN_CSS)
    }

    /// Skins applied so far, in order
    pub fn applied(&self) -> Vec<String> {
        self.applied.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl StylesheetLoader for BundledStylesheets {
    fn load_skin(&self, skin: &str) {
        match Self::stylesheet(skin) {
            Some(css) => {
                debug!(skin = %skin, bytes = css.len(), "Applying bundled stylesheet");
                self.applied
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(skin.to_string());
            }
            None => warn!(skin = %skin, "No bundled stylesheet for skin"),
        }
    }
}

/// Renderer that logs each render, for headless hosts
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn render(&self, config: &ResolvedConfig, target: &RenderTarget) {
        info!(
            target_handle = %target,
            id = %config.id,
            font_size = config.font_size,
            width = config.width,
            margin_h = config.margin.horizontal,
            margin_v = config.margin.vertical,
            line_height = config.fonts.regular.line_height(config.font_size),
            "Rendered editor"
        );
    }
}

/// Document store over an empty document
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDocument;

impl DocumentStore for EmptyDocument {
    fn get_contents(&self) -> Vec<DocChar> {
        Vec::new()
    }

    fn get_contents_rich(&self) -> Vec<RichChunk> {
        Vec::new()
    }

    fn get_contents_html(&self) -> String {
        String::new()
    }

    fn get_contents_text(&self) -> String {
        String::new()
    }

    fn get_selection(&self) -> Vec<DocChar> {
        Vec::new()
    }

    fn get_selection_rich(&self) -> Vec<RichChunk> {
        Vec::new()
    }

    fn get_selection_html(&self) -> String {
        String::new()
    }

    fn get_selection_text(&self) -> String {
        String::new()
    }

    fn get_position(&self) -> Option<Position> {
        None
    }

    fn get_remote_cursors(&self) -> Vec<RemoteCursor> {
        Vec::new()
    }
}
