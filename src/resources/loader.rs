//! Uniform async wrappers around external resource fetches

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use tracing::{debug, info};

use crate::config::webfont::WebFontFamily;
use crate::error::ResourceError;
use crate::resources::font::OutlineFont;
use crate::resources::font_discovery;

/// Single-attempt, single-resolution resource load
pub type LoadFuture<T> = Pin<Box<dyn Future<Output = Result<T, ResourceError>> + Send + 'static>>;

/// Fetches the resources the editor needs before its first render
///
/// Returned futures own their inputs so they can run as independent tasks.
/// Calls are not deduplicated.
pub trait ResourceLoader: Send + Sync {
    /// Load and parse one glyph-outline font
    fn load_outline_font(&self, locator: &str) -> LoadFuture<OutlineFont>;

    /// Resolve once the described web fonts are usable for rendering
    fn activate_web_fonts(&self, family: &WebFontFamily) -> LoadFuture<()>;
}

/// Loads outline fonts from the filesystem and activates web fonts through
/// the system font configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResourceLoader;

impl ResourceLoader for SystemResourceLoader {
    fn load_outline_font(&self, locator: &str) -> LoadFuture<OutlineFont> {
        let locator = locator.to_string();
        Box::pin(async move {
            debug!(path = %locator, "Loading outline font");
            let path = PathBuf::from(&locator);
            let font = tokio::task::spawn_blocking(move || OutlineFont::from_path(&path))
                .await?
                .map_err(|e| ResourceError::font(&locator, format!("{e:#}")))?;
            info!(path = %locator, units_per_em = font.units_per_em(), "Loaded outline font");
            Ok(font)
        })
    }

    fn activate_web_fonts(&self, family: &WebFontFamily) -> LoadFuture<()> {
        let family = family.clone();
        Box::pin(async move {
            let description = family.describe();
            debug!(families = %description, "Activating web fonts");
            tokio::task::spawn_blocking(move || font_discovery::activate(&family))
                .await?
                .map_err(|e| ResourceError::web_font(&description, format!("{e:#}")))?;
            info!(families = %description, "Web fonts active");
            Ok(())
        })
    }
}
