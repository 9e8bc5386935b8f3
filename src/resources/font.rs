//! Parsed glyph-outline fonts (TrueType via fontdue)

use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// A parsed outline font exposing its metrics
#[derive(Clone)]
pub struct OutlineFont {
    source: String,
    units_per_em: u16,
    face: Option<Arc<Font>>,
}

impl OutlineFont {
    /// Parse a TrueType/OpenType font from raw bytes
    pub fn from_bytes(source: impl Into<String>, data: &[u8]) -> Result<Self> {
        let source = source.into();
        let face = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to parse font: {}", e))?;
        let units_per_em = face.units_per_em().round() as u16;

        debug!(
            source = %source,
            units_per_em = units_per_em,
            name = ?face.name(),
            "Parsed outline font"
        );
        Ok(Self {
            source,
            units_per_em,
            face: Some(Arc::new(face)),
        })
    }

    /// Load a TrueType font from a file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;
        Self::from_bytes(path.display().to_string(), &data)
    }

    /// Metrics-only font, for hosts that measure glyphs elsewhere
    pub fn detached(source: impl Into<String>, units_per_em: u16) -> Self {
        Self {
            source: source.into(),
            units_per_em,
            face: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// The parsed face, absent for detached fonts
    pub fn face(&self) -> Option<&Font> {
        self.face.as_deref()
    }

    /// Distance between baselines at `px`, falling back to 1.2em
    pub fn line_height(&self, px: f32) -> f32 {
        self.face
            .as_ref()
            .and_then(|face| face.horizontal_line_metrics(px))
            .map(|m| m.new_line_size)
            .unwrap_or(px * 1.2)
    }
}

impl fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlineFont")
            .field("source", &self.source)
            .field("units_per_em", &self.units_per_em)
            .field("parsed", &self.face.is_some())
            .finish()
    }
}

/// The four weights/styles the editor renders with
#[derive(Debug, Clone)]
pub struct FontSet {
    pub regular: OutlineFont,
    pub bold: OutlineFont,
    pub bold_italic: OutlineFont,
    pub italic: OutlineFont,
}

impl FontSet {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &OutlineFont)> {
        [
            ("regular", &self.regular),
            ("bold", &self.bold),
            ("boldItalic", &self.bold_italic),
            ("italic", &self.italic),
        ]
        .into_iter()
    }

    pub fn get(&self, bold: bool, italic: bool) -> &OutlineFont {
        match (bold, italic) {
            (false, false) => &self.regular,
            (true, false) => &self.bold,
            (true, true) => &self.bold_italic,
            (false, true) => &self.italic,
        }
    }

    /// Units per em of the regular face; the editor scales every face by it
    pub fn units_per_em(&self) -> u16 {
        self.regular.units_per_em()
    }

    /// Check every face shares the regular face's units per em
    pub fn has_uniform_scale(&self) -> bool {
        let expected = self.units_per_em();
        let mut uniform = true;
        for (style, font) in self.iter() {
            if font.units_per_em() != expected {
                debug!(
                    style = style,
                    source = %font.source(),
                    units_per_em = font.units_per_em(),
                    expected = expected,
                    "Font units per em differs from regular face"
                );
                uniform = false;
            }
        }
        uniform
    }
}
