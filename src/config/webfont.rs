//! Web-delivered font family descriptors
//!
//! Mirrors the provider map hosts pass to a web-font loader, e.g.
//! `{ "google": { "families": ["Open Sans:400italic,700italic,700,400"] } }`.

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebFontFamily {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<GoogleFonts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomFonts>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleFonts {
    pub families: Vec<String>,
}

/// Self-hosted families with the stylesheets declaring them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFonts {
    pub families: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

impl Default for WebFontFamily {
    fn default() -> Self {
        Self {
            google: Some(GoogleFonts {
                families: vec![constants::fonts::WEB_FONT_FAMILY.to_string()],
            }),
            custom: None,
        }
    }
}

impl WebFontFamily {
    /// Every family spec across all providers, parsed
    pub fn specs(&self) -> Vec<FamilySpec> {
        let google = self.google.iter().flat_map(|g| g.families.iter());
        let custom = self.custom.iter().flat_map(|c| c.families.iter());
        google.chain(custom).map(|s| FamilySpec::parse(s)).collect()
    }

    /// JSON rendering used in error messages
    pub fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// One face of a family: numeric weight plus slant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub weight: u16,
    pub italic: bool,
}

impl Variant {
    pub const REGULAR: Variant = Variant { weight: 400, italic: false };

    /// Parse `400`, `700italic`, `i7`, `n4`, `italic`, `bold`
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        match raw.as_str() {
            "regular" | "normal" => return Some(Self::REGULAR),
            "italic" => return Some(Variant { weight: 400, italic: true }),
            "bold" => return Some(Variant { weight: 700, italic: false }),
            "bolditalic" => return Some(Variant { weight: 700, italic: true }),
            _ => {}
        }

        // Font variation description shorthand: n4, i7
        if raw.len() == 2 {
            let mut chars = raw.chars();
            if let (Some(style @ ('n' | 'i')), Some(digit)) = (chars.next(), chars.next()) {
                let weight = digit.to_digit(10)? as u16 * 100;
                return Some(Variant { weight, italic: style == 'i' });
            }
        }

        let (digits, italic) = match raw.strip_suffix("italic") {
            Some(digits) => (digits, true),
            None => (raw.as_str(), false),
        };
        let weight = if digits.is_empty() { 400 } else { digits.parse().ok()? };
        Some(Variant { weight, italic })
    }

    /// Style name as font managers spell it ("Bold Italic", "Regular")
    pub fn style_name(&self) -> &'static str {
        match (self.weight, self.italic) {
            (0..=150, false) => "Thin",
            (0..=150, true) => "Thin Italic",
            (151..=350, false) => "Light",
            (151..=350, true) => "Light Italic",
            (351..=450, false) => "Regular",
            (351..=450, true) => "Italic",
            (451..=550, false) => "Medium",
            (451..=550, true) => "Medium Italic",
            (551..=650, false) => "SemiBold",
            (551..=650, true) => "SemiBold Italic",
            (651..=750, false) => "Bold",
            (651..=750, true) => "Bold Italic",
            (751..=850, false) => "ExtraBold",
            (751..=850, true) => "ExtraBold Italic",
            (_, false) => "Black",
            (_, true) => "Black Italic",
        }
    }
}

/// A family name with the variants requested of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySpec {
    pub family: String,
    pub variants: Vec<Variant>,
}

impl FamilySpec {
    /// Parse `Family Name:variant,variant[:subset]`. Unparseable variants are
    /// dropped; a family without any variant requests the regular face.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(':');
        let family = parts.next().unwrap_or_default().trim().to_string();
        let mut variants: Vec<Variant> = parts
            .next()
            .map(|v| v.split(',').filter_map(Variant::parse).collect())
            .unwrap_or_default();
        if variants.is_empty() {
            variants.push(Variant::REGULAR);
        }
        Self { family, variants }
    }
}
