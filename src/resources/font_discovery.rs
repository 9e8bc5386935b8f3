//! Web-font activation via fontconfig
//!
//! A family counts as active once fontconfig resolves every requested
//! variant to an installed font file of that family.

use anyhow::{Context, Result};
use fontconfig::{Fontconfig, Pattern};
use std::ffi::CString;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::webfont::{FamilySpec, WebFontFamily};

/// Resolve a family + style to an installed font file
pub fn find_face(fc: &Fontconfig, family: &str, style: &str) -> Result<PathBuf> {
    let mut pattern = Pattern::new(fc);
    let family_cstr = CString::new(family)
        .with_context(|| format!("Invalid family name: {}", family))?;
    pattern.add_string(fontconfig::FC_FAMILY, &family_cstr);
    let style_cstr = CString::new(style)
        .with_context(|| format!("Invalid style name: {}", style))?;
    pattern.add_string(fontconfig::FC_STYLE, &style_cstr);

    let matched = pattern.font_match();

    // fontconfig always returns its best fallback, so reject other families
    if let Some(matched_family) = matched.get_string(fontconfig::FC_FAMILY) {
        if !matched_family.eq_ignore_ascii_case(family) {
            return Err(anyhow::anyhow!(
                "Font '{} {}' not found - fontconfig returned family '{}' instead",
                family,
                style,
                matched_family
            ));
        }
    }

    let path = matched
        .filename()
        .map(PathBuf::from)
        .with_context(|| format!("No font file found for '{} {}'", family, style))?;

    if !path.exists() {
        return Err(anyhow::anyhow!("Font file path '{}' does not exist", path.display()));
    }

    debug!(family = family, style = style, path = %path.display(), "Resolved web font face");
    Ok(path)
}

fn activate_spec(fc: &Fontconfig, spec: &FamilySpec) -> Result<()> {
    for variant in &spec.variants {
        find_face(fc, &spec.family, variant.style_name())?;
    }
    Ok(())
}

/// Block until every family in `family` is usable, or fail with the first
/// family that is not
pub fn activate(family: &WebFontFamily) -> Result<()> {
    let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;
    let specs = family.specs();
    if specs.is_empty() {
        return Err(anyhow::anyhow!("No web font families requested"));
    }

    for spec in &specs {
        activate_spec(&fc, spec).inspect_err(|e| {
            warn!(family = %spec.family, error = %e, "Web font family inactive");
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::webfont::GoogleFonts;

    #[test]
    fn test_empty_descriptor_is_inactive() {
        let family = WebFontFamily {
            google: Some(GoogleFonts { families: vec![] }),
            custom: None,
        };
        assert!(activate(&family).is_err());
    }

    #[test]
    fn test_unknown_family_is_inactive() {
        let family = WebFontFamily {
            google: Some(GoogleFonts {
                families: vec!["Definitely Not Installed Sans:400".to_string()],
            }),
            custom: None,
        };
        assert!(activate(&family).is_err());
    }
}
