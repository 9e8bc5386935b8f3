//! Editor configuration
//!
//! - **record**: the host-supplied [`EditorConfig`], every key optional
//! - **resolved**: the [`ResolvedConfig`] the renderer consumes
//! - **resolver**: default-filling and required-key checks between the two

pub mod defaults;
pub mod record;
pub mod resolved;
pub mod resolver;
pub mod webfont;

pub use record::EditorConfig;
pub use resolved::{ConfigUpdate, Margin, ResolvedConfig};
pub use resolver::{ConfigResolver, LoadedResources, ResourcePlan};
pub use webfont::WebFontFamily;
