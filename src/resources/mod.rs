//! External resources loaded before the first render

pub mod font;
pub mod font_discovery;
pub mod loader;

pub use font::{FontSet, OutlineFont};
pub use loader::{LoadFuture, ResourceLoader, SystemResourceLoader};
