//! Bootstrap and host-facing facade for an embeddable rich-text editor
//!
//! [`Editor`] resolves a host configuration against defaults, loads the
//! outline fonts and web fonts the editor needs (concurrently, all or
//! nothing), renders, and then exposes configuration mutations, document
//! queries and event subscriptions to the host.

#![forbid(unsafe_code)]

pub mod bootstrap;
pub mod collaborators;
pub mod config;
pub mod constants;
pub mod document;
pub mod editor;
pub mod error;
pub mod events;
pub mod resources;
pub mod storage;

pub use bootstrap::Bootstrapper;
pub use collaborators::{DocumentStore, Environment, RenderTarget, Renderer, StylesheetLoader};
pub use config::{ConfigUpdate, EditorConfig, Margin, ResolvedConfig};
pub use editor::{Editor, LoadState};
pub use error::{ConfigError, EditorError, ResourceError};
pub use events::{EditorEvent, EventEmitter, EventKind, LocalEmitter};
