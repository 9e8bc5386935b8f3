//! The editor facade handed to host applications
//!
//! Owns the resolved configuration and mediates every host interaction:
//! loading, configuration mutations (each followed by a re-render),
//! read-through document queries and event subscriptions.

use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

use crate::bootstrap::Bootstrapper;
use crate::collaborators::{
    BundledStylesheets, DocumentStore, Environment, FixedEnvironment, RenderTarget, Renderer,
    StylesheetLoader,
};
use crate::config::{ConfigResolver, ConfigUpdate, EditorConfig, Margin, ResolvedConfig};
use crate::document::{DocChar, Position, RemoteCursor, RichChunk, TextChange};
use crate::error::EditorError;
use crate::events::{Callback, EditorEvent, EventEmitter, EventKind, LocalEmitter};
use crate::resources::{ResourceLoader, SystemResourceLoader};
use crate::storage::{JsonFileStorage, LocalStorage};

/// Lifecycle of one editor instance. There is no way back to `Unloaded`;
/// construct a new editor to retry a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

pub struct Editor {
    record: EditorConfig,
    config: Option<ResolvedConfig>,
    state: LoadState,
    target: RenderTarget,
    renderer: Arc<dyn Renderer>,
    store: Arc<dyn DocumentStore>,
    emitter: Arc<dyn EventEmitter>,
    loader: Arc<dyn ResourceLoader>,
    storage: Arc<dyn LocalStorage>,
    environment: Arc<dyn Environment>,
    stylesheets: Arc<dyn StylesheetLoader>,
}

impl Editor {
    /// Editor over `config`, mounted at `target`, using the in-process
    /// emitter and the system resource loader
    pub fn new(
        config: EditorConfig,
        target: RenderTarget,
        renderer: Arc<dyn Renderer>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            record: config,
            config: None,
            state: LoadState::Unloaded,
            target,
            renderer,
            store,
            emitter: LocalEmitter::shared(),
            loader: Arc::new(SystemResourceLoader),
            storage: Arc::new(JsonFileStorage::open_default()),
            environment: Arc::new(FixedEnvironment::default()),
            stylesheets: Arc::new(BundledStylesheets::new()),
        }
    }

    /// Replace the default emitter with a host implementation
    pub fn with_event_emitter(mut self, emitter: Arc<dyn EventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn with_resource_loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_local_storage(mut self, storage: Arc<dyn LocalStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_stylesheets(mut self, stylesheets: Arc<dyn StylesheetLoader>) -> Self {
        self.stylesheets = stylesheets;
        self
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The resolved configuration, once loaded
    pub fn config(&self) -> Option<&ResolvedConfig> {
        self.config.as_ref()
    }

    /// The host record, with whatever defaults resolution has filled so far
    pub fn record(&self) -> &EditorConfig {
        &self.record
    }

    pub fn event_emitter(&self) -> Arc<dyn EventEmitter> {
        Arc::clone(&self.emitter)
    }

    /// Bootstrap and perform the first render. Failures are logged, never
    /// returned.
    pub async fn load(&mut self) {
        self.run_load(None::<fn(&EditorError)>).await
    }

    /// As [`Editor::load`], also reporting a failure to `on_error`
    pub async fn load_with<F>(&mut self, on_error: F)
    where
        F: FnOnce(&EditorError),
    {
        self.run_load(Some(on_error)).await
    }

    async fn run_load<F>(&mut self, on_error: Option<F>)
    where
        F: FnOnce(&EditorError),
    {
        if self.state != LoadState::Unloaded {
            warn!(
                state = ?self.state,
                "Editor load already attempted; construct a new editor to retry"
            );
            return;
        }
        self.state = LoadState::Loading;

        let resolver = ConfigResolver::new(
            Arc::clone(&self.storage),
            Arc::clone(&self.environment),
            Arc::clone(&self.stylesheets),
        );
        let bootstrapper = Bootstrapper::new(Arc::clone(&self.loader), resolver);

        match bootstrapper.load(&mut self.record).await {
            Ok(mut config) => {
                config.event_emitter = Some(Arc::clone(&self.emitter));
                info!(id = %config.id, target_handle = %self.target, "Editor loaded");
                self.config = Some(config);
                self.state = LoadState::Ready;
                self.update();
            }
            Err(err) => {
                error!(error = %err, "Editor loading failed.");
                self.state = LoadState::Failed;
                if let Some(on_error) = on_error {
                    on_error(&err);
                }
            }
        }
    }

    /// Re-render from the current configuration
    pub fn update(&self) {
        match &self.config {
            Some(config) => {
                trace!(id = %config.id, "Rendering editor");
                self.renderer.render(config, &self.target);
            }
            None => debug!(state = ?self.state, "Skipping render of unloaded editor"),
        }
    }

    /// Assign one configuration field, then re-render
    pub fn update_config(&mut self, update: ConfigUpdate) {
        let Some(config) = self.config.as_mut() else {
            warn!(
                property = %update.key(),
                state = ?self.state,
                "Ignoring config update on unloaded editor"
            );
            return;
        };
        debug!(property = %update.key(), "Updating config");
        config.apply(update);
        self.update();
    }

    pub fn set_user_name(&mut self, user_name: impl Into<String>) {
        self.update_config(ConfigUpdate::UserName(user_name.into()));
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        self.update_config(ConfigUpdate::FontSize(font_size));
    }

    pub fn set_width(&mut self, width: f32) {
        self.update_config(ConfigUpdate::Width(width));
    }

    pub fn set_margin(&mut self, horizontal: f32, vertical: f32) {
        self.update_config(ConfigUpdate::Margin(Margin::new(horizontal, vertical)));
    }

    /// Replace the horizontal margin, keeping the current vertical one
    pub fn set_margin_horizontal(&mut self, horizontal: f32) {
        if let Some(current) = self.current_margin() {
            self.set_margin(horizontal, current.vertical);
        }
    }

    /// Replace the vertical margin, keeping the current horizontal one
    pub fn set_margin_vertical(&mut self, vertical: f32) {
        if let Some(current) = self.current_margin() {
            self.set_margin(current.horizontal, vertical);
        }
    }

    fn current_margin(&self) -> Option<Margin> {
        let margin = self.config.as_ref().map(|c| c.margin);
        if margin.is_none() {
            warn!(state = ?self.state, "Ignoring margin update on unloaded editor");
        }
        margin
    }

    // Document queries, delegated verbatim

    pub fn get_contents(&self) -> Vec<DocChar> {
        self.store.get_contents()
    }

    pub fn get_contents_rich(&self) -> Vec<RichChunk> {
        self.store.get_contents_rich()
    }

    pub fn get_contents_html(&self) -> String {
        self.store.get_contents_html()
    }

    pub fn get_contents_text(&self) -> String {
        self.store.get_contents_text()
    }

    pub fn get_selection(&self) -> Vec<DocChar> {
        self.store.get_selection()
    }

    pub fn get_selection_rich(&self) -> Vec<RichChunk> {
        self.store.get_selection_rich()
    }

    pub fn get_selection_html(&self) -> String {
        self.store.get_selection_html()
    }

    pub fn get_selection_text(&self) -> String {
        self.store.get_selection_text()
    }

    pub fn get_position(&self) -> Option<Position> {
        self.store.get_position()
    }

    pub fn get_remote_cursors(&self) -> Vec<RemoteCursor> {
        self.store.get_remote_cursors()
    }

    // Events

    pub fn has_listeners(&self, event: EventKind) -> bool {
        self.emitter.has_listeners(event)
    }

    /// Register a raw callback receiving the full event
    pub fn on(&self, event: EventKind, callback: Callback) {
        self.emitter.on(event, callback);
    }

    pub fn on_position_change<F>(&self, callback: F)
    where
        F: Fn(&Position) + Send + Sync + 'static,
    {
        self.on(
            EventKind::PositionChange,
            Arc::new(move |event: &EditorEvent| {
                if let EditorEvent::PositionChange(position) = event {
                    callback(position);
                }
            }),
        );
    }

    pub fn on_selection_change<F>(&self, callback: F)
    where
        F: Fn(&[DocChar]) + Send + Sync + 'static,
    {
        self.on(
            EventKind::SelectionChange,
            Arc::new(move |event: &EditorEvent| {
                if let EditorEvent::SelectionChange(selection) = event {
                    callback(selection.as_slice());
                }
            }),
        );
    }

    pub fn on_focus_gained<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(EventKind::FocusGained, Arc::new(move |_: &EditorEvent| callback()));
    }

    pub fn on_focus_lost<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(EventKind::FocusLost, Arc::new(move |_: &EditorEvent| callback()));
    }

    pub fn on_remote_cursor_add<F>(&self, callback: F)
    where
        F: Fn(&RemoteCursor) + Send + Sync + 'static,
    {
        self.on(EventKind::RemoteCursorAdd, remote_cursor_callback(callback));
    }

    pub fn on_remote_cursor_remove<F>(&self, callback: F)
    where
        F: Fn(&RemoteCursor) + Send + Sync + 'static,
    {
        self.on(EventKind::RemoteCursorRemove, remote_cursor_callback(callback));
    }

    pub fn on_remote_cursor_change_name<F>(&self, callback: F)
    where
        F: Fn(&RemoteCursor) + Send + Sync + 'static,
    {
        self.on(EventKind::RemoteCursorChangeName, remote_cursor_callback(callback));
    }

    pub fn on_text_insert<F>(&self, callback: F)
    where
        F: Fn(&TextChange) + Send + Sync + 'static,
    {
        self.on(EventKind::TextInsert, text_change_callback(callback));
    }

    pub fn on_text_delete<F>(&self, callback: F)
    where
        F: Fn(&TextChange) + Send + Sync + 'static,
    {
        self.on(EventKind::TextDelete, text_change_callback(callback));
    }
}

fn remote_cursor_callback<F>(callback: F) -> Callback
where
    F: Fn(&RemoteCursor) + Send + Sync + 'static,
{
    Arc::new(move |event: &EditorEvent| match event {
        EditorEvent::RemoteCursorAdd(cursor)
        | EditorEvent::RemoteCursorRemove(cursor)
        | EditorEvent::RemoteCursorChangeName(cursor) => callback(cursor),
        _ => {}
    })
}

fn text_change_callback<F>(callback: F) -> Callback
where
    F: Fn(&TextChange) + Send + Sync + 'static,
{
    Arc::new(move |event: &EditorEvent| match event {
        EditorEvent::TextInsert(change) | EditorEvent::TextDelete(change) => callback(change),
        _ => {}
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::EmptyDocument;
    use crate::config::WebFontFamily;
    use crate::resources::{LoadFuture, OutlineFont};
    use crate::storage::MemoryStorage;
    use std::sync::Mutex;

    struct InstantLoader;

    impl ResourceLoader for InstantLoader {
        fn load_outline_font(&self, locator: &str) -> LoadFuture<OutlineFont> {
            let font = OutlineFont::detached(locator, 2048);
            Box::pin(async move { Ok(font) })
        }

        fn activate_web_fonts(&self, _family: &WebFontFamily) -> LoadFuture<()> {
            Box::pin(async { Ok(()) })
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        renders: Mutex<Vec<serde_json::Value>>,
    }

    impl Renderer for CountingRenderer {
        fn render(&self, config: &ResolvedConfig, _target: &RenderTarget) {
            self.renders
                .lock()
                .unwrap()
                .push(serde_json::to_value(config).unwrap());
        }
    }

    fn editor(config: EditorConfig) -> (Editor, Arc<CountingRenderer>) {
        let renderer = Arc::new(CountingRenderer::default());
        let editor = Editor::new(
            config,
            RenderTarget::new("#editor"),
            renderer.clone(),
            Arc::new(EmptyDocument),
        )
        .with_resource_loader(Arc::new(InstantLoader))
        .with_local_storage(Arc::new(MemoryStorage::new()));
        (editor, renderer)
    }

    #[tokio::test]
    async fn test_load_renders_once() {
        let (mut editor, renderer) = editor(EditorConfig::with_id("doc1"));
        assert_eq!(editor.state(), LoadState::Unloaded);

        editor.load().await;
        assert_eq!(editor.state(), LoadState::Ready);
        assert_eq!(renderer.renders.lock().unwrap().len(), 1);
        assert!(editor.config().unwrap().event_emitter.is_some());
    }

    #[tokio::test]
    async fn test_failed_load_invokes_callback() {
        let (mut editor, renderer) = editor(EditorConfig::default());
        let mut reported = None;
        editor.load_with(|e| reported = Some(e.to_string())).await;

        assert_eq!(editor.state(), LoadState::Failed);
        assert!(reported.unwrap().contains("'id'"));
        assert!(renderer.renders.lock().unwrap().is_empty());
        assert!(editor.config().is_none());
    }

    #[tokio::test]
    async fn test_second_load_is_ignored() {
        let (mut editor, renderer) = editor(EditorConfig::with_id("doc1"));
        editor.load().await;
        editor.load().await;
        assert_eq!(editor.state(), LoadState::Ready);
        assert_eq!(renderer.renders.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_mutations_before_load_are_ignored() {
        let (mut editor, renderer) = editor(EditorConfig::with_id("doc1"));
        editor.set_font_size(30.0);
        editor.set_margin_vertical(4.0);
        editor.update();
        assert!(renderer.renders.lock().unwrap().is_empty());
        assert!(editor.config().is_none());
    }

    #[tokio::test]
    async fn test_each_mutation_rerenders() {
        let (mut editor, renderer) = editor(EditorConfig::with_id("doc1"));
        editor.load().await;

        editor.set_user_name("Grace");
        editor.set_width(800.0);
        editor.set_font_size(12.0);
        editor.update_config(ConfigUpdate::RenderOptimizations(false));

        let config = editor.config().unwrap();
        assert_eq!(config.user_name, "Grace");
        assert_eq!(config.width, 800.0);
        assert_eq!(config.font_size, 12.0);
        assert!(!config.render_optimizations);
        assert_eq!(renderer.renders.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_typed_callbacks_filter_payloads() {
        let (editor, _) = editor(EditorConfig::with_id("doc1"));
        let names = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&names);
        editor.on_remote_cursor_change_name(move |cursor| {
            seen.lock().unwrap().push(cursor.name.clone());
        });

        assert!(editor.has_listeners(EventKind::RemoteCursorChangeName));
        assert!(!editor.has_listeners(EventKind::RemoteCursorAdd));

        let cursor = RemoteCursor {
            id: "u2".to_string(),
            name: "Linus".to_string(),
            color: None,
            position: None,
        };
        editor
            .event_emitter()
            .emit(&EditorEvent::RemoteCursorChangeName(cursor.clone()));
        editor.event_emitter().emit(&EditorEvent::RemoteCursorAdd(cursor));
        assert_eq!(*names.lock().unwrap(), vec!["Linus".to_string()]);
    }
}
