#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use ritzy::collaborators::{EmptyDocument, TracingRenderer};
use ritzy::{Editor, EditorConfig, LoadState, RenderTarget};

/// Resolve an editor configuration headlessly and print it
#[derive(Debug, Parser)]
#[command(name = "ritzy", version)]
struct Args {
    /// JSON file holding the host configuration record
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document identifier (overrides the file)
    #[arg(long)]
    id: Option<String>,

    /// Directory containing the outline font files
    #[arg(long)]
    font_path: Option<String>,

    #[arg(long)]
    skin: Option<String>,

    #[arg(long)]
    font_size: Option<f32>,

    #[arg(long)]
    width: Option<f32>,

    /// Render target handle
    #[arg(long, default_value = "headless")]
    target: String,
}

impl Args {
    fn editor_config(&self) -> Result<EditorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_json::from_str::<EditorConfig>(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => EditorConfig::default(),
        };

        if let Some(id) = &self.id {
            config.id = Some(id.clone());
        }
        if let Some(font_path) = &self.font_path {
            let mut dir = font_path.clone();
            if !dir.ends_with('/') {
                dir.push('/');
            }
            config.local_font_path = Some(dir);
        }
        if let Some(skin) = &self.skin {
            config.skin = Some(skin.clone());
        }
        config.font_size = self.font_size.or(config.font_size);
        config.width = self.width.or(config.width);
        Ok(config)
    }
}

fn init_tracing() -> Result<()> {
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing()?;
    let args = Args::parse();
    let config = args.editor_config()?;

    let mut editor = Editor::new(
        config,
        RenderTarget::new(args.target.clone()),
        Arc::new(TracingRenderer),
        Arc::new(EmptyDocument),
    );

    let mut failure = None;
    editor.load_with(|e| failure = Some(e.to_string())).await;

    match (editor.state(), editor.config()) {
        (LoadState::Ready, Some(resolved)) => {
            info!(id = %resolved.id, "Resolved configuration");
            let json = serde_json::to_string_pretty(resolved)
                .context("Failed to serialize resolved configuration")?;
            println!("{json}");
            Ok(())
        }
        _ => Err(anyhow::anyhow!(
            "Editor loading failed: {}",
            failure.unwrap_or_else(|| "unknown error".to_string())
        )),
    }
}
