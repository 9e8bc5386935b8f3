//! One-shot pipeline from a host record to a resolved configuration
//!
//! The four outline fonts and the web-font activation load concurrently.
//! Any single failure fails the whole bootstrap; there is no partial or
//! degraded configuration.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::{ConfigResolver, EditorConfig, LoadedResources, ResolvedConfig, ResourcePlan};
use crate::error::{EditorError, ResourceError};
use crate::resources::{FontSet, ResourceLoader};

pub struct Bootstrapper {
    loader: Arc<dyn ResourceLoader>,
    resolver: ConfigResolver,
}

impl Bootstrapper {
    pub fn new(loader: Arc<dyn ResourceLoader>, resolver: ConfigResolver) -> Self {
        Self { loader, resolver }
    }

    /// Load every resource, then resolve `config` against the results
    ///
    /// Must run inside a tokio runtime.
    pub async fn load(&self, config: &mut EditorConfig) -> Result<ResolvedConfig, EditorError> {
        let plan = self.resolver.prepare(config);
        let loaded = self.fetch(&plan).await.inspect_err(|e| {
            error!(error = %e, "Resource loading failed");
        })?;
        Ok(self.resolver.resolve(config, loaded)?)
    }

    /// Fan out all five loads, fan in on all-success or the first failure
    async fn fetch(&self, plan: &ResourcePlan) -> Result<LoadedResources, ResourceError> {
        info!(
            regular = %plan.regular,
            families = %plan.web_font_family.describe(),
            "Loading editor resources"
        );

        // Spawned so loads still in flight when another fails run to completion
        let regular = tokio::spawn(self.loader.load_outline_font(&plan.regular));
        let bold = tokio::spawn(self.loader.load_outline_font(&plan.bold));
        let bold_italic = tokio::spawn(self.loader.load_outline_font(&plan.bold_italic));
        let italic = tokio::spawn(self.loader.load_outline_font(&plan.italic));
        let web_fonts = tokio::spawn(self.loader.activate_web_fonts(&plan.web_font_family));

        let (regular, bold, bold_italic, italic, ()) = tokio::try_join!(
            settle(regular),
            settle(bold),
            settle(bold_italic),
            settle(italic),
            settle(web_fonts),
        )?;

        debug!(units_per_em = regular.units_per_em(), "All editor resources loaded");
        Ok(LoadedResources {
            fonts: FontSet {
                regular,
                bold,
                bold_italic,
                italic,
            },
        })
    }
}

async fn settle<T>(handle: JoinHandle<Result<T, ResourceError>>) -> Result<T, ResourceError> {
    handle.await?
}
