//! Read-only operations over the catalog and the install directory

use crate::context::OpsCtx;
use crate::orchestrator::Orchestrator;
use crate::types::{StatusReport, TitleSummary};
use arcade_errors::Error;
use arcade_types::Decision;

/// Fetch the catalog and pair every title with its local install state
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched and no earlier snapshot
/// is available.
pub async fn list_titles(ctx: &OpsCtx) -> Result<Vec<TitleSummary>, Error> {
    let titles = match ctx.catalog.refresh().await {
        Ok(titles) => titles,
        Err(e) => match ctx.catalog.snapshot() {
            Some(titles) => {
                tracing::warn!(error = %e, "catalog refresh failed, listing last known catalog");
                titles
            }
            None => return Err(e),
        },
    };

    let platform = ctx.settings.platform;
    let mut summaries = Vec::with_capacity(titles.len());
    for (index, descriptor) in titles.iter().enumerate() {
        let marker = ctx.versions.read(&descriptor.id).await;
        summaries.push(TitleSummary {
            index,
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            version: descriptor.version(platform).to_string(),
            downloadable: descriptor.download_url(platform).is_some(),
            action: Decision::decide(marker.as_ref(), descriptor, platform),
            installed_version: marker.map(|m| m.version),
        });
    }
    Ok(summaries)
}

/// Installed titles and running pipelines
///
/// # Errors
///
/// Returns an error if the apps directory cannot be read.
pub async fn status(orchestrator: &Orchestrator) -> Result<StatusReport, Error> {
    Ok(StatusReport {
        installed: orchestrator.context().versions.list().await?,
        active: orchestrator.active(),
    })
}
