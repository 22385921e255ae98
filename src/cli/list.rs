//! `list` subcommand

use crate::datadog::DatadogClient;
use crate::output::{self, OutputFormat};
use crate::resource::{list_all, list_one, Registry};
use anyhow::{bail, Context, Result};

/// List one resource type by its REST base path.
///
/// A failure here propagates: listing a single type the user named should
/// exit non-zero instead of degrading silently.
pub async fn run_one(
    registry: &Registry,
    client: &DatadogClient,
    type_path: &str,
    format: OutputFormat,
) -> Result<()> {
    let rt = match registry.find(type_path) {
        Some(rt) => rt,
        None => {
            let known: Vec<String> = registry.iter().map(|rt| rt.rest_path(None)).collect();
            bail!(
                "Unknown resource type {type_path:?}. Known types: {}",
                known.join(", ")
            );
        }
    };

    let listed = list_one(rt.as_ref(), client)
        .await
        .with_context(|| format!("Failed to list {type_path}"))?;
    output::render(rt.as_ref(), listed, format);
    Ok(())
}

/// List every (non-disabled) resource type concurrently.
///
/// Per-type failures are rendered as errors in that type's slot; siblings
/// still report. The exit status reflects whether every slot succeeded.
pub async fn run_all(
    registry: &Registry,
    client: &DatadogClient,
    format: OutputFormat,
    include_disabled: bool,
) -> Result<()> {
    let reports = list_all(registry, client, include_disabled).await;

    let mut failed = 0usize;
    for report in reports {
        let type_path = report.resource_type.rest_path(None);
        match report.outcome {
            Ok(listed) => output::render(report.resource_type.as_ref(), listed, format),
            Err(e) => {
                failed += 1;
                tracing::error!("list all: {type_path}: {e}");
                eprintln!("{type_path}: ERROR: {e}");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} resource type(s) failed to list");
    }
    Ok(())
}
