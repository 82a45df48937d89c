/// # grxml-fetch CLI Interface (Module)
///
/// This module implements the full CLI interface for grxml-fetch—argument
/// parsing, cluster setup, and the concurrent fan-out over cluster
/// endpoints.
///
/// All pipeline logic (scanning, throttling, downloading, per-cluster
/// orchestration) lives in the [`grxml-fetch-core`] crate. This module is
/// strictly for CLI glue, config loading, and the outer coordinator.
///
/// ## How To Use
/// - For command-line users: use the installed `grxml-fetch` binary with
///   `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed
///   [`Cli`].
///
/// Configuration/setup failures (unreadable CSV, missing cluster
/// properties) abort the run before any harvesting starts; once the fan-out
/// begins, failures are per-file or per-unit and the run reports partial
/// success.
///
/// [`grxml-fetch-core`]: ../../grxml-fetch-core/
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use futures::future::join_all;
use tracing::{info, info_span, Instrument};

use grxml_fetch_core::client::HttpFileServerClient;
use grxml_fetch_core::config::HarvestConfig;
use grxml_fetch_core::harvest::Harvester;
use grxml_fetch_core::throttle::DEFAULT_MAX_REQUESTS;

use crate::load_config;

/// Application name reported to the file server.
pub const APP_NAME: &str = "grxml-fetch";

/// CLI for grxml-fetch: harvest grammar files across business units.
#[derive(Parser)]
#[clap(
    name = "grxml-fetch",
    version,
    about = "Harvest .grxml grammar files from clustered file servers, per business unit"
)]
pub struct Cli {
    /// CSV file of business_unit,cluster pairs (cluster may be a quoted
    /// comma-separated list)
    pub bus_list: PathBuf,

    /// Directory containing <cluster>.cluster.properties files
    pub cluster_config: PathBuf,

    /// File with exclusion patterns, one per line
    #[clap(long)]
    pub exclusions: Option<PathBuf>,

    /// Directory downloads are written under
    #[clap(long, default_value = "output")]
    pub output: PathBuf,

    /// File server requests admitted per rolling window, per cluster
    #[clap(long, default_value_t = DEFAULT_MAX_REQUESTS)]
    pub max_requests: usize,

    /// Rolling admission window in milliseconds
    #[clap(long, default_value_t = 1000)]
    pub window_ms: u64,
}

/// Extracted async CLI logic entrypoint for integration tests and main().
/// Returns the total number of files downloaded across all clusters.
pub async fn run(cli: Cli) -> Result<u64> {
    let clusters = load_config::read_business_units(&cli.bus_list)?;
    if clusters.is_empty() {
        bail!(
            "no valid business unit numbers found in {} (expected business_unit,cluster pairs per line)",
            cli.bus_list.display()
        );
    }

    let total_units = {
        let mut distinct: BTreeSet<u32> = BTreeSet::new();
        for units in clusters.values() {
            distinct.extend(units);
        }
        distinct.len()
    };
    info!(
        business_units = total_units,
        clusters = clusters.len(),
        "business unit list loaded"
    );

    let exclusions = load_config::read_exclusion_patterns(cli.exclusions.as_deref())?;
    if !exclusions.is_empty() {
        info!(patterns = exclusions.len(), "exclusion patterns loaded");
    }

    // Resolve every endpoint and build every client before any harvesting
    // starts: setup failures are fatal, harvesting failures are not.
    let mut prepared = Vec::new();
    for (cluster, units) in clusters {
        let endpoint = load_config::read_cluster_endpoint(&cli.cluster_config, &cluster)?;
        let client = HttpFileServerClient::new(&endpoint, APP_NAME)
            .map_err(|e| anyhow::Error::msg(format!("client setup for cluster {cluster} failed: {e}")))?;

        let mut config = HarvestConfig::new(cli.output.join(&cluster), exclusions.clone());
        config.max_requests = cli.max_requests;
        config.window = Duration::from_millis(cli.window_ms);

        prepared.push((cluster, units, client, config));
    }

    let cluster_tasks = prepared.into_iter().map(|(cluster, units, client, config)| {
        let span = info_span!("cluster", name = %cluster);
        async move {
            config.trace_loaded();
            let harvester = Harvester::new(Arc::new(client), config);
            let order: Vec<u32> = units.into_iter().collect();
            let report = harvester.process_business_units(&order).await;
            info!(downloaded = report.total_downloaded, "cluster complete");
            report.total_downloaded
        }
        .instrument(span)
    });

    let totals = join_all(cluster_tasks).await;
    let total_files: u64 = totals.iter().sum();

    info!(
        total_files,
        business_units = total_units,
        "downloaded grammar files across all business units"
    );
    Ok(total_files)
}
