//! High-level pipeline: orchestrates scan → download for every business
//! unit of one cluster.
//!
//! One [`Harvester`] is built per cluster endpoint. Each invocation of
//! [`Harvester::process_business_units`] constructs one scanner/downloader
//! pair sharing one [`RequestThrottler`], so the request budget holds across
//! all units of the cluster, not per unit.
//!
//! # Responsibilities
//! - Strictly sequential unit processing in the caller-supplied order: at
//!   most one unit's traffic hits the endpoint at a time.
//! - Aggregates per-unit discovered/downloaded counts into a
//!   [`HarvestReport`]; partial success is the normal case and is reported,
//!   not raised.
//!
//! # Error Handling
//! Scan and download absorb their own failures as logged per-item outcomes,
//! so a misbehaving unit contributes zero and its siblings proceed.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::HarvestConfig;
use crate::contract::FileServerClient;
use crate::download::FileDownloader;
use crate::exclude::ExclusionMatcher;
use crate::scan::GrammarScanner;
use crate::throttle::RequestThrottler;

/// Outcome of one cluster run.
#[derive(Debug, Default, Serialize)]
pub struct HarvestReport {
    pub units: Vec<UnitReport>,
    pub total_downloaded: u64,
}

/// Outcome for a single business unit.
#[derive(Debug, Serialize)]
pub struct UnitReport {
    pub bus_no: u32,
    pub discovered: usize,
    pub downloaded: usize,
}

/// Per-cluster orchestrator: drives scanner then downloader for each unit.
pub struct Harvester<C> {
    client: Arc<C>,
    throttler: Arc<RequestThrottler>,
    config: HarvestConfig,
}

impl<C: FileServerClient> Harvester<C> {
    pub fn new(client: Arc<C>, config: HarvestConfig) -> Self {
        let throttler = Arc::new(RequestThrottler::new(config.max_requests, config.window));
        Self {
            client,
            throttler,
            config,
        }
    }

    /// Process every unit in the order given and return the aggregated
    /// report. An empty sequence yields a zero-valued report.
    pub async fn process_business_units(&self, bus_nos: &[u32]) -> HarvestReport {
        let matcher = ExclusionMatcher::new(&self.config.exclusion_patterns);
        let scanner = GrammarScanner::new(self.client.clone(), self.throttler.clone(), matcher);
        let downloader = FileDownloader::new(
            self.client.clone(),
            self.throttler.clone(),
            self.config.output_dir.clone(),
        );

        let mut report = HarvestReport::default();
        for &bus_no in bus_nos {
            info!(bus_no, "processing business unit");

            let files = scanner.scan_for_grammar_files(bus_no, "/").await;
            info!(bus_no, found = files.len(), "scan complete");

            let downloaded = downloader.download_files(bus_no, &files).await;
            info!(bus_no, downloaded, discovered = files.len(), "downloads complete");

            report.total_downloaded += downloaded as u64;
            report.units.push(UnitReport {
                bus_no,
                discovered: files.len(),
                downloaded,
            });
        }

        match serde_json::to_string_pretty(&report) {
            Ok(json) => debug!(json = %json, "harvest report"),
            Err(e) => error!(error = ?e, "failed to serialize harvest report"),
        }

        report
    }
}
