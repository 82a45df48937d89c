use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::throttle::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};

/// Per-cluster harvesting configuration: where downloads land, which
/// subtrees are skipped, and the request budget for the cluster endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub output_dir: PathBuf,
    pub exclusion_patterns: Vec<String>,
    pub max_requests: usize,
    pub window: Duration,
}

impl HarvestConfig {
    pub fn new(output_dir: PathBuf, exclusion_patterns: Vec<String>) -> Self {
        Self {
            output_dir,
            exclusion_patterns,
            max_requests: DEFAULT_MAX_REQUESTS,
            window: DEFAULT_WINDOW,
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            output_dir = %self.output_dir.display(),
            exclusions = self.exclusion_patterns.len(),
            max_requests = self.max_requests,
            window_ms = self.window.as_millis() as u64,
            "Loaded HarvestConfig"
        );
        debug!(?self, "HarvestConfig loaded (full debug)");
    }
}
