/// `load_config` module: loads the business-unit CSV, per-cluster
/// properties files and the exclusion-pattern list into typed values for
/// the CLI.
///
/// This is the only place where user-supplied config files are parsed.
///
/// # File formats
/// - Business-unit CSV: one `business_unit,cluster` pair per line. `#`
///   comments and blank lines are skipped. The cluster field may be a
///   quoted comma-separated list, assigning the unit to several clusters.
///   Lines whose unit field is not a number are skipped.
/// - Cluster properties: `{dir}/{cluster}.cluster.properties` containing a
///   `file_server_configuration.FsIpAddress=<endpoint>` line.
/// - Exclusions: one pattern per line, trimmed; `#` comments and blanks
///   skipped. A missing file means no exclusions.
///
/// # Errors
/// All errors in this module use `anyhow::Error` with the offending path in
/// the message, surfaced at the CLI boundary.
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

/// Properties key naming a cluster's file server endpoint.
pub const ENDPOINT_KEY: &str = "file_server_configuration.FsIpAddress";

/// Parse the business-unit CSV into cluster → ordered unit numbers.
pub fn read_business_units(path: &Path) -> Result<BTreeMap<String, BTreeSet<u32>>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read business unit list {}", path.display()))?;

    let mut clusters: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_csv_line(trimmed);
        if fields.len() < 2 {
            continue;
        }
        let Ok(bus_no) = fields[0].trim().parse::<u32>() else {
            continue;
        };

        for cluster in fields[1]
            .split(',')
            .map(str::trim)
            .filter(|cluster| !cluster.is_empty())
        {
            clusters
                .entry(cluster.to_string())
                .or_default()
                .insert(bus_no);
        }
    }

    info!(
        clusters = clusters.len(),
        path = %path.display(),
        "business unit CSV parsed"
    );
    Ok(clusters)
}

// Split on commas, but not inside double quotes. Quotes themselves are
// dropped from the fields.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Resolve one cluster's file server endpoint from its properties file.
pub fn read_cluster_endpoint(config_dir: &Path, cluster: &str) -> Result<String> {
    let properties_file = config_dir.join(format!("{cluster}.cluster.properties"));
    let content = fs::read_to_string(&properties_file).with_context(|| {
        format!(
            "cluster properties file not found: {}",
            properties_file.display()
        )
    })?;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(ENDPOINT_KEY) {
            if let Some((_, value)) = trimmed.split_once('=') {
                let endpoint = value.trim().to_string();
                info!(cluster, endpoint = %endpoint, "resolved cluster endpoint");
                return Ok(endpoint);
            }
        }
    }

    bail!(
        "{ENDPOINT_KEY} not found in {}",
        properties_file.display()
    );
}

/// Load exclusion patterns, if a file was given and exists.
pub fn read_exclusion_patterns(path: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read exclusion list {}", path.display()))?;
    let patterns: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    info!(patterns = patterns.len(), path = %path.display(), "exclusion list parsed");
    Ok(patterns)
}
