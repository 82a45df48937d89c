//! Concurrent file downloading for one business unit.
//!
//! Every discovered file becomes its own future; all of them are gated by
//! the cluster's shared throttler, so the fan-out cannot exceed the API
//! budget. A single file failing (rejected by the server, or a transport
//! error) is logged and skipped; it never aborts the batch.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;

use crate::contract::{FileServerClient, TransferCode};
use crate::throttle::RequestThrottler;

/// Downloads discovered grammar files into the local output tree.
pub struct FileDownloader<C> {
    client: Arc<C>,
    throttler: Arc<RequestThrottler>,
    output_dir: PathBuf,
}

impl<C: FileServerClient> FileDownloader<C> {
    pub fn new(client: Arc<C>, throttler: Arc<RequestThrottler>, output_dir: PathBuf) -> Self {
        Self {
            client,
            throttler,
            output_dir,
        }
    }

    /// Download all `files` for `bus_no` concurrently and return how many
    /// succeeded. The caller derives the failure count from the input length.
    pub async fn download_files(&self, bus_no: u32, files: &[String]) -> usize {
        let unit_dir = self.output_dir.join(format!("BUS{bus_no}"));
        let downloads = files
            .iter()
            .map(|remote_path| self.download_single(bus_no, remote_path, &unit_dir));
        join_all(downloads)
            .await
            .into_iter()
            .filter(|&succeeded| succeeded)
            .count()
    }

    async fn download_single(&self, bus_no: u32, remote_path: &str, unit_dir: &Path) -> bool {
        let local_path = local_destination(unit_dir, remote_path);

        // Sibling downloads may create the same directory concurrently.
        if let Some(parent) = local_path.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                warn!(bus_no, file = %remote_path, error = %error, "could not create output directory");
                return false;
            }
        }

        let transfer = self
            .throttler
            .run(|| self.client.fetch_file(bus_no, remote_path, &local_path))
            .await;

        match transfer {
            Ok(TransferCode::Success) => true,
            Ok(code) => {
                warn!(bus_no, file = %remote_path, code = ?code, "file server rejected download");
                false
            }
            Err(error) => {
                warn!(bus_no, file = %remote_path, error = %error, "download failed");
                false
            }
        }
    }
}

/// Mirror a remote path under the unit's output directory, converting the
/// remote `/` separators to the local filesystem's convention.
fn local_destination(unit_dir: &Path, remote_path: &str) -> PathBuf {
    remote_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(unit_dir.to_path_buf(), |path, segment| path.join(segment))
}
