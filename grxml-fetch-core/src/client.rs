#![doc = "HTTP adapter for the file server REST surface: bridges the FileServerClient contract to a real cluster endpoint."]

//! # HttpFileServerClient
//!
//! Implements [`FileServerClient`] over the file server's REST API. One
//! client is constructed per cluster endpoint; all transport, serialization
//! and status mapping are encapsulated here.
//!
//! - Listings come back as JSON [`DirectoryListing`] bodies.
//! - Transfers stream the file body straight to the caller-chosen local
//!   path; HTTP statuses map onto [`TransferCode`] so the pipeline can
//!   distinguish a missing file from a transport failure.

use std::path::Path;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, error};

use crate::contract::{ClientError, DirectoryListing, FileServerClient, TransferCode};

pub struct HttpFileServerClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFileServerClient {
    /// Build a client for one cluster endpoint. A bare host or VIP address
    /// is accepted and defaults to `http://`.
    pub fn new(endpoint: &str, app_name: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().user_agent(app_name).build()?;
        let trimmed = endpoint.trim_end_matches('/');
        let base_url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl FileServerClient for HttpFileServerClient {
    async fn list_directory(
        &self,
        bus_no: u32,
        path: &str,
        pattern: &str,
        include_deleted: bool,
        folders_only: bool,
        files_only: bool,
    ) -> Result<DirectoryListing, ClientError> {
        let url = format!("{}/api/v1/bus/{}/list", self.base_url, bus_no);
        debug!(bus_no, path, url = %url, "listing remote directory");

        let response = self
            .http
            .get(&url)
            .query(&[("path", path), ("pattern", pattern)])
            .query(&[
                ("include_deleted", include_deleted),
                ("folders_only", folders_only),
                ("files_only", files_only),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(bus_no, path, %status, "file server refused listing");
            return Err(format!("file server returned {status} listing {path}").into());
        }

        let listing = response.json::<DirectoryListing>().await?;
        debug!(bus_no, path, entries = listing.entries.len(), "listing received");
        Ok(listing)
    }

    async fn fetch_file(
        &self,
        bus_no: u32,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<TransferCode, ClientError> {
        let url = format!("{}/api/v1/bus/{}/file", self.base_url, bus_no);
        debug!(bus_no, file = remote_path, url = %url, "fetching remote file");

        let response = self
            .http
            .get(&url)
            .query(&[("path", remote_path)])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(TransferCode::NotFound),
            StatusCode::FORBIDDEN => Ok(TransferCode::AccessDenied),
            status if !status.is_success() => Ok(TransferCode::Failed(format!("http {status}"))),
            _ => {
                let body = response.bytes().await?;
                std::fs::write(local_path, &body)?;
                Ok(TransferCode::Success)
            }
        }
    }
}
