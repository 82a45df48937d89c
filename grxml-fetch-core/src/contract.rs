//! # contract: the interface the pipeline needs from the file server
//!
//! This module defines a single trait ([`FileServerClient`]) and the plain
//! data types that cross it. The file server itself is an external service;
//! everything the harvesting pipeline asks of it is a directory listing and
//! a single-file transfer, so that is the whole contract.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests (gated behind the
//!   `test-export-mocks` feature, on by default).
//!
//! ## Implementations
//! - [`crate::client::HttpFileServerClient`] for the real REST surface.
//! - `MockFileServerClient` in the test suites.

use std::path::Path;

use async_trait::async_trait;
use mockall::{automock, predicate::*};

/// Error type for client calls (simple boxed error for now).
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// One entry of a directory listing. Directories and files share the path
/// namespace and are told apart by `is_folder`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub is_folder: bool,
}

/// The result of listing one remote directory.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct DirectoryListing {
    pub entries: Vec<RemoteEntry>,
}

/// Outcome reported by the file server for one file transfer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TransferCode {
    Success,
    NotFound,
    AccessDenied,
    /// Any other rejection, with the server's reason.
    Failed(String),
}

/// Trait for talking to one cluster's file server endpoint.
///
/// All calls are scoped by `bus_no`: no two business units share a storage
/// namespace. Implementors surface transport problems as `Err`; a transfer
/// the server itself rejects comes back as an `Ok` [`TransferCode`].
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait FileServerClient: Send + Sync {
    /// List one directory of a business unit's tree.
    ///
    /// The pipeline only ever issues `pattern = "*"` with all flags false.
    async fn list_directory(
        &self,
        bus_no: u32,
        path: &str,
        pattern: &str,
        include_deleted: bool,
        folders_only: bool,
        files_only: bool,
    ) -> Result<DirectoryListing, ClientError>;

    /// Transfer one remote file to `local_path`.
    async fn fetch_file(
        &self,
        bus_no: u32,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<TransferCode, ClientError>;
}
