//! Tree scanning: recursively walks one business unit's remote directory
//! tree and collects every grammar file that is not under an excluded
//! subtree.
//!
//! Each directory visited costs exactly one listing call, issued through the
//! shared throttler; that call is the dominant cost the throttler exists to
//! bound. Excluded folders are pruned before their listing call is issued.
//! A failed listing is logged and isolates only its own subtree.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::contract::FileServerClient;
use crate::exclude::ExclusionMatcher;
use crate::throttle::RequestThrottler;

/// Extension of the files being harvested, matched case-insensitively.
pub const GRAMMAR_EXT: &str = ".grxml";

/// Recursive scanner for one cluster's file server.
pub struct GrammarScanner<C> {
    client: Arc<C>,
    throttler: Arc<RequestThrottler>,
    matcher: ExclusionMatcher,
}

impl<C: FileServerClient> GrammarScanner<C> {
    pub fn new(client: Arc<C>, throttler: Arc<RequestThrottler>, matcher: ExclusionMatcher) -> Self {
        Self {
            client,
            throttler,
            matcher,
        }
    }

    /// Walk the tree rooted at `start_path` and return every matching file
    /// path. Listing failures never fail the scan as a whole.
    pub async fn scan_for_grammar_files(&self, bus_no: u32, start_path: &str) -> Vec<String> {
        let mut found = Vec::new();
        self.scan_directory(bus_no, start_path.to_owned(), &mut found)
            .await;
        found
    }

    fn scan_directory<'a>(
        &'a self,
        bus_no: u32,
        path: String,
        found: &'a mut Vec<String>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let listing = self
                .throttler
                .run(|| {
                    self.client
                        .list_directory(bus_no, &path, "*", false, false, false)
                })
                .await;

            let listing = match listing {
                Ok(listing) => listing,
                Err(error) => {
                    warn!(bus_no, path = %path, error = %error, "directory listing failed, skipping subtree");
                    return;
                }
            };

            for entry in listing.entries {
                let full_path = join_remote_path(&path, &entry.name);
                if entry.is_folder {
                    if self.matcher.should_exclude(&full_path) {
                        debug!(bus_no, path = %full_path, "skipping excluded directory");
                        continue;
                    }
                    self.scan_directory(bus_no, full_path, found).await;
                } else if has_grammar_extension(&full_path) {
                    found.push(full_path);
                }
            }
        })
    }
}

/// Join a listing entry name onto its parent path without doubling the
/// separator at the root.
fn join_remote_path(parent: &str, name: &str) -> String {
    let name = name.trim_start_matches('/');
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{}/{name}", parent.trim_end_matches('/'))
    }
}

fn has_grammar_extension(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= GRAMMAR_EXT.len()
        && bytes[bytes.len() - GRAMMAR_EXT.len()..].eq_ignore_ascii_case(GRAMMAR_EXT.as_bytes())
}
