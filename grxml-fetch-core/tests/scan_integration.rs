use std::sync::Arc;
use std::time::Duration;

use grxml_fetch_core::contract::{DirectoryListing, MockFileServerClient, RemoteEntry};
use grxml_fetch_core::exclude::ExclusionMatcher;
use grxml_fetch_core::scan::GrammarScanner;
use grxml_fetch_core::throttle::RequestThrottler;

fn listing(entries: &[(&str, bool)]) -> DirectoryListing {
    DirectoryListing {
        entries: entries
            .iter()
            .map(|&(name, is_folder)| RemoteEntry {
                name: name.to_string(),
                is_folder,
            })
            .collect(),
    }
}

fn scanner_with(
    client: MockFileServerClient,
    exclusions: &[&str],
) -> GrammarScanner<MockFileServerClient> {
    let patterns: Vec<String> = exclusions.iter().map(|p| p.to_string()).collect();
    GrammarScanner::new(
        Arc::new(client),
        Arc::new(RequestThrottler::new(2, Duration::from_secs(1))),
        ExclusionMatcher::new(&patterns),
    )
}

#[tokio::test(start_paused = true)]
async fn scan_returns_only_grammar_files() {
    let mut client = MockFileServerClient::new();
    client
        .expect_list_directory()
        .withf(|&bus_no, path, pattern, &deleted, &folders, &files| {
            bus_no == 123 && path == "/" && pattern == "*" && !deleted && !folders && !files
        })
        .times(1)
        .returning(|_, _, _, _, _, _| {
            Ok(listing(&[
                ("test.grxml", false),
                ("data.xml", false),
                ("file.txt", false),
            ]))
        });

    let scanner = scanner_with(client, &[]);
    let results = scanner.scan_for_grammar_files(123, "/").await;

    assert_eq!(results, vec!["/test.grxml".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn scan_recurses_into_nested_directories() {
    let mut client = MockFileServerClient::new();
    client
        .expect_list_directory()
        .withf(|&bus_no, path, _, _, _, _| bus_no == 123 && path == "/")
        .times(1)
        .returning(|_, _, _, _, _, _| {
            Ok(listing(&[("root.grxml", false), ("subfolder", true)]))
        });
    client
        .expect_list_directory()
        .withf(|&bus_no, path, _, _, _, _| bus_no == 123 && path == "/subfolder")
        .times(1)
        .returning(|_, _, _, _, _, _| Ok(listing(&[("nested.grxml", false)])));

    let scanner = scanner_with(client, &[]);
    let results = scanner.scan_for_grammar_files(123, "/").await;

    assert_eq!(results.len(), 2);
    assert!(results.contains(&"/root.grxml".to_string()));
    assert!(results.contains(&"/subfolder/nested.grxml".to_string()));
}

// No expectation exists for "/temp": the mock panics if the scanner issues
// a listing call for the excluded subtree.
#[tokio::test(start_paused = true)]
async fn scan_skips_excluded_directories_without_listing_them() {
    let mut client = MockFileServerClient::new();
    client
        .expect_list_directory()
        .withf(|&bus_no, path, _, _, _, _| bus_no == 123 && path == "/")
        .times(1)
        .returning(|_, _, _, _, _, _| {
            Ok(listing(&[
                ("root.grxml", false),
                ("temp", true),
                ("data", true),
            ]))
        });
    client
        .expect_list_directory()
        .withf(|&bus_no, path, _, _, _, _| bus_no == 123 && path == "/data")
        .times(1)
        .returning(|_, _, _, _, _, _| Ok(listing(&[("file.grxml", false)])));

    let scanner = scanner_with(client, &["/temp"]);
    let results = scanner.scan_for_grammar_files(123, "/").await;

    assert_eq!(results.len(), 2);
    assert!(results.contains(&"/root.grxml".to_string()));
    assert!(results.contains(&"/data/file.grxml".to_string()));
}

#[tokio::test(start_paused = true)]
async fn scan_matches_extension_case_insensitively() {
    let mut client = MockFileServerClient::new();
    client
        .expect_list_directory()
        .withf(|_, path, _, _, _, _| path == "/")
        .times(1)
        .returning(|_, _, _, _, _, _| {
            Ok(listing(&[("UPPER.GRXML", false), ("Mixed.GrXml", false)]))
        });

    let scanner = scanner_with(client, &[]);
    let results = scanner.scan_for_grammar_files(123, "/").await;

    assert_eq!(results.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn scan_treats_unavailable_listing_as_empty() {
    let mut client = MockFileServerClient::new();
    client
        .expect_list_directory()
        .times(1)
        .returning(|_, _, _, _, _, _| Err("transport failure".into()));

    let scanner = scanner_with(client, &[]);
    let results = scanner.scan_for_grammar_files(123, "/").await;

    assert!(results.is_empty());
}

#[tokio::test(start_paused = true)]
async fn scan_isolates_a_failing_subtree() {
    let mut client = MockFileServerClient::new();
    client
        .expect_list_directory()
        .withf(|_, path, _, _, _, _| path == "/")
        .times(1)
        .returning(|_, _, _, _, _, _| {
            Ok(listing(&[
                ("broken", true),
                ("ok", true),
                ("root.grxml", false),
            ]))
        });
    client
        .expect_list_directory()
        .withf(|_, path, _, _, _, _| path == "/broken")
        .times(1)
        .returning(|_, _, _, _, _, _| Err("listing timed out".into()));
    client
        .expect_list_directory()
        .withf(|_, path, _, _, _, _| path == "/ok")
        .times(1)
        .returning(|_, _, _, _, _, _| Ok(listing(&[("survivor.grxml", false)])));

    let scanner = scanner_with(client, &[]);
    let results = scanner.scan_for_grammar_files(123, "/").await;

    assert_eq!(results.len(), 2);
    assert!(results.contains(&"/root.grxml".to_string()));
    assert!(results.contains(&"/ok/survivor.grxml".to_string()));
}

#[tokio::test(start_paused = true)]
async fn scanning_an_unchanged_tree_twice_yields_the_same_set() {
    let mut client = MockFileServerClient::new();
    client
        .expect_list_directory()
        .withf(|_, path, _, _, _, _| path == "/")
        .times(2)
        .returning(|_, _, _, _, _, _| {
            Ok(listing(&[("a.grxml", false), ("b.grxml", false)]))
        });

    let scanner = scanner_with(client, &[]);
    let first = scanner.scan_for_grammar_files(123, "/").await;
    let second = scanner.scan_for_grammar_files(123, "/").await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}
