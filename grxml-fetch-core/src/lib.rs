#![doc = "grxml-fetch-core: core harvesting pipeline for grxml-fetch."]

//! This crate contains the whole grammar-file harvesting pipeline: the file
//! server contract and its HTTP adapter, exclusion matching, request
//! throttling, tree scanning, concurrent downloading and the per-cluster
//! orchestrator. CLI glue and config-file parsing live in the `grxml-fetch`
//! binary crate.
//!
//! # Usage
//! Construct a [`harvest::Harvester`] with a [`contract::FileServerClient`]
//! implementation and a [`config::HarvestConfig`], then call
//! `process_business_units` with the units to harvest.

pub mod client;
pub mod config;
pub mod contract;
pub mod download;
pub mod exclude;
pub mod harvest;
pub mod scan;
pub mod throttle;
