//! Builds a table of perceptual artwork fingerprints for a trading card catalog.
//!
//! The pipeline is `catalog` (flatten source payloads, pick ids and image URLs) ->
//! `artwork` (crop the illustration) -> `ihash` (64-bit aHash/dHash) -> `assemble`
//! (dedup, skip failures, sort) -> `storage` (JSON table on disk).

pub mod artwork;
pub mod assemble;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod fingerprint;
pub mod ihash;
pub mod storage;

pub use assemble::{build, Assembler, RunReport, SkipReason};
pub use config::Config;
pub use fetch::{Fetch, HttpFetcher};
pub use fingerprint::{Fingerprint, FingerprintEntry};
pub use ihash::HashVariant;
pub use storage::FingerprintTable;
