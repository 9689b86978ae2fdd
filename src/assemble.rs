use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::thread;
use std::time::Duration;

use image::DynamicImage;
use tracing::{debug, info};

use crate::artwork::extract_artwork;
use crate::catalog::{self, CardRecord};
use crate::config::Config;
use crate::error::{BuildError, HashError};
use crate::fetch::{fetch_catalogs, Fetch};
use crate::fingerprint::{Fingerprint, FingerprintEntry};
use crate::ihash::{self, HashVariant};
use crate::storage::FingerprintTable;

/// Why a record did not make it into the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    NoIdentifier,
    Duplicate,
    NoImage,
    Fetch,
    Decode,
    Degenerate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkipReason::NoIdentifier => "no-id",
            SkipReason::Duplicate => "duplicate",
            SkipReason::NoImage => "no-image",
            SkipReason::Fetch => "fetch",
            SkipReason::Decode => "decode",
            SkipReason::Degenerate => "degenerate",
        };
        f.write_str(name)
    }
}

impl From<HashError> for SkipReason {
    fn from(e: HashError) -> Self {
        match e {
            HashError::Decode(_) => SkipReason::Decode,
            HashError::DegenerateRegion { .. } => SkipReason::Degenerate,
        }
    }
}

/// Counters for one run.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub committed: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl RunReport {
    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    fn skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} records hashed", self.committed, self.processed)?;
        for (reason, count) in &self.skipped {
            write!(f, ", {} {}", count, reason)?;
        }
        Ok(())
    }
}

/// Crops the artwork out of a full card image and hashes it.
pub fn fingerprint_card(card: &DynamicImage, variant: HashVariant) -> Result<Fingerprint, HashError> {
    variant.hash(&extract_artwork(card))
}

/**
 * Walks catalog records one at a time and hashes the artwork of each.
 *
 * Nothing a single record does can stop the run: every failure turns into a `SkipReason`
 * and the loop moves on.
 */
pub struct Assembler<'f, F: Fetch + ?Sized> {
    fetcher: &'f F,
    variant: HashVariant,
    delay: Duration,
    progress_every: usize,
}

impl<'f, F: Fetch + ?Sized> Assembler<'f, F> {
    pub fn new(fetcher: &'f F, variant: HashVariant) -> Self {
        Self {
            fetcher,
            variant,
            delay: Duration::ZERO,
            progress_every: 0,
        }
    }

    pub fn from_config(fetcher: &'f F, config: &Config) -> Self {
        Self {
            fetcher,
            variant: config.variant,
            delay: config.delay,
            progress_every: config.progress_every,
        }
    }

    /// Download, crop and hash one card image.
    pub fn fingerprint_url(&self, url: &str) -> Result<Fingerprint, SkipReason> {
        let bytes = self.fetcher.get_bytes(url).map_err(|e| {
            debug!(url, error = %e, "image fetch failed");
            SkipReason::Fetch
        })?;
        let card = ihash::decode(&bytes)?;
        Ok(fingerprint_card(&card, self.variant)?)
    }

    fn process(
        &self,
        record: &CardRecord,
        seen: &HashSet<String>,
    ) -> Result<FingerprintEntry, SkipReason> {
        let id = catalog::card_id(record).ok_or(SkipReason::NoIdentifier)?;
        if seen.contains(&id) {
            return Err(SkipReason::Duplicate);
        }
        let url = catalog::image_url(record).ok_or(SkipReason::NoImage)?;
        let outcome = self.fingerprint_url(&url);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        outcome
            .map(|hash| FingerprintEntry::new(id.clone(), hash))
            .inspect_err(|reason| debug!(id = id.as_str(), url = url.as_str(), %reason, "skipped"))
    }

    pub fn run<'r, I>(&self, records: I) -> (FingerprintTable, RunReport)
    where
        I: IntoIterator<Item = &'r CardRecord>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries: Vec<FingerprintEntry> = vec![];
        let mut report = RunReport::default();

        for record in records {
            report.processed += 1;
            match self.process(record, &seen) {
                Ok(entry) => {
                    seen.insert(entry.id.clone());
                    entries.push(entry);
                    report.committed += 1;
                }
                Err(reason) => report.skip(reason),
            }
            if self.progress_every > 0 && report.processed % self.progress_every == 0 {
                info!(
                    processed = report.processed,
                    committed = report.committed,
                    "progress"
                );
            }
        }

        (FingerprintTable::from_entries(entries), report)
    }
}

/// Loads every catalog, hashes all cards and writes the table to `config.output`.
pub fn build<F: Fetch + ?Sized>(config: &Config, fetcher: &F) -> Result<RunReport, BuildError> {
    let payloads = fetch_catalogs(fetcher, &config.sources)?;
    let records = catalog::normalize(&payloads);
    info!(records = records.len(), variant = ?config.variant, "catalog loaded");

    let (table, report) = Assembler::from_config(fetcher, config).run(&records);
    table.to_file(&config.output)?;
    info!(
        output = %config.output.display(),
        entries = table.len(),
        "wrote fingerprint table"
    );
    Ok(report)
}
