use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::StorageError;
use crate::fingerprint::{Fingerprint, FingerprintEntry};

#[derive(Clone, Eq, PartialEq, Debug)]
struct Comparison {
    distance: u32,
    rank: usize,
}

// Max-heap on (distance, rank), so the worst kept candidate sits on top.
impl PartialOrd for Comparison {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Comparison {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then(self.rank.cmp(&other.rank))
    }
}

/// Sorted, id-unique list of fingerprints. This is what a run writes out.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct FingerprintTable {
    entries: Vec<FingerprintEntry>,
}

impl FingerprintTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first entry seen for each id and sorts by id.
    pub fn from_entries<I: IntoIterator<Item = FingerprintEntry>>(entries: I) -> Self {
        let mut by_id: BTreeMap<String, Fingerprint> = BTreeMap::new();
        for entry in entries {
            by_id.entry(entry.id).or_insert(entry.hash);
        }
        Self {
            entries: by_id
                .into_iter()
                .map(|(id, hash)| FingerprintEntry { id, hash })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[FingerprintEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /**
     * Reads a table written by `to_file`. Entries must carry well-formed hashes and be
     * strictly ascending by id.
     */
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let file = File::open(path)?;
        let entries: Vec<FingerprintEntry> = serde_json::from_reader(BufReader::new(file))?;
        for pair in entries.windows(2) {
            match pair[0].id.cmp(&pair[1].id) {
                Ordering::Less => {}
                Ordering::Equal => return Err(StorageError::Duplicate(pair[1].id.clone())),
                Ordering::Greater => return Err(StorageError::Unsorted(pair[1].id.clone())),
            }
        }
        Ok(Self { entries })
    }

    /// Writes the table as a JSON array, replacing `path` in one step once fully written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<&Self, StorageError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, &self.entries)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(self)
    }

    pub fn find(&self, hash: &Fingerprint) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.hash == *hash)
            .map(|e| e.id.as_str())
    }

    /// The `size` closest entries to `hash`, nearest first. Ties keep table order.
    pub fn find_many(&self, hash: &Fingerprint, size: usize) -> Vec<(&FingerprintEntry, u32)> {
        if size == 0 {
            return vec![];
        }
        let mut bheap: BinaryHeap<Comparison> = BinaryHeap::with_capacity(size + 1);
        for (rank, entry) in self.entries.iter().enumerate() {
            bheap.push(Comparison {
                distance: entry.hash.distance(hash),
                rank,
            });
            if bheap.len() > size {
                bheap.pop();
            }
        }
        bheap
            .into_sorted_vec()
            .into_iter()
            .map(|c| (&self.entries[c.rank], c.distance))
            .collect()
    }

    /// Like `find_many`, but drops anything further than `max_distance` bits away.
    pub fn find_within(
        &self,
        hash: &Fingerprint,
        size: usize,
        max_distance: u32,
    ) -> Vec<(&FingerprintEntry, u32)> {
        let mut found = self.find_many(hash, size);
        found.retain(|(_, distance)| *distance <= max_distance);
        found
    }
}
