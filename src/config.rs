use std::path::PathBuf;
use std::time::Duration;

use crate::ihash::HashVariant;

pub const ALL_SET_CARDS: &str = "https://optcgapi.com/api/allSetCards/";
pub const ALL_ST_CARDS: &str = "https://optcgapi.com/api/allSTCards/";

/// Settings for one table build.
#[derive(Clone, Debug)]
pub struct Config {
    /// Catalog list URLs, fetched and concatenated in this order.
    pub sources: Vec<String>,
    pub output: PathBuf,
    pub timeout: Duration,
    /// Pause after each record that reached the image download. Be gentle with the API.
    pub delay: Duration,
    pub variant: HashVariant,
    pub progress_every: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: vec![ALL_SET_CARDS.to_string(), ALL_ST_CARDS.to_string()],
            output: PathBuf::from("hashes.json"),
            timeout: Duration::from_secs(60),
            delay: Duration::from_millis(50),
            variant: HashVariant::default(),
            progress_every: 100,
        }
    }
}
