extern crate chrono;
extern crate serde;

pub mod config;
pub mod crc64;
pub mod error;
pub mod file;
pub mod fingerprint;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::Path;

pub use error::DiscIdError;
pub use file::{DiscSource, LocalFs};
pub use fingerprint::{DiscId, DiscLayout};

/// Disc id of the DVD rooted at `disc_root` on the local filesystem.
pub fn compute_identifier(disc_root: impl AsRef<Path>) -> Result<DiscId, DiscIdError> {
    compute_identifier_with(&LocalFs, disc_root.as_ref())
}

pub fn compute_identifier_with<S: DiscSource + ?Sized>(
    source: &S,
    disc_root: &Path,
) -> Result<DiscId, DiscIdError> {
    Ok(DiscLayout::capture(source, disc_root)?.disc_id())
}

/// JSON shape of one identified volume.
#[derive(Debug, Serialize)]
pub struct DiscReport {
    pub path:    String,
    pub dashed:  String,
    pub compact: String,
}

impl DiscReport {
    #[must_use] pub fn new(path: &str, id: DiscId) -> Self {
        Self { path: path.to_owned(), dashed: id.dashed(), compact: id.compact() }
    }
}

/// One hashed `VIDEO_TS` entry, as listed by `inspect`.
#[derive(Debug, Serialize)]
pub struct EntryReport {
    pub name:     String,
    pub size:     u32,
    pub filetime: u64,
    pub modified: String,
}

/// Everything `inspect` shows about a volume.
#[derive(Debug, Serialize)]
pub struct LayoutReport {
    pub path:         String,
    pub entries:      Vec<EntryReport>,
    pub sample_sizes: [usize; 2],
    pub disc_id:      DiscReport,
}

impl LayoutReport {
    #[must_use] pub fn new(path: &str, layout: &DiscLayout) -> Self {
        let entries = layout
            .entries()
            .iter()
            .map(|e| EntryReport {
                name: e.name.clone(),
                size: e.size,
                filetime: e.creation_time,
                modified: filetime_rfc3339(e.creation_time),
            })
            .collect();
        let [ifo, vts] = layout.samples();
        Self {
            path: path.to_owned(),
            entries,
            sample_sizes: [ifo.size(), vts.size()],
            disc_id: DiscReport::new(path, layout.disc_id()),
        }
    }
}

/// RFC 3339 UTC rendering of a FILETIME, including times before 1970.
fn filetime_rfc3339(filetime: u64) -> String {
    const TICKS_PER_SEC: i128 = 10_000_000;
    let ticks = i128::from(filetime) - i128::from(file::FILETIME_UNIX_OFFSET_SECS) * TICKS_PER_SEC;
    let nanos = (ticks.rem_euclid(TICKS_PER_SEC) * 100) as u32;
    i64::try_from(ticks.div_euclid(TICKS_PER_SEC))
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, nanos))
        .map_or_else(String::new, |t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
