use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds between 1601-01-01 and 1970-01-01.
pub const FILETIME_UNIX_OFFSET_SECS: u64 = 11_644_473_600;
const TICKS_PER_SEC: u64 = 10_000_000;

/// One entry of a directory listing, as reported by the filesystem.
#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: OsString,
    pub size: u64,
    pub modified: SystemTime,
    pub is_dir: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Missing,
    Dir,
    File { len: u64 },
    Other,
}

/// Filesystem access the disc id computation needs.
pub trait DiscSource {
    fn kind(&self, path: &Path) -> io::Result<PathKind>;

    /// Every entry directly inside `dir`, in whatever order the source yields.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>>;

    /// At most `max` bytes from the start of `path`.
    fn read_head(&self, path: &Path, max: u64) -> io::Result<Vec<u8>>;
}

/// [`DiscSource`] over the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl DiscSource for LocalFs {
    fn kind(&self, path: &Path) -> io::Result<PathKind> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(PathKind::Dir),
            Ok(meta) if meta.is_file() => Ok(PathKind::File { len: meta.len() }),
            Ok(_) => Ok(PathKind::Other),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
            Err(err) => Err(err),
        }
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            entries.push(DirEntryInfo {
                name: entry.file_name(),
                size: meta.len(),
                modified: meta.modified()?,
                is_dir: meta.is_dir(),
            });
        }
        Ok(entries)
    }

    fn read_head(&self, path: &Path, max: u64) -> io::Result<Vec<u8>> {
        let file = File::open(path)?;
        let mut buf = Vec::new();
        file.take(max).read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// 100 ns ticks since 1601-01-01, the FILETIME encoding of `time`.
///
/// Times before 1970 truncate toward zero; the sum wraps into 64 bits.
#[must_use] pub fn filetime(time: SystemTime) -> u64 {
    let unix_ticks: i128 = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => (after.as_nanos() / 100) as i128,
        Err(before) => -((before.duration().as_nanos() / 100) as i128),
    };
    let offset = i128::from(FILETIME_UNIX_OFFSET_SECS * TICKS_PER_SEC);
    (unix_ticks + offset) as u64
}

/// Inverse of [`filetime`] for whole ticks at or after 1970; earlier
/// FILETIMEs clamp to the Unix epoch.
#[must_use] pub fn system_time(filetime: u64) -> SystemTime {
    let offset = FILETIME_UNIX_OFFSET_SECS * TICKS_PER_SEC;
    let ticks = filetime.saturating_sub(offset);
    UNIX_EPOCH + std::time::Duration::from_nanos(ticks.saturating_mul(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn unix_epoch_is_offset() {
        assert_eq!(filetime(UNIX_EPOCH), 116_444_736_000_000_000);
    }

    #[test]
    fn whole_seconds() {
        let t = UNIX_EPOCH + Duration::from_secs(1_355_526_400);
        assert_eq!(filetime(t), 130_000_000_000_000_000);
    }

    #[test]
    fn sub_tick_precision_is_dropped() {
        let t = UNIX_EPOCH + Duration::new(1, 199);
        assert_eq!(filetime(t), 116_444_736_000_000_000 + 10_000_001);
    }

    #[test]
    fn before_unix_epoch_truncates_toward_zero() {
        let t = UNIX_EPOCH - Duration::from_nanos(250);
        assert_eq!(filetime(t), 116_444_736_000_000_000 - 2);
    }

    #[test]
    fn system_time_round_trips_known_value() {
        assert_eq!(filetime(system_time(130_000_000_010_000_000)), 130_000_000_010_000_000);
    }

    #[test]
    fn local_read_head_is_bounded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("blob");
        fs::write(&path, vec![7u8; 100]).expect("write blob");
        assert_eq!(LocalFs.read_head(&path, 10).expect("read").len(), 10);
        assert_eq!(LocalFs.read_head(&path, 1000).expect("read").len(), 100);
    }

    #[test]
    fn local_kind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("blob");
        fs::write(&path, b"abc").expect("write blob");
        assert_eq!(LocalFs.kind(dir.path()).expect("kind"), PathKind::Dir);
        assert_eq!(LocalFs.kind(&path).expect("kind"), PathKind::File { len: 3 });
        assert_eq!(LocalFs.kind(&dir.path().join("nope")).expect("kind"), PathKind::Missing);
    }
}
