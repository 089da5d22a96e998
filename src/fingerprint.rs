use crate::crc64::Crc64;
use crate::error::DiscIdError;
use crate::file::{self, DirEntryInfo, DiscSource, PathKind};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

pub const VIDEO_DIR: &str = "VIDEO_TS";
/// Content files mixed into the checksum, in hashing order.
pub const CONTENT_FILES: [&str; 2] = ["VIDEO_TS.IFO", "VTS_01_0.IFO"];
/// Bytes read from the start of each content file.
pub const MAX_READ_SIZE: u64 = 0x10000;

/// Metadata of one file directly inside `VIDEO_TS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Uppercased file name.
    pub name: String,
    /// Reported length, wrapped to 32 bits.
    pub size: u32,
    /// FILETIME of the modification time.
    pub creation_time: u64,
}

impl FileEntry {
    #[must_use] pub fn new(name: &OsStr, size: u64, creation_time: u64) -> Self {
        Self {
            name: normalize_name(name),
            size: size as u32,
            creation_time,
        }
    }

    #[must_use] pub fn from_dir_entry(info: &DirEntryInfo) -> Self {
        Self::new(&info.name, info.size, file::filetime(info.modified))
    }

    /// Canonical encoding: LE timestamp, LE size, name bytes, NUL.
    #[must_use] pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + 4 + self.name.len() + 1);
        buf.extend_from_slice(&self.creation_time.to_le_bytes());
        buf.extend_from_slice(&self.size.to_le_bytes());
        buf.extend_from_slice(self.name.as_bytes());
        buf.push(0);
        buf
    }
}

/// Uppercases char by char with the Unicode simple case mapping, so a char
/// never expands (`ß` stays `ß`).
#[must_use] pub fn normalize_name(name: &OsStr) -> String {
    name.to_string_lossy().chars().map(simple_uppercase).collect()
}

fn simple_uppercase(c: char) -> char {
    // Greek with ypogegrammeni: the full mapping expands, the simple one
    // goes to the titlecase letter.
    match c {
        '\u{1F80}'..='\u{1F87}' | '\u{1F90}'..='\u{1F97}' | '\u{1FA0}'..='\u{1FA7}' => {
            char::from_u32(c as u32 + 8).unwrap_or(c)
        }
        '\u{1FB3}' => '\u{1FBC}',
        '\u{1FC3}' => '\u{1FCC}',
        '\u{1FF3}' => '\u{1FFC}',
        _ => {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        }
    }
}

/// Leading bytes of one content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSample {
    pub bytes: Vec<u8>,
}

impl ContentSample {
    #[must_use] pub fn size(&self) -> usize { self.bytes.len() }
}

/// Everything that goes into a disc id, in hashing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscLayout {
    entries: Vec<FileEntry>,
    samples: [ContentSample; 2],
}

impl DiscLayout {
    /// Sorts `entries` by name; enumeration order does not matter.
    #[must_use] pub fn new(mut entries: Vec<FileEntry>, samples: [ContentSample; 2]) -> Self {
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Self { entries, samples }
    }

    /// Reads the `VIDEO_TS` folder under `disc_root` from `source`.
    pub fn capture<S: DiscSource + ?Sized>(source: &S, disc_root: &Path) -> Result<Self, DiscIdError> {
        let video_dir = disc_root.join(VIDEO_DIR);
        match source.kind(&video_dir) {
            Ok(PathKind::Dir) => {}
            Ok(_) => return Err(DiscIdError::NotFound { path: video_dir }),
            Err(err) => return Err(DiscIdError::Unreadable { path: video_dir, source: err }),
        }

        let listing = source
            .list_dir(&video_dir)
            .map_err(|err| DiscIdError::ListingFailure { path: video_dir.clone(), source: err })?;
        let entries = listing
            .iter()
            .filter(|info| !info.is_dir)
            .map(FileEntry::from_dir_entry)
            .collect();

        let [ifo, vts] = CONTENT_FILES;
        let samples = [
            read_sample(source, &video_dir.join(ifo))?,
            read_sample(source, &video_dir.join(vts))?,
        ];
        Ok(Self::new(entries, samples))
    }

    #[must_use] pub fn entries(&self) -> &[FileEntry] { &self.entries }

    #[must_use] pub fn samples(&self) -> &[ContentSample; 2] { &self.samples }

    #[must_use] pub fn disc_id(&self) -> DiscId {
        let mut crc = Crc64::new();
        for entry in &self.entries {
            crc.update(&entry.encode());
        }
        for sample in &self.samples {
            crc.update(&sample.bytes);
        }
        DiscId(crc.finalize())
    }
}

fn read_sample<S: DiscSource + ?Sized>(source: &S, path: &Path) -> Result<ContentSample, DiscIdError> {
    let len = match source.kind(path) {
        Ok(PathKind::File { len }) => len,
        Ok(_) => return Err(DiscIdError::NotFound { path: path.to_path_buf() }),
        Err(err) => return Err(DiscIdError::Unreadable { path: path.to_path_buf(), source: err }),
    };
    let target = len.min(MAX_READ_SIZE);
    let bytes = source
        .read_head(path, target)
        .map_err(|err| DiscIdError::Unreadable { path: path.to_path_buf(), source: err })?;
    if bytes.len() as u64 != target {
        return Err(short_read(path, target, bytes.len()));
    }
    Ok(ContentSample { bytes })
}

fn short_read(path: &Path, expected: u64, got: usize) -> DiscIdError {
    DiscIdError::Unreadable {
        path: PathBuf::from(path),
        source: std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("read {got} of {expected} bytes"),
        ),
    }
}

/// Raw 8-byte disc identifier.
///
/// `Display` gives the dashed form (`2D12B85D-4776FA31`), `{:x}` the
/// compact form (`2d12b85d4776fa31`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscId(pub [u8; 8]);

impl DiscId {
    #[must_use] pub fn bytes(&self) -> [u8; 8] { self.0 }

    #[must_use] pub fn dashed(&self) -> String { self.to_string() }

    #[must_use] pub fn compact(&self) -> String { format!("{self:x}") }
}

impl fmt::Display for DiscId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0[..4] {
            write!(f, "{b:02X}")?;
        }
        f.write_str("-")?;
        for b in &self.0[4..] {
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

impl fmt::LowerHex for DiscId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
