//! Reads package identity from an RPM file's main header.
//!
//! ```text
//!   lead (96 bytes)  |  signature header  | pad to 8  |  main header  |  payload
//!
//!   header := magic 8e ad e8 01 | 4 reserved | nindex u32 | hsize u32
//!             | nindex x (tag u32, type u32, offset u32, count u32)
//!             | data store (hsize bytes)
//! ```
//!
//! Only the lead, the signature header and the main header are read; the
//! payload is never touched.

use byteorder::{BigEndian, ReadBytesExt};
use std::path::Path;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const LEAD_SIZE: usize = 96;
const LEAD_MAGIC: [u8; 4] = [0xed, 0xab, 0xee, 0xdb];
const HEADER_MAGIC: [u8; 4] = [0x8e, 0xad, 0xe8, 0x01];
const INDEX_ENTRY_SIZE: usize = 16;

const MAX_INDEX_ENTRIES: usize = 0x10000;
const MAX_DATA_SIZE: usize = 256 * 1024 * 1024;

const TAG_NAME: u32 = 1000;
const TAG_VERSION: u32 = 1001;
const TAG_RELEASE: u32 = 1002;
const TAG_ARCH: u32 = 1022;

const TYPE_STRING: u32 = 6;
const TYPE_STRING_ARRAY: u32 = 8;
const TYPE_I18N_STRING: u32 = 9;

#[derive(Debug, Error)]
pub enum RpmHeaderError {
    #[error("failed to read package: {0}")]
    Io(#[from] std::io::Error),
    #[error("not an RPM package")]
    NotRpm,
    #[error("malformed RPM header: {0}")]
    Malformed(&'static str),
    #[error("RPM header has no {0} tag")]
    MissingTag(&'static str),
}

/// The tags that decide where a package lands in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpmHeaderTags {
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: String,
}

struct HeaderSection {
    index: Vec<u8>,
    store: Vec<u8>,
}

pub async fn read_header_tags(path: &Path) -> Result<RpmHeaderTags, RpmHeaderError> {
    let mut file = File::open(path).await?;

    let mut lead = [0u8; LEAD_SIZE];
    read_or_not_rpm(&mut file, &mut lead).await?;
    if lead[..4] != LEAD_MAGIC {
        return Err(RpmHeaderError::NotRpm);
    }

    let signature = read_section(&mut file).await?;
    let padding = (8 - signature.store.len() % 8) % 8;
    let mut skipped = [0u8; 8];
    read_or_not_rpm(&mut file, &mut skipped[..padding]).await?;

    let header = read_section(&mut file).await?;
    Ok(RpmHeaderTags {
        name: header.string_tag(TAG_NAME, "NAME")?,
        version: header.string_tag(TAG_VERSION, "VERSION")?,
        release: header.string_tag(TAG_RELEASE, "RELEASE")?,
        arch: header.string_tag(TAG_ARCH, "ARCH")?,
    })
}

/// A short file is a truncated package, not an I/O failure.
async fn read_or_not_rpm(file: &mut File, buf: &mut [u8]) -> Result<(), RpmHeaderError> {
    match file.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(RpmHeaderError::Malformed("file ends inside the header"))
        }
        Err(e) => Err(e.into()),
    }
}

async fn read_section(file: &mut File) -> Result<HeaderSection, RpmHeaderError> {
    let mut intro = [0u8; 16];
    read_or_not_rpm(file, &mut intro).await?;
    if intro[..4] != HEADER_MAGIC {
        return Err(RpmHeaderError::Malformed("bad header magic"));
    }

    let mut sizes = &intro[8..];
    let nindex = ReadBytesExt::read_u32::<BigEndian>(&mut sizes)? as usize;
    let hsize = ReadBytesExt::read_u32::<BigEndian>(&mut sizes)? as usize;
    if nindex > MAX_INDEX_ENTRIES || hsize > MAX_DATA_SIZE {
        return Err(RpmHeaderError::Malformed("header size out of range"));
    }

    let mut index = vec![0u8; nindex * INDEX_ENTRY_SIZE];
    read_or_not_rpm(file, &mut index).await?;
    let mut store = vec![0u8; hsize];
    read_or_not_rpm(file, &mut store).await?;

    Ok(HeaderSection { index, store })
}

impl HeaderSection {
    fn string_tag(&self, wanted: u32, label: &'static str) -> Result<String, RpmHeaderError> {
        for mut entry in self.index.chunks_exact(INDEX_ENTRY_SIZE) {
            let tag = ReadBytesExt::read_u32::<BigEndian>(&mut entry)?;
            let kind = ReadBytesExt::read_u32::<BigEndian>(&mut entry)?;
            let offset = ReadBytesExt::read_u32::<BigEndian>(&mut entry)? as usize;
            if tag != wanted {
                continue;
            }
            if !matches!(kind, TYPE_STRING | TYPE_STRING_ARRAY | TYPE_I18N_STRING) {
                return Err(RpmHeaderError::Malformed("tag is not a string"));
            }

            let data = self
                .store
                .get(offset..)
                .ok_or(RpmHeaderError::Malformed("tag offset outside data store"))?;
            let end = data
                .iter()
                .position(|&b| b == 0)
                .ok_or(RpmHeaderError::Malformed("unterminated string"))?;
            return String::from_utf8(data[..end].to_vec())
                .map_err(|_| RpmHeaderError::Malformed("string is not UTF-8"));
        }

        Err(RpmHeaderError::MissingTag(label))
    }
}
