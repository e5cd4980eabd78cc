//! Lazy cursor over chunked record container files.
//!
//! A container is a flat sequence of records: a 4-byte tag, a u32 LE payload
//! length, then the payload. A record payload is itself a sequence of
//! subrecords with 4-byte tags and u16 LE lengths. The cursor walks headers
//! and copies out only the payloads a caller asks for; nothing is parsed
//! into the host's live object graph.
//!
//! Scanning is best-effort: a truncated header or payload ends the walk at
//! that point, and the caller treats whatever was recovered so far as the
//! file's contribution.

use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::ops::Range;
use std::path::Path;

/// 4-byte chunk tag.
pub type Tag = [u8; 4];

/// Top-level record holding a map cell.
pub const CELL: Tag = *b"CELL";
/// Editor-id subrecord: raw null-terminated bytes, at most 512.
pub const EDID: Tag = *b"EDID";
/// Cell flags subrecord: u16 LE; bit 0 set means "not interior".
pub const DATA: Tag = *b"DATA";

/// Longest editor id the scanner will copy out.
pub const MAX_EDID_LEN: usize = 512;

const RECORD_HEADER: usize = 8; // tag + u32 length
const SUB_HEADER: usize = 6; // tag + u16 length

/// Closed set of subrecord tags the scanner understands. Unknown tags are
/// skipped without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubrecordTag {
    EditorId,
    Flags,
    Unknown,
}

impl SubrecordTag {
    pub fn decode(tag: Tag) -> Self {
        match &tag {
            b"EDID" => SubrecordTag::EditorId,
            b"DATA" => SubrecordTag::Flags,
            _ => SubrecordTag::Unknown,
        }
    }
}

enum Backing {
    Map(Mmap),
    Bytes(Vec<u8>),
}

impl Backing {
    fn as_slice(&self) -> &[u8] {
        match self {
            Backing::Map(map) => map,
            Backing::Bytes(bytes) => bytes,
        }
    }
}

/// Read-only cursor over one container file.
///
/// Advance with [`next_record`](Self::next_record) and, within a record,
/// [`next_subrecord`](Self::next_subrecord); both return false when
/// exhausted or when the stream turns out truncated.
pub struct ContainerFile {
    data: Backing,
    /// Offset of the next unvisited record header.
    next_rec: usize,
    /// End of the current record's payload.
    rec_end: usize,
    /// Offset of the next unvisited subrecord header.
    next_sub: usize,
    /// Payload range of the current subrecord.
    sub_data: Range<usize>,
    rec_tag: Option<Tag>,
    sub_tag: Tag,
}

impl ContainerFile {
    /// Map a container file read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open container: {}", path.display()))?;
        let map = unsafe { Mmap::map(&file) }
            .with_context(|| format!("failed to map container: {}", path.display()))?;
        Ok(Self::with_backing(Backing::Map(map)))
    }

    /// Cursor over an in-memory buffer; used by tests and fuzzing.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::with_backing(Backing::Bytes(bytes))
    }

    fn with_backing(data: Backing) -> Self {
        Self {
            data,
            next_rec: 0,
            rec_end: 0,
            next_sub: 0,
            sub_data: 0..0,
            rec_tag: None,
            sub_tag: [0; 4],
        }
    }

    /// Advance to the next top-level record. Returns false at end of file
    /// or on a truncated record.
    pub fn next_record(&mut self) -> bool {
        let bytes = self.data.as_slice();
        let start = self.next_rec;
        if start + RECORD_HEADER > bytes.len() {
            return false;
        }

        let mut tag = [0u8; 4];
        tag.copy_from_slice(&bytes[start..start + 4]);
        let len = u32::from_le_bytes(bytes[start + 4..start + 8].try_into().unwrap()) as usize;
        let end = start + RECORD_HEADER + len;
        if end > bytes.len() {
            return false;
        }

        self.rec_tag = Some(tag);
        self.rec_end = end;
        self.next_sub = start + RECORD_HEADER;
        self.next_rec = end;
        true
    }

    /// Tag of the current record, once [`next_record`](Self::next_record)
    /// has succeeded.
    pub fn record_tag(&self) -> Option<Tag> {
        self.rec_tag
    }

    /// Advance to the next subrecord of the current record. Returns false
    /// at the end of the record or on a truncated subrecord.
    pub fn next_subrecord(&mut self) -> bool {
        let bytes = self.data.as_slice();
        let start = self.next_sub;
        if start + SUB_HEADER > self.rec_end {
            return false;
        }

        let mut tag = [0u8; 4];
        tag.copy_from_slice(&bytes[start..start + 4]);
        let len = u16::from_le_bytes(bytes[start + 4..start + 6].try_into().unwrap()) as usize;
        let end = start + SUB_HEADER + len;
        if end > self.rec_end {
            return false;
        }

        self.sub_tag = tag;
        self.sub_data = start + SUB_HEADER..end;
        self.next_sub = end;
        true
    }

    pub fn subrecord_tag(&self) -> Tag {
        self.sub_tag
    }

    /// Declared payload length of the current subrecord.
    pub fn subrecord_len(&self) -> usize {
        self.sub_data.len()
    }

    /// Copy the current subrecord payload into `buf`. Returns false when
    /// the payload does not fit; `buf` is then untouched.
    pub fn read_subrecord(&self, buf: &mut [u8]) -> bool {
        let data = &self.data.as_slice()[self.sub_data.clone()];
        if data.len() > buf.len() {
            return false;
        }
        buf[..data.len()].copy_from_slice(data);
        true
    }
}
