//! Persistent cell-name index built by scanning container files.
//!
//! The host keeps editor ids for most map cells only in its data files, so
//! the cell listing works from this index instead of the live form graph.
//! The index is built lazily on first use, survives across invocations, and
//! is cleared when the host reloads its world data.

use crate::host::DataFile;
use crate::scanner::{CELL, ContainerFile, MAX_EDID_LEN, SubrecordTag};
use crate::utils::contains_ci;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Composite key: (compile key, editor id). Later files in load order
/// overwrite earlier ones, matching the host's data override semantics.
type CellKey = (u32, String);

/// Map from cell key to the owning file's display name.
#[derive(Debug, Default)]
pub struct CellIndex {
    cells: BTreeMap<CellKey, String>,
    built: bool,
}

impl CellIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drop all entries. The next [`ensure_built`](Self::ensure_built)
    /// rescans from scratch; a rebuild is all-or-nothing, never partial.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.built = false;
    }

    /// Build the index unless it was already built since the last clear.
    /// Scans the full-size file set first, then the small file set, in
    /// load order. A build that finds nothing still counts as built.
    pub fn ensure_built(&mut self, full: &[DataFile], small: &[DataFile]) {
        if self.built {
            return;
        }
        for file in full.iter().chain(small) {
            self.scan_file(file);
        }
        self.built = true;
        debug!(cells = self.cells.len(), "cell index built");
    }

    /// Entries whose editor id matches `match_string`, in key order.
    pub fn matches<'a>(
        &'a self,
        match_string: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.cells
            .iter()
            .filter(move |((_, edid), _)| contains_ci(edid, match_string))
            .map(|((_, edid), file)| (edid.as_str(), file.as_str()))
    }

    /// Scan one container for interior cell records. A record contributes
    /// once its editor id and flags were both read and flags bit 0 is
    /// clear; anything malformed is skipped without failing the build.
    fn scan_file(&mut self, file: &DataFile) {
        let mut container = match ContainerFile::open(&file.path) {
            Ok(container) => container,
            Err(err) => {
                warn!("failed to open container {}: {err:#}", file.name);
                return;
            }
        };

        let key = file.compile_key();
        while container.next_record() {
            if container.record_tag() != Some(CELL) {
                continue;
            }

            let mut edid: Option<String> = None;
            let mut flags: Option<u16> = None;
            while container.next_subrecord() {
                match SubrecordTag::decode(container.subrecord_tag()) {
                    SubrecordTag::EditorId => {
                        let mut buf = [0u8; MAX_EDID_LEN];
                        if container.read_subrecord(&mut buf) {
                            edid = Some(editor_id_from(&buf[..container.subrecord_len()]));
                        }
                    }
                    SubrecordTag::Flags => {
                        let mut buf = [0u8; 2];
                        if container.subrecord_len() == 2 && container.read_subrecord(&mut buf) {
                            flags = Some(u16::from_le_bytes(buf));
                        }
                    }
                    SubrecordTag::Unknown => {}
                }

                if let (Some(id), Some(bits)) = (&edid, flags) {
                    if bits & 1 == 0 {
                        self.cells.insert((key, id.clone()), file.name.clone());
                    }
                }
            }
        }
    }
}

/// Editor ids are stored as null-terminated bytes; take up to the first NUL.
fn editor_id_from(data: &[u8]) -> String {
    let end = memchr::memchr(0, data).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn sub(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(tag);
        out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn record(tag: &[u8; 4], subrecords: &[Vec<u8>]) -> Vec<u8> {
        let payload: Vec<u8> = subrecords.concat();
        let mut out = Vec::new();
        out.extend_from_slice(tag);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&payload);
        out
    }

    fn cell(edid: &str, flags: u16) -> Vec<u8> {
        let mut id = edid.as_bytes().to_vec();
        id.push(0);
        record(&CELL, &[sub(b"EDID", &id), sub(b"DATA", &flags.to_le_bytes())])
    }

    fn write_container(dir: &Path, name: &str, records: &[Vec<u8>]) -> DataFile {
        let path = dir.join(name);
        fs::write(&path, records.concat()).unwrap();
        DataFile {
            name: name.to_owned(),
            path,
            compile_index: 0,
            small_compile_index: 0,
        }
    }

    #[test]
    fn test_interior_cells_indexed() {
        let dir = TempDir::new().unwrap();
        let file = write_container(dir.path(), "base.esm", &[cell("TestHall", 0)]);

        let mut index = CellIndex::new();
        index.ensure_built(&[file], &[]);

        let hits: Vec<_> = index.matches("hall").collect();
        assert_eq!(hits, vec![("TestHall", "base.esm")]);
    }

    #[test]
    fn test_exterior_cells_excluded() {
        let dir = TempDir::new().unwrap();
        let file = write_container(
            dir.path(),
            "base.esm",
            &[cell("Interior", 0), cell("Wilderness", 1)],
        );

        let mut index = CellIndex::new();
        index.ensure_built(&[file], &[]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.matches("wilderness").count(), 0);
    }

    #[test]
    fn test_last_write_wins_within_load_order() {
        let dir = TempDir::new().unwrap();
        let mut first = write_container(dir.path(), "a.esm", &[cell("SharedCell", 0)]);
        let mut second = write_container(dir.path(), "b.esm", &[cell("SharedCell", 0)]);
        first.compile_index = 1;
        second.compile_index = 1;

        let mut index = CellIndex::new();
        index.ensure_built(&[first, second], &[]);

        let hits: Vec<_> = index.matches("SharedCell").collect();
        assert_eq!(hits, vec![("SharedCell", "b.esm")]);
    }

    #[test]
    fn test_distinct_compile_keys_keep_both() {
        let dir = TempDir::new().unwrap();
        let mut first = write_container(dir.path(), "a.esm", &[cell("SharedCell", 0)]);
        let mut second = write_container(dir.path(), "b.esm", &[cell("SharedCell", 0)]);
        first.compile_index = 1;
        second.compile_index = 2;

        let mut index = CellIndex::new();
        index.ensure_built(&[first, second], &[]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_small_files_scanned_after_full() {
        let dir = TempDir::new().unwrap();
        let full = write_container(dir.path(), "base.esm", &[cell("FullCell", 0)]);
        let mut small = write_container(dir.path(), "light.esl", &[cell("SmallCell", 0)]);
        small.small_compile_index = 1;

        let mut index = CellIndex::new();
        index.ensure_built(&[full], &[small]);

        assert_eq!(index.len(), 2);
        let hits: Vec<_> = index.matches("SmallCell").collect();
        assert_eq!(hits, vec![("SmallCell", "light.esl")]);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let good = write_container(dir.path(), "good.esm", &[cell("GoodCell", 0)]);
        let missing = DataFile {
            name: "missing.esm".into(),
            path: dir.path().join("missing.esm"),
            compile_index: 1,
            small_compile_index: 0,
        };

        let mut index = CellIndex::new();
        index.ensure_built(&[missing, good], &[]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_flags_without_edid_never_commit() {
        let dir = TempDir::new().unwrap();
        let bytes = record(&CELL, &[sub(b"DATA", &0u16.to_le_bytes())]);
        let file = write_container(dir.path(), "base.esm", &[bytes]);

        let mut index = CellIndex::new();
        index.ensure_built(&[file], &[]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_flags_before_edid_still_commits() {
        // Subrecord order within a record is not fixed.
        let dir = TempDir::new().unwrap();
        let bytes = record(
            &CELL,
            &[sub(b"DATA", &0u16.to_le_bytes()), sub(b"EDID", b"Swapped\0")],
        );
        let file = write_container(dir.path(), "base.esm", &[bytes]);

        let mut index = CellIndex::new();
        index.ensure_built(&[file], &[]);
        assert_eq!(index.matches("Swapped").count(), 1);
    }

    #[test]
    fn test_build_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let file = write_container(dir.path(), "base.esm", &[cell("OnceCell", 0)]);
        let files = [file];

        let mut index = CellIndex::new();
        index.ensure_built(&files, &[]);
        assert_eq!(index.len(), 1);

        // Removing the backing file must not matter: a second call is a no-op.
        fs::remove_file(&files[0].path).unwrap();
        index.ensure_built(&files, &[]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_clear_then_query_is_empty_until_rebuilt() {
        let dir = TempDir::new().unwrap();
        let file = write_container(dir.path(), "base.esm", &[cell("SomeCell", 0)]);
        let files = [file];

        let mut index = CellIndex::new();
        index.ensure_built(&files, &[]);
        index.clear();
        assert_eq!(index.matches("SomeCell").count(), 0);

        index.ensure_built(&files, &[]);
        assert_eq!(index.matches("SomeCell").count(), 1);
    }

    #[test]
    fn test_empty_build_counts_as_built() {
        let dir = TempDir::new().unwrap();
        let mut index = CellIndex::new();
        index.ensure_built(&[], &[]);
        assert!(index.is_empty());

        // A file appearing later must not be picked up without a clear.
        let file = write_container(dir.path(), "late.esm", &[cell("LateCell", 0)]);
        index.ensure_built(&[file.clone()], &[]);
        assert!(index.is_empty());

        index.clear();
        index.ensure_built(&[file], &[]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_truncated_container_keeps_earlier_records() {
        let dir = TempDir::new().unwrap();
        let mut bytes = cell("Recovered", 0);
        // Second record header claims more payload than the file holds.
        bytes.extend_from_slice(&CELL);
        bytes.extend_from_slice(&1000u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        let path = dir.path().join("broken.esm");
        fs::write(&path, &bytes).unwrap();
        let file = DataFile {
            name: "broken.esm".into(),
            path,
            compile_index: 0,
            small_compile_index: 0,
        };

        let mut index = CellIndex::new();
        index.ensure_built(&[file], &[]);
        assert_eq!(index.matches("Recovered").count(), 1);
    }
}
