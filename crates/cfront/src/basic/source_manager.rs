//! Ownership and interpretation of source buffers.
//!
//! The SourceManager owns every byte of source text in the translation unit
//! and hands out `FileId`s for each unique `#include` of each buffer. It can
//! resolve any `SourceLocation` to a *physical* position (where the
//! characters live) or a *logical* position (where the user perceives them
//! after macro expansion).

use std::cell::{Cell, OnceCell};
use std::fmt::{self, Display, Formatter};
use std::path::Path;

use tracing::warn;

use crate::basic::source_location::{FileId, MacroId, SourceLocation};

/// Failure to ingest a source file.
#[derive(Debug)]
pub enum SourceError {
    ReadFailed {
        path: String,
        reason: String,
    },
}

impl Display for SourceError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::ReadFailed {
                path,
                reason,
            } => {
                write!(f, "cannot read {path}: {reason}")
            },
        }
    }
}

impl std::error::Error for SourceError {}

/// One ingested buffer: the immutable bytes plus a lazily built table of
/// line-start offsets.
struct ContentCache {
    /// Buffer identifier: the path for real files, a caller-supplied name
    /// for in-memory buffers.
    name: String,
    buffer: Vec<u8>,
    /// Offsets of every line start. Line #1 starts at offset 0; a trailing
    /// entry holds the buffer length so every line has an upper bound.
    line_cache: OnceCell<Vec<u32>>,
}

impl ContentCache {
    fn line_offsets(&self) -> &[u32] {
        self.line_cache.get_or_init(|| compute_line_offsets(&self.buffer))
    }
}

/// Per-FileId record: which buffer it addresses, which chunk of that buffer,
/// and where it was `#include`d from.
struct FileIdInfo {
    include_loc: SourceLocation,
    chunk_no: u32,
    content: usize,
}

/// One macro expansion. Macro locations store deltas against these two
/// positions.
#[derive(Clone, Copy, PartialEq, Eq)]
struct MacroIdInfo {
    instantiation_loc: SourceLocation,
    physical_loc: SourceLocation,
}

/// How many trailing macro entries `instantiation_loc` will try to fuse
/// into before allocating a fresh one.
const MACRO_REUSE_WINDOW: usize = 6;

pub struct SourceManager {
    contents: Vec<ContentCache>,
    /// FileId N is `file_ids[N - 1]`; id 0 is reserved invalid.
    file_ids: Vec<FileIdInfo>,
    macro_ids: Vec<MacroIdInfo>,
    /// Last line-number query: (file id, queried pos + 1, resulting line).
    /// Nearby follow-up queries narrow their binary search around it.
    last_line_query: Cell<Option<(u32, u32, u32)>>,
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceManager {
    pub fn new() -> Self {
        Self {
            contents: Vec::new(),
            file_ids: Vec::new(),
            macro_ids: Vec::new(),
            last_line_query: Cell::new(None),
        }
    }

    // ── buffer ingestion ────────────────────────────────────────────────

    /// Read `path` and create a FileId for it, recording the `#include`
    /// position that brought it in (invalid for the main file).
    pub fn create_file_id(
        &mut self,
        path: &Path,
        include_loc: SourceLocation,
    ) -> Result<FileId, SourceError> {
        let bytes = std::fs::read(path).map_err(|error| {
            warn!(path = %path.display(), %error, "failed to read source file");
            SourceError::ReadFailed {
                path: path.display().to_string(),
                reason: error.to_string(),
            }
        })?;
        Ok(self.create_file_id_for_bytes(path.display().to_string(), bytes, include_loc))
    }

    /// Wrap an in-memory buffer, taking ownership of it.
    pub fn create_file_id_for_buffer(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> FileId {
        self.create_file_id_for_bytes(name.into(), bytes, SourceLocation::invalid())
    }

    fn create_file_id_for_bytes(
        &mut self,
        name: String,
        bytes: Vec<u8>,
        include_loc: SourceLocation,
    ) -> FileId {
        let content = self.contents.len();
        let size = bytes.len() as u64;
        self.contents.push(ContentCache {
            name,
            buffer: bytes,
            line_cache: OnceCell::new(),
        });

        // Buffers too large for the per-chunk offset width get one FileId
        // per chunk; a location's raw position is relative to its chunk.
        let chunk_size: u64 = 1 << SourceLocation::FILE_POS_BITS;
        let result = FileId(self.file_ids.len() as u32 + 1);

        let mut remaining = size;
        let mut chunk_no = 0;
        loop {
            self.file_ids.push(FileIdInfo {
                include_loc,
                chunk_no,
                content,
            });
            chunk_no += 1;
            if remaining + 1 < chunk_size {
                break;
            }
            remaining -= chunk_size;
        }

        assert!((self.file_ids.len() as u32) < (1 << SourceLocation::FILE_ID_BITS), "ran out of file ids");
        result
    }

    // ── macro locations ─────────────────────────────────────────────────

    /// Return a location recording that a token whose characters live at
    /// `phys_loc` should be referenced from `instantiation_loc`.
    ///
    /// Recent macro entries are scanned so that consecutive tokens of one
    /// expansion share an entry, with the physical delta packed into the
    /// location itself.
    pub fn instantiation_loc(
        &mut self,
        phys_loc: SourceLocation,
        instantiation_loc: SourceLocation,
    ) -> SourceLocation {
        // Strip any existing mapping so the entry records where the
        // characters actually are and where the user will look.
        let phys_loc = self.physical_loc(phys_loc);
        let instantiation_loc = self.logical_loc(instantiation_loc);

        let window_start = self.macro_ids.len().saturating_sub(MACRO_REUSE_WINDOW);
        for index in (window_start..self.macro_ids.len()).rev() {
            let entry = self.macro_ids[index];
            // Fuse only when the instantiation point matches exactly and the
            // characters come from the same file chunk.
            if entry.instantiation_loc != instantiation_loc
                || entry.physical_loc.file_id() != phys_loc.file_id()
            {
                continue;
            }
            let delta = phys_loc.raw_file_pos() as i64 - entry.physical_loc.raw_file_pos() as i64;
            if SourceLocation::is_valid_macro_phys_offs(delta) {
                return SourceLocation::macro_loc(MacroId(index as u32), delta as u32, 0);
            }
        }

        self.macro_ids.push(MacroIdInfo {
            instantiation_loc,
            physical_loc: phys_loc,
        });
        assert!((self.macro_ids.len() as u32) < (1 << SourceLocation::MACRO_ID_BITS), "ran out of macro ids");
        SourceLocation::macro_loc(MacroId(self.macro_ids.len() as u32 - 1), 0, 0)
    }

    /// Resolve to the position where the characters actually live. File
    /// locations are their own physical form.
    pub fn physical_loc(
        &self,
        loc: SourceLocation,
    ) -> SourceLocation {
        if loc.is_file_id() {
            return loc;
        }
        let entry = &self.macro_ids[loc.macro_id().index() as usize];
        entry.physical_loc.file_loc_with_offset(loc.macro_phys_offs())
    }

    /// Resolve to the position the user perceives. File locations are their
    /// own logical form.
    pub fn logical_loc(
        &self,
        loc: SourceLocation,
    ) -> SourceLocation {
        if loc.is_file_id() {
            return loc;
        }
        let entry = &self.macro_ids[loc.macro_id().index() as usize];
        entry.instantiation_loc.file_loc_with_offset(loc.macro_log_offs())
    }

    // ── buffer access ───────────────────────────────────────────────────

    pub fn buffer_data(
        &self,
        file_id: FileId,
    ) -> &[u8] {
        &self.content_of(file_id).buffer
    }

    /// Name of the file or buffer the location lives in.
    pub fn source_name(
        &self,
        loc: SourceLocation,
    ) -> &str {
        let loc = self.physical_loc(loc);
        if !loc.is_valid() {
            return "";
        }
        &self.content_of(loc.file_id()).name
    }

    /// The bytes starting at the physical position of `loc`.
    pub fn character_data(
        &self,
        loc: SourceLocation,
    ) -> &[u8] {
        let loc = self.physical_loc(loc);
        let (file_id, offset) = self.decomposed_file_loc(loc);
        &self.content_of(file_id).buffer[offset as usize..]
    }

    /// Decompose a file location into (first chunk's FileId, offset from the
    /// start of the buffer), folding the chunk number back in.
    pub fn decomposed_file_loc(
        &self,
        loc: SourceLocation,
    ) -> (FileId, u32) {
        assert!(loc.is_file_id(), "not a file location");
        let info = self.file_id_info(loc.file_id());
        let chunk_no = info.chunk_no;
        let offset = loc.raw_file_pos() + (chunk_no << SourceLocation::FILE_POS_BITS);
        (FileId(loc.file_id().0 - chunk_no), offset)
    }

    /// Rebuild the location for a flat buffer offset, selecting the right
    /// chunk FileId. Inverse of `decomposed_file_loc`.
    pub fn location_for_offset(
        &self,
        file_id: FileId,
        offset: u32,
    ) -> SourceLocation {
        let chunk = offset >> SourceLocation::FILE_POS_BITS;
        SourceLocation::file_loc(FileId(file_id.0 + chunk), offset & ((1 << SourceLocation::FILE_POS_BITS) - 1))
    }

    /// The `#include` position that brought in the file owning `loc`.
    pub fn include_loc(
        &self,
        loc: SourceLocation,
    ) -> SourceLocation {
        let loc = self.logical_loc(loc);
        self.file_id_info(loc.file_id()).include_loc
    }

    /// Walk the `#include` chain outward from `loc`: the first element is
    /// the position that included `loc`'s file, and so on up to the main
    /// file, which has no include position.
    pub fn include_stack(
        &self,
        loc: SourceLocation,
    ) -> Vec<SourceLocation> {
        let mut stack = Vec::new();
        let mut current = self.logical_loc(loc);
        while current.is_valid() {
            let include_loc = self.file_id_info(current.file_id()).include_loc;
            if !include_loc.is_valid() {
                break;
            }
            stack.push(include_loc);
            current = self.logical_loc(include_loc);
        }
        stack
    }

    // ── line and column queries ─────────────────────────────────────────

    /// 1-based column of a file location: an O(column) backward scan to the
    /// nearest line terminator. Returns 0 for the invalid location.
    pub fn column_number(
        &self,
        loc: SourceLocation,
    ) -> u32 {
        if !loc.is_valid() {
            return 0;
        }
        assert!(loc.is_file_id(), "resolve to a physical or logical location first");
        let (file_id, pos) = self.decomposed_file_loc(loc);
        let buf = &self.content_of(file_id).buffer;

        let mut line_start = pos as usize;
        while line_start > 0 && buf[line_start - 1] != b'\n' && buf[line_start - 1] != b'\r' {
            line_start -= 1;
        }
        pos - line_start as u32 + 1
    }

    /// 1-based line of a file location. Builds the buffer's line table on
    /// first use, then binary-searches; a one-entry cache of the previous
    /// query narrows the bounds when the new query lands nearby.
    pub fn line_number(
        &self,
        loc: SourceLocation,
    ) -> u32 {
        if !loc.is_valid() {
            return 0;
        }
        assert!(loc.is_file_id(), "resolve to a physical or logical location first");
        let (file_id, pos) = self.decomposed_file_loc(loc);
        let offsets = self.content_of(file_id).line_offsets();

        // The line of `pos` is the number of line starts at or before it,
        // i.e. the lower bound of pos + 1 in the table.
        let queried = pos + 1;

        let mut lo = 0usize;
        let mut hi = offsets.len();
        if let Some((last_file, last_pos, last_line)) = self.last_line_query.get()
            && last_file == file_id.index()
        {
            if queried >= last_pos {
                lo = last_line as usize - 1;
                // The query is likely nearby: probe 5, 10, then 20 lines
                // ahead before falling back to the full upper bound.
                for probe in [5usize, 10, 20] {
                    if lo + probe < hi {
                        if offsets[lo + probe] > queried {
                            hi = lo + probe;
                            break;
                        }
                    } else {
                        break;
                    }
                }
            } else {
                hi = (last_line as usize + 1).min(hi);
            }
        }

        let line = lo + offsets[lo..hi].partition_point(|&start| start < queried);
        self.last_line_query.set(Some((file_id.index(), queried, line as u32)));
        line as u32
    }

    pub fn physical_line_number(
        &self,
        loc: SourceLocation,
    ) -> u32 {
        self.line_number(self.physical_loc(loc))
    }

    pub fn logical_line_number(
        &self,
        loc: SourceLocation,
    ) -> u32 {
        self.line_number(self.logical_loc(loc))
    }

    pub fn physical_column_number(
        &self,
        loc: SourceLocation,
    ) -> u32 {
        self.column_number(self.physical_loc(loc))
    }

    pub fn logical_column_number(
        &self,
        loc: SourceLocation,
    ) -> u32 {
        self.column_number(self.logical_loc(loc))
    }

    // ── internal ────────────────────────────────────────────────────────

    fn file_id_info(
        &self,
        file_id: FileId,
    ) -> &FileIdInfo {
        assert!(file_id.is_valid(), "invalid FileId");
        &self.file_ids[file_id.index() as usize - 1]
    }

    fn content_of(
        &self,
        file_id: FileId,
    ) -> &ContentCache {
        &self.contents[self.file_id_info(file_id).content]
    }
}

/// Scan a buffer once for line terminators. `\n`, `\r`, and the two-byte
/// pairs `\r\n` / `\n\r` each terminate exactly one line.
fn compute_line_offsets(buffer: &[u8]) -> Vec<u32> {
    let mut offsets = vec![0u32];
    let mut i = 0usize;
    while i < buffer.len() {
        let byte = buffer[i];
        if byte == b'\n' || byte == b'\r' {
            i += 1;
            if i < buffer.len() && (buffer[i] == b'\n' || buffer[i] == b'\r') && buffer[i] != byte {
                i += 1;
            }
            offsets.push(i as u32);
        } else {
            i += 1;
        }
    }
    offsets.push(buffer.len() as u32);
    offsets
}

#[cfg(test)]
#[path = "../../tests/src/basic/source_manager_tests.rs"]
mod tests;
