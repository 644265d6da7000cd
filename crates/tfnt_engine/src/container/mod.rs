//! The TFNT glyph atlas: a 16 byte header, an index sorted by codepoint and
//! a blob of packed glyph bitmaps in index order.

use std::{io::Write, path::Path};

use crate::{bits::packed_len, glyph::NormalizedGlyph, FontError, Result};

mod decoder;
mod encoder;
pub mod header;

pub use encoder::{EncodeReport, Layout};
pub use header::{FontHeader, IndexEntry, LayoutKind, HEADER_LEN, MAGIC, VERSION};

/// A complete container held in memory.
///
/// Built by [`FontContainer::encode`] or read back by
/// [`FontContainer::from_bytes`]. Entry offsets are absolute file offsets,
/// the blob starts right after the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontContainer {
    pub layout: LayoutKind,
    /// Canvas width (fixed) or widest glyph (variable).
    pub width: u8,
    /// Canvas height (fixed) or tallest glyph (variable).
    pub height: u8,
    pub entries: Vec<IndexEntry>,
    pub blob: Vec<u8>,
}

impl FontContainer {
    pub fn glyph_count(&self) -> usize {
        self.entries.len()
    }

    pub fn blob_start(&self) -> usize {
        HEADER_LEN + self.entries.len() * self.layout.entry_len()
    }

    pub fn file_len(&self) -> usize {
        self.blob_start() + self.blob.len()
    }

    pub fn header(&self) -> FontHeader {
        FontHeader {
            version: VERSION,
            dim_a: self.width,
            dim_b: self.height,
            layout: self.layout,
            glyph_count: self.entries.len() as u32,
            aux: match self.layout {
                LayoutKind::Fixed => HEADER_LEN as u32,
                LayoutKind::Variable => 0,
            },
        }
    }

    /// Binary search over the index, the lookup the firmware performs.
    pub fn find(&self, codepoint: u32) -> Option<&IndexEntry> {
        self.entries
            .binary_search_by_key(&codepoint, |e| e.codepoint)
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Packed bitmap of `entry`, sliced out of the blob.
    pub fn bitmap(&self, entry: &IndexEntry) -> Option<&[u8]> {
        let start = (entry.offset as usize).checked_sub(self.blob_start())?;
        let len = packed_len(entry.width as u32, entry.height as u32);
        self.blob.get(start..start + len)
    }

    pub fn glyph(&self, codepoint: u32) -> Option<NormalizedGlyph> {
        self.find(codepoint).and_then(|entry| self.to_glyph(entry))
    }

    /// All glyphs in index order.
    pub fn glyphs(&self) -> impl Iterator<Item = NormalizedGlyph> + '_ {
        self.entries.iter().filter_map(|entry| self.to_glyph(entry))
    }

    fn to_glyph(&self, entry: &IndexEntry) -> Option<NormalizedGlyph> {
        Some(NormalizedGlyph {
            codepoint: entry.codepoint,
            width: entry.width as u32,
            height: entry.height as u32,
            data: self.bitmap(entry)?.to_vec(),
        })
    }

    /// Writes header, index and blob in one sequential pass.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.header().write(writer)?;
        for entry in &self.entries {
            entry.write(writer, self.layout)?;
        }
        writer.write_all(&self.blob)?;
        Ok(())
    }

    /// The whole container as it would be stored on disk.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(self.file_len());
        self.write(&mut data)?;
        Ok(data)
    }

    /// Stores the container at `path`, creating missing parent directories.
    /// The file is written in a single call once all bytes are assembled.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| FontError::write_file(parent, err.to_string()))?;
        }
        let data = self.to_bytes()?;
        std::fs::write(path, &data).map_err(|err| FontError::write_file(path, err.to_string()))?;
        log::info!("Wrote {} ({} bytes)", path.display(), data.len());
        Ok(())
    }
}
