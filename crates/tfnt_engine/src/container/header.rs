use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{FontError, Result};

pub const MAGIC: &[u8; 4] = b"TFNT";
pub const VERSION: u8 = 1;
pub const HEADER_LEN: usize = 16;

/// Index layout, stored in the header `flags` byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Every glyph shares the canvas size from the header.
    /// Index entry: u16 codepoint, u32 offset.
    Fixed = 0,
    /// Each glyph carries its own size.
    /// Index entry: u32 codepoint, u32 offset, u8 width, u8 height.
    Variable = 1,
}

impl LayoutKind {
    pub const fn entry_len(self) -> usize {
        match self {
            LayoutKind::Fixed => 6,
            LayoutKind::Variable => 10,
        }
    }

    /// Inclusive codepoint range the index entry can express.
    pub const fn codepoint_range(self) -> (u32, u32) {
        match self {
            LayoutKind::Fixed => (1, u16::MAX as u32),
            LayoutKind::Variable => (0, u32::MAX),
        }
    }
}

impl TryFrom<u8> for LayoutKind {
    type Error = FontError;

    fn try_from(flags: u8) -> Result<Self> {
        match flags {
            0 => Ok(LayoutKind::Fixed),
            1 => Ok(LayoutKind::Variable),
            flags => Err(FontError::UnknownLayout { flags }),
        }
    }
}

/// The 16 byte container header, all integers little endian.
///
/// ```text
/// 0  magic        "TFNT"
/// 4  version      u8 = 1
/// 5  dim_a        u8   fixed: canvas width,  variable: max glyph width
/// 6  dim_b        u8   fixed: canvas height, variable: max glyph height
/// 7  flags        u8   LayoutKind
/// 8  glyph_count  u32
/// 12 aux          u32  fixed: index offset (16), variable: reserved (0)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontHeader {
    pub version: u8,
    pub dim_a: u8,
    pub dim_b: u8,
    pub layout: LayoutKind,
    pub glyph_count: u32,
    pub aux: u32,
}

impl FontHeader {
    pub fn read(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(FontError::Truncated {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        }
        if &data[0..4] != MAGIC {
            return Err(FontError::BadMagic);
        }

        let mut br = &data[4..HEADER_LEN];
        let version = br.read_u8()?;
        if version != VERSION {
            return Err(FontError::UnsupportedVersion { version });
        }
        let dim_a = br.read_u8()?;
        let dim_b = br.read_u8()?;
        let layout = LayoutKind::try_from(br.read_u8()?)?;
        let glyph_count = br.read_u32::<LittleEndian>()?;
        let aux = br.read_u32::<LittleEndian>()?;

        Ok(Self {
            version,
            dim_a,
            dim_b,
            layout,
            glyph_count,
            aux,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u8(self.version)?;
        writer.write_u8(self.dim_a)?;
        writer.write_u8(self.dim_b)?;
        writer.write_u8(self.layout as u8)?;
        writer.write_u32::<LittleEndian>(self.glyph_count)?;
        writer.write_u32::<LittleEndian>(self.aux)
    }
}

/// One index record. `offset` is absolute from the start of the file.
/// `width`/`height` are only stored by the variable layout; for the fixed
/// layout they mirror the header canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub codepoint: u32,
    pub offset: u32,
    pub width: u8,
    pub height: u8,
}

impl IndexEntry {
    pub fn write<W: Write>(&self, writer: &mut W, layout: LayoutKind) -> io::Result<()> {
        match layout {
            LayoutKind::Fixed => {
                writer.write_u16::<LittleEndian>(self.codepoint as u16)?;
                writer.write_u32::<LittleEndian>(self.offset)
            }
            LayoutKind::Variable => {
                writer.write_u32::<LittleEndian>(self.codepoint)?;
                writer.write_u32::<LittleEndian>(self.offset)?;
                writer.write_u8(self.width)?;
                writer.write_u8(self.height)
            }
        }
    }

    /// Reads one entry; fixed layout entries take their size from `canvas`.
    pub fn read<R: Read>(reader: &mut R, layout: LayoutKind, canvas: (u8, u8)) -> io::Result<Self> {
        match layout {
            LayoutKind::Fixed => Ok(Self {
                codepoint: reader.read_u16::<LittleEndian>()? as u32,
                offset: reader.read_u32::<LittleEndian>()?,
                width: canvas.0,
                height: canvas.1,
            }),
            LayoutKind::Variable => Ok(Self {
                codepoint: reader.read_u32::<LittleEndian>()?,
                offset: reader.read_u32::<LittleEndian>()?,
                width: reader.read_u8()?,
                height: reader.read_u8()?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_bytes() {
        let header = FontHeader {
            version: VERSION,
            dim_a: 9,
            dim_b: 12,
            layout: LayoutKind::Fixed,
            glyph_count: 0x0102,
            aux: HEADER_LEN as u32,
        };
        let mut data = Vec::new();
        header.write(&mut data).unwrap();
        assert_eq!(data, b"TFNT\x01\x09\x0c\x00\x02\x01\x00\x00\x10\x00\x00\x00");
        assert_eq!(FontHeader::read(&data).unwrap(), header);
    }

    #[test]
    fn test_header_errors() {
        assert!(matches!(FontHeader::read(b"TFNT"), Err(FontError::Truncated { expected: 16, actual: 4 })));
        assert!(matches!(FontHeader::read(&[0u8; 16]), Err(FontError::BadMagic)));

        let mut data = b"TFNT\x02\x09\x0c\x00\x00\x00\x00\x00\x10\x00\x00\x00".to_vec();
        assert!(matches!(FontHeader::read(&data), Err(FontError::UnsupportedVersion { version: 2 })));
        data[4] = 1;
        data[7] = 5;
        assert!(matches!(FontHeader::read(&data), Err(FontError::UnknownLayout { flags: 5 })));
    }

    #[test]
    fn test_entry_layouts() {
        let entry = IndexEntry {
            codepoint: 0x4E2D,
            offset: 0x28,
            width: 11,
            height: 12,
        };

        let mut fixed = Vec::new();
        entry.write(&mut fixed, LayoutKind::Fixed).unwrap();
        assert_eq!(fixed, vec![0x2D, 0x4E, 0x28, 0, 0, 0]);
        assert_eq!(IndexEntry::read(&mut fixed.as_slice(), LayoutKind::Fixed, (11, 12)).unwrap(), entry);

        let mut variable = Vec::new();
        entry.write(&mut variable, LayoutKind::Variable).unwrap();
        assert_eq!(variable, vec![0x2D, 0x4E, 0, 0, 0x28, 0, 0, 0, 11, 12]);
        assert_eq!(variable.len(), LayoutKind::Variable.entry_len());
    }
}
