//! BDF (Glyph Bitmap Distribution Format) reader.
//!
//! The scan is a two state machine over the lines of the file:
//! * `ScanningFont` picks up font level properties (`FONT`, `FONTBOUNDINGBOX`,
//!   `FONT_ASCENT`, `FONT_DESCENT`, `CHARS`) until a `STARTCHAR` line,
//! * `ScanningGlyph` collects `ENCODING`, `DWIDTH`, `BBX` and the hex rows
//!   following `BITMAP` until `ENDCHAR`.
//!
//! Reading is best effort. Malformed font properties are ignored, a malformed
//! glyph block is skipped as a whole and reported in
//! [`BdfFont::skipped_blocks`].

use std::path::Path;

use crate::{
    glyph::{BitmapGlyph, BitmapRow},
    metrics::{BoundingBox, FontMetrics},
    FontError, Result,
};

#[derive(Debug, Default)]
pub struct BdfFont {
    pub metrics: FontMetrics,
    /// Glyphs with a non-negative encoding, in file order.
    pub glyphs: Vec<BitmapGlyph>,
    /// Number of `STARTCHAR` blocks seen, including dropped ones.
    pub block_count: usize,
    pub skipped_blocks: Vec<FontError>,
}

enum ScanState {
    ScanningFont,
    ScanningGlyph(GlyphBlock),
}

struct GlyphBlock {
    start_line: usize,
    name: String,
    encoding: Option<i64>,
    device_width: i32,
    bbx: BoundingBox,
    rows: Vec<BitmapRow>,
    in_bitmap: bool,
    error: Option<FontError>,
}

impl GlyphBlock {
    fn new(start_line: usize, name: &str) -> Self {
        Self {
            start_line,
            name: name.to_string(),
            encoding: None,
            device_width: 0,
            bbx: BoundingBox::default(),
            rows: Vec::new(),
            in_bitmap: false,
            error: None,
        }
    }

    fn read_line(&mut self, line: &str, line_no: usize) {
        if self.error.is_some() || line.is_empty() {
            return;
        }
        if let Err(err) = self.parse_line(line, line_no) {
            self.error = Some(err);
        }
    }

    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        if self.in_bitmap {
            let row = parse_hex_row(line).ok_or_else(|| FontError::source_parse(line_no, format!("invalid bitmap row '{line}'")))?;
            self.rows.push(row);
            return Ok(());
        }

        if line == "BITMAP" {
            self.in_bitmap = true;
        } else if let Some(args) = keyword(line, "ENCODING") {
            let [encoding] = parse_numbers::<i64, 1>(args, line_no, "ENCODING")?;
            self.encoding = Some(encoding);
        } else if let Some(args) = keyword(line, "DWIDTH") {
            let [dwidth] = parse_numbers::<i32, 1>(args, line_no, "DWIDTH")?;
            self.device_width = dwidth;
        } else if let Some(args) = keyword(line, "BBX") {
            let [width, height, offset_x, offset_y] = parse_numbers::<i32, 4>(args, line_no, "BBX")?;
            if width < 0 || height < 0 {
                return Err(FontError::source_parse(line_no, format!("negative BBX size {width}x{height}")));
            }
            self.bbx = BoundingBox {
                width: width as u32,
                height: height as u32,
                offset_x,
                offset_y,
            };
        }
        Ok(())
    }
}

impl BdfFont {
    /// Reads a BDF file. The file is decoded as Latin-1, which accepts any
    /// byte sequence.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|err| FontError::open_file(path, err.to_string()))?;
        let text: String = bytes.iter().map(|&b| b as char).collect();
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut font = BdfFont::default();
        let mut state = ScanState::ScanningFont;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            state = match state {
                ScanState::ScanningFont => {
                    if let Some(name) = keyword(line, "STARTCHAR") {
                        ScanState::ScanningGlyph(GlyphBlock::new(line_no, name))
                    } else {
                        font.read_property(line, line_no);
                        ScanState::ScanningFont
                    }
                }
                ScanState::ScanningGlyph(mut block) => {
                    if line == "ENDCHAR" {
                        font.finish_block(block);
                        ScanState::ScanningFont
                    } else {
                        block.read_line(line, line_no);
                        ScanState::ScanningGlyph(block)
                    }
                }
            };
        }

        if let ScanState::ScanningGlyph(block) = state {
            log::warn!("Glyph '{}' starting at line {} has no ENDCHAR", block.name, block.start_line);
            font.finish_block(block);
        }

        if let Some(declared) = font.metrics.declared_chars {
            if declared != font.block_count {
                log::warn!("CHARS declares {declared} glyphs, found {}", font.block_count);
            }
        }
        font
    }

    /// Looks up a glyph by codepoint; the last definition wins.
    pub fn glyph(&self, codepoint: u32) -> Option<&BitmapGlyph> {
        self.glyphs.iter().rev().find(|g| g.codepoint == codepoint)
    }

    fn read_property(&mut self, line: &str, line_no: usize) {
        let parsed = if let Some(args) = keyword(line, "FONTBOUNDINGBOX") {
            parse_numbers::<i32, 4>(args, line_no, "FONTBOUNDINGBOX").map(|[width, height, offset_x, offset_y]| {
                self.metrics.bounding_box = Some(BoundingBox {
                    width: width.max(0) as u32,
                    height: height.max(0) as u32,
                    offset_x,
                    offset_y,
                });
            })
        } else if let Some(args) = keyword(line, "FONT_ASCENT") {
            parse_numbers::<u32, 1>(args, line_no, "FONT_ASCENT").map(|[ascent]| self.metrics.ascent = Some(ascent))
        } else if let Some(args) = keyword(line, "FONT_DESCENT") {
            parse_numbers::<u32, 1>(args, line_no, "FONT_DESCENT").map(|[descent]| self.metrics.descent = Some(descent))
        } else if let Some(args) = keyword(line, "CHARS") {
            parse_numbers::<usize, 1>(args, line_no, "CHARS").map(|[count]| self.metrics.declared_chars = Some(count))
        } else if let Some(name) = keyword(line, "FONT") {
            self.metrics.name = Some(name.to_string());
            Ok(())
        } else {
            Ok(())
        };

        if let Err(err) = parsed {
            log::debug!("Ignoring font property: {err}");
        }
    }

    fn finish_block(&mut self, block: GlyphBlock) {
        self.block_count += 1;
        if let Some(err) = block.error {
            log::warn!("Skipping glyph '{}': {err}", block.name);
            self.skipped_blocks.push(err);
            return;
        }
        let Some(codepoint) = block.encoding.and_then(|e| u32::try_from(e).ok()) else {
            log::debug!("Dropping unencoded glyph '{}' at line {}", block.name, block.start_line);
            return;
        };
        self.glyphs.push(BitmapGlyph {
            codepoint,
            name: block.name,
            device_width: block.device_width,
            width: block.bbx.width,
            height: block.bbx.height,
            offset_x: block.bbx.offset_x,
            offset_y: block.bbx.offset_y,
            rows: block.rows,
        });
    }
}

/// Returns the arguments of `line` if its first token is `name`.
fn keyword<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) if head == name => Some(rest.trim()),
        None if line == name => Some(""),
        _ => None,
    }
}

/// Parses the first `N` whitespace separated numbers of `args`; trailing
/// values are ignored.
fn parse_numbers<T: std::str::FromStr, const N: usize>(args: &str, line_no: usize, what: &str) -> Result<[T; N]> {
    let mut parts = args.split_whitespace();
    let mut values = Vec::with_capacity(N);
    for _ in 0..N {
        let value = parts
            .next()
            .and_then(|part| part.parse::<T>().ok())
            .ok_or_else(|| FontError::source_parse(line_no, format!("{what} expects {N} numbers, got '{args}'")))?;
        values.push(value);
    }
    values
        .try_into()
        .map_err(|_| FontError::source_parse(line_no, format!("{what} expects {N} numbers")))
}

fn parse_hex_row(hex: &str) -> Option<BitmapRow> {
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let padded = if hex.len() % 2 == 1 { format!("0{hex}") } else { hex.to_string() };
    padded
        .as_bytes()
        .chunks(2)
        .map(|pair| std::str::from_utf8(pair).ok().and_then(|s| u8::from_str_radix(s, 16).ok()))
        .collect::<Option<Vec<u8>>>()
        .map(BitmapRow)
}
