use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use tfnt_engine::{
    pipeline::{bdf_glyph, convert_bdf},
    preview::{self, PreviewStyle},
    sources::BdfFont,
    CanvasOverride,
};

#[derive(Parser, Debug)]
#[command(version, about = "Converts BDF bitmap fonts to the TFNT fixed glyph size format", long_about = None)]
pub struct Args {
    #[arg(help = "Input BDF file")]
    input: PathBuf,

    #[arg(help = "Output FNT file [default: input with .fnt extension]")]
    output: Option<PathBuf>,

    #[arg(short = 'W', long, help = "Target glyph width [default: font bounding box width]")]
    width: Option<u32>,

    #[arg(short = 'H', long, help = "Target glyph height [default: ascent + descent]")]
    height: Option<u32>,

    #[arg(long, value_name = "HEX", value_parser = preview::parse_codepoint, help = "Preview one glyph instead of converting (hex codepoint, e.g. 4E2D)")]
    verify: Option<u32>,

    #[arg(short, long, default_value_t = false, help = "Log every skipped glyph")]
    verbose: bool,

    #[arg(short, long, default_value_t = false, conflicts_with = "verbose", help = "Only log warnings and errors")]
    quiet: bool,
}

fn start_logger(verbose: bool, quiet: bool) -> anyhow::Result<LoggerHandle> {
    let spec = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "warn",
        _ => "info",
    };
    Ok(Logger::try_with_env_or_str(spec)?.log_to_stderr().start()?)
}

fn verify(font: &BdfFont, codepoint: u32, overrides: CanvasOverride) -> anyhow::Result<()> {
    let (Some(source), Some(glyph)) = (font.glyph(codepoint), bdf_glyph(font, codepoint, overrides)?) else {
        bail!("Glyph U+{codepoint:04X} not found");
    };

    println!("Glyph U+{codepoint:04X} ({}):", source.name);
    println!("  BBX: {}x{} at ({}, {})", source.width, source.height, source.offset_x, source.offset_y);
    println!("  DWIDTH: {}", source.device_width);
    println!("  Bitmap rows: {}", source.rows.len());
    println!();
    println!("Rendered ({}x{}):", glyph.width, glyph.height);
    print!("{}", preview::render(&glyph, PreviewStyle::Blocks));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = start_logger(args.verbose, args.quiet)?;

    if !args.input.exists() {
        bail!("Font file not found: {}", args.input.display());
    }
    let font = BdfFont::load(&args.input).with_context(|| format!("Failed to read {}", args.input.display()))?;
    log::info!(
        "Loaded {} ({} glyphs, {} skipped)",
        args.input.display(),
        font.glyphs.len(),
        font.skipped_blocks.len()
    );

    let overrides = CanvasOverride {
        width: args.width,
        height: args.height,
    };

    if let Some(codepoint) = args.verify {
        return verify(&font, codepoint, overrides);
    }

    let output = args.output.clone().unwrap_or_else(|| args.input.with_extension("fnt"));
    let (container, report) = convert_bdf(&font, overrides).with_context(|| format!("Failed to convert {}", args.input.display()))?;
    container.save(&output)?;

    println!("Created: {}", output.display());
    println!("  Glyphs: {}", report.encoded);
    if !report.skipped.is_empty() {
        println!("  Skipped: {} (codepoint outside 1-65535)", report.skipped.len());
    }
    println!("  Size: {}x{}", container.width, container.height);
    println!("  Bytes per glyph: {}", report.blob_len / report.encoded.max(1));
    println!("  File size: {} bytes ({:.1} KB)", report.file_len, report.file_len as f64 / 1024.0);
    Ok(())
}
