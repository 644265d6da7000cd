use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use tfnt_engine::{
    pipeline::{convert_outline, OutlineOptions, DEFAULT_OUTLINE_SIZE},
    preview::{self, PreviewStyle},
    sources::{AbGlyphRasterizer, OutlineAdapter, OutlineRasterizer},
    OutlineGlyph,
};

#[derive(Parser, Debug)]
#[command(version, about = "Converts TrueType/OpenType fonts to the TFNT variable glyph size format (exports all glyphs)", long_about = None)]
pub struct Args {
    #[arg(help = "Input TTF/OTF font file")]
    input: PathBuf,

    #[arg(short, long, required_unless_present = "preview", help = "Output FNT file")]
    output: Option<PathBuf>,

    #[arg(short, long, default_value_t = DEFAULT_OUTLINE_SIZE, value_parser = clap::value_parser!(u32).range(1..=255), help = "Font size in pixels")]
    size: u32,

    #[arg(long, value_name = "CHAR", help = "Preview a character and exit")]
    preview: Option<char>,

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

fn preview_char(adapter: &OutlineAdapter<AbGlyphRasterizer>, ch: char, size: u32) -> anyhow::Result<()> {
    let source = OutlineGlyph {
        codepoint: ch as u32,
        requested_size: size,
    };
    let Some(glyph) = adapter.render_glyph(&source) else {
        bail!("Character '{ch}' (U+{:04X}) not available in font", ch as u32);
    };
    println!("Character: {}", preview::describe(&glyph));
    print!("{}", preview::render(&glyph, PreviewStyle::Framed));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = start_logger(args.verbose, args.quiet)?;

    if !args.input.exists() {
        bail!("Font file not found: {}", args.input.display());
    }
    let rasterizer = AbGlyphRasterizer::load(&args.input).with_context(|| format!("Error loading font {}", args.input.display()))?;
    let adapter = OutlineAdapter::new(rasterizer);
    log::info!("Loaded {} ({} codepoints in cmap)", args.input.display(), adapter.rasterizer().codepoints().len());

    if let Some(ch) = args.preview {
        return preview_char(&adapter, ch, args.size);
    }
    let Some(output) = args.output else {
        bail!("No output file given");
    };

    let (container, report) = convert_outline(&adapter, OutlineOptions { size: args.size })
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;
    container.save(&output)?;

    println!("Created: {}", output.display());
    println!("  Glyphs: {}", report.encoded);
    if report.unavailable > 0 || !report.skipped.is_empty() {
        println!("  Skipped: {} without ink, {} too large", report.unavailable, report.skipped.len());
    }
    println!("  Max size: {}x{} pixels", container.width, container.height);
    println!("  File size: {} bytes ({:.1} KB)", report.file_len, report.file_len as f64 / 1024.0);
    Ok(())
}
