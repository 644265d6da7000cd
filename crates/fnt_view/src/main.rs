use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use tfnt_engine::{
    preview::{self, PreviewStyle},
    FontContainer, LayoutKind,
};

#[derive(Parser, Debug)]
#[command(version, about = "Shows the contents of a TFNT glyph atlas", long_about = None)]
pub struct Args {
    #[arg(help = "FNT file to inspect")]
    file: PathBuf,

    #[arg(short, long = "char", value_name = "CHAR", help = "Preview the glyph of a character")]
    character: Option<char>,

    #[arg(long, value_name = "HEX", conflicts_with = "character", value_parser = preview::parse_codepoint, help = "Preview the glyph of a hex codepoint")]
    codepoint: Option<u32>,

    #[arg(short, long, default_value_t = false, help = "List every glyph in the index")]
    list: bool,
}

fn start_logger() -> anyhow::Result<LoggerHandle> {
    Ok(Logger::try_with_env_or_str("warn")?.log_to_stderr().start()?)
}

fn print_summary(container: &FontContainer) {
    let layout = match container.layout {
        LayoutKind::Fixed => "fixed glyph size",
        LayoutKind::Variable => "variable glyph size",
    };
    let size_label = match container.layout {
        LayoutKind::Fixed => "Glyph size",
        LayoutKind::Variable => "Max glyph size",
    };
    println!("Layout: {layout}");
    println!("{size_label}: {}x{}", container.width, container.height);
    println!("Glyphs: {}", container.glyph_count());
    if let (Some(first), Some(last)) = (container.entries.first(), container.entries.last()) {
        println!("Codepoints: U+{:04X} - U+{:04X}", first.codepoint, last.codepoint);
    }
    println!("File size: {} bytes", container.file_len());
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = start_logger()?;

    let container = FontContainer::load(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
    log::debug!(
        "Loaded {} ({:?} layout, {} glyphs)",
        args.file.display(),
        container.layout,
        container.glyph_count()
    );
    print_summary(&container);

    if args.list {
        println!();
        for glyph in container.glyphs() {
            println!("{}", preview::describe(&glyph));
        }
    }

    if let Some(codepoint) = args.codepoint.or(args.character.map(|ch| ch as u32)) {
        let Some(glyph) = container.glyph(codepoint) else {
            bail!("U+{codepoint:04X} is not in {}", args.file.display());
        };
        println!();
        println!("{}", preview::describe(&glyph));
        print!("{}", preview::render(&glyph, PreviewStyle::Framed));
    }
    Ok(())
}
