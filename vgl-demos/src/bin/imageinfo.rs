//! Print the size and pixel format of image files

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use vgl::io::RawImage;
use vgl_demos::init_logging;

#[derive(Parser, Debug)]
#[command(name = "imageinfo", about = "Print the size and pixel format of image files")]
struct Args {
    /// Images to inspect
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Log decoder progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    for path in &args.images {
        let image = RawImage::open(path).with_context(|| format!("Failed to load {}", path.display()))?;
        println!(
            "{}: {}x{} {:?} ({} bytes per pixel)",
            path.display(),
            image.width(),
            image.height(),
            image.format(),
            image.bytes_per_pixel()
        );
    }
    Ok(())
}
