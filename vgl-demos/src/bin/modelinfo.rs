//! Print statistics about an OBJ or PLY model

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use vgl::io::load_model;
use vgl_demos::{init_logging, ModelStats};

#[derive(Parser, Debug)]
#[command(name = "modelinfo", about = "Print statistics about an OBJ or PLY model")]
struct Args {
    /// Model file to inspect
    model: PathBuf,

    /// Log parser progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut stats = ModelStats::new();
    load_model(&mut stats, &args.model).with_context(|| format!("Failed to load {}", args.model.display()))?;

    println!("Model:     {}", args.model.display());
    println!("{}", stats);
    Ok(())
}
