use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use dataset_to_yolo::coco;

#[derive(Parser)]
#[command(name = "coco-to-yolo", version)]
#[command(about = "Convert a tree of COCO annotated splits to YOLO format")]
struct Args {
    /// Directory with one subdirectory per split, each holding a COCO JSON file and its images
    #[arg(long)]
    src: PathBuf,

    /// Training images path, written verbatim into data.yaml
    #[arg(long)]
    train: String,

    /// Validation images path, written verbatim into data.yaml
    #[arg(long)]
    val: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !args.src.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", args.src.display());
    }

    let (dest, summary) = coco::convert_tree(&args.src, &args.train, &args.val)?;
    info!(
        "Output written to {} ({} images, {} label files, {} labels)",
        dest.display(),
        summary.images_copied,
        summary.label_files,
        summary.label_lines
    );

    println!("Done!");
    Ok(())
}
