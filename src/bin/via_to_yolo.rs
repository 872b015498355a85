use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use dataset_to_yolo::via;

/// Convert VIA polygon regions to YOLO segmentation labels.
///
/// The destination directory is deleted before anything is written.
#[derive(Parser)]
#[command(name = "via-to-yolo", version)]
struct Args {
    /// Directory containing the source images
    #[arg(long = "img_src")]
    img_src: PathBuf,

    /// VIA region JSON keyed by image file name
    #[arg(long = "json_src")]
    json_src: PathBuf,

    /// Output directory (removed and recreated)
    #[arg(long)]
    dest: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let summary = via::convert(&args.img_src, &args.json_src, &args.dest)?;
    info!(
        "{} images copied, {} label files, {} polygons",
        summary.images_copied, summary.label_files, summary.polygons
    );

    println!("Done!");
    Ok(())
}
