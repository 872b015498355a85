use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use dataset_to_yolo::merge;

/// Merge VIA region files; keys from later files replace earlier ones.
#[derive(Parser)]
#[command(name = "merge-datasets", version)]
struct Args {
    /// Region files, in merge order
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Where to write the merged file
    #[arg(long)]
    dest: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let keys = merge::merge_files(&args.sources, &args.dest)?;
    info!("Merged {} files into {} ({} entries)", args.sources.len(), args.dest.display(), keys);
    Ok(())
}
