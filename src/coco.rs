//! COCO detection annotations to YOLO bounding-box labels.
//!
//! The source root holds one directory per split (`train/`, `valid/`, ...),
//! each with a single COCO JSON file next to its images. The output mirrors
//! that layout under `<root>_yolo/` with `images/` and `labels/` per split and
//! a `data.yaml` at the top.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::fsutil::{self, ListedFile};
use crate::yolo::{self, BboxLabel, DatasetDescriptor};

/// Supercategory value marking placeholder categories that are left out of
/// the descriptor's class list.
pub const PLACEHOLDER_SUPERCATEGORY: &str = "none";

#[derive(Debug, Clone, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocoAnnotation {
    pub image_id: u64,
    pub category_id: i64,
    /// `[x, y, width, height]` in pixels from the top-left corner
    pub bbox: [f64; 4],
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocoCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub supercategory: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocoDataset {
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
    #[serde(default)]
    pub categories: Vec<CocoCategory>,
}

impl CocoDataset {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open annotation file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse COCO annotations: {}", path.display()))
    }

    /// First image record whose `file_name` matches.
    pub fn image_info(&self, file_name: &str) -> Option<&CocoImage> {
        self.images.iter().find(|image| image.file_name == file_name)
    }

    /// Every annotation attached to `image_id`, in file order.
    pub fn annotations_for(&self, image_id: u64) -> Vec<&CocoAnnotation> {
        self.annotations
            .iter()
            .filter(|ann| ann.image_id == image_id)
            .collect()
    }

    /// Names of the categories that are not placeholders, in file order.
    pub fn class_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter(|cat| cat.supercategory.as_deref() != Some(PLACEHOLDER_SUPERCATEGORY))
            .map(|cat| cat.name.clone())
            .collect()
    }
}

/// Counters reported once a split or a whole tree is converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub images_copied: usize,
    pub label_files: usize,
    pub label_lines: usize,
}

impl ConversionSummary {
    fn absorb(&mut self, other: ConversionSummary) {
        self.images_copied += other.images_copied;
        self.label_files += other.label_files;
        self.label_lines += other.label_lines;
    }
}

/// `<parent>/<name>_yolo` for a source root `<parent>/<name>`.
pub fn destination_for(src_root: &Path) -> Result<PathBuf> {
    let canonical = src_root
        .canonicalize()
        .with_context(|| format!("Source directory does not exist: {}", src_root.display()))?;
    let invalid = || ConvertError::InvalidSourcePath {
        path: canonical.clone(),
    };
    let name = canonical.file_name().ok_or_else(invalid)?;
    let parent = canonical.parent().ok_or_else(invalid)?;

    let mut dest_name = name.to_os_string();
    dest_name.push("_yolo");
    Ok(parent.join(dest_name))
}

/// First `.json` file in the split directory, by name.
pub fn find_annotation_file(split_dir: &Path) -> Result<PathBuf> {
    fsutil::list_files(split_dir)?
        .into_iter()
        .find(|file| fsutil::is_json(&file.name))
        .map(|file| file.path)
        .ok_or_else(|| {
            ConvertError::MissingAnnotationFile {
                dir: split_dir.to_path_buf(),
            }
            .into()
        })
}

/// Every non-JSON file in the split directory, in index order.
pub fn list_images(split_dir: &Path) -> Result<Vec<ListedFile>> {
    Ok(fsutil::list_files(split_dir)?
        .into_iter()
        .filter(|file| !fsutil::is_json(&file.name))
        .collect())
}

fn generate_labels(
    dataset: &CocoDataset,
    annotation_file: &Path,
    images: &[ListedFile],
    labels_dir: &Path,
) -> Result<(usize, usize)> {
    println!("Generating labels...");
    fsutil::create_dir(labels_dir)?;

    let pb = fsutil::progress_bar(images.len(), "Labels");
    let (mut files, mut lines) = (0, 0);
    for (i, image) in images.iter().enumerate() {
        let info = dataset
            .image_info(&image.name)
            .ok_or_else(|| ConvertError::MissingImageInfo {
                file_name: image.name.clone(),
                annotation_file: annotation_file.to_path_buf(),
            })?;
        let annotations = dataset.annotations_for(info.id);
        pb.inc(1);
        if annotations.is_empty() {
            debug!("{} has no annotations", image.name);
            continue;
        }
        if info.width == 0 || info.height == 0 {
            return Err(ConvertError::ZeroImageSize {
                path: image.path.clone(),
            }
            .into());
        }

        let labels: Vec<BboxLabel> = annotations
            .iter()
            .map(|ann| BboxLabel::from_coco(ann.category_id, ann.bbox, info.width, info.height))
            .collect();
        lines += yolo::write_label_file(&labels_dir.join(fsutil::label_file_name(i)), &labels)?;
        files += 1;
    }
    pb.finish_and_clear();
    Ok((files, lines))
}

/// Converts one split directory into `dest_split/{images,labels}`.
///
/// Returns the parsed annotations so the caller can build the class list.
pub fn convert_split(src_split: &Path, dest_split: &Path) -> Result<(CocoDataset, ConversionSummary)> {
    let annotation_file = find_annotation_file(src_split)?;
    let dataset = CocoDataset::load(&annotation_file)?;
    let images = list_images(src_split)?;

    let images_copied = fsutil::copy_numbered(&images, &dest_split.join("images"))?;
    let (label_files, label_lines) =
        generate_labels(&dataset, &annotation_file, &images, &dest_split.join("labels"))?;

    Ok((
        dataset,
        ConversionSummary {
            images_copied,
            label_files,
            label_lines,
        },
    ))
}

/// Converts every split under `src_root` and writes `data.yaml`.
///
/// The class list comes from the last split converted, so all splits are
/// expected to share one category table.
pub fn convert_tree(src_root: &Path, train: &str, valid: &str) -> Result<(PathBuf, ConversionSummary)> {
    let src_root = src_root
        .canonicalize()
        .with_context(|| format!("Source directory does not exist: {}", src_root.display()))?;
    let dest_root = destination_for(&src_root)?;

    let mut summary = ConversionSummary::default();
    let mut last_dataset = None;
    for split in fsutil::list_subdirs(&src_root)? {
        println!("--- {} ---", split.name);
        let (dataset, split_summary) = convert_split(&split.path, &dest_root.join(&split.name))?;
        info!(
            "{}: {} images copied, {} label files, {} labels",
            split.name, split_summary.images_copied, split_summary.label_files, split_summary.label_lines
        );
        summary.absorb(split_summary);
        last_dataset = Some(dataset);
        println!();
    }

    let dataset = last_dataset.ok_or_else(|| ConvertError::NoSplits { dir: src_root.clone() })?;

    println!("Creating data file...");
    let descriptor = DatasetDescriptor {
        train: train.to_string(),
        valid: valid.to_string(),
        names: dataset.class_names(),
    };
    fsutil::create_dir(&dest_root)?;
    descriptor.write(&dest_root.join("data.yaml"))?;

    Ok((dest_root, summary))
}
