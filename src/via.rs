//! VIA polygon regions to YOLO segmentation labels.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use crate::error::ConvertError;
use crate::fsutil::{self, ListedFile};
use crate::yolo::{self, PolygonLabel};

/// A polygon as absolute pixel `(x, y)` pairs.
pub type Polygon = Vec<(f64, f64)>;

/// Polygons keyed by image file name without its extension.
pub type RegionIndex = HashMap<String, Vec<Polygon>>;

#[derive(Debug, Deserialize)]
struct ViaEntry {
    regions: Vec<ViaRegion>,
}

#[derive(Debug, Deserialize)]
struct ViaRegion {
    shape_attributes: ShapeAttributes,
}

#[derive(Debug, Deserialize)]
struct ShapeAttributes {
    all_points_x: Vec<f64>,
    all_points_y: Vec<f64>,
}

impl ShapeAttributes {
    fn into_polygon(self) -> Polygon {
        self.all_points_x.into_iter().zip(self.all_points_y).collect()
    }
}

/// Parses a VIA region file into a [`RegionIndex`].
///
/// Entries are read in file order, so when two file names share a stem the
/// later one wins.
pub fn load_regions(path: &Path) -> Result<RegionIndex> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open region file: {}", path.display()))?;
    let raw: Map<String, Value> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse region file: {}", path.display()))?;
    regions_from_map(raw).with_context(|| format!("Invalid region data in {}", path.display()))
}

fn regions_from_map(raw: Map<String, Value>) -> Result<RegionIndex> {
    let mut index = RegionIndex::new();
    for (file_name, value) in raw {
        let entry: ViaEntry = serde_json::from_value(value)
            .with_context(|| format!("Malformed entry for '{file_name}'"))?;
        let polygons = entry
            .regions
            .into_iter()
            .map(|region| region.shape_attributes.into_polygon())
            .collect();
        index.insert(fsutil::strip_extension(&file_name).to_string(), polygons);
    }
    Ok(index)
}

fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    let size = imagesize::size(path).map_err(|source| ConvertError::ImageDimensions {
        path: path.to_path_buf(),
        source,
    })?;
    let zero = || ConvertError::ZeroImageSize {
        path: path.to_path_buf(),
    };
    let width = u32::try_from(size.width).ok().filter(|w| *w > 0).ok_or_else(zero)?;
    let height = u32::try_from(size.height).ok().filter(|h| *h > 0).ok_or_else(zero)?;
    Ok((width, height))
}

/// Counters reported after a region conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionSummary {
    pub images_copied: usize,
    pub label_files: usize,
    pub polygons: usize,
}

fn write_label_files(
    regions: &RegionIndex,
    images: &[ListedFile],
    labels_dir: &Path,
) -> Result<(usize, usize)> {
    println!("Writing label files...");
    fsutil::create_dir(labels_dir)?;

    let pb = fsutil::progress_bar(images.len(), "Labels");
    let (mut files, mut polygons) = (0, 0);
    for (i, image) in images.iter().enumerate() {
        pb.inc(1);
        let Some(image_polygons) = regions
            .get(fsutil::strip_extension(&image.name))
            .filter(|polygons| !polygons.is_empty())
        else {
            debug!("{} has no regions", image.name);
            continue;
        };

        let (width, height) = image_dimensions(&image.path)?;
        let labels: Vec<PolygonLabel> = image_polygons
            .iter()
            .map(|points| PolygonLabel::from_pixels(points, width, height))
            .collect();
        polygons += yolo::write_label_file(&labels_dir.join(fsutil::label_file_name(i)), &labels)?;
        files += 1;
    }
    pb.finish_and_clear();
    Ok((files, polygons))
}

/// Converts a VIA region file and its image directory into `dest/{images,labels}`.
///
/// `dest` is removed first if it exists.
pub fn convert(img_src: &Path, json_src: &Path, dest: &Path) -> Result<RegionSummary> {
    let images = fsutil::list_files(img_src)?;

    if dest.exists() {
        info!("Removing existing destination {}", dest.display());
        fs::remove_dir_all(dest)
            .with_context(|| format!("Failed to clear destination: {}", dest.display()))?;
    }

    let regions = load_regions(json_src)?;
    let (label_files, polygons) = write_label_files(&regions, &images, &dest.join("labels"))?;
    let images_copied = fsutil::copy_numbered(&images, &dest.join("images"))?;

    Ok(RegionSummary {
        images_copied,
        label_files,
        polygons,
    })
}
