use anyhow::{Context, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Class index written on every polygon line; the region format is single-class.
pub const POLYGON_CLASS_ID: u32 = 0;

/// One YOLO detection line: `class x_center y_center width height`.
#[derive(Debug, Clone, PartialEq)]
pub struct BboxLabel {
    pub class_id: i64,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl BboxLabel {
    /// Builds a label from a COCO `[x, y, w, h]` pixel box.
    ///
    /// The class index is `category_id - 1` with no compaction: categories
    /// dropped from the descriptor's `names` list still occupy their slot.
    pub fn from_coco(category_id: i64, bbox: [f64; 4], img_width: u32, img_height: u32) -> Self {
        let [x, y, w, h] = bbox;
        let img_w = f64::from(img_width);
        let img_h = f64::from(img_height);

        BboxLabel {
            class_id: category_id - 1,
            x_center: (x + (x + w)) / 2.0 / img_w,
            y_center: (y + (y + h)) / 2.0 / img_h,
            width: w / img_w,
            height: h / img_h,
        }
    }
}

impl fmt::Display for BboxLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// One YOLO segmentation line: `0 x1 y1 ... xn yn`, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonLabel {
    pub points: Vec<(f64, f64)>,
}

impl PolygonLabel {
    pub fn from_pixels(points: &[(f64, f64)], img_width: u32, img_height: u32) -> Self {
        let img_w = f64::from(img_width);
        let img_h = f64::from(img_height);
        PolygonLabel {
            points: points.iter().map(|&(x, y)| (x / img_w, y / img_h)).collect(),
        }
    }
}

impl fmt::Display for PolygonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{POLYGON_CLASS_ID}")?;
        for (x, y) in &self.points {
            write!(f, " {x:.6} {y:.6}")?;
        }
        Ok(())
    }
}

/// Writes one line per label to `path`, replacing any previous contents.
///
/// Returns the number of lines written.
pub fn write_label_file<L: fmt::Display>(path: &Path, labels: &[L]) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create label file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for label in labels {
        writeln!(writer, "{label}")
            .with_context(|| format!("Failed to write label file: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write label file: {}", path.display()))?;
    Ok(labels.len())
}

/// The `data.yaml` document consumed by YOLO trainers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    pub train: String,
    pub valid: String,
    pub names: Vec<String>,
}

impl DatasetDescriptor {
    pub fn nc(&self) -> usize {
        self.names.len()
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_string())
            .with_context(|| format!("Failed to write data file: {}", path.display()))
    }
}

impl fmt::Display for DatasetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .names
            .iter()
            .map(|name| format!("'{}'", name.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "train: {}", self.train)?;
        writeln!(f, "valid: {}", self.valid)?;
        writeln!(f, "nc: {}", self.nc())?;
        writeln!(f, "names: [{names}]")
    }
}
