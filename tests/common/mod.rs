#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

pub const COCO_SPLIT: &str = r#"{
    "images": [
        {"id": 10, "file_name": "street.bmp", "width": 40, "height": 20},
        {"id": 11, "file_name": "empty.bmp", "width": 40, "height": 20}
    ],
    "annotations": [
        {"id": 1, "image_id": 10, "category_id": 2, "bbox": [0, 0, 20, 10]},
        {"id": 2, "image_id": 10, "category_id": 2, "bbox": [20, 10, 20, 10]}
    ],
    "categories": [
        {"id": 1, "name": "potholes", "supercategory": "none"},
        {"id": 2, "name": "pothole", "supercategory": "potholes"}
    ]
}"#;

/// `<root>/<split>/` with the COCO file and two images.
pub fn write_coco_split(root: &Path, split: &str) {
    let dir = root.join(split);
    fs::create_dir_all(&dir).expect("create split dir");
    fs::write(dir.join("_annotations.coco.json"), COCO_SPLIT).expect("write coco json");
    write_bmp(&dir.join("street.bmp"), 40, 20);
    write_bmp(&dir.join("empty.bmp"), 40, 20);
}
