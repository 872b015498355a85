//! Dataset conversion into the YOLO label format.
//!
//! Three independent tools share this library:
//! - COCO bounding boxes to YOLO boxes ([`coco`])
//! - VIA polygon regions to YOLO polygons ([`via`])
//! - merging sharded VIA region files ([`merge`])

pub mod coco;
pub mod error;
pub mod fsutil;
pub mod merge;
pub mod via;
pub mod yolo;

pub use error::ConvertError;
pub use yolo::{BboxLabel, DatasetDescriptor, PolygonLabel};
