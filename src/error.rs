use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions raised while converting a dataset.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("No annotation file (*.json) found in {dir}")]
    MissingAnnotationFile { dir: PathBuf },

    #[error("Image '{file_name}' has no entry in {annotation_file}")]
    MissingImageInfo {
        file_name: String,
        annotation_file: PathBuf,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensions {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image {path} has zero width or height")]
    ZeroImageSize { path: PathBuf },

    #[error("No split directories found in {dir}")]
    NoSplits { dir: PathBuf },

    #[error("Cannot derive a destination directory from {path}")]
    InvalidSourcePath { path: PathBuf },
}
