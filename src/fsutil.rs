use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Prefix shared by every renamed image and label file.
pub const OUTPUT_STEM_PREFIX: &str = "img";

/// A directory entry as seen by the converters: its name and full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    pub name: String,
    pub path: PathBuf,
}

impl ListedFile {
    /// Extension of the file name, without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name).extension().and_then(|ext| ext.to_str())
    }
}

/// What happened when an image was copied into the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    SameFile,
}

/// Lists the immediate children of `dir` sorted by file name.
///
/// The position of an entry in this listing is the index used for output
/// naming, so the sort is what keeps image and label numbering reproducible.
fn list_sorted(dir: &Path, keep: fn(&walkdir::DirEntry) -> bool) -> Result<Vec<ListedFile>> {
    let mut listed = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list directory: {}", dir.display()))?;
        if keep(&entry) {
            listed.push(ListedFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path().to_path_buf(),
            });
        }
    }
    Ok(listed)
}

/// Regular files directly inside `dir`, sorted by name.
pub fn list_files(dir: &Path) -> Result<Vec<ListedFile>> {
    list_sorted(dir, |entry| entry.file_type().is_file())
}

/// Subdirectories directly inside `dir`, sorted by name.
pub fn list_subdirs(dir: &Path) -> Result<Vec<ListedFile>> {
    list_sorted(dir, |entry| entry.file_type().is_dir())
}

pub fn is_json(name: &str) -> bool {
    Path::new(name).extension().and_then(|ext| ext.to_str()) == Some("json")
}

/// Drops the last extension from a file name: `a.b.jpg` becomes `a.b`.
pub fn strip_extension(name: &str) -> &str {
    match Path::new(name).extension() {
        Some(ext) => &name[..name.len() - ext.len() - 1],
        None => name,
    }
}

/// `img{index}.{ext}`, or `img{index}` when the source had no extension.
pub fn numbered_file_name(index: usize, ext: Option<&str>) -> String {
    match ext {
        Some(ext) => format!("{OUTPUT_STEM_PREFIX}{index}.{ext}"),
        None => format!("{OUTPUT_STEM_PREFIX}{index}"),
    }
}

pub fn label_file_name(index: usize) -> String {
    numbered_file_name(index, Some("txt"))
}

/// Copies `src` to `dest`, treating a copy onto itself as a notice rather than
/// an error. `fs::copy` would truncate the file in that case.
pub fn copy_file(src: &Path, dest: &Path) -> Result<CopyOutcome> {
    if dest.exists() && fs::canonicalize(src)? == fs::canonicalize(dest)? {
        warn!("Source and destination are the same: {}", src.display());
        return Ok(CopyOutcome::SameFile);
    }

    fs::copy(src, dest)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;
    Ok(CopyOutcome::Copied)
}

/// Copies every image into `images_dir` as `img{i}.{ext}`, `i` being its
/// position in `images`. Returns how many were actually copied.
pub fn copy_numbered(images: &[ListedFile], images_dir: &Path) -> Result<usize> {
    println!("Copying images to destination folder...");
    create_dir(images_dir)?;

    let pb = progress_bar(images.len(), "Copy");
    let mut copied = 0;
    for (i, image) in images.iter().enumerate() {
        let dest = images_dir.join(numbered_file_name(i, image.extension()));
        if copy_file(&image.path, &dest)? == CopyOutcome::Copied {
            copied += 1;
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(copied)
}

pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Create a progress bar with the given length and label
pub fn progress_bar(len: usize, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{label}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}}"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn listing_is_sorted_and_split_by_kind() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.jpg"), b"b").unwrap();
        fs::write(dir.path().join("a.png"), b"a").unwrap();
        fs::write(dir.path().join("c.json"), b"{}").unwrap();
        fs::create_dir(dir.path().join("train")).unwrap();

        let files: Vec<_> = list_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(files, vec!["a.png", "b.jpg", "c.json"]);

        let dirs: Vec<_> = list_subdirs(dir.path())
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(dirs, vec!["train"]);
    }

    #[test]
    fn json_detection_is_extension_based() {
        assert!(is_json("instances.json"));
        assert!(!is_json("instances.JSON"));
        assert!(!is_json("json"));
        assert!(!is_json("photo.jpg"));
    }

    #[test]
    fn strips_only_the_last_extension() {
        assert_eq!(strip_extension("a.b.jpg"), "a.b");
        assert_eq!(strip_extension("photo.png"), "photo");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".hidden"), ".hidden");
    }

    #[test]
    fn numbered_names() {
        assert_eq!(numbered_file_name(3, Some("jpg")), "img3.jpg");
        assert_eq!(numbered_file_name(0, None), "img0");
        assert_eq!(label_file_name(12), "img12.txt");
    }

    #[test]
    fn copy_onto_itself_is_a_notice() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        fs::write(&path, b"pixels").unwrap();

        assert_eq!(copy_file(&path, &path).unwrap(), CopyOutcome::SameFile);
        assert_eq!(fs::read(&path).unwrap(), b"pixels");

        let dest = dir.path().join("img0.jpg");
        assert_eq!(copy_file(&path, &dest).unwrap(), CopyOutcome::Copied);
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
    }

    #[test]
    fn numbered_copy_follows_listing_order() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("b.png"), b"b").unwrap();
        fs::write(src.path().join("a.jpg"), b"a").unwrap();
        fs::write(src.path().join("noext"), b"n").unwrap();
        let images = list_files(src.path()).unwrap();

        let dest = tempdir().unwrap();
        let images_dir = dest.path().join("images");
        assert_eq!(copy_numbered(&images, &images_dir).unwrap(), 3);
        assert_eq!(fs::read(images_dir.join("img0.jpg")).unwrap(), b"a");
        assert_eq!(fs::read(images_dir.join("img1.png")).unwrap(), b"b");
        assert_eq!(fs::read(images_dir.join("img2")).unwrap(), b"n");
    }
}
