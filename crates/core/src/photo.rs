use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub(crate) const RAW_EXTENSIONS: &[&str] =
    &["arw", "cr2", "cr3", "dng", "nef", "orf", "raf", "rw2"];
pub(crate) const HEIF_EXTENSIONS: &[&str] = &["heic", "heif", "hif"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub name: String,
    pub source_path: PathBuf,
    pub source_dir: PathBuf,
    pub extension: String,
    pub created_at: DateTime<Local>,
    pub renamed_path: Option<PathBuf>,
}

impl Photo {
    pub fn placeholder(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string());
        Self {
            name,
            source_path: path.to_path_buf(),
            source_dir: source_dir_of(path),
            extension: canonical_extension(path),
            created_at: Local::now(),
            renamed_path: None,
        }
    }
}

pub(crate) fn source_dir_of(path: &Path) -> PathBuf {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn canonical_extension(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|v| v.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if RAW_EXTENSIONS.contains(&ext.as_str()) {
        return "raw".to_string();
    }
    if HEIF_EXTENSIONS.contains(&ext.as_str()) {
        return "heif".to_string();
    }
    ext
}
