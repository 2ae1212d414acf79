use crate::photo::{HEIF_EXTENSIONS, RAW_EXTENSIONS};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &[
    "avif", "bmp", "gif", "jpeg", "jpg", "png", "tif", "tiff", "webp",
];

pub fn discover_images(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for root in roots {
        if !root.exists() {
            anyhow::bail!("パスが存在しません: {}", root.display());
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("フォルダ走査に失敗しました: {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if is_image(entry.path()) {
                images.push(entry.path().to_path_buf());
            }
        }
    }

    images.sort();
    images.dedup();
    log::debug!("{}件の画像ファイルを検出しました", images.len());
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_string_lossy().to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
        || RAW_EXTENSIONS.contains(&ext.as_str())
        || HEIF_EXTENSIONS.contains(&ext.as_str())
}
