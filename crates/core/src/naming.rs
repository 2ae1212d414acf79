use crate::options::OrganizeOptions;
use crate::photo::Photo;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

const DATE_DIR_FORMAT: &str = "%Y-%m-%d";
const FILE_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub fn destination_path(photo: &Photo, options: &OrganizeOptions) -> PathBuf {
    let grouping = options.group_by_date || options.group_by_ext;
    let mut dest = match &options.dest_dir {
        Some(dir) => dir.clone(),
        None if grouping => photo
            .source_dir
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| photo.source_dir.clone()),
        None => photo.source_dir.clone(),
    };

    if options.group_by_date {
        dest.push(photo.created_at.format(DATE_DIR_FORMAT).to_string());
    }
    if options.group_by_ext {
        dest.push(&photo.extension);
    }

    dest.join(format!(
        "{}.{}",
        photo.created_at.format(FILE_NAME_FORMAT),
        photo.extension
    ))
}

// 同一秒・同一拡張子の衝突は連番サフィックスで回避する。予約済みパスと
// ディスク上の既存ファイルの両方を空きとみなさない。
#[derive(Debug, Default)]
pub struct DestinationRegistry {
    reserved: Mutex<HashSet<PathBuf>>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&self, preferred: PathBuf, source_path: &Path) -> PathBuf {
        let mut reserved = self
            .reserved
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if is_available(&preferred, source_path, &reserved) {
            reserved.insert(preferred.clone());
            return preferred;
        }

        let mut n = 1usize;
        loop {
            let candidate = indexed_candidate(&preferred, n);
            if is_available(&candidate, source_path, &reserved) {
                reserved.insert(candidate.clone());
                return candidate;
            }
            n += 1;
        }
    }
}

fn indexed_candidate(preferred: &Path, index: usize) -> PathBuf {
    let stem = preferred
        .file_stem()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| "untitled".to_string());
    let mut name = format!("{}-{:03}", stem, index);
    if let Some(ext) = preferred.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    preferred.with_file_name(name)
}

fn is_available(candidate: &Path, source_path: &Path, reserved: &HashSet<PathBuf>) -> bool {
    if reserved.contains(candidate) {
        return false;
    }
    if candidate == source_path {
        return true;
    }
    !candidate.exists()
}
