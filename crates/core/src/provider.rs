use crate::event::OrganizeError;
use crate::photo::{canonical_extension, source_dir_of, Photo};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone};
use exif::{In, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub trait MetadataProvider: Send + Sync {
    fn analyze(&self, path: &Path) -> Result<Photo, OrganizeError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExifMetadataProvider;

impl MetadataProvider for ExifMetadataProvider {
    fn analyze(&self, path: &Path) -> Result<Photo, OrganizeError> {
        read_capture_metadata(path)
            .map_err(|err| OrganizeError::Metadata(format!("{}: {:#}", path.display(), err)))
    }
}

fn read_capture_metadata(path: &Path) -> Result<Photo> {
    let file = File::open(path)
        .with_context(|| format!("ファイルを開けませんでした: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .with_context(|| format!("Exifを解析できませんでした: {}", path.display()))?;

    let raw_datetime = field_value(
        &exif,
        &[Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime],
    )
    .context("撮影日時タグが見つかりませんでした")?;
    let subsec = field_value(
        &exif,
        &[Tag::SubSecTimeOriginal, Tag::SubSecTimeDigitized, Tag::SubSecTime],
    );
    let created_at = parse_exif_datetime(&raw_datetime, subsec.as_deref())
        .with_context(|| format!("撮影日時を解釈できませんでした: {raw_datetime}"))?;

    let name = path
        .file_name()
        .map(|v| v.to_string_lossy().to_string())
        .context("ファイル名を取得できませんでした")?;

    Ok(Photo {
        name,
        source_path: path.to_path_buf(),
        source_dir: source_dir_of(path),
        extension: canonical_extension(path),
        created_at,
        renamed_path: None,
    })
}

fn field_value(exif: &exif::Exif, tags: &[Tag]) -> Option<String> {
    tags.iter().find_map(|tag| {
        exif.get_field(*tag, In::PRIMARY)
            .map(|field| {
                field
                    .display_value()
                    .to_string()
                    .trim()
                    .trim_matches('"')
                    .to_string()
            })
            .filter(|value| !value.is_empty())
    })
}

fn parse_exif_datetime(raw: &str, subsec: Option<&str>) -> Option<DateTime<Local>> {
    let normalized = raw.trim().trim_matches('"').trim();

    let candidates = [
        "%Y:%m:%d %H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S%:z",
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];

    let mut parsed = None;
    for fmt in candidates {
        if let Ok(dt) = DateTime::parse_from_str(normalized, fmt) {
            parsed = Some(dt.with_timezone(&Local));
            break;
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(normalized, fmt) {
            if let Some(local) = Local.from_local_datetime(&naive).single() {
                parsed = Some(local);
                break;
            }
        }
    }

    let parsed = parsed?;
    let millis = subsec.and_then(subsec_millis).unwrap_or(0);
    parsed.checked_add_signed(Duration::milliseconds(millis))
}

// SubSecTimeOriginalは秒の小数部を表す数字列。ミリ秒精度に丸める。
fn subsec_millis(raw: &str) -> Option<i64> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut padded = digits.to_string();
    padded.truncate(3);
    while padded.len() < 3 {
        padded.push('0');
    }
    padded.parse().ok()
}
