use crate::photo::Photo;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrganizeError {
    #[error("メタデータ取得に失敗しました: {0}")]
    Metadata(String),
    #[error("リネームに失敗しました: {0}")]
    Rename(String),
    #[error("ディレクトリ削除に失敗しました: {0}")]
    Cleanup(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Ok,
    Failed,
    DryRun,
    Skipped,
}

impl EventStatus {
    pub fn tag(&self) -> &'static str {
        match self {
            EventStatus::Ok => "OK",
            EventStatus::Failed => "FAILED",
            EventStatus::DryRun => "DRY-RUN",
            EventStatus::Skipped => "SKIP",
        }
    }
}

#[derive(Debug, Clone)]
pub enum OutcomeEvent {
    Analyzed {
        photo: Photo,
        elapsed: Duration,
        error: Option<OrganizeError>,
    },
    Renamed {
        photo: Photo,
        dry_run: bool,
        error: Option<OrganizeError>,
    },
    Cleaned {
        dir: PathBuf,
        dry_run: bool,
        empty: bool,
        error: Option<OrganizeError>,
    },
}

impl OutcomeEvent {
    pub fn error(&self) -> Option<&OrganizeError> {
        match self {
            OutcomeEvent::Analyzed { error, .. }
            | OutcomeEvent::Renamed { error, .. }
            | OutcomeEvent::Cleaned { error, .. } => error.as_ref(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            OutcomeEvent::Analyzed { photo, .. } | OutcomeEvent::Renamed { photo, .. } => {
                photo.name.clone()
            }
            OutcomeEvent::Cleaned { dir, .. } => dir.display().to_string(),
        }
    }

    pub fn status(&self) -> EventStatus {
        if self.error().is_some() {
            return EventStatus::Failed;
        }
        match self {
            OutcomeEvent::Analyzed { .. } => EventStatus::Ok,
            OutcomeEvent::Renamed { dry_run, .. } => {
                if *dry_run {
                    EventStatus::DryRun
                } else {
                    EventStatus::Ok
                }
            }
            OutcomeEvent::Cleaned { dry_run, empty, .. } => {
                if *dry_run {
                    EventStatus::DryRun
                } else if *empty {
                    EventStatus::Ok
                } else {
                    EventStatus::Skipped
                }
            }
        }
    }

    pub fn detail(&self) -> String {
        match self {
            OutcomeEvent::Analyzed { elapsed, error, .. } => match error {
                Some(error) => error.to_string(),
                None => format!("Exifデータを取得しました ({:.2}s)", elapsed.as_secs_f64()),
            },
            OutcomeEvent::Renamed {
                photo,
                dry_run,
                error,
            } => match error {
                Some(error) => error.to_string(),
                None => {
                    let renamed = photo
                        .renamed_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "?".to_string());
                    if *dry_run {
                        format!("リネーム予定 -> {renamed}")
                    } else {
                        format!("リネームしました -> {renamed}")
                    }
                }
            },
            OutcomeEvent::Cleaned {
                dry_run,
                empty,
                error,
                ..
            } => match error {
                Some(error) => error.to_string(),
                None => {
                    if *dry_run {
                        "空であれば削除します".to_string()
                    } else if *empty {
                        "空のため削除しました".to_string()
                    } else {
                        "空ではないため削除しません".to_string()
                    }
                }
            },
        }
    }
}

impl fmt::Display for OutcomeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:<7} {}",
            self.label(),
            self.status().tag(),
            self.detail()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{EventStatus, OrganizeError, OutcomeEvent};
    use crate::photo::Photo;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn sample_photo() -> Photo {
        Photo::placeholder(Path::new("/photos/IMG_0001.JPG"))
    }

    #[test]
    fn analyzed_without_error_is_ok() {
        let event = OutcomeEvent::Analyzed {
            photo: sample_photo(),
            elapsed: Duration::from_millis(120),
            error: None,
        };
        assert_eq!(event.status(), EventStatus::Ok);
        assert!(event.error().is_none());
        assert_eq!(event.label(), "IMG_0001.JPG");
        assert!(event.to_string().contains("Exifデータを取得しました"));
    }

    #[test]
    fn error_wins_over_every_other_status() {
        let event = OutcomeEvent::Renamed {
            photo: sample_photo(),
            dry_run: true,
            error: Some(OrganizeError::Rename("permission denied".to_string())),
        };
        assert_eq!(event.status(), EventStatus::Failed);
        assert!(event.to_string().contains("FAILED"));
        assert!(event.to_string().contains("リネームに失敗しました"));
    }

    #[test]
    fn dry_run_rename_shows_planned_path() {
        let mut photo = sample_photo();
        photo.renamed_path = Some(PathBuf::from("/out/2024-01-01_09-00-00.jpg"));
        let event = OutcomeEvent::Renamed {
            photo,
            dry_run: true,
            error: None,
        };
        assert_eq!(event.status(), EventStatus::DryRun);
        assert!(event.detail().contains("/out/2024-01-01_09-00-00.jpg"));
        assert!(event.detail().contains("リネーム予定"));
    }

    #[test]
    fn cleaned_statuses_cover_skip_and_ok() {
        let skipped = OutcomeEvent::Cleaned {
            dir: PathBuf::from("/photos"),
            dry_run: false,
            empty: false,
            error: None,
        };
        assert_eq!(skipped.status(), EventStatus::Skipped);
        assert!(skipped.detail().contains("削除しません"));

        let removed = OutcomeEvent::Cleaned {
            dir: PathBuf::from("/photos"),
            dry_run: false,
            empty: true,
            error: None,
        };
        assert_eq!(removed.status(), EventStatus::Ok);
        assert!(removed.detail().contains("削除しました"));
    }
}
