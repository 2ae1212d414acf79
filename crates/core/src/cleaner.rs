use crate::event::{OrganizeError, OutcomeEvent};
use crate::pipeline::PipelineMessage;
use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use std::fs;
use std::path::{Path, PathBuf};

pub fn clean_roots(
    roots: &[PathBuf],
    dry_run: bool,
    sink: &Sender<PipelineMessage>,
) -> Vec<OrganizeError> {
    let mut failures = Vec::new();

    for root in roots {
        if !root.is_dir() {
            continue;
        }

        let empty = match is_empty_dir(root) {
            Ok(empty) => empty,
            Err(err) => {
                let error = OrganizeError::Cleanup(format!("{}: {:#}", root.display(), err));
                failures.push(error.clone());
                send_cleaned(sink, root, dry_run, false, Some(error));
                continue;
            }
        };

        if dry_run {
            send_cleaned(sink, root, true, empty, None);
            continue;
        }

        if !empty {
            send_cleaned(sink, root, false, false, None);
            continue;
        }

        match fs::remove_dir_all(root) {
            Ok(()) => send_cleaned(sink, root, false, true, None),
            Err(err) => {
                let error =
                    OrganizeError::Cleanup(format!("{}: {}", root.display(), err));
                failures.push(error.clone());
                send_cleaned(sink, root, false, true, Some(error));
            }
        }
    }

    failures
}

fn send_cleaned(
    sink: &Sender<PipelineMessage>,
    dir: &Path,
    dry_run: bool,
    empty: bool,
    error: Option<OrganizeError>,
) {
    let _ = sink.send(PipelineMessage::Outcome(OutcomeEvent::Cleaned {
        dir: dir.to_path_buf(),
        dry_run,
        empty,
        error,
    }));
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(path)
        .with_context(|| format!("フォルダを読めませんでした: {}", path.display()))?;
    Ok(entries.next().is_none())
}
