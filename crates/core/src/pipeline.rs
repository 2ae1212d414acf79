use crate::cleaner::clean_roots;
use crate::event::{OrganizeError, OutcomeEvent};
use crate::naming::{destination_path, DestinationRegistry};
use crate::options::OrganizeOptions;
use crate::photo::Photo;
use crate::provider::MetadataProvider;
use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum PipelineMessage {
    Outcome(OutcomeEvent),
    Finished,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub total: usize,
    pub failures: Vec<OrganizeError>,
}

impl RunSummary {
    pub fn combined_report(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let mut lines = vec![format!("{}件のエラーが発生しました:", self.failures.len())];
        for failure in &self.failures {
            lines.push(format!("  - {failure}"));
        }
        Some(lines.join("\n"))
    }
}

pub fn run_pipeline(
    files: &[PathBuf],
    roots: &[PathBuf],
    options: &OrganizeOptions,
    provider: &dyn MetadataProvider,
    sink: &Sender<PipelineMessage>,
) -> Result<RunSummary> {
    if files.is_empty() {
        anyhow::bail!("処理対象の画像ファイルがありません");
    }

    let registry = DestinationRegistry::new();
    let failures = Mutex::new(Vec::<OrganizeError>::new());

    files.par_iter().for_each(|path| {
        process_file(path, options, provider, &registry, &failures, sink);
    });

    if options.clean {
        let mut cleanup_failures = clean_roots(roots, options.dry_run, sink);
        failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .append(&mut cleanup_failures);
    }

    let _ = sink.send(PipelineMessage::Finished);

    let failures = failures.into_inner().unwrap_or_else(PoisonError::into_inner);
    Ok(RunSummary {
        total: files.len(),
        failures,
    })
}

fn process_file(
    path: &Path,
    options: &OrganizeOptions,
    provider: &dyn MetadataProvider,
    registry: &DestinationRegistry,
    failures: &Mutex<Vec<OrganizeError>>,
    sink: &Sender<PipelineMessage>,
) {
    let started = Instant::now();

    let mut photo = match provider.analyze(path) {
        Ok(photo) => {
            send_outcome(
                sink,
                OutcomeEvent::Analyzed {
                    photo: photo.clone(),
                    elapsed: started.elapsed(),
                    error: None,
                },
            );
            photo
        }
        Err(error) => {
            log::warn!("解析に失敗しました: {}: {}", path.display(), error);
            send_outcome(
                sink,
                OutcomeEvent::Analyzed {
                    photo: Photo::placeholder(path),
                    elapsed: started.elapsed(),
                    error: Some(error),
                },
            );
            return;
        }
    };

    let preferred = destination_path(&photo, options);
    let destination = registry.reserve(preferred, &photo.source_path);
    photo.renamed_path = Some(destination.clone());

    if options.dry_run {
        send_outcome(
            sink,
            OutcomeEvent::Renamed {
                photo,
                dry_run: true,
                error: None,
            },
        );
        return;
    }

    match move_photo(&photo.source_path, &destination) {
        Ok(()) => send_outcome(
            sink,
            OutcomeEvent::Renamed {
                photo,
                dry_run: false,
                error: None,
            },
        ),
        Err(err) => {
            let error =
                OrganizeError::Rename(format!("{}: {:#}", photo.source_path.display(), err));
            failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(error.clone());
            send_outcome(
                sink,
                OutcomeEvent::Renamed {
                    photo,
                    dry_run: false,
                    error: Some(error),
                },
            );
        }
    }
}

fn move_photo(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        // 複数タスクが同じフォルダを同時に作ってもcreate_dir_allは既存扱いで成功する
        fs::create_dir_all(parent).with_context(|| {
            format!("移動先フォルダを作成できませんでした: {}", parent.display())
        })?;
    }
    fs::rename(source, destination).with_context(|| {
        format!(
            "移動できませんでした: {} -> {}",
            source.display(),
            destination.display()
        )
    })?;
    Ok(())
}

fn send_outcome(sink: &Sender<PipelineMessage>, event: OutcomeEvent) {
    let _ = sink.send(PipelineMessage::Outcome(event));
}
