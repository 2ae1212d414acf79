mod display;

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::unbounded;
use fphoto_organizer_core::{
    discover_images, run_pipeline, ExifMetadataProvider, OrganizeOptions, PipelineMessage,
};
use std::path::PathBuf;
use std::thread;

#[derive(Debug, Parser)]
#[command(name = "fphoto-organizer")]
#[command(version)]
#[command(about = "撮影日時をもとに写真ファイルを一括整理します")]
struct Cli {
    #[arg(short = 'd', long, help = "リネーム後の写真を移動するフォルダ")]
    dest_dir: Option<PathBuf>,
    #[arg(short = 'n', long, default_value_t = false, help = "実ファイルを変更せずに結果だけ表示する")]
    dry_run: bool,
    #[arg(short = 't', long, default_value_t = false, help = "撮影日ごとのフォルダに分類する")]
    group_by_date: bool,
    #[arg(short = 'e', long, default_value_t = false, help = "拡張子ごとのフォルダに分類する")]
    group_by_ext: bool,
    #[arg(short = 'c', long, default_value_t = false, help = "処理後に空になった元フォルダを削除する")]
    clean: bool,
    #[arg(required = true, value_name = "FILES_OR_DIRS")]
    paths: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let options = OrganizeOptions {
        dest_dir: cli.dest_dir,
        dry_run: cli.dry_run,
        group_by_date: cli.group_by_date,
        group_by_ext: cli.group_by_ext,
        clean: cli.clean,
    };

    let files = discover_images(&cli.paths)?;
    if files.is_empty() {
        anyhow::bail!("画像ファイルが見つかりませんでした");
    }
    let total = files.len();
    log::debug!("{total}件の画像を処理します (dry_run={})", options.dry_run);

    let (sender, receiver) = unbounded::<PipelineMessage>();
    let roots = cli.paths.clone();
    let worker = thread::spawn(move || {
        let provider = ExifMetadataProvider;
        run_pipeline(&files, &roots, &options, &provider, &sender)
    });

    display::run_display(&receiver, total);

    let summary = worker
        .join()
        .map_err(|_| anyhow::anyhow!("処理スレッドが異常終了しました"))??;

    if let Some(report) = summary.combined_report() {
        anyhow::bail!("{report}");
    }
    Ok(())
}
