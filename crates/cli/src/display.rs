use anstyle::{AnsiColor, Color, Style};
use crossbeam_channel::Receiver;
use fphoto_organizer_core::{EventStatus, Feed, OutcomeEvent, PipelineMessage};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(100);
const DOT_RULE_WIDTH: usize = 30;
// ヘッダー・進捗バー・余白ぶんを端末高さから差し引く
const HEIGHT_MARGIN: usize = 9;
const FALLBACK_TERM_HEIGHT: usize = 24;

const OK_STYLE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
const FAILED_STYLE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
const SKIP_STYLE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
const DIM_STYLE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack)));

pub fn run_display(receiver: &Receiver<PipelineMessage>, total: usize) -> Feed {
    let mut feed = Feed::new(total, height_budget());

    let progress = MultiProgress::new();
    let header = progress.add(ProgressBar::new_spinner());
    header.set_style(spinner_style());
    header.enable_steady_tick(SPINNER_TICK);
    header.set_message(format!("写真を処理しています... (0/{total})"));

    let lines: Vec<ProgressBar> = (0..feed.capacity())
        .map(|_| {
            let line = progress.add(ProgressBar::new(1));
            line.set_style(line_style());
            line.set_message(dot_rule());
            line
        })
        .collect();

    let mut bar: Option<ProgressBar> = None;

    for message in receiver.iter() {
        match message {
            PipelineMessage::Outcome(event) => {
                feed.push(event);
                header.set_message(format!(
                    "写真を処理しています... ({}/{})",
                    feed.processed(),
                    feed.total()
                ));
                redraw_lines(&lines, &feed);
                if bar.is_none() && feed.should_show_progress() {
                    let attached = progress.add(ProgressBar::new(feed.total() as u64));
                    attached.set_style(bar_style());
                    bar = Some(attached);
                }
                if let Some(bar) = &bar {
                    bar.set_position(feed.processed() as u64);
                }
            }
            PipelineMessage::Finished => break,
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    for line in &lines {
        line.finish_and_clear();
    }
    header.finish_and_clear();
    let _ = progress.clear();

    print_summary(&feed);
    feed
}

fn redraw_lines(lines: &[ProgressBar], feed: &Feed) {
    for (index, line) in lines.iter().enumerate() {
        match feed.visible().get(index).and_then(|slot| slot.as_ref()) {
            Some(event) => line.set_message(render_line(event)),
            None => line.set_message(dot_rule()),
        }
    }
}

fn render_line(event: &OutcomeEvent) -> String {
    let style = status_style(event.status());
    format!(
        "{}: {}{:<7}{} {}",
        event.label(),
        style.render(),
        event.status().tag(),
        style.render_reset(),
        event.detail()
    )
}

fn status_style(status: EventStatus) -> Style {
    match status {
        EventStatus::Ok => OK_STYLE,
        EventStatus::Failed => FAILED_STYLE,
        EventStatus::Skipped => SKIP_STYLE,
        EventStatus::DryRun => DIM_STYLE,
    }
}

fn dot_rule() -> String {
    format!(
        "{}{}{}",
        DIM_STYLE.render(),
        ".".repeat(DOT_RULE_WIDTH),
        DIM_STYLE.render_reset()
    )
}

fn print_summary(feed: &Feed) {
    println!(
        "整理が完了しました: {:.2}s (処理 {}件 / エラー {}件 / 全{}件)",
        feed.elapsed().as_secs_f64(),
        feed.processed(),
        feed.error_count(),
        feed.total()
    );
}

fn height_budget() -> usize {
    let term_height = std::env::var("LINES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(FALLBACK_TERM_HEIGHT);
    term_height.saturating_sub(HEIGHT_MARGIN).max(1)
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn line_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{bar:40} {percent:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
