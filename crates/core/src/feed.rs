use crate::event::OutcomeEvent;
use std::time::{Duration, Instant};

pub const MAX_FEED_HEIGHT: usize = 30;

const PROGRESS_LATCH_DELAY: Duration = Duration::from_secs(3);
const PROGRESS_LATCH_MAX_RATIO: f64 = 0.25;
const PROGRESS_ALWAYS_SHOW_TOTAL: usize = 100;

#[derive(Debug)]
pub struct Feed {
    slots: Vec<Option<OutcomeEvent>>,
    errors: Vec<OutcomeEvent>,
    processed: usize,
    total: usize,
    capacity: usize,
    started_at: Instant,
    progress_latch: Option<bool>,
}

impl Feed {
    pub fn new(total: usize, height_budget: usize) -> Self {
        let capacity = total.min(height_budget).min(MAX_FEED_HEIGHT).max(1);
        Self {
            slots: vec![None; capacity],
            errors: Vec::new(),
            processed: 0,
            total,
            capacity,
            started_at: Instant::now(),
            progress_latch: None,
        }
    }

    pub fn push(&mut self, event: OutcomeEvent) {
        if matches!(event, OutcomeEvent::Analyzed { .. }) {
            self.processed += 1;
        }
        if event.error().is_some() {
            self.errors.push(event.clone());
        }
        if self.errors.is_empty() {
            self.replace_first_empty_or_rotate(event);
        } else {
            self.trim_non_error_and_append(event);
        }
    }

    fn replace_first_empty_or_rotate(&mut self, event: OutcomeEvent) {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(event);
            return;
        }
        self.slots.remove(0);
        self.slots.push(Some(event));
    }

    // エラーを含むイベントは残し、空きまたは成功イベントを先頭側から1つだけ落とす。
    // すべてエラーで埋まっている場合のみ最古のものを落とす。
    fn trim_non_error_and_append(&mut self, event: OutcomeEvent) {
        let mut kept = Vec::with_capacity(self.slots.len() + 1);
        let mut dropped = false;
        for slot in self.slots.drain(..) {
            if !dropped && slot.as_ref().map_or(true, |e| e.error().is_none()) {
                dropped = true;
                continue;
            }
            kept.push(slot);
        }
        if kept.len() >= self.capacity {
            let overflow = kept.len() + 1 - self.capacity;
            kept.drain(..overflow);
        }
        kept.push(Some(event));
        self.slots = kept;
    }

    pub fn visible(&self) -> &[Option<OutcomeEvent>] {
        &self.slots
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[OutcomeEvent] {
        &self.errors
    }

    pub fn progress_ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.processed as f64 / self.total as f64
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn should_show_progress(&mut self) -> bool {
        let elapsed = self.started_at.elapsed();
        self.resolve_progress_latch(elapsed)
    }

    fn resolve_progress_latch(&mut self, elapsed: Duration) -> bool {
        if self.progress_latch.is_none() && elapsed > PROGRESS_LATCH_DELAY {
            self.progress_latch = Some(self.progress_ratio() < PROGRESS_LATCH_MAX_RATIO);
        }
        if self.progress_ratio() >= 1.0 {
            return false;
        }
        self.total > PROGRESS_ALWAYS_SHOW_TOTAL || self.progress_latch.unwrap_or(false)
    }
}
