//! Preload progress tracking

use std::cell::Cell;

use crate::emitter::{Emitter, ListenerId};

/// Snapshot of preload progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completed fraction in `0.0..=1.0`; an empty set counts as done
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Rounded percentage
    pub fn percent(&self) -> u32 {
        (self.ratio() * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Counts asset completions and fires the all-loaded signal exactly once.
pub struct PreloadTracker {
    total: usize,
    completed: Cell<usize>,
    fired: Cell<bool>,
    progress: Emitter<Progress>,
    complete: Emitter<Progress>,
}

impl PreloadTracker {
    /// Track `total` assets
    pub fn register(total: usize) -> Self {
        Self {
            total,
            completed: Cell::new(0),
            fired: Cell::new(false),
            progress: Emitter::new(),
            complete: Emitter::new(),
        }
    }

    /// Called after every recorded completion
    pub fn on_progress(&self, callback: impl Fn(&Progress) + 'static) -> ListenerId {
        self.progress.register(callback)
    }

    /// Called once, when the last asset completes
    pub fn on_complete(&self, callback: impl Fn(&Progress) + 'static) -> ListenerId {
        self.complete.once(callback)
    }

    /// Record one completed asset. Completions beyond the total are ignored.
    pub fn record_completion(&self) -> Progress {
        if self.completed.get() >= self.total {
            tracing::warn!(total = self.total, "completion recorded past total; ignored");
            return self.progress();
        }

        self.completed.set(self.completed.get() + 1);
        let progress = self.progress();
        tracing::debug!(completed = progress.completed, total = progress.total, "asset loaded");

        self.progress.emit(&progress);
        if progress.is_complete() {
            self.fire(progress);
        }
        progress
    }

    /// Fire the completion signal for an empty asset set.
    ///
    /// Returns whether the signal fired.
    pub fn complete_if_empty(&self) -> bool {
        if self.total == 0 && !self.fired.get() {
            self.fire(self.progress());
            return true;
        }
        false
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.completed.get(),
            total: self.total,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.fired.get()
    }

    fn fire(&self, progress: Progress) {
        if self.fired.replace(true) {
            return;
        }
        self.complete.emit(&progress);
    }
}

impl std::fmt::Debug for PreloadTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreloadTracker")
            .field("completed", &self.completed.get())
            .field("total", &self.total)
            .field("fired", &self.fired.get())
            .finish()
    }
}
