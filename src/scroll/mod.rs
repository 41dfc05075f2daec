use std::time::Duration;

use tokio::time::Instant;

/// Distance from the bottom, in pixels, at which more records are requested.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 800.0;
pub const DEFAULT_SCROLL_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self, threshold: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - threshold
    }
}

/// Lets one scroll event through per window. The first event opens the
/// window and is handled when it closes; events inside the window are dropped.
#[derive(Clone, Debug)]
pub struct ScrollThrottle {
    window: Duration,
    pending: Option<Instant>,
}

impl ScrollThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Returns the deadline to run the handler at, or `None` when a run is
    /// already scheduled.
    pub fn on_event(&mut self, now: Instant) -> Option<Instant> {
        if self.pending.is_some() {
            return None;
        }
        let deadline = now + self.window;
        self.pending = Some(deadline);
        Some(deadline)
    }

    /// Marks the scheduled run as done so the next event opens a new window.
    pub fn fire(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for ScrollThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_DEBOUNCE)
    }
}

/// Terminal stand-in for the browser viewport: cards are laid out in rows
/// of `columns`, each `row_height` pixels tall.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub scroll_top: f64,
    pub client_height: f64,
    pub row_height: f64,
    pub columns: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_top: 0.0,
            client_height: 900.0,
            row_height: 320.0,
            columns: 4,
        }
    }
}

impl Viewport {
    pub fn content_height(&self, cards: usize) -> f64 {
        let columns = self.columns.max(1);
        let rows = cards.div_ceil(columns);
        rows as f64 * self.row_height
    }

    /// Scrolls down one screen, stopping at the end of the content.
    pub fn page_down(&mut self, cards: usize) {
        let max_top = (self.content_height(cards) - self.client_height).max(0.0);
        self.scroll_top = (self.scroll_top + self.client_height).min(max_top);
    }

    pub fn reset(&mut self) {
        self.scroll_top = 0.0;
    }

    pub fn metrics(&self, cards: usize) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_top,
            scroll_height: self.content_height(cards).max(self.client_height),
            client_height: self.client_height,
        }
    }
}
