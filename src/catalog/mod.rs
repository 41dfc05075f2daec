//! The catalog controller: incremental loading, category filtering, local
//! search and the detail overlay, all writing into one [`Page`].
//!
//! Everything runs on a single task. State sits in `RefCell`s and no borrow
//! is held across an `.await`, so an event handler can run while a batch is
//! suspended on the network. A generation counter, bumped on every filter
//! transition, stops stale batches from appending cards or clearing the
//! loading flag of the operation that replaced them.

mod category;

use std::cell::{Ref, RefCell};

use log::{debug, info, warn};

use crate::api::CatalogApi;
use crate::detail::{self, OverlayClick};
use crate::page::{Card, Page};
use crate::record::Record;
use crate::scroll::{ScrollMetrics, DEFAULT_SCROLL_THRESHOLD};
use crate::search;

pub use category::category_slug;

pub const DEFAULT_BATCH_SIZE: u32 = 20;
/// Highest ID in the record space.
pub const MAX_RECORD_ID: u32 = 1025;

#[derive(Clone, Debug)]
pub struct CatalogOptions {
    pub batch_size: u32,
    pub max_id: u32,
    pub scroll_threshold: f64,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_id: MAX_RECORD_ID,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Another load or a category fetch is in flight.
    Busy,
    /// The cursor is past the last ID.
    Exhausted,
    /// A filter transition superseded the batch.
    Cancelled,
    Loaded {
        first: u32,
        last: u32,
        appended: usize,
        skipped: Vec<u32>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterOutcome {
    Applied {
        slug: String,
        appended: usize,
        skipped: Vec<u32>,
    },
    /// The category index could not be fetched; the container stays empty.
    IndexFailed { slug: String },
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Filtered(FilterOutcome),
    /// The active category was selected again and incremental loading resumed.
    Cleared(LoadOutcome),
}

#[derive(Debug)]
struct CatalogState {
    cursor: u32,
    /// Set once the batch ending at `max_id` has run.
    exhausted: bool,
    loading: bool,
    active_filter: Option<String>,
    generation: u64,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            cursor: 1,
            exhausted: false,
            loading: false,
            active_filter: None,
            generation: 0,
        }
    }
}

pub struct Catalog<A> {
    api: A,
    options: CatalogOptions,
    state: RefCell<CatalogState>,
    page: RefCell<Page>,
}

impl<A: CatalogApi> Catalog<A> {
    pub fn new(api: A, options: CatalogOptions) -> Self {
        Self {
            api,
            options,
            state: RefCell::new(CatalogState::default()),
            page: RefCell::new(Page::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn page(&self) -> Ref<'_, Page> {
        self.page.borrow()
    }

    pub fn cursor(&self) -> u32 {
        self.state.borrow().cursor
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn active_filter(&self) -> Option<String> {
        self.state.borrow().active_filter.clone()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.borrow().generation == generation
    }

    /// Fetches the next batch of records and appends a card for each one
    /// that loads. Records that fail are logged and skipped.
    pub async fn load_more(&self) -> LoadOutcome {
        let (generation, first, last) = {
            let mut state = self.state.borrow_mut();
            if state.loading {
                debug!("load requested while another is in flight");
                return LoadOutcome::Busy;
            }
            if state.exhausted || state.cursor > self.options.max_id {
                return LoadOutcome::Exhausted;
            }
            state.loading = true;
            let first = state.cursor;
            let last = first
                .saturating_add(self.options.batch_size.max(1) - 1)
                .min(self.options.max_id);
            (state.generation, first, last)
        };

        info!("loading records {first}..={last}");
        let mut appended = 0;
        let mut skipped = Vec::new();
        for id in first..=last {
            if !self.is_current(generation) {
                return LoadOutcome::Cancelled;
            }
            let fetched = self.api.fetch_record(id).await;
            if !self.is_current(generation) {
                debug!("dropping record {id} from superseded batch");
                return LoadOutcome::Cancelled;
            }
            match fetched {
                Ok(record) => {
                    self.page.borrow_mut().container.append(Card::new(record));
                    appended += 1;
                }
                Err(e) => {
                    warn!("skipping record {id}: {e}");
                    skipped.push(id);
                }
            }
        }

        let mut state = self.state.borrow_mut();
        state.cursor = last.saturating_add(1);
        state.exhausted = last >= self.options.max_id;
        state.loading = false;
        LoadOutcome::Loaded {
            first,
            last,
            appended,
            skipped,
        }
    }

    /// Handles a sidebar click: re-selecting the active category clears the
    /// filter, any other category replaces it.
    pub async fn select_category(&self, label: &str) -> Selection {
        let is_active = self.state.borrow().active_filter.as_deref() == Some(label);
        if is_active {
            Selection::Cleared(self.clear_filter().await)
        } else {
            Selection::Filtered(self.filter_by_category(label).await)
        }
    }

    /// Replaces the grid with every record of `label`'s category, in the
    /// order the category index lists them.
    pub async fn filter_by_category(&self, label: &str) -> FilterOutcome {
        let generation = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.active_filter = Some(label.to_string());
            state.loading = true;
            state.generation
        };
        {
            let mut page = self.page.borrow_mut();
            page.sidebar.set_active(Some(label));
            page.container.clear();
        }

        let slug = category_slug(label);
        info!("filtering by category '{label}' ({slug})");
        let outcome = self.fill_category(generation, slug).await;

        if self.is_current(generation) {
            self.state.borrow_mut().loading = false;
        }
        outcome
    }

    async fn fill_category(&self, generation: u64, slug: String) -> FilterOutcome {
        let ids = match self.api.fetch_category(&slug).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("failed to load category '{slug}': {e}");
                if !self.is_current(generation) {
                    return FilterOutcome::Cancelled;
                }
                return FilterOutcome::IndexFailed { slug };
            }
        };
        debug!("category '{slug}' lists {} records", ids.len());

        let mut appended = 0;
        let mut skipped = Vec::new();
        for id in ids {
            if !self.is_current(generation) {
                return FilterOutcome::Cancelled;
            }
            let fetched = self.api.fetch_record(id).await;
            if !self.is_current(generation) {
                return FilterOutcome::Cancelled;
            }
            match fetched {
                Ok(record) => {
                    self.page.borrow_mut().container.append(Card::new(record));
                    appended += 1;
                }
                Err(e) => {
                    warn!("skipping record {id} in category '{slug}': {e}");
                    skipped.push(id);
                }
            }
        }
        FilterOutcome::Applied {
            slug,
            appended,
            skipped,
        }
    }

    /// Drops the active filter and restarts incremental loading from ID 1.
    pub async fn clear_filter(&self) -> LoadOutcome {
        {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.active_filter = None;
            state.cursor = 1;
            state.exhausted = false;
            state.loading = false;
        }
        {
            let mut page = self.page.borrow_mut();
            page.sidebar.set_active(None);
            page.container.clear();
        }
        info!("category filter cleared");
        self.load_more().await
    }

    /// Shows or hides rendered cards by `term`. Never fetches.
    pub fn apply_search(&self, term: &str) -> usize {
        let mut page = self.page.borrow_mut();
        page.search = term.to_string();
        search::apply(&mut page.container, term)
    }

    pub fn show_details(&self, record: &Record) {
        detail::render(record, &mut self.page.borrow_mut().overlay);
    }

    /// Card click. Returns false when no rendered card has that number.
    pub fn open_card(&self, number: u32) -> bool {
        let mut page = self.page.borrow_mut();
        let record = match page.container.find(number) {
            Some(card) => card.record.clone(),
            None => return false,
        };
        detail::render(&record, &mut page.overlay);
        true
    }

    pub fn overlay_click(&self, click: OverlayClick) -> bool {
        detail::handle_click(&mut self.page.borrow_mut().overlay, click)
    }

    pub fn toggle_sidebar(&self) {
        self.page.borrow_mut().toggle_sidebar();
    }

    /// Scroll handler: loads more when the viewport nears the bottom and no
    /// category filter is active.
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> Option<LoadOutcome> {
        if self.state.borrow().active_filter.is_some() {
            return None;
        }
        if !metrics.near_bottom(self.options.scroll_threshold) {
            return None;
        }
        Some(self.load_more().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::record::fixtures::record;

    struct EchoApi;

    impl CatalogApi for EchoApi {
        async fn fetch_record(&self, id: u32) -> Result<Record, ApiError> {
            Ok(record(id, "mon", &["normal"]))
        }

        async fn fetch_category(&self, _slug: &str) -> Result<Vec<u32>, ApiError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn cursor_at_top_of_id_space_does_not_overflow() {
        let c = Catalog::new(
            EchoApi,
            CatalogOptions {
                max_id: u32::MAX,
                ..CatalogOptions::default()
            },
        );
        c.state.borrow_mut().cursor = u32::MAX - 1;

        let outcome = c.load_more().await;
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                first: u32::MAX - 1,
                last: u32::MAX,
                appended: 2,
                skipped: vec![],
            }
        );
        assert_eq!(c.load_more().await, LoadOutcome::Exhausted);
        assert_eq!(c.page().container.len(), 2);
    }

    #[test]
    fn options_default_to_twenty_per_batch() {
        let options = CatalogOptions::default();
        assert_eq!(options.batch_size, 20);
        assert_eq!(options.max_id, 1025);
    }
}
