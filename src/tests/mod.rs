use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::api::{ApiError, CatalogApi};
use crate::catalog::{Catalog, CatalogOptions, FilterOutcome, LoadOutcome, Selection};
use crate::detail::OverlayClick;
use crate::record::fixtures::record;
use crate::record::Record;
use crate::scroll::ScrollMetrics;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Record(u32),
    Category(String),
}

/// In-memory stand-in for the PokeAPI. Every call yields once so other
/// futures on the same task can run while a fetch is "in flight".
#[derive(Default)]
struct FakeApi {
    categories: HashMap<String, Vec<u32>>,
    failing: HashSet<u32>,
    calls: RefCell<Vec<Call>>,
}

impl FakeApi {
    fn with_category(mut self, slug: &str, ids: &[u32]) -> Self {
        self.categories.insert(slug.to_string(), ids.to_vec());
        self
    }

    fn failing(mut self, ids: &[u32]) -> Self {
        self.failing.extend(ids.iter().copied());
        self
    }

    fn record_calls(&self) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Record(id) => Some(*id),
                Call::Category(_) => None,
            })
            .collect()
    }

    fn category_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Category(slug) => Some(slug.clone()),
                Call::Record(_) => None,
            })
            .collect()
    }
}

fn not_found(url: String) -> ApiError {
    ApiError::Status { url, status: 404 }
}

impl CatalogApi for FakeApi {
    async fn fetch_record(&self, id: u32) -> Result<Record, ApiError> {
        self.calls.borrow_mut().push(Call::Record(id));
        tokio::task::yield_now().await;
        if self.failing.contains(&id) {
            return Err(not_found(format!("fake://pokemon/{id}")));
        }
        Ok(record(id, &format!("mon{id}"), &["normal"]))
    }

    async fn fetch_category(&self, slug: &str) -> Result<Vec<u32>, ApiError> {
        self.calls
            .borrow_mut()
            .push(Call::Category(slug.to_string()));
        tokio::task::yield_now().await;
        self.categories
            .get(slug)
            .cloned()
            .ok_or_else(|| not_found(format!("fake://type/{slug}")))
    }
}

fn catalog(api: FakeApi) -> Catalog<FakeApi> {
    Catalog::new(api, CatalogOptions::default())
}

fn bottom() -> ScrollMetrics {
    ScrollMetrics {
        scroll_top: 2000.0,
        scroll_height: 3000.0,
        client_height: 900.0,
    }
}

#[tokio::test]
async fn load_more_appends_a_batch_in_id_order() {
    let c = catalog(FakeApi::default());
    let outcome = c.load_more().await;
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            first: 1,
            last: 20,
            appended: 20,
            skipped: vec![],
        }
    );
    assert_eq!(c.page().container.numbers(), (1..=20).collect::<Vec<_>>());
    assert_eq!(c.cursor(), 21);
    assert!(!c.is_loading());
}

#[tokio::test]
async fn every_card_number_matches_requested_id() {
    let c = catalog(FakeApi::default());
    c.load_more().await;
    c.load_more().await;
    let page = c.page();
    for (card, id) in page.container.cards().iter().zip(1..) {
        assert_eq!(card.number, id);
        assert_eq!(card.record.number, id);
    }
}

#[tokio::test]
async fn failed_records_are_skipped_and_cursor_still_advances() {
    let c = catalog(FakeApi::default().failing(&[3, 7]));
    let outcome = c.load_more().await;
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            first: 1,
            last: 20,
            appended: 18,
            skipped: vec![3, 7],
        }
    );
    assert_eq!(c.cursor(), 21);
    assert!(c.page().container.find(3).is_none());
}

#[tokio::test]
async fn concurrent_load_is_a_noop() {
    let c = catalog(FakeApi::default());
    let (first, second) = tokio::join!(c.load_more(), c.load_more());
    assert!(matches!(first, LoadOutcome::Loaded { appended: 20, .. }));
    assert_eq!(second, LoadOutcome::Busy);
    assert_eq!(c.api().record_calls(), (1..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn loader_stops_past_the_last_id() {
    let c = Catalog::new(
        FakeApi::default(),
        CatalogOptions {
            batch_size: 20,
            max_id: 30,
            ..CatalogOptions::default()
        },
    );
    c.load_more().await;
    let outcome = c.load_more().await;
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            first: 21,
            last: 30,
            appended: 10,
            skipped: vec![],
        }
    );
    assert_eq!(c.load_more().await, LoadOutcome::Exhausted);
    assert_eq!(c.api().record_calls().len(), 30);
    assert_eq!(c.cursor(), 31);
}

#[tokio::test]
async fn default_loader_never_fetches_past_1025() {
    let c = catalog(FakeApi::default());
    while c.load_more().await != LoadOutcome::Exhausted {}
    let calls = c.api().record_calls();
    assert_eq!(calls.len(), 1025);
    assert_eq!(calls.last(), Some(&1025));
    assert_eq!(c.page().container.len(), 1025);
}

#[tokio::test]
async fn selecting_fire_queries_slug_and_appends_in_index_order() {
    let c = catalog(FakeApi::default().with_category("fire", &[4, 5, 6, 37, 38]));
    c.load_more().await;

    let selection = c.select_category("Fire").await;
    assert_eq!(
        selection,
        Selection::Filtered(FilterOutcome::Applied {
            slug: "fire".to_string(),
            appended: 5,
            skipped: vec![],
        })
    );
    assert_eq!(c.api().category_calls(), vec!["fire".to_string()]);
    assert_eq!(c.page().container.numbers(), vec![4, 5, 6, 37, 38]);
    assert_eq!(c.page().sidebar.active(), Some("Fire"));
    assert_eq!(c.active_filter().as_deref(), Some("Fire"));
    assert!(!c.is_loading());
}

#[tokio::test]
async fn reselecting_active_category_restores_incremental_loading() {
    let c = catalog(FakeApi::default().with_category("water", &[7, 8, 9]));
    c.load_more().await;
    c.load_more().await;
    assert_eq!(c.cursor(), 41);

    c.select_category("Water").await;
    let selection = c.select_category("Water").await;

    assert!(matches!(
        selection,
        Selection::Cleared(LoadOutcome::Loaded {
            first: 1,
            last: 20,
            ..
        })
    ));
    assert_eq!(c.active_filter(), None);
    assert_eq!(c.page().sidebar.active(), None);
    assert_eq!(c.page().container.numbers(), (1..=20).collect::<Vec<_>>());
    assert_eq!(c.cursor(), 21);
}

#[tokio::test]
async fn selecting_another_category_replaces_the_filter() {
    let c = catalog(
        FakeApi::default()
            .with_category("fire", &[4, 5])
            .with_category("ice", &[124, 131]),
    );
    c.select_category("Fire").await;
    c.select_category("Ice").await;
    assert_eq!(c.page().container.numbers(), vec![124, 131]);
    assert_eq!(c.active_filter().as_deref(), Some("Ice"));
}

#[tokio::test]
async fn unknown_category_leaves_container_empty() {
    let c = catalog(FakeApi::default());
    c.load_more().await;
    let selection = c.select_category("Shadow").await;
    assert_eq!(
        selection,
        Selection::Filtered(FilterOutcome::IndexFailed {
            slug: "shadow".to_string(),
        })
    );
    assert!(c.page().container.is_empty());
    assert!(!c.is_loading());
}

#[tokio::test]
async fn category_switch_cancels_in_flight_batch() {
    let c = catalog(FakeApi::default().with_category("fire", &[4, 5, 6]));
    let (batch, selection) = tokio::join!(c.load_more(), c.select_category("Fire"));
    assert_eq!(batch, LoadOutcome::Cancelled);
    assert!(matches!(
        selection,
        Selection::Filtered(FilterOutcome::Applied { appended: 3, .. })
    ));
    assert_eq!(c.page().container.numbers(), vec![4, 5, 6]);
    assert!(!c.is_loading());
}

#[tokio::test]
async fn replacing_an_in_flight_category_cancels_it() {
    let c = catalog(
        FakeApi::default()
            .with_category("fire", &[4, 5, 6])
            .with_category("ice", &[124, 131]),
    );
    let (fire, ice) = tokio::join!(c.select_category("Fire"), c.select_category("Ice"));
    assert_eq!(fire, Selection::Filtered(FilterOutcome::Cancelled));
    assert_eq!(
        ice,
        Selection::Filtered(FilterOutcome::Applied {
            slug: "ice".to_string(),
            appended: 2,
            skipped: vec![],
        })
    );
    assert_eq!(c.page().container.numbers(), vec![124, 131]);
    assert_eq!(c.active_filter().as_deref(), Some("Ice"));
    assert!(!c.is_loading());
}

#[tokio::test]
async fn superseded_category_leaves_loading_to_its_replacement() {
    let c = catalog(
        FakeApi::default()
            .with_category("fire", &[4, 5, 6])
            .with_category("ice", &[124, 131, 144, 225]),
    );
    let (fire, ice) = tokio::join!(c.filter_by_category("Fire"), async {
        tokio::task::yield_now().await;
        c.filter_by_category("Ice").await
    });
    assert_eq!(fire, FilterOutcome::Cancelled);
    assert!(matches!(ice, FilterOutcome::Applied { appended: 4, .. }));
    assert_eq!(c.page().container.numbers(), vec![124, 131, 144, 225]);
    assert!(!c.is_loading());
}

#[tokio::test]
async fn scroll_is_suppressed_while_filtered() {
    let c = catalog(FakeApi::default().with_category("bug", &[10, 11]));
    c.select_category("Bug").await;
    assert_eq!(c.on_scroll(bottom()).await, None);
    assert_eq!(c.page().container.numbers(), vec![10, 11]);
}

#[tokio::test]
async fn scroll_near_bottom_loads_next_batch() {
    let c = catalog(FakeApi::default());
    c.load_more().await;
    let far = ScrollMetrics {
        scroll_top: 0.0,
        scroll_height: 6000.0,
        client_height: 900.0,
    };
    assert_eq!(c.on_scroll(far).await, None);
    let outcome = c.on_scroll(bottom()).await;
    assert!(matches!(
        outcome,
        Some(LoadOutcome::Loaded {
            first: 21,
            last: 40,
            ..
        })
    ));
}

#[tokio::test]
async fn search_hides_cards_without_fetching() {
    let c = catalog(FakeApi::default());
    c.load_more().await;
    c.load_more().await;
    let calls_before = c.api().record_calls().len();

    let visible = c.apply_search("25");
    assert_eq!(visible, 1);
    assert_eq!(c.page().search, "25");
    let shown: Vec<u32> = c.page().container.visible().map(|card| card.number).collect();
    assert_eq!(shown, vec![25]);
    assert_eq!(c.api().record_calls().len(), calls_before);

    assert_eq!(c.apply_search("MON1"), 11);
}

#[tokio::test]
async fn cards_loaded_after_a_search_start_visible() {
    let c = catalog(FakeApi::default());
    c.load_more().await;
    c.apply_search("nothing matches");
    c.load_more().await;
    assert_eq!(c.page().container.visible().count(), 20);
}

#[tokio::test]
async fn opening_a_card_renders_its_detail() {
    let c = catalog(FakeApi::default());
    c.load_more().await;
    assert!(c.open_card(12));
    {
        let page = c.page();
        assert!(page.overlay.is_open());
        assert_eq!(page.overlay.content().map(|v| v.number), Some(12));
    }
    assert!(!c.overlay_click(OverlayClick::Content));
    assert!(c.overlay_click(OverlayClick::CloseControl));
    assert!(!c.page().overlay.is_open());
    assert!(!c.open_card(999));
}

#[tokio::test]
async fn show_details_replaces_overlay_content() {
    let c = catalog(FakeApi::default());
    c.show_details(&record(1, "bulbasaur", &["grass"]));
    c.show_details(&record(150, "mewtwo", &["psychic"]));
    let page = c.page();
    assert_eq!(page.overlay.content().map(|v| v.title.as_str()), Some("Mewtwo"));
}
