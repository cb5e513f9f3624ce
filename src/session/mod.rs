//! Per-browser browsing session and its event dispatcher
//!
//! Every user action is a [`SessionEvent`]. [`dispatch`] runs the event to
//! completion against one [`SessionState`]; rendering happens afterwards,
//! over the resulting state.

pub mod store;

use crate::deal_engine::{Category, DealEngine, DealQuery, DealSection, Product, Selection, Store};
use crate::error::ScrapeError;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    StoreChanged(Store),
    CategoryChanged(Category),
    DealSectionChanged(DealSection),
    LoadMoreClicked,
}

/// Filter selection, page counter and accumulated deals for one UI session.
#[derive(Debug, Clone)]
pub struct SessionState {
    selection: Selection,
    current_page: u32,
    products: Vec<Product>,
    warnings: Vec<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            current_page: 1,
            products: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl SessionState {
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Called once the warnings have been rendered; they are shown once.
    pub fn clear_warnings(&mut self) {
        self.warnings.clear();
    }

    /// The request the next load-more will make.
    pub fn next_query(&self) -> DealQuery {
        DealQuery {
            selection: self.selection,
            page: self.current_page,
        }
    }

    pub fn select_store(&mut self, store: Store) {
        self.selection.store = store;
        self.reset_results();
    }

    pub fn select_category(&mut self, category: Category) {
        self.selection.category = category;
        self.reset_results();
    }

    pub fn select_deal_section(&mut self, deal_section: DealSection) {
        self.selection.deal_section = deal_section;
        self.reset_results();
    }

    fn reset_results(&mut self) {
        self.current_page = 1;
        self.products.clear();
        self.warnings.clear();
    }

    /// Fold one scrape result into the session. Only a non-empty page
    /// advances the counter; failures leave the list untouched and queue a
    /// single warning.
    pub fn apply_page(&mut self, result: Result<Vec<Product>, ScrapeError>) {
        self.warnings.clear();
        match result {
            Ok(products) if products.is_empty() => {
                debug!(page = self.current_page, "page had no complete listings");
            }
            Ok(products) => {
                self.products.extend(products);
                self.current_page = self.current_page.saturating_add(1);
            }
            Err(err) => {
                debug!(page = err.page(), "load-more produced a warning");
                self.warnings.push(err.to_string());
            }
        }
    }
}

/// Run one event to completion. Only `LoadMoreClicked` touches the network.
pub async fn dispatch(engine: &DealEngine, state: &mut SessionState, event: SessionEvent) {
    debug!(?event, "dispatching session event");
    match event {
        SessionEvent::StoreChanged(store) => state.select_store(store),
        SessionEvent::CategoryChanged(category) => state.select_category(category),
        SessionEvent::DealSectionChanged(section) => state.select_deal_section(section),
        SessionEvent::LoadMoreClicked => {
            let result = engine.scrape(&state.next_query()).await;
            state.apply_page(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal_engine::testing::{item, page, CannedFetcher};
    use crate::deal_engine::EngineConfig;
    use std::sync::Arc;

    const PAGE_1: &str = "https://dealsheaven.in/store/flipkart?page=1";
    const PAGE_2: &str = "https://dealsheaven.in/store/flipkart?page=2";
    const PAGE_3: &str = "https://dealsheaven.in/store/flipkart?page=3";

    fn engine_with(fetcher: CannedFetcher) -> (DealEngine, Arc<CannedFetcher>) {
        let fetcher = Arc::new(fetcher);
        let engine = DealEngine::with_fetcher(EngineConfig::default(), fetcher.clone());
        (engine, fetcher)
    }

    fn two_pages() -> CannedFetcher {
        CannedFetcher::default()
            .with_body(PAGE_1, page(&[item("Phone", "9,999"), item("Tablet", "19,999")]))
            .with_body(
                PAGE_2,
                page(&[item("Earbuds", "999"), item("Watch", "2,499"), item("Speaker", "1,499")]),
            )
    }

    fn titles(state: &SessionState) -> Vec<&str> {
        state.products().iter().map(|p| p.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_two_load_mores_accumulate_in_order() {
        let (engine, _) = engine_with(two_pages());
        let mut state = SessionState::default();

        dispatch(&engine, &mut state, SessionEvent::LoadMoreClicked).await;
        dispatch(&engine, &mut state, SessionEvent::LoadMoreClicked).await;

        assert_eq!(titles(&state), ["Phone", "Tablet", "Earbuds", "Watch", "Speaker"]);
        assert_eq!(state.current_page(), 3);
        assert!(state.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_store_change_resets() {
        let (engine, fetcher) = engine_with(two_pages());
        let mut state = SessionState::default();

        dispatch(&engine, &mut state, SessionEvent::LoadMoreClicked).await;
        assert_eq!(state.products().len(), 2);

        dispatch(&engine, &mut state, SessionEvent::StoreChanged(Store::Amazon)).await;

        assert!(state.products().is_empty());
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.selection().store, Store::Amazon);
        assert_eq!(fetcher.request_count(), 1);
        assert_eq!(state.next_query().page, 1);
    }

    #[tokio::test]
    async fn test_category_and_section_changes_reset() {
        let (engine, _) = engine_with(two_pages());
        let mut state = SessionState::default();

        dispatch(&engine, &mut state, SessionEvent::LoadMoreClicked).await;
        dispatch(&engine, &mut state, SessionEvent::CategoryChanged(Category::Grocery)).await;
        assert!(state.products().is_empty());
        assert_eq!(state.current_page(), 1);

        let popular = SessionEvent::DealSectionChanged(DealSection::PopularDeals);
        dispatch(&engine, &mut state, popular).await;
        assert_eq!(state.selection().category, Category::Grocery);
        assert_eq!(state.selection().deal_section, DealSection::PopularDeals);
    }

    #[tokio::test]
    async fn test_empty_page_keeps_state_and_warns_once() {
        let fetcher = two_pages().with_body(PAGE_3, "<html><body><p>No deals</p></body></html>");
        let (engine, _) = engine_with(fetcher);
        let mut state = SessionState::default();

        dispatch(&engine, &mut state, SessionEvent::LoadMoreClicked).await;
        dispatch(&engine, &mut state, SessionEvent::LoadMoreClicked).await;
        dispatch(&engine, &mut state, SessionEvent::LoadMoreClicked).await;

        assert_eq!(state.products().len(), 5);
        assert_eq!(state.current_page(), 3);
        assert_eq!(state.warnings(), ["No products found on page 3."]);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_state() {
        let fetcher = CannedFetcher::default().with_status(PAGE_1, 503);
        let (engine, _) = engine_with(fetcher);
        let mut state = SessionState::default();

        dispatch(&engine, &mut state, SessionEvent::LoadMoreClicked).await;

        assert!(state.products().is_empty());
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.warnings(), ["Failed to retrieve page 1. Skipping..."]);
        state.clear_warnings();
        assert!(state.warnings().is_empty());
    }

    #[test]
    fn test_page_counter_stops_at_last_page() {
        let mut state = SessionState::default();
        state.current_page = u32::MAX;
        state.apply_page(Ok(vec![Product {
            title: "Phone".to_string(),
            image: "https://img.example/phone.jpg".to_string(),
            discount: "10% off".to_string(),
            special_price: "999".to_string(),
            link: "https://dealsheaven.in/deal/phone".to_string(),
            category: "Mobiles".to_string(),
        }]));

        assert_eq!(state.current_page(), u32::MAX);
        assert_eq!(state.products().len(), 1);
    }

    #[test]
    fn test_page_of_only_incomplete_items() {
        let mut state = SessionState::default();
        state.apply_page(Ok(Vec::new()));

        assert_eq!(state.current_page(), 1);
        assert!(state.warnings().is_empty());
    }
}
