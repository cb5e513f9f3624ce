//! Listing URL construction for a filter selection

use crate::deal_engine::{Category, DealQuery, DealSection};

/// Lowercase with spaces turned into hyphens. The fixed option labels carry
/// no other characters that would need escaping.
fn slug(label: &str) -> String {
    label.to_lowercase().replace(' ', "-")
}

/// Build the aggregator URL for `query`, relative to `base_url`.
pub fn build_url(base_url: &str, query: &DealQuery) -> String {
    let base = base_url.trim_end_matches('/');
    let selection = &query.selection;
    let page = query.page;

    match (selection.deal_section, selection.category) {
        (DealSection::AllDeals, Category::AllCategories) => {
            format!("{base}/store/{}?page={page}", selection.store.label().to_lowercase())
        }
        (DealSection::AllDeals, category) => {
            format!("{base}/category/{}?page={page}", slug(category.label()))
        }
        (section, Category::AllCategories) => {
            format!("{base}/{}?page={page}", slug(section.label()))
        }
        (section, category) => format!(
            "{base}/{}/{}?page={page}",
            slug(section.label()),
            slug(category.label())
        ),
    }
}
