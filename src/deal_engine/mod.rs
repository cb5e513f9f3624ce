//! Deal scraping engine
//!
//! Builds the listing URL for a filter selection, fetches it, extracts the
//! product blocks from the markup and keeps the complete ones.

pub mod parser;
pub mod fetcher;
pub mod url_builder;
pub mod validator;

use crate::error::{ScrapeError, SelectionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://dealsheaven.in";

/// A complete deal listing. Every required field was present in the markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub image: String,
    pub discount: String,
    pub special_price: String,
    pub category: String,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Store {
    #[default]
    Flipkart,
    Amazon,
    Paytm,
    Foodpanda,
    Freecharge,
    Paytmmall,
}

impl Store {
    pub const ALL: [Store; 6] = [
        Store::Flipkart,
        Store::Amazon,
        Store::Paytm,
        Store::Foodpanda,
        Store::Freecharge,
        Store::Paytmmall,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Store::Flipkart => "Flipkart",
            Store::Amazon => "Amazon",
            Store::Paytm => "Paytm",
            Store::Foodpanda => "Foodpanda",
            Store::Freecharge => "Freecharge",
            Store::Paytmmall => "Paytmmall",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    AllCategories,
    BeautyAndPersonalCare,
    Electronics,
    Grocery,
    Recharge,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::AllCategories,
        Category::BeautyAndPersonalCare,
        Category::Electronics,
        Category::Grocery,
        Category::Recharge,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::AllCategories => "All Categories",
            Category::BeautyAndPersonalCare => "Beauty and Personal Care",
            Category::Electronics => "Electronics",
            Category::Grocery => "Grocery",
            Category::Recharge => "Recharge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DealSection {
    #[default]
    AllDeals,
    HotDealsOnline,
    PopularDeals,
}

impl DealSection {
    pub const ALL: [DealSection; 3] = [
        DealSection::AllDeals,
        DealSection::HotDealsOnline,
        DealSection::PopularDeals,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DealSection::AllDeals => "All Deals",
            DealSection::HotDealsOnline => "Hot Deals Online",
            DealSection::PopularDeals => "Popular Deals",
        }
    }
}

macro_rules! label_parsing {
    ($ty:ty, $dimension:literal) => {
        impl FromStr for $ty {
            type Err = SelectionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label() == s)
                    .ok_or_else(|| SelectionError {
                        dimension: $dimension,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

label_parsing!(Store, "store");
label_parsing!(Category, "category");
label_parsing!(DealSection, "deal section");

/// The three filter dimensions, as currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub store: Store,
    pub category: Category,
    pub deal_section: DealSection,
}

/// One scrape request: a selection plus the page to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealQuery {
    pub selection: Selection,
    pub page: u32,
}

/// Configuration for the deal engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

/// Main deal scraping engine
pub struct DealEngine {
    config: EngineConfig,
    fetcher: Arc<dyn fetcher::PageFetcher>,
    parser: parser::Parser,
    validator: validator::Validator,
}

impl DealEngine {
    /// Engine backed by a real HTTP client.
    pub fn new(config: EngineConfig) -> Result<Self, reqwest::Error> {
        let fetcher = fetcher::HttpFetcher::new(config.request_timeout)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn fetcher::PageFetcher>) -> Self {
        Self {
            config,
            fetcher,
            parser: parser::Parser::new(),
            validator: validator::Validator::new(),
        }
    }

    /// Fetch one listing page and return its complete products in document
    /// order. Exactly one request is made; failures are not retried.
    pub async fn scrape(&self, query: &DealQuery) -> Result<Vec<Product>, ScrapeError> {
        let url = url_builder::build_url(&self.config.base_url, query);
        debug!(%url, "fetching deals page");

        let body = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| ScrapeError::from_fetch(query.page, e))
            .inspect_err(|e| warn!(%url, error = ?e, "deal page fetch failed"))?;

        let listings = self.parser.extract_listings(&body);
        if listings.is_empty() {
            warn!(%url, "no product containers on page");
            return Err(ScrapeError::NoResults { page: query.page });
        }

        let found = listings.len();
        let products: Vec<Product> = listings
            .into_iter()
            .filter_map(|listing| match self.validator.complete(listing) {
                Ok(product) => Some(product),
                Err(incomplete) => {
                    debug!(missing = %incomplete, "skipping incomplete listing");
                    None
                }
            })
            .collect();

        info!(%url, found, kept = products.len(), "scraped deals page");
        Ok(products)
    }
}
