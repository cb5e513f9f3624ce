//! Listing extraction from the aggregator's HTML

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref CONTAINER: Selector = Selector::parse("div.product-item-detail").unwrap();
    static ref TITLE: Selector = Selector::parse("h3[title]").unwrap();
    static ref IMAGE: Selector = Selector::parse("img[data-src]").unwrap();
    static ref DISCOUNT: Selector = Selector::parse("div.discount").unwrap();
    // The site's class name really is misspelled.
    static ref SPECIAL_PRICE: Selector = Selector::parse("p.spacail-price").unwrap();
    static ref CATEGORY: Selector = Selector::parse("a[title]").unwrap();
    static ref LINK: Selector = Selector::parse("a[href]").unwrap();
}

const COUPON_MARKER: &str = "[Apply coupon]";

/// Fields of one container block. `None` means the element or attribute was
/// not in the markup; an empty string means it was there but blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub title: Option<String>,
    pub image: Option<String>,
    pub discount: Option<String>,
    pub special_price: Option<String>,
    pub category: Option<String>,
    pub link: Option<String>,
}

pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    /// One `RawListing` per container, in document order.
    pub fn extract_listings(&self, content: &str) -> Vec<RawListing> {
        let document = Html::parse_document(content);
        document
            .select(&CONTAINER)
            .map(|item| self.extract_listing(&item))
            .collect()
    }

    fn extract_listing(&self, item: &ElementRef) -> RawListing {
        RawListing {
            title: first_attr(item, &TITLE, "title")
                .map(|title| title.replace(COUPON_MARKER, "").trim().to_string()),
            image: first_attr(item, &IMAGE, "data-src").map(String::from),
            discount: first_text(item, &DISCOUNT),
            special_price: first_text(item, &SPECIAL_PRICE).map(|price| price.replace(',', "")),
            category: first_attr(item, &CATEGORY, "title").map(String::from),
            link: first_attr(item, &LINK, "href").map(String::from),
        }
    }
}

fn first_attr<'a>(item: &ElementRef<'a>, selector: &Selector, attr: &str) -> Option<&'a str> {
    item.select(selector).next()?.value().attr(attr)
}

fn first_text(item: &ElementRef, selector: &Selector) -> Option<String> {
    let element = item.select(selector).next()?;
    Some(element.text().collect::<String>().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(block: &str) -> RawListing {
        let html = format!("<html><body>{block}</body></html>");
        let mut listings = Parser::new().extract_listings(&html);
        assert_eq!(listings.len(), 1);
        listings.remove(0)
    }

    #[test]
    fn test_full_block() {
        let listing = parse_one(
            r#"<div class="product-item-detail">
                <a href="https://dealsheaven.in/store/flipkart/boat-rockerz" title="Electronics">
                    <img src="/lazy.gif" data-src="https://cdn.example/boat.jpg">
                </a>
                <div class="discount"> 67% off </div>
                <h3 title="boAt Rockerz 450 [Apply coupon] ">boAt Rockerz 450</h3>
                <p class="spacail-price">  1,299 </p>
            </div>"#,
        );

        assert_eq!(
            listing,
            RawListing {
                title: Some("boAt Rockerz 450".to_string()),
                image: Some("https://cdn.example/boat.jpg".to_string()),
                discount: Some("67% off".to_string()),
                special_price: Some("1299".to_string()),
                category: Some("Electronics".to_string()),
                link: Some("https://dealsheaven.in/store/flipkart/boat-rockerz".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_nodes_are_none() {
        let listing = parse_one(
            r#"<div class="product-item-detail">
                <h3>No title attribute</h3>
                <img src="/only-src.jpg">
                <span class="discount">not a div</span>
            </div>"#,
        );

        assert_eq!(listing, RawListing::default());
    }

    #[test]
    fn test_category_and_link_from_separate_anchors() {
        let listing = parse_one(
            r#"<div class="product-item-detail">
                <a href="/deal/1">View</a>
                <a title="Grocery">Grocery</a>
            </div>"#,
        );

        assert_eq!(listing.link.as_deref(), Some("/deal/1"));
        assert_eq!(listing.category.as_deref(), Some("Grocery"));
    }

    #[test]
    fn test_blank_values_are_present() {
        let listing = parse_one(
            r#"<div class="product-item-detail">
                <h3 title="[Apply coupon]"></h3>
                <div class="discount"></div>
            </div>"#,
        );

        assert_eq!(listing.title.as_deref(), Some(""));
        assert_eq!(listing.discount.as_deref(), Some(""));
    }

    #[test]
    fn test_containers_in_document_order() {
        let html = r#"<div class="product-item-detail"><h3 title="First"></h3></div>
            <div class="other"><div class="product-item-detail"><h3 title="Second"></h3></div></div>
            <section class="product-item-detail"><h3 title="Not a div"></h3></section>"#;

        let titles: Vec<_> = Parser::new()
            .extract_listings(html)
            .into_iter()
            .map(|l| l.title.unwrap())
            .collect();
        assert_eq!(titles, ["First", "Second"]);
    }
}
