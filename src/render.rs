//! HTML rendering of a session page

use crate::deal_engine::{Category, DealSection, Product, Selection, Store};
use crate::session::SessionState;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

pub const CARDS_PER_ROW: usize = 4;

const EMPTY_PROMPT: &str = "No deals loaded. Click 'Load More Deals' to fetch deals.";

const STYLES: &str = r#"
body { font-family: sans-serif; margin: 0 auto; max-width: 1100px; padding: 0 16px 40px;
    background: #fafafa; }
.black-strip { background-color: black; color: white; padding: 20px; width: 100%;
    text-align: center; font-size: 35px; font-weight: bold; border-radius: 2px;
    box-sizing: border-box; }
.filters { display: flex; gap: 16px; margin: 20px 0; flex-wrap: wrap; }
.filters label { display: flex; flex-direction: column; font-size: 14px; gap: 4px; }
.warning { background: #fff4e5; border-left: 4px solid #ff9800; padding: 10px 14px;
    margin: 10px 0; }
.info { background: #e8f1fb; border-left: 4px solid #2196f3; padding: 10px 14px;
    margin: 10px 0; }
.deal-row { display: grid; grid-template-columns: repeat(4, 1fr); gap: 10px; }
.product-card { border-radius: 10px; padding: 15px; margin: 10px;
    box-shadow: 0 0 10px rgba(0,0,0,0.1); overflow: hidden; position: relative;
    display: flex; flex-direction: column; background-color: white; cursor: pointer;
    text-decoration: none; color: inherit; height: auto; min-height: 260px; }
.product-card:hover, .product-card:focus { box-shadow: 0 4px 15px rgba(0, 0, 0, 0.2); }
.product-image { width: 100%; aspect-ratio: 1 / 1; object-fit: contain; border-radius: 10px;
    margin-bottom: 10px; }
.product-title { font-weight: bold; font-size: 14px; color: black; display: -webkit-box;
    -webkit-line-clamp: 2; -webkit-box-orient: vertical; overflow: hidden; height: 40px;
    transition: all 0.3s ease; }
.product-card:hover .product-title, .product-card:focus .product-title {
    -webkit-line-clamp: unset; overflow-y: auto; height: auto; max-height: 120px; }
.product-details { font-size: 12px; color: gray; overflow: hidden; }
.load-more-btn { text-align: center; margin-top: 20px; }
.next-page { font-size: 12px; color: gray; }
"#;

/// Full page for one session, including the notices raised by the action
/// that led here.
pub fn render_page(state: &SessionState) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>DealScraper</title>\n");
    let _ = write!(html, "<style>{STYLES}</style>\n</head>\n<body>\n");
    html.push_str("<div class=\"black-strip\"> Find the best deals online </div>\n");

    html.push_str(&render_filters(state.selection()));

    for warning in state.warnings() {
        let _ = writeln!(html, "<div class=\"warning\" role=\"alert\">{}</div>", text(warning));
    }

    html.push_str("<h3>Filtered Deals</h3>\n");
    html.push_str(&render_grid(state.products()));

    let _ = write!(
        html,
        "<div class=\"load-more-btn\">\n<form method=\"post\" action=\"/load-more\">\
         <button type=\"submit\">Load More Deals</button></form>\n\
         <p class=\"next-page\">Next page: {}</p>\n</div>\n",
        state.current_page()
    );
    html.push_str("</body>\n</html>\n");
    html
}

fn render_filters(selection: Selection) -> String {
    let mut html = String::from("<div class=\"filters\">\n");
    html.push_str(&render_select(
        "store",
        "Select Store",
        Store::ALL.iter().map(Store::label),
        selection.store.label(),
    ));
    html.push_str(&render_select(
        "category",
        "Select Category",
        Category::ALL.iter().map(Category::label),
        selection.category.label(),
    ));
    html.push_str(&render_select(
        "deal_section",
        "Select Deal Section",
        DealSection::ALL.iter().map(DealSection::label),
        selection.deal_section.label(),
    ));
    html.push_str("</div>\n");
    html
}

/// One dropdown per dimension; picking an option posts it straight away.
fn render_select<'a>(
    dimension: &str,
    caption: &str,
    options: impl Iterator<Item = &'a str>,
    selected: &str,
) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<form method=\"post\" action=\"/filters\">\
         <input type=\"hidden\" name=\"dimension\" value=\"{dimension}\">\
         <label>{caption}<select name=\"value\" onchange=\"this.form.submit()\">"
    );
    for option in options {
        let marker = if option == selected { " selected" } else { "" };
        let _ = write!(
            html,
            "<option value=\"{}\"{marker}>{}</option>",
            attr(option),
            text(option)
        );
    }
    html.push_str(
        "</select></label><noscript><button type=\"submit\">Apply</button></noscript></form>\n",
    );
    html
}

/// Cards in rows of [`CARDS_PER_ROW`], or the load prompt when empty.
pub fn render_grid(products: &[Product]) -> String {
    if products.is_empty() {
        return format!("<div class=\"info\">{}</div>\n", text(EMPTY_PROMPT));
    }

    let mut html = String::new();
    for row in products.chunks(CARDS_PER_ROW) {
        html.push_str("<div class=\"deal-row\">\n");
        for product in row {
            html.push_str(&render_card(product));
        }
        html.push_str("</div>\n");
    }
    html
}

fn render_card(product: &Product) -> String {
    format!(
        "<a href=\"{link}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"product-card\">\n\
         <img src=\"{image}\" class=\"product-image\" alt=\"{alt}\"/>\n\
         <div class=\"product-title\" title=\"{alt}\">{title}</div>\n\
         <div class=\"product-details\"><strong>Discount:</strong> {discount}</div>\n\
         <div class=\"product-details\"><strong>Special Price:</strong> {price}</div>\n\
         </a>\n",
        link = attr(&product.link),
        image = attr(&product.image),
        alt = attr(&product.title),
        title = text(&product.title),
        discount = text(&product.discount),
        price = text(&product.special_price),
    )
}
