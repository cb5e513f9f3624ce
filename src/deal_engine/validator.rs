//! Completeness check that turns raw listings into products

use crate::deal_engine::parser::RawListing;
use crate::deal_engine::Product;
use std::fmt;

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Image,
    Discount,
    SpecialPrice,
    Link,
}

impl Field {
    fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Image => "image",
            Field::Discount => "discount",
            Field::SpecialPrice => "special price",
            Field::Link => "link",
        }
    }
}

/// A listing that lacked at least one required field.
#[derive(Debug, Clone, PartialEq)]
pub struct IncompleteListing {
    pub missing: Vec<Field>,
}

impl fmt::Display for IncompleteListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.missing.iter().map(Field::name).collect();
        write!(f, "{}", names.join(", "))
    }
}

pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Required fields absent from `listing`, in declaration order.
    pub fn missing_fields(&self, listing: &RawListing) -> Vec<Field> {
        [
            (Field::Title, listing.title.is_some()),
            (Field::Image, listing.image.is_some()),
            (Field::Discount, listing.discount.is_some()),
            (Field::SpecialPrice, listing.special_price.is_some()),
            (Field::Link, listing.link.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(field, _)| field)
        .collect()
    }

    /// Category is optional and falls back to [`DEFAULT_CATEGORY`].
    pub fn complete(&self, listing: RawListing) -> Result<Product, IncompleteListing> {
        match listing {
            RawListing {
                title: Some(title),
                image: Some(image),
                discount: Some(discount),
                special_price: Some(special_price),
                category,
                link: Some(link),
            } => Ok(Product {
                title,
                image,
                discount,
                special_price,
                category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                link,
            }),
            listing => Err(IncompleteListing {
                missing: self.missing_fields(&listing),
            }),
        }
    }
}
