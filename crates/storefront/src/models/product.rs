//! Static product catalog.
//!
//! Products are display-only: no identity, no persistence. The list is
//! rebuilt on every request to the listing page.

use safehub_core::{CurrencyCode, Price};

/// A product shown on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: &'static str,
    pub price: Price,
    pub tag: &'static str,
    pub description: &'static str,
}

impl Product {
    /// The current SafeHub tee line-up.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        vec![
            Self {
                name: "Murmur Weighted Tee",
                price: Price::from_cents(8900, CurrencyCode::NZD),
                tag: "flagship",
                description: "Weighted, sensory-soft tee for calming pressure.",
            },
            Self {
                name: "NeuroGlow Tee",
                price: Price::from_cents(4900, CurrencyCode::NZD),
                tag: "sensory",
                description: "Ultra-soft, tagless, flat seams.",
            },
            Self {
                name: "BodyHarmony Tee",
                price: Price::from_cents(5500, CurrencyCode::NZD),
                tag: "unisex+",
                description: "Extended sizing, drape fit, body-positive.",
            },
        ]
    }
}
