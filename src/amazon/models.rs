//! Data models for offers and lookup results.

use serde::{Deserialize, Serialize};

/// One seller's offer as scraped from an offer-listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Item price as shown, e.g. `$19.99`
    pub price: Option<String>,
    /// Shipping charge as shown, absent for free or unparseable shipping
    pub shipping: Option<String>,
    /// Condition with all whitespace removed, e.g. `Used-LikeNew`
    pub condition: String,
    /// Whether the offer carries the Fulfilled-by-Amazon badge
    pub fba: bool,
}

/// Terminal result of an FBA lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "offer", rename_all = "snake_case")]
pub enum Outcome {
    /// First FBA offer in listing order. Amazon sorts offers by price, so this
    /// is assumed (not verified) to be the cheapest FBA offer.
    Found(Offer),
    /// The listing page redirected away; there is no such item.
    NoSuchItem,
    /// Every page was scanned and no offer was FBA.
    NoFbaListings,
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Found(_) => 0,
            Outcome::NoSuchItem => 2,
            Outcome::NoFbaListings => 3,
        }
    }

    /// Returns the selected offer, if any.
    pub fn offer(&self) -> Option<&Offer> {
        match self {
            Outcome::Found(offer) => Some(offer),
            _ => None,
        }
    }
}

/// A finished lookup, ready for formatting.
#[derive(Debug, Clone, Serialize)]
pub struct Lookup {
    /// Identifier as the user typed it
    pub identifier: String,
    /// Normalized ASIN used in the listing URL
    pub asin: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Number of listing pages fetched
    pub pages_scanned: usize,
}

impl Lookup {
    /// Process exit code for this lookup.
    pub fn exit_code(&self) -> u8 {
        self.outcome.exit_code()
    }
}
