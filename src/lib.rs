//! fba-lookup - Find the first Fulfilled-by-Amazon offer for an ASIN
//!
//! Walks an item's offer-listing pages in order and reports the first offer
//! carrying the FBA badge.

pub mod amazon;
pub mod commands;
pub mod config;
pub mod format;

pub use amazon::models::{Lookup, Offer, Outcome};
pub use amazon::LookupError;
pub use config::Config;
