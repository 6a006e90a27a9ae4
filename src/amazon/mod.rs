//! Amazon-specific modules for HTTP client, parsing, and data models.

pub mod asin;
pub mod client;
pub mod error;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{AmazonClient, OfferSource};
pub use error::LookupError;
pub use models::{Lookup, Offer, Outcome};
pub use parser::ListingPage;
