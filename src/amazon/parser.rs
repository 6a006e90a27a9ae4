//! HTML parser for Amazon offer-listing pages.

use crate::amazon::error::LookupError;
use crate::amazon::models::Offer;
use crate::amazon::selectors::{errors, offer, pagination};
use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::trace;

/// A dollar amount with exactly two decimal places, e.g. `$12.50`.
static DOLLAR_AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\d+\.\d\d").unwrap());

/// One fetched offer-listing page.
///
/// A page is parsed once and never mutated; paginating produces a new one.
pub struct ListingPage {
    document: Html,
}

impl ListingPage {
    /// Parses a listing page body.
    pub fn parse(html: &str) -> Self {
        Self { document: Html::parse_document(html) }
    }

    /// Fails if Amazon served a CAPTCHA instead of the listing.
    pub fn check_for_errors(&self) -> Result<(), LookupError> {
        if self.document.select(&errors::CAPTCHA).next().is_some() {
            return Err(LookupError::Blocked);
        }
        Ok(())
    }

    /// Returns false when the page is a meta-refresh placeholder, which is
    /// what Amazon serves for an ASIN with no listing.
    pub fn is_valid(&self) -> bool {
        self.document.select(&errors::META_REFRESH).next().is_none()
    }

    /// Offers in page order, parsed lazily so callers can stop early.
    pub fn offers(&self) -> impl Iterator<Item = Result<Offer, LookupError>> + '_ {
        self.document.select(&offer::BLOCK).map(parse_offer)
    }

    /// All offers on the page, failing on the first malformed block.
    pub fn extract_offers(&self) -> Result<Vec<Offer>, LookupError> {
        self.offers().collect()
    }

    /// Relative URL of the next page, or `None` on the last page.
    ///
    /// The pagination strip must exist even on single-page listings; its
    /// absence means the markup changed and is reported as a parse error.
    pub fn next_page_href(&self) -> Result<Option<String>, LookupError> {
        let last = self.document.select(&pagination::LAST).next().ok_or(
            LookupError::MissingElement {
                element: "pagination next item (li.a-last)",
                context: "listing page",
            },
        )?;

        let Some(link) = last.select(&pagination::LINK).next() else {
            return Ok(None);
        };

        let href = link.value().attr(pagination::HREF_ATTR).ok_or(
            LookupError::MissingAttribute { attribute: "href", element: "next page link" },
        )?;

        if href.is_empty() {
            Ok(None)
        } else {
            Ok(Some(href.to_string()))
        }
    }
}

/// Extracts price, shipping, condition and FBA badge from one offer block.
pub fn parse_offer(block: ElementRef) -> Result<Offer, LookupError> {
    let price_column = select_first(block, &offer::PRICE_COLUMN, "price column (.olpPriceColumn)")?;

    let price = select_first(price_column, &offer::PRICE, "price (span)")?;
    let shipping = select_first(price_column, &offer::SHIPPING, "shipping line (p)")?;

    let condition_column =
        select_first(block, &offer::CONDITION_COLUMN, "condition column (.olpConditionColumn)")?;
    let condition = select_first(condition_column, &offer::CONDITION, "condition (span)")?;

    let offer = Offer {
        price: extract_dollar_amount(&element_text(price)),
        shipping: extract_dollar_amount(&element_text(shipping)),
        condition: clean_condition(&element_text(condition)),
        fba: block.select(&offer::FBA_BADGE).next().is_some(),
    };

    trace!(
        "Parsed offer: {:?} + {:?} shipping, {} (fba: {})",
        offer.price,
        offer.shipping,
        offer.condition,
        offer.fba
    );

    Ok(offer)
}

/// Returns the first `$x.yz` amount in the text.
pub fn extract_dollar_amount(text: &str) -> Option<String> {
    DOLLAR_AMOUNT.find(text).map(|m| m.as_str().to_string())
}

/// Removes every whitespace character, so `" Used - Like\nNew "` becomes
/// `"Used-LikeNew"`.
pub fn clean_condition(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn select_first<'a>(
    element: ElementRef<'a>,
    selector: &Selector,
    name: &'static str,
) -> Result<ElementRef<'a>, LookupError> {
    element
        .select(selector)
        .next()
        .ok_or(LookupError::MissingElement { element: name, context: "offer block" })
}

fn element_text(element: ElementRef) -> String {
    element.text().collect()
}
