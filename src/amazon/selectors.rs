//! CSS selectors for Amazon offer-listing pages.
//!
//! This file contains all CSS selectors used for parsing `/gp/offer-listing`
//! pages. Update this file when Amazon changes their HTML structure.
//!
//! **Update process**: When parsing fails, capture HTML sample,
//! update selectors, and add test fixture under `tests/fixtures/`.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the offer blocks on a listing page.
pub mod offer {
    use super::*;

    /// One seller's offer.
    pub static BLOCK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.olpOffer").unwrap());

    /// Column holding the price and shipping lines.
    pub static PRICE_COLUMN: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".olpPriceColumn").unwrap());

    /// Item price, first span inside the price column.
    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());

    /// Shipping line, first paragraph inside the price column.
    pub static SHIPPING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

    /// Column holding the condition text.
    pub static CONDITION_COLUMN: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".olpConditionColumn").unwrap());

    /// Condition text, first span inside the condition column.
    pub static CONDITION: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());

    /// "Fulfillment by Amazon" badge.
    pub static FBA_BADGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".olpBadge").unwrap());
}

/// Selectors for the pagination control.
pub mod pagination {
    use super::*;

    /// The "Next" item at the end of the pagination strip.
    pub static LAST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li.a-last").unwrap());

    /// Link inside the "Next" item; absent on the final page.
    pub static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

    /// Attribute carrying the relative next-page URL.
    pub static HREF_ATTR: &str = "href";
}

/// Selectors for pages that are not a usable listing.
pub mod errors {
    use super::*;

    /// Meta refresh Amazon serves when the ASIN has no listing.
    pub static META_REFRESH: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "meta[http-equiv='refresh'], \
             meta[http-equiv='Refresh']",
        )
        .unwrap()
    });

    /// CAPTCHA form.
    pub static CAPTCHA: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "form[action*='validateCaptcha'], \
             img[src*='captcha']",
        )
        .unwrap()
    });
}
