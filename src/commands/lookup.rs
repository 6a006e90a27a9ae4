//! FBA lookup command implementation.

use crate::amazon::asin;
use crate::amazon::{AmazonClient, ListingPage, Lookup, LookupError, OfferSource, Outcome};
use crate::config::Config;
use tracing::{debug, info};

/// What to do after scanning one page.
enum Step {
    Done(Outcome),
    Next(String),
}

/// Finds the first Fulfilled-by-Amazon offer for an ASIN.
pub struct LookupCommand {
    config: Config,
}

impl LookupCommand {
    /// Creates a new lookup command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the lookup against Amazon.
    pub async fn execute(&self, identifier: &str) -> Result<Lookup, LookupError> {
        let client = AmazonClient::new(&self.config)?;

        self.execute_with_client(&client, identifier).await
    }

    /// Runs the lookup with a provided offer source (for testing).
    ///
    /// Pages are walked in order and the first FBA offer wins. Amazon lists
    /// offers by ascending price, so that offer is taken to be the cheapest
    /// FBA offer; no price comparison is done.
    pub async fn execute_with_client(
        &self,
        source: &impl OfferSource,
        identifier: &str,
    ) -> Result<Lookup, LookupError> {
        let asin = asin::normalize(identifier);
        info!("Looking up FBA offers for {} (normalized: {})", identifier, asin);

        let mut html = source.fetch_listing_page(&asin).await?;
        let mut pages_scanned = 0;

        let outcome = loop {
            pages_scanned += 1;

            match scan_page(&html, pages_scanned == 1)? {
                Step::Done(outcome) => break outcome,
                Step::Next(href) => {
                    debug!("No FBA offer on page {}, following {}", pages_scanned, href);
                    html = source.fetch_next_page(&href).await?;
                }
            }
        };

        info!("Lookup for {} finished after {} page(s)", asin, pages_scanned);

        Ok(Lookup { identifier: identifier.to_string(), asin, outcome, pages_scanned })
    }
}

/// Scans one listing page. Only the first page is checked for the
/// "no such item" redirect.
fn scan_page(html: &str, first_page: bool) -> Result<Step, LookupError> {
    let page = ListingPage::parse(html);
    page.check_for_errors()?;

    if first_page && !page.is_valid() {
        debug!("Listing page redirects away, no such item");
        return Ok(Step::Done(Outcome::NoSuchItem));
    }

    for offer in page.offers() {
        let offer = offer?;
        if offer.fba {
            return Ok(Step::Done(Outcome::Found(offer)));
        }
    }

    Ok(match page.next_page_href()? {
        Some(href) => Step::Next(href),
        None => Step::Done(Outcome::NoFbaListings),
    })
}
