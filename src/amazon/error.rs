//! Error taxonomy for fetching and scraping offer listings.

use thiserror::Error;

/// Errors raised while fetching or scraping an offer listing.
///
/// "No such item" and "no FBA listings" are not errors; they are
/// [`Outcome`](crate::amazon::models::Outcome) variants.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to build HTTP client")]
    Client(#[source] wreq::Error),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: wreq::Error,
    },

    #[error("rate limited by Amazon at {url}. Try again later or use a proxy.")]
    RateLimited { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("CAPTCHA detected. Amazon is blocking requests; try a proxy or wait before retrying.")]
    Blocked,

    #[error("missing {element} in {context}")]
    MissingElement { element: &'static str, context: &'static str },

    #[error("{element} has no {attribute} attribute")]
    MissingAttribute { attribute: &'static str, element: &'static str },
}

impl LookupError {
    /// True for failures caused by the page structure rather than the network.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::MissingElement { .. } | Self::MissingAttribute { .. })
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        if self.is_parse_error() {
            5
        } else {
            4
        }
    }
}
