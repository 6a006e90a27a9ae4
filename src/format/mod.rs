//! Output formatting for lookup results (TSV, JSON).

use crate::amazon::{Lookup, Outcome};
use crate::config::OutputFormat;

/// Formats lookups for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a finished lookup as a single output record.
    pub fn format_lookup(&self, lookup: &Lookup) -> String {
        match self.format {
            OutputFormat::Tsv => self.tsv_line(lookup),
            OutputFormat::Json => self.json_single(lookup),
        }
    }

    // TSV formatting

    fn tsv_line(&self, lookup: &Lookup) -> String {
        match &lookup.outcome {
            Outcome::Found(offer) => format!(
                "{}\t{}\t{}",
                lookup.identifier,
                offer.price.as_deref().unwrap_or_default(),
                offer.condition
            ),
            Outcome::NoSuchItem => format!("{}\tNo such item", lookup.identifier),
            Outcome::NoFbaListings => format!("{}\tNo FBA listings", lookup.identifier),
        }
    }

    // JSON formatting

    fn json_single(&self, lookup: &Lookup) -> String {
        serde_json::to_string(lookup).unwrap_or_else(|_| "{}".to_string())
    }
}
