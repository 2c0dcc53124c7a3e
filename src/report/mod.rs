use std::collections::HashMap;
use std::io;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::{BookingPeriod, RoomOffer};

/// Report column headers, in output order
pub const COLUMNS: [&str; 5] = [
    "Anfragedatum",
    "Kategorie",
    "Preis",
    "Größe",
    "Buchungszeitraum",
];

/// One report row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRow {
    pub request_date: NaiveDate,
    pub category: String,
    pub price: i64,
    pub size: u32,
    pub booking_period: BookingPeriod,
}

impl OfferRow {
    fn from_offer(offer: &RoomOffer) -> Self {
        Self {
            request_date: offer.request_date(),
            category: offer.category().to_string(),
            price: offer.price(),
            size: offer.size(),
            booking_period: offer.booking_period(),
        }
    }

    /// Localized cells in [`COLUMNS`] order
    pub fn cells(&self) -> [String; 5] {
        [
            self.request_date.format("%Y-%m-%d").to_string(),
            self.category.clone(),
            self.price.to_string(),
            self.size.to_string(),
            self.booking_period.label().to_string(),
        ]
    }
}

/// The offers of one scrape, one row per category and size
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferTable {
    rows: Vec<OfferRow>,
}

impl OfferTable {
    /// Build a table keeping the cheapest offer of every (category, size).
    /// Rows appear in the order their key was first seen.
    pub fn aggregate<'a>(offers: impl IntoIterator<Item = &'a RoomOffer>) -> Self {
        let mut rows: Vec<OfferRow> = Vec::new();
        let mut index: HashMap<(String, u32), usize> = HashMap::new();

        for offer in offers {
            let key = (offer.category().to_string(), offer.size());
            match index.get(&key) {
                Some(&pos) => {
                    if offer.price() < rows[pos].price {
                        rows[pos] = OfferRow::from_offer(offer);
                    }
                }
                None => {
                    index.insert(key, rows.len());
                    rows.push(OfferRow::from_offer(offer));
                }
            }
        }

        Self { rows }
    }

    /// Rows of `self` followed by rows of `other`
    pub fn concat(mut self, other: OfferTable) -> Self {
        self.rows.extend(other.rows);
        self
    }

    pub fn rows(&self) -> &[OfferRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as delimited text with a header line
    pub fn write_delimited<W: io::Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        out.write_record(COLUMNS)
            .context("Failed to write report header")?;
        for row in &self.rows {
            out.write_record(row.cells())
                .context("Failed to write report row")?;
        }
        out.flush().context("Failed to flush report")?;
        Ok(())
    }
}

/// Result of scraping both horizons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Offers(OfferTable),
    NothingFound,
}

/// Combine the tables of both horizons, short-term rows first
pub fn combine(short_term: Option<OfferTable>, early_booking: Option<OfferTable>) -> ScrapeOutcome {
    match (short_term, early_booking) {
        (Some(short), Some(early)) => ScrapeOutcome::Offers(short.concat(early)),
        (Some(table), None) | (None, Some(table)) => ScrapeOutcome::Offers(table),
        (None, None) => ScrapeOutcome::NothingFound,
    }
}
