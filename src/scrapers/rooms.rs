use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::models::RoomOffer;
use crate::scrapers::types::RoomSelectors;

/// Matches a number with optional `.` or space thousand separators and an
/// optional `,` decimal part, e.g. `1.234,50` or `32`.
fn numeral_regex() -> &'static Regex {
    static NUMERAL: OnceLock<Regex> = OnceLock::new();
    NUMERAL.get_or_init(|| {
        Regex::new(r"\d{1,3}(?:[.\s\u{a0}]\d{3})+(?:,\d+)?|\d+(?:,\d+)?")
            .expect("numeral pattern is valid")
    })
}

/// Parse the first numeral of `text` into its whole-number part.
///
/// `"ab € 1.234,50"` gives `1234`, `"ca. 32 m²"` gives `32`.
pub fn parse_numeral(text: &str) -> Option<i64> {
    let matched = numeral_regex().find(text)?.as_str();
    let whole = matched.split(',').next().unwrap_or(matched);
    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

struct CompiledSelectors {
    room: Selector,
    category: Selector,
    size: Selector,
    price: Selector,
}

impl CompiledSelectors {
    fn new(selectors: &RoomSelectors) -> Result<Self> {
        let parse = |css: &str| {
            Selector::parse(css).map_err(|err| anyhow!("Invalid CSS selector `{css}`: {err}"))
        };
        Ok(Self {
            room: parse(&selectors.room)?,
            category: parse(&selectors.category)?,
            size: parse(&selectors.size)?,
            price: parse(&selectors.price)?,
        })
    }
}

fn text_of(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(|el| {
        el.text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Extract the room offers from the result page HTML.
///
/// Rooms whose fields are missing or fail validation are logged and skipped,
/// so only valid offers come back.
pub fn extract_offers(
    html: &str,
    selectors: &RoomSelectors,
    request_date: NaiveDate,
    arrival: NaiveDate,
) -> Result<Vec<RoomOffer>> {
    let selectors = CompiledSelectors::new(selectors)?;
    let document = Html::parse_document(html);

    let mut offers = Vec::new();
    for (idx, room) in document.select(&selectors.room).enumerate() {
        let category = text_of(room, &selectors.category).unwrap_or_default();
        let size = text_of(room, &selectors.size).and_then(|text| parse_numeral(&text));
        let price = text_of(room, &selectors.price).and_then(|text| parse_numeral(&text));

        let (Some(size), Some(price)) = (size, price) else {
            warn!(
                "Skipped room {}: category='{}', size={:?}, price={:?}",
                idx, category, size, price
            );
            continue;
        };
        let Ok(size) = u32::try_from(size) else {
            warn!("Skipped room {}: size {} out of range", idx, size);
            continue;
        };

        match RoomOffer::for_arrival(category, size, price, request_date, arrival) {
            Ok(offer) => {
                debug!(
                    "Room {}: {} ({} m²) for {}",
                    idx,
                    offer.category(),
                    offer.size(),
                    offer.price()
                );
                offers.push(offer);
            }
            Err(err) => warn!("Skipped room {}: {}", idx, err),
        }
    }

    Ok(offers)
}
