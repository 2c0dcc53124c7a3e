pub mod stay;
pub mod template;

pub use stay::select_stay;
pub use template::SchemeFill;

use chrono::{Months, NaiveDate};

use crate::error::ScrapeError;
use crate::models::DayCell;
use crate::scrapers::traits::ElementSnapshot;
use crate::scrapers::types::SiteSettings;

/// Add `n_months` calendar months to `from`.
///
/// The day is clamped to the length of the target month, so 31 January plus
/// one month is the last day of February.
pub fn shift_months(from: NaiveDate, n_months: u32) -> NaiveDate {
    from.checked_add_months(Months::new(n_months))
        .unwrap_or(NaiveDate::MAX)
}

/// Read a calendar day element into a [`DayCell`].
///
/// The day, month and year come from the configured data attributes; the day
/// is available when the `class` of its parent element ends with the
/// availability marker.
pub fn day_cell_from_snapshot(
    snapshot: &ElementSnapshot,
    settings: &SiteSettings,
) -> Result<DayCell, ScrapeError> {
    let day = numeric_attribute(snapshot, &settings.day_attribute)?;
    let month = numeric_attribute(snapshot, &settings.month_attribute)?;
    let year = numeric_attribute(snapshot, &settings.year_attribute)?;
    let available = snapshot
        .parent_class
        .as_deref()
        .map(|class| class.trim_end().ends_with(&settings.available_marker))
        .unwrap_or(false);

    let year = i32::try_from(year).map_err(|_| {
        ScrapeError::attribute(
            &settings.year_attribute,
            snapshot.attribute(&settings.year_attribute),
        )
    })?;
    Ok(DayCell::new(day, month, year, available))
}

fn numeric_attribute(snapshot: &ElementSnapshot, name: &str) -> Result<u32, ScrapeError> {
    let raw = snapshot.attribute(name);
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .ok_or_else(|| ScrapeError::attribute(name, raw))
}
