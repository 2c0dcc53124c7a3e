use chrono::NaiveDate;

use crate::error::ScrapeError;
use crate::models::{DayCell, StayCandidate};

/// Select the earliest one-night stay among the cells of one calendar month.
///
/// Available cells are sorted by day number and scanned pairwise; the first
/// pair of consecutive day numbers wins. Departure takes the day, month and
/// year of the second cell of the pair.
///
/// Adjacency only looks at the day number, so a stay across a month boundary
/// (the 31st followed by the 1st) is never found. Callers pass cells of a
/// single month page.
pub fn select_stay(cells: &[DayCell]) -> Result<Option<StayCandidate>, ScrapeError> {
    let mut available: Vec<&DayCell> = cells.iter().filter(|cell| cell.available).collect();
    // Stable, so duplicate day numbers keep their page order.
    available.sort_by_key(|cell| cell.day);

    for pair in available.windows(2) {
        let (arrival, next) = (pair[0], pair[1]);
        if arrival.day.checked_add(1) == Some(next.day) {
            let departure = NaiveDate::from_ymd_opt(next.year, next.month, next.day).ok_or(
                ScrapeError::InvalidDate {
                    year: next.year,
                    month: next.month,
                    day: next.day,
                },
            )?;
            return Ok(Some(StayCandidate {
                arrival: *arrival,
                departure,
            }));
        }
    }
    Ok(None)
}
