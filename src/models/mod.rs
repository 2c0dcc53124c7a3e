use chrono::{Datelike, NaiveDate};

use crate::error::ScrapeError;

/// Minimum lead time for a request to count as an early booking
pub const EARLY_BOOKING_MONTHS: u32 = 6;

/// One date of the booking calendar together with its availability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub available: bool,
}

impl DayCell {
    pub fn new(day: u32, month: u32, year: i32, available: bool) -> Self {
        Self {
            day,
            month,
            year,
            available,
        }
    }

    /// The calendar date of this cell
    pub fn date(&self) -> Result<NaiveDate, ScrapeError> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or(ScrapeError::InvalidDate {
            year: self.year,
            month: self.month,
            day: self.day,
        })
    }
}

/// A bookable one-night stay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayCandidate {
    pub arrival: DayCell,
    pub departure: NaiveDate,
}

/// Whether a request was made short-term or as an early booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingPeriod {
    ShortTerm,
    EarlyBooking,
}

impl BookingPeriod {
    pub fn from_flag(is_early_booking: bool) -> Self {
        if is_early_booking {
            Self::EarlyBooking
        } else {
            Self::ShortTerm
        }
    }

    /// Label used in the report
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShortTerm => "kurzfristig",
            Self::EarlyBooking => "Frühbucher",
        }
    }
}

/// A validated room offer. Fields are only reachable through accessors so an
/// offer cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOffer {
    category: String,
    size: u32,
    price: i64,
    is_early_booking: bool,
    request_date: NaiveDate,
}

impl RoomOffer {
    pub fn new(
        category: impl Into<String>,
        size: u32,
        price: i64,
        is_early_booking: bool,
        request_date: NaiveDate,
    ) -> Result<Self, ScrapeError> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(ScrapeError::invalid_offer("category must not be empty"));
        }
        if size == 0 {
            return Err(ScrapeError::invalid_offer(format!(
                "size of `{category}` must be positive"
            )));
        }
        if price < 0 {
            return Err(ScrapeError::invalid_offer(format!(
                "price of `{category}` must not be negative, got {price}"
            )));
        }

        Ok(Self {
            category,
            size,
            price,
            is_early_booking,
            request_date,
        })
    }

    /// Build an offer requested on `request_date` for a stay starting on
    /// `arrival`, deriving the early-booking flag from the lead time.
    pub fn for_arrival(
        category: impl Into<String>,
        size: u32,
        price: i64,
        request_date: NaiveDate,
        arrival: NaiveDate,
    ) -> Result<Self, ScrapeError> {
        Self::new(
            category,
            size,
            price,
            is_early_booking(request_date, arrival),
            request_date,
        )
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn is_early_booking(&self) -> bool {
        self.is_early_booking
    }

    pub fn booking_period(&self) -> BookingPeriod {
        BookingPeriod::from_flag(self.is_early_booking)
    }

    pub fn request_date(&self) -> NaiveDate {
        self.request_date
    }
}

/// True when the month of `arrival` lies at least six calendar months after
/// the month of `request_date`. The calendar is scanned a month page at a
/// time, so the day of month does not count.
pub fn is_early_booking(request_date: NaiveDate, arrival: NaiveDate) -> bool {
    months_between(request_date, arrival) >= i64::from(EARLY_BOOKING_MONTHS)
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let index = |date: NaiveDate| i64::from(date.year()) * 12 + i64::from(date.month0());
    index(to) - index(from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn offer_rejects_empty_category() {
        let err = RoomOffer::new("   ", 30, 100, false, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidOffer(_)));
    }

    #[test]
    fn offer_rejects_zero_size() {
        assert!(RoomOffer::new("Doppelzimmer", 0, 100, false, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn offer_rejects_negative_price() {
        assert!(RoomOffer::new("Doppelzimmer", 25, -1, false, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn offer_accepts_zero_price_and_trims_category() {
        let offer = RoomOffer::new("  Suite ", 45, 0, true, date(2024, 1, 1)).unwrap();
        assert_eq!(offer.category(), "Suite");
        assert_eq!(offer.price(), 0);
        assert_eq!(offer.booking_period(), BookingPeriod::EarlyBooking);
    }

    #[test]
    fn early_booking_needs_six_months_lead_time() {
        let requested = date(2024, 3, 15);
        assert!(is_early_booking(requested, date(2024, 9, 15)));
        assert!(is_early_booking(requested, date(2025, 1, 2)));
        assert!(!is_early_booking(requested, date(2024, 8, 31)));
        assert!(!is_early_booking(requested, date(2024, 4, 1)));
        assert!(!is_early_booking(date(2024, 9, 1), date(2024, 3, 1)));
    }

    #[test]
    fn early_booking_ignores_day_of_month() {
        let requested = date(2024, 3, 15);
        assert!(is_early_booking(requested, date(2024, 9, 1)));
        assert!(is_early_booking(date(2024, 10, 31), date(2025, 4, 1)));
    }

    #[test]
    fn for_arrival_derives_flag() {
        let offer =
            RoomOffer::for_arrival("Einzelzimmer", 18, 99, date(2024, 3, 15), date(2024, 4, 2))
                .unwrap();
        assert!(!offer.is_early_booking());
        assert_eq!(offer.booking_period().label(), "kurzfristig");
    }

    #[test]
    fn day_cell_date_rejects_impossible_dates() {
        assert!(DayCell::new(31, 4, 2024, true).date().is_err());
        assert_eq!(DayCell::new(29, 2, 2024, true).date().unwrap(), date(2024, 2, 29));
    }
}
