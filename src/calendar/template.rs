use chrono::NaiveDate;

use crate::error::ScrapeError;

const YEAR_MARK: &str = "{year}";
const MONTH_MARK: &str = "{month}";
const DAY_MARK: &str = "{day}";

// Stand-ins used to validate partially specified dates.
const FALLBACK_YEAR: i32 = 2022;
const FALLBACK_MONTH: u32 = 12;
const FALLBACK_DAY: u32 = 1;

/// Fills the `{year}`, `{month}` and `{day}` placeholders of a query scheme.
///
/// Only the components that were set are substituted, so a scheme can be
/// filled in stages. Setting a component whose placeholder is absent from the
/// scheme is an error, as is a combination of components that cannot form a
/// calendar date.
///
/// ```ignore
/// let xpath = SchemeFill::new("//a[@onclick=\"AjaxCalendarSet({year}, {month});\"]")
///     .year(2024)
///     .month(5)
///     .fill()?;
/// ```
#[derive(Debug, Clone)]
pub struct SchemeFill<'a> {
    scheme: &'a str,
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

impl<'a> SchemeFill<'a> {
    pub fn new(scheme: &'a str) -> Self {
        Self {
            scheme,
            year: None,
            month: None,
            day: None,
        }
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    /// Sets year and month from `date`
    pub fn month_of(self, date: NaiveDate) -> Self {
        use chrono::Datelike;
        self.year(date.year()).month(date.month())
    }

    /// Sets year, month and day from `date`
    pub fn date(self, date: NaiveDate) -> Self {
        use chrono::Datelike;
        self.month_of(date).day(date.day())
    }

    pub fn fill(&self) -> Result<String, ScrapeError> {
        let year = self.year.unwrap_or(FALLBACK_YEAR);
        let month = self.month.unwrap_or(FALLBACK_MONTH);
        let day = self.day.unwrap_or(FALLBACK_DAY);
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(ScrapeError::InvalidDate { year, month, day });
        }

        let mut filled = self.scheme.to_string();
        let components = [
            (YEAR_MARK, self.year.map(i64::from)),
            (MONTH_MARK, self.month.map(i64::from)),
            (DAY_MARK, self.day.map(i64::from)),
        ];
        for (mark, value) in components {
            let Some(value) = value else { continue };
            if !filled.contains(mark) {
                return Err(ScrapeError::MissingPlaceholder {
                    placeholder: mark,
                    value,
                    scheme: self.scheme.to_string(),
                });
            }
            filled = filled.replace(mark, &value.to_string());
        }
        Ok(filled)
    }
}
