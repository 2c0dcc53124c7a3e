use thiserror::Error;

/// Errors raised by the calendar, offer and browser layers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// A value was supplied for a placeholder the query template does not contain
    #[error("{value} for {placeholder} is incompatible with scheme `{scheme}`")]
    MissingPlaceholder {
        placeholder: &'static str,
        value: i64,
        scheme: String,
    },

    /// Day, month and year do not form a calendar date
    #[error("invalid date: year {year}, month {month}, day {day}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// A calendar element carries a missing or malformed attribute
    #[error("attribute `{name}` is missing or malformed: {value:?}")]
    Attribute { name: String, value: Option<String> },

    /// A room offer violated its invariants
    #[error("invalid room offer: {0}")]
    InvalidOffer(String),

    /// A required page element did not show up in time
    #[error("element `{query}` not found within {timeout_secs}s")]
    ElementTimeout { query: String, timeout_secs: u64 },
}

impl ScrapeError {
    pub fn invalid_offer(msg: impl Into<String>) -> Self {
        Self::InvalidOffer(msg.into())
    }

    pub fn attribute(name: &str, value: Option<&str>) -> Self {
        Self::Attribute {
            name: name.to_string(),
            value: value.map(str::to_string),
        }
    }
}
