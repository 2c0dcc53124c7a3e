use serde::{Deserialize, Serialize};

/// Addresses and page structure of the booking site
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Booking page URL
    pub base_url: String,
    /// XPath of the month dropdown toggle
    pub month_selector: String,
    /// XPath scheme of a month entry in the dropdown (`{year}`, `{month}`)
    pub month_scheme: String,
    /// XPath scheme of the day cells of one month (`{year}`, `{month}`)
    pub calendar_day_scheme: String,
    /// XPath scheme of one arrival day (`{year}`, `{month}`, `{day}`)
    pub arrival_scheme: String,
    /// XPath scheme of one departure day (`{year}`, `{month}`, `{day}`)
    pub departure_scheme: String,
    /// XPath of the button leading to the offers
    pub next_step_button: String,
    /// XPath that matches once the room offers are rendered
    pub room_list: String,
    /// Attribute names on the day cells
    pub day_attribute: String,
    pub month_attribute: String,
    pub year_attribute: String,
    /// Suffix of the parent `class` of a bookable day
    pub available_marker: String,
    /// Attribute holding the tooltip of a day cell
    pub title_attribute: String,
    /// CSS selectors used to extract the offers from the page HTML
    pub room_selectors: RoomSelectors,
    /// Script that accepts the cookie banner, if shown
    pub consent_script: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.linsbergasia.at/websline-abm/homepage/booking/index/de"
                .to_string(),
            month_selector: r#"//button[@class="btn btn-default btn-block dropdown-toggle"]"#
                .to_string(),
            month_scheme: r#"//a[@onclick="AjaxCalendarSet({year}, {month});return false;"]"#
                .to_string(),
            calendar_day_scheme: concat!(
                r#"//div[@data-original-title and @class="abm-calendar-day" and "#,
                r#"@data-month="{month}" and @data-year="{year}"]"#
            )
            .to_string(),
            arrival_scheme: concat!(
                r#"//div[@class="abm-calendar-day" and @data-month="{month}" and "#,
                r#"@data-year="{year}" and @data-day="{day}"]"#
            )
            .to_string(),
            departure_scheme: concat!(
                r#"//div[@class="abm-calendar-day" and @data-month="{month}" and "#,
                r#"@data-year="{year}" and @data-day="{day}" and "#,
                r#"contains(@data-original-title, 'Abreisedatum')]"#
            )
            .to_string(),
            next_step_button: r#"//button[@onclick="AjaxSetRequestNextStep"]"#.to_string(),
            room_list: r#"//div[contains(@class, "abm-room")]"#.to_string(),
            day_attribute: "data-day".to_string(),
            month_attribute: "data-month".to_string(),
            year_attribute: "data-year".to_string(),
            available_marker: "state-aa".to_string(),
            title_attribute: "data-original-title".to_string(),
            room_selectors: RoomSelectors::default(),
            consent_script: r#"
                const button = document.querySelector('button[id*="accept"], button[class*="accept"]');
                if (button) button.click();
                !!button
            "#
            .to_string(),
        }
    }
}

/// CSS selectors for one room offer on the result page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSelectors {
    pub room: String,
    pub category: String,
    pub size: String,
    pub price: String,
}

impl Default for RoomSelectors {
    fn default() -> Self {
        Self {
            room: "div.abm-room".to_string(),
            category: ".abm-room-title".to_string(),
            size: ".abm-room-size".to_string(),
            price: ".abm-room-price".to_string(),
        }
    }
}

/// A month offset from today at which a stay is searched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub name: String,
    pub month_offset: u32,
}

impl Horizon {
    pub fn new(name: impl Into<String>, month_offset: u32) -> Self {
        Self {
            name: name.into(),
            month_offset,
        }
    }

    pub fn short_term(month_offset: u32) -> Self {
        Self::new("short-term", month_offset)
    }

    pub fn early_booking(month_offset: u32) -> Self {
        Self::new("early-booking", month_offset)
    }
}
