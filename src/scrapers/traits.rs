use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::report::OfferTable;
use crate::scrapers::types::Horizon;

/// How an element gets clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    /// Move the pointer over the element and click it
    Pointer,
    /// Call `click()` on the element from a page script
    Script,
}

/// What the browser layer reads from a located element in one round trip
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub text: String,
    pub parent_class: Option<String>,
}

impl ElementSnapshot {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// The browser capabilities the booking pipeline relies on.
///
/// All element lookups are XPath queries. Lookups wait up to `timeout` for
/// the element to appear and fail with an element timeout otherwise. A
/// session is exclusively owned by one pipeline run and is closed on drop.
pub trait BrowserSession {
    /// Navigate to `url` and wait for the navigation to finish
    fn open(&self, url: &str) -> Result<()>;

    /// Wait until at least one element matches `xpath`
    fn wait_for(&self, xpath: &str, timeout: Duration) -> Result<()>;

    /// Wait for the first element matching `xpath` and click it
    fn click(&self, xpath: &str, mode: ClickMode, timeout: Duration) -> Result<ElementSnapshot>;

    /// Wait for `xpath` and snapshot every matching element
    fn snapshot_all(&self, xpath: &str, timeout: Duration) -> Result<Vec<ElementSnapshot>>;

    /// Serialized HTML of the current page
    fn page_html(&self) -> Result<String>;

    /// Evaluate an inline script against the live page
    fn execute(&self, script: &str) -> Result<serde_json::Value>;
}

/// Common trait for room offer sources, run once per horizon
#[async_trait]
pub trait OfferScraper: Send + Sync {
    /// Scrape the offers for a stay in `horizon`, as requested on `today`.
    /// `None` means the calendar had no bookable night.
    async fn scrape(&self, horizon: &Horizon, today: NaiveDate) -> Result<Option<OfferTable>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
