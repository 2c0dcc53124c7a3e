use crate::config::BrowserSettings;
use crate::error::ScrapeError;
use crate::scrapers::traits::{BrowserSession, ClickMode, ElementSnapshot};
use anyhow::{Context, Result};
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Collects attributes, text and parent class of `this` as a JSON string.
const SNAPSHOT_FN: &str = r#"
function() {
    const attributes = {};
    for (const attr of this.attributes) {
        attributes[attr.name] = attr.value;
    }
    return JSON.stringify({
        attributes,
        text: this.innerText || "",
        parentClass: this.parentElement ? this.parentElement.className : null,
    });
}
"#;

const CLICK_FN: &str = "function() { this.click(); }";

/// A headless Chrome window with a single tab, closed when dropped
pub struct ChromeSession {
    // Owns the Chrome process; dropping it shuts the browser down.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launch a fresh Chrome instance
    pub fn launch(settings: &BrowserSettings) -> Result<Self> {
        info!(headless = settings.headless, "Launching Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(settings.headless)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open a browser tab")?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    fn wait_element(&self, xpath: &str, timeout: Duration) -> Result<Element<'_>> {
        self.tab
            .wait_for_xpath_with_custom_timeout(xpath, timeout)
            .map_err(|err| {
                debug!(error = %err, "Waiting for {} failed", xpath);
                ScrapeError::ElementTimeout {
                    query: xpath.to_string(),
                    timeout_secs: timeout.as_secs(),
                }
                .into()
            })
    }

    fn snapshot(element: &Element<'_>) -> Result<ElementSnapshot> {
        let result = element
            .call_js_fn(SNAPSHOT_FN, vec![], false)
            .context("Failed to read element")?;
        match result.value {
            Some(Value::String(json)) => {
                serde_json::from_str(&json).context("Malformed element snapshot")
            }
            other => anyhow::bail!("Unexpected element snapshot: {:?}", other),
        }
    }
}

impl BrowserSession for ChromeSession {
    fn open(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to open {url}"))?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn wait_for(&self, xpath: &str, timeout: Duration) -> Result<()> {
        self.wait_element(xpath, timeout).map(|_| ())
    }

    fn click(&self, xpath: &str, mode: ClickMode, timeout: Duration) -> Result<ElementSnapshot> {
        let element = self.wait_element(xpath, timeout)?;
        let snapshot = Self::snapshot(&element)?;
        match mode {
            ClickMode::Pointer => {
                element
                    .click()
                    .with_context(|| format!("Failed to click {xpath}"))?;
            }
            ClickMode::Script => {
                element
                    .call_js_fn(CLICK_FN, vec![], false)
                    .with_context(|| format!("Failed to click {xpath}"))?;
            }
        }
        Ok(snapshot)
    }

    fn snapshot_all(&self, xpath: &str, timeout: Duration) -> Result<Vec<ElementSnapshot>> {
        self.wait_element(xpath, timeout)?;
        let elements = self
            .tab
            .find_elements_by_xpath(xpath)
            .with_context(|| format!("Failed to find {xpath}"))?;
        debug!("Found {} elements for {}", elements.len(), xpath);
        elements.iter().map(Self::snapshot).collect()
    }

    fn page_html(&self) -> Result<String> {
        let html_result = self
            .tab
            .evaluate("document.documentElement.outerHTML", false)?;
        match html_result.value {
            Some(Value::String(html)) => Ok(html),
            _ => anyhow::bail!("Could not get HTML from page"),
        }
    }

    fn execute(&self, script: &str) -> Result<Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .context("Failed to evaluate script")?;
        Ok(result.value.unwrap_or(Value::Null))
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        match self.tab.close(true) {
            Ok(_) => debug!("Browser tab closed"),
            Err(err) => warn!(error = %err, "Failed to close browser tab"),
        }
    }
}
