//! Runtime configuration.
//!
//! Every value has a compiled-in default. A TOML file can override any
//! subset of them:
//!
//! ```toml
//! workers = 2
//!
//! [browser]
//! headless = false
//! element_timeout_secs = 20
//!
//! [horizons]
//! short_term_months = 1
//! early_booking_months = 6
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scrapers::types::{Horizon, SiteSettings};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Number of browser sessions allowed to run at once
    pub workers: usize,
    pub site: SiteSettings,
    pub browser: BrowserSettings,
    pub horizons: HorizonSettings,
    pub report: ReportSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            site: SiteSettings::default(),
            browser: BrowserSettings::default(),
            horizons: HorizonSettings::default(),
            report: ReportSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load the configuration from `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.workers > 0, "workers must be at least 1");
        anyhow::ensure!(
            self.browser.element_timeout_secs > 0,
            "browser.element_timeout_secs must be at least 1"
        );
        anyhow::ensure!(
            self.report.delimiter.is_ascii(),
            "report.delimiter must be an ASCII character"
        );
        Ok(())
    }
}

/// Browser launch and wait settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run Chrome without a visible window
    pub headless: bool,
    /// How long to wait for a page element, in seconds
    pub element_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            element_timeout_secs: 10,
        }
    }
}

impl BrowserSettings {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }
}

/// Month offsets of the two search horizons
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonSettings {
    pub short_term_months: u32,
    pub early_booking_months: u32,
}

impl Default for HorizonSettings {
    fn default() -> Self {
        Self {
            short_term_months: 1,
            early_booking_months: 6,
        }
    }
}

impl HorizonSettings {
    pub fn short_term(&self) -> Horizon {
        Horizon::short_term(self.short_term_months)
    }

    pub fn early_booking(&self) -> Horizon {
        Horizon::early_booking(self.early_booking_months)
    }
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub delimiter: char,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self { delimiter: ';' }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_gives_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.horizons.short_term(), Horizon::short_term(1));
        assert_eq!(config.horizons.early_booking(), Horizon::early_booking(6));
        assert_eq!(config.browser.element_timeout(), Duration::from_secs(10));
        assert_eq!(config.site.available_marker, "state-aa");
    }

    #[test]
    fn partial_file_overrides_only_given_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [browser]
            headless = false

            [horizons]
            early_booking_months = 7

            [site]
            base_url = "http://localhost:8080/booking"
            "#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert!(!config.browser.headless);
        assert_eq!(config.browser.element_timeout_secs, 10);
        assert_eq!(config.horizons.short_term_months, 1);
        assert_eq!(config.horizons.early_booking_months, 7);
        assert_eq!(config.site.base_url, "http://localhost:8080/booking");
        assert_eq!(config.site.day_attribute, "data-day");
        assert_eq!(config.report.delimiter, ';');
    }

    #[test]
    fn zero_workers_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers = 0").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }
}
