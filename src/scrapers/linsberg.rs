use crate::calendar::{day_cell_from_snapshot, select_stay, shift_months, SchemeFill};
use crate::config::AppConfig;
use crate::models::{DayCell, StayCandidate};
use crate::report::OfferTable;
use crate::scrapers::browser::ChromeSession;
use crate::scrapers::rooms::extract_offers;
use crate::scrapers::traits::{BrowserSession, ClickMode, OfferScraper};
use crate::scrapers::types::{Horizon, SiteSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn, Span};

/// Room offer scraper for the Linsberg Asia booking calendar.
///
/// Every call to [`OfferScraper::scrape`] launches its own Chrome instance on
/// the blocking thread pool, so horizons never share a browser.
pub struct LinsbergScraper {
    config: Arc<AppConfig>,
}

impl LinsbergScraper {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl OfferScraper for LinsbergScraper {
    async fn scrape(&self, horizon: &Horizon, today: NaiveDate) -> Result<Option<OfferTable>> {
        let config = Arc::clone(&self.config);
        let horizon = horizon.clone();
        let span = Span::current();

        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let session = ChromeSession::launch(&config.browser)?;
            scrape_offers(
                &session,
                &config.site,
                config.browser.element_timeout(),
                &horizon,
                today,
            )
        })
        .await
        .context("Browser task panicked")?
    }

    fn source_name(&self) -> &'static str {
        "Linsberg Asia"
    }
}

/// Walk the booking calendar in `session`: pick the target month of
/// `horizon`, select the first bookable night, submit and read the offers.
///
/// Returns `None` when the month has no bookable night or the result page
/// lists no valid offer.
pub fn scrape_offers<S: BrowserSession>(
    session: &S,
    site: &SiteSettings,
    timeout: Duration,
    horizon: &Horizon,
    today: NaiveDate,
) -> Result<Option<OfferTable>> {
    let target = shift_months(today, horizon.month_offset);

    session.open(&site.base_url)?;
    info!("URL {} opened", site.base_url);

    // The banner does not show up on every visit.
    match session.execute(&site.consent_script) {
        Ok(accepted) => debug!("Cookie banner accepted: {}", accepted),
        Err(err) => debug!(error = %err, "Cookie banner script failed"),
    }

    session
        .click(&site.month_selector, ClickMode::Pointer, timeout)
        .context("Failed to open the month menu")?;
    debug!("Month menu opened");

    let month_xpath = SchemeFill::new(&site.month_scheme).month_of(target).fill()?;
    session
        .click(&month_xpath, ClickMode::Script, timeout)
        .with_context(|| format!("Failed to select month {}/{}", target.month(), target.year()))?;
    debug!("Month ({}, {}) selected", target.month(), target.year());

    let cells = read_calendar(session, site, target, timeout)?;
    let Some(stay) = select_stay(&cells)? else {
        info!("No matching date found");
        return Ok(None);
    };

    let arrival = stay.arrival.date()?;
    info!("Dates {} and {} selected", arrival, stay.departure);
    click_stay_dates(session, site, &stay, timeout)?;

    session
        .click(&site.next_step_button, ClickMode::Script, timeout)
        .context("Failed to request the offers")?;
    session
        .wait_for(&site.room_list, timeout)
        .context("Room offers did not load")?;

    let html = session.page_html()?;
    let offers = extract_offers(&html, &site.room_selectors, today, arrival)?;
    if offers.is_empty() {
        warn!("No valid room offers on the result page");
        return Ok(None);
    }

    let table = OfferTable::aggregate(&offers);
    info!(
        "Scraped {} offers, {} distinct rooms",
        offers.len(),
        table.len()
    );
    Ok(Some(table))
}

fn read_calendar<S: BrowserSession>(
    session: &S,
    site: &SiteSettings,
    target: NaiveDate,
    timeout: Duration,
) -> Result<Vec<DayCell>> {
    let days_xpath = SchemeFill::new(&site.calendar_day_scheme)
        .month_of(target)
        .fill()?;
    let cells = session
        .snapshot_all(&days_xpath, timeout)
        .context("Failed to read the calendar")?
        .iter()
        .map(|snapshot| day_cell_from_snapshot(snapshot, site))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Calendar has {} days, {} available",
        cells.len(),
        cells.iter().filter(|cell| cell.available).count()
    );
    Ok(cells)
}

/// Click arrival, then departure. Changes the calendar state of `session`.
fn click_stay_dates<S: BrowserSession>(
    session: &S,
    site: &SiteSettings,
    stay: &StayCandidate,
    timeout: Duration,
) -> Result<()> {
    let arrival = stay.arrival;
    let arrival_xpath = SchemeFill::new(&site.arrival_scheme)
        .year(arrival.year)
        .month(arrival.month)
        .day(arrival.day)
        .fill()?;
    session
        .click(&arrival_xpath, ClickMode::Script, timeout)
        .context("Failed to click the arrival date")?;
    debug!("Arrival clicked");

    let departure_xpath = SchemeFill::new(&site.departure_scheme)
        .date(stay.departure)
        .fill()?;
    let departure = session
        .click(&departure_xpath, ClickMode::Script, timeout)
        .context("Failed to click the departure date")?;
    debug!(
        "Departure clicked: {} ({})",
        departure.attribute(&site.title_attribute).unwrap_or("-"),
        departure.text.trim()
    );
    Ok(())
}
