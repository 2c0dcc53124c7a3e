//! Runs the offer scrape for the short-term and the early-booking horizon
//! side by side and merges the two tables.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tokio::sync::Semaphore;
use tracing::{error, info, info_span, Instrument};

use crate::report::{combine, OfferTable, ScrapeOutcome};
use crate::scrapers::traits::OfferScraper;
use crate::scrapers::types::Horizon;

/// Scrape both horizons concurrently, at most `workers` at a time.
///
/// Each horizon reports through its own task handle. A failing horizon is
/// logged and treated as having found nothing; only when both fail is the
/// run an error.
pub async fn scrape_horizons(
    scraper: Arc<dyn OfferScraper>,
    short_term: Horizon,
    early_booking: Horizon,
    today: NaiveDate,
    workers: usize,
) -> Result<ScrapeOutcome> {
    let permits = Arc::new(Semaphore::new(workers.max(1)));

    let short_task = spawn_horizon(Arc::clone(&scraper), short_term.clone(), today, Arc::clone(&permits));
    let early_task = spawn_horizon(scraper, early_booking.clone(), today, permits);

    let (short_result, early_result) = tokio::join!(short_task, early_task);
    let short_result = short_result.context("Short-term task panicked")?;
    let early_result = early_result.context("Early-booking task panicked")?;

    match (short_result, early_result) {
        (Err(short_err), Err(early_err)) => {
            error!(horizon = %short_term.name, "{:#}", short_err);
            error!(horizon = %early_booking.name, "{:#}", early_err);
            anyhow::bail!("Both horizons failed: {:#}", early_err)
        }
        (short_result, early_result) => Ok(combine(
            settle(&short_term, short_result),
            settle(&early_booking, early_result),
        )),
    }
}

fn spawn_horizon(
    scraper: Arc<dyn OfferScraper>,
    horizon: Horizon,
    today: NaiveDate,
    permits: Arc<Semaphore>,
) -> tokio::task::JoinHandle<Result<Option<OfferTable>>> {
    let span = info_span!(
        "horizon",
        name = %horizon.name,
        months = horizon.month_offset,
        source = scraper.source_name()
    );
    tokio::spawn(
        async move {
            let _permit = permits
                .acquire_owned()
                .await
                .context("Worker pool closed")?;
            info!("Scrape started");
            let table = scraper.scrape(&horizon, today).await?;
            match &table {
                Some(table) => info!("Found {} offers", table.len()),
                None => info!("No stay available"),
            }
            Ok(table)
        }
        .instrument(span),
    )
}

/// Turn one horizon's result into an optional table, logging failures
fn settle(horizon: &Horizon, result: Result<Option<OfferTable>>) -> Option<OfferTable> {
    match result {
        Ok(table) => table,
        Err(err) => {
            error!(horizon = %horizon.name, "Scrape failed: {:#}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::models::{BookingPeriod, RoomOffer};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    enum Canned {
        Offers { early: bool, delay_ms: u64 },
        Nothing,
        Fail,
    }

    /// Answers per month offset without touching a browser
    struct CannedScraper {
        answers: HashMap<u32, Canned>,
    }

    #[async_trait]
    impl OfferScraper for CannedScraper {
        async fn scrape(&self, horizon: &Horizon, today: NaiveDate) -> Result<Option<OfferTable>> {
            match &self.answers[&horizon.month_offset] {
                Canned::Offers { early, delay_ms } => {
                    tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                    let offers = [
                        RoomOffer::new("Doppelzimmer", 30, 200, *early, today)?,
                        RoomOffer::new("Suite", 60, 500, *early, today)?,
                    ];
                    Ok(Some(OfferTable::aggregate(&offers)))
                }
                Canned::Nothing => Ok(None),
                Canned::Fail => Err(ScrapeError::ElementTimeout {
                    query: "//div".to_string(),
                    timeout_secs: 10,
                }
                .into()),
            }
        }

        fn source_name(&self) -> &'static str {
            "canned"
        }
    }

    async fn run(short: Canned, early: Canned) -> Result<ScrapeOutcome> {
        let scraper = CannedScraper {
            answers: HashMap::from([(1, short), (6, early)]),
        };
        scrape_horizons(
            Arc::new(scraper),
            Horizon::short_term(1),
            Horizon::early_booking(6),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            2,
        )
        .await
    }

    fn periods(outcome: &ScrapeOutcome) -> Vec<BookingPeriod> {
        match outcome {
            ScrapeOutcome::Offers(table) => table.rows().iter().map(|r| r.booking_period).collect(),
            ScrapeOutcome::NothingFound => Vec::new(),
        }
    }

    #[tokio::test]
    async fn short_term_rows_come_first_even_when_finishing_last() {
        let outcome = run(
            Canned::Offers { early: false, delay_ms: 50 },
            Canned::Offers { early: true, delay_ms: 0 },
        )
        .await
        .unwrap();

        assert_eq!(
            periods(&outcome),
            vec![
                BookingPeriod::ShortTerm,
                BookingPeriod::ShortTerm,
                BookingPeriod::EarlyBooking,
                BookingPeriod::EarlyBooking
            ]
        );
    }

    #[tokio::test]
    async fn one_empty_horizon_passes_the_other_through() {
        let outcome = run(Canned::Nothing, Canned::Offers { early: true, delay_ms: 0 })
            .await
            .unwrap();
        assert_eq!(periods(&outcome), vec![BookingPeriod::EarlyBooking; 2]);
    }

    #[tokio::test]
    async fn one_failing_horizon_is_tolerated() {
        let outcome = run(Canned::Offers { early: false, delay_ms: 0 }, Canned::Fail)
            .await
            .unwrap();
        assert_eq!(periods(&outcome), vec![BookingPeriod::ShortTerm; 2]);
    }

    #[tokio::test]
    async fn no_stays_is_nothing_found() {
        let outcome = run(Canned::Nothing, Canned::Nothing).await.unwrap();
        assert_eq!(outcome, ScrapeOutcome::NothingFound);
    }

    #[tokio::test]
    async fn failure_and_nothing_is_nothing_found() {
        let outcome = run(Canned::Fail, Canned::Nothing).await.unwrap();
        assert_eq!(outcome, ScrapeOutcome::NothingFound);
    }

    #[tokio::test]
    async fn both_failing_is_an_error() {
        assert!(run(Canned::Fail, Canned::Fail).await.is_err());
    }

    #[tokio::test]
    async fn single_worker_still_runs_both() {
        let scraper = CannedScraper {
            answers: HashMap::from([
                (1, Canned::Offers { early: false, delay_ms: 10 }),
                (6, Canned::Offers { early: true, delay_ms: 10 }),
            ]),
        };
        let outcome = scrape_horizons(
            Arc::new(scraper),
            Horizon::short_term(1),
            Horizon::early_booking(6),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            1,
        )
        .await
        .unwrap();
        assert_eq!(periods(&outcome).len(), 4);
    }
}
