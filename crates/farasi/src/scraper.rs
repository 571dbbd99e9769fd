use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Days, Local, NaiveDate};
use reqwest::Client;

use crate::parser::extract_racecard;
use crate::types::{RaceCardDocument, RaceCardRequest};
use crate::writer::write_racecard;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct RacecardScraper {
    client: Client,
    base_url: String,
}

impl RacecardScraper {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: crate::BASE_URL.to_string(),
        })
    }

    /// Expand venues and a day window into fetch requests, date-major and
    /// venue-minor, so a run over a fixed start date is fully reproducible.
    pub fn requests(venues: &[u32], days_ahead: u32, start: NaiveDate) -> Vec<RaceCardRequest> {
        let mut out = Vec::with_capacity(venues.len() * days_ahead as usize);
        for delta in 0..days_ahead {
            let Some(date) = start.checked_add_days(Days::new(u64::from(delta))) else {
                continue;
            };
            for &venue in venues {
                out.push(RaceCardRequest { venue, date });
            }
        }
        out
    }

    /// Fetch and extract a single racecard page. `Ok(None)` means the page
    /// was retrieved but carries no races.
    pub async fn fetch_racecard(
        &self,
        request: &RaceCardRequest,
    ) -> Result<Option<RaceCardDocument>, ScraperError> {
        let url = request.url(&self.base_url);
        log::info!("Fetching {}", url);
        let html = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(extract_racecard(&html, &request.date_label()))
    }

    /// Fetch every (venue, date) combination starting today and save each
    /// extracted racecard under `out_dir`. Returns the written paths.
    pub async fn fetch_racecards(
        &self,
        venues: &[u32],
        days_ahead: u32,
        out_dir: &Path,
    ) -> Vec<PathBuf> {
        let requests = Self::requests(venues, days_ahead, Local::now().date_naive());
        self.run(&requests, out_dir).await
    }

    /// Process requests sequentially. A failed fetch or write only costs
    /// that combination its output file; the rest of the batch continues.
    pub async fn run(&self, requests: &[RaceCardRequest], out_dir: &Path) -> Vec<PathBuf> {
        let mut saved = Vec::new();
        for request in requests {
            match self.fetch_racecard(request).await {
                Ok(Some(document)) => match write_racecard(out_dir, &document) {
                    Ok(path) => saved.push(path),
                    Err(e) => log::warn!(
                        "Could not write racecard for venue {} on {}: {}",
                        request.venue,
                        request.date,
                        e
                    ),
                },
                Ok(None) => log::info!(
                    "No racecard for venue {} on {}",
                    request.venue,
                    request.date
                ),
                Err(e) => log::warn!(
                    "Request failed for venue {} on {}: {}",
                    request.venue,
                    request.date,
                    e
                ),
            }
        }
        saved
    }
}
