// src/scrape/crawl.rs
use std::{thread, time::Duration};

use tracing::{error, info, warn};

use crate::{
    config::options::ScrapeOptions,
    core::net::Fetch,
    data::{MatchRecord, Series},
    error::Result,
    progress::Progress,
    specs::{scorecard, series::{self, SeriesRef}},
};

/// Drives one series scrape: index page, then every match page in order,
/// one request at a time with a fixed pause in between.
pub struct Crawler<F: Fetch> {
    fetcher: F,
    base_url: String,
    pause: Duration,
}

impl<F: Fetch> Crawler<F> {
    pub fn new(fetcher: F, opts: &ScrapeOptions) -> Self {
        Self {
            fetcher,
            base_url: opts.base_url.clone(),
            pause: opts.pause(),
        }
    }

    /// Scrape every match of the series `url` belongs to.
    ///
    /// A missing/unparseable series URL or a failed index fetch returns the
    /// series with no matches. A failed match page becomes an empty record.
    pub fn scrape_series(&self, url: &str, mut progress: Option<&mut dyn Progress>) -> Series {
        let mut out = Series::new(url);
        if url.trim().is_empty() {
            warn!("No series URL given; nothing to scrape");
            return out;
        }

        let series_ref = match SeriesRef::parse(url) {
            Ok(s) => s,
            Err(e) => {
                error!("{e}");
                return out;
            }
        };

        let index_url = series_ref.results_url(&self.base_url);
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Fetching results index {index_url}"));
        }
        let index_html = match self.fetcher.get(&index_url) {
            Ok(html) => html,
            Err(e) => {
                error!("Results index {index_url}: {e}");
                if let Some(p) = progress.as_deref_mut() {
                    p.finish();
                }
                return out;
            }
        };

        let match_urls = series::match_links(&index_html, &series_ref, &self.base_url);
        info!("Series {}-{}: {} matches", series_ref.slug, series_ref.id, match_urls.len());
        if let Some(p) = progress.as_deref_mut() {
            p.begin(match_urls.len());
        }

        for (i, match_url) in match_urls.iter().enumerate() {
            if i > 0 {
                self.wait();
            }
            let number = i + 1;
            match self.fetch_match(match_url) {
                Ok(record) => {
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_done(number, match_url);
                    }
                    out.matches.push(record);
                }
                Err(e) => {
                    warn!("Match {number} {match_url}: {e}");
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(number, match_url);
                    }
                    out.matches.push(MatchRecord::empty(match_url));
                }
            }
        }

        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        out
    }

    /// Scrape a single scorecard page; failures degrade to an empty record.
    pub fn scrape_match(&self, url: &str) -> MatchRecord {
        self.fetch_match(url).unwrap_or_else(|e| {
            warn!("Match {url}: {e}");
            MatchRecord::empty(url)
        })
    }

    fn fetch_match(&self, url: &str) -> Result<MatchRecord> {
        let html = self.fetcher.get(url)?;
        Ok(scorecard::parse_doc(&html, url))
    }

    fn wait(&self) {
        if !self.pause.is_zero() {
            thread::sleep(self.pause); // be polite
        }
    }
}
