// src/specs/series.rs
//
// Series identity from a URL, and match-link discovery on the results index.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::Html;
use tracing::debug;

use crate::config::consts::{RESULTS_PATH, SCORECARD_MARKERS};
use crate::core::html::LINK;
use crate::error::{Error, Result};

static SERIES_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/series/([^/]+)-(\d+)").expect("invalid regex: series path")
});

/// `/series/<slug>-<id>` as parsed from any URL inside the series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesRef {
    pub slug: String,
    pub id: String,
}

impl SeriesRef {
    pub fn parse(url: &str) -> Result<Self> {
        let caps = SERIES_PATH
            .captures(url)
            .ok_or_else(|| Error::Parse(format!("No /series/<slug>-<id> in {url:?}")))?;
        Ok(Self { slug: caps[1].to_string(), id: caps[2].to_string() })
    }

    /// Results index for this series on the given origin.
    pub fn results_url(&self, base_url: &str) -> String {
        join!(base_url.trim_end_matches('/'), "/series/", &self.slug, "-", &self.id, RESULTS_PATH)
    }

    /// A scorecard link that belongs to this series.
    pub fn owns_scorecard(&self, href: &str) -> bool {
        SCORECARD_MARKERS.iter().any(|m| href.contains(m))
            && href.contains(&self.slug)
            && href.contains(&self.id)
    }
}

/// Absolute, de-duplicated scorecard URLs for the series, first-seen order.
pub fn match_links(html_doc: &str, series: &SeriesRef, base_url: &str) -> Vec<String> {
    let doc = Html::parse_document(html_doc);
    let base = Url::parse(base_url).ok();

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for a in doc.select(&LINK) {
        let Some(href) = a.value().attr("href").map(str::trim) else { continue };
        if !series.owns_scorecard(href) {
            continue;
        }
        let full = absolutize(href, base.as_ref(), base_url);
        if seen.insert(full.clone()) {
            out.push(full);
        }
    }
    debug!("Series {}-{}: {} match links", series.slug, series.id, out.len());
    out
}

fn absolutize(href: &str, base: Option<&Url>, base_url: &str) -> String {
    if href.starts_with("http") {
        return s!(href);
    }
    match base.and_then(|b| b.join(href).ok()) {
        Some(u) => u.to_string(),
        None => join!(base_url.trim_end_matches('/'), "/", href.trim_start_matches('/')),
    }
}
