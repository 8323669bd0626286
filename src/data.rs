// src/data.rs
//
// Scraper-side records. Everything here is "as scraped": names are cleaned
// but unresolved, and stat columns other than batting runs keep the cell
// text so the aggregator decides how to read them.
//
// JSON shape: { url, matches: [ { url, batting, bowling, fielding } ] }

use serde::{Deserialize, Serialize};

/// One accepted row of a batting table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBattingEntry {
    pub player: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub dismissal: String,
    pub runs: u32,
    pub balls: String,
    /// Minutes at the crease; empty for the 7-column layout.
    pub mins: String,
    pub fours: String,
    pub sixes: String,
    pub sr: String,
}

/// One accepted row of a bowling table. Trailing columns stay empty when
/// the table doesn't have them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBowlingEntry {
    pub bowler: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub overs: String,
    pub maidens: String,
    pub runs: String,
    pub wickets: String,
    pub economy: String,
    pub dots: String,
    pub fours: String,
    pub sixes: String,
    pub wides: String,
    pub noballs: String,
}

/// Fielding credit derived from dismissal text; never read from a table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFieldingCredit {
    pub player: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub catches: u32,
    pub runouts: u32,
    pub stumpings: u32,
}

/// Everything scraped from one scorecard page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRecord {
    pub url: String,
    pub batting: Vec<RawBattingEntry>,
    pub bowling: Vec<RawBowlingEntry>,
    pub fielding: Vec<RawFieldingCredit>,
}

impl MatchRecord {
    /// The degraded record used when a page can't be fetched or read.
    pub fn empty(url: &str) -> Self {
        Self { url: s!(url), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.batting.is_empty() && self.bowling.is_empty() && self.fielding.is_empty()
    }
}

/// Scraper output for one series, matches in scrape order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Series {
    pub url: String,
    pub matches: Vec<MatchRecord>,
}

impl Series {
    pub fn new(url: &str) -> Self {
        Self { url: s!(url), matches: Vec::new() }
    }
}
