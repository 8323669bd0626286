// src/specs/scorecard.rs
//
// One scorecard page → one MatchRecord.
//
// Tables don't say what they are; the innings header text does ("Batting",
// "Bowling"). The last marker seen decides how following unmarked tables
// are read, so a split innings still lands in the right bucket.
//
// Batting rows (7 or 8 <td>):
//   0 name | 1 dismissal | 2 R | 3 B | [4 M] | 4/5 4s | 5/6 6s | 6/7 SR
// Bowling rows (5+ <td>):
//   0 name | 1 O | 2 M | 3 R | 4 W | 5 Econ | 6 0s | 7 4s | 8 6s | 9 WD | 10 NB

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::core::html::{self, TABLE};
use crate::core::sanitize::{clean_player_name, clean_text, leading_int};
use crate::data::{MatchRecord, RawBattingEntry, RawBowlingEntry};
use crate::specs::dismissal::{self, FieldingTally};

static OVERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("invalid regex: overs"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    Batting,
    Bowling,
    Unknown,
}

impl TableKind {
    /// Marker found in a table's text, if any. Bowling wins when both appear.
    pub fn from_marker(text: &str) -> Option<Self> {
        let lc = text.to_lowercase();
        if lc.contains("bowling") {
            Some(Self::Bowling)
        } else if lc.contains("batting") {
            Some(Self::Batting)
        } else {
            None
        }
    }
}

/// Sticky classification across the tables of one page.
#[derive(Debug)]
pub struct TableClassifier {
    current: TableKind,
}

impl Default for TableClassifier {
    fn default() -> Self {
        Self { current: TableKind::Unknown }
    }
}

impl TableClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the next table; unmarked tables inherit the previous kind.
    pub fn classify(&mut self, table_text: &str) -> TableKind {
        if let Some(kind) = TableKind::from_marker(table_text) {
            self.current = kind;
        }
        self.current
    }
}

/// Column positions for the two batting layouts.
struct BattingLayout {
    mins: Option<usize>,
    fours: usize,
    sixes: usize,
    sr: usize,
}

impl BattingLayout {
    fn for_cells(n: usize) -> Option<Self> {
        match n {
            7 => Some(Self { mins: None, fours: 4, sixes: 5, sr: 6 }),
            8 => Some(Self { mins: Some(4), fours: 5, sixes: 6, sr: 7 }),
            _ => None,
        }
    }
}

/// Parse a scorecard page. Never fails: unreadable rows are skipped.
pub fn parse_doc(html_doc: &str, match_url: &str) -> MatchRecord {
    let doc = Html::parse_document(html_doc);

    let mut out = MatchRecord::empty(match_url);
    let mut fielding = FieldingTally::new();
    let mut classifier = TableClassifier::new();

    for table in doc.select(&TABLE) {
        let kind = classifier.classify(&html::text_of(table));
        if kind == TableKind::Unknown {
            continue;
        }

        for row in html::body_rows(table) {
            let cells = html::cells(row);
            match kind {
                TableKind::Batting => {
                    if let Some(entry) = batting_row(&cells, &mut fielding) {
                        out.batting.push(entry);
                    }
                }
                TableKind::Bowling => {
                    if let Some(entry) = bowling_row(&cells) {
                        out.bowling.push(entry);
                    }
                }
                TableKind::Unknown => {}
            }
        }
    }

    out.fielding = fielding.into_credits();
    debug!(
        "{}: {} batting, {} bowling, {} fielding",
        match_url,
        out.batting.len(),
        out.bowling.len(),
        out.fielding.len()
    );
    out
}

fn cell(cells: &[ElementRef<'_>], i: usize) -> String {
    cells.get(i).map(|c| clean_text(&html::text_of(*c))).unwrap_or_default()
}

fn batting_row(cells: &[ElementRef<'_>], fielding: &mut FieldingTally) -> Option<RawBattingEntry> {
    let layout = BattingLayout::for_cells(cells.len())?;

    let player = clean_player_name(&html::text_of(cells[0]));
    let runs_text = cell(cells, 2);
    let runs = match leading_int(&runs_text) {
        Some(r) if !player.is_empty() => r,
        _ => {
            debug!("Batting: skip row (player={:?}, runs={:?})", player, runs_text);
            return None;
        }
    };

    let dismissal_cell = cells[1];
    let dismissal = clean_text(&html::text_of(dismissal_cell));
    fielding.record(&dismissal::parse(&dismissal, &html::links(dismissal_cell)));

    Some(RawBattingEntry {
        url: html::first_href(cells[0]),
        player,
        dismissal,
        runs,
        balls: cell(cells, 3),
        mins: layout.mins.map(|i| cell(cells, i)).unwrap_or_default(),
        fours: cell(cells, layout.fours),
        sixes: cell(cells, layout.sixes),
        sr: cell(cells, layout.sr),
    })
}

fn bowling_row(cells: &[ElementRef<'_>]) -> Option<RawBowlingEntry> {
    if cells.len() < 5 {
        return None;
    }

    let bowler = clean_player_name(&html::text_of(cells[0]));
    let overs = cell(cells, 1);
    let runs = cell(cells, 3);
    let wickets = cell(cells, 4);
    if bowler.is_empty() || !OVERS.is_match(&overs) || runs.is_empty() || wickets.is_empty() {
        debug!("Bowling: skip row (bowler={:?}, overs={:?})", bowler, overs);
        return None;
    }

    Some(RawBowlingEntry {
        url: html::first_href(cells[0]),
        bowler,
        overs,
        maidens: cell(cells, 2),
        runs,
        wickets,
        economy: cell(cells, 5),
        dots: cell(cells, 6),
        fours: cell(cells, 7),
        sixes: cell(cells, 8),
        wides: cell(cells, 9),
        noballs: cell(cells, 10),
    })
}
