// src/aggregate.rs
//
// Series → one cumulative record per player.
//
// Output JSON (camelCase, players sorted by key):
// { tournament, totalMatches, players: { "<name>": { fullName, lastName, profileUrl?,
//   matches, batting, bowling, fielding, totals } } }

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::sanitize::{int_or_zero, last_token};
use crate::data::{RawBattingEntry, RawBowlingEntry, RawFieldingCredit, Series};
use crate::resolve::{Identity, NameIndex, Resolution, ResolvedBy};
use crate::specs::dismissal::is_not_out;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BattingLine {
    pub match_url: String,
    pub match_number: usize,
    pub runs: u32,
    pub balls: String,
    pub mins: String,
    pub fours: String,
    pub sixes: String,
    pub sr: String,
    pub dismissal: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BowlingLine {
    pub match_url: String,
    pub match_number: usize,
    pub overs: String,
    pub maidens: String,
    pub runs: String,
    pub wickets: String,
    pub economy: String,
    pub dots: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldingLine {
    pub match_url: String,
    pub match_number: usize,
    pub catches: u32,
    pub runouts: u32,
    pub stumpings: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Totals {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub innings: u32,
    pub not_outs: u32,
    pub wickets: u32,
    pub runs_conceded: u32,
    pub maidens: u32,
    pub dots: u32,
    /// Cricket notation (`overs.balls`) of `legal_balls`.
    pub overs: String,
    pub catches: u32,
    pub runouts: u32,
    pub stumpings: u32,
    #[serde(skip)]
    legal_balls: u32,
}

impl Totals {
    fn add_batting(&mut self, b: &RawBattingEntry) {
        self.runs = self.runs.saturating_add(b.runs);
        self.balls = self.balls.saturating_add(int_or_zero(&b.balls));
        self.fours = self.fours.saturating_add(int_or_zero(&b.fours));
        self.sixes = self.sixes.saturating_add(int_or_zero(&b.sixes));
        self.innings = self.innings.saturating_add(1);
        if is_not_out(&b.dismissal) {
            self.not_outs = self.not_outs.saturating_add(1);
        }
    }

    fn add_bowling(&mut self, b: &RawBowlingEntry) {
        self.wickets = self.wickets.saturating_add(int_or_zero(&b.wickets));
        self.runs_conceded = self.runs_conceded.saturating_add(int_or_zero(&b.runs));
        self.maidens = self.maidens.saturating_add(int_or_zero(&b.maidens));
        self.dots = self.dots.saturating_add(int_or_zero(&b.dots));
        self.legal_balls = self.legal_balls.saturating_add(overs_to_balls(&b.overs));
        self.overs = balls_to_overs(self.legal_balls);
    }

    fn add_fielding(&mut self, f: &RawFieldingCredit) {
        self.catches = self.catches.saturating_add(f.catches);
        self.runouts = self.runouts.saturating_add(f.runouts);
        self.stumpings = self.stumpings.saturating_add(f.stumpings);
    }
}

/// `"3.2"` → 20 legal balls. Junk, or a count too large to hold, reads as zero.
pub fn overs_to_balls(overs: &str) -> u32 {
    let (whole, part) = overs.trim().split_once('.').unwrap_or((overs.trim(), ""));
    let balls = int_or_zero(whole).checked_mul(6).and_then(|b| b.checked_add(int_or_zero(part)));
    balls.unwrap_or_else(|| {
        debug!("Overs {overs:?} out of range, counted as 0");
        0
    })
}

/// 20 legal balls → `"3.2"`.
pub fn balls_to_overs(balls: u32) -> String {
    format!("{}.{}", balls / 6, balls % 6)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerAggregate {
    pub full_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    pub matches: Vec<String>,
    pub batting: Vec<BattingLine>,
    pub bowling: Vec<BowlingLine>,
    pub fielding: Vec<FieldingLine>,
    pub totals: Totals,
}

impl PlayerAggregate {
    fn new(name: &str, profile_url: Option<&str>) -> Self {
        Self {
            full_name: s!(name),
            last_name: s!(last_token(name)),
            profile_url: profile_url.map(String::from),
            totals: Totals { overs: balls_to_overs(0), ..Totals::default() },
            ..Self::default()
        }
    }

    fn played(&mut self, match_url: &str) {
        if !self.matches.iter().any(|m| m == match_url) {
            self.matches.push(s!(match_url));
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TournamentStats {
    pub tournament: String,
    pub total_matches: usize,
    pub players: BTreeMap<String, PlayerAggregate>,
}

/// A surname lookup that had more than one plausible owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbiguousName {
    pub match_number: usize,
    pub raw_name: String,
    pub chosen: String,
    pub rivals: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Aggregation {
    pub stats: TournamentStats,
    /// For operator review; the stats already use the top-ranked pick.
    pub ambiguous: Vec<AmbiguousName>,
}

struct Folder<'a> {
    index: &'a NameIndex,
    players: BTreeMap<Identity, PlayerAggregate>,
    ambiguous: Vec<AmbiguousName>,
}

impl<'a> Folder<'a> {
    fn player(&mut self, raw: &str, url: Option<&str>, match_number: usize) -> Option<&mut PlayerAggregate> {
        let Resolution { identity, name, by } = self.index.resolve(raw, url)?;
        if let ResolvedBy::Surname { rivals } = by {
            if !rivals.is_empty() {
                warn!("Match {match_number}: {raw:?} could be {name} or {}", rivals.join(", "));
                self.ambiguous.push(AmbiguousName {
                    match_number,
                    raw_name: s!(raw),
                    chosen: name.clone(),
                    rivals,
                });
            }
        }
        let profile_url = self.index.profile_url(&identity);
        Some(
            self.players
                .entry(identity)
                .or_insert_with(|| PlayerAggregate::new(&name, profile_url)),
        )
    }
}

/// Resolve every name against the whole series, then fold the matches in
/// scrape order.
pub fn aggregate(series: &Series) -> Aggregation {
    let index = NameIndex::build(series);
    let mut folder = Folder { index: &index, players: BTreeMap::new(), ambiguous: Vec::new() };

    for (i, m) in series.matches.iter().enumerate() {
        let number = i + 1;
        for b in &m.batting {
            let Some(p) = folder.player(&b.player, b.url.as_deref(), number) else { continue };
            p.totals.add_batting(b);
            p.batting.push(BattingLine {
                match_url: m.url.clone(),
                match_number: number,
                runs: b.runs,
                balls: b.balls.clone(),
                mins: b.mins.clone(),
                fours: b.fours.clone(),
                sixes: b.sixes.clone(),
                sr: b.sr.clone(),
                dismissal: b.dismissal.clone(),
            });
            p.played(&m.url);
        }
        for b in &m.bowling {
            let Some(p) = folder.player(&b.bowler, b.url.as_deref(), number) else { continue };
            p.totals.add_bowling(b);
            p.bowling.push(BowlingLine {
                match_url: m.url.clone(),
                match_number: number,
                overs: b.overs.clone(),
                maidens: b.maidens.clone(),
                runs: b.runs.clone(),
                wickets: b.wickets.clone(),
                economy: b.economy.clone(),
                dots: b.dots.clone(),
            });
            p.played(&m.url);
        }
        for f in &m.fielding {
            let Some(p) = folder.player(&f.player, f.url.as_deref(), number) else { continue };
            p.totals.add_fielding(f);
            p.fielding.push(FieldingLine {
                match_url: m.url.clone(),
                match_number: number,
                catches: f.catches,
                runouts: f.runouts,
                stumpings: f.stumpings,
            });
            p.played(&m.url);
        }
    }

    let Folder { players, ambiguous, .. } = folder;
    let players = key_by_name(players);
    info!(
        "Aggregated {} players from {} matches ({} ambiguous names)",
        players.len(),
        series.matches.len(),
        ambiguous.len()
    );

    Aggregation {
        stats: TournamentStats {
            tournament: series.url.clone(),
            total_matches: series.matches.len(),
            players,
        },
        ambiguous,
    }
}

/// Display names become keys. Two people sharing one get their profile ID
/// appended so neither swallows the other.
fn key_by_name(players: BTreeMap<Identity, PlayerAggregate>) -> BTreeMap<String, PlayerAggregate> {
    let mut uses: HashMap<String, usize> = HashMap::new();
    for p in players.values() {
        *uses.entry(p.full_name.clone()).or_default() += 1;
    }

    players
        .into_iter()
        .map(|(identity, p)| {
            let shared = uses.get(&p.full_name).copied().unwrap_or(0) > 1;
            let key = match identity {
                Identity::Profile(id) if shared => format!("{} ({id})", p.full_name),
                _ => p.full_name.clone(),
            };
            (key, p)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MatchRecord;

    fn bat(name: &str, url: Option<&str>, runs: u32, dismissal: &str) -> RawBattingEntry {
        RawBattingEntry {
            player: s!(name),
            url: url.map(String::from),
            dismissal: s!(dismissal),
            runs,
            balls: s!("20"),
            fours: s!("2"),
            sixes: s!("1"),
            sr: s!("100.00"),
            ..Default::default()
        }
    }

    fn bowl(name: &str, overs: &str, runs: &str, wickets: &str) -> RawBowlingEntry {
        RawBowlingEntry {
            bowler: s!(name),
            overs: s!(overs),
            maidens: s!("0"),
            runs: s!(runs),
            wickets: s!(wickets),
            ..Default::default()
        }
    }

    fn catch(name: &str) -> RawFieldingCredit {
        RawFieldingCredit { player: s!(name), catches: 1, ..Default::default() }
    }

    fn record(url: &str, batting: Vec<RawBattingEntry>, bowling: Vec<RawBowlingEntry>, fielding: Vec<RawFieldingCredit>) -> MatchRecord {
        MatchRecord { url: s!(url), batting, bowling, fielding }
    }

    fn series(matches: Vec<MatchRecord>) -> Series {
        Series { url: s!("https://example.org/series/cup-2024-1"), matches }
    }

    #[test]
    fn same_profile_different_spelling_sums() {
        let s = series(vec![
            record("m1", vec![bat("A. Smith", Some("/cricketers/alan-smith-42"), 40, "b Jones")], vec![], vec![]),
            record("m2", vec![bat("Alan Smith", Some("/cricketers/alan-smith-42"), 15, "not out")], vec![], vec![]),
        ]);
        let stats = aggregate(&s).stats;
        assert_eq!(stats.players.len(), 1);
        let p = &stats.players["Alan Smith"];
        assert_eq!(p.totals.runs, 55);
        assert_eq!(p.totals.innings, 2);
        assert_eq!(p.totals.not_outs, 1);
        assert_eq!(p.matches, vec!["m1", "m2"]);
        assert_eq!(p.batting[1].match_number, 2);
        assert_eq!(p.profile_url.as_deref(), Some("/cricketers/alan-smith-42"));
        assert_eq!(p.last_name, "Smith");
    }

    #[test]
    fn fielder_only_player_gets_a_record() {
        let s = series(vec![record("m1", vec![bat("Joe Root", None, 5, "c Outsider b X")], vec![], vec![catch("Outsider")])]);
        let stats = aggregate(&s).stats;
        let p = &stats.players["Outsider"];
        assert_eq!(p.totals.catches, 1);
        assert_eq!(p.totals.runs, 0);
        assert_eq!(p.totals.wickets, 0);
        assert!(p.batting.is_empty() && p.bowling.is_empty());
        assert_eq!(p.fielding[0].match_url, "m1");
    }

    #[test]
    fn fielder_resolves_against_name_seen_in_later_match() {
        let s = series(vec![
            record("m1", vec![], vec![], vec![catch("Williamson")]),
            record("m2", vec![bat("Kane Williamson", None, 70, "b X")], vec![], vec![]),
        ]);
        let stats = aggregate(&s).stats;
        assert_eq!(stats.players.len(), 1);
        let p = &stats.players["Kane Williamson"];
        assert_eq!(p.totals.catches, 1);
        assert_eq!(p.totals.runs, 70);
        assert_eq!(p.matches, vec!["m1", "m2"]);
    }

    #[test]
    fn bowling_sums_overs_as_balls() {
        let s = series(vec![
            record("m1", vec![], vec![bowl("Trent Boult", "3.4", "22", "2")], vec![]),
            record("m2", vec![], vec![bowl("Trent Boult", "4", "30", "1"), bowl("Junk", "x", "-", "")], vec![]),
        ]);
        let stats = aggregate(&s).stats;
        let t = &stats.players["Trent Boult"].totals;
        assert_eq!(t.overs, "7.4");
        assert_eq!(t.runs_conceded, 52);
        assert_eq!(t.wickets, 3);
        assert_eq!(stats.players["Junk"].totals.overs, "0.0");
    }

    #[test]
    fn empty_match_only_counts_towards_total() {
        let one = record("m1", vec![bat("Joe Root", None, 50, "b X")], vec![], vec![]);
        let with_gap = series(vec![one.clone(), MatchRecord::empty("m2")]);
        let without = series(vec![one]);
        let a = aggregate(&with_gap).stats;
        let b = aggregate(&without).stats;
        assert_eq!(a.total_matches, 2);
        assert_eq!(a.players, b.players);
    }

    #[test]
    fn output_is_deterministic() {
        let s = series(vec![
            record(
                "m1",
                vec![bat("Zed Alpha", None, 1, "c Beta b Gamma"), bat("Amy Beta", None, 2, "run out (Alpha/Beta)")],
                vec![bowl("Cal Gamma", "2.0", "10", "1")],
                vec![catch("Beta"), catch("Alpha")],
            ),
        ]);
        let a = serde_json::to_string_pretty(&aggregate(&s).stats).unwrap();
        let b = serde_json::to_string_pretty(&aggregate(&s).stats).unwrap();
        assert_eq!(a, b);
        let keys: Vec<_> = aggregate(&s).stats.players.into_keys().collect();
        assert_eq!(keys, vec!["Amy Beta", "Cal Gamma", "Zed Alpha"]);
    }

    #[test]
    fn camel_case_json_shape() {
        let s = series(vec![record("m1", vec![bat("Joe Root", None, 5, "not out")], vec![], vec![])]);
        let json = serde_json::to_value(aggregate(&s).stats).unwrap();
        assert_eq!(json["totalMatches"], 1);
        let p = &json["players"]["Joe Root"];
        assert_eq!(p["fullName"], "Joe Root");
        assert_eq!(p["totals"]["notOuts"], 1);
        assert_eq!(p["batting"][0]["matchNumber"], 1);
        assert!(p.get("profileUrl").is_none());
        assert!(p["totals"].get("legalBalls").is_none());
    }

    #[test]
    fn ambiguous_surnames_are_reported() {
        let s = series(vec![record(
            "m1",
            vec![bat("Steve Smith", None, 1, "b X"), bat("Graeme Smith", None, 1, "b X")],
            vec![],
            vec![catch("Smith")],
        )]);
        let agg = aggregate(&s);
        assert_eq!(agg.ambiguous.len(), 1);
        let a = &agg.ambiguous[0];
        assert_eq!(a.raw_name, "Smith");
        assert_eq!(a.chosen, "Graeme Smith");
        assert_eq!(a.rivals, vec!["Steve Smith"]);
        assert_eq!(agg.stats.players["Graeme Smith"].totals.catches, 1);
    }

    #[test]
    fn shared_display_names_are_kept_apart() {
        let s = series(vec![record(
            "m1",
            vec![
                bat("Mohammad Nabi", Some("/c/mohammad-nabi-25913"), 10, "b X"),
                bat("Mohammad Nabi", Some("/c/mohammad-nabi-99999"), 20, "b X"),
            ],
            vec![],
            vec![],
        )]);
        let stats = aggregate(&s).stats;
        assert_eq!(stats.players.len(), 2);
        assert_eq!(stats.players["Mohammad Nabi (25913)"].totals.runs, 10);
        assert_eq!(stats.players["Mohammad Nabi (99999)"].totals.runs, 20);
    }

    #[test]
    fn overs_notation() {
        assert_eq!(overs_to_balls("3.2"), 20);
        assert_eq!(overs_to_balls("4"), 24);
        assert_eq!(overs_to_balls(""), 0);
        assert_eq!(balls_to_overs(20), "3.2");
        assert_eq!(balls_to_overs(24), "4.0");
        assert_eq!(overs_to_balls("800000000"), 0);
        assert_eq!(overs_to_balls("715827882.5"), 0);
    }

    #[test]
    fn oversized_numbers_do_not_abort_the_batch() {
        let s = series(vec![
            record(
                "m1",
                vec![bat("Joe Root", None, 4_000_000_000, "b X")],
                vec![bowl("Trent Boult", "4", "30", "2"), bowl("Bogus Bowler", "800000000", "10", "1")],
                vec![],
            ),
            record("m2", vec![bat("Joe Root", None, 4_000_000_000, "b X")], vec![], vec![]),
        ]);
        let stats = aggregate(&s).stats;

        let boult = &stats.players["Trent Boult"].totals;
        assert_eq!(boult.overs, "4.0");
        assert_eq!(boult.runs_conceded, 30);
        assert_eq!(boult.wickets, 2);

        assert_eq!(stats.players["Bogus Bowler"].totals.overs, "0.0");
        assert_eq!(stats.players["Joe Root"].totals.runs, u32::MAX);
    }
}
