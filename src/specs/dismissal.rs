// src/specs/dismissal.rs
//
// Fielding credit hides inside the batting table's dismissal column:
//   "c Smith b Jones"        catch to Smith
//   "c & b Jones"            catch to Jones (cleaned to "c b Jones")
//   "run out (Smith/Jones)"  one run-out each
//   "st Smith b Jones"       stumping to Smith
// Everything else (bowled, lbw, not out, ...) credits no fielder.
// "c" and "st" only count as the opening word, so a keeper's initial
// ("st C Smith") never reads as a catch.
//
// Input is cleaned text (core::sanitize::clean_text), so only letters,
// digits, single spaces, '.', '(', ')' and '/' can appear.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::html::Link;
use crate::core::sanitize::clean_text;
use crate::data::RawFieldingCredit;

static RUN_OUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)run out\s*\((.+)\)").expect("invalid regex: run out")
});

static CAUGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^c\s+(?P<name>.+?)(?P<end>\s+b\s+|\s*\(|$)")
        .expect("invalid regex: caught")
});

static STUMPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^st\s+(?P<name>.+?)(?:\s+b\s+|\s*\(|$)")
        .expect("invalid regex: stumped")
});

static NOT_OUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnot out\b").expect("invalid regex: not out"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissalMode {
    RunOut,
    Caught,
    Stumped,
    Other,
}

/// A fielder named in the dismissal, with a profile link when the cell had one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fielder {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dismissal {
    pub mode: DismissalMode,
    pub fielders: Vec<Fielder>,
}

impl Dismissal {
    /// One credit per fielder, with exactly one counter set.
    pub fn credits(&self) -> Vec<RawFieldingCredit> {
        let (catches, runouts, stumpings) = match self.mode {
            DismissalMode::Caught => (1, 0, 0),
            DismissalMode::RunOut => (0, 1, 0),
            DismissalMode::Stumped => (0, 0, 1),
            DismissalMode::Other => return Vec::new(),
        };
        self.fielders
            .iter()
            .map(|f| RawFieldingCredit {
                player: f.name.clone(),
                url: f.url.clone(),
                catches,
                runouts,
                stumpings,
            })
            .collect()
    }
}

/// Mode by priority: run out, then caught, then stumped.
pub fn parse(text: &str, links: &[Link]) -> Dismissal {
    let (mode, names) = if text.to_ascii_lowercase().contains("run out") {
        (DismissalMode::RunOut, run_out_names(text))
    } else if let Some(name) = caught_name(text) {
        (DismissalMode::Caught, vec![name])
    } else if let Some(caps) = STUMPED.captures(text) {
        (DismissalMode::Stumped, vec![caps["name"].to_string()])
    } else {
        (DismissalMode::Other, Vec::new())
    };

    let fielders = names
        .iter()
        .map(|raw| trim_name(raw))
        .filter(|name| is_creditable(name))
        .map(|name| {
            let url = link_for(&name, links);
            Fielder { name, url }
        })
        .collect();

    Dismissal { mode, fielders }
}

pub fn is_not_out(text: &str) -> bool {
    NOT_OUT.is_match(text)
}

fn run_out_names(text: &str) -> Vec<String> {
    RUN_OUT
        .captures(text)
        .map(|caps| caps[1].split('/').map(str::to_string).collect())
        .unwrap_or_default()
}

fn caught_name(text: &str) -> Option<String> {
    let caps = CAUGHT.captures(text)?;
    let name = &caps["name"];
    // "c & b X": the '&' is gone after cleaning, so the capture runs to the
    // end as "b X" with no bowler marker after it.
    if caps["end"].is_empty() {
        let lower = name.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("b ") {
            return Some(name[name.len() - rest.len()..].to_string());
        }
    }
    Some(name.to_string())
}

/// "sub (Smith" → "sub": anything parenthesised is not the fielder's name.
fn trim_name(raw: &str) -> String {
    clean_text(raw.split('(').next().unwrap_or(""))
}

/// Substitutes aren't tracked as identities; one-letter scraps aren't names.
fn is_creditable(name: &str) -> bool {
    name.chars().count() >= 2 && !name.eq_ignore_ascii_case("sub")
}

fn link_for(name: &str, links: &[Link]) -> Option<String> {
    let needle = name.to_lowercase();
    links
        .iter()
        .find(|link| {
            let text = clean_text(&link.text).to_lowercase();
            !text.is_empty() && (text.contains(&needle) || needle.contains(&text))
        })
        .map(|link| link.href.clone())
}

/// Per-match accumulator: repeated credits to one raw name add up,
/// first-seen order is kept, and the first profile link found sticks.
#[derive(Debug, Default)]
pub struct FieldingTally {
    credits: Vec<RawFieldingCredit>,
    by_name: HashMap<String, usize>,
}

impl FieldingTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, credit: RawFieldingCredit) {
        match self.by_name.get(&credit.player) {
            Some(&i) => {
                let existing = &mut self.credits[i];
                existing.catches += credit.catches;
                existing.runouts += credit.runouts;
                existing.stumpings += credit.stumpings;
                if existing.url.is_none() {
                    existing.url = credit.url;
                }
            }
            None => {
                self.by_name.insert(credit.player.clone(), self.credits.len());
                self.credits.push(credit);
            }
        }
    }

    pub fn record(&mut self, dismissal: &Dismissal) {
        for credit in dismissal.credits() {
            self.add(credit);
        }
    }

    pub fn into_credits(self) -> Vec<RawFieldingCredit> {
        self.credits
    }
}
