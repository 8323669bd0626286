// src/resolve.rs
//
// Who is "Smith"?
//
// Phase 1 (`NameIndex::build`) looks at every batting and bowling line in the
// whole series. Phase 2 (`NameIndex::resolve`) maps any raw name, including
// fielders who only appear inside dismissal text, onto one identity.
// `resolve` only exists on a built index, so a lookup can never run against a
// half-seen batch: a catch in match 1 may only make sense once match 9 has
// shown the fielder's full name.
//
// Order of trust:
//   1. profile ID from the link (authoritative, spelling is ignored)
//   2. exact normalized name
//   3. surname index (true surname first, then fuller names)
//   4. the normalized name as a brand-new identity

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::core::sanitize::{clean_player_name, last_token};
use crate::data::Series;

/// One real person across the whole batch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identity {
    /// Stable ID taken from a profile link.
    Profile(String),
    /// No link anywhere; the normalized full name stands in.
    Name(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedBy {
    ProfileId,
    ExactName,
    /// `rivals` are other names that share the looked-up token as their
    /// surname. Non-empty means the pick is a guess worth a human look.
    Surname { rivals: Vec<String> },
    NewIdentity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub identity: Identity,
    /// Display name of the identity.
    pub name: String,
    pub by: ResolvedBy,
}

impl Resolution {
    pub fn is_ambiguous(&self) -> bool {
        matches!(&self.by, ResolvedBy::Surname { rivals } if !rivals.is_empty())
    }
}

/// Stable ID from a profile href.
///
/// `/cricketers/virat-kohli-253802` → `253802`; a final path component with
/// no numeric tail is used whole. Query, fragment and trailing `/` are ignored.
pub fn profile_id(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or("").trim().trim_end_matches('/');
    let last = path.rsplit('/').next().unwrap_or("");
    if last.is_empty() {
        return None;
    }
    let tail = last.rsplit('-').next().unwrap_or("");
    if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
        Some(s!(tail))
    } else {
        Some(s!(last))
    }
}

#[derive(Debug)]
struct ProfileEntry {
    name: String,
    url: String,
}

#[derive(Debug)]
struct Candidate {
    identity: Identity,
    name: String,
    is_surname: bool,
    tokens: usize,
}

/// Phase-1 output, the only way into phase 2.
#[derive(Debug, Default)]
pub struct NameIndex {
    profiles: HashMap<String, ProfileEntry>,
    exact: HashMap<String, Identity>,
    surnames: HashMap<String, Vec<Candidate>>,
}

impl NameIndex {
    /// Observe every batting and bowling appearance in the series.
    pub fn build(series: &Series) -> Self {
        let appearances = series.matches.iter().flat_map(|m| {
            let bat = m.batting.iter().map(|b| (b.player.as_str(), b.url.as_deref()));
            let bowl = m.bowling.iter().map(|b| (b.bowler.as_str(), b.url.as_deref()));
            bat.chain(bowl)
        });

        let mut profiles: HashMap<String, ProfileEntry> = HashMap::new();
        // spelling → ID, first link wins
        let mut aliases: BTreeMap<String, String> = BTreeMap::new();
        // names seen without any link, first-seen order
        let mut unlinked: Vec<String> = Vec::new();

        for (raw, url) in appearances {
            let name = clean_player_name(raw);
            if name.is_empty() {
                continue;
            }
            match url.and_then(|u| profile_id(u).map(|id| (id, u))) {
                Some((id, href)) => {
                    let entry = profiles
                        .entry(id.clone())
                        .or_insert_with(|| ProfileEntry { name: name.clone(), url: s!(href) });
                    if name.len() > entry.name.len() {
                        entry.name = name.clone();
                    }
                    aliases.entry(name).or_insert(id);
                }
                None => {
                    if !unlinked.contains(&name) {
                        unlinked.push(name);
                    }
                }
            }
        }

        let mut exact: HashMap<String, Identity> = HashMap::new();
        for (spelling, id) in &aliases {
            exact.insert(spelling.clone(), Identity::Profile(id.clone()));
        }
        for (id, entry) in &profiles {
            exact.entry(entry.name.clone()).or_insert_with(|| Identity::Profile(id.clone()));
        }
        for name in unlinked {
            exact.entry(name.clone()).or_insert(Identity::Name(name));
        }

        let mut index = Self { profiles, exact, surnames: HashMap::new() };
        index.surnames = index.build_surnames();
        debug!(
            "Name index: {} profiles, {} spellings, {} surname keys",
            index.profiles.len(),
            index.exact.len(),
            index.surnames.len()
        );
        index
    }

    fn build_surnames(&self) -> HashMap<String, Vec<Candidate>> {
        // Canonical (identity, name) pairs, deduplicated and sorted so the
        // index is the same however the maps iterate.
        let mut canon: BTreeMap<Identity, String> = BTreeMap::new();
        for identity in self.exact.values() {
            canon.entry(identity.clone()).or_insert_with(|| self.display_name(identity));
        }

        let mut surnames: HashMap<String, Vec<Candidate>> = HashMap::new();
        for (identity, name) in canon {
            let tokens: Vec<&str> = name.split_whitespace().collect();
            for (pos, token) in tokens.iter().enumerate() {
                let key = token.to_lowercase();
                let is_surname = pos + 1 == tokens.len();
                let list = surnames.entry(key).or_default();
                match list.iter_mut().find(|c| c.identity == identity) {
                    Some(c) => c.is_surname |= is_surname,
                    None => list.push(Candidate {
                        identity: identity.clone(),
                        name: name.clone(),
                        is_surname,
                        tokens: tokens.len(),
                    }),
                }
            }
        }

        for list in surnames.values_mut() {
            list.sort_by(|a, b| {
                b.is_surname
                    .cmp(&a.is_surname)
                    .then(b.tokens.cmp(&a.tokens))
                    .then_with(|| a.name.cmp(&b.name))
                    .then_with(|| a.identity.cmp(&b.identity))
            });
        }
        surnames
    }

    fn display_name(&self, identity: &Identity) -> String {
        match identity {
            Identity::Profile(id) => self.profiles.get(id).map(|p| p.name.clone()).unwrap_or_else(|| id.clone()),
            Identity::Name(name) => name.clone(),
        }
    }

    /// First profile href seen for an identity.
    pub fn profile_url(&self, identity: &Identity) -> Option<&str> {
        match identity {
            Identity::Profile(id) => self.profiles.get(id).map(|p| p.url.as_str()),
            Identity::Name(_) => None,
        }
    }

    /// Map a raw name (plus optional profile href) to its identity.
    /// `None` only for names that clean down to nothing.
    pub fn resolve(&self, raw_name: &str, url: Option<&str>) -> Option<Resolution> {
        if let Some(id) = url.and_then(profile_id) {
            if self.profiles.contains_key(&id) {
                let identity = Identity::Profile(id);
                return Some(self.resolution(identity, ResolvedBy::ProfileId));
            }
        }

        let name = clean_player_name(raw_name);
        if name.is_empty() {
            return None;
        }

        if let Some(identity) = self.exact.get(&name) {
            return Some(self.resolution(identity.clone(), ResolvedBy::ExactName));
        }

        let key = last_token(&name).to_lowercase();
        if let Some(best) = self.surnames.get(&key).and_then(|list| list.first()) {
            let rivals = self.surnames[&key]
                .iter()
                .skip(1)
                .filter(|c| best.is_surname && c.is_surname)
                .map(|c| c.name.clone())
                .collect();
            return Some(self.resolution(best.identity.clone(), ResolvedBy::Surname { rivals }));
        }

        Some(Resolution { identity: Identity::Name(name.clone()), name, by: ResolvedBy::NewIdentity })
    }

    fn resolution(&self, identity: Identity, by: ResolvedBy) -> Resolution {
        let name = self.display_name(&identity);
        Resolution { identity, name, by }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MatchRecord, RawBattingEntry, RawBowlingEntry};

    fn bat(name: &str, url: Option<&str>) -> RawBattingEntry {
        RawBattingEntry { player: s!(name), url: url.map(String::from), ..Default::default() }
    }

    fn bowl(name: &str, url: Option<&str>) -> RawBowlingEntry {
        RawBowlingEntry { bowler: s!(name), url: url.map(String::from), ..Default::default() }
    }

    fn series(matches: Vec<(Vec<RawBattingEntry>, Vec<RawBowlingEntry>)>) -> Series {
        Series {
            url: s!("s"),
            matches: matches
                .into_iter()
                .enumerate()
                .map(|(i, (batting, bowling))| MatchRecord {
                    url: format!("m{i}"),
                    batting,
                    bowling,
                    fielding: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn profile_ids() {
        assert_eq!(profile_id("/cricketers/virat-kohli-253802").as_deref(), Some("253802"));
        assert_eq!(profile_id("https://x.org/cricketers/virat-kohli-253802/").as_deref(), Some("253802"));
        assert_eq!(profile_id("/player/12345?tab=bio").as_deref(), Some("12345"));
        assert_eq!(profile_id("/cricketers/virat-kohli").as_deref(), Some("virat-kohli"));
        assert_eq!(profile_id(""), None);
        assert_eq!(profile_id("/"), None);
    }

    #[test]
    fn same_id_means_same_person_with_longest_name() {
        let s = series(vec![
            (vec![bat("A. Smith", Some("/cricketers/alan-smith-42"))], vec![]),
            (vec![], vec![bowl("Alan Smith", Some("/cricketers/alan-smith-42"))]),
        ]);
        let idx = NameIndex::build(&s);
        let a = idx.resolve("A. Smith", Some("/cricketers/alan-smith-42")).unwrap();
        let b = idx.resolve("Alan Smith", Some("/cricketers/alan-smith-42")).unwrap();
        assert_eq!(a.identity, Identity::Profile(s!("42")));
        assert_eq!(a.identity, b.identity);
        assert_eq!(a.name, "Alan Smith");
        assert_eq!(a.by, ResolvedBy::ProfileId);
    }

    #[test]
    fn id_overrides_spelling() {
        let s = series(vec![(vec![bat("Alan Smith", Some("/c/alan-smith-42"))], vec![])]);
        let idx = NameIndex::build(&s);
        let r = idx.resolve("Totally Different", Some("/c/whatever-42")).unwrap();
        assert_eq!(r.name, "Alan Smith");
        assert_eq!(r.by, ResolvedBy::ProfileId);
    }

    #[test]
    fn unlinked_spelling_of_linked_player_joins_profile() {
        let s = series(vec![
            (vec![bat("A. Smith", Some("/c/alan-smith-42"))], vec![bowl("Alan Smith", Some("/c/alan-smith-42"))]),
        ]);
        let idx = NameIndex::build(&s);
        let r = idx.resolve("A. Smith", None).unwrap();
        assert_eq!(r.identity, Identity::Profile(s!("42")));
        assert_eq!(r.by, ResolvedBy::ExactName);
    }

    #[test]
    fn surname_prefers_true_surname_then_fuller_name() {
        let s = series(vec![(
            vec![
                bat("Smith Patel", None),
                bat("J Smith", None),
                bat("John Paul Smith", None),
            ],
            vec![],
        )]);
        let idx = NameIndex::build(&s);
        let r = idx.resolve("Smith", None).unwrap();
        assert_eq!(r.name, "John Paul Smith");
        assert!(r.is_ambiguous());
        assert_eq!(r.by, ResolvedBy::Surname { rivals: vec![s!("J Smith")] });
    }

    #[test]
    fn surname_match_is_case_insensitive_and_unambiguous_when_unique() {
        let s = series(vec![(vec![bat("Kane Williamson", None), bat("Tom Latham", None)], vec![])]);
        let idx = NameIndex::build(&s);
        let r = idx.resolve("WILLIAMSON", None).unwrap();
        assert_eq!(r.name, "Kane Williamson");
        assert!(!r.is_ambiguous());
    }

    #[test]
    fn non_surname_token_still_matches_as_fallback() {
        let s = series(vec![(vec![bat("Smith Patel", None)], vec![])]);
        let r = NameIndex::build(&s).resolve("Smith", None).unwrap();
        assert_eq!(r.name, "Smith Patel");
        assert!(!r.is_ambiguous());
    }

    #[test]
    fn unknown_names_become_new_identities() {
        let idx = NameIndex::build(&series(vec![(vec![bat("Kane Williamson", None)], vec![])]));
        let r = idx.resolve("Glenn Phillips (c)", Some("/c/glenn-phillips-7")).unwrap();
        assert_eq!(r.identity, Identity::Name(s!("Glenn Phillips")));
        assert_eq!(r.by, ResolvedBy::NewIdentity);
        assert_eq!(idx.resolve("  ", None), None);
    }

    #[test]
    fn profile_url_is_first_seen_href() {
        let s = series(vec![
            (vec![bat("Alan Smith", Some("/c/alan-smith-42"))], vec![]),
            (vec![bat("A Smith", Some("/cricketers/a-smith-42"))], vec![]),
        ]);
        let idx = NameIndex::build(&s);
        assert_eq!(idx.profile_url(&Identity::Profile(s!("42"))), Some("/c/alan-smith-42"));
        assert_eq!(idx.profile_url(&Identity::Name(s!("x"))), None);
    }
}
