// src/store.rs
//
// Where finished stats go. One row per tournament slot, replaced wholesale on
// every sync.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::aggregate::TournamentStats;
use crate::config::options::ExportOptions;
use crate::error::Result;
use crate::file::{read_json, write_json};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRow {
    pub id: u32,
    pub tournament_url: String,
    /// Aggregator output, verbatim.
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}

impl StatsRow {
    /// Wrap an already-serialized stats document. The tournament URL comes
    /// from its `tournament` field.
    pub fn from_value(id: u32, data: Value) -> Self {
        let tournament_url = data.get("tournament").and_then(Value::as_str).unwrap_or_default().to_string();
        Self { id, tournament_url, data, updated_at: Utc::now() }
    }

    pub fn from_stats(id: u32, stats: &TournamentStats) -> Result<Self> {
        Ok(Self::from_value(id, serde_json::to_value(stats)?))
    }
}

pub trait StatsSink {
    /// Insert `row`, replacing any existing row with the same ID.
    fn upsert(&mut self, row: StatsRow) -> Result<()>;
}

/// A JSON file holding every row, keyed by ID.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored rows; a missing file is an empty table.
    pub fn rows(&self) -> Result<BTreeMap<u32, StatsRow>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw: BTreeMap<String, StatsRow> = read_json(&self.path)?;
        Ok(raw.into_values().map(|r| (r.id, r)).collect())
    }

    pub fn get(&self, id: u32) -> Result<Option<StatsRow>> {
        Ok(self.rows()?.remove(&id))
    }
}

impl StatsSink for JsonFileSink {
    fn upsert(&mut self, row: StatsRow) -> Result<()> {
        let mut rows = self.rows()?;
        info!("Upserting row {} ({}) into {}", row.id, row.tournament_url, self.path.display());
        rows.insert(row.id, row);
        // JSON object keys must be strings
        let keyed: BTreeMap<String, StatsRow> = rows.into_iter().map(|(id, r)| (id.to_string(), r)).collect();
        write_json(&self.path, &keyed, &ExportOptions::default())?;
        Ok(())
    }
}
