// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://www.espncricinfo.com";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const TIMEOUT_SECS: u64 = 30;

// Pacing
pub const REQUEST_PAUSE_MS: u64 = 1500; // be polite

// Series index
pub const RESULTS_PATH: &str = "/match-results";
pub const SCORECARD_MARKERS: [&str; 2] = ["/scorecard", "/full-scorecard"];

// Files
pub const DEFAULT_SCRAPE_FILE: &str = "data.json";
pub const DEFAULT_AGGREGATE_INPUT: &str = "scraped-data.json";
pub const DEFAULT_STATS_FILE: &str = "player-stats.json";
pub const STORE_DIR: &str = ".store";
pub const STORE_FILE: &str = "tournament_stats.json";

// Persistence
pub const STATS_ROW_ID: u32 = 1;
