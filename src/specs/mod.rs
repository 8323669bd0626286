//! # Scraping “specs” module
//!
//! Page-specific readers. Each spec knows *where the ground truth lives in the
//! HTML* of one kind of page and how to pull it out without trusting the markup.
//!
//! ## What lives here
//! - **Pure HTML parsing**: series results index (`series`) and match scorecards
//!   (`scorecard`), plus the prose parser for dismissal text (`dismissal`).
//! - **Tolerant extraction**: rows that don't fit a known shape are skipped, never
//!   raised as errors. A page that yields nothing is an empty record.
//!
//! ## What does **not** live here
//! - **Fetching and pacing**: `scrape::crawl` drives the network.
//! - **Identity and totals**: `resolve` and `aggregate` work on the records
//!   produced here.
//!
//! ## Typical call chain
//! ```text
//! scrape::crawl → core::net (fetch) → specs::series::match_links
//!               → core::net (fetch) → specs::scorecard::parse_doc
//!                                        ↘ specs::dismissal::parse
//! ```
//!
//! ## Testing notes
//! Every spec is testable offline against inline HTML; see the `tests` module
//! in each file.
pub mod dismissal;
pub mod scorecard;
pub mod series;
