// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod specs;

pub mod aggregate;
pub mod data;
pub mod error;
pub mod file;
pub mod log;
pub mod progress;
pub mod resolve;
pub mod scrape;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
