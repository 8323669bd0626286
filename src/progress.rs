// src/progress.rs
/// Lightweight progress reporting for the crawl.
/// Frontends implement this to surface status; every hook is optional.
pub trait Progress {
    /// Called once the match list is known.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A match page was scraped (1-based match number).
    fn item_done(&mut self, _number: usize, _url: &str) {}

    /// A match page degraded to an empty record.
    fn item_failed(&mut self, _number: usize, _url: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
