// src/core/net.rs

// Blocking HTTP GET. One request at a time; pacing lives with the caller.

use reqwest::blocking::Client;

use crate::config::options::ScrapeOptions;
use crate::error::{Error, Result};

/// Anything that can turn a URL into a page body.
/// The crawler only talks to this, so tests can script responses.
pub trait Fetch {
    fn get(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(opts: &ScrapeOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(opts.user_agent.as_str())
            .timeout(opts.timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status { url: s!(url), status: status.as_u16() });
        }
        Ok(resp.text()?)
    }
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get(&self, url: &str) -> Result<String> {
        (**self).get(url)
    }
}
