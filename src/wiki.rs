use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Error, Result};

/// Outcome of asking the wiki whether a champion has a quotes page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    Found,
    NotFound,
    /// The wiki could not be asked (network error, 5xx, ...).
    Unknown,
}

/// Where champion quote pages come from.
pub trait PageSource {
    /// Page HTML, or `Ok(None)` when the wiki has no such page.
    fn fetch_page(&self, champion: &str) -> Result<Option<String>>;

    fn exists(&self, champion: &str) -> Existence {
        match self.fetch_page(champion) {
            Ok(Some(_)) => Existence::Found,
            Ok(None) => Existence::NotFound,
            Err(e) => {
                debug!(champion, error = %e, "existence check failed");
                Existence::Unknown
            }
        }
    }
}

/// Blocking client for the champion wiki.
pub struct WikiClient {
    http: Client,
    base_url: String,
    page_suffix: String,
}

impl WikiClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()?;
        Ok(WikiClient {
            http,
            base_url: settings.wiki_base_url.clone(),
            page_suffix: settings.page_suffix.clone(),
        })
    }

    /// `Jarvan IV` → `…/wiki/Jarvan_IV/Quotes`
    pub fn page_url(&self, champion: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            champion.replace(' ', "_"),
            self.page_suffix
        )
    }
}

/// 404 means no page; any other failure leaves the question open.
fn existence_of(status: StatusCode) -> Existence {
    if status == StatusCode::NOT_FOUND {
        Existence::NotFound
    } else if status.is_success() {
        Existence::Found
    } else {
        Existence::Unknown
    }
}

impl PageSource for WikiClient {
    fn fetch_page(&self, champion: &str) -> Result<Option<String>> {
        let url = self.page_url(champion);
        info!("Fetching {}", url);

        let response = self.http.get(&url).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(Some(response.text()?))
    }

    /// HEAD only, so a verified champion's page is downloaded once.
    fn exists(&self, champion: &str) -> Existence {
        let url = self.page_url(champion);
        match self.http.head(&url).send() {
            Ok(response) => {
                let existence = existence_of(response.status());
                if existence == Existence::Unknown {
                    debug!(champion, status = response.status().as_u16(), "existence check failed");
                }
                existence
            }
            Err(e) => {
                debug!(champion, error = %e, "existence check failed");
                Existence::Unknown
            }
        }
    }
}
