use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::roster::{Roster, RosterEntry};

/// Local cache version next to the newest published patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versions {
    pub local: Option<String>,
    pub live: Option<String>,
}

impl Versions {
    pub fn is_current(&self) -> bool {
        self.live.is_some() && self.local == self.live
    }

    pub fn update_available(&self) -> bool {
        self.live.is_some() && self.local != self.live
    }
}

#[derive(Deserialize)]
struct ChampionFile {
    data: HashMap<String, ChampionSummary>,
}

#[derive(Deserialize)]
struct ChampionSummary {
    /// Numeric id as a string, e.g. `"103"`.
    key: String,
    name: String,
}

/// Client for Riot's static Data Dragon CDN, the roster's upstream.
pub struct DataDragon {
    http: Client,
    base_url: String,
    locale: String,
}

impl DataDragon {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()?;
        Ok(DataDragon {
            http,
            base_url: settings.data_dragon_url.trim_end_matches('/').to_string(),
            locale: settings.locale.clone(),
        })
    }

    pub fn latest_version(&self) -> Result<String> {
        let url = format!("{}/api/versions.json", self.base_url);
        let versions: Vec<String> = self.get(&url)?.json()?;
        versions
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream(format!("no versions listed at {url}")))
    }

    /// Compare the cached roster's patch with the live one. Lookup failures leave `live` empty.
    pub fn check_versions(&self, local: Option<&Roster>, verbose: bool) -> Versions {
        let live = match self.latest_version() {
            Ok(v) => Some(v),
            Err(e) => {
                if verbose {
                    warn!("Unable to check live version: {}", e);
                } else {
                    warn!("Unable to check live version");
                }
                None
            }
        };
        Versions {
            local: local.and_then(|r| r.version.clone()),
            live,
        }
    }

    pub fn download(&self, version: &str) -> Result<Roster> {
        let url = format!(
            "{}/cdn/{}/data/{}/champion.json",
            self.base_url, version, self.locale
        );
        info!("Downloading champion list {}", url);
        let body = self.get(&url)?.text()?;
        roster_from_champion_json(version, &body)
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Data Dragon's `champion.json` → roster ordered by numeric id.
pub fn roster_from_champion_json(version: &str, json: &str) -> Result<Roster> {
    let file: ChampionFile = serde_json::from_str(json)?;
    let mut entries: Vec<RosterEntry> = file
        .data
        .into_values()
        .filter_map(|c| match c.key.parse::<i64>() {
            Ok(id) => Some(RosterEntry { id, name: c.name }),
            Err(_) => {
                warn!("Skipping {} with non-numeric key {:?}", c.name, c.key);
                None
            }
        })
        .collect();
    entries.sort_by_key(|e| e.id);
    Ok(Roster::new(Some(version.to_string()), entries))
}
