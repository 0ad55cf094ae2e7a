use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const CONFIG_FILE: &str = "quote_scraper";
const ENV_PREFIX: &str = "QUOTES";

/// Runtime settings, layered: defaults → `quote_scraper.toml` → `QUOTES_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub wiki_base_url: String,
    pub page_suffix: String,
    pub roster_path: PathBuf,
    pub output_path: PathBuf,
    pub data_dragon_url: String,
    pub locale: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Write `{"champ_id", "quotes"}` per champion instead of the bare section map.
    pub include_ids: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Self::builder()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Built-in defaults only, no file or environment.
    #[cfg(test)]
    pub fn defaults() -> Result<Self> {
        Ok(Self::builder()?.build()?.try_deserialize()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let builder = Config::builder()
            .set_default("wiki_base_url", "https://leagueoflegends.fandom.com/wiki/")?
            .set_default("page_suffix", "/Quotes")?
            .set_default("roster_path", "name_id_dict.json")?
            .set_default("output_path", "quotes_list_export.json")?
            .set_default("data_dragon_url", "https://ddragon.leagueoflegends.com")?
            .set_default("locale", "en_US")?
            .set_default("timeout_secs", 15_i64)?
            .set_default(
                "user_agent",
                concat!("quote_scraper/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("include_ids", false)?;
        Ok(builder)
    }
}

/// Capabilities detected once at startup and passed down explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunContext {
    pub has_roster: bool,
    pub lookup_ids: bool,
    pub verbose: bool,
}

impl RunContext {
    pub fn detect(roster_path: &Path, lookup_ids: bool, verbose: bool) -> Self {
        RunContext {
            has_roster: roster_path.is_file(),
            lookup_ids,
            verbose,
        }
    }
}
