mod config;
mod ddragon;
mod error;
mod parser;
mod prompt;
mod quotes;
mod resolver;
mod roster;
mod session;
mod store;
mod wiki;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::{RunContext, Settings};
use crate::ddragon::DataDragon;
use crate::quotes::Entity;
use crate::resolver::NameResolver;
use crate::roster::Roster;
use crate::session::ExtractionSession;
use crate::store::QuoteStore;
use crate::wiki::WikiClient;

#[derive(Parser)]
#[command(
    name = "quote_scraper",
    about = "Scrape champion quotes from the League of Legends wiki into JSON"
)]
struct Cli {
    /// Download quotes for multiple champions
    #[arg(short = 'm', long, conflicts_with = "all")]
    multi: bool,
    /// Download quotes for every champion in the roster
    #[arg(short = 'a', long)]
    all: bool,
    /// Download an updated champion roster from Data Dragon
    #[arg(short = 'd', long = "download-roster")]
    download_roster: bool,
    /// Look up champion ids in the roster, otherwise store 0
    #[arg(short = 'i', long = "ids")]
    lookup_ids: bool,
    /// Print underlying errors
    #[arg(short = 'e', long)]
    verbose: bool,
    /// Output file (overrides `output_path`)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
    /// Champion names; skips the prompt
    names: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "info,quote_scraper=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let t0 = Instant::now();
    let mut settings = Settings::load()?;
    if let Some(output) = cli.output.clone() {
        settings.output_path = output;
    }

    let mut ctx = RunContext::detect(&settings.roster_path, cli.lookup_ids, cli.verbose);
    let mut roster = load_roster(&settings, ctx);
    ctx.has_roster = roster.is_some();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    if cli.download_roster {
        if let Some(updated) = refresh_roster(&settings, roster.as_ref(), ctx, &mut input, false)? {
            roster = Some(updated);
        }
    } else if cli.all && roster.is_none() {
        println!(
            "No file '{}' found. A champion roster is required to scrape all champion pages.",
            settings.roster_path.display()
        );
        roster = refresh_roster(&settings, None, ctx, &mut input, true)?;
    }
    ctx.has_roster = roster.is_some();

    if ctx.lookup_ids && !ctx.has_roster {
        warn!(
            "No file '{}' found. Unable to look up champion ids, using 0 instead",
            settings.roster_path.display()
        );
    }

    let wiki = WikiClient::new(&settings)?;
    let store = QuoteStore::new(&settings.output_path, settings.include_ids);
    let session = ExtractionSession::new(&wiki, ctx);
    let resolver = NameResolver::new(&wiki, roster.as_ref(), ctx);

    let (inputs, entities, progress) = if cli.all {
        let Some(roster) = roster.as_ref() else {
            println!("No roster available; nothing to scrape.");
            return Ok(());
        };
        let entities: Vec<Entity> = roster
            .entries()
            .iter()
            .map(|e| Entity::new(e.name.clone(), e.id))
            .collect();
        let inputs = entities.iter().map(|e| e.name.clone()).collect();
        let pb = ProgressBar::new(entities.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
                .progress_chars("=> "),
        );
        (inputs, entities, Some(pb))
    } else if cli.multi {
        let inputs = if cli.names.is_empty() {
            prompt::read_multi(&mut input)?
        } else {
            prompt::split_names(&cli.names.join(","))
        };
        let entities = resolver.resolve_batch(&inputs.join(","));
        if entities.is_empty() {
            println!("No champions found for the inputs: {:?}", inputs);
            return Ok(());
        }
        (inputs, entities, None)
    } else {
        let raw = if cli.names.is_empty() {
            match prompt::read_single(&mut input)? {
                Some(raw) => raw,
                None => return Ok(()),
            }
        } else {
            cli.names.join(" ")
        };
        let Some(entity) = resolver.resolve(&raw) else {
            println!("No champions found for input: {}", raw);
            return Ok(());
        };
        (vec![raw], vec![entity], None)
    };

    info!(
        "Scraping {} champion(s) into {}",
        entities.len(),
        store.path().display()
    );
    let (found, stats) = session.run_batch(&entities, &store, progress.as_ref())?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    println!(
        "Done: {} scraped ({} ok, {} missing, {} errors).",
        stats.total, stats.ok, stats.missing, stats.errors
    );
    prompt::print_summary(&inputs, &found);

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

/// A corrupt cache is reported and treated as missing.
fn load_roster(settings: &Settings, ctx: RunContext) -> Option<Roster> {
    match Roster::load(&settings.roster_path) {
        Ok(roster) => roster,
        Err(e) => {
            if ctx.verbose {
                warn!("Ignoring unreadable roster: {}", e);
            } else {
                warn!("Ignoring unreadable roster {}", settings.roster_path.display());
            }
            None
        }
    }
}

/// Compare versions and download a newer roster if the user agrees.
/// `Some` only when a new roster was saved.
fn refresh_roster(
    settings: &Settings,
    local: Option<&Roster>,
    ctx: RunContext,
    input: &mut impl BufRead,
    prompted: bool,
) -> anyhow::Result<Option<Roster>> {
    let ddragon = DataDragon::new(settings)?;
    let versions = ddragon.check_versions(local, ctx.verbose);
    if !prompted {
        println!("Local version:\t{}", versions.local.as_deref().unwrap_or("none"));
        println!("Live version:\t{}", versions.live.as_deref().unwrap_or("unknown"));
    }
    if versions.is_current() {
        println!("Version is up to date!");
        return Ok(None);
    }
    if !versions.update_available() {
        return Ok(None);
    }
    let Some(live) = versions.live.as_deref() else {
        return Ok(None);
    };
    let question = if prompted {
        "Download new dictionary of champions?"
    } else {
        "New patch available. Download new champion list?"
    };
    if !prompt::confirm(input, question)? {
        return Ok(None);
    }
    let roster = ddragon.download(live)?;
    roster.save(&settings.roster_path)?;
    info!(
        "Saved {} champions (patch {}) to {}",
        roster.len(),
        live,
        settings.roster_path.display()
    );
    Ok(Some(roster))
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
