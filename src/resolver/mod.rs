pub mod normalize;
pub mod similarity;

pub use normalize::normalize;

use tracing::{debug, info, warn};

use crate::config::RunContext;
use crate::quotes::Entity;
use crate::roster::Roster;
use crate::wiki::{Existence, PageSource};

/// Minimum similarity for a roster name to stand in for the input.
pub const MATCH_THRESHOLD: f64 = 0.70;

/// Best roster candidate sharing `target`'s first character, with its ratio.
/// On equal ratios the earlier name wins.
pub fn best_match<'r>(
    target: &str,
    names: impl IntoIterator<Item = &'r str>,
) -> Option<(&'r str, f64)> {
    let first = target.chars().next()?;
    let mut best: Option<(&str, f64)> = None;
    for name in names.into_iter().filter(|n| n.starts_with(first)) {
        let score = similarity::ratio(target, name);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((name, score));
        }
    }
    best
}

pub fn fuzzy_match<'r>(target: &str, names: impl IntoIterator<Item = &'r str>) -> Option<&'r str> {
    best_match(target, names)
        .filter(|(_, score)| *score >= MATCH_THRESHOLD)
        .map(|(name, _)| name)
}

/// Turns user input into verified champions.
pub struct NameResolver<'a, S: PageSource> {
    source: &'a S,
    roster: Option<&'a Roster>,
    ctx: RunContext,
}

impl<'a, S: PageSource> NameResolver<'a, S> {
    pub fn new(source: &'a S, roster: Option<&'a Roster>, ctx: RunContext) -> Self {
        NameResolver {
            source,
            roster,
            ctx,
        }
    }

    /// Check a normalized name against the wiki, falling back to the roster.
    pub fn verify(&self, normalized: &str) -> Option<Entity> {
        let name = match self.source.exists(normalized) {
            Existence::Found => normalized.to_string(),
            Existence::NotFound => self.from_roster(normalized)?,
            Existence::Unknown => {
                warn!("Could not reach the wiki for {}, trying the roster", normalized);
                self.from_roster(normalized)?
            }
        };
        let id = self.lookup_id(&name);
        Some(Entity::new(name, id))
    }

    pub fn resolve(&self, raw: &str) -> Option<Entity> {
        let normalized = normalize(raw)?;
        self.verify(&normalized)
    }

    /// Comma-separated input; names that fail to resolve are dropped, duplicates kept.
    pub fn resolve_batch(&self, raw: &str) -> Vec<Entity> {
        raw.split(',')
            .filter_map(normalize)
            .filter_map(|name| self.verify(&name))
            .collect()
    }

    fn from_roster(&self, normalized: &str) -> Option<String> {
        let roster = self.roster?;
        match fuzzy_match(normalized, roster.names()) {
            Some(name) => {
                info!("Matched {} to {}", normalized, name);
                Some(name.to_string())
            }
            None => {
                debug!("No roster name close enough to {}", normalized);
                None
            }
        }
    }

    fn lookup_id(&self, name: &str) -> i64 {
        match self.roster {
            Some(roster) if self.ctx.lookup_ids => roster.id_of(name),
            _ => 0,
        }
    }
}
