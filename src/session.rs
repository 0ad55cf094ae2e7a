use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::config::RunContext;
use crate::error::Result;
use crate::parser;
use crate::quotes::{Entity, EntityResult};
use crate::store::QuoteStore;
use crate::wiki::PageSource;

/// Batch stats returned after completion.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub ok: usize,
    pub missing: usize,
    pub errors: usize,
}

/// Fetches and classifies quote pages, one champion at a time.
pub struct ExtractionSession<'a, S: PageSource> {
    source: &'a S,
    ctx: RunContext,
}

impl<'a, S: PageSource> ExtractionSession<'a, S> {
    pub fn new(source: &'a S, ctx: RunContext) -> Self {
        ExtractionSession { source, ctx }
    }

    /// `Ok(None)` when the wiki has no quotes page for this champion.
    pub fn extract(&self, entity: &Entity) -> Result<Option<EntityResult>> {
        let Some(html) = self.source.fetch_page(&entity.name)? else {
            return Ok(None);
        };
        let quotes = parser::extract_quotes(&html, &entity.name);
        if quotes.is_empty() {
            warn!("No quote sections found on the page for {}", entity.name);
        }
        info!(
            "Extracted {} quotes in {} sections for {}",
            quotes.quote_count(),
            quotes.iter().count(),
            entity.name
        );
        Ok(Some(EntityResult {
            entity: entity.clone(),
            quotes,
        }))
    }

    /// Reset the store, then extract and merge each champion in order.
    /// One champion failing never stops the rest.
    pub fn run_batch(
        &self,
        entities: &[Entity],
        store: &QuoteStore,
        progress: Option<&ProgressBar>,
    ) -> Result<(Vec<String>, BatchStats)> {
        store.reset()?;

        let mut found = Vec::new();
        let mut stats = BatchStats {
            total: entities.len(),
            ..Default::default()
        };

        for entity in entities {
            if let Some(pb) = progress {
                pb.set_message(entity.name.clone());
            }
            match self.extract(entity).and_then(|r| match r {
                Some(result) => store.merge(&result).map(|_| true),
                None => Ok(false),
            }) {
                Ok(true) => {
                    stats.ok += 1;
                    found.push(entity.name.clone());
                }
                Ok(false) => {
                    stats.missing += 1;
                    warn!("No quotes page for {}", entity.name);
                }
                Err(e) => {
                    stats.errors += 1;
                    if self.ctx.verbose {
                        warn!("Failed to extract {}: {}", entity.name, e);
                    } else {
                        warn!("Failed to extract {}", entity.name);
                    }
                }
            }
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        info!(
            "Processed {} champions ({} ok, {} missing, {} errors)",
            stats.total, stats.ok, stats.missing, stats.errors
        );
        Ok((found, stats))
    }
}
