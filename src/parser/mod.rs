pub mod classifier;
pub mod nodes;
pub mod text;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::quotes::SectionMap;
use classifier::{Classifier, Flow, PassMode};
use nodes::Node;

const CONTENT_ROOT: &str = "div#mw-content-text";

/// Page HTML → content root → classifier pass(es) → sections.
///
/// A page with a skin selector gets a second pass rooted at the canonical
/// tab; quotes from both passes land in the same map.
pub fn extract_quotes(html: &str, champion: &str) -> SectionMap {
    let document = Html::parse_document(html);
    let root = content_root(&document);
    let mut quotes = SectionMap::new();

    if let Some(tab) = run_pass(root, champion, PassMode::Initial, &mut quotes) {
        debug!(champion, "re-entering at canonical skin tab");
        run_pass(tab, champion, PassMode::Redirected, &mut quotes);
    }
    quotes
}

/// One traversal with fresh classifier state. Returns the tab to re-enter at, if any.
pub fn run_pass<'h>(
    root: ElementRef<'h>,
    champion: &str,
    mode: PassMode,
    quotes: &mut SectionMap,
) -> Option<ElementRef<'h>> {
    let mut classifier = Classifier::new(champion, mode, quotes);
    for element in nodes::descendants(root) {
        if classifier.visit(&Node::from_element(element)) == Flow::Redirect {
            return Some(element);
        }
    }
    None
}

fn content_root(document: &Html) -> ElementRef<'_> {
    Selector::parse(CONTENT_ROOT)
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .unwrap_or_else(|| document.root_element())
}
