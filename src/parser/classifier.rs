use tracing::{debug, warn};

use super::nodes::Node;
use super::text::{audio_token, contains_ignore_case, quoted, speaker_prefix, strip_invisible};
use crate::quotes::SectionMap;

/// Headings whose lists are never quotes of the page's champion.
const HEADING_BLACKLIST: &[&str] = &["", "References", "Co-op vs. AI Responses"];
/// After this heading `data-skin` spans no longer mark skins to exclude (Swain's page).
const SKIN_MARKER_CUTOFF: &str = "Attacking";
const DEFAULT_SKIN: &str = "Original";
const CANONICAL_TABS: &[&str] = &["Classic", "Live"];
/// Champions that only make noises: their italic text is kept whole.
const NON_VERBAL: &[&str] = &["Bard", "Rek'Sai"];
const CHAMPION_SELECT: &str = "Champion Select";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// First pass over the page; a canonical skin tab ends it.
    Initial,
    /// Pass re-entered inside the canonical tab; tabs are ignored.
    Redirected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop and restart the traversal at the node just visited.
    Redirect,
}

/// Everything one pass knows. Built fresh for every pass.
#[derive(Debug)]
struct ClassifierState {
    section: Option<String>,
    suppressed: bool,
    /// The list item currently read is spoken by the page's champion.
    attributed: bool,
    /// Text of a plain link, a champion who may be the one talking.
    pending_speaker: Option<String>,
    active_token: Option<String>,
    /// `active_token` belongs to the canonical skin and no quote consumed it yet.
    token_confirmed: bool,
    prev_accepted: Option<String>,
    repeat: u32,
    skin_exclusions: Vec<String>,
    skin_markers_enabled: bool,
    found_canonical_tab: bool,
    missing_headings: u32,
}

impl ClassifierState {
    fn new(mode: PassMode) -> Self {
        ClassifierState {
            section: None,
            suppressed: false,
            attributed: false,
            pending_speaker: None,
            active_token: None,
            token_confirmed: false,
            prev_accepted: None,
            repeat: 1,
            skin_exclusions: Vec::new(),
            skin_markers_enabled: true,
            found_canonical_tab: mode == PassMode::Redirected,
            missing_headings: 1,
        }
    }
}

/// Tag-by-tag quote classifier for one champion's quote page.
pub struct Classifier<'a> {
    champion: &'a str,
    state: ClassifierState,
    quotes: &'a mut SectionMap,
}

impl<'a> Classifier<'a> {
    pub fn new(champion: &'a str, mode: PassMode, quotes: &'a mut SectionMap) -> Self {
        Classifier {
            champion,
            state: ClassifierState::new(mode),
            quotes,
        }
    }

    pub fn visit(&mut self, node: &Node) -> Flow {
        match node {
            Node::SkinMarker { skin } => self.on_skin_marker(skin.as_deref()),
            Node::Tab { title } => return self.on_tab(title.as_deref()),
            Node::Heading { text } => self.on_heading(text),
            Node::Link { href, text } => self.on_link(href.as_deref(), text),
            Node::ListItem { text } => self.on_list_item(text),
            Node::Italic { text } => self.on_italic(text),
            Node::Other => {}
        }
        Flow::Continue
    }

    #[cfg(test)]
    pub fn run<'n>(&mut self, nodes: impl IntoIterator<Item = &'n Node>) -> Flow {
        for node in nodes {
            if self.visit(node) == Flow::Redirect {
                return Flow::Redirect;
            }
        }
        Flow::Continue
    }

    fn on_skin_marker(&mut self, skin: Option<&str>) {
        if !self.state.skin_markers_enabled {
            return;
        }
        if let Some(skin) = skin.filter(|s| *s != DEFAULT_SKIN) {
            self.state.skin_exclusions.push(skin.to_string());
        }
    }

    fn on_tab(&mut self, title: Option<&str>) -> Flow {
        let Some(title) = title else {
            return Flow::Continue;
        };
        if self.state.found_canonical_tab
            || !(CANONICAL_TABS.contains(&title) || title == self.champion)
        {
            return Flow::Continue;
        }
        self.state.found_canonical_tab = true;
        debug!(champion = self.champion, tab = title, "canonical skin tab");
        Flow::Redirect
    }

    fn on_heading(&mut self, text: &str) {
        let s = &mut self.state;
        if HEADING_BLACKLIST.contains(&text) {
            s.suppressed = true;
            s.attributed = false;
        } else {
            if text == SKIN_MARKER_CUTOFF {
                s.skin_markers_enabled = false;
            }
            let name = strip_invisible(text);
            self.quotes.open(&name);
            s.section = Some(name);
            s.suppressed = false;
        }
        s.pending_speaker = None;
    }

    fn on_link(&mut self, href: Option<&str>, text: &str) {
        let s = &mut self.state;
        if s.suppressed {
            return;
        }
        let token = href.and_then(audio_token);

        // Karthus.tauntUrgot01 on Urgot's page: Karthus is speaking.
        if let (Some(speaker), Some(token)) = (&s.pending_speaker, token) {
            if token.starts_with(speaker.as_str()) {
                s.attributed = false;
            }
        }

        match token {
            Some(token) if !s.token_confirmed && s.attributed => {
                let excluded = s
                    .skin_exclusions
                    .iter()
                    .any(|skin| contains_ignore_case(token, &skin.replace(' ', "")));
                s.token_confirmed = !excluded;
                s.active_token = Some(token.to_string());
            }
            Some(_) => {}
            None => {
                s.pending_speaker = (!text.is_empty()).then(|| text.to_string());
            }
        }
    }

    fn on_list_item(&mut self, text: &str) {
        let s = &mut self.state;
        let Some(speaker) = &s.pending_speaker else {
            s.attributed = true;
            return;
        };
        if s.suppressed {
            return;
        }
        s.attributed = match speaker_prefix(text) {
            Some(prefix) => !(prefix.contains(speaker.as_str()) && !prefix.contains(self.champion)),
            None => true,
        };
    }

    fn on_italic(&mut self, text: &str) {
        if self.state.suppressed || !self.state.attributed {
            return;
        }
        let Some(token) = self.state.active_token.clone() else {
            return;
        };
        let is_repeat = self.state.prev_accepted.as_deref() == Some(token.as_str());
        if !(self.state.token_confirmed || is_repeat) {
            return;
        }

        let quote_id = if is_repeat {
            self.state.repeat += 1;
            format!("{}.{}", token, self.state.repeat)
        } else {
            self.state.repeat = 1;
            token.clone()
        };
        self.state.prev_accepted = Some(token.clone());

        match self.quote_text(text) {
            Some(quote) => {
                let section = self.current_section(&token);
                if let Some(old) = self.quotes.insert(&section, &quote_id, &quote) {
                    warn!(
                        champion = self.champion,
                        section = %section,
                        quote_id = %quote_id,
                        replaced = %old,
                        "quote id seen again, keeping the later quote"
                    );
                } else {
                    debug!(section = %section, quote_id = %quote_id, "quote");
                }
            }
            None => debug!(quote_id = %quote_id, "italic without quoted text"),
        }
        self.state.token_confirmed = false;
    }

    fn quote_text(&self, text: &str) -> Option<String> {
        if NON_VERBAL.contains(&self.champion) {
            return Some(strip_invisible(text));
        }
        quoted(text).map(strip_invisible)
    }

    /// The open section, or a synthesized one when the page had no heading yet.
    fn current_section(&mut self, token: &str) -> String {
        if let Some(section) = &self.state.section {
            return section.clone();
        }
        let name = if contains_ignore_case(token, "select") {
            CHAMPION_SELECT.to_string()
        } else {
            loop {
                let name = format!("(missing_h2.{})", self.state.missing_headings);
                self.state.missing_headings += 1;
                if !self.quotes.contains_section(&name) {
                    break name;
                }
            }
        };
        // A second pass may synthesize Champion Select again; keep what the first one recorded.
        if !self.quotes.contains_section(&name) {
            self.quotes.open(&name);
        }
        self.state.section = Some(name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str) -> Node {
        Node::Heading { text: text.into() }
    }

    fn audio(token: &str) -> Node {
        Node::Link {
            href: Some(format!("https://lol.fandom.com/wiki/File:{token}.ogg")),
            text: "play".into(),
        }
    }

    fn name_link(name: &str) -> Node {
        Node::Link {
            href: Some(format!("/wiki/{name}")),
            text: name.into(),
        }
    }

    fn li(text: &str) -> Node {
        Node::ListItem { text: text.into() }
    }

    fn italic(text: &str) -> Node {
        Node::Italic { text: text.into() }
    }

    fn skin(name: &str) -> Node {
        Node::SkinMarker {
            skin: Some(name.into()),
        }
    }

    fn classify(champion: &str, nodes: &[Node]) -> (SectionMap, Flow) {
        let mut quotes = SectionMap::new();
        let flow = Classifier::new(champion, PassMode::Initial, &mut quotes).run(nodes);
        (quotes, flow)
    }

    #[test]
    fn ahri_taunt() {
        let (quotes, flow) = classify(
            "Ahri",
            &[
                heading("Taunt"),
                li(r#"Ahri: "Catch me if you can!""#),
                audio("Ahri_Taunt"),
                italic(r#"Ahri: "Catch me if you can!""#),
            ],
        );
        assert_eq!(flow, Flow::Continue);
        assert_eq!(quotes.get("Taunt", "Ahri_Taunt"), Some("Catch me if you can!"));
    }

    #[test]
    fn repeated_token_is_numbered() {
        let mut nodes = vec![heading("Movement")];
        for line in ["one", "two", "three"] {
            nodes.push(li(line));
            nodes.push(audio("Ahri_Move"));
            nodes.push(italic(&format!("\"{line}\"")));
        }
        let (quotes, _) = classify("Ahri", &nodes);
        let ids: Vec<_> = quotes
            .section("Movement")
            .unwrap()
            .quotes
            .iter()
            .map(|q| q.quote_id.as_str())
            .collect();
        assert_eq!(ids, ["Ahri_Move", "Ahri_Move.2", "Ahri_Move.3"]);
        assert_eq!(quotes.get("Movement", "Ahri_Move.3"), Some("three"));
    }

    #[test]
    fn multi_line_quote_shares_audio_file() {
        let (quotes, _) = classify(
            "Ahri",
            &[
                heading("Joke"),
                li("x"),
                audio("Ahri_Joke"),
                italic("\"First line\""),
                italic("\"Second line\""),
            ],
        );
        assert_eq!(quotes.get("Joke", "Ahri_Joke"), Some("First line"));
        assert_eq!(quotes.get("Joke", "Ahri_Joke.2"), Some("Second line"));
    }

    #[test]
    fn new_token_resets_counter() {
        let (quotes, _) = classify(
            "Ahri",
            &[
                heading("Attack"),
                li("x"),
                audio("A"),
                italic("\"a\""),
                italic("\"a again\""),
                audio("B"),
                italic("\"b\""),
                audio("A"),
                italic("\"a last\""),
            ],
        );
        let ids: Vec<_> = quotes
            .section("Attack")
            .unwrap()
            .quotes
            .iter()
            .map(|q| q.quote_id.clone())
            .collect();
        assert_eq!(ids, ["A", "A.2", "B"]);
        // Non-consecutive recurrence of A overwrites the first entry.
        assert_eq!(quotes.get("Attack", "A"), Some("a last"));
    }

    #[test]
    fn blacklisted_heading_suppresses_until_next() {
        let (quotes, _) = classify(
            "Ahri",
            &[
                heading("References"),
                li("x"),
                audio("Ahri_Ref"),
                italic("\"ignored\""),
                heading("Taunt"),
                li("x"),
                audio("Ahri_Taunt"),
                italic("\"kept\""),
            ],
        );
        assert!(!quotes.contains_section("References"));
        assert_eq!(quotes.get("Taunt", "Ahri_Ref"), None);
        assert_eq!(quotes.get("Taunt", "Ahri_Taunt"), Some("kept"));
        assert_eq!(quotes.quote_count(), 1);
    }

    #[test]
    fn empty_heading_is_blacklisted() {
        let (quotes, _) = classify(
            "Ahri",
            &[heading(""), li("x"), audio("Ahri_X"), italic("\"no\"")],
        );
        assert!(quotes.is_empty());
    }

    #[test]
    fn heading_text_is_stripped() {
        let (quotes, _) = classify(
            "Ahri",
            &[heading("Taunt\u{200b}"), li("x"), audio("T"), italic("\"t\u{a0}\"")],
        );
        assert_eq!(quotes.get("Taunt", "T"), Some("t"));
    }

    #[test]
    fn missing_heading_placeholders() {
        let (quotes, _) = classify(
            "Ahri",
            &[li("x"), audio("Ahri_Move"), italic("\"go\"")],
        );
        assert_eq!(quotes.get("(missing_h2.1)", "Ahri_Move"), Some("go"));
    }

    #[test]
    fn champion_select_placeholder() {
        let (quotes, _) = classify(
            "Ahri",
            &[li("x"), audio("Ahri.Select"), italic("\"pick me\"")],
        );
        assert_eq!(quotes.get(CHAMPION_SELECT, "Ahri.Select"), Some("pick me"));
    }

    #[test]
    fn excluded_skin_token_is_not_recorded() {
        let (quotes, _) = classify(
            "Ahri",
            &[
                skin("Arcade Ahri"),
                skin("Original"),
                heading("Taunt"),
                li("x"),
                audio("ArcadeAhri_Taunt"),
                italic("\"arcade\""),
                li("x"),
                audio("Ahri_Taunt"),
                italic("\"classic\""),
            ],
        );
        assert_eq!(quotes.get("Taunt", "ArcadeAhri_Taunt"), None);
        assert_eq!(quotes.get("Taunt", "Ahri_Taunt"), Some("classic"));
    }

    #[test]
    fn excluded_skin_token_repeating_accepted_one_is_numbered() {
        let (quotes, _) = classify(
            "Ahri",
            &[
                heading("Taunt"),
                li("x"),
                audio("ArcadeAhri_Taunt"),
                italic("\"first\""),
                skin("Arcade"),
                li("x"),
                audio("ArcadeAhri_Taunt"),
                italic("\"second\""),
                li("x"),
                audio("ArcadeAhri_Joke"),
                italic("\"skipped\""),
            ],
        );
        assert_eq!(quotes.get("Taunt", "ArcadeAhri_Taunt"), Some("first"));
        assert_eq!(quotes.get("Taunt", "ArcadeAhri_Taunt.2"), Some("second"));
        assert_eq!(quotes.get("Taunt", "ArcadeAhri_Joke"), None);
        assert_eq!(quotes.quote_count(), 2);
    }

    #[test]
    fn attacking_heading_stops_skin_markers() {
        let (quotes, _) = classify(
            "Swain",
            &[
                heading("Attacking"),
                skin("Bilgewater"),
                li("x"),
                audio("Swain_Bilgewater_Attack"),
                italic("\"kept\""),
            ],
        );
        assert_eq!(quotes.get("Attacking", "Swain_Bilgewater_Attack"), Some("kept"));
    }

    #[test]
    fn other_champion_speaking_in_list_item() {
        let (quotes, _) = classify(
            "Rakan",
            &[
                heading("Interactions"),
                name_link("Xayah"),
                li(r#"Xayah: "You're cute today!""#),
                audio("Xayah_Rakan"),
                italic(r#""You're cute today!""#),
                li(r#"Rakan: "I know.""#),
                audio("Rakan_Xayah"),
                italic(r#""I know.""#),
            ],
        );
        assert_eq!(quotes.get("Interactions", "Xayah_Rakan"), None);
        assert_eq!(quotes.get("Interactions", "Rakan_Xayah"), Some("I know."));
    }

    #[test]
    fn conversing_token_clears_attribution() {
        let (quotes, _) = classify(
            "Urgot",
            &[
                heading("Interactions"),
                name_link("Karthus"),
                li("no explicit speaker"),
                audio("Karthus.tauntUrgot01"),
                italic("\"You will die.\""),
            ],
        );
        assert!(quotes.section("Interactions").unwrap().quotes.is_empty());
    }

    #[test]
    fn non_verbal_champion_keeps_whole_text() {
        let (quotes, _) = classify(
            "Bard",
            &[heading("Joke"), li("x"), audio("Bard_Joke"), italic("*chimes*")],
        );
        assert_eq!(quotes.get("Joke", "Bard_Joke"), Some("*chimes*"));
    }

    #[test]
    fn italic_without_quotes_still_consumes_token() {
        let (quotes, _) = classify(
            "Ahri",
            &[
                heading("Joke"),
                li("x"),
                audio("Ahri_Joke"),
                italic("stage direction"),
                italic("\"the real line\""),
            ],
        );
        assert_eq!(quotes.get("Joke", "Ahri_Joke"), None);
        assert_eq!(quotes.get("Joke", "Ahri_Joke.2"), Some("the real line"));
    }

    #[test]
    fn italic_before_any_audio_link_is_ignored() {
        let (quotes, _) = classify("Ahri", &[heading("Joke"), li("x"), italic("\"orphan\"")]);
        assert_eq!(quotes.quote_count(), 0);
    }

    #[test]
    fn first_canonical_tab_redirects() {
        let mut quotes = SectionMap::new();
        let mut classifier = Classifier::new("Ahri", PassMode::Initial, &mut quotes);
        assert_eq!(classifier.visit(&Node::Tab { title: Some("Arcade".into()) }), Flow::Continue);
        assert_eq!(classifier.visit(&Node::Tab { title: Some("Classic".into()) }), Flow::Redirect);
        assert_eq!(classifier.visit(&Node::Tab { title: Some("Live".into()) }), Flow::Continue);
    }

    #[test]
    fn self_named_tab_redirects() {
        let (_, flow) = classify("Ahri", &[Node::Tab { title: Some("Ahri".into()) }]);
        assert_eq!(flow, Flow::Redirect);
    }

    #[test]
    fn redirected_pass_ignores_tabs() {
        let mut quotes = SectionMap::new();
        let flow = Classifier::new("Ahri", PassMode::Redirected, &mut quotes)
            .run(&[Node::Tab { title: Some("Classic".into()) }]);
        assert_eq!(flow, Flow::Continue);
    }
}
