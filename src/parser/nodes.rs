use scraper::ElementRef;

/// The markup the quote classifier reacts to. Everything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `<span data-skin=…>`
    SkinMarker { skin: Option<String> },
    /// `<div title=…>`, a tab of a skin selector.
    Tab { title: Option<String> },
    /// `<h2>`
    Heading { text: String },
    /// `<a href=…>`
    Link { href: Option<String>, text: String },
    /// `<li>`
    ListItem { text: String },
    /// `<i>`, the quote text itself.
    Italic { text: String },
    Other,
}

impl Node {
    pub fn from_element(el: ElementRef<'_>) -> Node {
        let attr = |name: &str| el.value().attr(name).map(str::to_string);
        let text = || el.text().collect::<String>();

        match el.value().name() {
            "span" => Node::SkinMarker {
                skin: attr("data-skin"),
            },
            "div" => Node::Tab {
                title: attr("title"),
            },
            "h2" => Node::Heading { text: text() },
            "a" => Node::Link {
                href: attr("href"),
                text: text(),
            },
            "li" => Node::ListItem { text: text() },
            "i" => Node::Italic { text: text() },
            _ => Node::Other,
        }
    }
}

/// Every element below `root` in document order, `root` itself excluded.
pub fn descendants<'a>(root: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn nodes(html: &str) -> Vec<Node> {
        let doc = Html::parse_fragment(html);
        descendants(doc.root_element()).map(Node::from_element).collect()
    }

    #[test]
    fn classifies_known_tags() {
        let got = nodes(
            r#"<h2>Taunt</h2><ul><li><a href="/wiki/File:Ahri_Taunt.ogg">play</a> <i>"Hi"</i></li></ul>"#,
        );
        assert_eq!(
            got,
            vec![
                Node::Heading { text: "Taunt".into() },
                Node::Other,
                Node::ListItem { text: "play \"Hi\"".into() },
                Node::Link {
                    href: Some("/wiki/File:Ahri_Taunt.ogg".into()),
                    text: "play".into()
                },
                Node::Italic { text: "\"Hi\"".into() },
            ]
        );
    }

    #[test]
    fn reads_skin_and_tab_attributes() {
        let got = nodes(r#"<div title="Classic"><span data-skin="Arcade"></span><span></span></div>"#);
        assert_eq!(
            got,
            vec![
                Node::Tab { title: Some("Classic".into()) },
                Node::SkinMarker { skin: Some("Arcade".into()) },
                Node::SkinMarker { skin: None },
            ]
        );
    }

    #[test]
    fn preorder_traversal() {
        let got = nodes("<div><h2>A</h2><p><i>x</i></p></div><h2>B</h2>");
        let headings: Vec<_> = got
            .iter()
            .filter_map(|n| match n {
                Node::Heading { text } => Some(text.as_str()),
                Node::Italic { .. } => Some("i"),
                _ => None,
            })
            .collect();
        assert_eq!(headings, ["A", "i", "B"]);
    }
}
