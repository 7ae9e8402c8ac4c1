use scraper::{Html, Selector};

/// Elements whose text is code or page chrome rather than content.
pub const BOILERPLATE_TAGS: &str = "script, style, nav, footer, aside";

/// Parses decoded markup and detaches every boilerplate element.
///
/// html5ever recovers from any input, so this always yields a tree.
pub fn normalize(markup: &str) -> Html {
    let mut document = Html::parse_document(markup);
    strip_boilerplate(&mut document);
    document
}

pub fn strip_boilerplate(document: &mut Html) {
    let Ok(selector) = Selector::parse(BOILERPLATE_TAGS) else {
        return;
    };
    let ids: Vec<_> = document.root_element().select(&selector).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_text(document: &Html) -> String {
        let body = Selector::parse("body").unwrap();
        document
            .root_element()
            .select(&body)
            .next()
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    #[test]
    fn removes_boilerplate_subtrees() {
        let html = r#"<html><head><style>p { color: red }</style></head><body>
            <nav><a href="/">Home</a></nav>
            <p>Keep me</p>
            <script>var x = 1;</script>
            <aside>Related</aside>
            <footer><p>Copyright</p></footer>
        </body></html>"#;

        let document = normalize(html);
        let text = body_text(&document);

        assert!(text.contains("Keep me"));
        for gone in ["Home", "var x", "Related", "Copyright", "color"] {
            assert!(!text.contains(gone), "{gone} should be stripped");
        }
        let any = Selector::parse(BOILERPLATE_TAGS).unwrap();
        assert_eq!(document.root_element().select(&any).count(), 0);
    }

    #[test]
    fn nested_boilerplate_is_removed_once() {
        let html = "<body><footer><nav>Links</nav><script>x()</script></footer><p>Body</p></body>";
        let document = normalize(html);

        assert_eq!(body_text(&document), "Body");
    }

    #[test]
    fn malformed_markup_still_parses() {
        let document = normalize("<div><p>unclosed <b>bold <i>mixed</div></p>");
        assert!(body_text(&document).contains("unclosed bold mixed"));
    }
}
