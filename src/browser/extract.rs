//! Text extraction from static HTML

use scraper::{ElementRef, Html, Node, Selector};

/// Extracts the document title
///
/// Returns an empty string when the page has no `<title>`.
pub fn extract_title(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extracts the text a reader would see in the page body
///
/// Text inside any element matching one of the `exclude` selectors is dropped
/// together with its descendants. Invalid selectors are ignored. Whitespace is
/// not collapsed here; the crawler cleans it up afterwards.
///
/// # Example
///
/// ```
/// use sumi_scout::browser::extract_visible_text;
///
/// let html = "<body><nav>Menu</nav><p>Hello</p><script>x()</script></body>";
/// let text = extract_visible_text(html, &["nav", "script"]);
/// assert_eq!(text.trim(), "Hello");
/// ```
pub fn extract_visible_text(html: &str, exclude: &[&str]) -> String {
    let document = Html::parse_document(html);
    let excluded: Vec<Selector> = exclude
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect();

    let root = Selector::parse("body")
        .ok()
        .and_then(|body| document.select(&body).next())
        .unwrap_or_else(|| document.root_element());

    let mut out = String::new();
    collect_text(root, &excluded, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, excluded: &[Selector], out: &mut String) {
    if excluded.iter().any(|selector| selector.matches(&element)) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, excluded, out);
                }
            }
            _ => {}
        }
    }
}
