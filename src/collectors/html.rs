use scraper::{ElementRef, Selector};

use crate::error::AdapterError;

pub fn selector(css: &str) -> Result<Selector, AdapterError> {
    Selector::parse(css).map_err(|e| AdapterError::Parse(format!("bad selector '{css}': {e}")))
}

/// Whitespace-collapsed text of the first match, empty when nothing matches.
pub fn text_of(element: &ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|found| collapse_whitespace(found.text()))
        .unwrap_or_default()
}

/// First non-empty text among several candidate selectors.
pub fn first_text(element: &ElementRef<'_>, selectors: &[&Selector]) -> String {
    selectors
        .iter()
        .map(|selector| text_of(element, selector))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

pub fn attr_of(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .find_map(|found| found.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

pub fn own_attr(element: &ElementRef<'_>, attr: &str) -> Option<String> {
    element
        .value()
        .attr(attr)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

pub fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for word in parts.flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

pub fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn text_is_collapsed_across_child_nodes() {
        let doc = Html::parse_fragment("<div><h3>\n  Senior <b>Rust</b>\n Engineer </h3></div>");
        let root = doc.root_element();
        let h3 = selector("h3").unwrap();
        assert_eq!(text_of(&root, &h3), "Senior Rust Engineer");
    }

    #[test]
    fn missing_nodes_yield_empty_text() {
        let doc = Html::parse_fragment("<div><span>x</span></div>");
        let root = doc.root_element();
        let h3 = selector("h3").unwrap();
        let span = selector("span").unwrap();
        assert_eq!(text_of(&root, &h3), "");
        assert_eq!(first_text(&root, &[&h3, &span]), "x");
        assert_eq!(attr_of(&root, &span, "href"), None);
    }

    #[test]
    fn invalid_selector_is_a_parse_error() {
        assert!(matches!(selector("div[["), Err(AdapterError::Parse(_))));
    }
}
