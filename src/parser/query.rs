//! Structural queries over a parsed HTML document
//!
//! A thin layer over `scraper` exposing exactly what the extractor needs:
//! select all nodes, select one node inside another, read text, classes and
//! attributes.

use scraper::{ElementRef, Html, Selector};

use crate::utils::normalize_whitespace;

/// Parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full HTML document
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All elements matching `selector`, in document order
    pub fn find_all<'a>(&'a self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.html.select(selector).collect()
    }
}

/// First descendant of `node` matching `selector`
pub fn find<'a>(node: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    node.select(selector).next()
}

/// All descendants of `node` matching `selector`, in document order
pub fn find_all_in<'a>(node: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    node.select(selector).collect()
}

/// Text content of `node` with whitespace collapsed and trimmed
pub fn text(node: ElementRef<'_>) -> String {
    normalize_whitespace(&node.text().collect::<String>())
}

/// Whether `node` carries the class `name`
pub fn has_class(node: ElementRef<'_>, name: &str) -> bool {
    node.value().classes().any(|class| class == name)
}

/// Attribute value, `None` when missing or blank
pub fn attr<'a>(node: ElementRef<'a>, name: &str) -> Option<&'a str> {
    node.value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
