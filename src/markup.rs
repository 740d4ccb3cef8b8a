//! Small helpers for walking table cells of a parsed document.
//!
//! Cells of the episode list come in two shapes: the text sits directly in the cell,
//! or it is wrapped by one element such as a link.
//! [`first_text`] reads both.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// Children that carry content, i.e. without whitespace-only text and comments.
pub fn significant_children<'a>(
    element: ElementRef<'a>,
) -> impl Iterator<Item = NodeRef<'a, Node>> + 'a {
    element.children().filter(|node| match node.value() {
        Node::Text(text) => !text.trim().is_empty(),
        Node::Element(_) => true,
        _ => false,
    })
}

/// Child elements, skipping text nodes.
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.children().filter_map(ElementRef::wrap)
}

/// Child elements with the given tag name.
pub fn child_elements_named<'a>(
    element: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    child_elements(element).filter(move |child| child.value().name() == name)
}

fn as_text<'a>(node: NodeRef<'a, Node>) -> Option<&'a str> {
    match node.value() {
        Node::Text(text) => Some(&**text),
        _ => None,
    }
}

/// Text of the first content-bearing child, looking one element deep if that child is wrapped.
/// The result is trimmed.
pub fn first_text<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    let first = significant_children(element).next()?;
    if let Some(text) = as_text(first) {
        return Some(text.trim());
    }
    let wrapper = ElementRef::wrap(first)?;
    significant_children(wrapper)
        .next()
        .and_then(as_text)
        .map(str::trim)
}

/// Every text node below the element in document order, untrimmed.
pub fn descendant_texts<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element.text()
}
