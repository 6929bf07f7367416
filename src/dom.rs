//! Generic attributed node tree.
//!
//! Every renderable piece of a form (the form itself, fieldsets, controls,
//! labels, options) is lowered to a [`Node`] before markup is produced. A node
//! owns its attributes in insertion order, an optional text body and an
//! ordered list of children.

use indexmap::IndexMap;
use std::fmt;

/// Indentation unit used when `render` is not given one.
pub const DEFAULT_INDENT: &str = "    ";

/// Elements that never carry content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// A single markup node.
///
/// # Examples
///
/// ```rust
/// use forma::dom::Node;
/// let mut div = Node::new("div");
/// div.set_attribute("class", "row");
/// div.add_child(Node::with_text("span", "a < b"));
/// assert_eq!(
///     div.render(0, None),
///     "<div class=\"row\">\n    <span>a &lt; b</span>\n</div>\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    name: String,
    attributes: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a node with a text body.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ------------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------------

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn set_attributes<K, V, I>(&mut self, attributes: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in attributes {
            self.attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }

    /// Builder form of [`Node::set_attribute`].
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    // ------------------------------------------------------------------------
    // Text and children
    // ------------------------------------------------------------------------

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    pub fn add_child(&mut self, child: Node) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn add_children(&mut self, children: impl IntoIterator<Item = Node>) -> &mut Self {
        self.children.extend(children);
        self
    }

    /// Builder form of [`Node::add_child`].
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn clear_children(&mut self) -> &mut Self {
        self.children.clear();
        self
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    /// Finds the first descendant (depth first, self included) with `name`.
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Renders the node and its subtree.
    ///
    /// `depth` is the nesting level of this node, `indent` the unit repeated
    /// once per level (four spaces when `None`). Every element starts on its
    /// own line; childless elements close on the same line.
    pub fn render(&self, depth: usize, indent: Option<&str>) -> String {
        let mut out = String::new();
        self.write_markup(&mut out, depth, indent.unwrap_or(DEFAULT_INDENT));
        out
    }

    fn write_markup(&self, out: &mut String, depth: usize, unit: &str) {
        let pad = unit.repeat(depth);
        out.push_str(&pad);
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
        if self.is_void() {
            out.push_str(" />\n");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&html_escape::encode_text(text));
        }
        if !self.children.is_empty() {
            out.push('\n');
            for child in &self.children {
                child.write_markup(out, depth + 1, unit);
            }
            out.push_str(&pad);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push_str(">\n");
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_elements_self_close() {
        let input = Node::new("input").attr("type", "text").attr("name", "q");
        assert_eq!(input.render(1, Some("  ")), "  <input type=\"text\" name=\"q\" />\n");
    }

    #[test]
    fn attribute_values_are_escaped() {
        let node = Node::new("option").attr("value", "\"quoted\"");
        assert_eq!(node.render(0, None), "<option value=\"&quot;quoted&quot;\"></option>\n");
    }

    #[test]
    fn attribute_order_follows_insertion() {
        let mut node = Node::new("form");
        node.set_attributes([("method", "post"), ("action", "/x")]);
        node.set_attribute("method", "get");
        let keys: Vec<_> = node.attributes().keys().cloned().collect();
        assert_eq!(keys, vec!["method", "action"]);
    }

    #[test]
    fn find_descends_depth_first() {
        let tree = Node::new("form").child(Node::new("fieldset").child(Node::with_text("legend", "L")));
        assert_eq!(tree.find("legend").and_then(Node::text), Some("L"));
        assert!(tree.find("select").is_none());
    }
}
