//! Owned XML element tree.
//!
//! Metadata records are kept as parsed element trees so that manifest
//! generation can read any field without the loader knowing about it.

use serde::Serialize;

/// A parsed XML element with its attributes, direct text and children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmlNode {
    /// Local element name (namespace prefix removed).
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated character data directly inside this element.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder helper used by tests and fixtures.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Returns the first direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Returns the value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first element matching a `/`-separated child path.
    pub fn find(&self, path: &str) -> Option<&XmlNode> {
        self.find_all(path).into_iter().next()
    }

    /// Returns every element matching a `/`-separated child path.
    ///
    /// `find_all("creators/creator")` yields the `creator` children of every
    /// `creators` child, in document order.
    pub fn find_all(&self, path: &str) -> Vec<&XmlNode> {
        let mut current: Vec<&XmlNode> = vec![self];
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|node| node.children.iter().filter(move |c| c.name == segment))
                .collect();
        }
        current
    }

    /// Whitespace-collapsed text, `None` when the element is blank.
    pub fn text(&self) -> Option<String> {
        let collapsed = collapse_whitespace(&self.text);
        if collapsed.is_empty() {
            None
        } else {
            Some(collapsed)
        }
    }

    /// Whitespace-collapsed text of the first element at `path`.
    pub fn text_at(&self, path: &str) -> Option<String> {
        self.find(path).and_then(XmlNode::text)
    }

    /// Untouched text of the first element at `path`, `None` when blank.
    pub fn raw_text_at(&self, path: &str) -> Option<&str> {
        self.find(path)
            .map(|node| node.text.as_str())
            .filter(|text| !text.trim().is_empty())
    }
}

/// Collapses every run of whitespace (including newlines) into one space.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
