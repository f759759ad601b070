use serde::Serialize;

use crate::xml::XmlNode;

/// One `<metadata>` element of a conference metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicationRecord {
    /// Zero-based position of the element in the metadata file.
    pub index: usize,
    /// Whitespace-collapsed title; `None` when the element is missing or blank.
    pub title: Option<String>,
    /// Title text exactly as written, used for filename matching; `None`
    /// whenever `title` is.
    pub raw_title: Option<String>,
    /// Raw creator names in `"Surname, Given"` form, in document order.
    pub creators: Vec<String>,
    /// The untouched metadata element.
    #[serde(skip)]
    pub raw: XmlNode,
}

impl PublicationRecord {
    /// Builds a record from a parsed `<metadata>` element.
    pub fn from_node(index: usize, raw: XmlNode) -> Self {
        let title = raw.text_at("title");
        let raw_title = raw.raw_text_at("title").map(str::to_string);
        let creators = raw
            .find_all("creators/creator")
            .into_iter()
            .filter_map(|creator| creator.raw_text_at("name"))
            .map(str::to_string)
            .collect();
        Self {
            index,
            title,
            raw_title,
            creators,
            raw,
        }
    }

    /// Title for logs and reports.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("<untitled record #{}>", self.index + 1),
        }
    }
}
