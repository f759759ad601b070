//! Titles of TEI publication files.

use std::path::Path;

use confbundle_model::{XmlNode, collapse_whitespace};

use crate::error::Result;
use crate::xml::{parse_document, read_document};

/// Title of a TEI document.
///
/// A single `<title>` gives its text. With several titles, those typed `main`
/// or `sub` are joined by a space. `None` when nothing usable is found.
pub fn xml_title(path: &Path) -> Result<Option<String>> {
    let root = read_document(path)?;
    Ok(title_of(&root))
}

/// Same as [`xml_title`] for an in-memory document.
pub fn parse_xml_title(source: &str, path: &Path) -> Result<Option<String>> {
    let root = parse_document(source, path)?;
    Ok(title_of(&root))
}

fn title_of(root: &XmlNode) -> Option<String> {
    let mut titles = Vec::new();
    collect_titles(root, &mut titles);

    if let [only] = titles.as_slice() {
        return only.text();
    }
    let parts: Vec<String> = titles
        .iter()
        .filter(|title| matches!(title.attribute("type"), Some("main" | "sub")))
        .filter_map(|title| title.text())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(collapse_whitespace(&parts.join(" ")))
    }
}

fn collect_titles<'a>(node: &'a XmlNode, out: &mut Vec<&'a XmlNode>) {
    for child in &node.children {
        if child.name == "title" {
            out.push(child);
        }
        collect_titles(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(source: &str) -> Option<String> {
        parse_xml_title(source, Path::new("paper.xml")).unwrap()
    }

    #[test]
    fn test_single_title() {
        let doc = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><teiHeader><fileDesc>
            <titleStmt><title>  Digitale
              Editionen </title></titleStmt></fileDesc></teiHeader></TEI>"#;
        assert_eq!(title(doc).as_deref(), Some("Digitale Editionen"));
    }

    #[test]
    fn test_main_and_sub_titles_joined() {
        let doc = r#"<TEI><teiHeader><fileDesc><titleStmt>
            <title type="main">Netzwerke</title>
            <title type="sub">Eine Fallstudie</title>
            </titleStmt><sourceDesc><title>Ignored</title></sourceDesc></fileDesc></teiHeader></TEI>"#;
        assert_eq!(title(doc).as_deref(), Some("Netzwerke Eine Fallstudie"));
    }

    #[test]
    fn test_no_title() {
        assert_eq!(title("<TEI><text/></TEI>"), None);
    }

    #[test]
    fn test_untyped_titles_are_ambiguous() {
        assert_eq!(title("<TEI><title>A</title><title>B</title></TEI>"), None);
    }
}
