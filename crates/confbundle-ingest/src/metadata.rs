//! Conference metadata file loading.

use std::path::Path;

use tracing::{debug, warn};

use confbundle_model::{PublicationRecord, XmlNode};

use crate::error::{IngestError, Result};
use crate::xml::{parse_document, read_document};

/// Element name of one publication inside the metadata file.
pub const RECORD_ELEMENT: &str = "metadata";

/// Loads all publication records from a metadata file.
///
/// Records keep the order of the `<metadata>` elements; matching depends on it.
pub fn load_metadata(path: &Path) -> Result<Vec<PublicationRecord>> {
    let root = read_document(path)?;
    records_from_root(root, path)
}

/// Parses publication records from an in-memory metadata document.
pub fn parse_metadata(source: &str, path: &Path) -> Result<Vec<PublicationRecord>> {
    let root = parse_document(source, path)?;
    records_from_root(root, path)
}

fn records_from_root(root: XmlNode, path: &Path) -> Result<Vec<PublicationRecord>> {
    let nodes: Vec<XmlNode> = if root.name == RECORD_ELEMENT {
        vec![root]
    } else {
        root.children
            .into_iter()
            .filter(|child| child.name == RECORD_ELEMENT)
            .collect()
    };
    if nodes.is_empty() {
        return Err(IngestError::NoRecords {
            path: path.to_path_buf(),
        });
    }

    let records: Vec<PublicationRecord> = nodes
        .into_iter()
        .enumerate()
        .map(|(index, node)| PublicationRecord::from_node(index, node))
        .collect();

    for record in &records {
        if record.title.is_none() {
            warn!(index = record.index, "publication has no title");
        }
        if record.creators.is_empty() {
            warn!(title = %record.display_title(), "publication has no creators");
        }
    }
    debug!(path = %path.display(), count = records.len(), "loaded metadata records");
    Ok(records)
}
