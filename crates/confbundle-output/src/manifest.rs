//! Repository upload manifest (`bundle_metadata.json`).
//!
//! The manifest mirrors the fields of one `<metadata>` element. Optional
//! fields are left out of the JSON entirely when the element lacks them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use confbundle_model::{Defect, DefectKind, PublicationRecord, XmlNode, collapse_whitespace};

use crate::error::{OutputError, Result};

/// File name of the manifest inside a bundle directory.
pub const MANIFEST_FILE: &str = "bundle_metadata.json";

/// Top-level manifest document: `{"metadata": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub metadata: ManifestMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    pub title: String,
    pub creators: Vec<Creator>,
    pub description: String,
    pub access_right: String,
    pub license: String,
    /// Always present; a DOI is minted on upload when empty.
    #[serde(default)]
    pub doi: String,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_identifiers: Option<Vec<RelatedIdentifier>>,
    pub contributors: Vec<Contributor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communities: Option<Vec<Community>>,
    pub conference_title: String,
    pub conference_acronym: String,
    pub conference_dates: String,
    pub conference_place: String,
    pub conference_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub affiliation: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedIdentifier {
    pub relation: String,
    pub identifier: String,
    pub resource_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub identifier: String,
}

impl Manifest {
    /// Builds the manifest of a record.
    ///
    /// Required text fields that are missing are written as `""` and
    /// reported as [`DefectKind::MissingField`].
    pub fn from_record(record: &PublicationRecord) -> (Self, Vec<Defect>) {
        let node = &record.raw;
        let mut fields = RequiredFields {
            node,
            subject: record.display_title(),
            defects: Vec::new(),
        };

        let upload_type = node.text_at("upload_type");
        let publication_type = if upload_type.as_deref() == Some("publication") {
            node.text_at("publication_type")
        } else {
            None
        };

        let keywords = match node.text_at("keywords") {
            Some(text) => split_keywords(&text),
            None => {
                fields.report("keywords");
                Vec::new()
            }
        };

        let metadata = ManifestMetadata {
            upload_type,
            publication_type,
            publication_date: node.text_at("publication_date"),
            title: fields.text("title"),
            creators: creators(node, &mut fields),
            description: fields.text("description"),
            access_right: fields.text("access_right"),
            license: fields.text("license"),
            doi: node.text_at("doi").unwrap_or_default(),
            keywords,
            related_identifiers: related_identifiers(node),
            contributors: contributors(node, &mut fields),
            communities: communities(node),
            conference_title: fields.text("conference_title"),
            conference_acronym: fields.text("conference_acronym"),
            conference_dates: fields.text("conference_dates"),
            conference_place: fields.text("conference_place"),
            conference_url: fields.text("conference_url"),
            language: node.text_at("language"),
            notes: node.text_at("notes"),
            references: node.text_at("references"),
        };
        debug!(
            title = %metadata.title,
            missing = fields.defects.len(),
            "built manifest"
        );
        (Self { metadata }, fields.defects)
    }

    /// Writes the manifest as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| OutputError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| OutputError::io(path, e))
    }

    /// Reads a manifest written by [`Manifest::write`].
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| OutputError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| OutputError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

struct RequiredFields<'a> {
    node: &'a XmlNode,
    subject: String,
    defects: Vec<Defect>,
}

impl RequiredFields<'_> {
    fn text(&mut self, field: &str) -> String {
        match self.node.text_at(field) {
            Some(text) => text,
            None => {
                self.report(field);
                String::new()
            }
        }
    }

    fn report(&mut self, field: &str) {
        self.defects.push(Defect::new(
            DefectKind::MissingField,
            &self.subject,
            format!("<{field}> is missing or empty"),
        ));
    }
}

/// Splits a `", "`-separated keyword list, dropping quotes and empty entries.
pub fn split_keywords(text: &str) -> Vec<String> {
    text.split(", ")
        .map(|keyword| collapse_whitespace(&keyword.replace('"', "")))
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

/// Creators without a name are left out and reported by position.
fn creators(node: &XmlNode, fields: &mut RequiredFields<'_>) -> Vec<Creator> {
    let mut creators = Vec::new();
    for (position, creator) in node.find_all("creators/creator").into_iter().enumerate() {
        let Some(name) = creator.text_at("name") else {
            fields.report(&format!("creators/creator[{}]/name", position + 1));
            continue;
        };
        creators.push(Creator {
            name,
            affiliation: creator.text_at("affiliation"),
            orcid: creator.text_at("orcid"),
        });
    }
    creators
}

fn contributors(node: &XmlNode, fields: &mut RequiredFields<'_>) -> Vec<Contributor> {
    let mut contributors = Vec::new();
    for (position, contributor) in node
        .find_all("contributors/contributor")
        .into_iter()
        .enumerate()
    {
        let Some(name) = contributor.text_at("name") else {
            fields.report(&format!("contributors/contributor[{}]/name", position + 1));
            continue;
        };
        contributors.push(Contributor {
            name,
            affiliation: contributor.text_at("affiliation").unwrap_or_default(),
            kind: contributor.text_at("type").unwrap_or_default(),
            orcid: contributor.text_at("orcid"),
        });
    }
    contributors
}

fn related_identifiers(node: &XmlNode) -> Option<Vec<RelatedIdentifier>> {
    let identifiers: Vec<RelatedIdentifier> = node
        .find_all("related_identifiers/related_identifier")
        .into_iter()
        .map(|related| RelatedIdentifier {
            relation: related.text_at("relation").unwrap_or_default(),
            identifier: related.text_at("identifier").unwrap_or_default(),
            resource_type: related.text_at("resource_type").unwrap_or_default(),
        })
        .collect();
    (!identifiers.is_empty()).then_some(identifiers)
}

fn communities(node: &XmlNode) -> Option<Vec<Community>> {
    let communities: Vec<Community> = node
        .find_all("communities/identifier")
        .into_iter()
        .filter_map(XmlNode::text)
        .map(|identifier| Community { identifier })
        .collect();
    (!communities.is_empty()).then_some(communities)
}
