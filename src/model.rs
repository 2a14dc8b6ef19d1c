//! In-memory object model for a submission package.
//!
//! The assembled [`Sip`] exclusively owns its agents, metadata entries,
//! representations, and schema references. It is built in a single pass and
//! handed to a write strategy exactly once; the serialized `manifest.json`
//! is this model rendered as JSON.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::checksum::ChecksumAlgorithm;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sip {
    pub id: String,
    pub format_version: String,
    pub content_type: String,
    pub content_information_type: ContentInformationType,
    pub description: Option<String>,
    pub checksum_algorithm: ChecksumAlgorithm,
    pub agents: Vec<Agent>,
    pub alt_record_ids: Vec<AltRecordId>,
    pub documentation: Vec<PackageFile>,
    pub descriptive_metadata: Vec<MetadataEntry>,
    pub preservation_metadata: Vec<MetadataEntry>,
    pub other_metadata: Vec<MetadataEntry>,
    pub representations: Vec<Representation>,
    pub schemas: Vec<SchemaRef>,
}

impl Sip {
    pub fn new(
        id: String,
        format_version: String,
        content_type: String,
        content_information_type: ContentInformationType,
    ) -> Self {
        Sip {
            id,
            format_version,
            content_type,
            content_information_type,
            description: None,
            checksum_algorithm: ChecksumAlgorithm::default(),
            agents: Vec::new(),
            alt_record_ids: Vec::new(),
            documentation: Vec::new(),
            descriptive_metadata: Vec::new(),
            preservation_metadata: Vec::new(),
            other_metadata: Vec::new(),
            representations: Vec::new(),
            schemas: Vec::new(),
        }
    }

    pub fn add_agent(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    pub fn add_documentation(&mut self, file: PackageFile) {
        self.documentation.push(file);
    }

    /// Attach a schema reference unless one with the same file name is
    /// already present.
    pub fn add_schema(&mut self, schema: SchemaRef) {
        if self
            .schemas
            .iter()
            .any(|existing| existing.file_name == schema.file_name)
        {
            return;
        }
        self.schemas.push(schema);
    }

    /// Every metadata entry in the package: package-level categories plus
    /// all representation-level categories.
    pub fn metadata_entries(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.descriptive_metadata
            .iter()
            .chain(&self.preservation_metadata)
            .chain(&self.other_metadata)
            .chain(
                self.representations
                    .iter()
                    .flat_map(Representation::metadata_entries),
            )
    }
}

/// Content-information classification, optionally refined by a profile URI
/// when the closed vocabulary falls back to `OTHER`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInformationType {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub role: AgentRole,
    pub kind: AgentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Agent {
    /// The tool's own record in the agent list.
    pub fn software(name: &str, version: &str) -> Self {
        Agent {
            name: name.to_string(),
            role: AgentRole::CreatorSoftware,
            kind: AgentKind::Software,
            note: Some(format!("version={version}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Creator,
    Submitter,
    CreatorSoftware,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Organization,
    Individual,
    Software,
}

/// Alternate record identifier on the package header, e.g. the submission
/// agreement reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AltRecordId {
    pub record_type: String,
    pub value: String,
}

/// One physical file plus its placement below the classifying folder.
///
/// `relative_folders` holds the directory names between the category folder
/// and the file's immediate parent; it is empty for a direct child.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageFile {
    pub source: PathBuf,
    pub file_name: String,
    pub relative_folders: Vec<String>,
}

impl PackageFile {
    pub fn new(source: PathBuf, relative_folders: Vec<String>) -> Self {
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        PackageFile {
            source,
            file_name,
            relative_folders,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub file: PackageFile,
    pub metadata_type: MetadataType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataType {
    pub kind: MetadataKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_type: Option<String>,
}

impl MetadataType {
    pub fn mods() -> Self {
        MetadataType {
            kind: MetadataKind::Mods,
            other_type: None,
        }
    }

    pub fn premis() -> Self {
        MetadataType {
            kind: MetadataKind::Premis,
            other_type: None,
        }
    }

    pub fn other() -> Self {
        MetadataType {
            kind: MetadataKind::Other,
            other_type: None,
        }
    }

    pub fn other_with(label: &str) -> Self {
        MetadataType {
            kind: MetadataKind::Other,
            other_type: Some(label.to_string()),
        }
    }

    pub fn unspecified() -> Self {
        MetadataType {
            kind: MetadataKind::Unspecified,
            other_type: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataKind {
    Mods,
    Premis,
    Other,
    Unspecified,
}

/// One logical rendition of the submitted content. Content types always
/// mirror the owning package; there is no per-representation override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Representation {
    pub name: String,
    pub content_type: String,
    pub content_information_type: ContentInformationType,
    pub data: Vec<PackageFile>,
    pub source_metadata: Vec<MetadataEntry>,
    pub technical_metadata: Vec<MetadataEntry>,
    pub other_metadata: Vec<MetadataEntry>,
}

impl Representation {
    pub fn new(
        name: String,
        content_type: String,
        content_information_type: ContentInformationType,
    ) -> Self {
        Representation {
            name,
            content_type,
            content_information_type,
            data: Vec::new(),
            source_metadata: Vec::new(),
            technical_metadata: Vec::new(),
            other_metadata: Vec::new(),
        }
    }

    pub fn metadata_entries(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.source_metadata
            .iter()
            .chain(&self.technical_metadata)
            .chain(&self.other_metadata)
    }
}

/// A reference schema file attached to the package for downstream
/// validators and consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaRef {
    pub path: PathBuf,
    pub file_name: String,
}
