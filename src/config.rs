//! Generator configuration with documented defaults.
//!
//! Everything the original convention fixes per deployment lives here:
//! format version, digest algorithm, write strategy, content types, and
//! the creator/submitter identities. A JSON config file may override any
//! subset of fields.
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::checksum::ChecksumAlgorithm;
use crate::model::{Agent, AgentKind, AgentRole, ContentInformationType};
use crate::write::WriteStrategy;

pub const DEFAULT_FORMAT_VERSION: &str = "2.2.0";
pub const DEFAULT_CONTENT_TYPE: &str = "photographs_digital";
pub const DEFAULT_CONTENT_INFORMATION_PROFILE: &str =
    "https://digitalpreservation.no/nb/docs/dps/sip/1.0/profiles/images/";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub format_version: String,
    pub checksum_algorithm: ChecksumAlgorithm,
    pub write_strategy: WriteStrategy,
    pub content_type: String,
    pub content_information_type: ContentInformationType,
    pub creator: AgentConfig,
    pub submitter: AgentConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            format_version: DEFAULT_FORMAT_VERSION.to_string(),
            checksum_algorithm: ChecksumAlgorithm::default(),
            write_strategy: WriteStrategy::default(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            content_information_type: ContentInformationType {
                value: "OTHER".to_string(),
                other_type: Some(DEFAULT_CONTENT_INFORMATION_PROFILE.to_string()),
            },
            creator: AgentConfig {
                name: "Stiftelsen Helgeland Museum".to_string(),
                note: Some("Organisasjonsnummer:987654321".to_string()),
            },
            submitter: AgentConfig {
                name: "KulturIT AS".to_string(),
                note: Some("Organisasjonsnummer:123456789".to_string()),
            },
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("read config {}", path.display()))?;
        let config: GeneratorConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.format_version.trim().is_empty() {
            bail!("config format_version must not be empty");
        }
        if self.creator.name.trim().is_empty() {
            bail!("config creator name must not be empty");
        }
        if self.submitter.name.trim().is_empty() {
            bail!("config submitter name must not be empty");
        }
        Ok(())
    }
}

/// One configured organization identity, with an optional identification
/// note (e.g. an organization registry number).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
    pub note: Option<String>,
}

impl AgentConfig {
    pub fn to_agent(&self, role: AgentRole) -> Agent {
        Agent {
            name: self.name.clone(),
            role,
            kind: AgentKind::Organization,
            note: self.note.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_image_profile() {
        let config = GeneratorConfig::default();
        assert_eq!(config.format_version, DEFAULT_FORMAT_VERSION);
        assert_eq!(config.checksum_algorithm, ChecksumAlgorithm::Sha256);
        assert_eq!(config.write_strategy, WriteStrategy::Folder);
        assert_eq!(
            config.content_information_type.other_type.as_deref(),
            Some(DEFAULT_CONTENT_INFORMATION_PROFILE)
        );
    }

    #[test]
    fn partial_config_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "checksum_algorithm": "md5",
                "creator": { "name": "Museum of Testing" }
            }"#,
        )
        .expect("write config");

        let config = GeneratorConfig::load(&path).expect("load config");
        assert_eq!(config.checksum_algorithm, ChecksumAlgorithm::Md5);
        assert_eq!(config.creator.name, "Museum of Testing");
        assert!(config.creator.note.is_none());
        // untouched fields keep their defaults
        assert_eq!(config.submitter.name, "KulturIT AS");
        assert_eq!(config.format_version, DEFAULT_FORMAT_VERSION);
    }

    #[test]
    fn empty_creator_name_is_rejected() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "creator": { "name": "" } }"#).expect("write config");
        assert!(GeneratorConfig::load(&path).is_err());
    }
}
