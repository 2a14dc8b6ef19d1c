//! Closed folder-name vocabulary for the package layout convention.
//!
//! Each level of the fixed three-level layout has its own enum, so
//! dispatch over folder categories is a total `match` and an unknown name
//! is a typed error naming the folder and its level.
use crate::error::{FolderLevel, SipError};

/// Folders allowed directly under the package root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootFolder {
    Documentation,
    Metadata,
    Representations,
}

impl RootFolder {
    pub fn from_name(name: &str) -> Result<Self, SipError> {
        match name {
            "documentation" => Ok(RootFolder::Documentation),
            "metadata" => Ok(RootFolder::Metadata),
            "representations" => Ok(RootFolder::Representations),
            _ => Err(unexpected(name, FolderLevel::PackageRoot)),
        }
    }
}

/// Package-level metadata categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageMetadataFolder {
    Descriptive,
    Preservation,
    Other,
}

impl PackageMetadataFolder {
    pub fn from_name(name: &str) -> Result<Self, SipError> {
        match name {
            "descriptive" => Ok(PackageMetadataFolder::Descriptive),
            "preservation" => Ok(PackageMetadataFolder::Preservation),
            "other" => Ok(PackageMetadataFolder::Other),
            _ => Err(unexpected(name, FolderLevel::PackageMetadata)),
        }
    }
}

/// Folders allowed under one representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationFolder {
    Data,
    Metadata,
}

impl RepresentationFolder {
    pub fn from_name(name: &str) -> Result<Self, SipError> {
        match name {
            "data" => Ok(RepresentationFolder::Data),
            "metadata" => Ok(RepresentationFolder::Metadata),
            _ => Err(unexpected(name, FolderLevel::Representation)),
        }
    }
}

/// Representation-level metadata categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationMetadataFolder {
    Source,
    Technical,
    Other,
}

impl RepresentationMetadataFolder {
    pub fn from_name(name: &str) -> Result<Self, SipError> {
        match name {
            "source" => Ok(RepresentationMetadataFolder::Source),
            "technical" => Ok(RepresentationMetadataFolder::Technical),
            "other" => Ok(RepresentationMetadataFolder::Other),
            _ => Err(unexpected(name, FolderLevel::RepresentationMetadata)),
        }
    }
}

fn unexpected(name: &str, level: FolderLevel) -> SipError {
    SipError::UnexpectedFolder {
        name: name.to_string(),
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_folder_accepts_the_three_category_names() {
        assert_eq!(
            RootFolder::from_name("documentation").unwrap(),
            RootFolder::Documentation
        );
        assert_eq!(
            RootFolder::from_name("metadata").unwrap(),
            RootFolder::Metadata
        );
        assert_eq!(
            RootFolder::from_name("representations").unwrap(),
            RootFolder::Representations
        );
    }

    #[test]
    fn unknown_root_folder_is_named_in_the_error() {
        let err = RootFolder::from_name("extra").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("extra"));
        assert!(message.contains("package root"));
    }

    #[test]
    fn folder_names_are_exact_match() {
        assert!(RootFolder::from_name("Metadata").is_err());
        assert!(PackageMetadataFolder::from_name("DESCRIPTIVE").is_err());
    }

    #[test]
    fn representation_levels_reject_unknown_names() {
        let err = RepresentationFolder::from_name("payload").unwrap_err();
        assert!(err.to_string().contains("representation"));

        let err = RepresentationMetadataFolder::from_name("descriptive").unwrap_err();
        assert!(err.to_string().contains("representation metadata"));
    }
}
