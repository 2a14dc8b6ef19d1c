//! Typed failures for package assembly and validation.
//!
//! Every error is fatal to the operation that raised it; there are no
//! retries and no partial packages.
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Nesting level at which an unknown folder name was encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderLevel {
    PackageRoot,
    PackageMetadata,
    Representation,
    RepresentationMetadata,
}

impl fmt::Display for FolderLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FolderLevel::PackageRoot => "package root",
            FolderLevel::PackageMetadata => "package metadata",
            FolderLevel::Representation => "representation",
            FolderLevel::RepresentationMetadata => "representation metadata",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum SipError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("error traversing {path}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unexpected folder \"{name}\" at {level} level")]
    UnexpectedFolder { name: String, level: FolderLevel },

    #[error("failed to provision schema {schema}")]
    SchemaProvisioning {
        schema: String,
        #[source]
        source: io::Error,
    },

    #[error("report parent path is not a directory: {0}")]
    InvalidReportPath(PathBuf),

    #[error("validation engine failure: {detail}")]
    ValidationEngine { detail: String },

    #[error("archive error on {path}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("i/o error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SipError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SipError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn traversal(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SipError::Traversal {
            path: path.into(),
            source,
        }
    }
}
