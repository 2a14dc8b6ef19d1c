//! Payload digests and the checksum manifest.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::SipError;

const READ_BUF_BYTES: usize = 64 * 1024;

/// Digest algorithm for the package checksum manifest.
///
/// SHA-256 is the default; MD5 remains selectable for submission
/// agreements that still require it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ChecksumAlgorithm {
    #[default]
    Sha256,
    Md5,
}

impl ChecksumAlgorithm {
    pub fn label(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha256 => "SHA-256",
            ChecksumAlgorithm::Md5 => "MD5",
        }
    }
}

/// Hex digest of the file at `path`, streamed in fixed-size chunks.
pub fn digest_file(path: &Path, algorithm: ChecksumAlgorithm) -> Result<String, SipError> {
    let file = File::open(path).map_err(|source| SipError::io(path, source))?;
    let mut reader = BufReader::new(file);
    let mut buf = [0u8; READ_BUF_BYTES];

    match algorithm {
        ChecksumAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let n = reader
                    .read(&mut buf)
                    .map_err(|source| SipError::io(path, source))?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            Ok(hex::encode(hasher.finalize()))
        }
        ChecksumAlgorithm::Md5 => {
            let mut context = md5::Context::new();
            loop {
                let n = reader
                    .read(&mut buf)
                    .map_err(|source| SipError::io(path, source))?;
                if n == 0 {
                    break;
                }
                context.consume(&buf[..n]);
            }
            Ok(format!("{:x}", context.compute()))
        }
    }
}

/// Digest manifest covering every payload file in a serialized package,
/// keyed by package-relative path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksumManifest {
    pub algorithm: ChecksumAlgorithm,
    pub files: BTreeMap<String, String>,
}

impl ChecksumManifest {
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        ChecksumManifest {
            algorithm,
            files: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, rel_path: String, digest: String) {
        self.files.insert(rel_path, digest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("payload.bin");
        let mut file = File::create(&path).expect("create payload");
        file.write_all(content).expect("write payload");
        (dir, path)
    }

    #[test]
    fn sha256_digest_matches_known_value() {
        let (_dir, path) = write_temp(b"abc");
        let digest = digest_file(&path, ChecksumAlgorithm::Sha256).expect("digest");
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn md5_digest_matches_known_value() {
        let (_dir, path) = write_temp(b"abc");
        let digest = digest_file(&path, ChecksumAlgorithm::Md5).expect("digest");
        assert_eq!(digest, "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn digest_of_missing_file_names_the_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let missing = dir.path().join("absent.bin");
        let err = digest_file(&missing, ChecksumAlgorithm::Sha256).unwrap_err();
        assert!(err.to_string().contains("absent.bin"));
    }
}
