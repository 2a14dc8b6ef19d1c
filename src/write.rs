//! Write strategies: serialize an assembled package as a folder or a zip
//! archive.
//!
//! Both strategies emit the same layout: `manifest.json` (the package
//! model), payload files under `documentation/`, `metadata/<category>/`,
//! `representations/<name>/{data,metadata/<category>}/`, the needed
//! reference schemas under `schemas/`, and `checksums.json` covering every
//! payload file.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::checksum::{self, ChecksumManifest};
use crate::error::SipError;
use crate::model::{MetadataEntry, PackageFile, Sip};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const CHECKSUMS_FILE: &str = "checksums.json";

/// Physical serialization form of the package.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum WriteStrategy {
    #[default]
    Folder,
    Zip,
}

/// Serialize `sip` under `out_dir` and return the created package path
/// (a directory for the folder strategy, a `.zip` file otherwise).
pub fn write_package(
    sip: &Sip,
    out_dir: &Path,
    strategy: WriteStrategy,
) -> Result<PathBuf, SipError> {
    let entries = plan_entries(sip);
    let path = match strategy {
        WriteStrategy::Folder => write_folder(sip, out_dir, &entries)?,
        WriteStrategy::Zip => write_zip(sip, out_dir, &entries)?,
    };
    tracing::info!(
        package = %path.display(),
        strategy = ?strategy,
        checksum = sip.checksum_algorithm.label(),
        files = entries.len(),
        "package serialized"
    );
    Ok(path)
}

/// One payload file and its package-relative destination.
pub(crate) struct PlannedEntry {
    pub(crate) rel_path: String,
    pub(crate) source: PathBuf,
}

/// Flatten the package into payload entries in layout order.
pub(crate) fn plan_entries(sip: &Sip) -> Vec<PlannedEntry> {
    let mut entries = Vec::new();

    for file in &sip.documentation {
        entries.push(file_entry(&["documentation"], file));
    }

    for (category, list) in [
        ("descriptive", &sip.descriptive_metadata),
        ("preservation", &sip.preservation_metadata),
        ("other", &sip.other_metadata),
    ] {
        entries.extend(metadata_entries(&["metadata", category], list));
    }

    for representation in &sip.representations {
        let name = representation.name.as_str();
        for file in &representation.data {
            entries.push(file_entry(&["representations", name, "data"], file));
        }
        for (category, list) in [
            ("source", &representation.source_metadata),
            ("technical", &representation.technical_metadata),
            ("other", &representation.other_metadata),
        ] {
            entries.extend(metadata_entries(
                &["representations", name, "metadata", category],
                list,
            ));
        }
    }

    for schema in &sip.schemas {
        entries.push(PlannedEntry {
            rel_path: format!("schemas/{}", schema.file_name),
            source: schema.path.clone(),
        });
    }

    entries
}

fn metadata_entries<'a>(
    prefix: &[&str],
    list: &'a [MetadataEntry],
) -> impl Iterator<Item = PlannedEntry> + 'a {
    let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
    list.iter()
        .map(move |entry| file_entry_owned(&prefix, &entry.file))
}

fn file_entry(prefix: &[&str], file: &PackageFile) -> PlannedEntry {
    let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
    file_entry_owned(&prefix, file)
}

fn file_entry_owned(prefix: &[String], file: &PackageFile) -> PlannedEntry {
    let mut parts: Vec<&str> = prefix.iter().map(String::as_str).collect();
    parts.extend(file.relative_folders.iter().map(String::as_str));
    parts.push(&file.file_name);
    PlannedEntry {
        rel_path: parts.join("/"),
        source: file.source.clone(),
    }
}

fn write_folder(
    sip: &Sip,
    out_dir: &Path,
    entries: &[PlannedEntry],
) -> Result<PathBuf, SipError> {
    let package_dir = out_dir.join(&sip.id);
    fs::create_dir_all(&package_dir).map_err(|source| SipError::io(&package_dir, source))?;

    let mut checksums = ChecksumManifest::new(sip.checksum_algorithm);
    for entry in entries {
        let dest = package_dir.join(&entry.rel_path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| SipError::io(parent, source))?;
        }
        fs::copy(&entry.source, &dest).map_err(|source| SipError::io(&entry.source, source))?;
        checksums.insert(
            entry.rel_path.clone(),
            checksum::digest_file(&entry.source, sip.checksum_algorithm)?,
        );
    }

    write_json(&package_dir.join(MANIFEST_FILE), sip)?;
    write_json(&package_dir.join(CHECKSUMS_FILE), &checksums)?;
    Ok(package_dir)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SipError> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|source| SipError::io(path, io::Error::other(source)))?;
    fs::write(path, bytes).map_err(|source| SipError::io(path, source))
}

fn write_zip(sip: &Sip, out_dir: &Path, entries: &[PlannedEntry]) -> Result<PathBuf, SipError> {
    fs::create_dir_all(out_dir).map_err(|source| SipError::io(out_dir, source))?;
    let zip_path = out_dir.join(format!("{}.zip", sip.id));
    let file = File::create(&zip_path).map_err(|source| SipError::io(&zip_path, source))?;
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    // Entries are placed under a top-level folder named after the package,
    // so unpacking an archive yields the same tree as the folder strategy.
    let mut checksums = ChecksumManifest::new(sip.checksum_algorithm);
    for entry in entries {
        writer
            .start_file(format!("{}/{}", sip.id, entry.rel_path), options)
            .map_err(|source| SipError::Archive {
                path: zip_path.clone(),
                source,
            })?;
        let mut source =
            File::open(&entry.source).map_err(|source| SipError::io(&entry.source, source))?;
        io::copy(&mut source, &mut writer)
            .map_err(|source| SipError::io(&entry.source, source))?;
        checksums.insert(
            entry.rel_path.clone(),
            checksum::digest_file(&entry.source, sip.checksum_algorithm)?,
        );
    }

    for (name, bytes) in [
        (MANIFEST_FILE, to_json_bytes(sip, &zip_path)?),
        (CHECKSUMS_FILE, to_json_bytes(&checksums, &zip_path)?),
    ] {
        writer
            .start_file(format!("{}/{}", sip.id, name), options)
            .map_err(|source| SipError::Archive {
                path: zip_path.clone(),
                source,
            })?;
        writer
            .write_all(&bytes)
            .map_err(|source| SipError::io(&zip_path, source))?;
    }

    writer.finish().map_err(|source| SipError::Archive {
        path: zip_path.clone(),
        source,
    })?;
    Ok(zip_path)
}

fn to_json_bytes<T: Serialize>(value: &T, path: &Path) -> Result<Vec<u8>, SipError> {
    serde_json::to_vec_pretty(value).map_err(|source| SipError::io(path, io::Error::other(source)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble;
    use crate::config::GeneratorConfig;
    use crate::schemas::SchemaCache;

    fn write_file(path: &Path, content: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parents");
        }
        fs::write(path, content).expect("write file");
    }

    fn assembled_sip(dir: &Path) -> Sip {
        let root = dir.join("batch_007");
        write_file(&root.join("representations/rep1/data/photo.jpg"), b"jpeg");
        write_file(&root.join("metadata/descriptive/mods.xml"), b"<mods/>");
        write_file(&root.join("documentation/readme.txt"), b"notes");

        let config = GeneratorConfig::default();
        let cache = SchemaCache::new(dir.join("cache"));
        assemble::assemble(&root, "Collection", "SA-1", &config, &cache).expect("assemble")
    }

    #[test]
    fn folder_strategy_lays_out_the_full_tree() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let sip = assembled_sip(dir.path());
        let out = dir.path().join("out");

        let package = write_package(&sip, &out, WriteStrategy::Folder).expect("write");
        assert_eq!(package, out.join("batch_007"));
        assert!(package.join(MANIFEST_FILE).is_file());
        assert!(package.join(CHECKSUMS_FILE).is_file());
        assert!(package.join("documentation/readme.txt").is_file());
        assert!(package.join("metadata/descriptive/mods.xml").is_file());
        assert!(package.join("representations/rep1/data/photo.jpg").is_file());
        assert!(package.join("schemas/mods-v3-8.xsd").is_file());
    }

    #[test]
    fn checksum_manifest_covers_every_payload_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let sip = assembled_sip(dir.path());
        let out = dir.path().join("out");

        let package = write_package(&sip, &out, WriteStrategy::Folder).expect("write");
        let content = fs::read(package.join(CHECKSUMS_FILE)).expect("read checksums");
        let manifest: ChecksumManifest = serde_json::from_slice(&content).expect("parse");

        assert_eq!(manifest.algorithm, sip.checksum_algorithm);
        let expected = plan_entries(&sip).len();
        assert_eq!(manifest.files.len(), expected);
        assert!(manifest.files.contains_key("representations/rep1/data/photo.jpg"));
    }

    #[test]
    fn zip_strategy_produces_a_readable_archive() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let sip = assembled_sip(dir.path());
        let out = dir.path().join("out");

        let package = write_package(&sip, &out, WriteStrategy::Zip).expect("write");
        assert_eq!(package, out.join("batch_007.zip"));

        let file = File::open(&package).expect("open archive");
        let mut archive = zip::ZipArchive::new(file).expect("read archive");
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).expect("entry").name().to_string())
            .collect();
        assert!(names.contains(&"batch_007/manifest.json".to_string()));
        assert!(names.contains(&"batch_007/checksums.json".to_string()));
        assert!(names.contains(&"batch_007/representations/rep1/data/photo.jpg".to_string()));
    }

    #[test]
    fn planned_paths_keep_relative_segments() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().join("batch_008");
        write_file(
            &root.join("representations/rep1/data/batch1/photo.jpg"),
            b"jpeg",
        );
        let config = GeneratorConfig::default();
        let cache = SchemaCache::new(dir.path().join("cache"));
        let sip =
            assemble::assemble(&root, "Collection", "SA-1", &config, &cache).expect("assemble");

        let entries = plan_entries(&sip);
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].rel_path,
            "representations/rep1/data/batch1/photo.jpg"
        );
    }
}
