//! Structural validation of a serialized package and the JSON report
//! adapter.
//!
//! The validator accepts either a package folder or a zip archive
//! (archives are unpacked to a scratch directory first). Each structural
//! rule is checked independently; the overall verdict is the logical AND
//! of all rule results. The pass/fail verdict is reported through the
//! return value and the report file, never through a process error.
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::checksum::{self, ChecksumManifest};
use crate::error::SipError;
use crate::model::Sip;
use crate::write::{self, CHECKSUMS_FILE, MANIFEST_FILE};

/// Folders allowed at the root of a serialized package. The serialized
/// vocabulary adds `schemas` to the input convention.
const SERIALIZED_ROOT_FOLDERS: [&str; 4] =
    ["documentation", "metadata", "representations", "schemas"];
const PACKAGE_METADATA_FOLDERS: [&str; 3] = ["descriptive", "preservation", "other"];
const REPRESENTATION_FOLDERS: [&str; 2] = ["data", "metadata"];
const REPRESENTATION_METADATA_FOLDERS: [&str; 3] = ["source", "technical", "other"];

/// Rule-by-rule validation report, keyed by the validated package path.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationReport {
    pub package: String,
    pub valid: bool,
    pub rules: Vec<RuleResult>,
}

impl ValidationReport {
    fn new(package: String) -> Self {
        ValidationReport {
            package,
            valid: true,
            rules: Vec::new(),
        }
    }

    fn record(&mut self, id: &str, description: &str, outcome: Result<(), String>) {
        let (passed, detail) = match outcome {
            Ok(()) => (true, None),
            Err(detail) => (false, Some(detail)),
        };
        self.valid &= passed;
        self.rules.push(RuleResult {
            id: id.to_string(),
            description: description.to_string(),
            passed,
            detail,
        });
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RuleResult {
    pub id: String,
    pub description: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Validate the package at `sip_path` and write a JSON report to
/// `report_path`. Returns the overall verdict.
///
/// The report sink is opened before any checking starts and closed on
/// every exit path; if the validation machinery itself fails, the report
/// file may exist but be incomplete.
pub fn validate(sip_path: &Path, report_path: &Path) -> Result<bool, SipError> {
    prepare_report_path(report_path)?;
    let file = File::create(report_path).map_err(|source| SipError::io(report_path, source))?;
    let mut sink = BufWriter::new(file);

    let report = run_structural_checks(sip_path)?;

    serde_json::to_writer_pretty(&mut sink, &report).map_err(|source| {
        SipError::ValidationEngine {
            detail: format!("write report: {source}"),
        }
    })?;
    sink.flush()
        .map_err(|source| SipError::io(report_path, source))?;

    tracing::info!(
        package = %sip_path.display(),
        valid = report.valid,
        rules = report.rules.len(),
        "validation complete"
    );
    Ok(report.valid)
}

/// Create the report's parent directory if missing; reject a parent that
/// exists but is not a directory.
fn prepare_report_path(report_path: &Path) -> Result<(), SipError> {
    let Some(parent) = report_path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|source| SipError::io(parent, source))?;
    } else if !parent.is_dir() {
        return Err(SipError::InvalidReportPath(report_path.to_path_buf()));
    }
    Ok(())
}

fn run_structural_checks(sip_path: &Path) -> Result<ValidationReport, SipError> {
    let mut report = ValidationReport::new(sip_path.display().to_string());

    if !sip_path.exists() {
        report.record(
            "package-exists",
            "The package path exists on disk",
            Err(format!("no such file or directory: {}", sip_path.display())),
        );
        return Ok(report);
    }
    report.record("package-exists", "The package path exists on disk", Ok(()));

    // Archives are unpacked to a scratch dir; keep it alive for the scan.
    let unpacked = if sip_path.is_file() {
        Some(unpack_archive(sip_path)?)
    } else {
        None
    };
    let root = match &unpacked {
        Some((_, root)) => root.clone(),
        None => sip_path.to_path_buf(),
    };

    let manifest = check_manifest(&mut report, &root)?;
    check_layout(&mut report, &root)?;
    if let Some(sip) = &manifest {
        check_manifest_files(&mut report, &root, sip);
        check_schemas(&mut report, &root, sip);
    }
    check_checksums(&mut report, &root)?;

    Ok(report)
}

/// Unpack a zip package into a scratch directory, returning the directory
/// guard and the package root inside it.
fn unpack_archive(sip_path: &Path) -> Result<(tempfile::TempDir, PathBuf), SipError> {
    let file = File::open(sip_path).map_err(|source| SipError::io(sip_path, source))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|source| SipError::Archive {
        path: sip_path.to_path_buf(),
        source,
    })?;
    let scratch = tempfile::tempdir().map_err(|source| SipError::ValidationEngine {
        detail: format!("create scratch dir: {source}"),
    })?;
    archive
        .extract(scratch.path())
        .map_err(|source| SipError::Archive {
            path: sip_path.to_path_buf(),
            source,
        })?;

    // A well-formed archive holds a single top-level package folder.
    let mut dirs = Vec::new();
    let mut files = 0usize;
    let entries = fs::read_dir(scratch.path())
        .map_err(|source| SipError::traversal(scratch.path(), source))?;
    for entry in entries {
        let entry = entry.map_err(|source| SipError::traversal(scratch.path(), source))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        } else {
            files += 1;
        }
    }
    let root = if dirs.len() == 1 && files == 0 {
        dirs.remove(0)
    } else {
        scratch.path().to_path_buf()
    };
    Ok((scratch, root))
}

fn check_manifest(report: &mut ValidationReport, root: &Path) -> Result<Option<Sip>, SipError> {
    let manifest_path = root.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        report.record(
            "manifest-present",
            "The package carries a top-level manifest",
            Err(format!("missing {MANIFEST_FILE}")),
        );
        return Ok(None);
    }
    report.record(
        "manifest-present",
        "The package carries a top-level manifest",
        Ok(()),
    );

    let bytes = fs::read(&manifest_path).map_err(|source| SipError::ValidationEngine {
        detail: format!("read {}: {source}", manifest_path.display()),
    })?;
    match serde_json::from_slice::<Sip>(&bytes) {
        Ok(sip) => {
            report.record(
                "manifest-parses",
                "The manifest deserializes into a package description",
                Ok(()),
            );
            Ok(Some(sip))
        }
        Err(source) => {
            report.record(
                "manifest-parses",
                "The manifest deserializes into a package description",
                Err(source.to_string()),
            );
            Ok(None)
        }
    }
}

fn check_layout(report: &mut ValidationReport, root: &Path) -> Result<(), SipError> {
    report_folder_vocabulary(
        report,
        "root-folders-known",
        "Root folders belong to the serialized vocabulary",
        root,
        &SERIALIZED_ROOT_FOLDERS,
    )?;

    let metadata_dir = root.join("metadata");
    if metadata_dir.is_dir() {
        report_folder_vocabulary(
            report,
            "metadata-categories-known",
            "Package metadata categories are descriptive, preservation, or other",
            &metadata_dir,
            &PACKAGE_METADATA_FOLDERS,
        )?;
    }

    let representations_dir = root.join("representations");
    if representations_dir.is_dir() {
        check_representation_layout(report, &representations_dir)?;
    }
    Ok(())
}

fn check_representation_layout(
    report: &mut ValidationReport,
    representations_dir: &Path,
) -> Result<(), SipError> {
    let mut offending = Vec::new();
    for rep_dir in crate::scan::subdirectories(representations_dir)? {
        for sub in crate::scan::subdirectories(&rep_dir)? {
            let name = folder_name(&sub);
            if !REPRESENTATION_FOLDERS.contains(&name.as_str()) {
                offending.push(format!("{}/{name}", folder_name(&rep_dir)));
            }
        }
        let rep_metadata = rep_dir.join("metadata");
        if rep_metadata.is_dir() {
            for sub in crate::scan::subdirectories(&rep_metadata)? {
                let name = folder_name(&sub);
                if !REPRESENTATION_METADATA_FOLDERS.contains(&name.as_str()) {
                    offending.push(format!("{}/metadata/{name}", folder_name(&rep_dir)));
                }
            }
        }
    }

    let outcome = if offending.is_empty() {
        Ok(())
    } else {
        Err(format!("unexpected folders: {}", offending.join(", ")))
    };
    report.record(
        "representation-structure",
        "Each representation holds only data and metadata subfolders",
        outcome,
    );
    Ok(())
}

fn report_folder_vocabulary(
    report: &mut ValidationReport,
    id: &str,
    description: &str,
    dir: &Path,
    allowed: &[&str],
) -> Result<(), SipError> {
    let mut offending = Vec::new();
    for sub in crate::scan::subdirectories(dir)? {
        let name = folder_name(&sub);
        if !allowed.contains(&name.as_str()) {
            offending.push(name);
        }
    }
    let outcome = if offending.is_empty() {
        Ok(())
    } else {
        Err(format!("unexpected folders: {}", offending.join(", ")))
    };
    report.record(id, description, outcome);
    Ok(())
}

fn check_manifest_files(report: &mut ValidationReport, root: &Path, sip: &Sip) {
    let mut missing = Vec::new();
    for entry in write::plan_entries(sip) {
        if !root.join(&entry.rel_path).is_file() {
            missing.push(entry.rel_path);
        }
    }
    let outcome = if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("missing files: {}", missing.join(", ")))
    };
    report.record(
        "manifest-files-present",
        "Every file the manifest declares exists in the package",
        outcome,
    );
}

fn check_schemas(report: &mut ValidationReport, root: &Path, sip: &Sip) {
    let mut missing = Vec::new();
    for schema in &sip.schemas {
        if !root.join("schemas").join(&schema.file_name).is_file() {
            missing.push(schema.file_name.clone());
        }
    }
    let outcome = if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("missing schemas: {}", missing.join(", ")))
    };
    report.record(
        "schemas-present",
        "Every referenced schema is embedded under schemas/",
        outcome,
    );
}

fn check_checksums(report: &mut ValidationReport, root: &Path) -> Result<(), SipError> {
    let checksums_path = root.join(CHECKSUMS_FILE);
    if !checksums_path.is_file() {
        report.record(
            "checksums-present",
            "The package carries a checksum manifest",
            Err(format!("missing {CHECKSUMS_FILE}")),
        );
        return Ok(());
    }
    report.record(
        "checksums-present",
        "The package carries a checksum manifest",
        Ok(()),
    );

    let bytes = fs::read(&checksums_path).map_err(|source| SipError::ValidationEngine {
        detail: format!("read {}: {source}", checksums_path.display()),
    })?;
    let manifest: ChecksumManifest = match serde_json::from_slice(&bytes) {
        Ok(manifest) => manifest,
        Err(source) => {
            report.record(
                "checksums-match",
                "Recomputed digests agree with the checksum manifest",
                Err(format!("unreadable checksum manifest: {source}")),
            );
            return Ok(());
        }
    };

    let mut mismatched = Vec::new();
    for (rel_path, expected) in &manifest.files {
        let file = root.join(rel_path);
        match checksum::digest_file(&file, manifest.algorithm) {
            Ok(actual) if &actual == expected => {}
            Ok(_) => mismatched.push(format!("{rel_path} (digest mismatch)")),
            Err(_) => mismatched.push(format!("{rel_path} (unreadable)")),
        }
    }
    let outcome = if mismatched.is_empty() {
        Ok(())
    } else {
        Err(mismatched.join(", "))
    };
    report.record(
        "checksums-match",
        "Recomputed digests agree with the checksum manifest",
        outcome,
    );
    Ok(())
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
