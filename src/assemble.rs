//! Package assembly over the fixed three-level folder convention.
//!
//! Assembly is a single deterministic pass: the package is built entirely
//! in memory and nothing touches the output location until the assembled
//! package is handed to a write strategy, so a failed assembly leaves no
//! partial output behind.
use std::path::Path;

use crate::classify::{
    PackageMetadataFolder, RepresentationFolder, RepresentationMetadataFolder, RootFolder,
};
use crate::config::GeneratorConfig;
use crate::error::SipError;
use crate::model::{
    Agent, AgentRole, AltRecordId, MetadataEntry, PackageFile, Representation, Sip,
};
use crate::scan;
use crate::schemas::{self, SchemaCache};
use crate::sniff::{self, MetadataCategory};

pub const SOFTWARE_NAME: &str = "sipgen";
pub const SOFTWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SUBMISSION_AGREEMENT_TYPE: &str = "SUBMISSIONAGREEMENT";

/// Assemble an in-memory package from a conventional directory tree.
///
/// `root`'s base name becomes the package identifier. Exactly the folders
/// `documentation`, `metadata`, and `representations` are permitted under
/// the root, each optional; any other name aborts the whole assembly.
pub fn assemble(
    root: &Path,
    description: &str,
    submission_agreement: &str,
    config: &GeneratorConfig,
    cache: &SchemaCache,
) -> Result<Sip, SipError> {
    let mut sip = Sip::new(
        package_id(root)?,
        config.format_version.clone(),
        config.content_type.clone(),
        config.content_information_type.clone(),
    );
    sip.add_agent(Agent::software(SOFTWARE_NAME, SOFTWARE_VERSION));
    sip.add_agent(config.creator.to_agent(AgentRole::Creator));
    sip.add_agent(config.submitter.to_agent(AgentRole::Submitter));
    sip.description = Some(description.to_string());
    sip.alt_record_ids.push(AltRecordId {
        record_type: SUBMISSION_AGREEMENT_TYPE.to_string(),
        value: submission_agreement.to_string(),
    });

    for dir in scan::subdirectories(root)? {
        match RootFolder::from_name(&dir_name(&dir))? {
            RootFolder::Documentation => add_documentation(&mut sip, &dir)?,
            RootFolder::Metadata => add_package_metadata(&mut sip, &dir)?,
            RootFolder::Representations => add_representations(&mut sip, &dir)?,
        }
    }

    schemas::provision(&mut sip, cache)?;
    sip.checksum_algorithm = config.checksum_algorithm;

    tracing::info!(
        package = %sip.id,
        representations = sip.representations.len(),
        schemas = sip.schemas.len(),
        "package assembled"
    );
    Ok(sip)
}

fn package_id(root: &Path) -> Result<String, SipError> {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| SipError::NotADirectory(root.to_path_buf()))
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn add_documentation(sip: &mut Sip, dir: &Path) -> Result<(), SipError> {
    for file in scan::regular_files(dir)? {
        let segments = scan::relative_segments(&file, dir);
        sip.add_documentation(PackageFile::new(file, segments));
    }
    Ok(())
}

fn add_package_metadata(sip: &mut Sip, dir: &Path) -> Result<(), SipError> {
    for sub in scan::subdirectories(dir)? {
        let folder = PackageMetadataFolder::from_name(&dir_name(&sub))?;
        for file in scan::regular_files(&sub)? {
            let entry = metadata_entry(&file, &sub, package_category(folder));
            match folder {
                PackageMetadataFolder::Descriptive => sip.descriptive_metadata.push(entry),
                PackageMetadataFolder::Preservation => sip.preservation_metadata.push(entry),
                PackageMetadataFolder::Other => sip.other_metadata.push(entry),
            }
        }
    }
    Ok(())
}

fn add_representations(sip: &mut Sip, representations_dir: &Path) -> Result<(), SipError> {
    for rep_dir in scan::subdirectories(representations_dir)? {
        // content types are inherited from the package, never overridden
        let mut representation = Representation::new(
            dir_name(&rep_dir),
            sip.content_type.clone(),
            sip.content_information_type.clone(),
        );

        for sub in scan::subdirectories(&rep_dir)? {
            match RepresentationFolder::from_name(&dir_name(&sub))? {
                RepresentationFolder::Data => {
                    for file in scan::regular_files(&sub)? {
                        let segments = scan::relative_segments(&file, &sub);
                        representation.data.push(PackageFile::new(file, segments));
                    }
                }
                RepresentationFolder::Metadata => {
                    add_representation_metadata(&mut representation, &sub)?;
                }
            }
        }

        sip.representations.push(representation);
    }
    Ok(())
}

fn add_representation_metadata(
    representation: &mut Representation,
    dir: &Path,
) -> Result<(), SipError> {
    for sub in scan::subdirectories(dir)? {
        let folder = RepresentationMetadataFolder::from_name(&dir_name(&sub))?;
        for file in scan::regular_files(&sub)? {
            let entry = metadata_entry(&file, &sub, representation_category(folder));
            match folder {
                RepresentationMetadataFolder::Source => {
                    representation.source_metadata.push(entry);
                }
                RepresentationMetadataFolder::Technical => {
                    representation.technical_metadata.push(entry);
                }
                RepresentationMetadataFolder::Other => {
                    representation.other_metadata.push(entry);
                }
            }
        }
    }
    Ok(())
}

fn metadata_entry(file: &Path, category_dir: &Path, category: MetadataCategory) -> MetadataEntry {
    let package_file = PackageFile::new(
        file.to_path_buf(),
        scan::relative_segments(file, category_dir),
    );
    let metadata_type = sniff::detect(&package_file.file_name, category);
    MetadataEntry {
        file: package_file,
        metadata_type,
    }
}

fn package_category(folder: PackageMetadataFolder) -> MetadataCategory {
    match folder {
        PackageMetadataFolder::Descriptive => MetadataCategory::Descriptive,
        PackageMetadataFolder::Preservation => MetadataCategory::Preservation,
        PackageMetadataFolder::Other => MetadataCategory::PackageOther,
    }
}

fn representation_category(folder: RepresentationMetadataFolder) -> MetadataCategory {
    match folder {
        RepresentationMetadataFolder::Source => MetadataCategory::Source,
        RepresentationMetadataFolder::Technical => MetadataCategory::Technical,
        RepresentationMetadataFolder::Other => MetadataCategory::RepresentationOther,
    }
}
