//! Bundled reference schemas and the on-disk schema cache.
//!
//! A package only embeds the schemas its metadata actually needs. Each
//! schema kind is matched against every metadata entry in the package;
//! needed kinds are materialized into the cache once and attached as a
//! single [`SchemaRef`].
use std::fs;
use std::path::PathBuf;

use crate::error::SipError;
use crate::model::{MetadataKind, MetadataType, SchemaRef, Sip};

/// Schema kinds a package can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Mods,
    Premis,
    MediaInfo,
    Mavis,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 4] = [
        SchemaKind::Mods,
        SchemaKind::Premis,
        SchemaKind::MediaInfo,
        SchemaKind::Mavis,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            SchemaKind::Mods => "mods-v3-8.xsd",
            SchemaKind::Premis => "premis-v3-0.xsd",
            SchemaKind::MediaInfo => "mediainfo_2_0.xsd",
            SchemaKind::Mavis => "mavis-05-03-04-06.xsd",
        }
    }

    fn bytes(&self) -> &'static [u8] {
        match self {
            SchemaKind::Mods => include_bytes!("../resources/schemas/mods-v3-8.xsd"),
            SchemaKind::Premis => include_bytes!("../resources/schemas/premis-v3-0.xsd"),
            SchemaKind::MediaInfo => include_bytes!("../resources/schemas/mediainfo_2_0.xsd"),
            SchemaKind::Mavis => include_bytes!("../resources/schemas/mavis-05-03-04-06.xsd"),
        }
    }

    /// Whether a metadata type tag pulls this schema into the package.
    fn matches(&self, metadata_type: &MetadataType) -> bool {
        match self {
            SchemaKind::Mods => metadata_type.kind == MetadataKind::Mods,
            SchemaKind::Premis => metadata_type.kind == MetadataKind::Premis,
            SchemaKind::MediaInfo => metadata_type.other_type.as_deref() == Some("MEDIAINFO"),
            SchemaKind::Mavis => metadata_type.other_type.as_deref() == Some("MAVIS"),
        }
    }
}

/// Cache directory for materialized schema files.
///
/// The directory is caller-scoped: callers that need isolation inject their
/// own location instead of sharing [`SchemaCache::default_location`].
#[derive(Debug, Clone)]
pub struct SchemaCache {
    dir: PathBuf,
}

impl SchemaCache {
    pub fn new(dir: PathBuf) -> Self {
        SchemaCache { dir }
    }

    /// Shared location under the system temp dir.
    pub fn default_location() -> Self {
        SchemaCache::new(std::env::temp_dir().join("sipgen-schemas"))
    }

    /// Materialize `kind` if absent and return the cached path.
    ///
    /// Writes go through a temp file and a rename, so concurrent callers
    /// racing on first write land on a complete file either way.
    pub fn materialize(&self, kind: SchemaKind) -> Result<PathBuf, SipError> {
        let target = self.dir.join(kind.file_name());
        if target.is_file() {
            return Ok(target);
        }

        fs::create_dir_all(&self.dir).map_err(|source| provisioning(kind, source))?;
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", kind.file_name(), std::process::id()));
        fs::write(&tmp, kind.bytes()).map_err(|source| provisioning(kind, source))?;
        if let Err(source) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            // A concurrent writer may have won the rename.
            if !target.is_file() {
                return Err(provisioning(kind, source));
            }
        }
        tracing::debug!(schema = kind.file_name(), cache = %self.dir.display(), "schema materialized");
        Ok(target)
    }
}

fn provisioning(kind: SchemaKind, source: std::io::Error) -> SipError {
    SipError::SchemaProvisioning {
        schema: kind.file_name().to_string(),
        source,
    }
}

/// Attach one schema reference per kind needed by the package's metadata.
/// Provisioning failures are fatal to the assembly.
pub fn provision(sip: &mut Sip, cache: &SchemaCache) -> Result<(), SipError> {
    for kind in SchemaKind::ALL {
        let needed = sip
            .metadata_entries()
            .any(|entry| kind.matches(&entry.metadata_type));
        if !needed {
            continue;
        }
        let path = cache.materialize(kind)?;
        sip.add_schema(SchemaRef {
            path,
            file_name: kind.file_name().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentInformationType, MetadataEntry, PackageFile, Representation};
    use std::path::Path;

    fn empty_sip() -> Sip {
        Sip::new(
            "pkg".to_string(),
            "2.2.0".to_string(),
            "photographs_digital".to_string(),
            ContentInformationType {
                value: "OTHER".to_string(),
                other_type: None,
            },
        )
    }

    fn entry(file_name: &str, metadata_type: MetadataType) -> MetadataEntry {
        MetadataEntry {
            file: PackageFile::new(Path::new("/in").join(file_name), Vec::new()),
            metadata_type,
        }
    }

    #[test]
    fn materialize_is_idempotent() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cache_dir = dir.path().join("cache");
        let cache = SchemaCache::new(cache_dir.clone());

        let first = cache.materialize(SchemaKind::Mods).expect("first");
        let second = cache.materialize(SchemaKind::Mods).expect("second");
        assert_eq!(first, second);

        let listed: Vec<_> = fs::read_dir(&cache_dir)
            .expect("read cache dir")
            .collect::<Result<Vec<_>, _>>()
            .expect("cache entries");
        assert_eq!(listed.len(), 1);
        let content = fs::read(&first).expect("read cached schema");
        assert_eq!(content, SchemaKind::Mods.bytes());
    }

    #[test]
    fn provision_attaches_only_needed_kinds() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cache = SchemaCache::new(dir.path().to_path_buf());

        let mut sip = empty_sip();
        sip.descriptive_metadata
            .push(entry("mods.xml", MetadataType::mods()));
        let mut rep = Representation::new(
            "rep1".to_string(),
            sip.content_type.clone(),
            sip.content_information_type.clone(),
        );
        rep.technical_metadata.push(entry(
            "mediainfo_001.xml",
            MetadataType::other_with("MEDIAINFO"),
        ));
        sip.representations.push(rep);

        provision(&mut sip, &cache).expect("provision");

        let names: Vec<_> = sip.schemas.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["mods-v3-8.xsd", "mediainfo_2_0.xsd"]);
        for schema in &sip.schemas {
            assert!(schema.path.is_file());
        }
    }

    #[test]
    fn provision_without_known_formats_attaches_nothing() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cache = SchemaCache::new(dir.path().to_path_buf());

        let mut sip = empty_sip();
        sip.other_metadata
            .push(entry("notes.txt", MetadataType::unspecified()));
        provision(&mut sip, &cache).expect("provision");
        assert!(sip.schemas.is_empty());
    }

    #[test]
    fn provision_twice_keeps_one_reference_per_kind() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let cache = SchemaCache::new(dir.path().to_path_buf());

        let mut sip = empty_sip();
        sip.preservation_metadata
            .push(entry("premis.xml", MetadataType::premis()));
        provision(&mut sip, &cache).expect("first provision");
        provision(&mut sip, &cache).expect("second provision");
        assert_eq!(sip.schemas.len(), 1);
    }
}
