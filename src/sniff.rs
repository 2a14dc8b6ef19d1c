//! Filename-based metadata subtype detection.
//!
//! Filename sniffing stands in for content inspection: only a closed set
//! of well-known preservation formats gets a dedicated type tag, and only
//! those tags later pull a reference schema into the package.
use crate::model::MetadataType;

/// Metadata category a file was classified under, which decides the
/// applicable sniffing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataCategory {
    Descriptive,
    Preservation,
    PackageOther,
    Source,
    Technical,
    RepresentationOther,
}

/// Map a file name to a metadata subtype. Matching is case-insensitive.
pub fn detect(file_name: &str, category: MetadataCategory) -> MetadataType {
    let lower = file_name.to_ascii_lowercase();
    match category {
        MetadataCategory::Descriptive => {
            if lower == "mods.xml" {
                MetadataType::mods()
            } else if lower.contains("mavis") {
                MetadataType::other_with("MAVIS")
            } else {
                MetadataType::other()
            }
        }
        MetadataCategory::Preservation => {
            if lower == "premis.xml" {
                MetadataType::premis()
            } else {
                MetadataType::unspecified()
            }
        }
        MetadataCategory::Technical => {
            if lower.contains("mediainfo") {
                MetadataType::other_with("MEDIAINFO")
            } else {
                MetadataType::unspecified()
            }
        }
        MetadataCategory::Source
        | MetadataCategory::PackageOther
        | MetadataCategory::RepresentationOther => MetadataType::unspecified(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetadataKind;

    #[test]
    fn detects_mods_case_insensitively() {
        let detected = detect("MODS.XML", MetadataCategory::Descriptive);
        assert_eq!(detected, MetadataType::mods());
    }

    #[test]
    fn detects_mavis_export_by_substring() {
        let detected = detect("my_mavis_export.xml", MetadataCategory::Descriptive);
        assert_eq!(detected.kind, MetadataKind::Other);
        assert_eq!(detected.other_type.as_deref(), Some("MAVIS"));
    }

    #[test]
    fn unknown_descriptive_file_is_other_without_subtype() {
        let detected = detect("notes.txt", MetadataCategory::Descriptive);
        assert_eq!(detected.kind, MetadataKind::Other);
        assert!(detected.other_type.is_none());
    }

    #[test]
    fn detects_premis_case_insensitively() {
        let detected = detect("PREMIS.xml", MetadataCategory::Preservation);
        assert_eq!(detected, MetadataType::premis());
    }

    #[test]
    fn non_premis_preservation_file_is_unspecified() {
        let detected = detect("events.log", MetadataCategory::Preservation);
        assert_eq!(detected, MetadataType::unspecified());
    }

    #[test]
    fn detects_mediainfo_in_technical_metadata() {
        let detected = detect("MediaInfo_007.xml", MetadataCategory::Technical);
        assert_eq!(detected.kind, MetadataKind::Other);
        assert_eq!(detected.other_type.as_deref(), Some("MEDIAINFO"));
    }

    #[test]
    fn source_and_other_categories_never_sniff() {
        for category in [
            MetadataCategory::Source,
            MetadataCategory::PackageOther,
            MetadataCategory::RepresentationOther,
        ] {
            let detected = detect("mavis_mediainfo_premis_mods.xml", category);
            assert_eq!(detected, MetadataType::unspecified());
        }
    }
}
