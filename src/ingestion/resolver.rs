//! Maps an uploaded package to its repository partition and destination path.

use super::rpm_header::RpmHeaderTags;
use super::types::{ArtifactPlacement, IngestError, RpmPackage};

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<name>.+)-(?P<version>[^-]+)-(?P<release>[^-]+)\.(?P<arch>[A-Za-z0-9_]+)\.rpm$")
            .unwrap()
    })
}

fn release_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)\.([A-Za-z]+)(\d+)$").unwrap())
}

fn field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._+~^-]+$").unwrap())
}

fn invalid(file_name: &str, reason: &str) -> IngestError {
    IngestError::InvalidArtifact {
        file_name: file_name.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses `name-version-release.arch.rpm`.
///
/// The release must carry a distribution tag (`1.el7`), which decides the partition.
pub fn parse_package_file_name(file_name: &str) -> Result<RpmPackage, IngestError> {
    if file_name.contains('/') || file_name.contains('\\') {
        return Err(invalid(file_name, "file name must not contain a path"));
    }

    let caps = file_name_pattern()
        .captures(file_name)
        .ok_or_else(|| invalid(file_name, "expected name-version-release.arch.rpm"))?;

    package_from_parts(
        file_name,
        &caps["name"],
        &caps["version"],
        &caps["release"],
        &caps["arch"],
    )
}

/// Builds the package from the NAME, VERSION, RELEASE and ARCH tags of its header.
///
/// The values end up in a file name, so anything outside the characters RPM
/// itself allows in them is rejected.
pub fn package_from_header(tags: &RpmHeaderTags) -> Result<RpmPackage, IngestError> {
    let label = format!("{}-{}-{}.{}.rpm", tags.name, tags.version, tags.release, tags.arch);
    for value in [&tags.name, &tags.version, &tags.release, &tags.arch] {
        if !field_pattern().is_match(value) {
            return Err(invalid(&label, "header tag has characters not allowed in a file name"));
        }
    }
    if tags.version.contains('-') || tags.release.contains('-') {
        return Err(invalid(&label, "version and release must not contain '-'"));
    }

    package_from_parts(&label, &tags.name, &tags.version, &tags.release, &tags.arch)
}

fn package_from_parts(
    label: &str,
    name: &str,
    version: &str,
    release: &str,
    arch: &str,
) -> Result<RpmPackage, IngestError> {
    let dist = release_pattern()
        .captures(release)
        .ok_or_else(|| invalid(label, "release has no distribution tag like 1.el7"))?;

    Ok(RpmPackage {
        name: name.to_string(),
        version: version.to_string(),
        release: release.to_string(),
        arch: arch.to_string(),
        os_abbr: dist[2].to_string(),
        os_release: dist[3].to_string(),
    })
}

/// `<top_dir>/<os_release>/<arch>/Packages/<canonical file name>`.
pub fn resolve_package(package: &RpmPackage, top_dir: &Path) -> ArtifactPlacement {
    let partition = package.partition();
    let destination = partition
        .path_under(top_dir)
        .join("Packages")
        .join(package.file_name());

    tracing::debug!(
        package = %package.name,
        os = %package.os_abbr,
        partition = %partition,
        "Resolved package placement"
    );

    ArtifactPlacement {
        partition,
        destination,
    }
}
