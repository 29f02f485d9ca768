use super::types::{ArtifactPlacement, IngestError};

use std::io::ErrorKind;
use std::path::Path;

/// Moves the stored upload into its partition's `Packages` directory.
///
/// Falls back to copy + remove when the upload area and the repository are on
/// different filesystems.
pub async fn place_artifact(source: &Path, placement: &ArtifactPlacement) -> Result<(), IngestError> {
    let destination = &placement.destination;
    let placement_error = |err| IngestError::Placement {
        destination: destination.clone(),
        source: err,
    };

    match tokio::fs::metadata(source).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(IngestError::SourceNotFound(source.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(IngestError::SourceNotFound(source.to_path_buf()));
        }
        Err(e) => return Err(placement_error(e)),
    }

    if let Some(dir) = destination.parent() {
        tokio::fs::create_dir_all(dir).await.map_err(placement_error)?;
    }

    if let Err(e) = tokio::fs::rename(source, destination).await {
        tracing::debug!("rename {} failed ({}), copying instead", source.display(), e);
        tokio::fs::copy(source, destination).await.map_err(placement_error)?;
        tokio::fs::remove_file(source).await.map_err(placement_error)?;
    }

    tracing::info!(
        partition = %placement.partition,
        "Placed {} at {}",
        source.display(),
        destination.display()
    );

    Ok(())
}
