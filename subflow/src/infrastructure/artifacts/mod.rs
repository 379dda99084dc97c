//! Artifact Store (C1) adapters: local filesystem and S3-compatible.

mod local;
mod s3;

pub use local::LocalArtifactStore;
pub use s3::S3ArtifactStore;

/// Replaces path separators in a `stage`/`name` segment so a caller can
/// never escape the project prefix via a crafted artifact name.
pub(crate) fn sanitize_segment(segment: &str) -> String {
    segment.replace(['/', '\\'], "_")
}

pub(crate) fn artifact_key(project_id: &str, stage: &str, name: &str) -> String {
    format!("projects/{project_id}/{}/{}", sanitize_segment(stage), sanitize_segment(name))
}
