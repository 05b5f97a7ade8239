//! # Completion Photo Artifacts
//!
//! Optional before/after photo metadata attached by the worker. Purely
//! additive — never required for any transition to be valid.

use serde::{Deserialize, Serialize};

use labourlink_core::{Timestamp, WorkerId};

/// Metadata for one uploaded photo. The blob itself lives with the
/// external upload handler; the aggregate keeps only the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// URL or blob reference to the stored photo.
    pub url: String,
    /// The worker who uploaded the photo.
    pub uploaded_by: WorkerId,
    /// Original filename.
    pub filename: String,
    /// Size of the upload in bytes.
    pub byte_size: u64,
    /// When the upload happened.
    pub uploaded_at: Timestamp,
}

/// Before/after photo pair for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompletionPhotos {
    /// Photo taken before the work started.
    pub before: Option<PhotoMetadata>,
    /// Photo taken after the work completed.
    pub after: Option<PhotoMetadata>,
}
