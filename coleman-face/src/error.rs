//! Construction errors for the face plugin.

use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

pub type FaceResult<T> = Result<T, FaceError>;

/// Errors that abort plugin construction. No facade is produced and nothing is
/// written to the host.
#[derive(Debug, Error)]
pub enum FaceError {
    #[error("page template unavailable: {0}")]
    Template(#[from] TemplateError),

    #[error("cannot resolve asset path {}: {source}", path.display())]
    AssetPath {
        path: PathBuf,
        source: std::io::Error,
    },
}
