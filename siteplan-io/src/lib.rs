pub mod artifact;
pub mod survey;
pub mod validate;

use std::path::PathBuf;

use thiserror::Error;

pub use artifact::{ArtifactFormat, ArtifactSaver, FileArtifactSaver};
pub use survey::{BoundaryRecord, CityRecord, SurveyDocument, SurveyFacade, SurveyLoader};
pub use validate::{
    BoundaryDefect, RejectedRecord, ValidatedBoundary, ValidationMode, check_record, validate_boundary,
};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse survey document: {0}")]
    Parse(String),
    #[error("invalid boundary point #{index}: {defect}")]
    InvalidBoundary { index: usize, defect: BoundaryDefect },
    #[error("insufficient boundary points: {usable} usable, at least 1 segment required")]
    InsufficientBoundary { usable: usize },
}
