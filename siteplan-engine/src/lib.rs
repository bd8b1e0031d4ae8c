pub mod diagnostics;
pub mod easement;
pub mod path;
pub mod planner;
pub mod zoning;

pub mod errors {
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Error)]
    pub enum EngineError {
        #[error("no zoning rules resolvable for city {city:?}")]
        ZoningNotFound { city: String },
        #[error("invalid zoning entry for {city:?}: {reason}")]
        InvalidZoning { city: String, reason: String },
    }
}

pub use diagnostics::{Diagnostic, Diagnostics, Stage};
pub use easement::{EasementGeometryCalculator, EasementSegment};
pub use errors::EngineError;
pub use path::{BoundaryPath, BoundaryPathBuilder, PathReport, SkippedSegment};
pub use planner::{PlannedSite, SitePlanLayout, SitePlanner};
pub use zoning::{ZoningLookup, ZoningRegistry};
