use siteplan_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("failed to encode raster image: {0}")]
    Encode(#[from] image::ImageError),
}
