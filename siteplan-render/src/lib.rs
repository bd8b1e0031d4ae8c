pub mod canvas;
pub mod encoder;
pub mod errors;
pub mod pixel;
pub mod rasterizer;
pub mod style;

use siteplan_config::RenderSettings;
use siteplan_core::survey::BoundarySegment;
use siteplan_engine::{Diagnostics, SitePlanner, ZoningRegistry};
use tracing::info;

pub use canvas::{Canvas, DrawCommand, RasterTarget, RecordingCanvas};
pub use errors::RenderError;
pub use pixel::PixelCanvas;
pub use rasterizer::{CanvasFrame, LEGEND, LegendEntry, Rasterizer};
pub use style::{Color, LineStyle, Stroke};

/// 出图结果：PNG 字节、其 Base64 文本，以及渲染过程中的非致命警告。
#[derive(Debug, Clone)]
pub struct RenderedSitePlan {
    pub png: Vec<u8>,
    pub encoded: String,
    pub width: u32,
    pub height: u32,
    pub zoning_name: String,
    pub diagnostics: Diagnostics,
}

impl RenderedSitePlan {
    #[inline]
    pub fn data_uri(&self) -> String {
        encoder::data_uri(&self.encoded)
    }
}

/// 完整流水线：几何 → 栅格 → 编码。分区完全缺失或编码失败时整体中止，不产生部分结果。
pub fn render_site_plan(
    registry: &ZoningRegistry,
    settings: RenderSettings,
    segments: &[BoundarySegment],
    city: &str,
) -> Result<RenderedSitePlan, RenderError> {
    let planned = SitePlanner::new(registry, settings).plan(segments, city)?;
    let canvas = Rasterizer::new().render(&planned.layout);
    let png = encoder::encode_png(&canvas)?;
    let (width, height) = canvas.size();
    info!(width, height, bytes = png.len(), "场地图已编码");

    Ok(RenderedSitePlan {
        encoded: encoder::base64_from_png(&png),
        png,
        width,
        height,
        zoning_name: planned.layout.zoning_name,
        diagnostics: planned.diagnostics,
    })
}
