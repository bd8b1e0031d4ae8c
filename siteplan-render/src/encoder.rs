use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::canvas::RasterTarget;
use crate::errors::RenderError;

/// PNG 字节。
pub fn encode_png<C: RasterTarget>(canvas: &C) -> Result<Vec<u8>, RenderError> {
    canvas.encode_png()
}

/// PNG 的 Base64（标准字母表）文本，便于嵌入页面。
pub fn encode_base64<C: RasterTarget>(canvas: &C) -> Result<String, RenderError> {
    Ok(STANDARD.encode(canvas.encode_png()?))
}

#[inline]
pub fn base64_from_png(png: &[u8]) -> String {
    STANDARD.encode(png)
}

pub fn data_uri(encoded: &str) -> String {
    format!("data:image/png;base64,{encoded}")
}
