use std::fs;
use std::path::Path;

use siteplan_render::RenderedSitePlan;
use tracing::info;

use crate::IoError;
use crate::survey::SurveyDocument;

/// 输出格式，由目标文件扩展名决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Png,
    Base64,
    Html,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "png" => Ok(Self::Png),
            "txt" | "b64" => Ok(Self::Base64),
            "html" | "htm" => Ok(Self::Html),
            other => Err(IoError::UnsupportedFormat(format!(
                "artifact extension {other:?} in {path:?}"
            ))),
        }
    }
}

pub trait ArtifactSaver {
    fn save(
        &self,
        rendered: &RenderedSitePlan,
        document: &SurveyDocument,
        path: &Path,
    ) -> Result<ArtifactFormat, IoError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileArtifactSaver;

impl FileArtifactSaver {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactSaver for FileArtifactSaver {
    fn save(
        &self,
        rendered: &RenderedSitePlan,
        document: &SurveyDocument,
        path: &Path,
    ) -> Result<ArtifactFormat, IoError> {
        let format = ArtifactFormat::from_path(path)?;
        let bytes = match format {
            ArtifactFormat::Png => rendered.png.clone(),
            ArtifactFormat::Base64 => rendered.encoded.clone().into_bytes(),
            ArtifactFormat::Html => html_preview(document, rendered).into_bytes(),
        };
        fs::write(path, &bytes).map_err(|source| IoError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), ?format, bytes = bytes.len(), "已写出场地图");
        Ok(format)
    }
}

/// 预览页：场地名称、地址与内嵌图片。
pub fn html_preview(document: &SurveyDocument, rendered: &RenderedSitePlan) -> String {
    let title = escape_html(&document.site_name);
    let address = escape_html(&document.address);
    let city = escape_html(&document.city.name);
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n<p>{address}</p>\n<p>{city}</p>\n<img alt=\"{title}\" width=\"{width}\" height=\"{height}\" src=\"{src}\">\n</body>\n</html>\n",
        width = rendered.width,
        height = rendered.height,
        src = rendered.data_uri(),
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
