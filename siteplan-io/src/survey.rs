use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::IoError;

/// 测量文档：场地信息、所在城市与按顺序排列的边界记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyDocument {
    pub site_name: String,
    #[serde(default)]
    pub address: String,
    pub city: CityRecord,
    #[serde(default)]
    pub boundary: Vec<BoundaryRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default = "CityRecord::default_country")]
    pub country: String,
}

impl CityRecord {
    fn default_country() -> String {
        "USA".to_string()
    }
}

/// 未经校验的边界记录，字段保持输入原样。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRecord {
    pub direction1: String,
    #[serde(alias = "angle_degrees")]
    pub degrees: i64,
    #[serde(alias = "angle_minutes")]
    pub minutes: i64,
    #[serde(default, alias = "angle_seconds")]
    pub seconds: i64,
    pub direction2: String,
    pub length: f64,
}

impl BoundaryRecord {
    pub fn new(
        direction1: &str,
        degrees: i64,
        minutes: i64,
        seconds: i64,
        direction2: &str,
        length: f64,
    ) -> Self {
        Self {
            direction1: direction1.to_string(),
            degrees,
            minutes,
            seconds,
            direction2: direction2.to_string(),
            length,
        }
    }
}

pub trait SurveyLoader {
    fn load(&self, path: &Path) -> Result<SurveyDocument, IoError>;
}

/// 依扩展名（`.json` / `.toml`）选择解析器。
#[derive(Debug, Clone, Copy, Default)]
pub struct SurveyFacade;

impl SurveyFacade {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_json(&self, data: &str) -> Result<SurveyDocument, IoError> {
        serde_json::from_str(data).map_err(|err| IoError::Parse(err.to_string()))
    }

    pub fn parse_toml(&self, data: &str) -> Result<SurveyDocument, IoError> {
        toml::from_str(data).map_err(|err| IoError::Parse(err.to_string()))
    }
}

impl SurveyLoader for SurveyFacade {
    fn load(&self, path: &Path) -> Result<SurveyDocument, IoError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let data = fs::read_to_string(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let document = match extension.as_str() {
            "json" => self.parse_json(&data)?,
            "toml" => self.parse_toml(&data)?,
            other => {
                return Err(IoError::UnsupportedFormat(format!(
                    "survey extension {other:?} in {path:?}"
                )));
            }
        };
        debug!(
            path = %path.display(),
            site = %document.site_name,
            records = document.boundary.len(),
            "测量文档已读取"
        );
        Ok(document)
    }
}
