use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub zoning: ZoningConfig,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `SITEPLAN_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("SITEPLAN_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 出图比例与留白。`scale` 为每英寸代表的英尺数，`ppi` 为每英寸像素数。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "RenderSettings::default_scale")]
    pub scale: f64,
    #[serde(default = "RenderSettings::default_ppi")]
    pub ppi: f64,
    #[serde(default = "RenderSettings::default_margin")]
    pub margin: u32,
}

impl RenderSettings {
    pub const DEFAULT_SCALE: f64 = 30.0;
    pub const DEFAULT_PPI: f64 = 96.0;
    pub const DEFAULT_MARGIN: u32 = 100;

    fn default_scale() -> f64 {
        Self::DEFAULT_SCALE
    }

    fn default_ppi() -> f64 {
        Self::DEFAULT_PPI
    }

    fn default_margin() -> u32 {
        Self::DEFAULT_MARGIN
    }

    /// 每英尺像素数（PPF）。
    #[inline]
    pub fn pixels_per_foot(&self) -> f64 {
        self.ppi / self.scale
    }

    /// 将非正或非有限的比例参数替换为默认值。
    pub fn sanitized(self) -> Self {
        let mut settings = self;
        if !(settings.scale.is_finite() && settings.scale > 0.0) {
            warn!(scale = settings.scale, "scale 非法，使用默认值");
            settings.scale = Self::DEFAULT_SCALE;
        }
        if !(settings.ppi.is_finite() && settings.ppi > 0.0) {
            warn!(ppi = settings.ppi, "ppi 非法，使用默认值");
            settings.ppi = Self::DEFAULT_PPI;
        }
        settings
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
            ppi: Self::DEFAULT_PPI,
            margin: Self::DEFAULT_MARGIN,
        }
    }
}

/// 单一方向的规则宽度（英尺）。
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub setback_landscape: f64,
    #[serde(default)]
    pub easement_landscape: f64,
    #[serde(default)]
    pub easement_utility: f64,
}

impl RuleConfig {
    pub const fn new(setback_landscape: f64, easement_landscape: f64, easement_utility: f64) -> Self {
        Self {
            setback_landscape,
            easement_landscape,
            easement_utility,
        }
    }
}

/// 城市分区条目。`uniform` 对四个方向生效，`rules` 中的方向键（N/S/E/W）覆盖之。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityConfig {
    pub name: String,
    #[serde(default)]
    pub uniform: Option<RuleConfig>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

/// 分区表：默认规则与各城市规则。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoningConfig {
    #[serde(default = "ZoningConfig::builtin_default")]
    pub default: RuleConfig,
    #[serde(default = "ZoningConfig::builtin_cities")]
    pub cities: Vec<CityConfig>,
}

impl ZoningConfig {
    fn builtin_default() -> RuleConfig {
        RuleConfig::new(5.0, 10.0, 8.0)
    }

    fn builtin_cities() -> Vec<CityConfig> {
        let city_x_rule = RuleConfig::new(7.0, 20.0, 12.0);
        vec![
            CityConfig {
                name: "Prosper".to_string(),
                uniform: Some(RuleConfig::new(5.0, 15.0, 10.0)),
                rules: BTreeMap::new(),
            },
            CityConfig {
                name: "CityX".to_string(),
                uniform: None,
                rules: BTreeMap::from([
                    ("N".to_string(), city_x_rule),
                    ("S".to_string(), city_x_rule),
                ]),
            },
        ]
    }
}

impl Default for ZoningConfig {
    fn default() -> Self {
        Self {
            default: Self::builtin_default(),
            cities: Self::builtin_cities(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}
