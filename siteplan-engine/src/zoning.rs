use std::collections::BTreeMap;

use siteplan_config::{CityConfig, RuleConfig, ZoningConfig};
use siteplan_core::zoning::{Cardinal, CityZoning, ZoningRule};
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::EngineError;

pub const DEFAULT_ZONING_NAME: &str = "Default";

/// 城市名 → 分区规则的只读注册表。
///
/// 进程启动时构建一次，之后不再修改，可在多个渲染调用之间无锁共享。
/// 查找按去除首尾空白并转小写后的名称精确匹配；未命中时返回默认分区并附带一条诊断。
#[derive(Debug, Clone)]
pub struct ZoningRegistry {
    cities: BTreeMap<String, CityZoning>,
    default: CityZoning,
}

/// 查找结果：命中的分区以及（回退到默认值时的）警告。
#[derive(Debug, Clone, PartialEq)]
pub struct ZoningLookup<'a> {
    pub zoning: &'a CityZoning,
    pub diagnostic: Option<Diagnostic>,
}

impl ZoningLookup<'_> {
    #[inline]
    pub fn is_default(&self) -> bool {
        self.diagnostic.is_some()
    }
}

impl ZoningRegistry {
    pub fn new(default: CityZoning) -> Self {
        Self {
            cities: BTreeMap::new(),
            default,
        }
    }

    /// 注册城市分区，同名（忽略大小写）条目会被替换。
    pub fn with_city(mut self, zoning: CityZoning) -> Self {
        self.cities.insert(normalize(zoning.name()), zoning);
        self
    }

    /// 由配置中的分区表构建注册表。
    pub fn from_config(config: &ZoningConfig) -> Result<Self, EngineError> {
        let default_rule = convert_rule(DEFAULT_ZONING_NAME, &config.default)?;
        let mut registry = Self::new(CityZoning::uniform(DEFAULT_ZONING_NAME, default_rule));
        for city in &config.cities {
            registry = registry.with_city(convert_city(city)?);
        }
        debug!(cities = registry.cities.len(), "分区注册表已构建");
        Ok(registry)
    }

    pub fn lookup(&self, city: &str) -> ZoningLookup<'_> {
        match self.cities.get(&normalize(city)) {
            Some(zoning) => ZoningLookup {
                zoning,
                diagnostic: None,
            },
            None => ZoningLookup {
                zoning: &self.default,
                diagnostic: Some(Diagnostic::DefaultZoning {
                    city: city.to_string(),
                }),
            },
        }
    }

    /// 查找并将回退警告写入 `diagnostics`。
    pub fn resolve(&self, city: &str, diagnostics: &mut Diagnostics) -> &CityZoning {
        let lookup = self.lookup(city);
        if let Some(diagnostic) = lookup.diagnostic {
            diagnostics.record(diagnostic);
        }
        lookup.zoning
    }

    #[inline]
    pub fn default_zoning(&self) -> &CityZoning {
        &self.default
    }

    /// 按规范化名称排序的已注册城市。
    pub fn cities(&self) -> impl Iterator<Item = &CityZoning> {
        self.cities.values()
    }
}

impl Default for ZoningRegistry {
    fn default() -> Self {
        let registry = Self::from_config(&ZoningConfig::default());
        debug_assert!(registry.is_ok(), "内建分区表非法: {registry:?}");
        registry.unwrap_or_else(|_| Self::new(CityZoning::new(DEFAULT_ZONING_NAME)))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn convert_rule(city: &str, rule: &RuleConfig) -> Result<ZoningRule, EngineError> {
    for (field, value) in [
        ("setback_landscape", rule.setback_landscape),
        ("easement_landscape", rule.easement_landscape),
        ("easement_utility", rule.easement_utility),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(EngineError::InvalidZoning {
                city: city.to_string(),
                reason: format!("{field} must be a non-negative number, got {value}"),
            });
        }
    }
    Ok(ZoningRule::new(
        rule.setback_landscape,
        rule.easement_landscape,
        rule.easement_utility,
    ))
}

fn convert_city(city: &CityConfig) -> Result<CityZoning, EngineError> {
    let mut zoning = match &city.uniform {
        Some(rule) => CityZoning::uniform(city.name.clone(), convert_rule(&city.name, rule)?),
        None => CityZoning::new(city.name.clone()),
    };
    for (key, rule) in &city.rules {
        let direction = Cardinal::parse(key).ok_or_else(|| EngineError::InvalidZoning {
            city: city.name.clone(),
            reason: format!("unknown direction key {key:?}"),
        })?;
        zoning = zoning.with_rule(direction, convert_rule(&city.name, rule)?);
    }
    Ok(zoning)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_city_falls_back_to_default_with_one_warning() {
        let registry = ZoningRegistry::default();
        let mut diagnostics = Diagnostics::new();
        let zoning = registry.resolve("Nowhereville", &mut diagnostics);
        assert_eq!(zoning.name(), DEFAULT_ZONING_NAME);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::DefaultZoning { city }) if city == "Nowhereville"
        ));
    }

    #[test]
    fn lookup_is_case_normalized() {
        let registry = ZoningRegistry::default();
        for name in ["Prosper", "prosper", "  PROSPER "] {
            let lookup = registry.lookup(name);
            assert!(!lookup.is_default(), "{name}");
            assert_eq!(lookup.zoning.name(), "Prosper");
        }
        let rule = registry.lookup("prosper").zoning.rule(Cardinal::E).copied();
        assert_eq!(rule, Some(ZoningRule::new(5.0, 15.0, 10.0)));
    }

    #[test]
    fn builtin_city_x_only_defines_north_and_south() {
        let registry = ZoningRegistry::default();
        let city_x = registry.lookup("cityx").zoning;
        assert!(city_x.rule(Cardinal::N).is_some());
        assert!(city_x.rule(Cardinal::S).is_some());
        assert!(city_x.rule(Cardinal::E).is_none());
        assert!(city_x.rule(Cardinal::W).is_none());
    }

    #[test]
    fn per_direction_rules_override_uniform() {
        let config = ZoningConfig {
            default: RuleConfig::new(1.0, 1.0, 1.0),
            cities: vec![CityConfig {
                name: "Frisco".to_string(),
                uniform: Some(RuleConfig::new(10.0, 0.0, 5.0)),
                rules: BTreeMap::from([("w".to_string(), RuleConfig::new(0.0, 25.0, 0.0))]),
            }],
        };
        let registry = ZoningRegistry::from_config(&config).expect("valid config");
        let frisco = registry.lookup("frisco").zoning;
        assert_eq!(frisco.rule(Cardinal::E), Some(&ZoningRule::new(10.0, 0.0, 5.0)));
        assert_eq!(frisco.rule(Cardinal::W), Some(&ZoningRule::new(0.0, 25.0, 0.0)));
        assert_eq!(
            registry.default_zoning().rule(Cardinal::N),
            Some(&ZoningRule::new(1.0, 1.0, 1.0))
        );
    }

    #[test]
    fn invalid_entries_are_rejected() {
        let bad_key = ZoningConfig {
            default: RuleConfig::default(),
            cities: vec![CityConfig {
                name: "Oops".to_string(),
                uniform: None,
                rules: BTreeMap::from([("NE".to_string(), RuleConfig::default())]),
            }],
        };
        let err = ZoningRegistry::from_config(&bad_key).unwrap_err();
        assert!(matches!(err, EngineError::InvalidZoning { ref city, .. } if city == "Oops"));

        let negative = ZoningConfig {
            default: RuleConfig::new(-1.0, 0.0, 0.0),
            cities: Vec::new(),
        };
        assert!(ZoningRegistry::from_config(&negative).is_err());
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ZoningRegistry>();
    }

    #[test]
    fn builtin_table_converts_without_fallback() {
        let registry =
            ZoningRegistry::from_config(&ZoningConfig::default()).expect("内建分区表应合法");
        let names: Vec<&str> = registry.cities().map(CityZoning::name).collect();
        assert_eq!(names, vec!["CityX", "Prosper"]);
        assert!(!registry.default_zoning().is_empty());
        assert_eq!(
            ZoningRegistry::default().default_zoning(),
            registry.default_zoning()
        );
    }
}
