use siteplan_config::RenderSettings;
use siteplan_core::geometry::Bounds2D;
use siteplan_core::survey::BoundarySegment;
use tracing::{debug, info};

use crate::diagnostics::Diagnostics;
use crate::easement::{EasementGeometryCalculator, EasementSegment};
use crate::errors::EngineError;
use crate::path::{BoundaryPath, BoundaryPathBuilder};
use crate::zoning::ZoningRegistry;

/// 栅格化所需的全部几何：边界折线、偏移线段与整体包围盒。
#[derive(Debug, Clone, PartialEq)]
pub struct SitePlanLayout {
    /// 实际使用的分区名称（未命中时为默认分区）。
    pub zoning_name: String,
    pub path: BoundaryPath,
    pub easements: Vec<EasementSegment>,
    pub bounds: Bounds2D,
    pub margin: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSite {
    pub layout: SitePlanLayout,
    pub diagnostics: Diagnostics,
}

/// 单次出图的几何编排：分区查找 → 边界路径 → 退界 / 地役权。
///
/// 每次调用只持有自身的临时状态，注册表以共享引用只读访问。
#[derive(Debug, Clone, Copy)]
pub struct SitePlanner<'a> {
    registry: &'a ZoningRegistry,
    settings: RenderSettings,
}

impl<'a> SitePlanner<'a> {
    pub fn new(registry: &'a ZoningRegistry, settings: RenderSettings) -> Self {
        Self {
            registry,
            settings: settings.sanitized(),
        }
    }

    #[inline]
    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    pub fn plan(&self, segments: &[BoundarySegment], city: &str) -> Result<PlannedSite, EngineError> {
        let mut diagnostics = Diagnostics::new();
        let zoning = self.registry.resolve(city, &mut diagnostics);
        if zoning.is_empty() {
            return Err(EngineError::ZoningNotFound {
                city: city.to_string(),
            });
        }

        let ppf = self.settings.pixels_per_foot();
        let report = BoundaryPathBuilder::new(ppf).build(segments);
        report.record_into(&mut diagnostics);
        let path = report.path;

        let easements =
            EasementGeometryCalculator::new(ppf).compute(segments, path.end(), zoning, &mut diagnostics);

        let mut bounds = path.bounds();
        for easement in &easements {
            bounds.include_point(easement.start);
            bounds.include_point(easement.end);
        }
        debug!(
            min_x = bounds.min().x(),
            min_y = bounds.min().y(),
            max_x = bounds.max().x(),
            max_y = bounds.max().y(),
            "出图范围"
        );
        info!(
            city,
            zoning = zoning.name(),
            points = path.len(),
            easements = easements.len(),
            warnings = diagnostics.len(),
            "场地几何已生成"
        );

        Ok(PlannedSite {
            layout: SitePlanLayout {
                zoning_name: zoning.name().to_string(),
                path,
                easements,
                bounds,
                margin: self.settings.margin,
            },
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use siteplan_core::survey::SegmentError;
    use siteplan_core::zoning::{CityZoning, EasementCategory};

    use super::*;
    use crate::diagnostics::{Diagnostic, Stage};

    fn sample_segments() -> Vec<BoundarySegment> {
        vec![
            BoundarySegment::new('N', 45, 0, 0, 'E', 100.0),
            BoundarySegment::new('S', 45, 0, 0, 'E', 50.0),
            BoundarySegment::new('S', 45, 0, 0, 'W', 100.0),
            BoundarySegment::new('N', 45, 0, 0, 'W', 50.0),
        ]
    }

    #[test]
    fn known_city_produces_full_layout() {
        let registry = ZoningRegistry::default();
        let planner = SitePlanner::new(&registry, RenderSettings::default());
        let planned = planner.plan(&sample_segments(), "Prosper").expect("plan");

        assert!(planned.diagnostics.is_empty());
        let layout = &planned.layout;
        assert_eq!(layout.zoning_name, "Prosper");
        assert_eq!(layout.path.len(), 5);
        assert!(layout.path.end().distance(layout.path.points()[0]) < 1e-6);
        assert_eq!(layout.easements.len(), 12);

        for chunk in layout.easements.chunks(3) {
            let labels: Vec<&str> = chunk.iter().map(|e| e.label.as_str()).collect();
            assert_eq!(
                labels,
                vec![
                    "Landscape Setback 5ft",
                    "Landscape Easement 15ft",
                    "Utility Easement 10ft"
                ]
            );
            assert_eq!(chunk[0].category, EasementCategory::Setback);
        }

        for easement in &layout.easements {
            assert!(layout.bounds.contains(easement.start));
            assert!(layout.bounds.contains(easement.end));
        }
        for point in layout.path.points() {
            assert!(layout.bounds.contains(*point));
        }
    }

    #[test]
    fn malformed_segment_degrades_without_aborting() {
        let mut segments = sample_segments();
        segments.insert(1, BoundarySegment::new('X', 45, 0, 0, 'E', 10.0));
        let registry = ZoningRegistry::default();
        let planned = SitePlanner::new(&registry, RenderSettings::default())
            .plan(&segments, "Prosper")
            .expect("plan");

        assert_eq!(planned.layout.path.len(), 5);
        assert_eq!(planned.layout.easements.len(), 12);
        let stages: Vec<Stage> = planned
            .diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::SkippedSegment { index: 1, stage, error } => {
                    assert_eq!(*error, SegmentError::InvalidDirection1('X'));
                    Some(*stage)
                }
                _ => None,
            })
            .collect();
        assert_eq!(stages, vec![Stage::Path, Stage::Easement]);
    }

    #[test]
    fn city_x_reports_missing_east_west_rules() {
        let registry = ZoningRegistry::default();
        let planned = SitePlanner::new(&registry, RenderSettings::default())
            .plan(&sample_segments(), "CityX")
            .expect("plan");
        assert!(planned.layout.easements.is_empty());
        assert_eq!(planned.diagnostics.len(), 4);
        assert_eq!(planned.layout.bounds, planned.layout.path.bounds());
    }

    #[test]
    fn empty_rule_set_aborts_render() {
        let registry = ZoningRegistry::new(CityZoning::new("Default"));
        let err = SitePlanner::new(&registry, RenderSettings::default())
            .plan(&sample_segments(), "Anywhere")
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::ZoningNotFound {
                city: "Anywhere".to_string()
            }
        );
    }

    #[test]
    fn settings_are_sanitized() {
        let registry = ZoningRegistry::default();
        let planner = SitePlanner::new(
            &registry,
            RenderSettings {
                scale: -1.0,
                ppi: 96.0,
                margin: 5,
            },
        );
        assert_eq!(planner.settings().scale, RenderSettings::DEFAULT_SCALE);
        assert_eq!(planner.settings().margin, 5);
    }
}
