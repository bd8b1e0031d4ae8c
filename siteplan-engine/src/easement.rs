use siteplan_core::geometry::Point2;
use siteplan_core::survey::BoundarySegment;
use siteplan_core::zoning::{Cardinal, CityZoning, EasementCategory};
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics, Stage};

/// 退界 / 地役权线段（像素坐标）及其标注。
#[derive(Debug, Clone, PartialEq)]
pub struct EasementSegment {
    pub category: EasementCategory,
    pub start: Point2,
    pub end: Point2,
    pub label: String,
    /// 规则宽度（英尺）。
    pub value: f64,
    /// 来源边界记录在输入中的下标。
    pub segment_index: usize,
}

/// 标注文本，例如 `Landscape Setback 5ft`。
pub fn easement_label(category: EasementCategory, value: f64) -> String {
    format!("{} {}ft", category.label(), value)
}

#[derive(Debug, Clone, Copy)]
pub struct EasementGeometryCalculator {
    pixels_per_foot: f64,
}

impl EasementGeometryCalculator {
    pub fn new(pixels_per_foot: f64) -> Self {
        Self { pixels_per_foot }
    }

    /// 为每条边界按 `direction2` 查找规则，按“退界、景观地役权、公用地役权”顺序
    /// 为每个非零值生成一条偏移线段。
    ///
    /// 所有线段都以路径终点 `anchor` 为基准：起点沿垂直方位角偏移一个宽度，
    /// 终点再从起点偏移同样的距离。
    pub fn compute(
        &self,
        segments: &[BoundarySegment],
        anchor: Point2,
        zoning: &CityZoning,
        diagnostics: &mut Diagnostics,
    ) -> Vec<EasementSegment> {
        let mut easements = Vec::new();

        for (index, segment) in segments.iter().enumerate() {
            let bearing = match segment.bearing() {
                Ok(bearing) => bearing,
                Err(error) => {
                    diagnostics.record(Diagnostic::SkippedSegment {
                        index,
                        stage: Stage::Easement,
                        error,
                    });
                    continue;
                }
            };
            let direction = Cardinal::from(bearing.east_west);
            let Some(rule) = zoning.rule(direction) else {
                diagnostics.record(Diagnostic::MissingRuleForDirection { index, direction });
                continue;
            };

            let perpendicular = (bearing.azimuth() + 90.0).rem_euclid(360.0);
            for (category, value) in rule.requirements() {
                let offset = value * self.pixels_per_foot;
                let start = anchor.offset_along_azimuth(offset, perpendicular);
                let end = start.offset_along_azimuth(offset, perpendicular);
                debug!(index, %category, value, perpendicular, "生成地役权线段");
                easements.push(EasementSegment {
                    category,
                    start,
                    end,
                    label: easement_label(category, value),
                    value,
                    segment_index: index,
                });
            }
        }

        easements
    }
}
