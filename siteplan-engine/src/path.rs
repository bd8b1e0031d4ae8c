use siteplan_core::geometry::{Bounds2D, Point2, Vector2};
use siteplan_core::survey::{BoundarySegment, SegmentError};
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics, Stage};

/// 从原点出发逐段累加得到的边界折线（像素坐标），附带增量维护的包围盒。
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPath {
    points: Vec<Point2>,
    bounds: Bounds2D,
}

impl BoundaryPath {
    fn starting_at_origin() -> Self {
        Self {
            points: vec![Point2::ORIGIN],
            bounds: Bounds2D::from_point(Point2::ORIGIN),
        }
    }

    fn push(&mut self, point: Point2) {
        self.points.push(point);
        self.bounds.include_point(point);
    }

    #[inline]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[inline]
    pub fn bounds(&self) -> Bounds2D {
        self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 路径总包含原点，因此永不为空。
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 最后累加到的点，即路径终点。
    #[inline]
    pub fn end(&self) -> Point2 {
        self.points.last().copied().unwrap_or(Point2::ORIGIN)
    }
}

/// 被跳过的边界记录及原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedSegment {
    pub index: usize,
    pub error: SegmentError,
}

/// 构建结果：成功部分的路径，以及逐条记录的跳过原因。
#[derive(Debug, Clone, PartialEq)]
pub struct PathReport {
    pub path: BoundaryPath,
    pub skipped: Vec<SkippedSegment>,
}

impl PathReport {
    /// 将跳过记录转为诊断。
    pub fn record_into(&self, diagnostics: &mut Diagnostics) {
        for skipped in &self.skipped {
            diagnostics.record(Diagnostic::SkippedSegment {
                index: skipped.index,
                stage: Stage::Path,
                error: skipped.error,
            });
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoundaryPathBuilder {
    pixels_per_foot: f64,
}

impl BoundaryPathBuilder {
    pub fn new(pixels_per_foot: f64) -> Self {
        Self { pixels_per_foot }
    }

    /// 按顺序遍历边界记录。方向非法的记录被跳过，路径从上一个有效点继续。
    pub fn build(&self, segments: &[BoundarySegment]) -> PathReport {
        let mut path = BoundaryPath::starting_at_origin();
        let mut skipped = Vec::new();

        for (index, segment) in segments.iter().enumerate() {
            let azimuth = match segment.azimuth() {
                Ok(azimuth) => azimuth,
                Err(error) => {
                    skipped.push(SkippedSegment { index, error });
                    continue;
                }
            };
            let delta = Vector2::from_azimuth(azimuth, segment.length * self.pixels_per_foot);
            let next = path.end().translate(delta);
            debug!(index, azimuth, x = next.x(), y = next.y(), "边界点");
            path.push(next);
        }

        PathReport { path, skipped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_ish() -> Vec<BoundarySegment> {
        vec![
            BoundarySegment::new('N', 45, 0, 0, 'E', 100.0),
            BoundarySegment::new('S', 45, 0, 0, 'E', 50.0),
            BoundarySegment::new('S', 45, 0, 0, 'W', 100.0),
            BoundarySegment::new('N', 45, 0, 0, 'W', 50.0),
        ]
    }

    #[test]
    fn closed_traverse_returns_near_origin() {
        let report = BoundaryPathBuilder::new(3.2).build(&square_ish());
        assert!(report.skipped.is_empty());
        let points = report.path.points();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], Point2::ORIGIN);
        assert!(points[4].distance(Point2::ORIGIN) < 1e-9);

        // N45E 100ft 在 3.2 px/ft 下 → (226.27, -226.27)
        let expected = 320.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert!((points[1].x() - expected).abs() < 1e-9);
        assert!((points[1].y() + expected).abs() < 1e-9);
    }

    #[test]
    fn bounds_contain_every_point() {
        let report = BoundaryPathBuilder::new(1.7).build(&square_ish());
        let bounds = report.path.bounds();
        for point in report.path.points() {
            assert!(bounds.contains(*point), "{point:?} outside {bounds:?}");
        }
        let min_x = report
            .path
            .points()
            .iter()
            .map(|p| p.x())
            .fold(f64::INFINITY, f64::min);
        assert_eq!(bounds.min().x(), min_x);
    }

    #[test]
    fn malformed_segment_is_skipped_and_reported() {
        let mut segments = square_ish();
        segments.insert(2, BoundarySegment::new('X', 10, 0, 0, 'E', 40.0));
        let report = BoundaryPathBuilder::new(1.0).build(&segments);

        assert_eq!(report.path.len(), 5);
        assert_eq!(
            report.skipped,
            vec![SkippedSegment {
                index: 2,
                error: SegmentError::InvalidDirection1('X'),
            }]
        );

        let mut diagnostics = Diagnostics::new();
        report.record_into(&mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn empty_input_yields_origin_only() {
        let report = BoundaryPathBuilder::new(1.0).build(&[]);
        assert_eq!(report.path.len(), 1);
        assert_eq!(report.path.end(), Point2::ORIGIN);
        assert!(!report.path.is_empty());
    }
}
