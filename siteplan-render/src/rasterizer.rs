use siteplan_core::geometry::{Bounds2D, Point2, Vector2};
use siteplan_engine::SitePlanLayout;
use tracing::debug;

use crate::canvas::Canvas;
use crate::pixel::PixelCanvas;
use crate::style::{Color, LineStyle, Stroke, easement_style};

const BOUNDARY_STROKE: Stroke = Stroke::new(Color::BLACK, 3);
const EASEMENT_WIDTH: u32 = 2;
const MARKER_RADIUS: f64 = 5.0;
const LABEL_OFFSET: Vector2 = Vector2(glam::DVec2::new(10.0, -10.0));

const LEGEND_INSET: f64 = 10.0;
const LEGEND_SPACING: f64 = 30.0;
const LEGEND_SAMPLE_LENGTH: f64 = 50.0;
const LEGEND_CAPTION_GAP: f64 = 60.0;

/// 图例条目：名称、线型、颜色。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub style: LineStyle,
    pub color: Color,
}

pub const LEGEND: [LegendEntry; 4] = [
    LegendEntry {
        label: "Boundary",
        style: LineStyle::Solid,
        color: Color::BLACK,
    },
    LegendEntry {
        label: "Landscape Setback",
        style: LineStyle::Dotted,
        color: Color::GREEN,
    },
    LegendEntry {
        label: "Landscape Easement",
        style: LineStyle::Dashed,
        color: Color::ORANGE,
    },
    LegendEntry {
        label: "Utility Easement",
        style: LineStyle::DashDot,
        color: Color::BLUE,
    },
];

/// 画布尺寸与平面 → 画布的平移量。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFrame {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    offset: Vector2,
}

impl CanvasFrame {
    /// 尺寸为 `ceil(包围盒) + 2·margin`，平移量为 `(-minX + margin, -minY + margin)`。
    pub fn from_bounds(bounds: Bounds2D, margin: u32) -> Self {
        let (origin, width, height) = if bounds.is_empty() {
            (Point2::ORIGIN, 0.0, 0.0)
        } else {
            (bounds.min(), bounds.width(), bounds.height())
        };
        let padding = margin.saturating_mul(2);
        let margin_f = f64::from(margin);
        Self {
            width: (width.ceil() as u32).saturating_add(padding).max(1),
            height: (height.ceil() as u32).saturating_add(padding).max(1),
            margin,
            offset: Vector2::new(margin_f - origin.x(), margin_f - origin.y()),
        }
    }

    #[inline]
    pub fn to_canvas(&self, point: Point2) -> Point2 {
        point.translate(self.offset)
    }
}

/// 将场地几何合成到画布：边界、退界 / 地役权、标注、顶点标记与图例。
#[derive(Debug, Clone, Copy, Default)]
pub struct Rasterizer;

impl Rasterizer {
    pub fn new() -> Self {
        Self
    }

    pub fn frame(&self, layout: &SitePlanLayout) -> CanvasFrame {
        CanvasFrame::from_bounds(layout.bounds, layout.margin)
    }

    /// 在白色像素画布上完成绘制。
    pub fn render(&self, layout: &SitePlanLayout) -> PixelCanvas {
        let frame = self.frame(layout);
        let mut canvas = PixelCanvas::new(frame.width, frame.height);
        self.draw(layout, &frame, &mut canvas);
        canvas
    }

    pub fn draw<C: Canvas>(&self, layout: &SitePlanLayout, frame: &CanvasFrame, canvas: &mut C) {
        let vertices: Vec<Point2> = layout
            .path
            .points()
            .iter()
            .map(|point| frame.to_canvas(*point))
            .collect();

        for pair in vertices.windows(2) {
            canvas.draw_line(pair[0], pair[1], BOUNDARY_STROKE);
        }

        for easement in &layout.easements {
            let (style, color) = easement_style(easement.category);
            let start = frame.to_canvas(easement.start);
            let end = frame.to_canvas(easement.end);
            canvas.draw_styled_line(start, end, style, Stroke::new(color, EASEMENT_WIDTH));
            canvas.draw_text(start.translate(LABEL_OFFSET), &easement.label, Color::BLACK);
        }

        for (index, vertex) in vertices.iter().enumerate() {
            canvas.draw_circle(*vertex, MARKER_RADIUS, Color::RED, Color::BLACK);
            canvas.draw_text(
                vertex.translate(LABEL_OFFSET),
                &format!("P{index}"),
                Color::BLUE,
            );
        }

        draw_legend(canvas, frame.margin);

        let (width, height) = canvas.size();
        debug!(width, height, vertices = vertices.len(), "栅格化完成");
    }
}

fn draw_legend<C: Canvas>(canvas: &mut C, margin: u32) {
    let x = f64::from(margin) + LEGEND_INSET;
    let top = f64::from(margin) + LEGEND_INSET;
    for (row, entry) in LEGEND.iter().enumerate() {
        let y = top + row as f64 * LEGEND_SPACING;
        canvas.draw_styled_line(
            Point2::new(x, y),
            Point2::new(x + LEGEND_SAMPLE_LENGTH, y),
            entry.style,
            Stroke::new(entry.color, EASEMENT_WIDTH),
        );
        canvas.draw_text(
            Point2::new(x + LEGEND_CAPTION_GAP, y - 10.0),
            entry.label,
            Color::BLACK,
        );
    }
}
