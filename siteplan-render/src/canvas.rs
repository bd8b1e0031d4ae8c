use siteplan_core::geometry::Point2;

use crate::errors::RenderError;
use crate::style::{Color, LineStyle, Stroke};

/// 栅格化所需的最小绘图能力。坐标为画布像素坐标。
pub trait Canvas {
    fn size(&self) -> (u32, u32);

    fn draw_line(&mut self, start: Point2, end: Point2, stroke: Stroke);

    /// 以 `position` 为左上角绘制单行文本。
    fn draw_text(&mut self, position: Point2, text: &str, color: Color);

    fn draw_circle(&mut self, center: Point2, radius: f64, fill: Color, outline: Color);

    /// 按线型绘制：只绘制图案中的实段。
    fn draw_styled_line(&mut self, start: Point2, end: Point2, style: LineStyle, stroke: Stroke) {
        for (from, to) in style.dash_segments(start, end) {
            self.draw_line(from, to, stroke);
        }
    }
}

/// 可编码为无损图像的画布。
pub trait RasterTarget: Canvas {
    fn encode_png(&self) -> Result<Vec<u8>, RenderError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        start: Point2,
        end: Point2,
        stroke: Stroke,
    },
    Text {
        position: Point2,
        text: String,
        color: Color,
    },
    Circle {
        center: Point2,
        radius: f64,
        fill: Color,
        outline: Color,
    },
}

/// 仅记录绘图指令的画布，用于检查栅格化逻辑。
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, Point2, Color)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text {
                position,
                text,
                color,
            } => Some((text.as_str(), *position, *color)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Point2, Point2, Stroke)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { start, end, stroke } => Some((*start, *end, *stroke)),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (Point2, f64)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Circle { center, radius, .. } => Some((*center, *radius)),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_line(&mut self, start: Point2, end: Point2, stroke: Stroke) {
        self.commands.push(DrawCommand::Line { start, end, stroke });
    }

    fn draw_text(&mut self, position: Point2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_string(),
            color,
        });
    }

    fn draw_circle(&mut self, center: Point2, radius: f64, fill: Color, outline: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill,
            outline,
        });
    }
}
