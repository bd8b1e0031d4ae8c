use siteplan_core::geometry::Point2;
use siteplan_core::zoning::EasementCategory;

/// RGB 颜色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const RED: Color = Color([255, 0, 0]);
    pub const GREEN: Color = Color([0, 128, 0]);
    pub const ORANGE: Color = Color([255, 165, 0]);
    pub const BLUE: Color = Color([0, 0, 255]);
}

/// 线型。虚线类线型由交替的“实/空”长度（像素）描述，偶数下标为实段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    Solid,
    Dotted,
    Dashed,
    DashDot,
}

impl LineStyle {
    #[inline]
    pub fn pattern(self) -> &'static [f64] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dotted => &[5.0, 5.0],
            LineStyle::Dashed => &[10.0, 5.0],
            LineStyle::DashDot => &[15.0, 5.0, 5.0, 5.0],
        }
    }

    #[inline]
    pub fn period(self) -> f64 {
        self.pattern().iter().sum()
    }

    /// 一个周期内实段所占比例。
    pub fn on_fraction(self) -> f64 {
        let pattern = self.pattern();
        if pattern.is_empty() {
            return 1.0;
        }
        let on: f64 = pattern.iter().step_by(2).sum();
        on / self.period()
    }

    /// 将 `start → end` 按图案切分，只返回实段。方向与总长保持不变，
    /// 末尾不足一个图案单元的部分被截断而非拉伸。
    pub fn dash_segments(self, start: Point2, end: Point2) -> Vec<(Point2, Point2)> {
        let pattern = self.pattern();
        if pattern.is_empty() {
            return vec![(start, end)];
        }

        let delta = start.vector_to(end);
        let total = delta.length();
        let Some(direction) = delta.normalize() else {
            return Vec::new();
        };

        let mut pieces = Vec::new();
        let mut position = 0.0;
        let mut index = 0;
        while position < total {
            let length = pattern[index % pattern.len()];
            if index % 2 == 0 {
                let stop = (position + length).min(total);
                pieces.push((
                    start.translate(direction.scale(position)),
                    start.translate(direction.scale(stop)),
                ));
            }
            position += length;
            index += 1;
        }
        pieces
    }
}

/// 实线绘制参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub color: Color,
    pub width: u32,
}

impl Stroke {
    #[inline]
    pub const fn new(color: Color, width: u32) -> Self {
        Self { color, width }
    }
}

/// 类别 → (线型, 颜色)。
#[inline]
pub fn easement_style(category: EasementCategory) -> (LineStyle, Color) {
    match category {
        EasementCategory::Setback => (LineStyle::Dotted, Color::GREEN),
        EasementCategory::LandscapeEasement => (LineStyle::Dashed, Color::ORANGE),
        EasementCategory::UtilityEasement => (LineStyle::DashDot, Color::BLUE),
    }
}
