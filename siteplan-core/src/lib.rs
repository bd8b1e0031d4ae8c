pub mod geometry {
    use glam::DVec2;
    use serde::{Deserialize, Serialize};

    /// 二维点，内部以 `glam::DVec2` 表示。坐标系为局部平面，y 轴向下增长（与栅格一致）。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        pub const ORIGIN: Point2 = Point2(DVec2::ZERO);

        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn translate(self, offset: Vector2) -> Self {
            Self(self.0 + offset.0)
        }

        #[inline]
        pub fn vector_to(self, other: Point2) -> Vector2 {
            Vector2(other.0 - self.0)
        }

        #[inline]
        pub fn distance(self, other: Point2) -> f64 {
            self.0.distance(other.0)
        }

        /// 沿方位角方向偏移 `distance`。方位角自北顺时针，y 轴取反以适配栅格坐标。
        #[inline]
        pub fn offset_along_azimuth(self, distance: f64, azimuth_degrees: f64) -> Self {
            self.translate(Vector2::from_azimuth(azimuth_degrees, distance))
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 二维向量。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        /// 由方位角（度）与长度构造向量：`(len·sin θ, −len·cos θ)`。
        #[inline]
        pub fn from_azimuth(azimuth_degrees: f64, length: f64) -> Self {
            let rad = azimuth_degrees.to_radians();
            Self(DVec2::new(length * rad.sin(), -length * rad.cos()))
        }

        #[inline]
        pub fn length(self) -> f64 {
            self.0.length()
        }

        #[inline]
        pub fn normalize(self) -> Option<Self> {
            let len = self.0.length();
            if len <= f64::EPSILON {
                None
            } else {
                Some(Self(self.0 / len))
            }
        }

        #[inline]
        pub fn scale(self, factor: f64) -> Self {
            Self(self.0 * factor)
        }

        /// 逆时针旋转 90°（栅格坐标下为屏幕上的左法线）。
        #[inline]
        pub fn perp(self) -> Self {
            Self(self.0.perp())
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }
    }

    impl From<DVec2> for Vector2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 轴对齐边界框，用于确定画布尺寸。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        #[inline]
        pub fn new(min: Point2, max: Point2) -> Self {
            Self { min, max }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        /// 仅包含单点的边界框。
        #[inline]
        pub fn from_point(point: Point2) -> Self {
            Self {
                min: point,
                max: point,
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        #[inline]
        pub fn width(&self) -> f64 {
            if self.is_empty() {
                0.0
            } else {
                self.max.x() - self.min.x()
            }
        }

        #[inline]
        pub fn height(&self) -> f64 {
            if self.is_empty() {
                0.0
            } else {
                self.max.y() - self.min.y()
            }
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            let min_vec = self.min.as_vec2().min(point.as_vec2());
            let max_vec = self.max.as_vec2().max(point.as_vec2());
            self.min = Point2::from_vec(min_vec);
            self.max = Point2::from_vec(max_vec);
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn contains(&self, point: Point2) -> bool {
            !self.is_empty()
                && point.x() >= self.min.x()
                && point.x() <= self.max.x()
                && point.y() >= self.min.y()
                && point.y() <= self.max.y()
        }
    }

}

pub mod survey {
    use std::fmt;

    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    /// 单条边界记录的方向错误。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
    pub enum SegmentError {
        #[error("invalid direction1 {0:?}, expected N or S")]
        InvalidDirection1(char),
        #[error("invalid direction2 {0:?}, expected E or W")]
        InvalidDirection2(char),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum NorthSouth {
        North,
        South,
    }

    impl NorthSouth {
        pub fn parse(value: char) -> Result<Self, SegmentError> {
            match value.to_ascii_uppercase() {
                'N' => Ok(Self::North),
                'S' => Ok(Self::South),
                _ => Err(SegmentError::InvalidDirection1(value)),
            }
        }

        #[inline]
        pub fn as_char(self) -> char {
            match self {
                Self::North => 'N',
                Self::South => 'S',
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum EastWest {
        East,
        West,
    }

    impl EastWest {
        pub fn parse(value: char) -> Result<Self, SegmentError> {
            match value.to_ascii_uppercase() {
                'E' => Ok(Self::East),
                'W' => Ok(Self::West),
                _ => Err(SegmentError::InvalidDirection2(value)),
            }
        }

        #[inline]
        pub fn as_char(self) -> char {
            match self {
                Self::East => 'E',
                Self::West => 'W',
            }
        }
    }

    /// 已解析的象限方位角，例如 N45°30'00"E。
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Bearing {
        pub north_south: NorthSouth,
        pub east_west: EastWest,
        pub degrees: u32,
        pub minutes: u32,
        pub seconds: u32,
    }

    impl Bearing {
        /// 度分秒合成的十进制角度。
        #[inline]
        pub fn angle(&self) -> f64 {
            f64::from(self.degrees)
                + f64::from(self.minutes) / 60.0
                + f64::from(self.seconds) / 3600.0
        }

        /// 转换为自北顺时针的方位角，结果位于 `[0, 360)`。
        pub fn azimuth(&self) -> f64 {
            let angle = self.angle();
            let raw = match (self.north_south, self.east_west) {
                (NorthSouth::North, EastWest::East) => angle,
                (NorthSouth::North, EastWest::West) => 360.0 - angle,
                (NorthSouth::South, EastWest::East) => 180.0 - angle,
                (NorthSouth::South, EastWest::West) => 180.0 + angle,
            };
            let normalized = raw.rem_euclid(360.0);
            // rem_euclid 可能因舍入返回 360.0
            if normalized >= 360.0 { 0.0 } else { normalized }
        }
    }

    /// 象限方位角 → 方位角。方向字符大小写不敏感。
    pub fn azimuth(
        direction1: char,
        direction2: char,
        degrees: u32,
        minutes: u32,
        seconds: u32,
    ) -> Result<f64, SegmentError> {
        let bearing = Bearing {
            north_south: NorthSouth::parse(direction1)?,
            east_west: EastWest::parse(direction2)?,
            degrees,
            minutes,
            seconds,
        };
        Ok(bearing.azimuth())
    }

    /// 测量记录中的一条边界：方向对、角度与长度（英尺）。
    ///
    /// 方向以原始字符保存，由调用方（持久化/校验层）负责保证其余字段合法；
    /// 方向对的合法性在使用时通过 [`BoundarySegment::bearing`] 检查。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BoundarySegment {
        pub direction1: char,
        pub direction2: char,
        pub degrees: u32,
        pub minutes: u32,
        #[serde(default)]
        pub seconds: u32,
        pub length: f64,
    }

    impl BoundarySegment {
        pub fn new(
            direction1: char,
            degrees: u32,
            minutes: u32,
            seconds: u32,
            direction2: char,
            length: f64,
        ) -> Self {
            Self {
                direction1,
                direction2,
                degrees,
                minutes,
                seconds,
                length,
            }
        }

        pub fn bearing(&self) -> Result<Bearing, SegmentError> {
            Ok(Bearing {
                north_south: NorthSouth::parse(self.direction1)?,
                east_west: EastWest::parse(self.direction2)?,
                degrees: self.degrees,
                minutes: self.minutes,
                seconds: self.seconds,
            })
        }

        #[inline]
        pub fn azimuth(&self) -> Result<f64, SegmentError> {
            self.bearing().map(|bearing| bearing.azimuth())
        }
    }

    impl fmt::Display for BoundarySegment {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "{}{}°{:02}'{:02}\"{} - {} ft",
                self.direction1.to_ascii_uppercase(),
                self.degrees,
                self.minutes,
                self.seconds,
                self.direction2.to_ascii_uppercase(),
                self.length
            )
        }
    }

}

pub mod zoning {
    use std::collections::BTreeMap;
    use std::fmt;

    use serde::{Deserialize, Serialize};

    use crate::survey::EastWest;

    /// 分区规则所使用的边界方向键。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub enum Cardinal {
        N,
        S,
        E,
        W,
    }

    impl Cardinal {
        pub const ALL: [Cardinal; 4] = [Cardinal::N, Cardinal::S, Cardinal::E, Cardinal::W];

        pub fn parse(value: &str) -> Option<Self> {
            match value.trim().to_ascii_uppercase().as_str() {
                "N" => Some(Self::N),
                "S" => Some(Self::S),
                "E" => Some(Self::E),
                "W" => Some(Self::W),
                _ => None,
            }
        }

        #[inline]
        pub fn as_char(self) -> char {
            match self {
                Self::N => 'N',
                Self::S => 'S',
                Self::E => 'E',
                Self::W => 'W',
            }
        }
    }

    impl From<EastWest> for Cardinal {
        fn from(value: EastWest) -> Self {
            match value {
                EastWest::East => Cardinal::E,
                EastWest::West => Cardinal::W,
            }
        }
    }

    impl fmt::Display for Cardinal {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.as_char())
        }
    }

    /// 退界 / 地役权类别，按绘制优先级排列。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum EasementCategory {
        Setback,
        LandscapeEasement,
        UtilityEasement,
    }

    impl EasementCategory {
        pub const ALL: [EasementCategory; 3] = [
            EasementCategory::Setback,
            EasementCategory::LandscapeEasement,
            EasementCategory::UtilityEasement,
        ];

        #[inline]
        pub fn label(self) -> &'static str {
            match self {
                Self::Setback => "Landscape Setback",
                Self::LandscapeEasement => "Landscape Easement",
                Self::UtilityEasement => "Utility Easement",
            }
        }
    }

    impl fmt::Display for EasementCategory {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    /// 单一方向上的退界与地役权宽度（英尺），均不小于 0。
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct ZoningRule {
        pub setback_landscape: f64,
        pub easement_landscape: f64,
        pub easement_utility: f64,
    }

    impl ZoningRule {
        pub fn new(setback_landscape: f64, easement_landscape: f64, easement_utility: f64) -> Self {
            Self {
                setback_landscape,
                easement_landscape,
                easement_utility,
            }
        }

        #[inline]
        pub fn value(&self, category: EasementCategory) -> f64 {
            match category {
                EasementCategory::Setback => self.setback_landscape,
                EasementCategory::LandscapeEasement => self.easement_landscape,
                EasementCategory::UtilityEasement => self.easement_utility,
            }
        }

        /// 以优先级顺序返回所有非零要求。
        pub fn requirements(&self) -> impl Iterator<Item = (EasementCategory, f64)> + '_ {
            EasementCategory::ALL
                .into_iter()
                .map(|category| (category, self.value(category)))
                .filter(|(_, value)| *value > 0.0)
        }
    }

    /// 某城市的分区规则集，按边界方向索引。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct CityZoning {
        name: String,
        rules: BTreeMap<Cardinal, ZoningRule>,
    }

    impl CityZoning {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                rules: BTreeMap::new(),
            }
        }

        /// 四个方向使用同一规则。
        pub fn uniform(name: impl Into<String>, rule: ZoningRule) -> Self {
            let mut zoning = Self::new(name);
            for direction in Cardinal::ALL {
                zoning.rules.insert(direction, rule);
            }
            zoning
        }

        pub fn with_rule(mut self, direction: Cardinal, rule: ZoningRule) -> Self {
            self.rules.insert(direction, rule);
            self
        }

        #[inline]
        pub fn name(&self) -> &str {
            &self.name
        }

        #[inline]
        pub fn rule(&self, direction: Cardinal) -> Option<&ZoningRule> {
            self.rules.get(&direction)
        }

        #[inline]
        pub fn rules(&self) -> impl Iterator<Item = (Cardinal, &ZoningRule)> {
            self.rules.iter().map(|(direction, rule)| (*direction, rule))
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.rules.is_empty()
        }
    }

}
