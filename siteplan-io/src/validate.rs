use std::fmt;

use siteplan_core::survey::{BoundarySegment, EastWest, NorthSouth};
use tracing::warn;

use crate::IoError;
use crate::survey::BoundaryRecord;

/// 校验模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// 任何非法记录都使整个文档被拒绝。
    Strict,
    /// 丢弃角度 / 长度非法的记录；仅方向对非法的单字符记录交给几何流水线跳过并报告。
    #[default]
    Lenient,
}

/// 边界记录的缺陷。
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryDefect {
    Direction1(String),
    Direction2(String),
    Angle {
        degrees: i64,
        minutes: i64,
        seconds: i64,
    },
    Length(f64),
}

impl BoundaryDefect {
    #[inline]
    fn is_direction(&self) -> bool {
        matches!(self, Self::Direction1(_) | Self::Direction2(_))
    }
}

impl fmt::Display for BoundaryDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direction1(value) => write!(f, "primary direction {value:?} is not N or S"),
            Self::Direction2(value) => write!(f, "secondary direction {value:?} is not E or W"),
            Self::Angle {
                degrees,
                minutes,
                seconds,
            } => write!(
                f,
                "angle {degrees}°{minutes}'{seconds}\" out of range (0-90°, 0-59', 0-59\")"
            ),
            Self::Length(length) => write!(f, "length {length} must be positive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub index: usize,
    pub defect: BoundaryDefect,
}

/// 校验结果：交给几何流水线的记录与被丢弃的记录。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedBoundary {
    pub segments: Vec<BoundarySegment>,
    pub rejected: Vec<RejectedRecord>,
    /// 通过全部检查的记录数（不含转交的方向非法记录）。
    pub usable: usize,
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

/// 检查单条记录；方向按大小写不敏感处理，角度与长度需在合法范围内。
pub fn check_record(record: &BoundaryRecord) -> Result<BoundarySegment, BoundaryDefect> {
    let direction1 = single_char(&record.direction1)
        .filter(|ch| NorthSouth::parse(*ch).is_ok())
        .ok_or_else(|| BoundaryDefect::Direction1(record.direction1.clone()))?;
    let direction2 = single_char(&record.direction2)
        .filter(|ch| EastWest::parse(*ch).is_ok())
        .ok_or_else(|| BoundaryDefect::Direction2(record.direction2.clone()))?;
    let (degrees, minutes, seconds) = angle_parts(record)?;
    if !(record.length.is_finite() && record.length > 0.0) {
        return Err(BoundaryDefect::Length(record.length));
    }
    Ok(BoundarySegment::new(
        direction1.to_ascii_uppercase(),
        degrees,
        minutes,
        seconds,
        direction2.to_ascii_uppercase(),
        record.length,
    ))
}

fn angle_parts(record: &BoundaryRecord) -> Result<(u32, u32, u32), BoundaryDefect> {
    let in_range = (0..=90).contains(&record.degrees)
        && (0..60).contains(&record.minutes)
        && (0..60).contains(&record.seconds);
    if !in_range {
        return Err(BoundaryDefect::Angle {
            degrees: record.degrees,
            minutes: record.minutes,
            seconds: record.seconds,
        });
    }
    // 范围已检查，转换不会失败
    Ok((
        record.degrees as u32,
        record.minutes as u32,
        record.seconds as u32,
    ))
}

/// 宽松模式下仅方向有误的记录：其余字段合法时原样转交。
fn forwardable(record: &BoundaryRecord) -> Option<BoundarySegment> {
    let direction1 = single_char(&record.direction1)?;
    let direction2 = single_char(&record.direction2)?;
    let (degrees, minutes, seconds) = angle_parts(record).ok()?;
    if !(record.length.is_finite() && record.length > 0.0) {
        return None;
    }
    Some(BoundarySegment::new(
        direction1,
        degrees,
        minutes,
        seconds,
        direction2,
        record.length,
    ))
}

/// 校验边界记录序列。至少需要一条可用记录（即路径至少两个点）。
pub fn validate_boundary(
    records: &[BoundaryRecord],
    mode: ValidationMode,
) -> Result<ValidatedBoundary, IoError> {
    let mut validated = ValidatedBoundary::default();

    for (index, record) in records.iter().enumerate() {
        match check_record(record) {
            Ok(segment) => {
                validated.segments.push(segment);
                validated.usable += 1;
            }
            Err(defect) => {
                if mode == ValidationMode::Strict {
                    return Err(IoError::InvalidBoundary { index, defect });
                }
                if defect.is_direction() {
                    if let Some(segment) = forwardable(record) {
                        validated.segments.push(segment);
                        continue;
                    }
                }
                warn!(index, defect = %defect, "丢弃非法边界记录");
                validated.rejected.push(RejectedRecord { index, defect });
            }
        }
    }

    if validated.usable == 0 {
        return Err(IoError::InsufficientBoundary {
            usable: validated.usable,
        });
    }
    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good() -> BoundaryRecord {
        BoundaryRecord::new("n", 45, 0, 0, "e", 100.0)
    }

    #[test]
    fn valid_records_are_normalized() {
        let validated = validate_boundary(&[good()], ValidationMode::Strict).unwrap();
        assert_eq!(
            validated.segments,
            vec![BoundarySegment::new('N', 45, 0, 0, 'E', 100.0)]
        );
        assert_eq!(validated.usable, 1);
    }

    #[test]
    fn strict_mode_rejects_first_defect() {
        let records = vec![good(), BoundaryRecord::new("N", 91, 0, 0, "E", 10.0)];
        let err = validate_boundary(&records, ValidationMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            IoError::InvalidBoundary {
                index: 1,
                defect: BoundaryDefect::Angle { degrees: 91, .. }
            }
        ));
    }

    #[test]
    fn lenient_mode_drops_bad_numbers_and_forwards_bad_directions() {
        let records = vec![
            good(),
            BoundaryRecord::new("N", 10, 60, 0, "E", 10.0),
            BoundaryRecord::new("X", 10, 0, 0, "E", 10.0),
            BoundaryRecord::new("N", 10, 0, 0, "W", -3.0),
            BoundaryRecord::new("NE", 10, 0, 0, "W", 3.0),
        ];
        let validated = validate_boundary(&records, ValidationMode::Lenient).unwrap();
        assert_eq!(validated.usable, 1);
        assert_eq!(validated.segments.len(), 2);
        assert_eq!(validated.segments[1].direction1, 'X');
        let rejected: Vec<usize> = validated.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![1, 3, 4]);
    }

    #[test]
    fn no_usable_records_is_insufficient() {
        let records = vec![BoundaryRecord::new("X", 10, 0, 0, "E", 10.0)];
        let err = validate_boundary(&records, ValidationMode::Lenient).unwrap_err();
        assert!(matches!(err, IoError::InsufficientBoundary { usable: 0 }));
        assert!(matches!(
            validate_boundary(&[], ValidationMode::Strict),
            Err(IoError::InsufficientBoundary { .. })
        ));
    }

    #[test]
    fn defect_messages_are_readable() {
        assert_eq!(
            BoundaryDefect::Length(0.0).to_string(),
            "length 0 must be positive"
        );
        assert!(
            BoundaryDefect::Direction1("Q".into())
                .to_string()
                .contains("not N or S")
        );
    }
}
