use std::fmt;

use siteplan_core::survey::SegmentError;
use siteplan_core::zoning::Cardinal;
use tracing::warn;

/// 产生诊断的流水线阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Path,
    Easement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Path => f.write_str("path"),
            Stage::Easement => f.write_str("easement"),
        }
    }
}

/// 非致命警告：输出降级但渲染继续。
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    DefaultZoning {
        city: String,
    },
    SkippedSegment {
        index: usize,
        stage: Stage,
        error: SegmentError,
    },
    MissingRuleForDirection {
        index: usize,
        direction: Cardinal,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DefaultZoning { city } => {
                write!(f, "no zoning for city {city:?}, using default")
            }
            Diagnostic::SkippedSegment {
                index,
                stage,
                error,
            } => write!(
                f,
                "skipped malformed boundary point #{index} ({stage}): {error}"
            ),
            Diagnostic::MissingRuleForDirection { index, direction } => write!(
                f,
                "no zoning rule for direction {direction} (boundary point #{index})"
            ),
        }
    }
}

/// 单次渲染收集到的诊断列表，记录时同步写入日志。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        warn!(diagnostic = %diagnostic, "site plan warning");
        self.entries.push(diagnostic);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
