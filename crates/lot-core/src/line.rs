//! Treatment line and eligibility class enums shared across all crates.

use std::fmt;
use std::str::FromStr;

use crate::LotError;

/// The ordinal position of a regimen in a patient's treatment history.
///
/// Ordering follows the pathway: `First < Second < Third < FourthPlus`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Line {
    First,
    Second,
    Third,
    /// Fourth line or later.  Terminal: progression out of it is absorbed.
    FourthPlus,
}

impl Line {
    /// All lines in pathway order.
    pub const ALL: [Line; 4] = [Line::First, Line::Second, Line::Third, Line::FourthPlus];

    /// Dense index (0..4) for per-line arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The line patients advance into on progression, `None` for 4L+.
    #[inline]
    pub fn next(self) -> Option<Line> {
        match self {
            Line::First      => Some(Line::Second),
            Line::Second     => Some(Line::Third),
            Line::Third      => Some(Line::FourthPlus),
            Line::FourthPlus => None,
        }
    }

    /// Label used in output column names.
    pub fn as_str(self) -> &'static str {
        match self {
            Line::First      => "1L",
            Line::Second     => "2L",
            Line::Third      => "3L",
            Line::FourthPlus => "4L+",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Line {
    type Err = LotError;

    /// Case-insensitive.  `4L`, `4L+` and `4L_PLUS` all name the terminal
    /// line, so a request for "4L" matches regimens declared "4L+".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_uppercase().replace("_PLUS", "+");
        match norm.as_str() {
            "1L"         => Ok(Line::First),
            "2L"         => Ok(Line::Second),
            "3L"         => Ok(Line::Third),
            "4L" | "4L+" => Ok(Line::FourthPlus),
            _ => Err(LotError::Parse(format!(
                "invalid line {s:?}: expected 1L, 2L, 3L, 4L or 4L+"
            ))),
        }
    }
}

/// Patient sub-population attribute gating which regimens apply.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Eligibility {
    /// Transplant-eligible.
    Te,
    /// Transplant-ineligible.
    Ti,
    /// Applies to every patient regardless of transplant fitness.
    #[default]
    Both,
}

impl Eligibility {
    /// `true` if a regimen declared with `self` may be offered to a patient
    /// requesting `requested`.
    #[inline]
    pub fn admits(self, requested: Eligibility) -> bool {
        self == Eligibility::Both || self == requested
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Eligibility::Te   => "TE",
            Eligibility::Ti   => "TI",
            Eligibility::Both => "Both",
        }
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Eligibility {
    type Err = LotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TE"        => Ok(Eligibility::Te),
            "TI"        => Ok(Eligibility::Ti),
            "BOTH" | "" => Ok(Eligibility::Both),
            _ => Err(LotError::Parse(format!(
                "invalid eligibility {s:?}: expected TE, TI or Both"
            ))),
        }
    }
}
