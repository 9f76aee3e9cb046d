//! Detection of exclusive areas sharing address space.

use crate::model::{Area, Bank};
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn from_error_on_warning(error_on_warning: bool) -> Self {
        if error_on_warning {
            Self::Error
        } else {
            Self::Warning
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// Two exclusive areas whose address ranges intersect.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Overlap {
    first: Area,
    second: Area,
    /// Inclusive intersection of both areas.
    range: (u32, u32),
    severity: Severity,
}

impl Overlap {
    pub fn first(&self) -> &Area {
        &self.first
    }

    pub fn second(&self) -> &Area {
        &self.second
    }

    pub fn range(&self) -> (u32, u32) {
        self.range
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl fmt::Display for Overlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Area {} overlaps with {} at 0x{:X} -> 0x{:X}",
            self.severity, self.first, self.second, self.range.0, self.range.1
        )
    }
}

/// Finds all pairs of intersecting exclusive areas across `banks`.
///
/// Areas are swept in address order (ties keep their input order), every intersecting pair
/// is reported exactly once. Identical duplicates are reported as well.
pub fn detect_overlaps(banks: &[Bank], severity: Severity) -> Vec<Overlap> {
    let mut areas: Vec<&Area> = banks
        .iter()
        .flat_map(Bank::areas)
        .filter(|area| area.is_exclusive() && !area.is_empty())
        .collect();
    areas.sort_by_key(|area| area.address());

    let mut overlaps = Vec::new();
    for (index, area) in areas.iter().enumerate() {
        let end = match area.end_address() {
            Some(end) => end,
            None => continue,
        };

        for other in areas[index + 1..]
            .iter()
            .take_while(|other| other.address() <= end)
        {
            if let Some(range) = area.intersection(other) {
                overlaps.push(Overlap {
                    first: (*area).clone(),
                    second: (*other).clone(),
                    range,
                    severity,
                });
            }
        }
    }

    overlaps
}
