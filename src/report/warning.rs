use crate::overlap::Overlap;
use std::fmt;

/// Non-fatal findings about the model.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Warning {
    Overlap(Overlap),
    BankOverflow { bank: String, by: u32 },
    /// Only a notice, never escalated to an error.
    UnknownCapacity { bank: String },
}

impl Warning {
    /// Whether the warning turns into a failure when errors on warnings are requested.
    pub fn escalates(&self) -> bool {
        match self {
            Self::Overlap(_) | Self::BankOverflow { .. } => true,
            Self::UnknownCapacity { .. } => false,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap(overlap) => write!(f, "{}", overlap),
            Self::BankOverflow { bank, by } => {
                write!(f, "Warning: Bank {} overflowed by {} bytes", bank, by)
            }
            Self::UnknownCapacity { bank } => write!(
                f,
                "Note: Capacity of {} is unknown, only used bytes are shown",
                bank
            ),
        }
    }
}

/// Status of a run, replaces a process wide error flag.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
    error_on_warning: bool,
}

impl Diagnostics {
    pub fn new(error_on_warning: bool) -> Self {
        Self {
            warnings: Vec::new(),
            error_on_warning,
        }
    }

    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// True if the run has to exit with a failure code.
    pub fn failed(&self) -> bool {
        self.error_on_warning && self.warnings.iter().any(Warning::escalates)
    }
}
