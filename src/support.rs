//! Supports restraining the beam.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a support restrains the beam at its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportCategory {
    /// Restrains displacement and rotation.
    Fixed,
    /// Restrains displacement only.
    Pinned,
    /// Restrains transverse displacement only.
    Roller,
}

impl SupportCategory {
    /// Every support category, in catalog order.
    pub const ALL: [SupportCategory; 3] = [Self::Fixed, Self::Pinned, Self::Roller];

    /// Lower-case name used in reports and problem files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Pinned => "pinned",
            Self::Roller => "roller",
        }
    }
}

impl fmt::Display for SupportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A support placed on the beam.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Support {
    /// Distance from the left end of the beam.
    pub position: f64,
    /// Kind of restraint.
    pub category: SupportCategory,
}

impl Support {
    /// Create a [`Support`].
    #[must_use]
    pub const fn new(position: f64, category: SupportCategory) -> Self {
        Self { position, category }
    }
}

impl fmt::Display for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Support({}, {})", self.position, self.category)
    }
}
