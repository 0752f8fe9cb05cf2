//! Loads applied to the beam.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of a load along the beam.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadCategory {
    /// Point load applied at a single position.
    Centered,
    /// Constant intensity starting at `start`.
    UniformlyDistributed,
    /// Intensity growing linearly from zero at `start` to the magnitude at `end`.
    UniformlyVarying,
}

impl LoadCategory {
    /// Name used in reports and problem files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Centered => "centered",
            Self::UniformlyDistributed => "uniformly_distributed",
            Self::UniformlyVarying => "uniformly_varying",
        }
    }
}

impl fmt::Display for LoadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A load applied to the beam.
///
/// The sign of the magnitude carries the direction; downward loads are negative.
/// Construction normalises the interval so that a point load always has
/// `end == start`.
///
/// # Examples
/// ```
/// use beamx::{Load, LoadCategory};
///
/// let spread = Load::new(-1.5, LoadCategory::UniformlyDistributed, 2.0, None);
/// assert_eq!(spread.category(), LoadCategory::Centered);
/// assert_eq!(spread.interval(), (2.0, 2.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Load {
    /// Signed magnitude (force for point loads, peak intensity otherwise).
    magnitude: f64,
    /// Shape of the load.
    category: LoadCategory,
    /// Position where the load begins.
    start: f64,
    /// Position where the load ends.
    end: f64,
}

impl Load {
    /// Create a load, normalising degenerate intervals.
    #[must_use]
    pub fn new(magnitude: f64, category: LoadCategory, start: f64, end: Option<f64>) -> Self {
        let (category, end) = match (category, end) {
            (LoadCategory::Centered, _) => (LoadCategory::Centered, start),
            (category, Some(end)) => (category, end),
            (category, None) => {
                log::warn!(
                    "{category} load at {start} has no end position; treating it as centered"
                );
                (LoadCategory::Centered, start)
            }
        };
        Self {
            magnitude,
            category,
            start,
            end,
        }
    }

    /// Point load of `magnitude` at `position`.
    #[must_use]
    pub fn point(magnitude: f64, position: f64) -> Self {
        Self::new(magnitude, LoadCategory::Centered, position, None)
    }

    /// Uniform intensity `magnitude` over `[start, end]`.
    #[must_use]
    pub fn uniform(magnitude: f64, start: f64, end: f64) -> Self {
        Self::new(magnitude, LoadCategory::UniformlyDistributed, start, Some(end))
    }

    /// Intensity rising from zero at `start` to `magnitude` at `end`.
    #[must_use]
    pub fn varying(magnitude: f64, start: f64, end: f64) -> Self {
        Self::new(magnitude, LoadCategory::UniformlyVarying, start, Some(end))
    }

    /// Signed magnitude.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Shape of the load.
    #[must_use]
    pub fn category(&self) -> LoadCategory {
        self.category
    }

    /// Start position.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End position (equal to the start for point loads).
    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Closed interval occupied by the load.
    #[must_use]
    pub fn interval(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Length of the loaded interval.
    #[must_use]
    pub fn span(&self) -> f64 {
        (self.end - self.start).abs()
    }

    /// Resultant force of the load as it is nominally defined on `[start, end]`.
    #[must_use]
    pub fn resultant(&self) -> f64 {
        match self.category {
            LoadCategory::Centered => self.magnitude,
            LoadCategory::UniformlyDistributed => self.magnitude * self.span(),
            LoadCategory::UniformlyVarying => 0.5 * self.magnitude * self.span(),
        }
    }
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.category == LoadCategory::Centered {
            write!(f, "Load([{}], {})", self.start, self.magnitude)
        } else {
            write!(f, "Load([{}:{}], {})", self.start, self.end, self.magnitude)
        }
    }
}
