//! Error types produced while editing or analysing beams.

use thiserror::Error;

use crate::integrator::Quantity;
use crate::load::LoadCategory;
use crate::singularity::Constant;

/// Broad classification shared by every error in the crate.
///
/// Collaborators that only need to decide how to present a failure can match on
/// the kind instead of the individual variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A position, interval or property lies outside its valid range.
    Input,
    /// The edit collides with something already on the beam.
    Conflict,
    /// The boundary conditions do not determine the integration constants.
    UnsolvableModel,
    /// A numeric operation is impossible for the supplied geometry.
    Computation,
}

/// Error returned when editing a [`BeamBuilder`](crate::BeamBuilder).
///
/// # Examples
///
/// ```
/// use beamx::{BeamBuilder, BeamEditError, ErrorKind, SupportCategory};
///
/// let mut beam = BeamBuilder::new(4.0).expect("positive length");
/// let error = beam
///     .add_support(5.0, SupportCategory::Pinned)
///     .expect_err("support outside the beam is rejected");
/// assert_eq!(error, BeamEditError::PositionOutOfBounds { position: 5.0, length: 4.0 });
/// assert_eq!(error.kind(), ErrorKind::Input);
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BeamEditError {
    /// Returned when the beam length is zero, negative or not finite.
    #[error("beam length must be positive and finite (received {0})")]
    InvalidLength(f64),
    /// Returned when a position lies outside `[0, length]`.
    #[error("position {position} lies outside the beam [0, {length}]")]
    PositionOutOfBounds {
        /// Rejected position.
        position: f64,
        /// Length of the beam being edited.
        length: f64,
    },
    /// Returned when a load ends before it starts.
    #[error("load interval [{start}, {end}] ends before it starts")]
    ReversedInterval {
        /// Start of the rejected interval.
        start: f64,
        /// End of the rejected interval.
        end: f64,
    },
    /// Returned when a support already occupies the position.
    #[error("position {0} already has a support")]
    DuplicateSupport(f64),
    /// Returned when a load interval touches or overlaps an existing one.
    #[error("load interval [{start}, {end}] overlaps the existing load at [{existing_start}, {existing_end}]")]
    OverlappingLoad {
        /// Start of the rejected interval.
        start: f64,
        /// End of the rejected interval.
        end: f64,
        /// Start of the interval already on the beam.
        existing_start: f64,
        /// End of the interval already on the beam.
        existing_end: f64,
    },
    /// Returned when a spread load has no length to spread over.
    #[error("{category} load at {position} has zero span")]
    ZeroSpan {
        /// Category of the rejected load.
        category: LoadCategory,
        /// Position where the load both starts and ends.
        position: f64,
    },
    /// Returned when a load magnitude is NaN or infinite.
    #[error("load starting at {position} has a non-finite magnitude ({magnitude})")]
    NonFiniteMagnitude {
        /// Start of the rejected load.
        position: f64,
        /// Rejected magnitude.
        magnitude: f64,
    },
    /// Returned when no support exists at the requested position.
    #[error("beam does not have a support at position {0}")]
    UnknownSupport(f64),
    /// Returned when no load occupies the requested interval.
    #[error("beam does not have a load at [{0}, {1}]")]
    UnknownLoad(f64, f64),
}

impl BeamEditError {
    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLength(_)
            | Self::PositionOutOfBounds { .. }
            | Self::ReversedInterval { .. }
            | Self::NonFiniteMagnitude { .. }
            | Self::UnknownSupport(_)
            | Self::UnknownLoad(..) => ErrorKind::Input,
            Self::DuplicateSupport(_) | Self::OverlappingLoad { .. } => ErrorKind::Conflict,
            Self::ZeroSpan { .. } => ErrorKind::Computation,
        }
    }
}

/// Error returned when a beam analysis fails.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when a section property is missing, zero or negative.
    #[error("{property} must be positive (received {value})")]
    InvalidSection {
        /// Name of the offending property.
        property: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when the full kinematic mode is requested without a flexural rigidity.
    #[error("slope and deflection require a flexural rigidity EI")]
    MissingFlexuralRigidity,
    /// Returned when the boundary stations supply too few independent equations.
    #[error("no independent boundary equation determines {constant} ({available} of {required} found)")]
    Underdetermined {
        /// First constant left without an equation.
        constant: Constant,
        /// Number of independent equations found.
        available: usize,
        /// Number of constants introduced by the integration chain.
        required: usize,
    },
    /// Returned when a known boundary value contradicts the solved constants.
    #[error("{quantity} at {position} should be {expected} but the solved model gives {actual}")]
    InconsistentBoundary {
        /// Quantity whose known value is violated.
        quantity: Quantity,
        /// Station where the violation occurs.
        position: f64,
        /// Value required by the boundary catalog.
        expected: f64,
        /// Value produced by the solved constants.
        actual: f64,
    },
    /// Returned when the selected equations cannot be inverted.
    #[error("boundary equation system is singular")]
    SingularSystem,
    /// Returned when an expression is evaluated before its constants are known.
    #[error("constant {0} has not been resolved")]
    UnresolvedConstant(Constant),
}

impl AnalysisError {
    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSection { .. } | Self::MissingFlexuralRigidity => ErrorKind::Input,
            Self::Underdetermined { .. } | Self::InconsistentBoundary { .. } => {
                ErrorKind::UnsolvableModel
            }
            Self::SingularSystem | Self::UnresolvedConstant(_) => ErrorKind::Computation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_errors_are_classified() {
        assert_eq!(
            BeamEditError::DuplicateSupport(1.0).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            BeamEditError::ZeroSpan {
                category: LoadCategory::UniformlyVarying,
                position: 2.0,
            }
            .kind(),
            ErrorKind::Computation
        );
        assert_eq!(BeamEditError::UnknownLoad(0.0, 1.0).kind(), ErrorKind::Input);
    }

    #[test]
    fn analysis_errors_name_the_offending_station() {
        let error = AnalysisError::InconsistentBoundary {
            quantity: Quantity::Shear,
            position: 4.0,
            expected: 0.0,
            actual: -10.0,
        };
        assert_eq!(error.kind(), ErrorKind::UnsolvableModel);
        assert!(error.to_string().contains("at 4"));
    }
}
