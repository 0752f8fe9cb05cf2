//! Beam definition: an editable builder and the immutable snapshot handed to the solver.

use serde::Serialize;

use crate::errors::BeamEditError;
use crate::load::{Load, LoadCategory};
use crate::support::{Support, SupportCategory};

/// Editable beam definition.
///
/// Every mutation is validated immediately so the builder never holds an invalid
/// configuration. Call [`BeamBuilder::build`] to obtain the [`Beam`] consumed by the
/// solver.
///
/// # Examples
/// ```
/// use beamx::{BeamBuilder, Load, SupportCategory};
///
/// let mut builder = BeamBuilder::new(4.0).expect("positive length");
/// builder.add_support(0.0, SupportCategory::Pinned).expect("support fits");
/// builder.add_support(4.0, SupportCategory::Roller).expect("support fits");
/// builder.add_load(Load::uniform(-100.0, 0.0, 4.0)).expect("load fits");
///
/// let beam = builder.build();
/// assert_eq!(beam.supports().len(), 2);
/// assert_eq!(beam.loads().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct BeamBuilder {
    /// Length of the beam.
    length: f64,
    /// Supports ordered by position.
    supports: Vec<Support>,
    /// Loads in insertion order.
    loads: Vec<Load>,
}

impl BeamBuilder {
    /// Start an unloaded, unsupported beam of the given length.
    ///
    /// # Errors
    ///
    /// Returns [`BeamEditError::InvalidLength`] when `length` is not strictly positive
    /// and finite.
    pub fn new(length: f64) -> Result<Self, BeamEditError> {
        if !(length.is_finite() && length > 0.0) {
            return Err(BeamEditError::InvalidLength(length));
        }
        Ok(Self {
            length,
            supports: Vec::new(),
            loads: Vec::new(),
        })
    }

    /// Length of the beam.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Return the number of supports.
    #[must_use]
    pub fn support_count(&self) -> usize {
        self.supports.len()
    }

    /// Return the number of loads.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.len()
    }

    /// Intervals already occupied by loads, in insertion order.
    #[must_use]
    pub fn taken_intervals(&self) -> Vec<(f64, f64)> {
        self.loads.iter().map(Load::interval).collect()
    }

    /// Place a support on the beam.
    ///
    /// # Errors
    ///
    /// Returns [`BeamEditError::PositionOutOfBounds`] when `position` is outside the
    /// beam and [`BeamEditError::DuplicateSupport`] when a support already sits there.
    pub fn add_support(
        &mut self,
        position: f64,
        category: SupportCategory,
    ) -> Result<&mut Self, BeamEditError> {
        self.check_position(position)?;
        if self.supports.iter().any(|support| support.position == position) {
            return Err(BeamEditError::DuplicateSupport(position));
        }
        let index = self
            .supports
            .partition_point(|support| support.position < position);
        self.supports.insert(index, Support::new(position, category));
        Ok(self)
    }

    /// Remove the support at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`BeamEditError::UnknownSupport`] when no support sits at `position`.
    pub fn remove_support(&mut self, position: f64) -> Result<Support, BeamEditError> {
        let index = self
            .supports
            .iter()
            .position(|support| support.position == position)
            .ok_or(BeamEditError::UnknownSupport(position))?;
        let support = self.supports.remove(index);
        log::debug!("{support} removed from beam");
        Ok(support)
    }

    /// Apply a load to the beam.
    ///
    /// # Errors
    ///
    /// Returns [`BeamEditError::PositionOutOfBounds`] or
    /// [`BeamEditError::ReversedInterval`] for an invalid interval,
    /// [`BeamEditError::NonFiniteMagnitude`] for a NaN or infinite magnitude,
    /// [`BeamEditError::ZeroSpan`] for a spread load without length and
    /// [`BeamEditError::OverlappingLoad`] when the interval touches an existing load.
    pub fn add_load(&mut self, load: Load) -> Result<&mut Self, BeamEditError> {
        let (start, end) = load.interval();
        if !load.magnitude().is_finite() {
            return Err(BeamEditError::NonFiniteMagnitude {
                position: start,
                magnitude: load.magnitude(),
            });
        }
        self.check_position(start)?;
        self.check_position(end)?;
        if end < start {
            return Err(BeamEditError::ReversedInterval { start, end });
        }
        if load.category() != LoadCategory::Centered && load.span() == 0.0 {
            return Err(BeamEditError::ZeroSpan {
                category: load.category(),
                position: start,
            });
        }
        if let Some((existing_start, existing_end)) = self
            .loads
            .iter()
            .map(Load::interval)
            .find(|&taken| intervals_intersect((start, end), taken))
        {
            return Err(BeamEditError::OverlappingLoad {
                start,
                end,
                existing_start,
                existing_end,
            });
        }
        self.loads.push(load);
        Ok(self)
    }

    /// Remove the load occupying exactly `interval`.
    ///
    /// # Errors
    ///
    /// Returns [`BeamEditError::UnknownLoad`] when no load occupies the interval.
    pub fn remove_load(&mut self, interval: (f64, f64)) -> Result<Load, BeamEditError> {
        let index = self
            .loads
            .iter()
            .position(|load| load.interval() == interval)
            .ok_or(BeamEditError::UnknownLoad(interval.0, interval.1))?;
        let load = self.loads.remove(index);
        log::debug!("{load} removed from beam");
        Ok(load)
    }

    /// Freeze the current definition.
    #[must_use]
    pub fn build(&self) -> Beam {
        Beam {
            length: self.length,
            supports: self.supports.clone(),
            loads: self.loads.clone(),
        }
    }

    /// Reject positions outside `[0, length]`.
    fn check_position(&self, position: f64) -> Result<(), BeamEditError> {
        if (0.0..=self.length).contains(&position) {
            Ok(())
        } else {
            Err(BeamEditError::PositionOutOfBounds {
                position,
                length: self.length,
            })
        }
    }
}

/// Inclusive overlap test for two closed intervals.
fn intervals_intersect(a: (f64, f64), b: (f64, f64)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Immutable beam definition consumed by the solver.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Beam {
    /// Length of the beam.
    length: f64,
    /// Supports ordered by position.
    supports: Vec<Support>,
    /// Loads in insertion order.
    loads: Vec<Load>,
}

impl Beam {
    /// Length of the beam.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Supports ordered by position.
    #[must_use]
    pub fn supports(&self) -> &[Support] {
        &self.supports
    }

    /// Loads in the order they were applied.
    #[must_use]
    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    /// Support at exactly `position`, if any.
    #[must_use]
    pub fn support_at(&self, position: f64) -> Option<&Support> {
        self.supports
            .iter()
            .find(|support| support.position == position)
    }

    /// Resume editing from this definition.
    #[must_use]
    pub fn to_builder(&self) -> BeamBuilder {
        BeamBuilder {
            length: self.length,
            supports: self.supports.clone(),
            loads: self.loads.clone(),
        }
    }
}
