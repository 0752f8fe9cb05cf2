//! Sampling of solved expressions and bending stress over the cross-section.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::integrator::{AnalysisMode, EquationChain, Quantity};
use crate::singularity::{ConstantValues, Expression, Limit};

/// Number of samples used in force-only mode when none is configured.
pub const DEFAULT_FORCE_POINTS: usize = 1000;

/// Fewest samples ever produced.
const MIN_POINTS: usize = 10;

/// Second moment of area of a `width` x `height` rectangle about its centroid.
///
/// I = b h³ / 12
#[must_use]
pub fn rectangular_second_moment(width: f64, height: f64) -> f64 {
    width * height.powi(3) / 12.0
}

/// Cross-section properties needed by the full kinematic mode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Flexural rigidity `EI`.
    pub flexural_rigidity: f64,
    /// Total depth `h`; stresses are reported over `[-h/2, h/2]`.
    pub height: f64,
    /// Second moment of area `I`.
    pub second_moment: f64,
}

impl Section {
    /// Section with explicit properties.
    #[must_use]
    pub const fn new(flexural_rigidity: f64, height: f64, second_moment: f64) -> Self {
        Self {
            flexural_rigidity,
            height,
            second_moment,
        }
    }

    /// Solid rectangle of the given material and dimensions.
    ///
    /// # Examples
    /// ```
    /// use beamx::Section;
    ///
    /// let section = Section::rectangular(200.0e9, 0.1, 0.2);
    /// assert!((section.second_moment - 0.1 * 0.2_f64.powi(3) / 12.0).abs() < 1.0e-15);
    /// assert!((section.flexural_rigidity - 200.0e9 * section.second_moment).abs() < 1.0e-3);
    /// ```
    #[must_use]
    pub fn rectangular(elastic_modulus: f64, width: f64, height: f64) -> Self {
        let second_moment = rectangular_second_moment(width, height);
        Self::new(elastic_modulus * second_moment, height, second_moment)
    }

    /// Check that every property is positive.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidSection`] naming the first offending property.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (property, value) in [
            ("flexural rigidity", self.flexural_rigidity),
            ("section height", self.height),
            ("second moment of area", self.second_moment),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnalysisError::InvalidSection { property, value });
            }
        }
        Ok(())
    }
}

/// Grid density for sampling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingOptions {
    /// Explicit number of samples; the mode default applies when `None`.
    pub points: Option<usize>,
}

impl SamplingOptions {
    /// Sampling with exactly `points` samples (at least two).
    #[must_use]
    pub const fn with_points(points: usize) -> Self {
        Self {
            points: Some(points),
        }
    }

    /// Number of samples for a beam of `length` in `mode`.
    ///
    /// Force-only defaults to [`DEFAULT_FORCE_POINTS`]. The full kinematic mode scales
    /// with the logarithm of the length, `10 * round(|100 ln L| / 10)`, and never drops
    /// below ten samples.
    #[must_use]
    pub fn point_count(&self, mode: AnalysisMode, length: f64) -> usize {
        if let Some(points) = self.points {
            return points.max(2);
        }
        match mode {
            AnalysisMode::ForceOnly => DEFAULT_FORCE_POINTS,
            AnalysisMode::FullKinematic => {
                let scaled = 10.0 * ((100.0 * length.ln()).abs() / 10.0).round();
                (scaled as usize).max(MIN_POINTS)
            }
        }
    }
}

/// Position and value of the largest magnitude in a sampled quantity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extreme {
    /// Where the extreme occurs.
    pub position: f64,
    /// Signed value at that position.
    pub value: f64,
}

/// Quantities sampled on a uniform grid over the span.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    /// Sample positions, `0` to `length` inclusive.
    pub x: Array1<f64>,
    /// Shear force at each position.
    pub shear: Array1<f64>,
    /// Bending moment at each position.
    pub moment: Array1<f64>,
    /// Slope at each position, full kinematic mode only.
    pub slope: Option<Array1<f64>>,
    /// Deflection at each position, full kinematic mode only.
    pub deflection: Option<Array1<f64>>,
}

impl Samples {
    /// Sampled values of `quantity`, if derived.
    #[must_use]
    pub fn get(&self, quantity: Quantity) -> Option<&Array1<f64>> {
        match quantity {
            Quantity::Shear => Some(&self.shear),
            Quantity::Moment => Some(&self.moment),
            Quantity::Slope => self.slope.as_ref(),
            Quantity::Deflection => self.deflection.as_ref(),
        }
    }

    /// Largest magnitude of `quantity` over the samples.
    #[must_use]
    pub fn extreme(&self, quantity: Quantity) -> Option<Extreme> {
        let values = self.get(quantity)?;
        values
            .iter()
            .zip(self.x.iter())
            .max_by(|a, b| a.0.abs().total_cmp(&b.0.abs()))
            .map(|(value, position)| Extreme {
                position: *position,
                value: *value,
            })
    }
}

/// Bending stress `σ = M y / I` over the span and the depth of the section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StressField {
    /// Positions along the beam (columns).
    pub x: Array1<f64>,
    /// Heights from the neutral axis (rows).
    pub y: Array1<f64>,
    /// Stress, indexed `[row of y, column of x]`.
    pub stress: Array2<f64>,
}

/// Sample one closed expression; the left end is read from inside the beam.
fn sample_expression(
    expression: &Expression,
    x: &Array1<f64>,
) -> Result<Array1<f64>, AnalysisError> {
    let none = ConstantValues::new();
    x.iter()
        .enumerate()
        .map(|(index, position)| {
            let limit = if index == 0 { Limit::Right } else { Limit::Left };
            expression.evaluate(*position, limit, &none)
        })
        .collect::<Result<Vec<f64>, AnalysisError>>()
        .map(Array1::from)
}

/// Sample every quantity of a fully substituted chain.
///
/// # Errors
///
/// Returns [`AnalysisError::UnresolvedConstant`] when `solved` still holds a constant.
pub fn sample(
    solved: &EquationChain,
    length: f64,
    mode: AnalysisMode,
    options: SamplingOptions,
) -> Result<Samples, AnalysisError> {
    let count = options.point_count(mode, length);
    let mut x = Array1::linspace(0.0, length, count);
    x[count - 1] = length;
    let optional = |expression: Option<&Expression>| {
        expression
            .map(|expression| sample_expression(expression, &x))
            .transpose()
    };
    Ok(Samples {
        shear: sample_expression(&solved.shear, &x)?,
        moment: sample_expression(&solved.moment, &x)?,
        slope: optional(solved.slope.as_ref())?,
        deflection: optional(solved.deflection.as_ref())?,
        x,
    })
}

/// Bending stress over `[-h/2, h/2]` using as many heights as positions.
#[must_use]
pub fn bending_stress(samples: &Samples, section: &Section) -> StressField {
    let count = samples.x.len();
    let half = section.height / 2.0;
    let y = Array1::linspace(-half, half, count);
    let stress = Array2::from_shape_fn((count, count), |(row, column)| {
        samples.moment[column] * y[row] / section.second_moment
    });
    StressField {
        x: samples.x.clone(),
        y,
        stress,
    }
}
