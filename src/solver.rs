//! End-to-end analysis of a [`Beam`].

use serde::Serialize;

use crate::beam::Beam;
use crate::boundary::{boundary_stations, BoundaryCatalog, BoundaryStation};
use crate::errors::AnalysisError;
use crate::evaluator::{bending_stress, sample, SamplingOptions, Samples, Section, StressField};
use crate::integrator::{integrate, AnalysisMode, EquationChain, Quantity};
use crate::load_function::{build_load_function, LoadFunctionOptions};
use crate::resolver::{resolve_constants, BoundaryEquation};
use crate::singularity::{ConstantValues, Expression, Limit};
use crate::support::SupportCategory;

/// Configured analysis, reusable across beams.
///
/// # Examples
/// ```
/// use beamx::{AnalysisMode, BeamBuilder, Load, Quantity, Solver, SupportCategory};
///
/// let mut builder = BeamBuilder::new(4.0)?;
/// builder
///     .add_support(0.0, SupportCategory::Pinned)?
///     .add_support(4.0, SupportCategory::Pinned)?
///     .add_load(Load::uniform(-100.0, 0.0, 4.0))?;
/// let solution = Solver::new(AnalysisMode::ForceOnly).solve(&builder.build())?;
///
/// let moment = solution.value(Quantity::Moment, 2.0).expect("moment derived");
/// assert!((moment - 200.0).abs() < 1.0e-9);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Solver {
    /// Quantities to derive.
    mode: AnalysisMode,
    /// Cross-section, required by the full kinematic mode.
    section: Option<Section>,
    /// Sampling grid.
    sampling: SamplingOptions,
    /// How loads become singularity terms.
    load_options: LoadFunctionOptions,
    /// Boundary conditions per station kind.
    catalog: BoundaryCatalog,
}

impl Solver {
    /// Solver for `mode` with the standard catalog and default sampling.
    #[must_use]
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            section: None,
            sampling: SamplingOptions::default(),
            load_options: LoadFunctionOptions::default(),
            catalog: BoundaryCatalog::standard(),
        }
    }

    /// Use `section` for slope, deflection and stress.
    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    /// Use `sampling` for the sample grid.
    #[must_use]
    pub fn with_sampling(mut self, sampling: SamplingOptions) -> Self {
        self.sampling = sampling;
        self
    }

    /// Use `load_options` when building `q(x)`.
    #[must_use]
    pub fn with_load_options(mut self, load_options: LoadFunctionOptions) -> Self {
        self.load_options = load_options;
        self
    }

    /// Use `catalog` instead of the standard boundary conditions.
    #[must_use]
    pub fn with_catalog(mut self, catalog: BoundaryCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Configured mode.
    #[must_use]
    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Configured section, if any.
    #[must_use]
    pub fn section(&self) -> Option<&Section> {
        self.section.as_ref()
    }

    /// Analyse `beam`.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] when the section is invalid or missing for the
    /// full kinematic mode, when the boundary conditions do not determine the constants
    /// or contradict each other, and when the equation system is singular. No partial
    /// result is produced.
    pub fn solve(&self, beam: &Beam) -> Result<Solution, AnalysisError> {
        if let Some(section) = &self.section {
            section.validate()?;
        }
        log::info!(
            "solving {} beam of length {} with {} supports and {} loads",
            self.mode,
            beam.length(),
            beam.supports().len(),
            beam.loads().len()
        );

        let load = build_load_function(beam.loads(), self.load_options);
        log::debug!("q(x) = {load}");
        let chain = integrate(
            &load,
            self.mode,
            self.section.map(|section| section.flexural_rigidity),
        )?;
        let stations = boundary_stations(beam, self.mode, &self.catalog);
        let resolution = resolve_constants(&chain, &stations, self.mode)?;
        let solved = chain.map(|expression| expression.substitute(&resolution.constants));

        let reactions = support_reactions(beam, &solved)?;
        let samples = sample(&solved, beam.length(), self.mode, self.sampling)?;
        let stress = self
            .section
            .as_ref()
            .map(|section| bending_stress(&samples, section));

        Ok(Solution {
            mode: self.mode,
            length: beam.length(),
            chain,
            solved,
            boundary_table: stations,
            equations: resolution.equations,
            constants: resolution.constants,
            reactions,
            samples,
            stress,
        })
    }
}

/// Force and moment a support exerts on the beam.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Reaction {
    /// Support position.
    pub position: f64,
    /// Support category.
    pub category: SupportCategory,
    /// Transverse force, positive in the direction of positive loads.
    pub force: f64,
    /// Reaction moment; zero for pinned and roller supports.
    pub moment: f64,
}

/// Reactions of the supports sitting at either end of the beam.
///
/// At the left end they are the shear and moment just before the beam starts, at the
/// right end the negated values just after it ends.
fn support_reactions(beam: &Beam, solved: &EquationChain) -> Result<Vec<Reaction>, AnalysisError> {
    let none = ConstantValues::new();
    let length = beam.length();
    let mut reactions = Vec::new();
    for support in beam.supports() {
        let (limit, sign) = if support.position == 0.0 {
            (Limit::Left, 1.0)
        } else if support.position == length {
            (Limit::Right, -1.0)
        } else {
            log::debug!("no end reaction reported for interior {support}");
            continue;
        };
        reactions.push(Reaction {
            position: support.position,
            category: support.category,
            force: sign * solved.shear.evaluate(support.position, limit, &none)?,
            moment: sign * solved.moment.evaluate(support.position, limit, &none)?,
        });
    }
    Ok(reactions)
}

/// Everything derived for one beam.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Solution {
    /// Mode the beam was solved in.
    pub mode: AnalysisMode,
    /// Beam length.
    pub length: f64,
    /// Expressions with the integration constants still symbolic.
    pub chain: EquationChain,
    /// Expressions with the solved constants substituted.
    pub solved: EquationChain,
    /// Boundary stations and their conditions.
    pub boundary_table: Vec<BoundaryStation>,
    /// Equations used to solve the constants.
    pub equations: Vec<BoundaryEquation>,
    /// Solved constants.
    pub constants: ConstantValues,
    /// Reactions of end supports.
    pub reactions: Vec<Reaction>,
    /// Sampled quantities.
    pub samples: Samples,
    /// Bending stress, when a section was configured.
    pub stress: Option<StressField>,
}

impl Solution {
    /// Solved load function `q(x)`.
    #[must_use]
    pub fn load(&self) -> &Expression {
        &self.solved.load
    }

    /// Solved expression of `quantity`, if derived.
    #[must_use]
    pub fn expression(&self, quantity: Quantity) -> Option<&Expression> {
        self.solved.get(quantity)
    }

    /// Value of `quantity` just before `x`.
    #[must_use]
    pub fn value(&self, quantity: Quantity, x: f64) -> Option<f64> {
        self.value_from(quantity, x, Limit::Left)
    }

    /// Value of `quantity` at `x` approached from `limit`.
    #[must_use]
    pub fn value_from(&self, quantity: Quantity, x: f64, limit: Limit) -> Option<f64> {
        self.expression(quantity)?
            .evaluate(x, limit, &ConstantValues::new())
            .ok()
    }

    /// Reaction of the support at `position`, if one was reported there.
    #[must_use]
    pub fn reaction_at(&self, position: f64) -> Option<&Reaction> {
        self.reactions
            .iter()
            .find(|reaction| reaction.position == position)
    }
}
