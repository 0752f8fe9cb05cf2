//! JSON problem definitions.
//!
//! A definition lists the beam, its supports and loads together with the analysis
//! settings. Every support and load goes through [`BeamBuilder`] so a definition can
//! never describe a beam the builder would reject.
//!
//! ```json
//! {
//!   "length": 4.0,
//!   "supports": [{ "position": 4.0, "category": "fixed" }],
//!   "loads": [
//!     { "magnitude": -2.0, "category": "centered", "start": 0.0 },
//!     { "magnitude": -1.5, "category": "uniformly_distributed", "start": 2.0, "end": 4.0 }
//!   ],
//!   "mode": "full_kinematic",
//!   "section": { "elastic_modulus": 200e9, "width": 0.1, "height": 0.2 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::beam::{Beam, BeamBuilder};
use crate::boundary::{BoundaryCatalog, BoundaryKind, BoundaryValue};
use crate::errors::BeamEditError;
use crate::evaluator::{SamplingOptions, Section};
use crate::integrator::{AnalysisMode, Quantity};
use crate::load::{Load, LoadCategory};
use crate::load_function::LoadFunctionOptions;
use crate::solver::Solver;
use crate::support::SupportCategory;

/// A support entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupportDefinition {
    /// Distance from the left end.
    pub position: f64,
    /// Restraint type.
    pub category: SupportCategory,
}

/// A load entry; `end` may be omitted for centered loads.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadDefinition {
    /// Signed intensity or force.
    pub magnitude: f64,
    /// Shape of the load.
    pub category: LoadCategory,
    /// Start position.
    pub start: f64,
    /// End position.
    #[serde(default)]
    pub end: Option<f64>,
}

impl LoadDefinition {
    /// Normalised [`Load`].
    #[must_use]
    pub fn to_load(&self) -> Load {
        Load::new(self.magnitude, self.category, self.start, self.end)
    }
}

/// Solid rectangle of one material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RectangleSection {
    /// Young's modulus `E`.
    pub elastic_modulus: f64,
    /// Breadth `b`.
    pub width: f64,
    /// Depth `h`.
    pub height: f64,
}

/// Section properties given directly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplicitSection {
    /// Flexural rigidity `EI`.
    pub flexural_rigidity: f64,
    /// Depth `h`.
    pub height: f64,
    /// Second moment of area `I`.
    pub second_moment: f64,
}

/// Cross-section given directly or as a solid rectangle.
///
/// Each form rejects the fields of the other.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionDefinition {
    /// Solid rectangle of one material.
    Rectangle(RectangleSection),
    /// Properties given directly.
    Explicit(ExplicitSection),
}

impl SectionDefinition {
    /// Resolved section properties.
    #[must_use]
    pub fn to_section(&self) -> Section {
        match *self {
            Self::Rectangle(RectangleSection {
                elastic_modulus,
                width,
                height,
            }) => Section::rectangular(elastic_modulus, width, height),
            Self::Explicit(ExplicitSection {
                flexural_rigidity,
                height,
                second_moment,
            }) => Section::new(flexural_rigidity, height, second_moment),
        }
    }
}

/// Replacement of one value in the boundary catalog.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundaryOverride {
    /// Station kind whose entry is changed.
    pub kind: BoundaryKind,
    /// Quantity whose value is changed.
    pub quantity: Quantity,
    /// Prescribed value; `null` marks the quantity as unknown.
    pub value: Option<f64>,
}

/// Complete description of one analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemDefinition {
    /// Beam length.
    pub length: f64,
    /// Supports in any order.
    #[serde(default)]
    pub supports: Vec<SupportDefinition>,
    /// Loads in any order.
    #[serde(default)]
    pub loads: Vec<LoadDefinition>,
    /// Quantities to derive.
    #[serde(default)]
    pub mode: AnalysisMode,
    /// Cross-section.
    #[serde(default)]
    pub section: Option<SectionDefinition>,
    /// Explicit sample count.
    #[serde(default)]
    pub points: Option<usize>,
    /// Close spread loads at their end.
    #[serde(default)]
    pub truncate_loads: bool,
    /// Changes to the standard boundary catalog, applied to `mode`.
    #[serde(default)]
    pub boundary_overrides: Vec<BoundaryOverride>,
}

impl ProblemDefinition {
    /// Parse a definition from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] describing malformed or unexpected input.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Build the beam through [`BeamBuilder`], entry by entry.
    ///
    /// # Errors
    ///
    /// Returns the first [`BeamEditError`] raised by the builder.
    pub fn build_beam(&self) -> Result<Beam, BeamEditError> {
        let mut builder = BeamBuilder::new(self.length)?;
        for support in &self.supports {
            builder.add_support(support.position, support.category)?;
        }
        for load in &self.loads {
            builder.add_load(load.to_load())?;
        }
        Ok(builder.build())
    }

    /// Boundary catalog with the overrides applied.
    #[must_use]
    pub fn catalog(&self) -> BoundaryCatalog {
        self.boundary_overrides
            .iter()
            .fold(BoundaryCatalog::standard(), |catalog, entry| {
                let value = entry.value.map_or(BoundaryValue::Unknown, BoundaryValue::Known);
                catalog.with_value(entry.kind, self.mode, entry.quantity, value)
            })
    }

    /// Solver configured from the analysis settings.
    #[must_use]
    pub fn solver(&self) -> Solver {
        let mut solver = Solver::new(self.mode)
            .with_sampling(SamplingOptions {
                points: self.points,
            })
            .with_load_options(LoadFunctionOptions {
                truncate_at_end: self.truncate_loads,
            })
            .with_catalog(self.catalog());
        if let Some(section) = &self.section {
            solver = solver.with_section(section.to_section());
        }
        solver
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::ErrorKind;

    const CANTILEVER: &str = r#"{
        "length": 4.0,
        "supports": [{ "position": 4.0, "category": "fixed" }],
        "loads": [
            { "magnitude": -2.0, "category": "centered", "start": 0.0 },
            { "magnitude": -1.5, "category": "uniformly_distributed", "start": 2.0, "end": 4.0 }
        ]
    }"#;

    #[test]
    fn parses_a_minimal_definition() {
        let definition = ProblemDefinition::from_json(CANTILEVER).expect("valid json");
        assert_eq!(definition.mode, AnalysisMode::ForceOnly);
        assert!(definition.section.is_none());
        assert!(!definition.truncate_loads);

        let beam = definition.build_beam().expect("valid beam");
        assert_eq!(beam.supports().len(), 1);
        assert_eq!(beam.loads().len(), 2);
        assert_eq!(beam.loads()[0].interval(), (0.0, 0.0));
    }

    #[test]
    fn sections_accept_either_form() {
        let rectangle: SectionDefinition =
            serde_json::from_str(r#"{ "elastic_modulus": 12.0, "width": 1.0, "height": 1.0 }"#)
                .expect("rectangle");
        let section = rectangle.to_section();
        assert_relative_eq!(section.second_moment, 1.0 / 12.0);
        assert_relative_eq!(section.flexural_rigidity, 1.0);

        let explicit: SectionDefinition = serde_json::from_str(
            r#"{ "flexural_rigidity": 5.0, "height": 0.3, "second_moment": 0.01 }"#,
        )
        .expect("explicit");
        assert_eq!(explicit.to_section(), Section::new(5.0, 0.3, 0.01));
    }

    #[test]
    fn mixed_section_forms_are_rejected() {
        let mixed = r#"{ "elastic_modulus": 12.0, "width": 1.0, "height": 1.0, "second_moment": 2.0 }"#;
        assert!(serde_json::from_str::<SectionDefinition>(mixed).is_err());

        let text = format!(r#"{{ "length": 4.0, "section": {mixed} }}"#);
        assert!(ProblemDefinition::from_json(&text).is_err());
    }

    #[test]
    fn builder_rules_apply_to_definitions() {
        let mut definition = ProblemDefinition::from_json(CANTILEVER).expect("valid json");
        definition.supports.push(SupportDefinition {
            position: 5.0,
            category: SupportCategory::Pinned,
        });
        let error = definition.build_beam().expect_err("support outside the beam");
        assert_eq!(error.kind(), ErrorKind::Input);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let text = r#"{ "length": 4.0, "lenght": 5.0 }"#;
        assert!(ProblemDefinition::from_json(text).is_err());
    }

    #[test]
    fn settings_reach_the_solver() {
        let text = r#"{
            "length": 4.0,
            "supports": [
                { "position": 0.0, "category": "pinned" },
                { "position": 4.0, "category": "roller" }
            ],
            "loads": [{ "magnitude": -100.0, "category": "uniformly_distributed", "start": 0.0, "end": 4.0 }],
            "mode": "full_kinematic",
            "section": { "flexural_rigidity": 1000.0, "height": 0.2, "second_moment": 0.0001 },
            "points": 21,
            "boundary_overrides": [
                { "kind": { "support": "pinned" }, "quantity": "moment", "value": 0.0 }
            ]
        }"#;
        let definition = ProblemDefinition::from_json(text).expect("valid json");
        let solver = definition.solver();
        assert_eq!(solver.mode(), AnalysisMode::FullKinematic);
        assert!(solver.section().is_some());

        let solution = solver
            .solve(&definition.build_beam().expect("valid beam"))
            .expect("determinate beam");
        assert_eq!(solution.samples.x.len(), 21);
        assert!(solution.samples.deflection.is_some());
    }
}
