#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use beamx::{
    AnalysisMode, Beam, BeamBuilder, Constant, Limit, Load, Quantity, Section, Solver,
    SupportCategory,
};

#[derive(Debug, Clone, Copy)]
struct CantileverProperties {
    length: f64,
    tip_load: f64,
    distributed_load: f64,
    distributed_start: f64,
}

impl Default for CantileverProperties {
    fn default() -> Self {
        Self {
            length: 4.0,
            tip_load: -2.0,
            distributed_load: -1.5,
            distributed_start: 2.0,
        }
    }
}

/// Fixed at the right end, point load at the free left end, partial uniform load.
fn build_cantilever(properties: &CantileverProperties) -> Beam {
    let mut builder = BeamBuilder::new(properties.length).expect("positive length");
    builder
        .add_support(properties.length, SupportCategory::Fixed)
        .expect("fixed support assignment succeeds")
        .add_load(Load::point(properties.tip_load, 0.0))
        .expect("tip load assignment succeeds")
        .add_load(Load::uniform(
            properties.distributed_load,
            properties.distributed_start,
            properties.length,
        ))
        .expect("distributed load assignment succeeds");
    builder.build()
}

#[test]
fn builds_expected_layout() {
    let beam = build_cantilever(&CantileverProperties::default());

    assert_eq!(beam.supports().len(), 1);
    assert_eq!(beam.loads().len(), 2);
    assert!(beam.support_at(4.0).is_some());
    assert!(beam.support_at(0.0).is_none());
}

#[test]
fn free_end_fixes_both_constants() {
    let beam = build_cantilever(&CantileverProperties::default());
    let solution = Solver::new(AnalysisMode::ForceOnly)
        .solve(&beam)
        .expect("cantilever analysis succeeds");

    assert_relative_eq!(solution.constants[&Constant::C1], 0.0);
    assert_relative_eq!(solution.constants[&Constant::C2], 0.0);
    let used: Vec<(Quantity, f64)> = solution
        .equations
        .iter()
        .map(|equation| (equation.quantity, equation.position))
        .collect();
    assert_eq!(used, vec![(Quantity::Shear, 0.0), (Quantity::Moment, 0.0)]);
}

#[test]
fn reactions_satisfy_global_equilibrium() {
    let properties = CantileverProperties::default();
    let beam = build_cantilever(&properties);
    let solution = Solver::new(AnalysisMode::ForceOnly)
        .solve(&beam)
        .expect("cantilever analysis succeeds");

    let reaction = solution
        .reaction_at(properties.length)
        .expect("fixed end reports a reaction");
    assert_relative_eq!(reaction.force, 5.0, epsilon = 1.0e-9);
    assert_relative_eq!(reaction.moment, 11.0, epsilon = 1.0e-9);

    let applied: f64 = beam.loads().iter().map(Load::resultant).sum();
    assert!((applied + reaction.force).abs() < 1.0e-9);

    // Moments about the fixed end, each load acting at its centroid.
    let point_arm = properties.length;
    let distributed_arm = (properties.length - properties.distributed_start) / 2.0;
    let distributed_resultant =
        properties.distributed_load * (properties.length - properties.distributed_start);
    let moment_sum = properties.tip_load * point_arm
        + distributed_resultant * distributed_arm
        + reaction.moment;
    assert!(moment_sum.abs() < 1.0e-9);
}

#[test]
fn shear_jumps_at_the_tip_load() {
    let beam = build_cantilever(&CantileverProperties::default());
    let solution = Solver::new(AnalysisMode::ForceOnly)
        .solve(&beam)
        .expect("cantilever analysis succeeds");

    let before = solution
        .value_from(Quantity::Shear, 0.0, Limit::Left)
        .expect("shear derived");
    let after = solution
        .value_from(Quantity::Shear, 0.0, Limit::Right)
        .expect("shear derived");
    assert_relative_eq!(before, 0.0);
    assert_relative_eq!(after, -2.0);

    let root_moment = solution
        .value(Quantity::Moment, 4.0)
        .expect("moment derived");
    assert_relative_eq!(root_moment, -11.0, epsilon = 1.0e-9);

    let extreme = solution
        .samples
        .extreme(Quantity::Moment)
        .expect("moment sampled");
    assert_relative_eq!(extreme.position, 4.0);
    assert_relative_eq!(extreme.value, -11.0, epsilon = 1.0e-9);
}

#[test]
fn tip_deflection_matches_closed_form_solution() {
    let length = 2.0;
    let load = -10.0;
    let rigidity = 1_000.0;

    let mut builder = BeamBuilder::new(length).expect("positive length");
    builder
        .add_support(0.0, SupportCategory::Fixed)
        .expect("fixed support assignment succeeds")
        .add_load(Load::point(load, length))
        .expect("tip load assignment succeeds");
    let solution = Solver::new(AnalysisMode::FullKinematic)
        .with_section(Section::new(rigidity, 0.2, rigidity / 200.0e9))
        .solve(&builder.build())
        .expect("cantilever analysis succeeds");

    let expected = load * length.powi(3) / (3.0 * rigidity);
    let tip = solution
        .value(Quantity::Deflection, length)
        .expect("deflection derived");
    assert_relative_eq!(tip, expected, epsilon = 1.0e-12);

    let slope = solution.value(Quantity::Slope, length).expect("slope derived");
    assert_relative_eq!(slope, load * length.powi(2) / (2.0 * rigidity), epsilon = 1.0e-12);

    let reaction = solution.reaction_at(0.0).expect("fixed end reports a reaction");
    assert_relative_eq!(reaction.force, -load, epsilon = 1.0e-9);
    assert_relative_eq!(reaction.moment, load * length, epsilon = 1.0e-9);

    let extreme = solution
        .samples
        .extreme(Quantity::Deflection)
        .expect("deflection sampled");
    assert_relative_eq!(extreme.position, length);
    assert_relative_eq!(extreme.value, expected, epsilon = 1.0e-12);
}
