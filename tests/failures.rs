#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use beamx::{
    AnalysisError, AnalysisMode, BeamBuilder, BeamEditError, Constant, ErrorKind, Load, Quantity,
    Section, Solver, SupportCategory,
};

#[test]
fn overlapping_loads_are_conflicts() {
    let mut builder = BeamBuilder::new(4.0).expect("positive length");
    builder
        .add_load(Load::uniform(-1.0, 1.0, 3.0))
        .expect("first load fits");
    let error = builder
        .add_load(Load::uniform(-1.0, 2.0, 4.0))
        .expect_err("second load overlaps");

    assert_eq!(error.kind(), ErrorKind::Conflict);
    assert_eq!(builder.load_count(), 1);
}

#[test]
fn supports_outside_the_beam_are_input_errors() {
    let mut builder = BeamBuilder::new(4.0).expect("positive length");
    let error = builder
        .add_support(5.0, SupportCategory::Pinned)
        .expect_err("support outside the beam");

    assert_eq!(
        error,
        BeamEditError::PositionOutOfBounds {
            position: 5.0,
            length: 4.0
        }
    );
    assert_eq!(error.kind(), ErrorKind::Input);
    assert_eq!(builder.support_count(), 0);
}

#[test]
fn single_pinned_support_cannot_carry_a_load() {
    let mut builder = BeamBuilder::new(4.0).expect("positive length");
    builder
        .add_support(0.0, SupportCategory::Pinned)
        .expect("support fits")
        .add_load(Load::point(-10.0, 2.0))
        .expect("load fits");
    let error = Solver::new(AnalysisMode::ForceOnly)
        .solve(&builder.build())
        .expect_err("mechanism");

    assert_eq!(error.kind(), ErrorKind::UnsolvableModel);
}

#[test]
fn propped_cantilever_is_indeterminate_without_kinematics() {
    let mut builder = BeamBuilder::new(4.0).expect("positive length");
    builder
        .add_support(0.0, SupportCategory::Fixed)
        .expect("support fits")
        .add_support(4.0, SupportCategory::Roller)
        .expect("support fits")
        .add_load(Load::uniform(-1.0, 0.0, 4.0))
        .expect("load fits");
    let beam = builder.build();

    let error = Solver::new(AnalysisMode::ForceOnly)
        .solve(&beam)
        .expect_err("statically indeterminate");
    assert!(matches!(
        error,
        AnalysisError::Underdetermined {
            constant: Constant::C2,
            ..
        }
    ));

    let solution = Solver::new(AnalysisMode::FullKinematic)
        .with_section(Section::new(1.0, 0.1, 1.0))
        .solve(&beam)
        .expect("compatibility closes the system");
    let fixed = solution.reaction_at(0.0).expect("fixed end reaction");
    let roller = solution.reaction_at(4.0).expect("roller reaction");
    assert_relative_eq!(fixed.force, 2.5, epsilon = 1.0e-9);
    assert_relative_eq!(fixed.moment, -2.0, epsilon = 1.0e-9);
    assert_relative_eq!(roller.force, 1.5, epsilon = 1.0e-9);
    assert_relative_eq!(roller.moment, 0.0, epsilon = 1.0e-9);
    assert_relative_eq!(
        solution.value(Quantity::Deflection, 4.0).expect("deflection derived"),
        0.0,
        epsilon = 1.0e-9
    );
}

#[test]
fn unsupported_beam_is_underdetermined_in_full_mode() {
    let mut builder = BeamBuilder::new(4.0).expect("positive length");
    builder
        .add_load(Load::point(-1.0, 2.0))
        .expect("load fits");
    let error = Solver::new(AnalysisMode::FullKinematic)
        .with_section(Section::new(1.0, 0.1, 1.0))
        .solve(&builder.build())
        .expect_err("no restraint");
    assert_eq!(error.kind(), ErrorKind::UnsolvableModel);
}

#[test]
fn non_finite_loads_never_reach_the_solver() {
    let mut builder = BeamBuilder::new(4.0).expect("positive length");
    builder
        .add_support(0.0, SupportCategory::Pinned)
        .expect("support fits")
        .add_support(4.0, SupportCategory::Pinned)
        .expect("support fits");
    let error = builder
        .add_load(Load::uniform(f64::NAN, 0.0, 4.0))
        .expect_err("NaN magnitude rejected");
    assert_eq!(error.kind(), ErrorKind::Input);

    let solution = Solver::new(AnalysisMode::ForceOnly)
        .solve(&builder.build())
        .expect("unloaded beam solves");
    assert!(solution
        .constants
        .values()
        .all(|value| value.is_finite()));
}
