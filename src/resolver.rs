//! Resolution of the integration constants from boundary conditions.
//!
//! Every prescribed value in the boundary table gives one equation that is linear in
//! the constants. Candidates are visited in a fixed order (quantity stage first, so
//! `V` equations before `M`, then smallest position) and accepted while they are
//! independent of the ones already accepted. When the first equation of each stage
//! pins down its own constant this is the classic stage-by-stage substitution; when it
//! does not (a simply supported beam has no known shear anywhere) later equations make
//! up the difference.
//!
//! Accepted equations are solved together. Every prescribed value, needed or not, must
//! then hold for the solution, otherwise the supports cannot carry the loads (or a
//! prescribed value was not a finite number).

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryStation;
use crate::errors::AnalysisError;
use crate::integrator::{AnalysisMode, EquationChain, Quantity};
use crate::singularity::{Constant, ConstantValues, Limit, LinearForm};

/// Relative tolerance for independence and consistency checks.
const TOLERANCE: f64 = 1.0e-9;

/// One prescribed value turned into a linear equation in the constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryEquation {
    /// Quantity whose value is prescribed.
    pub quantity: Quantity,
    /// Station where it is prescribed.
    pub position: f64,
    /// Side from which the quantity is read at the station.
    pub limit: Limit,
    /// Prescribed value.
    pub value: f64,
    /// The quantity's expression with `x` fixed at the station.
    pub form: LinearForm,
}

impl BoundaryEquation {
    /// Left-hand side minus prescribed value for the given constants.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnresolvedConstant`] when a constant the equation
    /// depends on is missing from `constants`.
    pub fn residual(&self, constants: &ConstantValues) -> Result<f64, AnalysisError> {
        Ok(self.form.resolve(constants)? - self.value)
    }

    /// Magnitude against which the residual is judged.
    fn scale(&self, constants: &ConstantValues) -> f64 {
        let terms: f64 = Constant::ALL
            .iter()
            .map(|constant| {
                (self.form.coefficient(*constant) * constants.get(constant).copied().unwrap_or(0.0))
                    .abs()
            })
            .sum();
        1.0_f64.max(self.value.abs()).max(self.form.offset.abs() + terms)
    }
}

/// Solved constants together with the equations that determined them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Value of every constant of the mode.
    pub constants: ConstantValues,
    /// Independent equations used to solve the constants, in selection order.
    pub equations: Vec<BoundaryEquation>,
    /// Remaining prescribed values, verified against the solution.
    pub verified: Vec<BoundaryEquation>,
}

/// Every prescribed boundary value as an equation, in selection order.
#[must_use]
pub fn candidate_equations(
    chain: &EquationChain,
    stations: &[BoundaryStation],
    mode: AnalysisMode,
) -> Vec<BoundaryEquation> {
    let mut equations = Vec::new();
    for &quantity in mode.quantities() {
        let Some(expression) = chain.get(quantity) else {
            continue;
        };
        let mut at_stations: Vec<&BoundaryStation> = stations.iter().collect();
        at_stations.sort_by(|a, b| a.position.total_cmp(&b.position));
        for station in at_stations {
            let Some(value) = station.conditions.get(quantity).and_then(|value| value.known())
            else {
                continue;
            };
            equations.push(BoundaryEquation {
                quantity,
                position: station.position,
                limit: station.limit,
                value,
                form: expression.at(station.position, station.limit),
            });
        }
    }
    equations
}

/// Reduced row kept for the independence test.
struct PivotRow {
    /// Column (constant index within the mode) the row is normalised on.
    pivot: usize,
    /// Coefficients with `row[pivot] == 1`.
    row: Vec<f64>,
}

/// Reduce `row` against the accepted rows; return the normalised remainder if it is
/// independent of them.
fn reduce(basis: &[PivotRow], mut row: Vec<f64>) -> Option<PivotRow> {
    let scale = row.iter().fold(0.0_f64, |max, value| max.max(value.abs()));
    if scale == 0.0 {
        return None;
    }
    for accepted in basis {
        let factor = row[accepted.pivot];
        if factor != 0.0 {
            for (value, reference) in row.iter_mut().zip(&accepted.row) {
                *value -= factor * reference;
            }
        }
    }
    let (pivot, lead) = row
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))?;
    if lead.abs() <= TOLERANCE * scale {
        return None;
    }
    for value in &mut row {
        *value /= lead;
    }
    Some(PivotRow { pivot, row })
}

/// Solve the constants of `mode` from the prescribed values at `stations`.
///
/// # Errors
///
/// Returns [`AnalysisError::Underdetermined`] when fewer independent equations than
/// constants exist, [`AnalysisError::InconsistentBoundary`] when an unused prescribed
/// value is violated by the solution and [`AnalysisError::SingularSystem`] if the
/// selected system cannot be inverted.
pub fn resolve_constants(
    chain: &EquationChain,
    stations: &[BoundaryStation],
    mode: AnalysisMode,
) -> Result<Resolution, AnalysisError> {
    let unknowns = mode.constants();
    let required = unknowns.len();

    let mut basis: Vec<PivotRow> = Vec::with_capacity(required);
    let mut equations = Vec::with_capacity(required);
    let mut verified = Vec::new();
    for equation in candidate_equations(chain, stations, mode) {
        if equations.len() == required {
            verified.push(equation);
            continue;
        }
        let row = unknowns
            .iter()
            .map(|constant| equation.form.coefficient(*constant))
            .collect();
        match reduce(&basis, row) {
            Some(pivot_row) => {
                log::debug!(
                    "{}({}) = {} selected for {}",
                    equation.quantity,
                    equation.position,
                    equation.value,
                    unknowns[pivot_row.pivot]
                );
                basis.push(pivot_row);
                equations.push(equation);
            }
            None => {
                log::trace!(
                    "{}({}) = {} depends on equations already selected",
                    equation.quantity,
                    equation.position,
                    equation.value
                );
                verified.push(equation);
            }
        }
    }

    if equations.len() < required {
        let constant = unknowns
            .iter()
            .enumerate()
            .find(|(column, _)| basis.iter().all(|accepted| accepted.pivot != *column))
            .map(|(_, constant)| *constant)
            .unwrap_or(unknowns[required - 1]);
        return Err(AnalysisError::Underdetermined {
            constant,
            available: equations.len(),
            required,
        });
    }

    let mut matrix = DMatrix::zeros(required, required);
    let mut rhs = DVector::zeros(required);
    for (row, equation) in equations.iter().enumerate() {
        rhs[row] = equation.value - equation.form.offset;
        for (column, constant) in unknowns.iter().enumerate() {
            matrix[(row, column)] = equation.form.coefficient(*constant);
        }
    }
    let solution = matrix.lu().solve(&rhs).ok_or(AnalysisError::SingularSystem)?;
    let constants: ConstantValues = unknowns
        .iter()
        .enumerate()
        .map(|(index, constant)| (*constant, solution[index]))
        .collect();

    for equation in equations.iter().chain(&verified) {
        let residual = equation.residual(&constants)?;
        if residual.is_nan() || residual.abs() > TOLERANCE * equation.scale(&constants) {
            return Err(AnalysisError::InconsistentBoundary {
                quantity: equation.quantity,
                position: equation.position,
                expected: equation.value,
                actual: equation.value + residual,
            });
        }
    }

    for (constant, value) in &constants {
        log::debug!("{constant} = {value}");
    }
    Ok(Resolution {
        constants,
        equations,
        verified,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::beam::BeamBuilder;
    use crate::boundary::{boundary_stations, BoundaryCatalog, BoundaryKind, BoundaryValue};
    use crate::integrator::integrate;
    use crate::load::Load;
    use crate::load_function::{build_load_function, LoadFunctionOptions};
    use crate::support::SupportCategory;

    fn setup(
        supports: &[(f64, SupportCategory)],
        loads: &[Load],
        mode: AnalysisMode,
    ) -> (EquationChain, Vec<BoundaryStation>) {
        let mut builder = BeamBuilder::new(4.0).expect("positive length");
        for (position, category) in supports {
            builder
                .add_support(*position, *category)
                .expect("support fits");
        }
        for load in loads {
            builder.add_load(*load).expect("load fits");
        }
        let beam = builder.build();
        let q = build_load_function(beam.loads(), LoadFunctionOptions::default());
        let chain = integrate(&q, mode, Some(1.0)).expect("integrates");
        let stations = boundary_stations(&beam, mode, &BoundaryCatalog::standard());
        (chain, stations)
    }

    #[test]
    fn cantilever_constants_follow_stage_order() {
        let (chain, stations) = setup(
            &[(4.0, SupportCategory::Fixed)],
            &[Load::point(-2.0, 0.0), Load::uniform(-1.5, 2.0, 4.0)],
            AnalysisMode::ForceOnly,
        );
        let resolution =
            resolve_constants(&chain, &stations, AnalysisMode::ForceOnly).expect("solvable");
        let used: Vec<(Quantity, f64)> = resolution
            .equations
            .iter()
            .map(|equation| (equation.quantity, equation.position))
            .collect();
        assert_eq!(used, vec![(Quantity::Shear, 0.0), (Quantity::Moment, 0.0)]);
        assert_relative_eq!(resolution.constants[&Constant::C1], 0.0);
        assert_relative_eq!(resolution.constants[&Constant::C2], 0.0);
    }

    #[test]
    fn simply_supported_beam_uses_both_moment_equations() {
        let (chain, stations) = setup(
            &[(0.0, SupportCategory::Pinned), (4.0, SupportCategory::Pinned)],
            &[Load::uniform(-100.0, 0.0, 4.0)],
            AnalysisMode::ForceOnly,
        );
        let resolution =
            resolve_constants(&chain, &stations, AnalysisMode::ForceOnly).expect("solvable");
        assert_eq!(resolution.equations.len(), 2);
        assert!(resolution.verified.is_empty());
        assert_relative_eq!(resolution.constants[&Constant::C1], 200.0, epsilon = 1.0e-9);
        assert_relative_eq!(resolution.constants[&Constant::C2], 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn propped_cantilever_needs_the_full_chain() {
        let supports = [(0.0, SupportCategory::Fixed), (4.0, SupportCategory::Roller)];
        let loads = [Load::uniform(-1.0, 0.0, 4.0)];

        let (chain, stations) = setup(&supports, &loads, AnalysisMode::ForceOnly);
        let error = resolve_constants(&chain, &stations, AnalysisMode::ForceOnly)
            .expect_err("statically indeterminate");
        assert_eq!(
            error,
            AnalysisError::Underdetermined {
                constant: Constant::C2,
                available: 1,
                required: 2,
            }
        );

        let (chain, stations) = setup(&supports, &loads, AnalysisMode::FullKinematic);
        let resolution = resolve_constants(&chain, &stations, AnalysisMode::FullKinematic)
            .expect("solvable with compatibility");
        // Fixed-end reaction of a propped cantilever: 5wL/8.
        assert_relative_eq!(resolution.constants[&Constant::C1], 2.5, epsilon = 1.0e-9);
        // Fixed-end moment: -wL^2/8.
        assert_relative_eq!(resolution.constants[&Constant::C2], -2.0, epsilon = 1.0e-9);
    }

    #[test]
    fn single_pinned_support_under_load_is_inconsistent() {
        let (chain, stations) = setup(
            &[(0.0, SupportCategory::Pinned)],
            &[Load::point(-10.0, 2.0)],
            AnalysisMode::ForceOnly,
        );
        let error = resolve_constants(&chain, &stations, AnalysisMode::ForceOnly)
            .expect_err("mechanism");
        assert!(matches!(
            error,
            AnalysisError::InconsistentBoundary {
                quantity: Quantity::Moment,
                ..
            }
        ));
    }

    #[test]
    fn non_finite_prescribed_values_are_inconsistent() {
        let mut builder = BeamBuilder::new(4.0).expect("positive length");
        builder
            .add_support(0.0, SupportCategory::Pinned)
            .expect("support fits");
        let catalog = BoundaryCatalog::standard().with_value(
            BoundaryKind::Free,
            AnalysisMode::ForceOnly,
            Quantity::Moment,
            BoundaryValue::Known(f64::NAN),
        );
        let mode = AnalysisMode::ForceOnly;
        let q = build_load_function(&[], LoadFunctionOptions::default());
        let chain = integrate(&q, mode, None).expect("integrates");
        let stations = boundary_stations(&builder.build(), mode, &catalog);

        // V(4) and M(0) fix the constants; the NaN moment at the free end is only checked.
        let error = resolve_constants(&chain, &stations, mode).expect_err("NaN never holds");
        assert!(matches!(
            error,
            AnalysisError::InconsistentBoundary {
                quantity: Quantity::Moment,
                position,
                ..
            } if position == 4.0
        ));

        // A NaN value in a selected equation poisons the constants themselves.
        let catalog = BoundaryCatalog::standard().with_value(
            BoundaryKind::Free,
            mode,
            Quantity::Shear,
            BoundaryValue::Known(f64::NAN),
        );
        let stations = boundary_stations(&builder.build(), mode, &catalog);
        let error = resolve_constants(&chain, &stations, mode).expect_err("NaN never holds");
        assert!(matches!(
            error,
            AnalysisError::InconsistentBoundary {
                quantity: Quantity::Shear,
                ..
            }
        ));
    }

    #[test]
    fn dependent_rows_are_rejected() {
        let first = reduce(&[], vec![1.0, 4.0]).expect("independent");
        assert_eq!(first.pivot, 1);
        assert!(reduce(&[first], vec![2.0, 8.0]).is_none());
        assert!(reduce(&[], vec![0.0, 0.0]).is_none());
    }
}
