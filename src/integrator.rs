//! Integration chain from load to shear, moment, slope and deflection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::singularity::{Constant, Expression};

/// Which quantities the analysis derives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Shear and moment only (two constants).
    #[default]
    ForceOnly,
    /// Shear, moment, slope and deflection (four constants, needs `EI`).
    FullKinematic,
}

impl AnalysisMode {
    /// Quantities derived in this mode, in integration order.
    #[must_use]
    pub fn quantities(self) -> &'static [Quantity] {
        match self {
            Self::ForceOnly => &[Quantity::Shear, Quantity::Moment],
            Self::FullKinematic => &[
                Quantity::Shear,
                Quantity::Moment,
                Quantity::Slope,
                Quantity::Deflection,
            ],
        }
    }

    /// Constants introduced in this mode, in introduction order.
    #[must_use]
    pub fn constants(self) -> Vec<Constant> {
        self.quantities()
            .iter()
            .map(|quantity| quantity.introduces())
            .collect()
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ForceOnly => "force-only",
            Self::FullKinematic => "full kinematic",
        })
    }
}

/// Physical quantity obtained by integrating the load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Shear force `V(x)`.
    Shear,
    /// Bending moment `M(x)`.
    Moment,
    /// Slope `Θ(x)`.
    Slope,
    /// Deflection `v(x)`.
    Deflection,
}

impl Quantity {
    /// Every quantity in integration order.
    pub const ALL: [Quantity; 4] = [Self::Shear, Self::Moment, Self::Slope, Self::Deflection];

    /// Constant first appearing in this quantity.
    #[must_use]
    pub const fn introduces(self) -> Constant {
        match self {
            Self::Shear => Constant::C1,
            Self::Moment => Constant::C2,
            Self::Slope => Constant::C3,
            Self::Deflection => Constant::C4,
        }
    }

    /// Position in integration order.
    #[must_use]
    pub const fn stage(self) -> usize {
        self.introduces().index()
    }

    /// Conventional symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Shear => "V",
            Self::Moment => "M",
            Self::Slope => "Θ",
            Self::Deflection => "v",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Expressions of one integration chain, each still holding its constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquationChain {
    /// Distributed load `q(x)`.
    pub load: Expression,
    /// Shear `V(x) = ∫q dx + C1`.
    pub shear: Expression,
    /// Moment `M(x) = ∫V dx + C2`.
    pub moment: Expression,
    /// Slope `Θ(x) = ∫M/EI dx + C3`, full kinematic mode only.
    pub slope: Option<Expression>,
    /// Deflection `v(x) = ∫Θ dx + C4`, full kinematic mode only.
    pub deflection: Option<Expression>,
}

impl EquationChain {
    /// Expression of `quantity`, if derived.
    #[must_use]
    pub fn get(&self, quantity: Quantity) -> Option<&Expression> {
        match quantity {
            Quantity::Shear => Some(&self.shear),
            Quantity::Moment => Some(&self.moment),
            Quantity::Slope => self.slope.as_ref(),
            Quantity::Deflection => self.deflection.as_ref(),
        }
    }

    /// Apply `f` to every derived expression.
    #[must_use]
    pub fn map(&self, f: impl Fn(&Expression) -> Expression) -> Self {
        Self {
            load: f(&self.load),
            shear: f(&self.shear),
            moment: f(&self.moment),
            slope: self.slope.as_ref().map(&f),
            deflection: self.deflection.as_ref().map(&f),
        }
    }
}

/// Integrate `load` through the chain required by `mode`.
///
/// # Errors
///
/// Returns [`AnalysisError::MissingFlexuralRigidity`] when the full kinematic mode is
/// requested without `flexural_rigidity`, and [`AnalysisError::InvalidSection`] when
/// the supplied value is not strictly positive.
pub fn integrate(
    load: &Expression,
    mode: AnalysisMode,
    flexural_rigidity: Option<f64>,
) -> Result<EquationChain, AnalysisError> {
    let shear = load.antiderivative(Constant::C1);
    let moment = shear.antiderivative(Constant::C2);
    let (slope, deflection) = match mode {
        AnalysisMode::ForceOnly => (None, None),
        AnalysisMode::FullKinematic => {
            let ei = flexural_rigidity.ok_or(AnalysisError::MissingFlexuralRigidity)?;
            if !(ei.is_finite() && ei > 0.0) {
                return Err(AnalysisError::InvalidSection {
                    property: "flexural rigidity",
                    value: ei,
                });
            }
            let slope = moment.scale(1.0 / ei).antiderivative(Constant::C3);
            let deflection = slope.antiderivative(Constant::C4);
            (Some(slope), Some(deflection))
        }
    };
    log::debug!("V(x) = {shear}");
    log::debug!("M(x) = {moment}");
    Ok(EquationChain {
        load: load.clone(),
        shear,
        moment,
        slope,
        deflection,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::singularity::{Limit, Term};

    #[test]
    fn force_only_chain_has_two_constants() {
        let load = Expression::from_terms(vec![Term::new(-100.0, 0.0, 0)]);
        let chain = integrate(&load, AnalysisMode::ForceOnly, None).expect("integrates");
        assert_eq!(chain.shear.unresolved(), vec![Constant::C1]);
        assert_eq!(chain.moment.unresolved(), vec![Constant::C1, Constant::C2]);
        assert!(chain.slope.is_none());
        assert!(chain.get(Quantity::Deflection).is_none());
    }

    #[test]
    fn full_chain_divides_moment_by_rigidity() {
        let load = Expression::from_terms(vec![Term::new(-12.0, 0.0, 0)]);
        let chain = integrate(&load, AnalysisMode::FullKinematic, Some(2.0)).expect("integrates");
        let slope = chain.slope.as_ref().expect("slope derived");
        assert_eq!(
            slope.unresolved(),
            vec![Constant::C1, Constant::C2, Constant::C3]
        );
        // -12 x^3 / 6 / 2 at x = 1
        let form = slope.at(1.0, Limit::Left);
        assert_relative_eq!(form.offset, -1.0);
        assert_relative_eq!(form.coefficient(Constant::C1), 0.25);
        assert_relative_eq!(form.coefficient(Constant::C2), 0.5);
        assert_relative_eq!(form.coefficient(Constant::C3), 1.0);

        let deflection = chain.get(Quantity::Deflection).expect("deflection derived");
        assert_eq!(deflection.unresolved().len(), 4);
    }

    #[test]
    fn full_chain_requires_positive_rigidity() {
        let load = Expression::zero();
        assert_eq!(
            integrate(&load, AnalysisMode::FullKinematic, None).expect_err("missing EI"),
            AnalysisError::MissingFlexuralRigidity
        );
        assert!(matches!(
            integrate(&load, AnalysisMode::FullKinematic, Some(0.0)),
            Err(AnalysisError::InvalidSection { .. })
        ));
    }

    #[test]
    fn quantities_introduce_constants_in_order() {
        let constants = AnalysisMode::FullKinematic.constants();
        assert_eq!(constants, Constant::ALL.to_vec());
        assert_eq!(Quantity::Moment.stage(), 1);
    }
}
