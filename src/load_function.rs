//! Composite distributed-load function `q(x)`.

use serde::{Deserialize, Serialize};

use crate::load::{Load, LoadCategory};
use crate::singularity::{Expression, Term};

/// Options controlling how loads become singularity terms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFunctionOptions {
    /// Close spread loads at their `end` with offsetting terms.
    ///
    /// Off by default: a distributed or varying load then continues as a step or ramp
    /// up to the end of the beam.
    pub truncate_at_end: bool,
}

/// Singularity terms contributed by a single load.
///
/// | category | term |
/// |---|---|
/// | centered | `p <x-a>^-1` |
/// | uniformly distributed | `p <x-a>^0` |
/// | uniformly varying | `(p/b) <x-a>^1` |
#[must_use]
pub fn load_terms(load: &Load, options: LoadFunctionOptions) -> Vec<Term> {
    let p = load.magnitude();
    let a = load.start();
    let e = load.end();
    match load.category() {
        LoadCategory::Centered => vec![Term::new(p, a, -1)],
        LoadCategory::UniformlyDistributed => {
            let mut terms = vec![Term::new(p, a, 0)];
            if options.truncate_at_end {
                terms.push(Term::new(-p, e, 0));
            }
            terms
        }
        LoadCategory::UniformlyVarying => {
            let slope = p / load.span();
            let mut terms = vec![Term::new(slope, a, 1)];
            if options.truncate_at_end {
                terms.push(Term::new(-slope, e, 1));
                terms.push(Term::new(-p, e, 0));
            }
            terms
        }
    }
}

/// Superpose every load into one expression.
///
/// The result does not depend on the order of `loads`.
///
/// # Examples
/// ```
/// use beamx::{build_load_function, Load, LoadFunctionOptions};
///
/// let loads = [Load::point(-2.0, 0.0), Load::uniform(-1.5, 2.0, 4.0)];
/// let q = build_load_function(&loads, LoadFunctionOptions::default());
/// assert_eq!(q.to_string(), "-2<x>^-1 - 1.5<x - 2>^0");
/// ```
#[must_use]
pub fn build_load_function(loads: &[Load], options: LoadFunctionOptions) -> Expression {
    let mut terms: Vec<Term> = loads
        .iter()
        .flat_map(|load| load_terms(load, options))
        .collect();
    terms.sort_by(|a, b| {
        a.knot
            .total_cmp(&b.knot)
            .then_with(|| b.exponent.cmp(&a.exponent))
    });
    Expression::from_terms(terms)
}
